/// Largest denominator tried when rendering a value as a fraction
const MAX_DENOMINATOR: i64 = 1000;

/// Render a tableau value: integers bare, simple rationals as `p/q`,
/// anything else as a decimal.
pub fn value(v: f64) -> String {
    if v.abs() < 1e-9 {
        return "0".to_string();
    }
    if (v - v.round()).abs() < 1e-9 {
        return format!("{}", v.round() as i64);
    }
    match fraction(v) {
        Some((p, q)) => format!("{}/{}", p, q),
        None => format!("{:.4}", v),
    }
}

/// Smallest-denominator fraction reproducing `v` within 1e-9
fn fraction(v: f64) -> Option<(i64, i64)> {
    (2..=MAX_DENOMINATOR).find_map(|q| {
        let p = (v * q as f64).round();
        ((p / q as f64 - v).abs() < 1e-9).then_some((p as i64, q))
    })
}

/// Print a grid with a header row and a label per row
pub fn table(headers: &[String], rows: &[(String, Vec<f64>)]) {
    let cells: Vec<(String, Vec<String>)> = rows
        .iter()
        .map(|(label, values)| (label.clone(), values.iter().map(|&v| value(v)).collect()))
        .collect();

    let width = headers
        .iter()
        .map(String::len)
        .chain(cells.iter().flat_map(|(label, row)| row.iter().map(String::len).chain([label.len()])))
        .max()
        .unwrap_or(1)
        + 2;

    print!("{:>width$}", "", width = width);
    for h in headers {
        print!("{:>width$}", h, width = width);
    }
    println!();

    for (label, row) in &cells {
        print!("{:>width$}", label, width = width);
        for cell in row {
            print!("{:>width$}", cell, width = width);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_print_bare() {
        assert_eq!(value(36.0), "36");
        assert_eq!(value(-4.0), "-4");
        assert_eq!(value(-0.0), "0");
        assert_eq!(value(1e-12), "0");
    }

    #[test]
    fn test_rationals_print_as_fractions() {
        assert_eq!(value(1.5), "3/2");
        assert_eq!(value(-1.0 / 3.0), "-1/3");
        assert_eq!(value(0.8), "4/5");
    }

    #[test]
    fn test_irrationals_print_as_decimals() {
        assert_eq!(value(std::f64::consts::PI), "3.1416");
    }
}
