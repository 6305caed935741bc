use crate::standard_form::StandardForm;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Driving artificial variables out of the basis
    One,
    /// Optimizing the real objective
    Two,
}

/// Dense simplex tableau.
///
/// Rows `0..m` are constraints and row `m` is the objective row; the last
/// column holds the constants. The objective row stores `z - c·x = 0`, so a
/// negative entry marks a column whose entry would increase `z` and the
/// objective row's constant is the current value of `z`.
#[derive(Debug, Clone)]
pub struct Tableau {
    data: Vec<Vec<f64>>,
    basis: Vec<usize>,
    phase: Phase,
}

impl Tableau {
    /// Lay out the constraint rows of `form` and install the starting objective:
    /// the Phase 1 auxiliary objective when artificials exist, the real one otherwise.
    pub fn new(form: &StandardForm) -> Self {
        let width = form.num_columns() + 1;

        let mut data: Vec<Vec<f64>> = form
            .rows
            .iter()
            .map(|row| {
                let mut cells = Vec::with_capacity(width);
                cells.extend_from_slice(&row.coefficients);
                cells.push(row.rhs);
                cells
            })
            .collect();
        data.push(vec![0.0; width]);

        let mut tableau = Self {
            data,
            basis: form.rows.iter().map(|row| row.basic).collect(),
            phase: Phase::Two,
        };

        if form.has_artificial() {
            tableau.install_phase_one(form);
        } else {
            tableau.install_phase_two(form);
        }
        tableau
    }

    /// Maximize the negated sum of artificial variables
    pub fn install_phase_one(&mut self, form: &StandardForm) {
        let costs: Vec<f64> = (0..form.num_columns())
            .map(|j| if form.is_artificial(j) { -1.0 } else { 0.0 })
            .collect();
        self.install_objective(&costs);
        self.phase = Phase::One;
    }

    /// Install the real (internally maximized) objective
    pub fn install_phase_two(&mut self, form: &StandardForm) {
        let mut costs = vec![0.0; form.num_columns()];
        costs[..form.n_structural].copy_from_slice(&form.objective);
        self.install_objective(&costs);
        self.phase = Phase::Two;
    }

    /// Write `-costs` into the objective row and re-express it against the
    /// current basis so every basic column reads zero.
    fn install_objective(&mut self, costs: &[f64]) {
        let obj = self.num_rows();
        let rhs = self.rhs_col();

        for (cell, &c) in self.data[obj].iter_mut().zip(costs) {
            *cell = -c;
        }
        self.data[obj][rhs] = 0.0;

        for i in 0..obj {
            let factor = self.data[obj][self.basis[i]];
            if factor != 0.0 {
                for j in 0..=rhs {
                    self.data[obj][j] -= factor * self.data[i][j];
                }
            }
        }
    }

    /// Exchange `basis[row]` for `col`
    pub fn pivot(&mut self, row: usize, col: usize) {
        let width = self.data[row].len();

        let pivot_val = self.data[row][col];
        for j in 0..width {
            self.data[row][j] /= pivot_val;
        }
        // Exact identity column, free of rounding residue
        self.data[row][col] = 1.0;

        for i in 0..self.data.len() {
            if i != row {
                let factor = self.data[i][col];
                if factor != 0.0 {
                    for j in 0..width {
                        self.data[i][j] -= factor * self.data[row][j];
                    }
                    self.data[i][col] = 0.0;
                }
            }
        }

        self.basis[row] = col;
    }

    /// Number of constraint rows
    pub fn num_rows(&self) -> usize {
        self.basis.len()
    }

    /// Number of variable columns, constant column excluded
    pub fn num_columns(&self) -> usize {
        self.rhs_col()
    }

    pub fn rhs_col(&self) -> usize {
        self.data[0].len() - 1
    }

    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn rhs(&self, row: usize) -> f64 {
        self.data[row][self.rhs_col()]
    }

    pub fn objective_row(&self) -> &[f64] {
        &self.data[self.num_rows()]
    }

    /// Current value of the internal (maximized) objective
    pub fn objective_value(&self) -> f64 {
        self.rhs(self.num_rows())
    }

    pub fn basis(&self) -> &[usize] {
        &self.basis
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Copy of the full grid, objective row last
    pub fn grid(&self) -> Vec<Vec<f64>> {
        self.data.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Problem, Relation};

    fn tableau_for(problem: &Problem) -> (StandardForm, Tableau) {
        let form = StandardForm::build(problem).unwrap();
        let tableau = Tableau::new(&form);
        (form, tableau)
    }

    #[test]
    fn test_initial_tableau_without_artificials() {
        let problem = Problem::maximize(vec![3.0, 5.0])
            .subject_to(vec![1.0, 0.0], Relation::Le, 4.0)
            .subject_to(vec![0.0, 2.0], Relation::Le, 12.0);
        let (_, tableau) = tableau_for(&problem);

        assert_eq!(tableau.phase(), Phase::Two);
        assert_eq!(tableau.basis(), &[2, 3]);
        assert_eq!(tableau.objective_row(), &[-3.0, -5.0, 0.0, 0.0, 0.0]);
        assert_eq!(tableau.grid()[1], vec![0.0, 2.0, 0.0, 1.0, 12.0]);
    }

    #[test]
    fn test_phase_one_objective_is_consistent_with_basis() {
        let problem = Problem::minimize(vec![1.0, 1.0])
            .subject_to(vec![1.0, 1.0], Relation::Ge, 10.0)
            .subject_to(vec![1.0, 0.0], Relation::Le, 8.0);
        let (_, tableau) = tableau_for(&problem);

        // columns: x, y, surplus, slack, artificial, rhs
        assert_eq!(tableau.phase(), Phase::One);
        assert_eq!(tableau.basis(), &[4, 3]);
        assert_eq!(tableau.objective_row(), &[-1.0, -1.0, 1.0, 0.0, 0.0, -10.0]);
        assert_eq!(tableau.objective_value(), -10.0);
    }

    #[test]
    fn test_pivot_updates_basis_and_rows() {
        let problem = Problem::maximize(vec![3.0, 5.0])
            .subject_to(vec![1.0, 0.0], Relation::Le, 4.0)
            .subject_to(vec![0.0, 2.0], Relation::Le, 12.0);
        let (_, mut tableau) = tableau_for(&problem);

        tableau.pivot(1, 1);

        assert_eq!(tableau.basis(), &[2, 1]);
        assert_eq!(tableau.grid()[1], vec![0.0, 1.0, 0.0, 0.5, 6.0]);
        assert_eq!(tableau.objective_row(), &[-3.0, 0.0, 0.0, 2.5, 30.0]);
        assert_eq!(tableau.objective_value(), 30.0);
    }

    #[test]
    fn test_install_phase_two_after_pivots() {
        let problem = Problem::minimize(vec![2.0, 3.0]).subject_to(vec![1.0, 1.0], Relation::Ge, 4.0);
        let (form, mut tableau) = tableau_for(&problem);

        // x enters, artificial leaves
        tableau.pivot(0, 0);
        tableau.install_phase_two(&form);

        assert_eq!(tableau.phase(), Phase::Two);
        // max -2x - 3y with x basic: z + y + 2s - 2a = -8
        assert_eq!(tableau.objective_row(), &[0.0, 1.0, 2.0, -2.0, -8.0]);
    }
}
