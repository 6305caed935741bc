use crate::error::MalformedProblem;
use crate::problem::{Problem, Relation, Sense};

/// What a tableau column stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Decision variable `j` of the original problem
    Structural(usize),
    /// Slack of constraint `i` (a `<=` row)
    Slack(usize),
    /// Surplus of constraint `i` (a `>=` row)
    Surplus(usize),
    /// Artificial variable of constraint `i` (a `>=` or `=` row)
    Artificial(usize),
}

/// A constraint row in equality form with non-negative right-hand side
#[derive(Debug, Clone)]
pub struct StandardRow {
    /// One coefficient per column, constant column excluded
    pub coefficients: Vec<f64>,
    pub rhs: f64,
    /// Relation after sign normalization
    pub relation: Relation,
    /// Whether the row was multiplied by -1 to make the rhs non-negative
    pub negated: bool,
    /// Slack or surplus column
    pub auxiliary: Option<usize>,
    pub artificial: Option<usize>,
    /// Column holding the initial basic variable for this row
    pub basic: usize,
}

/// Canonical equality form of a [`Problem`], always maximizing internally
#[derive(Debug, Clone)]
pub struct StandardForm {
    pub sense: Sense,
    /// Internal maximization objective over structural columns
    pub objective: Vec<f64>,
    pub rows: Vec<StandardRow>,
    pub columns: Vec<ColumnKind>,
    pub n_structural: usize,
    pub n_auxiliary: usize,
    pub n_artificial: usize,
}

impl StandardForm {
    pub fn build(problem: &Problem) -> Result<Self, MalformedProblem> {
        problem.validate()?;

        let n_structural = problem.num_variables();

        // Normalize signs first so every row knows which auxiliaries it needs
        let normalized: Vec<(Vec<f64>, f64, Relation, bool)> = problem
            .constraints
            .iter()
            .map(|c| {
                if c.rhs < 0.0 {
                    let coefficients = c.coefficients.iter().map(|a| -a).collect();
                    (coefficients, -c.rhs, c.relation.flipped(), true)
                } else {
                    (c.coefficients.clone(), c.rhs, c.relation, false)
                }
            })
            .collect();

        let mut n_auxiliary = 0;
        let mut n_artificial = 0;
        for (_, _, relation, _) in &normalized {
            match relation {
                Relation::Le => n_auxiliary += 1,
                Relation::Ge => {
                    n_auxiliary += 1; // surplus
                    n_artificial += 1;
                }
                Relation::Eq => n_artificial += 1,
            }
        }

        let n_columns = n_structural + n_auxiliary + n_artificial;
        let mut columns: Vec<ColumnKind> = (0..n_structural).map(ColumnKind::Structural).collect();
        columns.resize(n_columns, ColumnKind::Structural(0));

        let mut auxiliary_idx = n_structural;
        let mut artificial_idx = n_structural + n_auxiliary;
        let mut rows = Vec::with_capacity(normalized.len());

        for (i, (coefficients, rhs, relation, negated)) in normalized.into_iter().enumerate() {
            let mut full = vec![0.0; n_columns];
            full[..n_structural].copy_from_slice(&coefficients);

            let (auxiliary, artificial, basic) = match relation {
                Relation::Le => {
                    full[auxiliary_idx] = 1.0;
                    columns[auxiliary_idx] = ColumnKind::Slack(i);
                    auxiliary_idx += 1;
                    (Some(auxiliary_idx - 1), None, auxiliary_idx - 1)
                }
                Relation::Ge => {
                    full[auxiliary_idx] = -1.0;
                    columns[auxiliary_idx] = ColumnKind::Surplus(i);
                    auxiliary_idx += 1;
                    full[artificial_idx] = 1.0;
                    columns[artificial_idx] = ColumnKind::Artificial(i);
                    artificial_idx += 1;
                    (Some(auxiliary_idx - 1), Some(artificial_idx - 1), artificial_idx - 1)
                }
                Relation::Eq => {
                    full[artificial_idx] = 1.0;
                    columns[artificial_idx] = ColumnKind::Artificial(i);
                    artificial_idx += 1;
                    (None, Some(artificial_idx - 1), artificial_idx - 1)
                }
            };

            rows.push(StandardRow {
                coefficients: full,
                rhs,
                relation,
                negated,
                auxiliary,
                artificial,
                basic,
            });
        }

        // The engine always maximizes
        let objective = match problem.sense {
            Sense::Maximize => problem.objective.clone(),
            Sense::Minimize => problem.objective.iter().map(|c| -c).collect(),
        };

        Ok(Self {
            sense: problem.sense,
            objective,
            rows,
            columns,
            n_structural,
            n_auxiliary,
            n_artificial,
        })
    }

    /// Number of variable columns, constant column excluded
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn has_artificial(&self) -> bool {
        self.n_artificial > 0
    }

    pub fn is_artificial(&self, col: usize) -> bool {
        matches!(self.columns.get(col), Some(ColumnKind::Artificial(_)))
    }

    /// True when the objective was negated to turn minimization into maximization
    pub fn sign_flipped(&self) -> bool {
        self.sense == Sense::Minimize
    }

    /// Header labels for every column plus the constant column
    pub fn column_labels(&self, problem: &Problem) -> Vec<String> {
        let mut auxiliary = 0;
        let mut artificial = 0;
        let mut labels: Vec<String> = self
            .columns
            .iter()
            .map(|kind| match kind {
                ColumnKind::Structural(j) => problem.variable_name(*j),
                ColumnKind::Slack(_) | ColumnKind::Surplus(_) => {
                    auxiliary += 1;
                    format!("S{}", auxiliary)
                }
                ColumnKind::Artificial(_) => {
                    artificial += 1;
                    format!("A{}", artificial)
                }
            })
            .collect();
        labels.push("RHS".to_string());
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_le_rows_get_slack_only() {
        let problem = Problem::maximize(vec![3.0, 5.0])
            .subject_to(vec![1.0, 0.0], Relation::Le, 4.0)
            .subject_to(vec![3.0, 2.0], Relation::Le, 18.0);
        let form = StandardForm::build(&problem).unwrap();

        assert_eq!(form.num_columns(), 4);
        assert!(!form.has_artificial());
        assert_eq!(form.rows[0].coefficients, vec![1.0, 0.0, 1.0, 0.0]);
        assert_eq!(form.rows[1].coefficients, vec![3.0, 2.0, 0.0, 1.0]);
        assert_eq!(form.rows[1].basic, 3);
        assert_eq!(form.objective, vec![3.0, 5.0]);
    }

    #[test]
    fn test_ge_and_eq_rows_get_artificials() {
        let problem = Problem::minimize(vec![1.0, 1.0])
            .subject_to(vec![1.0, 1.0], Relation::Ge, 10.0)
            .subject_to(vec![1.0, 0.0], Relation::Le, 8.0)
            .subject_to(vec![1.0, -1.0], Relation::Eq, 2.0);
        let form = StandardForm::build(&problem).unwrap();

        // x, y | surplus, slack | two artificials
        assert_eq!(form.n_auxiliary, 2);
        assert_eq!(form.n_artificial, 2);
        assert_eq!(
            form.columns,
            vec![
                ColumnKind::Structural(0),
                ColumnKind::Structural(1),
                ColumnKind::Surplus(0),
                ColumnKind::Slack(1),
                ColumnKind::Artificial(0),
                ColumnKind::Artificial(2),
            ]
        );
        assert_eq!(form.rows[0].coefficients, vec![1.0, 1.0, -1.0, 0.0, 1.0, 0.0]);
        assert_eq!(form.rows[0].basic, 4);
        assert_eq!(form.rows[2].basic, 5);
        assert_eq!(form.objective, vec![-1.0, -1.0]);
        assert!(form.sign_flipped());
        assert!(form.is_artificial(5));
        assert!(!form.is_artificial(3));
    }

    #[test]
    fn test_negative_rhs_flips_relation() {
        // -x - y <= -10 is x + y >= 10
        let problem = Problem::minimize(vec![1.0, 1.0]).subject_to(vec![-1.0, -1.0], Relation::Le, -10.0);
        let form = StandardForm::build(&problem).unwrap();

        let row = &form.rows[0];
        assert!(row.negated);
        assert_eq!(row.relation, Relation::Ge);
        assert_eq!(row.rhs, 10.0);
        assert_eq!(row.coefficients, vec![1.0, 1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_column_labels() {
        let problem = Problem::maximize(vec![1.0, 2.0])
            .with_variable_names(["corn", "soy"])
            .subject_to(vec![1.0, 1.0], Relation::Le, 4.0)
            .subject_to(vec![1.0, 0.0], Relation::Ge, 1.0);
        let form = StandardForm::build(&problem).unwrap();

        assert_eq!(form.column_labels(&problem), vec!["corn", "soy", "S1", "S2", "A1", "RHS"]);
    }

    #[test]
    fn test_build_rejects_malformed() {
        let problem = Problem::maximize(vec![1.0, 2.0]).subject_to(vec![1.0, 2.0, 3.0], Relation::Le, 4.0);
        assert!(matches!(
            StandardForm::build(&problem),
            Err(MalformedProblem::RowLength { constraint: 0, .. })
        ));
    }
}
