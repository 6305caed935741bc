use crate::error::{MalformedProblem, SolverError};

/// Largest number of decision variables the solver accepts
pub const MAX_VARIABLES: usize = 20;
/// Largest number of constraints the solver accepts
pub const MAX_CONSTRAINTS: usize = 20;

/// A linear programming problem over non-negative variables
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    /// Whether to maximize or minimize the objective
    pub sense: Sense,
    /// Objective function coefficients, one per variable
    pub objective: Vec<f64>,
    /// Constraints
    #[cfg_attr(feature = "serde", serde(default))]
    pub constraints: Vec<Constraint>,
    /// Optional display names, either empty or one per variable
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub variable_names: Vec<String>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Maximize,
    Minimize,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Name/label for the constraint (for diagnostics)
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Comparison operator
    pub relation: Relation,
    /// Right-hand side value
    pub rhs: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Less than or equal (<=)
    #[cfg_attr(feature = "serde", serde(rename = "<=", alias = "le"))]
    Le,
    /// Greater than or equal (>=)
    #[cfg_attr(feature = "serde", serde(rename = ">=", alias = "ge"))]
    Ge,
    /// Equal (=)
    #[cfg_attr(feature = "serde", serde(rename = "=", alias = "eq"))]
    Eq,
}

impl Relation {
    /// The relation obtained by multiplying both sides by -1
    pub fn flipped(self) -> Self {
        match self {
            Relation::Le => Relation::Ge,
            Relation::Ge => Relation::Le,
            Relation::Eq => Relation::Eq,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Relation::Le => "<=",
            Relation::Ge => ">=",
            Relation::Eq => "=",
        }
    }
}

impl Constraint {
    pub fn new(coefficients: Vec<f64>, relation: Relation, rhs: f64) -> Self {
        Self {
            name: None,
            coefficients,
            relation,
            rhs,
        }
    }

    /// Left-hand side evaluated at `values`
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.coefficients.iter().zip(values).map(|(a, x)| a * x).sum()
    }

    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.lhs(values);
        match self.relation {
            Relation::Le => lhs <= self.rhs + tolerance,
            Relation::Ge => lhs >= self.rhs - tolerance,
            Relation::Eq => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

impl Problem {
    pub fn new(sense: Sense, objective: Vec<f64>) -> Self {
        Self {
            sense,
            objective,
            constraints: Vec::new(),
            variable_names: Vec::new(),
        }
    }

    pub fn maximize(objective: Vec<f64>) -> Self {
        Self::new(Sense::Maximize, objective)
    }

    pub fn minimize(objective: Vec<f64>) -> Self {
        Self::new(Sense::Minimize, objective)
    }

    pub fn with_variable_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.variable_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn add_constraint(&mut self, coefficients: Vec<f64>, relation: Relation, rhs: f64) {
        self.constraints.push(Constraint::new(coefficients, relation, rhs));
    }

    pub fn add_named_constraint(
        &mut self,
        name: impl Into<String>,
        coefficients: Vec<f64>,
        relation: Relation,
        rhs: f64,
    ) {
        self.constraints.push(Constraint {
            name: Some(name.into()),
            coefficients,
            relation,
            rhs,
        });
    }

    /// Builder form of [`Problem::add_constraint`]
    pub fn subject_to(mut self, coefficients: Vec<f64>, relation: Relation, rhs: f64) -> Self {
        self.add_constraint(coefficients, relation, rhs);
        self
    }

    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Display name of variable `j`, `X1`-style unless named
    pub fn variable_name(&self, j: usize) -> String {
        self.variable_names
            .get(j)
            .cloned()
            .unwrap_or_else(|| format!("X{}", j + 1))
    }

    /// Display name of constraint `i`, `C1`-style unless named
    pub fn constraint_name(&self, i: usize) -> String {
        self.constraints
            .get(i)
            .and_then(|c| c.name.clone())
            .unwrap_or_else(|| format!("C{}", i + 1))
    }

    /// Check sizes, row shapes and numeric values
    pub fn validate(&self) -> Result<(), MalformedProblem> {
        let n = self.num_variables();
        if n == 0 {
            return Err(MalformedProblem::NoVariables);
        }
        if n > MAX_VARIABLES {
            return Err(MalformedProblem::TooManyVariables(n));
        }
        if self.num_constraints() > MAX_CONSTRAINTS {
            return Err(MalformedProblem::TooManyConstraints(self.num_constraints()));
        }
        if !self.variable_names.is_empty() && self.variable_names.len() != n {
            return Err(MalformedProblem::VariableNames {
                expected: n,
                found: self.variable_names.len(),
            });
        }
        if self.objective.iter().any(|c| !c.is_finite()) {
            return Err(MalformedProblem::NonFinite("objective".to_string()));
        }

        for (i, c) in self.constraints.iter().enumerate() {
            if c.coefficients.len() != n {
                return Err(MalformedProblem::RowLength {
                    constraint: i,
                    expected: n,
                    found: c.coefficients.len(),
                });
            }
            if !c.rhs.is_finite() || c.coefficients.iter().any(|a| !a.is_finite()) {
                return Err(MalformedProblem::NonFinite(self.constraint_name(i)));
            }
        }

        Ok(())
    }

    /// Objective function evaluated at `values`
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.objective.iter().zip(values).map(|(c, x)| c * x).sum()
    }

    /// True when `values` are non-negative and satisfy every constraint
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        values.len() == self.num_variables()
            && values.iter().all(|&x| x >= -tolerance)
            && self.constraints.iter().all(|c| c.is_satisfied(values, tolerance))
    }

    /// Build the symmetric dual of this problem.
    ///
    /// Rows are first oriented canonically (`<=` for maximization, `>=` for
    /// minimization) by negation. Dual variable `i` belongs to constraint `i`
    /// and dual constraint `j` to variable `j`. Equality rows have no
    /// canonical orientation and are rejected.
    pub fn dual(&self) -> Result<Problem, SolverError> {
        self.validate()?;

        let canonical = match self.sense {
            Sense::Maximize => Relation::Le,
            Sense::Minimize => Relation::Ge,
        };

        let mut rows = Vec::with_capacity(self.num_constraints());
        for (i, c) in self.constraints.iter().enumerate() {
            if c.relation == Relation::Eq {
                return Err(SolverError::DualUnsupported { constraint: i });
            }
            let sign = if c.relation == canonical { 1.0 } else { -1.0 };
            let coefficients: Vec<f64> = c.coefficients.iter().map(|a| sign * a).collect();
            rows.push((coefficients, sign * c.rhs));
        }

        let (sense, relation) = match self.sense {
            Sense::Maximize => (Sense::Minimize, Relation::Ge),
            Sense::Minimize => (Sense::Maximize, Relation::Le),
        };

        let mut dual = Problem::new(sense, rows.iter().map(|(_, rhs)| *rhs).collect());
        dual.variable_names = (0..self.num_constraints())
            .map(|i| format!("Y_{}", self.constraint_name(i)))
            .collect();

        for (j, &cost) in self.objective.iter().enumerate() {
            let column = rows.iter().map(|(coefficients, _)| coefficients[j]).collect();
            dual.add_named_constraint(self.variable_name(j), column, relation, cost);
        }

        Ok(dual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_well_formed() {
        let problem = Problem::maximize(vec![3.0, 5.0])
            .subject_to(vec![1.0, 0.0], Relation::Le, 4.0)
            .subject_to(vec![0.0, 2.0], Relation::Le, 12.0);
        assert_eq!(problem.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_shape_errors() {
        let problem = Problem::maximize(vec![1.0, 1.0]).subject_to(vec![1.0], Relation::Le, 4.0);
        assert_eq!(
            problem.validate(),
            Err(MalformedProblem::RowLength {
                constraint: 0,
                expected: 2,
                found: 1
            })
        );

        assert_eq!(Problem::minimize(vec![]).validate(), Err(MalformedProblem::NoVariables));

        let named = Problem::maximize(vec![1.0, 2.0]).with_variable_names(["a"]);
        assert_eq!(
            named.validate(),
            Err(MalformedProblem::VariableNames { expected: 2, found: 1 })
        );
    }

    #[test]
    fn test_validate_rejects_size_limits() {
        let wide = Problem::maximize(vec![1.0; MAX_VARIABLES + 1]);
        assert_eq!(wide.validate(), Err(MalformedProblem::TooManyVariables(21)));

        let mut tall = Problem::maximize(vec![1.0]);
        for _ in 0..=MAX_CONSTRAINTS {
            tall.add_constraint(vec![1.0], Relation::Le, 1.0);
        }
        assert_eq!(tall.validate(), Err(MalformedProblem::TooManyConstraints(21)));
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let problem = Problem::maximize(vec![1.0]).subject_to(vec![f64::NAN], Relation::Le, 1.0);
        assert_eq!(problem.validate(), Err(MalformedProblem::NonFinite("C1".to_string())));

        let problem = Problem::maximize(vec![f64::INFINITY]);
        assert_eq!(problem.validate(), Err(MalformedProblem::NonFinite("objective".to_string())));
    }

    #[test]
    fn test_feasibility_check() {
        let problem = Problem::minimize(vec![1.0, 1.0])
            .subject_to(vec![1.0, 1.0], Relation::Ge, 10.0)
            .subject_to(vec![1.0, -1.0], Relation::Eq, 0.0);

        assert!(problem.is_feasible(&[5.0, 5.0], 1e-9));
        assert!(!problem.is_feasible(&[4.0, 4.0], 1e-9));
        assert!(!problem.is_feasible(&[-1.0, 11.0], 1e-9));
        assert_eq!(problem.evaluate(&[5.0, 5.0]), 10.0);
    }

    #[test]
    fn test_dual_of_maximization() {
        // max 3x + 5y, x <= 4, 2y <= 12, 3x + 2y >= -18 (negated into <= 18)
        let problem = Problem::maximize(vec![3.0, 5.0])
            .with_variable_names(["x", "y"])
            .subject_to(vec![1.0, 0.0], Relation::Le, 4.0)
            .subject_to(vec![0.0, 2.0], Relation::Le, 12.0)
            .subject_to(vec![-3.0, -2.0], Relation::Ge, -18.0);

        let dual = problem.dual().unwrap();
        assert_eq!(dual.sense, Sense::Minimize);
        assert_eq!(dual.objective, vec![4.0, 12.0, 18.0]);
        assert_eq!(dual.num_constraints(), 2);
        assert_eq!(dual.constraints[0].coefficients, vec![1.0, 0.0, 3.0]);
        assert_eq!(dual.constraints[0].relation, Relation::Ge);
        assert_eq!(dual.constraints[0].rhs, 3.0);
        assert_eq!(dual.constraints[1].name.as_deref(), Some("y"));
        assert_eq!(dual.variable_name(2), "Y_C3");
    }

    #[test]
    fn test_dual_rejects_equality() {
        let problem = Problem::minimize(vec![1.0]).subject_to(vec![1.0], Relation::Eq, 2.0);
        assert_eq!(problem.dual(), Err(SolverError::DualUnsupported { constraint: 0 }));
    }
}
