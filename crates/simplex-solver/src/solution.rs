use crate::problem::{Problem, Relation};
use crate::standard_form::StandardForm;
use crate::tableau::{Phase, Tableau};

/// The result of solving an LP problem
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Solution status
    pub status: SolutionStatus,
    /// Optimal values for each variable (optimal only)
    pub values: Option<Vec<f64>>,
    /// Optimal objective value in the problem's own sense (optimal only)
    pub objective_value: Option<f64>,
    /// Pivots performed over both phases
    pub iterations: usize,
    /// What the final tableau says about the optimum (optimal only)
    pub analysis: Option<Analysis>,
    /// Every intermediate tableau, when tracing is enabled
    pub trace: Option<Trace>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The problem is infeasible (no solution exists)
    Infeasible,
    /// The problem is unbounded
    Unbounded,
}

/// Dual information read directly off the optimal tableau
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Shadow prices (dual values) for each constraint.
    /// Change in the objective per unit increase of the constraint's rhs.
    pub shadow_prices: Vec<ShadowPrice>,

    /// Reduced costs for each variable
    pub reduced_costs: Vec<ReducedCost>,

    /// Which constraints are binding (tight) at optimum
    pub binding_constraints: Vec<String>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowPrice {
    /// Constraint name
    pub constraint: String,
    /// Shadow price value
    pub value: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedCost {
    /// Variable name
    pub variable: String,
    /// Current value in solution
    pub value: f64,
    /// How far the objective coefficient must improve before the variable enters
    pub reduced_cost: f64,
    /// Is this variable in the basis?
    pub is_basic: bool,
}

/// Recorded tableau states of one solve
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    /// One label per tableau column, constant column last
    pub column_labels: Vec<String>,
    pub steps: Vec<Step>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub phase: Phase,
    /// Pivots performed before this state was recorded
    pub iteration: usize,
    /// `(row, column)` of the pivot that produced this state
    pub pivot: Option<(usize, usize)>,
    pub basis: Vec<usize>,
    /// Constraint rows followed by the objective row
    pub grid: Vec<Vec<f64>>,
}

impl Solution {
    pub fn infeasible(iterations: usize) -> Self {
        Self::terminal(SolutionStatus::Infeasible, iterations)
    }

    pub fn unbounded(iterations: usize) -> Self {
        Self::terminal(SolutionStatus::Unbounded, iterations)
    }

    fn terminal(status: SolutionStatus, iterations: usize) -> Self {
        Self {
            status,
            values: None,
            objective_value: None,
            iterations,
            analysis: None,
            trace: None,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    /// Value of variable `j`, if optimal
    pub fn value(&self, j: usize) -> Option<f64> {
        self.values.as_ref().and_then(|v| v.get(j).copied())
    }

    /// Read the solution off an optimal tableau
    pub(crate) fn from_optimal(
        problem: &Problem,
        form: &StandardForm,
        tableau: &Tableau,
        iterations: usize,
        tolerance: f64,
    ) -> Self {
        let mut values = vec![0.0; form.n_structural];
        for (row, &basic) in tableau.basis().iter().enumerate() {
            if basic < form.n_structural {
                values[basic] = snap(tableau.rhs(row), tolerance);
            }
        }

        let objective_value = if form.sign_flipped() {
            -tableau.objective_value()
        } else {
            tableau.objective_value()
        };

        Self {
            status: SolutionStatus::Optimal,
            analysis: Some(analyze(problem, form, tableau, &values, tolerance)),
            values: Some(values),
            objective_value: Some(objective_value),
            iterations,
            trace: None,
        }
    }
}

/// Round residue within `tolerance` of zero to exactly zero
fn snap(value: f64, tolerance: f64) -> f64 {
    if value.abs() <= tolerance { 0.0 } else { value }
}

fn analyze(problem: &Problem, form: &StandardForm, tableau: &Tableau, values: &[f64], tolerance: f64) -> Analysis {
    let obj = tableau.objective_row();
    let basis = tableau.basis();

    let mut shadow_prices = Vec::with_capacity(form.rows.len());
    let mut binding_constraints = Vec::new();

    for (i, row) in form.rows.iter().enumerate() {
        // Slack and artificial columns start as +e_i, surplus columns as -e_i
        let internal = match (row.relation, row.auxiliary, row.artificial) {
            (Relation::Le, Some(slack), _) => obj[slack],
            (Relation::Ge, Some(surplus), _) => -obj[surplus],
            (_, _, Some(artificial)) => obj[artificial],
            _ => 0.0,
        };
        let mut value = if row.negated { -internal } else { internal };
        if form.sign_flipped() {
            value = -value;
        }
        shadow_prices.push(ShadowPrice {
            constraint: problem.constraint_name(i),
            value: snap(value, tolerance),
        });

        let binding = match row.auxiliary {
            None => true,
            Some(col) => match basis.iter().position(|&b| b == col) {
                None => true,
                Some(r) => tableau.rhs(r).abs() <= tolerance,
            },
        };
        if binding {
            binding_constraints.push(problem.constraint_name(i));
        }
    }

    let reduced_costs = (0..form.n_structural)
        .map(|j| {
            let is_basic = basis.contains(&j);
            ReducedCost {
                variable: problem.variable_name(j),
                value: values[j],
                reduced_cost: if is_basic { 0.0 } else { snap(obj[j], tolerance) },
                is_basic,
            }
        })
        .collect();

    Analysis {
        shadow_prices,
        reduced_costs,
        binding_constraints,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_terminal_solutions_carry_no_values() {
        let solution = Solution::infeasible(3);
        assert_eq!(solution.status, SolutionStatus::Infeasible);
        assert_eq!(solution.iterations, 3);
        assert!(solution.values.is_none());
        assert!(solution.objective_value.is_none());
        assert!(solution.analysis.is_none());
        assert_eq!(solution.value(0), None);

        let solution = Solution::unbounded(1);
        assert_eq!(solution.status, SolutionStatus::Unbounded);
        assert!(!solution.is_optimal());
    }

    #[test]
    fn test_extract_from_hand_pivoted_tableau() {
        // max 3x + 5y, x <= 4, 2y <= 12, 3x + 2y <= 18
        let problem = Problem::maximize(vec![3.0, 5.0])
            .subject_to(vec![1.0, 0.0], Relation::Le, 4.0)
            .subject_to(vec![0.0, 2.0], Relation::Le, 12.0)
            .subject_to(vec![3.0, 2.0], Relation::Le, 18.0);
        let form = StandardForm::build(&problem).unwrap();
        let mut tableau = Tableau::new(&form);
        tableau.pivot(1, 1);
        tableau.pivot(2, 0);

        let solution = Solution::from_optimal(&problem, &form, &tableau, 2, 1e-9);
        let values = solution.values.clone().unwrap();
        assert_abs_diff_eq!(values[0], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(values[1], 6.0, epsilon = 1e-9);
        assert_abs_diff_eq!(solution.objective_value.unwrap(), 36.0, epsilon = 1e-9);

        let analysis = solution.analysis.unwrap();
        let prices: Vec<f64> = analysis.shadow_prices.iter().map(|p| p.value).collect();
        assert_abs_diff_eq!(prices[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(prices[1], 1.5, epsilon = 1e-9);
        assert_abs_diff_eq!(prices[2], 1.0, epsilon = 1e-9);
        assert_eq!(analysis.binding_constraints, vec!["C2", "C3"]);
        assert!(analysis.reduced_costs.iter().all(|rc| rc.is_basic));
    }
}
