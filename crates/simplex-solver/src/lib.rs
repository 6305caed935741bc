mod error;
mod problem;
mod simplex;
mod solution;
mod standard_form;
mod tableau;

pub use error::{MalformedProblem, SolverError};
pub use problem::{Constraint, MAX_CONSTRAINTS, MAX_VARIABLES, Problem, Relation, Sense};
pub use simplex::Solver;
pub use solution::{Analysis, ReducedCost, ShadowPrice, Solution, SolutionStatus, Step, Trace};
pub use standard_form::{ColumnKind, StandardForm, StandardRow};
pub use tableau::{Phase, Tableau};
