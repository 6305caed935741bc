use thiserror::Error;

use crate::problem::{MAX_CONSTRAINTS, MAX_VARIABLES};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Malformed problem: {0}")]
    MalformedProblem(#[from] MalformedProblem),
    #[error("Iteration limit of {limit} exceeded")]
    IterationLimitExceeded { limit: usize },
    #[error("Constraint {constraint} is an equality; its dual variable would be unrestricted in sign")]
    DualUnsupported { constraint: usize },
}

/// Structural problems detected before any pivoting happens
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedProblem {
    #[error("Problem has no variables")]
    NoVariables,
    #[error("Problem has {0} variables, at most {max} are supported", max = MAX_VARIABLES)]
    TooManyVariables(usize),
    #[error("Problem has {0} constraints, at most {max} are supported", max = MAX_CONSTRAINTS)]
    TooManyConstraints(usize),
    #[error("Constraint {constraint} has {found} coefficients, expected {expected}")]
    RowLength {
        constraint: usize,
        expected: usize,
        found: usize,
    },
    #[error("{found} variable names given for {expected} variables")]
    VariableNames { expected: usize, found: usize },
    #[error("Non-finite value in {0}")]
    NonFinite(String),
}
