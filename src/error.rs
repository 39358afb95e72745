use thiserror::Error;

/// Error taxonomy surfaced by the solver core.
///
/// These are treated as programmer errors (bad instance data, a caller
/// mutating the graph in an invalid sequence) rather than recoverable
/// conditions — there is no retry path, and callers are expected to fail
/// the whole solve.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    #[error("invalid edge operation: {0}")]
    InvalidEdgeOp(String),

    #[error("constructor could not find a feasible next step: {0}")]
    UnsolvableWithHeuristic(String),

    #[error("infeasible tour: {0}")]
    InfeasibleTour(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;
