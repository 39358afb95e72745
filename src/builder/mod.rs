//! Construction heuristics that write a first feasible closed tour into an
//! already-loaded routing graph (spec sections 4.2 and 4.3).

pub mod greedy;
pub mod surplus_deficit;

/// Which constructor `solve` should run (spec section 6: `builder ∈ {M1, M2}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builder {
    Greedy,
    SurplusDeficit,
}
