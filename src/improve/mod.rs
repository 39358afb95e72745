//! Local-search improvers: 2-opt and 3-opt, both re-checking load
//! feasibility before accepting a move (spec sections 4.4 and 4.5).

pub mod three_opt;
pub mod two_opt;

/// Which improvers `solve` should run, and in what order (spec section 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Improver {
    TwoOpt,
    ThreeOpt,
}
