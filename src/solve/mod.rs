//! Assembling tiling problems and enumerating their solutions

pub mod problem;
pub mod solution;

pub use problem::{EncodingStatistics, SolutionIter, TilingProblem};
pub use solution::Solution;
