//! SAT reduction: variables, theory components, oracle adapter, DIMACS

pub mod dimacs;
pub mod solver;
pub mod theory;
pub mod variables;

pub use dimacs::{parse_dimacs, save_dimacs, to_dimacs};
pub use solver::{Assignment, SatSolver};
pub use theory::{Clause, Component, Theory, TheoryBuilder, TheoryConfig};
pub use variables::VariableAllocator;
