//! Utility modules

pub mod display;

pub use display::{BoardRenderer, ColorOutput, SolutionFormatter};
