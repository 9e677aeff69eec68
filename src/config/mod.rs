//! Configuration management

pub mod settings;

pub use settings::{
    CliOverrides, OutputConfig, OutputFormat, PuzzleConfig, RunMode, Settings, SolverConfig,
};
