//! Configuration settings for the tiling solver

use crate::sat::theory::TheoryConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub puzzle: PuzzleConfig,
    #[serde(default)]
    pub theory: TheoryConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the board and pieces come from, and which cells stay uncovered.
/// Absent files fall back to the built-in calendar fixtures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PuzzleConfig {
    pub board_file: Option<PathBuf>,
    pub pieces_file: Option<PathBuf>,
    /// Target cell labels, matched case-insensitively against the board.
    #[serde(default)]
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverConfig {
    #[serde(default)]
    pub mode: RunMode,
    /// Enumeration cap; `None` enumerates exhaustively.
    #[serde(default)]
    pub max_solutions: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Stop at the first solution.
    #[default]
    FindFirst,
    /// Exhaust the solution set and report only the count.
    CountOnly,
    /// Collect solutions up to `max_solutions`.
    Enumerate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_true")]
    pub show_solutions: bool,
    /// Directory for DIMACS dump artifacts; `None` disables dumping.
    #[serde(default)]
    pub dimacs_directory: Option<PathBuf>,
    /// Directory to save rendered solutions into; `None` prints only.
    #[serde(default)]
    pub output_directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn default_true() -> bool {
    true
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::FindFirst,
            max_solutions: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            show_solutions: true,
            dimacs_directory: None,
            output_directory: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            puzzle: PuzzleConfig::default(),
            theory: TheoryConfig::default(),
            solver: SolverConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.solver.max_solutions == Some(0) {
            anyhow::bail!("Maximum solutions must be positive");
        }

        if let Some(ref board_file) = self.puzzle.board_file {
            if !board_file.exists() {
                anyhow::bail!("Board file does not exist: {}", board_file.display());
            }
        }
        if let Some(ref pieces_file) = self.puzzle.pieces_file {
            if !pieces_file.exists() {
                anyhow::bail!("Pieces file does not exist: {}", pieces_file.display());
            }
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) -> Result<()> {
        if !cli_overrides.targets.is_empty() {
            self.puzzle.targets = cli_overrides.targets.clone();
        }
        if let Some(mode) = cli_overrides.mode {
            self.solver.mode = mode;
        }
        if let Some(max_solutions) = cli_overrides.max_solutions {
            self.solver.max_solutions = Some(max_solutions);
        }
        if let Some(ref board_file) = cli_overrides.board_file {
            self.puzzle.board_file = Some(board_file.clone());
        }
        if let Some(ref pieces_file) = cli_overrides.pieces_file {
            self.puzzle.pieces_file = Some(pieces_file.clone());
        }
        if let Some(ref dimacs_dir) = cli_overrides.dimacs_directory {
            self.output.dimacs_directory = Some(dimacs_dir.clone());
        }
        if let Some(ref output_dir) = cli_overrides.output_directory {
            self.output.output_directory = Some(output_dir.clone());
        }
        if cli_overrides.json {
            self.output.format = OutputFormat::Json;
        }
        self.theory
            .apply_overrides(&cli_overrides.components)
            .context("Invalid component override")?;
        Ok(())
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub targets: Vec<String>,
    pub mode: Option<RunMode>,
    pub max_solutions: Option<usize>,
    pub board_file: Option<PathBuf>,
    pub pieces_file: Option<PathBuf>,
    pub dimacs_directory: Option<PathBuf>,
    pub output_directory: Option<PathBuf>,
    pub json: bool,
    /// Component toggles of the form `+ID` / `-ID`, e.g. `-I.2`, `+T.4`.
    pub components: Vec<String>,
}
