//! Polyomino Tiling SAT Solver
//!
//! This library reduces polyomino tiling puzzles to propositional
//! satisfiability: placements are enumerated geometrically, compiled into a
//! CNF theory, and handed to a SAT oracle; models are decoded back into
//! tilings and enumerated via blocking clauses.

pub mod config;
pub mod error;
pub mod puzzle;
pub mod sat;
pub mod solve;
pub mod utils;

pub use config::Settings;
pub use error::PuzzleError;
pub use solve::{Solution, TilingProblem};

use anyhow::{Context, Result};
use config::RunMode;
use puzzle::{Board, Instance, Shape};
use sat::theory::Clause;
use solve::EncodingStatistics;
use std::path::Path;

/// Outcome of one solve run.
pub struct SolveReport {
    pub board: Board,
    pub piece_names: Vec<String>,
    pub statistics: EncodingStatistics,
    /// Solutions collected for display; empty in count-only mode.
    pub solutions: Vec<Solution>,
    /// Total number of solutions found (may exceed `solutions.len()`).
    pub num_solutions: usize,
    /// Whether the solution set was exhausted (false when a cap or
    /// find-first stopped the search early).
    pub exhausted: bool,
}

/// Main entry point: load the puzzle, compile the theory, and run the
/// oracle according to the configured mode.
pub fn solve(settings: &Settings) -> Result<SolveReport> {
    let board = match &settings.puzzle.board_file {
        Some(path) => puzzle::load_board_from_file(path)?,
        None => puzzle::default_board()?,
    };
    let shapes = match &settings.puzzle.pieces_file {
        Some(path) => puzzle::load_shapes_from_file(path)?,
        None => puzzle::default_shapes()?,
    };
    let instance = Instance::from_labels(&board, &shapes, &settings.puzzle.targets)?;

    let problem = TilingProblem::new(
        board.clone(),
        shapes.clone(),
        instance,
        &settings.theory,
    )?;
    let statistics = problem.statistics();

    let keep = match settings.solver.mode {
        RunMode::FindFirst => Some(1),
        RunMode::CountOnly => Some(0),
        RunMode::Enumerate => settings.solver.max_solutions,
    };
    let stop_after = match settings.solver.mode {
        RunMode::FindFirst => Some(1),
        RunMode::CountOnly => None,
        RunMode::Enumerate => settings.solver.max_solutions,
    };

    let mut solutions = Vec::new();
    let mut num_solutions = 0;
    let mut iter = problem.solutions();
    let mut exhausted = true;
    for result in iter.by_ref() {
        let solution = result?;
        if keep.is_none_or(|k| solutions.len() < k) {
            solutions.push(solution);
        }
        num_solutions += 1;
        if stop_after.is_some_and(|cap| num_solutions >= cap) {
            exhausted = false;
            break;
        }
    }

    if let Some(directory) = &settings.output.dimacs_directory {
        dump_artifacts(
            directory,
            problem.theory(),
            iter.blocking_clauses(),
            num_solutions,
            exhausted,
        )?;
    }

    Ok(SolveReport {
        board,
        piece_names: shapes.iter().map(|s| s.name().to_string()).collect(),
        statistics,
        solutions,
        num_solutions,
        exhausted,
    })
}

/// Write the DIMACS artifacts for a finished run: the base formula, and,
/// after exhaustive enumeration, a single-model variant (all models but
/// one blocked) and the unsatisfiable variant (all models blocked) whose
/// unsatisfiability certifies the enumeration was complete.
fn dump_artifacts(
    directory: &Path,
    theory: &sat::Theory,
    blocking: &[Vec<i32>],
    num_solutions: usize,
    exhausted: bool,
) -> Result<()> {
    let base_name = if num_solutions == 0 {
        "instance_UNSAT.cnf"
    } else {
        "instance_SAT_multiModel.cnf"
    };
    sat::save_dimacs(directory.join(base_name), theory.num_vars, &theory.clauses)
        .context("Failed to dump base DIMACS instance")?;

    if num_solutions > 0 && exhausted {
        let mut clauses = theory.clauses.clone();
        for clause in &blocking[..blocking.len() - 1] {
            clauses.push(Clause::new(clause.clone()));
        }
        sat::save_dimacs(
            directory.join("instance_SAT_singleModel.cnf"),
            theory.num_vars,
            &clauses,
        )
        .context("Failed to dump single-model DIMACS instance")?;

        if let Some(last) = blocking.last() {
            clauses.push(Clause::new(last.clone()));
        }
        sat::save_dimacs(
            directory.join("instance_UNSAT.cnf"),
            theory.num_vars,
            &clauses,
        )
        .context("Failed to dump unsatisfiable DIMACS instance")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{OutputFormat, RunMode};

    fn default_settings() -> Settings {
        let mut settings = Settings::default();
        settings.puzzle.targets = vec!["jan".into(), "1".into(), "wed".into()];
        settings
    }

    #[test]
    fn test_find_first_on_default_puzzle() {
        let settings = default_settings();
        let report = solve(&settings).unwrap();
        assert_eq!(report.solutions.len(), report.num_solutions.min(1));
        assert!(!report.exhausted || report.num_solutions == 0);
        assert_eq!(report.piece_names.len(), 10);
        assert_eq!(report.statistics.num_pieces, 10);
    }

    #[test]
    fn test_missing_target_label_is_an_error() {
        let mut settings = Settings::default();
        settings.puzzle.targets = vec!["notalabel".into()];
        assert!(solve(&settings).is_err());
    }

    #[test]
    fn test_dump_artifacts_for_exhaustive_run() {
        // Tiny synthetic puzzle files so enumeration is exhaustive and fast.
        let dir = tempfile::tempdir().unwrap();
        let board_path = dir.path().join("board.txt");
        let pieces_path = dir.path().join("pieces.txt");
        std::fs::write(&board_path, "a b c d\n").unwrap();
        std::fs::write(&pieces_path, "p\n##\n\nq\n##\n").unwrap();

        let mut settings = Settings::default();
        settings.puzzle.board_file = Some(board_path);
        settings.puzzle.pieces_file = Some(pieces_path);
        settings.solver.mode = RunMode::CountOnly;
        settings.output.format = OutputFormat::Text;
        settings.output.dimacs_directory = Some(dir.path().join("dimacs"));

        let report = solve(&settings).unwrap();
        assert_eq!(report.num_solutions, 2);
        assert!(report.exhausted);
        assert!(report.solutions.is_empty());

        let dumped = settings.output.dimacs_directory.as_ref().unwrap();
        let base = std::fs::read_to_string(dumped.join("instance_SAT_multiModel.cnf")).unwrap();
        let single = std::fs::read_to_string(dumped.join("instance_SAT_singleModel.cnf")).unwrap();
        let unsat = std::fs::read_to_string(dumped.join("instance_UNSAT.cnf")).unwrap();
        assert!(base.starts_with("p cnf "));
        // One extra blocking clause per stage.
        assert_eq!(single.lines().count(), base.lines().count() + 1);
        assert_eq!(unsat.lines().count(), single.lines().count() + 1);
    }
}
