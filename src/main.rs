//! Main CLI application for the polyomino tiling SAT solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use polyomino_sat::{
    config::{CliOverrides, OutputFormat, RunMode, Settings},
    puzzle::{DEFAULT_BOARD, DEFAULT_PIECES},
    utils::{ColorOutput, SolutionFormatter},
};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "polyomino_sat")]
#[command(about = "Polyomino Tiling SAT Solver")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a tiling instance
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Labels of the cells to leave uncovered (overrides config)
        targets: Vec<String>,

        /// Board file (overrides config)
        #[arg(short, long)]
        board: Option<PathBuf>,

        /// Pieces file (overrides config)
        #[arg(short, long)]
        pieces: Option<PathBuf>,

        /// Enumerate all solutions and report the count
        #[arg(long)]
        count: bool,

        /// Maximum solutions to collect (implies enumeration)
        #[arg(short, long)]
        max_solutions: Option<usize>,

        /// Enable an optional theory component (e.g. T.4, E.1.2)
        #[arg(long = "enable", value_name = "ID")]
        enable: Vec<String>,

        /// Disable an optional theory component (e.g. I.2, E.2.2)
        #[arg(long = "disable", value_name = "ID")]
        disable: Vec<String>,

        /// Dump DIMACS instances to this directory
        #[arg(short, long)]
        dump: Option<PathBuf>,

        /// Save rendered solutions to this directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit solutions as JSON
        #[arg(long)]
        json: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create example configuration and puzzle files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            config,
            targets,
            board,
            pieces,
            count,
            max_solutions,
            enable,
            disable,
            dump,
            output,
            json,
            verbose,
        } => {
            let mode = if max_solutions.is_some() {
                Some(RunMode::Enumerate)
            } else if count {
                Some(RunMode::CountOnly)
            } else {
                None
            };
            let components = enable
                .iter()
                .map(|id| format!("+{}", id))
                .chain(disable.iter().map(|id| format!("-{}", id)))
                .collect();
            let overrides = CliOverrides {
                targets,
                mode,
                max_solutions,
                board_file: board,
                pieces_file: pieces,
                dimacs_directory: dump,
                output_directory: output,
                json,
                components,
            };
            solve_command(config, overrides, verbose)
        }
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn solve_command(config_path: PathBuf, overrides: CliOverrides, verbose: bool) -> Result<()> {
    // Load configuration
    let mut settings = if config_path.exists() {
        Settings::from_file(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        Settings::default()
    };
    settings.merge_with_cli(&overrides)?;
    settings.validate().context("Configuration validation failed")?;

    if verbose {
        println!("Configuration:");
        println!("  Targets: {}", settings.puzzle.targets.join(" "));
        println!("  Mode: {:?}", settings.solver.mode);
        println!("  Theory: {:?}", settings.theory);
        println!();
    }

    let start_time = Instant::now();
    let report = polyomino_sat::solve(&settings).context("Failed to solve tiling instance")?;
    let total_time = start_time.elapsed();

    if verbose {
        println!("{}", report.statistics);
    }

    if report.num_solutions == 0 {
        println!("{}", ColorOutput::warning("No solution found"));
        return Ok(());
    }

    let bound = if report.exhausted { "=" } else { "≥" };
    println!(
        "{}",
        ColorOutput::success(&format!(
            "|solutions| {} {} ({:.3}s)",
            bound,
            report.num_solutions,
            total_time.as_secs_f64()
        ))
    );

    if settings.output.show_solutions {
        match settings.output.format {
            OutputFormat::Text => {
                for (i, solution) in report.solutions.iter().enumerate() {
                    println!();
                    println!(
                        "{}",
                        SolutionFormatter::format_solution(&report.board, solution, i + 1)
                    );
                    if verbose {
                        println!(
                            "{}",
                            SolutionFormatter::format_placements(
                                &report.board,
                                &report.piece_names,
                                solution
                            )
                        );
                    }
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&report.solutions)?);
            }
        }
    }

    if let Some(ref output_dir) = settings.output.output_directory {
        SolutionFormatter::save_solutions(
            &report.board,
            &report.solutions,
            output_dir,
            &settings.output.format,
        )
        .context("Failed to save solutions")?;
        println!(
            "{}",
            ColorOutput::info(&format!("Solutions saved to {}", output_dir.display()))
        );
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    let config_dir = directory.join("config");
    let puzzle_dir = directory.join("puzzles");

    for dir in [&config_dir, &puzzle_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    // Default configuration
    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    // Built-in calendar puzzle as editable files
    for (name, content) in [("board.txt", DEFAULT_BOARD), ("pieces.txt", DEFAULT_PIECES)] {
        let path = puzzle_dir.join(name);
        if !path.exists() || force {
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Created: {}", path.display());
        } else {
            println!("Skipped: {} (already exists)", path.display());
        }
    }

    // Example configuration: exhaustive enumeration with a minimal theory
    let mut enumerate_config = Settings::default();
    enumerate_config.solver.mode = RunMode::Enumerate;
    enumerate_config.solver.max_solutions = Some(10);
    enumerate_config.theory.cover_remainder = false;
    enumerate_config.puzzle.board_file = Some(PathBuf::from("puzzles/board.txt"));
    enumerate_config.puzzle.pieces_file = Some(PathBuf::from("puzzles/pieces.txt"));
    enumerate_config.to_file(&config_dir.join("enumerate.yaml"))?;
    println!("Created: {}", config_dir.join("enumerate.yaml").display());

    println!("{}", ColorOutput::success("Setup complete"));
    println!("Run: cargo run -- solve jan 1 wed --config config/default.yaml");

    Ok(())
}
