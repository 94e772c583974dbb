use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;

use pegjump::{solve_with_observer, survey, Board, NoopObserver, Position, SolveObserver, VerboseObserver};

/// Solve triangular peg solitaire boards.
#[derive(Parser)]
#[command(name = "pegjump", about = "Peg Jump Solver")]
struct Cli {
    /// Side length of the triangular board
    #[arg(long, default_value_t = 5)]
    size: usize,

    /// Zero-based row of the initial hole
    #[arg(long, default_value_t = 0)]
    hole_row: usize,

    /// Zero-based column of the initial hole, at most `hole_row`
    #[arg(long, default_value_t = 0)]
    hole_col: usize,

    /// Print every jump tried and every revert
    #[arg(long)]
    verbose: bool,

    /// Solve the board once for every hole position and print a summary
    #[arg(long)]
    all_holes: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    println!();
    println!("-----====================================-----");
    println!("Peg Jump Solver v{}", env!("CARGO_PKG_VERSION"));
    println!("-----====================================-----");
    println!();

    if cli.all_holes {
        run_survey(cli.size)
    } else {
        let hole = Position::new(cli.hole_row, cli.hole_col);
        let board = Board::new(cli.size, hole).context("Invalid input")?;
        if cli.verbose {
            let mut observer = VerboseObserver::new(io::stdout());
            run(board, &mut observer)?;
            observer.finish().context("Failed to print verbose output")?;
            Ok(())
        } else {
            run(board, &mut NoopObserver)
        }
    }
}

fn run(board: Board, observer: &mut impl SolveObserver) -> Result<()> {
    println!("ORIGINAL LAYOUT");
    println!("{board}");

    let solution = solve_with_observer(board, observer);

    let mut out = io::stdout().lock();
    if solution.is_solved() {
        writeln!(out)?;
        writeln!(out, "SOLUTION FOUND!")?;
        writeln!(out)?;
        writeln!(out, "-------------------------------")?;
        writeln!(out, "STEPS:")?;
        writeln!(out, "-------------------------------")?;
        for step in solution.steps_in_play_order() {
            writeln!(out)?;
            writeln!(out, "{}", step.mv())?;
            write!(out, "{}", step.board())?;
        }
    } else {
        writeln!(out)?;
        writeln!(out, "NO SOLUTION FOUND")?;
    }

    writeln!(out)?;
    match solution.best_run() {
        Some(best_run) => writeln!(out, "BEST RUN: {best_run}")?,
        None => writeln!(out, "BEST RUN: unset")?,
    }
    Ok(())
}

fn run_survey(size: usize) -> Result<()> {
    let entries = survey(size).context("Invalid input")?;
    let mut out = io::stdout().lock();
    writeln!(out, "HOLE      SOLVED  MOVES  BEST RUN")?;
    for entry in entries {
        let best_run = entry
            .best_run
            .map_or_else(|| "unset".to_string(), |best_run| best_run.to_string());
        writeln!(
            out,
            "{:<9} {:<7} {:<6} {}",
            entry.hole.to_string(),
            entry.solved,
            entry.num_moves,
            best_run
        )?;
    }
    Ok(())
}
