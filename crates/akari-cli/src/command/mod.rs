use clap::{Parser, Subcommand};

use self::{propagate::PropagateArg, solve::SolveArg};

mod propagate;
mod solve;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Search for a solution with the configured algorithm
    Solve(#[clap(flatten)] SolveArg),
    /// Show the cells fixed by clue propagation
    Propagate(#[clap(flatten)] PropagateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Solve(arg) => solve::run(&arg)?,
        Mode::Propagate(arg) => propagate::run(&arg)?,
    }
    Ok(())
}
