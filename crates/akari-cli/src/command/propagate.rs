use std::{fmt, path::PathBuf};

use akari_engine::{Coord, Grid};
use akari_training::base_genotype::{Propagation, Propagator};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PropagateArg {
    /// Puzzle definition file
    puzzle: PathBuf,
    /// Output file [default: stdout]
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Result of running clue propagation to its fixed point.
struct Report<'a> {
    grid: &'a Grid,
    passes: usize,
    propagation: Propagation,
    unresolved: Vec<Coord>,
}

impl<'a> Report<'a> {
    fn new(grid: &'a Grid) -> Self {
        let mut propagator = Propagator::new(grid);
        let passes = propagator.run_to_fixed_point();
        let mut unresolved = propagator.pending_cells().collect::<Vec<_>>();
        unresolved.sort_unstable();
        Self {
            grid,
            passes,
            propagation: propagator.finish(),
            unresolved,
        }
    }

    fn loci(&self) -> usize {
        self.grid.white_count() - self.propagation.forced_lights.len()
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.grid)?;
        writeln!(f, "Passes: {}", self.passes)?;
        writeln!(f, "Loci: {}", self.loci())?;
        write_cells(f, "Forced lights", &self.propagation.forced_lights)?;
        write_cells(f, "Never-light cells", &self.propagation.never_light)?;
        write_cells(f, "Unresolved clues", &self.unresolved)
    }
}

fn write_cells(f: &mut fmt::Formatter<'_>, title: &str, cells: &[Coord]) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{title}: {}", cells.len())?;
    for cell in cells {
        writeln!(f, "{cell}")?;
    }
    Ok(())
}

pub(crate) fn run(arg: &PropagateArg) -> anyhow::Result<()> {
    let PropagateArg { puzzle, output } = arg;

    let puzzle_path = puzzle;
    let puzzle = util::read_puzzle_file(puzzle_path)?;
    let report = Report::new(puzzle.grid());
    log::info!(
        "{}: {} forced lights, {} never-light cells after {} passes",
        puzzle_path.display(),
        report.propagation.forced_lights.len(),
        report.propagation.never_light.len(),
        report.passes
    );

    let mut output = Output::from_output_path(output.clone())?;
    output.write_text(&report.to_string())?;
    log::info!("propagation report written to {}", output.display_path());
    Ok(())
}
