use std::{
    fmt,
    path::{Path, PathBuf},
};

use akari_engine::puzzle::Puzzle;
use akari_training::{
    config::RawConfig,
    search::{self, SearchReport},
};
use anyhow::Context;
use chrono::Local;
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SolveArg {
    /// Puzzle definition file
    puzzle: PathBuf,
    /// Search configuration file
    #[arg(long, default_value = "configs/default.json")]
    config: PathBuf,
    /// Result log file, overriding `logPath` of the config [default: stdout]
    #[arg(long)]
    log: Option<PathBuf>,
    /// Solution file, overriding `solPath` of the config [default: stdout]
    #[arg(long)]
    solution: Option<PathBuf>,
}

/// Fields written before the per-run sections of the result log.
struct LogHeader<'a> {
    puzzle_path: &'a Path,
    solution_path: &'a str,
    seed: u64,
    config_json: &'a str,
}

pub(crate) fn run(arg: &SolveArg) -> anyhow::Result<()> {
    let SolveArg {
        puzzle: puzzle_path,
        config: config_path,
        log: log_path,
        solution: solution_path,
    } = arg;

    let puzzle = util::read_puzzle_file(puzzle_path)?;
    let raw: RawConfig = util::read_json_file("config", config_path)?;
    let config = raw
        .validate()
        .with_context(|| format!("Invalid config file: {}", config_path.display()))?;

    let seed = raw
        .given_seed
        .unwrap_or_else(|| u64::from(Local::now().timestamp_subsec_micros()));
    let grid = puzzle.grid();
    log::info!(
        "{}: {}x{} grid with {} white cells, seed {seed}",
        puzzle_path.display(),
        grid.width(),
        grid.height(),
        grid.white_count()
    );
    log::debug!("puzzle:\n{grid}");

    let mut rng = Pcg32::seed_from_u64(seed);
    let report = search::run_search(grid, &config, &mut rng);

    let log_path = log_path
        .clone()
        .or_else(|| raw.log_path.as_ref().map(PathBuf::from));
    let solution_path = solution_path
        .clone()
        .or_else(|| raw.sol_path.as_ref().map(PathBuf::from));
    let solution_display = solution_path
        .as_ref()
        .map_or_else(|| "stdout".to_string(), |p| p.display().to_string());

    let config_json = serde_json::to_string(&raw).context("Failed to serialize config")?;
    let header = LogHeader {
        puzzle_path,
        solution_path: &solution_display,
        seed,
        config_json: &config_json,
    };
    let mut text = String::new();
    write_result_log(&mut text, &header, &report).context("Failed to format result log")?;
    {
        let mut output = Output::from_output_path(log_path)?;
        output.write_text(&text)?;
        log::info!("result log written to {}", output.display_path());
    }

    let mut output = Output::from_output_path(solution_path)?;
    output.write_text(&solution_text(&puzzle, &report))?;
    log::info!("solution written to {}", output.display_path());

    Ok(())
}

fn write_result_log<W>(w: &mut W, header: &LogHeader<'_>, report: &SearchReport) -> fmt::Result
where
    W: fmt::Write,
{
    writeln!(w, "Result Log")?;
    writeln!(w)?;
    writeln!(w, "Problem Instance File: {}", header.puzzle_path.display())?;
    writeln!(w, "Solution File: {}", header.solution_path)?;
    writeln!(w, "Random Seed: {}", header.seed)?;
    writeln!(w)?;
    writeln!(w, "Config Used:")?;
    writeln!(w, "{}", header.config_json)?;
    writeln!(w)?;

    for (i, run) in report.runs.iter().enumerate() {
        writeln!(w, "Run {}", i + 1)?;
        for checkpoint in &run.checkpoints {
            writeln!(w, "{checkpoint}")?;
        }
        writeln!(w)?;
    }

    if let Some(score) = report.best.score() {
        writeln!(w, "Best of all runs: {score}")?;
    }
    Ok(())
}

/// The puzzle definition followed by the best solution block.
fn solution_text(puzzle: &Puzzle, report: &SearchReport) -> String {
    format!("{}\n{}", puzzle.source(), report.best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(puzzle: &Puzzle, config: &str, seed: u64) -> SearchReport {
        let config = serde_json::from_str::<RawConfig>(config)
            .unwrap()
            .validate()
            .unwrap();
        search::run_search(puzzle.grid(), &config, &mut Pcg32::seed_from_u64(seed))
    }

    #[test]
    fn test_result_log_layout() {
        let puzzle = "3\n3\n2 2 5\n".parse::<Puzzle>().unwrap();
        let config = r#"{"searchAlgorithm": "EA", "mu": 4, "lambda": 2, "mutationRate": 5,
            "parentUniform": true, "survivalTruncation": true,
            "numOfRuns": 2, "numOfFitnessEvals": 8}"#;
        let report = solve(&puzzle, config, 3);
        let header = LogHeader {
            puzzle_path: Path::new("puzzles/a.lup"),
            solution_path: "solutions/a.txt",
            seed: 3,
            config_json: r#"{"searchAlgorithm":"EA"}"#,
        };

        let mut text = String::new();
        write_result_log(&mut text, &header, &report).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(
            lines[..9],
            [
                "Result Log",
                "",
                "Problem Instance File: puzzles/a.lup",
                "Solution File: solutions/a.txt",
                "Random Seed: 3",
                "",
                "Config Used:",
                r#"{"searchAlgorithm":"EA"}"#,
                "",
            ]
        );
        assert_eq!(lines[9], "Run 1");
        // 4 initial evaluations, then 6 and 8
        assert!(lines[10].starts_with("4\t"));
        assert!(lines[11].starts_with("6\t"));
        assert!(lines[12].starts_with("8\t"));
        assert_eq!(lines[13], "");
        assert_eq!(lines[14], "Run 2");
        assert!(lines.last().unwrap().starts_with("Best of all runs: "));
    }

    #[test]
    fn test_solution_text() {
        let puzzle = "2\n1\n".parse::<Puzzle>().unwrap();
        let config = r#"{"searchAlgorithm": "Random Search",
            "numOfRuns": 1, "numOfFitnessEvals": 50}"#;
        let report = solve(&puzzle, config, 0);
        let text = solution_text(&puzzle, &report);

        // every placement on a 2x1 grid lights both cells
        assert!(text.starts_with("2\n1\n\n2\n"), "{text:?}");
        assert_eq!(report.best.score(), Some(1.0));
    }

    #[test]
    fn test_bundled_configs_are_valid() {
        for text in [
            include_str!("../../../../configs/default.json"),
            include_str!("../../../../configs/moea.json"),
            include_str!("../../../../configs/random.json"),
        ] {
            let raw = serde_json::from_str::<RawConfig>(text).unwrap();
            assert!(raw.validate().is_ok(), "{text}");
        }
    }
}
