//! Search configuration.
//!
//! [`RawConfig`] mirrors the JSON configuration file: camelCase keys, every
//! option optional. [`RawConfig::validate`] checks which options the selected
//! algorithm needs and produces a typed [`SearchConfig`].
//!
//! # Selection variants
//!
//! When several variants are enabled, the first one in this order wins:
//!
//! - parent: `parentTournyK`, `parentFitnessProp`, `parentUniform`
//! - survival: `survivalTournyK`, `survivalTruncation`, `survivalUniform`,
//!   `survivalFitnessProp`

use akari_evaluator::solution_evaluator::{EvaluationMode, EvaluatorConfig};
use serde::{Deserialize, Serialize};

use crate::{
    genetic::{PopulationEvolver, Survival},
    selection::{ParentSelection, SurvivorSelection},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum SearchAlgorithm {
    #[serde(rename = "Random Search", alias = "RandomSearch")]
    #[display("Random Search")]
    RandomSearch,
    #[serde(rename = "EA")]
    #[display("EA")]
    Ea,
    #[serde(rename = "MOEA")]
    #[display("MOEA")]
    Moea,
}

/// Configuration file contents, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_algorithm: Option<SearchAlgorithm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mu: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lambda: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutation_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_tourny_k: Option<usize>,
    #[serde(default)]
    pub parent_fitness_prop: bool,
    #[serde(default)]
    pub parent_uniform: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survival_tourny_k: Option<usize>,
    #[serde(default)]
    pub survival_truncation: bool,
    #[serde(default)]
    pub survival_uniform: bool,
    #[serde(default)]
    pub survival_fitness_prop: bool,
    #[serde(default)]
    pub comma_survival: bool,
    #[serde(default)]
    pub validity_forced_init: bool,
    #[serde(default)]
    pub enforce_black_cell_constraint: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty_coefficient: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_of_runs: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_of_fitness_evals: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_change_for_n_evals: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sol_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("`searchAlgorithm` is not set")]
    MissingAlgorithm,
    #[display("`{option}` is required by {algorithm}")]
    MissingOption {
        option: &'static str,
        algorithm: SearchAlgorithm,
    },
    #[display("no {stage} selection variant is enabled")]
    NoSelectionVariant { stage: &'static str },
    #[display("`{option}` must be at least {min}, got {value}")]
    OutOfRange {
        option: &'static str,
        min: usize,
        value: usize,
    },
    #[display("comma survival needs lambda >= mu, got mu = {mu}, lambda = {lambda}")]
    CommaPopulationTooSmall { mu: usize, lambda: usize },
    #[display("`penaltyCoefficient` must be a non-negative number, got {value}")]
    InvalidPenalty { value: f64 },
}

/// Validated search settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub algorithm: SearchAlgorithm,
    pub runs: usize,
    /// Evaluation budget per run
    pub evaluations: usize,
    /// Evaluations without improvement after which a run stops early
    pub stagnation_limit: Option<usize>,
    pub evaluator: EvaluatorConfig,
    /// Present for the evolutionary algorithms only.
    pub evolution: Option<EvolutionConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvolutionConfig {
    pub mu: usize,
    pub lambda: usize,
    /// Per-locus flip probability is `1 / mutation_rate`.
    pub mutation_rate: u32,
    pub parent_selection: ParentSelection,
    pub survivor_selection: SurvivorSelection,
    pub survival: Survival,
    /// Run clue propagation before laying out the genotype.
    pub forced_init: bool,
}

impl EvolutionConfig {
    #[must_use]
    pub fn evolver(&self) -> PopulationEvolver {
        PopulationEvolver {
            mu: self.mu,
            lambda: self.lambda,
            parent_selection: self.parent_selection,
            survivor_selection: self.survivor_selection,
            survival: self.survival,
        }
    }
}

impl RawConfig {
    /// Checks the options required by the selected algorithm.
    pub fn validate(&self) -> Result<SearchConfig, ConfigError> {
        let algorithm = self.search_algorithm.ok_or(ConfigError::MissingAlgorithm)?;
        let require = |option: &'static str, value: Option<usize>| {
            value.ok_or(ConfigError::MissingOption { option, algorithm })
        };

        let runs = at_least("numOfRuns", require("numOfRuns", self.num_of_runs)?, 1)?;
        let evaluations = at_least(
            "numOfFitnessEvals",
            require("numOfFitnessEvals", self.num_of_fitness_evals)?,
            1,
        )?;
        let stagnation_limit = self
            .no_change_for_n_evals
            .map(|n| at_least("noChangeForNEvals", n, 1))
            .transpose()?;

        if let Some(value) = self.penalty_coefficient
            && !(value.is_finite() && value >= 0.0)
        {
            return Err(ConfigError::InvalidPenalty { value });
        }
        let mode = match algorithm {
            SearchAlgorithm::RandomSearch | SearchAlgorithm::Ea => EvaluationMode::SingleObjective,
            SearchAlgorithm::Moea => EvaluationMode::MultiObjective,
        };
        let evaluator = EvaluatorConfig {
            mode,
            enforce_black_cell_constraint: self.enforce_black_cell_constraint,
            penalty_coefficient: self.penalty_coefficient,
        };

        let evolution = match algorithm {
            SearchAlgorithm::RandomSearch => None,
            SearchAlgorithm::Ea | SearchAlgorithm::Moea => Some(self.evolution(algorithm)?),
        };

        Ok(SearchConfig {
            algorithm,
            runs,
            evaluations,
            stagnation_limit,
            evaluator,
            evolution,
        })
    }

    fn evolution(&self, algorithm: SearchAlgorithm) -> Result<EvolutionConfig, ConfigError> {
        let require = |option: &'static str, value: Option<usize>| {
            value.ok_or(ConfigError::MissingOption { option, algorithm })
        };
        let mu = at_least("mu", require("mu", self.mu)?, 2)?;
        let lambda = at_least("lambda", require("lambda", self.lambda)?, 1)?;
        let mutation_rate = self.mutation_rate.ok_or(ConfigError::MissingOption {
            option: "mutationRate",
            algorithm,
        })?;
        if mutation_rate == 0 {
            return Err(ConfigError::OutOfRange {
                option: "mutationRate",
                min: 1,
                value: 0,
            });
        }

        let parent_selection = if let Some(k) = self.parent_tourny_k {
            ParentSelection::Tournament {
                k: at_least("parentTournyK", k, 1)?,
            }
        } else if self.parent_fitness_prop {
            ParentSelection::FitnessProportional
        } else if self.parent_uniform {
            ParentSelection::Uniform
        } else {
            return Err(ConfigError::NoSelectionVariant { stage: "parent" });
        };

        let survivor_selection = if let Some(k) = self.survival_tourny_k {
            SurvivorSelection::Tournament {
                k: at_least("survivalTournyK", k, 1)?,
            }
        } else if self.survival_truncation {
            SurvivorSelection::Truncation
        } else if self.survival_uniform {
            SurvivorSelection::Uniform
        } else if self.survival_fitness_prop {
            SurvivorSelection::FitnessProportional
        } else {
            return Err(ConfigError::NoSelectionVariant { stage: "survivor" });
        };

        let survival = if self.comma_survival {
            if lambda < mu {
                return Err(ConfigError::CommaPopulationTooSmall { mu, lambda });
            }
            Survival::Comma
        } else {
            Survival::Plus
        };

        Ok(EvolutionConfig {
            mu,
            lambda,
            mutation_rate,
            parent_selection,
            survivor_selection,
            survival,
            forced_init: self.validity_forced_init,
        })
    }
}

fn at_least(option: &'static str, value: usize, min: usize) -> Result<usize, ConfigError> {
    if value < min {
        return Err(ConfigError::OutOfRange { option, min, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RawConfig {
        serde_json::from_str(json).unwrap()
    }

    const EA: &str = r#"{
        "searchAlgorithm": "EA",
        "mu": 100,
        "lambda": 50,
        "mutationRate": 20,
        "parentTournyK": 4,
        "parentUniform": true,
        "survivalTruncation": true,
        "commaSurvival": false,
        "validityForcedInit": true,
        "enforceBlackCellConstraint": true,
        "numOfRuns": 30,
        "numOfFitnessEvals": 10000,
        "noChangeForNEvals": 2000,
        "givenSeed": 42,
        "logPath": "logs/run.txt",
        "solPath": "solutions/run.txt"
    }"#;

    #[test]
    fn test_validate_ea() {
        let raw = parse(EA);
        assert_eq!(raw.given_seed, Some(42));
        assert_eq!(raw.log_path.as_deref(), Some("logs/run.txt"));

        let config = raw.validate().unwrap();
        assert_eq!(config.algorithm, SearchAlgorithm::Ea);
        assert_eq!(config.runs, 30);
        assert_eq!(config.evaluations, 10_000);
        assert_eq!(config.stagnation_limit, Some(2000));
        assert_eq!(config.evaluator.mode, EvaluationMode::SingleObjective);
        assert!(config.evaluator.enforce_black_cell_constraint);
        assert_eq!(config.evaluator.penalty_coefficient, None);

        let evolution = config.evolution.unwrap();
        // tournament takes precedence over uniform
        assert_eq!(evolution.parent_selection, ParentSelection::Tournament { k: 4 });
        assert_eq!(evolution.survivor_selection, SurvivorSelection::Truncation);
        assert_eq!(evolution.survival, Survival::Plus);
        assert_eq!(evolution.mutation_rate, 20);
        assert!(evolution.forced_init);
    }

    #[test]
    fn test_random_search_needs_no_evolution_options() {
        for name in ["Random Search", "RandomSearch"] {
            let raw = parse(&format!(
                r#"{{"searchAlgorithm": "{name}", "numOfRuns": 2, "numOfFitnessEvals": 10}}"#
            ));
            let config = raw.validate().unwrap();
            assert_eq!(config.algorithm, SearchAlgorithm::RandomSearch);
            assert!(config.evolution.is_none());
        }
    }

    #[test]
    fn test_moea_uses_multi_objective_mode() {
        let mut raw = parse(EA);
        raw.search_algorithm = Some(SearchAlgorithm::Moea);
        let config = raw.validate().unwrap();
        assert_eq!(config.evaluator.mode, EvaluationMode::MultiObjective);
    }

    #[test]
    fn test_unknown_algorithm_is_rejected() {
        let err = serde_json::from_str::<RawConfig>(r#"{"searchAlgorithm": "Hill Climb"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_missing_options() {
        let err = RawConfig::default().validate().unwrap_err();
        assert_eq!(err, ConfigError::MissingAlgorithm);

        let mut raw = parse(EA);
        raw.mu = None;
        assert_eq!(
            raw.validate().unwrap_err(),
            ConfigError::MissingOption {
                option: "mu",
                algorithm: SearchAlgorithm::Ea
            }
        );

        let mut raw = parse(EA);
        raw.num_of_fitness_evals = None;
        assert!(matches!(
            raw.validate().unwrap_err(),
            ConfigError::MissingOption {
                option: "numOfFitnessEvals",
                ..
            }
        ));
    }

    #[test]
    fn test_no_selection_variant() {
        let mut raw = parse(EA);
        raw.parent_tourny_k = None;
        raw.parent_uniform = false;
        assert_eq!(
            raw.validate().unwrap_err(),
            ConfigError::NoSelectionVariant { stage: "parent" }
        );

        let mut raw = parse(EA);
        raw.survival_truncation = false;
        assert_eq!(
            raw.validate().unwrap_err(),
            ConfigError::NoSelectionVariant { stage: "survivor" }
        );
    }

    #[test]
    fn test_out_of_range_options() {
        let mut raw = parse(EA);
        raw.mu = Some(1);
        assert!(matches!(
            raw.validate().unwrap_err(),
            ConfigError::OutOfRange { option: "mu", .. }
        ));

        let mut raw = parse(EA);
        raw.mutation_rate = Some(0);
        assert!(matches!(
            raw.validate().unwrap_err(),
            ConfigError::OutOfRange {
                option: "mutationRate",
                ..
            }
        ));

        let mut raw = parse(EA);
        raw.parent_tourny_k = Some(0);
        assert!(matches!(
            raw.validate().unwrap_err(),
            ConfigError::OutOfRange {
                option: "parentTournyK",
                ..
            }
        ));
    }

    #[test]
    fn test_comma_survival_needs_enough_offspring() {
        let mut raw = parse(EA);
        raw.comma_survival = true;
        assert_eq!(
            raw.validate().unwrap_err(),
            ConfigError::CommaPopulationTooSmall { mu: 100, lambda: 50 }
        );
        raw.lambda = Some(100);
        assert_eq!(raw.validate().unwrap().evolution.unwrap().survival, Survival::Comma);
    }

    #[test]
    fn test_invalid_penalty() {
        let mut raw = parse(EA);
        raw.penalty_coefficient = Some(-1.0);
        assert!(matches!(
            raw.validate().unwrap_err(),
            ConfigError::InvalidPenalty { .. }
        ));
        raw.penalty_coefficient = Some(0.5);
        assert_eq!(raw.validate().unwrap().evaluator.penalty_coefficient, Some(0.5));
    }

    #[test]
    fn test_echo_omits_unset_options() {
        let raw = parse(r#"{"searchAlgorithm": "MOEA", "numOfRuns": 1}"#);
        let json = serde_json::to_string(&raw).unwrap();
        assert!(json.contains(r#""searchAlgorithm":"MOEA""#));
        assert!(json.contains(r#""numOfRuns":1"#));
        assert!(!json.contains("givenSeed"));
    }
}
