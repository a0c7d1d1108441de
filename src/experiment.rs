use crate::heuristic::Heuristic;
use crate::puzzle::PuzzleState;
use crate::search::{Algorithm, ConfigError, SearchEngine, SearchOutcome};
use log::info;
use rand::Rng;
use std::fmt;

#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    /// Scrambled states tried per node budget.
    pub trials: usize,
    /// Random moves away from the goal for each scramble.
    pub scramble_moves: usize,
    pub beam_width: usize,
    pub budgets: Vec<usize>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            trials: 500,
            scramble_moves: 200,
            beam_width: 50,
            budgets: vec![500, 1000, 2000],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tally {
    pub solved: usize,
    pub total_length: usize,
}

impl Tally {
    fn record(&mut self, outcome: &SearchOutcome) {
        if let SearchOutcome::Success(solution) = outcome {
            self.solved += 1;
            self.total_length += solution.path_length();
        }
    }

    pub fn average_length(&self) -> Option<f64> {
        (self.solved > 0).then(|| self.total_length as f64 / self.solved as f64)
    }
}

/// Results for one node budget.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetResult {
    pub max_nodes: usize,
    pub trials: usize,
    pub a_star_h1: Tally,
    pub a_star_h2: Tally,
    pub beam: Tally,
}

impl BudgetResult {
    pub fn tallies(&self) -> [&Tally; 3] {
        [&self.a_star_h1, &self.a_star_h2, &self.beam]
    }

    pub fn fraction(&self, tally: &Tally) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            tally.solved as f64 / self.trials as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentReport {
    pub beam_width: usize,
    pub budgets: Vec<BudgetResult>,
}

/// Solves the same scrambled states with A* h1, A* h2 and beam search under
/// each node budget.
pub fn run_experiments<R: Rng + ?Sized>(
    config: &ExperimentConfig,
    rng: &mut R,
) -> Result<ExperimentReport, ConfigError> {
    if config.beam_width == 0 {
        return Err(ConfigError::InvalidBeamWidth);
    }

    let mut engine = SearchEngine::new();
    let mut budgets = Vec::with_capacity(config.budgets.len());
    for &max_nodes in &config.budgets {
        engine.set_max_nodes(max_nodes)?;
        let mut result = BudgetResult {
            max_nodes,
            trials: config.trials,
            a_star_h1: Tally::default(),
            a_star_h2: Tally::default(),
            beam: Tally::default(),
        };

        for _ in 0..config.trials {
            let state = PuzzleState::scramble(config.scramble_moves, rng);
            let runs = [
                (Algorithm::AStar(Heuristic::MisplacedTiles), &mut result.a_star_h1),
                (Algorithm::AStar(Heuristic::Manhattan), &mut result.a_star_h2),
                (Algorithm::Beam(config.beam_width), &mut result.beam),
            ];
            for (algorithm, tally) in runs {
                tally.record(&engine.search(&state, algorithm, |_| {})?);
            }
        }

        info!(
            "Budget {}: h1 solved {}, h2 solved {}, beam solved {} of {}",
            max_nodes,
            result.a_star_h1.solved,
            result.a_star_h2.solved,
            result.beam.solved,
            config.trials
        );
        budgets.push(result);
    }

    Ok(ExperimentReport {
        beam_width: config.beam_width,
        budgets,
    })
}

fn average(tally: &Tally) -> String {
    match tally.average_length() {
        Some(avg) => format!("{:.2}", avg),
        None => "n/a".to_owned(),
    }
}

impl fmt::Display for ExperimentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fraction of puzzles solved")?;
        for (index, name) in self.section_names().iter().enumerate() {
            writeln!(f, "  {}", name)?;
            for result in &self.budgets {
                writeln!(
                    f,
                    "    max nodes {:>5}: {:.3}",
                    result.max_nodes,
                    result.fraction(result.tallies()[index])
                )?;
            }
        }

        if let Some(largest) = self.budgets.last() {
            writeln!(f, "Average solution length at max nodes {}", largest.max_nodes)?;
            for (name, tally) in self.section_names().iter().zip(largest.tallies()) {
                writeln!(f, "  {}: {}", name, average(tally))?;
            }
        }
        Ok(())
    }
}

impl ExperimentReport {
    fn section_names(&self) -> [String; 3] {
        [
            "A* search with h1".to_owned(),
            "A* search with h2".to_owned(),
            format!("beam search (k = {})", self.beam_width),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test_log::test]
    fn short_scrambles_are_always_solved() {
        let config = ExperimentConfig {
            trials: 10,
            scramble_moves: 6,
            beam_width: 50,
            budgets: vec![2000],
        };
        let report = run_experiments(&config, &mut StdRng::seed_from_u64(1111)).unwrap();
        let result = &report.budgets[0];
        assert_eq!(result.a_star_h1.solved, 10);
        assert_eq!(result.a_star_h2.solved, 10);
        assert_eq!(result.fraction(&result.a_star_h1), 1.0);
        // a scramble of six moves is never more than six moves from the goal
        assert!(result.a_star_h1.average_length().unwrap() <= 6.0);
        assert!(result.a_star_h2.average_length().unwrap() <= 6.0);
    }

    #[test]
    fn report_lists_every_budget() {
        let config = ExperimentConfig {
            trials: 2,
            scramble_moves: 4,
            beam_width: 10,
            budgets: vec![50, 100],
        };
        let report = run_experiments(&config, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(report.budgets.len(), 2);
        let text = report.to_string();
        assert!(text.contains("max nodes    50"));
        assert!(text.contains("max nodes   100"));
        assert!(text.contains("beam search (k = 10)"));
        assert!(text.contains("Average solution length at max nodes 100"));
    }

    #[test]
    fn rejects_zero_width_or_budget() {
        let mut rng = StdRng::seed_from_u64(0);
        let zero_width = ExperimentConfig {
            beam_width: 0,
            ..ExperimentConfig::default()
        };
        assert_eq!(
            run_experiments(&zero_width, &mut rng),
            Err(ConfigError::InvalidBeamWidth)
        );
        let zero_budget = ExperimentConfig {
            budgets: vec![0],
            ..ExperimentConfig::default()
        };
        assert_eq!(
            run_experiments(&zero_budget, &mut rng),
            Err(ConfigError::InvalidMaxNodes)
        );
    }

    #[test]
    fn empty_tally_has_no_average() {
        assert_eq!(Tally::default().average_length(), None);
    }
}
