use crate::frontier::Frontier;
use crate::heuristic::Heuristic;
use crate::node::Node;
use crate::puzzle::{format_moves, Move, PuzzleState};
use crate::visited::VisitedSet;
use log::{debug, info, trace, warn};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown heuristic {0:?}, expected 'h1' or 'h2'")]
    UnknownHeuristic(String),
    #[error("The node budget must be set before searching")]
    MaxNodesUnset,
    #[error("The node budget must be a positive integer")]
    InvalidMaxNodes,
    #[error("The beam width must be a positive integer")]
    InvalidBeamWidth,
}

/// Why a search that ran to completion found no solution.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFailure {
    #[error("Frontier exhausted without reaching the goal")]
    NoSolution,
    #[error("Exceeded the budget of {max_nodes} nodes")]
    NodeBudgetExceeded { max_nodes: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub moves: Vec<Move>,
}

impl Solution {
    pub fn path_length(&self) -> usize {
        self.moves.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Success(Solution),
    Failure(SearchFailure),
}

impl SearchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SearchOutcome::Success(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    AStar(Heuristic),
    /// Best-first on h2 whose frontier is cut back to this many nodes after every expansion.
    Beam(usize),
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::AStar(heuristic) => write!(f, "A* {}", heuristic),
            Algorithm::Beam(width) => write!(f, "Beam (k = {})", width),
        }
    }
}

/// Counters and result of the most recent search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub algorithm: Algorithm,
    pub outcome: SearchOutcome,
    /// Nodes taken off the frontier, including skipped duplicates and the goal.
    pub nodes_expanded: usize,
    pub duplicates_skipped: usize,
}

/// Runs A* and width-bounded best-first search. Each engine owns its own frontier,
/// visited set and counters, all reset at the start of every search.
#[derive(Default)]
pub struct SearchEngine {
    heuristic: Heuristic,
    max_nodes: Option<usize>,
    frontier: Frontier,
    visited: VisitedSet,
    last: Option<SearchReport>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(heuristic: Heuristic, max_nodes: usize) -> Result<Self, ConfigError> {
        let mut engine = Self::new();
        engine.set_heuristic(heuristic);
        engine.set_max_nodes(max_nodes)?;
        Ok(engine)
    }

    /// Selects the A* heuristic by name. Returns false for anything but `h1`/`h2`.
    pub fn configure_heuristic(&mut self, name: &str) -> bool {
        match name.parse() {
            Ok(heuristic) => {
                self.heuristic = heuristic;
                true
            }
            Err(_) => false,
        }
    }

    pub fn set_heuristic(&mut self, heuristic: Heuristic) {
        self.heuristic = heuristic;
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    pub fn set_max_nodes(&mut self, max_nodes: usize) -> Result<(), ConfigError> {
        if max_nodes == 0 {
            return Err(ConfigError::InvalidMaxNodes);
        }
        self.max_nodes = Some(max_nodes);
        Ok(())
    }

    pub fn max_nodes(&self) -> Option<usize> {
        self.max_nodes
    }

    pub fn a_star_search(&mut self, initial: &PuzzleState) -> Result<SearchOutcome, ConfigError> {
        self.search(initial, Algorithm::AStar(self.heuristic), |_| {})
    }

    /// Width-bounded best-first search. Always scores with h2 and leaves the engine
    /// configured for h2 afterwards.
    pub fn beam_search(
        &mut self,
        width: usize,
        initial: &PuzzleState,
    ) -> Result<SearchOutcome, ConfigError> {
        self.search(initial, Algorithm::Beam(width), |_| {})
    }

    /// Runs `algorithm` from `initial`, calling `on_expand` for every node whose
    /// children are generated.
    pub fn search<F>(
        &mut self,
        initial: &PuzzleState,
        algorithm: Algorithm,
        mut on_expand: F,
    ) -> Result<SearchOutcome, ConfigError>
    where
        F: FnMut(&Node),
    {
        let max_nodes = self.max_nodes.ok_or(ConfigError::MaxNodesUnset)?;
        let (heuristic, width) = match algorithm {
            Algorithm::AStar(heuristic) => (heuristic, None),
            Algorithm::Beam(0) => return Err(ConfigError::InvalidBeamWidth),
            Algorithm::Beam(width) => {
                self.heuristic = Heuristic::Manhattan;
                (Heuristic::Manhattan, Some(width))
            }
        };

        self.reset();
        if !initial.is_solvable() {
            warn!(
                "{} cannot reach the goal; the search will stop at the node budget",
                initial.to_spec()
            );
        }
        info!(
            "{} search from {} with a budget of {} nodes",
            algorithm,
            initial.to_spec(),
            max_nodes
        );

        self.frontier.insert(Node::root(*initial, heuristic));
        let mut nodes_expanded = 0;
        let mut duplicates_skipped = 0;

        let outcome = loop {
            let next = self.frontier.pop_best();
            nodes_expanded += 1;

            let Some(node) = next else {
                break SearchOutcome::Failure(SearchFailure::NoSolution);
            };
            if nodes_expanded > max_nodes {
                break SearchOutcome::Failure(SearchFailure::NodeBudgetExceeded { max_nodes });
            }
            if node.h() == 0 {
                break SearchOutcome::Success(Solution {
                    moves: node.into_path(),
                });
            }
            if !self.visited.insert(*node.state(), node.f()) {
                duplicates_skipped += 1;
                continue;
            }
            self.visited.evict_if_oversized();

            trace!(
                "Expanding {} (g = {}, h = {})",
                node.state().to_spec(),
                node.g(),
                node.h()
            );
            on_expand(&node);
            for child in node.children(heuristic) {
                self.frontier.insert(child);
            }

            if let Some(width) = width {
                if self.frontier.len() > width {
                    debug!(
                        "Trimming frontier from {} to {} nodes",
                        self.frontier.len(),
                        width
                    );
                    self.frontier.truncate(width);
                }
            }
        };

        match &outcome {
            SearchOutcome::Success(solution) => info!(
                "{} solution found in {} moves after {} nodes: {}",
                algorithm,
                solution.path_length(),
                nodes_expanded,
                format_moves(&solution.moves)
            ),
            SearchOutcome::Failure(failure) => {
                info!("No {} solution after {} nodes: {}", algorithm, nodes_expanded, failure)
            }
        }

        self.last = Some(SearchReport {
            algorithm,
            outcome: outcome.clone(),
            nodes_expanded,
            duplicates_skipped,
        });
        Ok(outcome)
    }

    fn reset(&mut self) {
        self.frontier.clear();
        self.visited.clear();
        self.last = None;
    }

    pub fn last_report(&self) -> Option<&SearchReport> {
        self.last.as_ref()
    }

    pub fn was_solved(&self) -> bool {
        self.last
            .as_ref()
            .is_some_and(|report| report.outcome.is_success())
    }

    /// Moves in the last solution, or 0 when the last search failed.
    pub fn solution_path_length(&self) -> usize {
        self.solution_moves().len()
    }

    pub fn nodes_expanded(&self) -> usize {
        self.last.as_ref().map_or(0, |report| report.nodes_expanded)
    }

    pub fn solution_moves(&self) -> &[Move] {
        match &self.last {
            Some(SearchReport {
                outcome: SearchOutcome::Success(solution),
                ..
            }) => &solution.moves,
            _ => &[],
        }
    }
}
