//! Informed search for the 3x3 sliding-tile puzzle.

pub mod experiment;
pub mod frontier;
pub mod heuristic;
pub mod node;
pub mod puzzle;
pub mod search;
pub mod shell;
pub mod visited;

pub use heuristic::Heuristic;
pub use puzzle::{Move, ParseStateError, PuzzleState};
pub use search::{
    Algorithm, ConfigError, SearchEngine, SearchFailure, SearchOutcome, SearchReport, Solution,
};

pub fn compute_h1(state: &PuzzleState) -> u32 {
    heuristic::misplaced_tiles(state)
}

pub fn compute_h2(state: &PuzzleState) -> u32 {
    heuristic::manhattan_distance(state)
}
