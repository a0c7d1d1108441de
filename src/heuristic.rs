use crate::puzzle::{PuzzleState, SIZE};
use crate::search::ConfigError;
use std::{fmt, str::FromStr};

/// Distance-to-goal estimate driving the frontier order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heuristic {
    /// H1: number of cells holding the wrong label.
    MisplacedTiles,
    /// H2: summed row and column displacement of every label.
    #[default]
    Manhattan,
}

impl Heuristic {
    pub fn evaluate(self, state: &PuzzleState) -> u32 {
        match self {
            Heuristic::MisplacedTiles => misplaced_tiles(state),
            Heuristic::Manhattan => manhattan_distance(state),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::MisplacedTiles => "h1",
            Heuristic::Manhattan => "h2",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Heuristic {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h1" => Ok(Heuristic::MisplacedTiles),
            "h2" => Ok(Heuristic::Manhattan),
            _ => Err(ConfigError::UnknownHeuristic(s.to_owned())),
        }
    }
}

/// Counts cells whose label differs from their row-major index. The blank is
/// counted like any other tile.
pub fn misplaced_tiles(state: &PuzzleState) -> u32 {
    state
        .tiles()
        .enumerate()
        .filter(|&(index, label)| label as usize != index)
        .count() as u32
}

/// Sums, over all nine cells including the blank, the distance between where a
/// label sits and the cell `label / 3, label % 3` it belongs in.
pub fn manhattan_distance(state: &PuzzleState) -> u32 {
    let mut distance = 0;
    for i in 0..SIZE {
        for j in 0..SIZE {
            let value = state.get(i, j) as usize;
            let target_x = value / SIZE;
            let target_y = value % SIZE;
            distance += i.abs_diff(target_x) + j.abs_diff(target_y);
        }
    }
    distance as u32
}
