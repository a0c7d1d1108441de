use rand::Rng;
use std::{fmt, str::FromStr};
use thiserror::Error;

pub const SIZE: usize = 3;

/// Direction the blank travels in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Expansion order used by the search engine.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Down => "Down",
            Move::Left => "Left",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown direction {0:?}, expected 'up', 'down', 'left' or 'right'")]
pub struct ParseMoveError(pub String);

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Move::Up),
            "down" => Ok(Move::Down),
            "left" => Ok(Move::Left),
            "right" => Ok(Move::Right),
            _ => Err(ParseMoveError(s.to_owned())),
        }
    }
}

/// Formats a move sequence as space separated directions.
pub fn format_moves(moves: &[Move]) -> String {
    moves
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseStateError {
    #[error("A state needs exactly 9 entries but got {0}")]
    WrongLength(usize),
    #[error("Invalid entry {0:?}, only the digits 1-8 and 'b' are allowed")]
    InvalidCharacter(char),
    #[error("Entry {0:?} appears more than once")]
    DuplicateCharacter(char),
}

/// An immutable 3x3 arrangement of the labels 0..=8, where 0 is the blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PuzzleState {
    board: [[u8; SIZE]; SIZE],
}

impl PuzzleState {
    /// The solved arrangement `b12345678`: label `3r + c` sits at row `r`, column `c`.
    pub fn goal() -> Self {
        let mut board = [[0; SIZE]; SIZE];
        for (i, row) in board.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (i * SIZE + j) as u8;
            }
        }
        Self { board }
    }

    /// Parses a row-major token such as `"b12 345 678"`. Whitespace is ignored.
    pub fn from_spec(text: &str) -> Result<Self, ParseStateError> {
        let entries: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
        if entries.len() != SIZE * SIZE {
            return Err(ParseStateError::WrongLength(entries.len()));
        }

        let mut seen = [false; SIZE * SIZE];
        let mut board = [[0; SIZE]; SIZE];
        for (i, &ch) in entries.iter().enumerate() {
            let label = match ch {
                'b' => 0,
                '1'..='8' => ch as u8 - b'0',
                _ => return Err(ParseStateError::InvalidCharacter(ch)),
            };
            if seen[label as usize] {
                return Err(ParseStateError::DuplicateCharacter(ch));
            }
            seen[label as usize] = true;
            board[i / SIZE][i % SIZE] = label;
        }

        Ok(Self { board })
    }

    pub fn to_spec(&self) -> String {
        self.tiles()
            .map(|label| match label {
                0 => 'b',
                n => (b'0' + n) as char,
            })
            .collect()
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.board[row][col]
    }

    /// Labels in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = u8> + '_ {
        self.board.iter().flat_map(|row| row.iter().copied())
    }

    /// Row and column of the blank. Scans the whole board and keeps the last hit.
    pub fn blank_position(&self) -> (usize, usize) {
        let mut position = (0, 0);
        for i in 0..SIZE {
            for j in 0..SIZE {
                if self.board[i][j] == 0 {
                    position = (i, j);
                }
            }
        }
        position
    }

    /// Slides the blank one cell in `movement`, or `None` at the edge of the board.
    pub fn apply_move(&self, movement: Move) -> Option<Self> {
        let (x_pos, y_pos) = self.blank_position();
        let (dx, dy) = movement.as_offset();

        let new_x = x_pos as isize + dx;
        let new_y = y_pos as isize + dy;

        if new_x >= 0 && new_x < SIZE as isize && new_y >= 0 && new_y < SIZE as isize {
            let new_x = new_x as usize;
            let new_y = new_y as usize;

            let mut board = self.board;
            board[x_pos][y_pos] = board[new_x][new_y];
            board[new_x][new_y] = 0;
            Some(Self { board })
        } else {
            None
        }
    }

    /// Every state one move away, in `Move::ALL` order.
    pub fn successors(&self) -> impl Iterator<Item = (Move, PuzzleState)> + '_ {
        Move::ALL
            .into_iter()
            .filter_map(move |dir| self.apply_move(dir).map(|next| (dir, next)))
    }

    pub fn is_goal(&self) -> bool {
        *self == Self::goal()
    }

    /// Whether the goal is reachable. On an odd-width board that holds exactly
    /// when the number of inversions among the numbered tiles is even.
    pub fn is_solvable(&self) -> bool {
        let flattened: Vec<u8> = self.tiles().collect();
        count_inversions(&flattened) % 2 == 0
    }

    /// Walks `moves` random steps away from the goal. A direction that would leave
    /// the board is replaced by its opposite, so every step changes the state.
    pub fn scramble<R: Rng + ?Sized>(moves: usize, rng: &mut R) -> Self {
        let mut state = Self::goal();
        for _ in 0..moves {
            let dir = Move::ALL[rng.gen_range(0..Move::ALL.len())];
            state = match state.apply_move(dir) {
                Some(next) => next,
                None => match state.apply_move(dir.opposite()) {
                    Some(next) => next,
                    None => state,
                },
            };
        }
        state
    }
}

fn count_inversions(flattened: &[u8]) -> usize {
    flattened
        .iter()
        .enumerate()
        .filter(|&(_, &val)| val != 0)
        .map(|(i, &val)| {
            flattened[i + 1..]
                .iter()
                .filter(|&&next| next != 0 && next < val)
                .count()
        })
        .sum()
}

impl Default for PuzzleState {
    fn default() -> Self {
        Self::goal()
    }
}

impl FromStr for PuzzleState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_spec(s)
    }
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.board {
            write!(f, "|")?;
            for &val in row {
                match val {
                    0 => write!(f, "b|")?,
                    n => write!(f, "{}|", n)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn parses_goal() {
        let state = PuzzleState::from_spec("b12345678").unwrap();
        assert_eq!(state, PuzzleState::goal());
        assert!(state.is_goal());
        assert_eq!(state.blank_position(), (0, 0));
        assert_eq!(state.get(2, 2), 8);
    }

    #[test]
    fn whitespace_is_ignored() {
        let spaced: PuzzleState = "b12 345 678".parse().unwrap();
        assert_eq!(spaced, PuzzleState::goal());
        assert_eq!(spaced.to_spec(), "b12345678");
    }

    #[test]
    fn rejects_malformed_specs() {
        assert_eq!(
            PuzzleState::from_spec("b1234567"),
            Err(ParseStateError::WrongLength(8))
        );
        assert_eq!(
            PuzzleState::from_spec("b12345678b"),
            Err(ParseStateError::WrongLength(10))
        );
        assert_eq!(
            PuzzleState::from_spec("b1234567a"),
            Err(ParseStateError::InvalidCharacter('a'))
        );
        assert_eq!(
            PuzzleState::from_spec("012345678"),
            Err(ParseStateError::InvalidCharacter('0'))
        );
        assert_eq!(
            PuzzleState::from_spec("b123456bb"),
            Err(ParseStateError::DuplicateCharacter('b'))
        );
        assert_eq!(
            PuzzleState::from_spec("b12345671"),
            Err(ParseStateError::DuplicateCharacter('1'))
        );
    }

    #[test]
    fn moves_stop_at_the_edge() {
        let goal = PuzzleState::goal();
        assert_eq!(goal.apply_move(Move::Up), None);
        assert_eq!(goal.apply_move(Move::Left), None);

        let right = goal.apply_move(Move::Right).unwrap();
        assert_eq!(right.to_spec(), "1b2345678");
        let down = goal.apply_move(Move::Down).unwrap();
        assert_eq!(down.to_spec(), "312b45678");

        // the original is left untouched
        assert!(goal.is_goal());
    }

    #[test]
    fn opposite_move_restores_state() {
        let start = PuzzleState::from_spec("1253b4678").unwrap();
        let mut frontier = vec![start];
        for _ in 0..4 {
            let mut next = Vec::new();
            for state in frontier {
                for (dir, moved) in state.successors() {
                    assert_eq!(moved.apply_move(dir.opposite()), Some(state));
                    next.push(moved);
                }
            }
            frontier = next;
        }
    }

    #[test]
    fn successors_follow_move_order() {
        let center = PuzzleState::from_spec("1234b5678").unwrap();
        let dirs: Vec<Move> = center.successors().map(|(dir, _)| dir).collect();
        assert_eq!(dirs, Move::ALL);

        let corner: Vec<Move> = PuzzleState::goal().successors().map(|(d, _)| d).collect();
        assert_eq!(corner, vec![Move::Down, Move::Right]);
    }

    #[test]
    fn solvability_uses_inversion_parity() {
        assert!(PuzzleState::goal().is_solvable());
        assert!(PuzzleState::from_spec("142b35678").unwrap().is_solvable());
        assert!(!PuzzleState::from_spec("b21345678").unwrap().is_solvable());
    }

    #[test]
    fn scramble_is_reproducible_and_solvable() {
        let a = PuzzleState::scramble(200, &mut StdRng::seed_from_u64(1111));
        let b = PuzzleState::scramble(200, &mut StdRng::seed_from_u64(1111));
        assert_eq!(a, b);
        assert!(a.is_solvable());
        assert_eq!(PuzzleState::scramble(0, &mut StdRng::seed_from_u64(7)), PuzzleState::goal());
    }

    #[test]
    fn parses_and_prints_moves() {
        assert_eq!("UP".parse::<Move>(), Ok(Move::Up));
        assert_eq!(" left ".parse::<Move>(), Ok(Move::Left));
        assert!("north".parse::<Move>().is_err());
        assert_eq!(format_moves(&[Move::Right, Move::Up, Move::Left]), "Right Up Left");
    }

    #[test]
    fn displays_board_rows() {
        let state = PuzzleState::from_spec("1b2345678").unwrap();
        assert_eq!(state.to_string(), "|1|b|2|\n|3|4|5|\n|6|7|8|\n");
    }
}
