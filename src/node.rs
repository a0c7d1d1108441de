use crate::heuristic::Heuristic;
use crate::puzzle::{Move, PuzzleState};

/// A state reached during search, with the costs and moves that got there.
#[derive(Debug, Clone)]
pub struct Node {
    state: PuzzleState,
    g: u32,
    h: u32,
    path: Vec<Move>,
}

impl Node {
    pub fn root(state: PuzzleState, heuristic: Heuristic) -> Self {
        Self {
            state,
            g: 0,
            h: heuristic.evaluate(&state),
            path: Vec::new(),
        }
    }

    /// Children one move deeper, in `Move::ALL` order.
    pub fn children(&self, heuristic: Heuristic) -> impl Iterator<Item = Node> + '_ {
        self.state.successors().map(move |(dir, state)| {
            let mut path = Vec::with_capacity(self.path.len() + 1);
            path.extend_from_slice(&self.path);
            path.push(dir);
            Node {
                state,
                g: self.g + 1,
                h: heuristic.evaluate(&state),
                path,
            }
        })
    }

    pub fn state(&self) -> &PuzzleState {
        &self.state
    }

    /// Moves taken from the root.
    pub fn g(&self) -> u32 {
        self.g
    }

    pub fn h(&self) -> u32 {
        self.h
    }

    /// Total cost `g + h`.
    pub fn f(&self) -> u32 {
        self.g + self.h
    }

    pub fn path(&self) -> &[Move] {
        &self.path
    }

    pub fn into_path(self) -> Vec<Move> {
        self.path
    }
}

/// Nodes are the same entity when they hold the same grid, however they got there.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

impl Eq for Node {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_has_no_path() {
        let state = PuzzleState::from_spec("1b2345678").unwrap();
        let root = Node::root(state, Heuristic::Manhattan);
        assert_eq!(root.g(), 0);
        assert_eq!(root.h(), 2);
        assert_eq!(root.f(), 2);
        assert!(root.path().is_empty());
    }

    #[test]
    fn children_extend_path_and_cost() {
        let state = PuzzleState::from_spec("1b2345678").unwrap();
        let root = Node::root(state, Heuristic::MisplacedTiles);
        let children: Vec<Node> = root.children(Heuristic::MisplacedTiles).collect();

        let moves: Vec<Move> = children.iter().map(|c| c.path()[0]).collect();
        assert_eq!(moves, vec![Move::Down, Move::Left, Move::Right]);

        let solved = &children[1];
        assert!(solved.state().is_goal());
        assert_eq!(solved.g(), 1);
        assert_eq!(solved.h(), 0);
        assert_eq!(solved.f(), 1);
        assert!(children.iter().all(|c| c.g() == 1 && c.path().len() == 1));
    }

    #[test]
    fn equality_ignores_path() {
        let goal = PuzzleState::goal();
        let direct = Node::root(goal, Heuristic::Manhattan);
        let detour = Node::root(goal.apply_move(Move::Right).unwrap(), Heuristic::Manhattan)
            .children(Heuristic::Manhattan)
            .find(|c| c.state().is_goal())
            .unwrap();
        assert_eq!(direct, detour);
        assert_ne!(direct.g(), detour.g());
    }
}
