//! Line-oriented command interpreter driving a puzzle session, usable
//! interactively or over a script file.

use crate::experiment::{run_experiments, ExperimentConfig};
use crate::heuristic::{manhattan_distance, misplaced_tiles, Heuristic};
use crate::puzzle::{format_moves, Move, ParseMoveError, ParseStateError, PuzzleState};
use crate::search::{ConfigError, SearchEngine, SearchOutcome};
use log::debug;
use rand::{rngs::StdRng, SeedableRng};
use std::io::{self, BufRead, Write};
use thiserror::Error;

pub const HELP: &str = "\
Available commands:
setState <state>        : sets the puzzle state, e.g. 'setState b12 345 678'
randomizeState <n>      : makes n random moves from the goal state
printState              : prints the current puzzle state
move <direction>        : moves the blank 'up', 'down', 'left' or 'right'
solve a-star <h1|h2>    : solves the current state with A*
                            h1 = number of misplaced tiles
                            h2 = Manhattan distance
solve beam <k>          : solves the current state with beam search of width k using h2
maxNodes <n>            : limits the number of nodes considered during a search
heuristicTest           : prints both heuristics for the current state
runExperiments          : compares the searches over many random states
help                    : prints this message
exit                    : leaves the session";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    #[error("Unrecognized command {0:?}")]
    UnknownCommand(String),
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("Expected a positive integer but got {0:?}")]
    InvalidNumber(String),
    #[error("Only 'a-star' and 'beam' searches are supported, got {0:?}")]
    UnknownAlgorithm(String),
    #[error("The blank cannot move {0}")]
    BlockedMove(Move),
    #[error(transparent)]
    State(#[from] ParseStateError),
    #[error(transparent)]
    Move(#[from] ParseMoveError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetState(PuzzleState),
    Randomize(usize),
    Print,
    Move(Move),
    AStar(Heuristic),
    Beam(usize),
    MaxNodes(usize),
    HeuristicTest,
    RunExperiments,
    Help,
    Exit,
}

fn positive(token: Option<&str>, name: &'static str) -> Result<usize, ShellError> {
    let token = token.ok_or(ShellError::MissingArgument(name))?;
    match token.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ShellError::InvalidNumber(token.to_owned())),
    }
}

impl Command {
    /// Parses one line. Blank lines parse to `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ShellError> {
        let lowered = line.trim().to_ascii_lowercase();
        let mut tokens = lowered.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(None);
        };

        let command = match name {
            "setstate" => {
                let rest: String = tokens.collect();
                if rest.is_empty() {
                    return Err(ShellError::MissingArgument("state"));
                }
                Command::SetState(PuzzleState::from_spec(&rest)?)
            }
            "randomizestate" => {
                let token = tokens.next().ok_or(ShellError::MissingArgument("moves"))?;
                let moves = token
                    .parse()
                    .map_err(|_| ShellError::InvalidNumber(token.to_owned()))?;
                Command::Randomize(moves)
            }
            "printstate" => Command::Print,
            "move" => {
                let dir = tokens.next().ok_or(ShellError::MissingArgument("direction"))?;
                Command::Move(dir.parse()?)
            }
            "solve" => match tokens.next() {
                Some("a-star") => {
                    let name = tokens.next().ok_or(ShellError::MissingArgument("heuristic"))?;
                    Command::AStar(name.parse()?)
                }
                Some("beam") => Command::Beam(positive(tokens.next(), "beam width")?),
                Some(other) => return Err(ShellError::UnknownAlgorithm(other.to_owned())),
                None => return Err(ShellError::MissingArgument("algorithm")),
            },
            "maxnodes" => Command::MaxNodes(positive(tokens.next(), "node budget")?),
            "heuristictest" => Command::HeuristicTest,
            "runexperiments" => Command::RunExperiments,
            "help" => Command::Help,
            "exit" => Command::Exit,
            _ => return Err(ShellError::UnknownCommand(name.to_owned())),
        };
        Ok(Some(command))
    }
}

/// Current puzzle, search engine and random source shared by the commands of one session.
pub struct Session {
    state: PuzzleState,
    engine: SearchEngine,
    rng: StdRng,
    experiments: ExperimentConfig,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self {
            state: PuzzleState::goal(),
            engine: SearchEngine::new(),
            rng: StdRng::seed_from_u64(seed),
            experiments: ExperimentConfig::default(),
        }
    }

    pub fn with_experiments(mut self, experiments: ExperimentConfig) -> Self {
        self.experiments = experiments;
        self
    }

    pub fn state(&self) -> &PuzzleState {
        &self.state
    }

    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    /// Runs a single command. Returns false once the session should end.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<bool> {
        debug!("Executing {:?}", command);
        match command {
            Command::SetState(state) => self.state = state,
            Command::Randomize(moves) => {
                self.state = PuzzleState::scramble(moves, &mut self.rng);
            }
            Command::Print => write!(out, "Current state:\n{}\n", self.state)?,
            Command::Move(dir) => match self.state.apply_move(dir) {
                Some(next) => self.state = next,
                None => writeln!(out, "Invalid input: {}\n", ShellError::BlockedMove(dir))?,
            },
            Command::AStar(heuristic) => {
                self.engine.set_heuristic(heuristic);
                let result = self.engine.a_star_search(&self.state);
                self.report(result, &format!("A* {}", heuristic), out)?;
            }
            Command::Beam(width) => {
                let result = self.engine.beam_search(width, &self.state);
                self.report(result, "Beam search", out)?;
            }
            Command::MaxNodes(max_nodes) => {
                if let Err(err) = self.engine.set_max_nodes(max_nodes) {
                    writeln!(out, "Invalid input: {}\n", err)?;
                }
            }
            Command::HeuristicTest => {
                writeln!(out, "Testing heuristic costs:")?;
                writeln!(out, "H1 (misplaced tiles): {}", misplaced_tiles(&self.state))?;
                writeln!(out, "H2 (Manhattan distance): {}\n", manhattan_distance(&self.state))?;
            }
            Command::RunExperiments => {
                writeln!(out, "Running experiments (this will take a bit)")?;
                match run_experiments(&self.experiments, &mut self.rng) {
                    Ok(report) => writeln!(out, "{}", report)?,
                    Err(err) => writeln!(out, "Invalid input: {}\n", err)?,
                }
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Exit => return Ok(false),
        }
        Ok(true)
    }

    fn report<W: Write>(
        &mut self,
        result: Result<SearchOutcome, ConfigError>,
        label: &str,
        out: &mut W,
    ) -> io::Result<()> {
        match result {
            Ok(SearchOutcome::Success(solution)) => {
                writeln!(
                    out,
                    "{} solution found in {} moves.\nSolution from initial state: {}\nNodes explored for search: {}\n",
                    label,
                    solution.path_length(),
                    format_moves(&solution.moves),
                    self.engine.nodes_expanded()
                )?;
                // a solved puzzle goes back to the goal
                self.state = PuzzleState::goal();
            }
            Ok(SearchOutcome::Failure(failure)) => writeln!(
                out,
                "No {} solution: {}\nNodes explored for search: {}\n",
                label,
                failure,
                self.engine.nodes_expanded()
            )?,
            Err(err) => writeln!(out, "Invalid input: {}\n", err)?,
        }
        Ok(())
    }

    /// Feeds every line of `input` through the interpreter until it runs out or
    /// hits `exit`. Bad lines are reported and skipped.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            match Command::parse(&line) {
                Ok(Some(command)) => {
                    if !self.execute(command, out)? {
                        break;
                    }
                }
                Ok(None) => {}
                Err(err) => writeln!(out, "Invalid input: {}\n", err)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(script: &str) -> (Session, String) {
        let mut session = Session::new(1111);
        let mut out = Vec::new();
        session.run(script.as_bytes(), &mut out).unwrap();
        (session, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parses_commands_case_insensitively() {
        assert_eq!(
            Command::parse("setState 1b2 345 678").unwrap(),
            Some(Command::SetState(PuzzleState::from_spec("1b2345678").unwrap()))
        );
        assert_eq!(Command::parse("MOVE Down").unwrap(), Some(Command::Move(Move::Down)));
        assert_eq!(
            Command::parse("solve A-star H1").unwrap(),
            Some(Command::AStar(Heuristic::MisplacedTiles))
        );
        assert_eq!(Command::parse("solve beam 50").unwrap(), Some(Command::Beam(50)));
        assert_eq!(Command::parse("maxNodes 500").unwrap(), Some(Command::MaxNodes(500)));
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn rejects_bad_commands() {
        assert_eq!(
            Command::parse("fly away"),
            Err(ShellError::UnknownCommand("fly".to_owned()))
        );
        assert_eq!(
            Command::parse("maxNodes 0"),
            Err(ShellError::InvalidNumber("0".to_owned()))
        );
        assert_eq!(
            Command::parse("solve beam"),
            Err(ShellError::MissingArgument("beam width"))
        );
        assert_eq!(
            Command::parse("solve bfs h1"),
            Err(ShellError::UnknownAlgorithm("bfs".to_owned()))
        );
        assert_eq!(
            Command::parse("setState b12 345 67"),
            Err(ShellError::State(ParseStateError::WrongLength(8)))
        );
        assert!(matches!(
            Command::parse("solve a-star h3"),
            Err(ShellError::Config(ConfigError::UnknownHeuristic(_)))
        ));
    }

    #[test]
    fn moves_and_prints_state() {
        let (session, out) = run("move down\nmove right\nmove up\nprintState\n");
        assert_eq!(session.state().to_spec(), "3b2415678");
        assert!(out.contains("Current state:"));
    }

    #[test]
    fn blocked_move_is_reported() {
        let (session, out) = run("move up\n");
        assert!(session.state().is_goal());
        assert!(out.contains("The blank cannot move Up"));
    }

    #[test]
    fn solve_resets_to_goal() {
        let (session, out) = run("setState 142 b35 678\nmaxNodes 1000\nsolve a-star h1\n");
        assert!(out.contains("A* h1 solution found in 3 moves."));
        assert!(out.contains("Solution from initial state: Right Up Left"));
        assert!(out.contains("Nodes explored for search: 5"));
        assert!(session.state().is_goal());
        assert!(session.engine().was_solved());
    }

    #[test]
    fn solve_without_budget_is_a_config_error() {
        let (session, out) = run("setState 142 b35 678\nsolve beam 5\n");
        assert!(out.contains("The node budget must be set before searching"));
        assert!(!session.state().is_goal());
    }

    #[test]
    fn failed_search_keeps_state() {
        let (session, out) = run("setState 142b35678\nmaxNodes 500\nsolve beam 1\n");
        assert!(out.contains("No Beam search solution: Frontier exhausted"));
        assert_eq!(session.state().to_spec(), "142b35678");
    }

    #[test]
    fn exit_stops_the_script() {
        let (_, out) = run("exit\nhelp\n");
        assert!(out.is_empty());
        let (_, out) = run("help\nbogus\nheuristicTest\n");
        assert!(out.contains("Available commands:"));
        assert!(out.contains("Unrecognized command \"bogus\""));
        assert!(out.contains("H1 (misplaced tiles): 0"));
        assert!(out.contains("H2 (Manhattan distance): 0"));
    }

    #[test]
    fn randomize_is_seeded() {
        let (a, _) = run("randomizeState 40\n");
        let (b, _) = run("randomizeState 40\n");
        assert_eq!(a.state(), b.state());
        assert!(a.state().is_solvable());
    }

    #[test]
    fn runs_experiments_with_session_config() {
        let mut session = Session::new(5).with_experiments(ExperimentConfig {
            trials: 2,
            scramble_moves: 4,
            beam_width: 5,
            budgets: vec![100],
        });
        let mut out = Vec::new();
        session.run("runExperiments\n".as_bytes(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Fraction of puzzles solved"));
        assert!(out.contains("beam search (k = 5)"));
    }
}
