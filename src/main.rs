use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use crossterm::style::Stylize;
use eight_puzzle::{
    experiment::{run_experiments, ExperimentConfig},
    puzzle::format_moves,
    shell::{Session, HELP},
    Algorithm, Heuristic, PuzzleState, SearchEngine, SearchOutcome,
};
use env_logger::TimestampPrecision;
use log::LevelFilter;
use rand::{rngs::StdRng, SeedableRng};
use std::{
    fs::File,
    io::{self, BufReader, Write},
    path::PathBuf,
};

/// Solves the 8-puzzle with A* and width-bounded best-first search
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum AlgorithmArg {
    AStar,
    Beam,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one state, given row-major like "b12 345 678"
    Solve {
        state: PuzzleState,
        #[arg(short, long, value_enum, default_value_t = AlgorithmArg::AStar)]
        algorithm: AlgorithmArg,
        /// Heuristic for A*, "h1" (misplaced tiles) or "h2" (Manhattan distance)
        #[arg(long, default_value = "h2")]
        heuristic: Heuristic,
        #[arg(short = 'n', long, default_value_t = 10_000)]
        max_nodes: usize,
        /// Frontier width for beam search
        #[arg(short = 'k', long, default_value_t = 50)]
        beam_width: usize,
    },
    /// Print both heuristic values for a state
    Heuristics { state: PuzzleState },
    /// Print a reproducible random state
    Scramble {
        #[arg(short, long, default_value_t = 200)]
        moves: usize,
        #[arg(short, long, default_value_t = 1111)]
        seed: u64,
    },
    /// Run the command interpreter on a script, or on stdin when none is given
    Shell {
        script: Option<PathBuf>,
        #[arg(short, long, default_value_t = 1111)]
        seed: u64,
    },
    /// Compare the searches over many scrambled states
    Experiments {
        #[arg(short, long, default_value_t = 1111)]
        seed: u64,
        #[arg(short, long, default_value_t = 500)]
        trials: usize,
        #[arg(short = 'm', long, default_value_t = 200)]
        scramble_moves: usize,
        #[arg(short = 'k', long, default_value_t = 50)]
        beam_width: usize,
    },
}

fn render(state: &PuzzleState) -> String {
    let mut out = String::new();
    for row in 0..3 {
        out.push('|');
        for col in 0..3 {
            match state.get(row, col) {
                0 => out.push_str(&"b".dark_grey().to_string()),
                n => out.push_str(&n.to_string().bold().to_string()),
            }
            out.push('|');
        }
        out.push('\n');
    }
    out
}

fn solve(
    state: PuzzleState,
    algorithm: AlgorithmArg,
    heuristic: Heuristic,
    max_nodes: usize,
    beam_width: usize,
) -> color_eyre::Result<()> {
    let mut engine = SearchEngine::with_config(heuristic, max_nodes)?;
    let algorithm = match algorithm {
        AlgorithmArg::AStar => Algorithm::AStar(heuristic),
        AlgorithmArg::Beam => Algorithm::Beam(beam_width),
    };

    println!("Initial state:\n{}", render(&state));
    let outcome = engine.search(&state, algorithm, |_| {})?;
    match outcome {
        SearchOutcome::Success(solution) => {
            println!(
                "{}",
                format!(
                    "{} solution found in {} moves",
                    algorithm,
                    solution.path_length()
                )
                .green()
            );
            println!("Moves: {}", format_moves(&solution.moves));

            let mut current = state;
            for &dir in &solution.moves {
                if let Some(next) = current.apply_move(dir) {
                    current = next;
                    println!("{}\n{}", dir, render(&current));
                }
            }
        }
        SearchOutcome::Failure(failure) => {
            println!("{}", format!("No {} solution: {}", algorithm, failure).red());
        }
    }
    println!("Nodes explored for search: {}", engine.nodes_expanded());
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    match cli.command {
        Commands::Solve {
            state,
            algorithm,
            heuristic,
            max_nodes,
            beam_width,
        } => solve(state, algorithm, heuristic, max_nodes, beam_width)?,
        Commands::Heuristics { state } => {
            print!("{}", render(&state));
            println!("H1 (misplaced tiles): {}", eight_puzzle::compute_h1(&state));
            println!("H2 (Manhattan distance): {}", eight_puzzle::compute_h2(&state));
        }
        Commands::Scramble { moves, seed } => {
            let state = PuzzleState::scramble(moves, &mut StdRng::seed_from_u64(seed));
            println!("{}", state.to_spec());
            print!("{}", render(&state));
        }
        Commands::Shell { script, seed } => {
            let mut session = Session::new(seed);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            match script {
                Some(path) => {
                    writeln!(out, "Reading commands from {}", path.display())?;
                    session.run(BufReader::new(File::open(path)?), &mut out)?;
                }
                None => {
                    writeln!(out, "{}", "8-puzzle solver".bold())?;
                    writeln!(out, "{}", HELP)?;
                    session.run(io::stdin().lock(), &mut out)?;
                }
            }
        }
        Commands::Experiments {
            seed,
            trials,
            scramble_moves,
            beam_width,
        } => {
            let config = ExperimentConfig {
                trials,
                scramble_moves,
                beam_width,
                ..ExperimentConfig::default()
            };
            println!("Running {} trials per node budget (this will take a bit)", trials);
            let report = run_experiments(&config, &mut StdRng::seed_from_u64(seed))?;
            print!("{}", report);
        }
    }

    Ok(())
}
