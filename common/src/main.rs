use anyhow::Context;
use clap::Parser;
use minesweeper_ai::{Agent, Board, Cell};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Autonomous Minesweeper bot: plays logically safe moves, guesses otherwise.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of rows
    #[arg(long, default_value_t = 8)]
    height: usize,

    /// Number of columns
    #[arg(long, default_value_t = 8)]
    width: usize,

    /// Number of mines to place
    #[arg(long, default_value_t = 8)]
    mines: usize,

    /// Seed for mine placement and guesses; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between moves, in milliseconds
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    /// Print the mine layout before playing
    #[arg(long)]
    reveal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Won,
    Lost(Cell),
    Stuck,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut board = Board::new(args.height, args.width, args.mines, &mut rng)
        .context("failed to create board")?;
    let mut agent = Agent::new(args.height, args.width);
    let delay = Duration::from_millis(args.delay_ms);

    info!(
        height = args.height,
        width = args.width,
        mines = args.mines,
        "starting game"
    );
    if args.reveal {
        println!("{}", board);
    }

    let mut move_count = 0;
    let outcome = loop {
        // --- Choose a move: proven safe first, otherwise a guess ---
        let cell = match agent.safe_move() {
            Some(cell) => {
                info!(%cell, "making deduced safe move");
                cell
            }
            None => match agent.random_move(&mut rng) {
                Some(cell) => {
                    info!(%cell, "no safe move known, guessing");
                    cell
                }
                None => {
                    warn!("no moves left to make");
                    break Outcome::Stuck;
                }
            },
        };
        move_count += 1;

        // --- Play it against the board ---
        if board.is_mine(cell) {
            break Outcome::Lost(cell);
        }
        agent.observe(cell, board.adjacent_mine_count(cell))?;

        for &mine in agent.mines() {
            board.flag(mine);
        }

        println!("\n--- Move #{} ---", move_count);
        print_view(&agent, &board);

        if board.won() {
            break Outcome::Won;
        }

        thread::sleep(delay);
    };

    println!("\n--- Game Over ---");
    match outcome {
        Outcome::Won => info!(moves = move_count, "the bot flagged every mine and won"),
        Outcome::Lost(cell) => info!(moves = move_count, %cell, "the bot hit a mine and lost"),
        Outcome::Stuck => info!(moves = move_count, "the game ended unexpectedly"),
    }
    info!(
        deduced_mines = agent.mines().len(),
        total_mines = board.mine_count(),
        "final knowledge"
    );
    println!("{}", board);

    Ok(())
}

/// Draws the board as the agent sees it: counts for played cells, `F` for
/// deduced mines, `.` for deduced but unplayed safes, `■` for the unknown.
fn print_view(agent: &Agent, board: &Board) {
    print!("   ");
    for col in 0..agent.width {
        print!("{:^3}", col);
    }
    println!("\n  +{}", "---".repeat(agent.width));

    for row in 0..agent.height {
        print!("{:^2}|", row);
        for col in 0..agent.width {
            let cell = Cell { row, col };
            let display = if agent.moves_made().contains(&cell) {
                format!(" {} ", board.adjacent_mine_count(cell))
            } else if agent.mines().contains(&cell) {
                " F ".to_string()
            } else if agent.safes().contains(&cell) {
                " . ".to_string()
            } else {
                " ■ ".to_string()
            };
            print!("{}", display);
        }
        println!();
    }
    println!();
}
