use std::{fs::File, io::BufReader, path::PathBuf};

use backend::{Backend, BackendError, Outcome};
use board::{Classic, Towers};
use clap::{Parser, ValueEnum};
use log::error;
use stacks::GameConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum VariantArg {
    Classic,
    Towers,
}

/// Check a game of draughts and print where the pieces end up
#[derive(Parser)]
#[command(name = "backend")]
struct Args {
    /// The game: white placements, black placements, then the moves
    #[arg(default_value = "input.txt")]
    input: PathBuf,

    /// Which game the file describes
    #[arg(short, long, value_enum, default_value_t = VariantArg::Classic)]
    variant: VariantArg,

    /// Take back every hop of a capture chain if any of them is illegal
    #[arg(long)]
    atomic_captures: bool,

    /// Reject moves whose tower descriptions don't match the board
    #[arg(long)]
    strict_signatures: bool,
}

fn play(args: &Args) -> Result<Outcome, BackendError> {
    let config = GameConfig {
        atomic_captures: args.atomic_captures,
        strict_signatures: args.strict_signatures,
    };
    let reader = BufReader::new(File::open(&args.input)?);
    match args.variant {
        VariantArg::Classic => Backend::<Classic>::new(config).run(reader),
        VariantArg::Towers => Backend::<Towers>::new(config).run(reader),
    }
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    match play(&args) {
        Ok(outcome) => println!("{outcome}"),
        Err(e) => {
            error!("{}: {e}", args.input.display());
            println!("{}", e.verdict());
        }
    }
}
