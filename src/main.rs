use std::{
    fs::File,
    io::{self, Write},
    path::Path,
};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Env, Target};
use lib_2048::Session;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

mod config;
mod input;
mod render;
mod terminal;

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;

        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.init();

    Ok(())
}

fn main() -> Result<()> {
    let args = config::Args::parse();

    init_logging(args.log_file.as_deref())?;

    let rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let stdin = io::stdin();

    let summary = {
        let _raw = terminal::RawTerminal::enable(&stdin)
            .context("failed to switch the terminal to raw input")?;

        let mut keys =
            input::KeyReader::new(stdin.lock()).context("failed to build the key matcher")?;
        let mut screen = render::TerminalScreen::new(io::stdout().lock());

        let mut session = Session::new(rng);
        let result = session.play(&mut screen, &mut keys);

        screen.finish()?;

        result?
    };

    let mut stdout = io::stdout().lock();

    writeln!(stdout, "{}", if summary.lost { "You Lost!!!" } else { "Bye" })?;
    writeln!(
        stdout,
        "Your score was {} (largest tile {}, {} moves)",
        summary.score, summary.max_tile, summary.moves
    )?;

    Ok(())
}
