mod board;
mod config;
mod error;
mod game;
mod snake;
mod term;

use std::{fs::File, path::Path, sync::Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::{Args, Settings};
use game::{Outcome, SnakeGame};
use term::{Screen, TermManager};

pub type TermInt = u16;

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_tracing(path)?;
    }

    let settings = Settings::from_args(&args);
    info!(tick_period = ?settings.tick_period, start_heading = ?settings.start_heading, "starting snek");

    let mut term = TermManager::new().context("failed to query terminal size")?;
    if let Err(err) = term.setup() {
        restore(&mut term);
        return Err(err).context("failed to set up terminal");
    }

    // The terminal has to be restored whatever happened in the session.
    let result = play(&mut term, settings);
    restore(&mut term);

    let (outcome, score) = result?;
    if outcome != Outcome::Quit {
        println!("{} Score: {}", headline(outcome), score);
    }

    Ok(())
}

fn play(term: &mut TermManager, settings: Settings) -> Result<(Outcome, usize)> {
    let mut game = SnakeGame::new(&mut *term, rand::thread_rng(), settings).context("failed to start game")?;
    let outcome = game.run().context("game loop failed")?;
    let score = game.score();
    drop(game);

    if outcome != Outcome::Quit {
        term.show_message(&[headline(outcome), &format!("Score: {}", score), "", "Press any key to exit"])?;
        term.wait_key()?;
    }

    Ok((outcome, score))
}

fn restore(term: &mut TermManager) {
    if let Err(err) = term.restore() {
        error!(?err, "failed to restore terminal");
    }
}

fn headline(outcome: Outcome) -> &'static str {
    if outcome.is_win() { "You won!" } else { "Game over!" }
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
