use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::snake::Direction;

pub const DEFAULT_TICK_RATE: u32 = 10;

/// Terminal snake. Arrow keys or WASD to steer, CTRL+C to quit.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Game ticks per second.
    #[arg(long, default_value_t = DEFAULT_TICK_RATE, value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub tick_rate: u32,

    /// Wait for the first direction key instead of starting upward.
    #[arg(long)]
    pub wait_for_heading: bool,

    /// Write logs to this file (filtered by RUST_LOG, default `info`).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// How the snake picks its heading when the session starts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StartHeading {
    Fixed(Direction),
    FirstKey,
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub tick_period: Duration,
    pub start_heading: StartHeading,
}

impl Settings {
    pub fn from_args(args: &Args) -> Self {
        let start_heading = if args.wait_for_heading {
            StartHeading::FirstKey
        } else {
            StartHeading::Fixed(Direction::Up)
        };

        Settings { tick_period: tick_period(args.tick_rate), start_heading }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings { tick_period: tick_period(DEFAULT_TICK_RATE), start_heading: StartHeading::Fixed(Direction::Up) }
    }
}

fn tick_period(rate: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(rate))
}
