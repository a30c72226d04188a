//! Command-line configuration. Everything the binary needs to decide before a
//! front-end starts is parsed here so `main.rs` stays a short bootstrap.

use clap::{Parser, Subcommand};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "book-catalog", version, about = "In-memory book catalog")]
pub struct Cli {
    /// Front-end to launch. Defaults to the console menu.
    #[command(subcommand)]
    pub frontend: Option<Frontend>,

    /// Start with an empty catalog instead of the demo books.
    #[arg(long)]
    pub no_seed: bool,

    /// Log verbosity (off, error, warn, info, debug, trace). `RUST_LOG` wins
    /// when set.
    #[arg(long, short, default_value = "warn")]
    pub log_level: LevelFilter,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frontend {
    /// Line-based numeric menu on stdin/stdout.
    Console,
    /// Full-screen terminal form.
    Form,
}

impl Cli {
    /// The selected front-end, falling back to the console menu.
    pub fn frontend(&self) -> Frontend {
        self.frontend.unwrap_or(Frontend::Console)
    }

    pub fn seed_demo_data(&self) -> bool {
        !self.no_seed
    }
}
