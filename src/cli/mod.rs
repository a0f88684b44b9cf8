//! CLI module - argument parsing, interactive prompts and subcommands

mod args;
mod prompts;
pub mod sample;

pub use args::{Cli, Commands};
pub use prompts::*;
