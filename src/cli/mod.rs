//! Command-line interface definitions and helpers.
//!
//! This module contains CLI argument parsing, subcommand handlers and the
//! interactive poster screen.

mod args;
mod commands;
mod screen;

pub use args::{Args, Command};
pub use commands::{handle_config_action, run_generate, run_health};
pub use screen::run_screen;
