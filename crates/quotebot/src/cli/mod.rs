//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the quotebot binary.

mod check;
mod commands;
mod run;

pub use check::{CheckReport, GenerationCheck, TwitterStatus, VarStatus, run_check};
pub use commands::{Cli, Commands};
pub use run::{run_bot, run_once};
