//! quotebot command-line application.
//!
//! The binary loads `.env`, the optional TOML config and the CLI flags, sets
//! up logging and dispatches to one of:
//!
//! - `run`: post now, then on a fixed interval until Ctrl-C
//! - `once`: post a single quote and print the cycle report
//! - `check`: report configuration, optionally test generation, never post

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod logging;
