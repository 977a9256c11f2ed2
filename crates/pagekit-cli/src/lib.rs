//! Pagekit CLI Library
//!
//! Command-line interface for linting and inspecting object repository
//! documents.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
mod output;

pub use commands::{
    CheckArgs, Cli, ColorArg, Commands, FormatArg, ListArgs, PlatformArg, ResolveArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::Reporter;
