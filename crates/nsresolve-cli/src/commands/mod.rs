//! CLI command definitions and dispatch.

pub mod config;
pub mod resolve;

use clap::{Parser, Subcommand};
use nsresolve_common::error::NsResolveError;

/// nsresolve — resolve interface and network namespace filter keys.
#[derive(Parser, Debug)]
#[command(name = "nsresolve", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve an interface index and namespace inode.
    Resolve(resolve::ResolveArgs),
    /// Build the full filter configuration from filter and output flags.
    Config(config::ConfigArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Resolve(args) => resolve::execute(&args),
        Command::Config(args) => config::execute(args),
    }
}

/// Wraps a resolution error so the report leads with its kind.
fn report(err: NsResolveError) -> anyhow::Error {
    let kind = err.kind();
    anyhow::Error::new(err).context(format!("configuration aborted ({kind})"))
}
