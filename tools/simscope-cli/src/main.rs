//! Simscope CLI - Console inspector for simulation entities
//!
//! # Commands
//!
//! - `simscope list` - Show attributes (with current values) and methods
//! - `simscope get <name>` - Read one attribute
//! - `simscope set <name> <value>` - Write one attribute
//! - `simscope invoke <name> [args...]` - Call an inspection method
//! - `simscope export [--format toml|json]` - Dump all attribute values
//!
//! # Usage
//!
//! ```bash
//! # Keep rover state between invocations
//! simscope --state rover.toml set speed 2.5
//! simscope --state rover.toml invoke turn -- -90
//! simscope --state rover.toml invoke drive 4
//! simscope --state rover.toml export --format json
//! ```
//!
//! Logging is controlled through `RUST_LOG` (default: `info`).

mod access;
mod export;
mod invoke;
mod list;
mod rover;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};

use session::{GlobalArgs, Session};

/// Simscope CLI - Console inspector for simulation entities
#[derive(Parser)]
#[command(name = "simscope")]
#[command(about = "Inspect and edit a simulated rover")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show attributes and methods
    List,

    /// Read an attribute
    Get(access::GetArgs),

    /// Write an attribute
    Set(access::SetArgs),

    /// Invoke an inspection method
    Invoke(invoke::InvokeArgs),

    /// Export all attribute values
    Export(export::ExportArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut session = Session::open(&cli.global)?;

    match cli.command {
        Commands::List => list::execute(&session),
        Commands::Get(args) => access::get(args, &session),
        Commands::Set(args) => access::set(args, &mut session),
        Commands::Invoke(args) => invoke::execute(args, &mut session),
        Commands::Export(args) => export::execute(args, &session),
    }
}
