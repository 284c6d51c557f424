//! Export command - dump all attribute values

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use simscope_core::inspect::Snapshot;

use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Toml,
    Json,
}

/// Arguments for the export command
#[derive(Args)]
pub struct ExportArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Toml)]
    pub format: Format,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn execute(args: ExportArgs, session: &Session) -> Result<()> {
    let text = render(&Snapshot::capture(&session.data, &session.rover), args.format)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write export: {}", path.display()))?;
            println!("Exported {} to {}", session.data.type_name(), path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn render(snapshot: &Snapshot, format: Format) -> Result<String> {
    Ok(match format {
        Format::Toml => snapshot.to_toml()?,
        Format::Json => snapshot.to_json()? + "\n",
    })
}
