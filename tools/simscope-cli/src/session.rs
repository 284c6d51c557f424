//! Inspector session: configuration, registry and the inspected rover
//!
//! Rover state can be persisted between invocations in a TOML state file
//! (`--state`), one `attribute = value` entry per writable attribute.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use simscope_core::config::{self, Config};
use simscope_core::inspect::{InspectionData, InspectionManager, Value};

use crate::rover::Rover;

/// Options shared by every command
#[derive(clap::Args)]
pub struct GlobalArgs {
    /// Configuration file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Rover state file, created on first write
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,
}

pub struct Session {
    pub data: Arc<InspectionData<Rover>>,
    pub rover: Rover,
    state_path: Option<PathBuf>,
}

impl Session {
    pub fn open(args: &GlobalArgs) -> Result<Self> {
        let config = match &args.config {
            Some(path) => config::load_from(path)?,
            None => config::load(),
        };
        Self::with_config(&config, args.state.clone())
    }

    pub fn with_config(config: &Config, state_path: Option<PathBuf>) -> Result<Self> {
        let manager = InspectionManager::new(config.inspection.clone());
        let data = manager.data::<Rover>()?;

        let mut rover = Rover::default();
        if let Some(path) = &state_path
            && path.exists()
        {
            load_state(&data, &mut rover, path)?;
        }

        Ok(Self {
            data,
            rover,
            state_path,
        })
    }

    /// Parse `text` as a value for `attribute`
    pub fn parse_attribute(&self, attribute: &str, text: &str) -> Result<Value> {
        let ty = self
            .data
            .attribute_type(attribute)
            .with_context(|| format!("Unknown attribute: {attribute}"))?;
        Ok(Value::parse(&ty, text)?)
    }

    /// Write the writable attributes back to the state file, if any
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.state_path else {
            return Ok(());
        };

        let mut table = toml::Table::new();
        for point in self.data.attributes().filter(|p| !p.is_read_only()) {
            if let Some(value) = self.data.attribute_value(&self.rover, point.name()) {
                table.insert(point.name().to_string(), toml::Value::String(value.to_string()));
            }
        }

        std::fs::write(path, toml::to_string_pretty(&table)?)
            .with_context(|| format!("Failed to write state: {}", path.display()))?;
        tracing::debug!("Saved rover state to {}", path.display());
        Ok(())
    }
}

fn load_state(data: &InspectionData<Rover>, rover: &mut Rover, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read state: {}", path.display()))?;
    let table: toml::Table = toml::from_str(&content)
        .with_context(|| format!("Failed to parse state: {}", path.display()))?;

    for (name, entry) in table {
        let Some(ty) = data.attribute_type(&name) else {
            tracing::warn!("Ignoring unknown attribute in state file: {}", name);
            continue;
        };
        let text = match entry {
            toml::Value::String(s) => s,
            other => other.to_string(),
        };
        let value = Value::parse(&ty, &text)
            .with_context(|| format!("Invalid state entry `{name}`"))?;
        data.try_set_attribute_value(rover, &name, value)
            .with_context(|| format!("Failed to restore `{name}`"))?;
    }

    Ok(())
}
