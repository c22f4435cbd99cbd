//! Manually curated school list fed to the recommender prompt.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

/// One known school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub bus_lines: Vec<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
}

/// The full list of schools the recommender may choose from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchoolCatalog {
    entries: Vec<CatalogEntry>,
}

impl SchoolCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Parse a JSON array of entries.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)
            .map_err(|e| ConfigError::ParseError(format!("school catalog: {e}")))?;
        Ok(Self::new(entries))
    }

    /// Load the catalog from a JSON file.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let catalog = Self::from_json(&raw)?;
        info!(path = %path.display(), schools = catalog.len(), "Loaded school catalog");
        Ok(catalog)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the catalog as a bullet list for prompt injection.
    pub fn to_prompt_section(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                let mut line = format!("- {}", entry.name);
                if let Some(ref hood) = entry.neighborhood {
                    line.push_str(&format!(" (barrio: {hood})"));
                }
                if !entry.bus_lines.is_empty() {
                    line.push_str(&format!(" [colectivos: {}]", entry.bus_lines.join(", ")));
                }
                if !entry.specialties.is_empty() {
                    line.push_str(&format!("; especialidades: {}", entry.specialties.join(", ")));
                }
                if !entry.description.is_empty() {
                    line.push_str(&format!(". {}", entry.description));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
