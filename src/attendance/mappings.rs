//! Optional lookup table from display name to the email and external
//! (learning tracker) ID an organiser wants reported for that person.
//!
//! Format: `{ "Jane Doe": { "Email": "jane@example.com", "LTId": "LT-001" } }`

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{ReportError, ReportResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MappingEntry {
    #[serde(rename = "Email", default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(rename = "LTId", default, deserialize_with = "lenient_string")]
    pub lt_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EmailMappings {
    entries: HashMap<String, MappingEntry>,
}

impl EmailMappings {
    /// Parse the raw JSON table. Blank input is an empty table.
    pub fn from_json(raw: &str) -> ReportResult<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let entries: HashMap<String, MappingEntry> =
            serde_json::from_str(raw).map_err(|e| ReportError::MalformedInput(e.to_string()))?;

        Ok(Self { entries })
    }

    /// Read a mapping file from disk. Parsing happens later, in the pipeline.
    pub fn read_file(path: &Path) -> Result<String> {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read email mappings from {:?}", path))
    }

    pub fn get(&self, name: &str) -> Option<&MappingEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, MappingEntry)> for EmailMappings {
    fn from_iter<I: IntoIterator<Item = (String, MappingEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Spreadsheet exports often turn IDs into numbers; accept either.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}
