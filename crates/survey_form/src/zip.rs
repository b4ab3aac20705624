use std::{
    collections::HashMap,
    sync::{Arc, OnceLock},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::error;

const BUILTIN_ZIPCODES: &str = include_str!("../assets/zipcodes.json");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipEntry {
    pub city: String,
    pub state: String,
}

#[derive(Debug, Error)]
pub enum ZipTableError {
    #[error("invalid zip code dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawZip {
    Text(String),
    Number(u32),
}

#[derive(Deserialize)]
struct ZipRow {
    zip_code: RawZip,
    city: String,
    state: String,
}

/// Exact-match mapping from 5-digit zip codes to city and state.
#[derive(Debug, Clone, Default)]
pub struct ZipTable {
    entries: HashMap<String, ZipEntry>,
}

impl ZipTable {
    /// Dataset compiled into the crate, parsed once and shared.
    pub fn builtin() -> Arc<ZipTable> {
        static TABLE: OnceLock<Arc<ZipTable>> = OnceLock::new();
        TABLE
            .get_or_init(|| {
                let table = ZipTable::from_json(BUILTIN_ZIPCODES).unwrap_or_else(|err| {
                    error!(%err, "zip: builtin dataset unreadable, lookups will miss");
                    ZipTable::default()
                });
                Arc::new(table)
            })
            .clone()
    }

    /// Parses a JSON array of `{ zip_code, city, state }` rows. Numeric zip
    /// codes are zero-padded to five digits.
    pub fn from_json(raw: &str) -> Result<Self, ZipTableError> {
        let rows: Vec<ZipRow> = serde_json::from_str(raw)?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let zip = match row.zip_code {
                    RawZip::Text(text) => text.trim().to_string(),
                    RawZip::Number(number) => format!("{number:05}"),
                };
                (zip, row.city, row.state)
            })
            .collect())
    }

    pub fn lookup(&self, zip: &str) -> Option<&ZipEntry> {
        self.entries.get(zip)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<Z, C, S> FromIterator<(Z, C, S)> for ZipTable
where
    Z: Into<String>,
    C: Into<String>,
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (Z, C, S)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(zip, city, state)| {
                (
                    zip.into(),
                    ZipEntry {
                        city: city.into(),
                        state: state.into(),
                    },
                )
            })
            .collect();
        Self { entries }
    }
}
