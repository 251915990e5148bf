//! City-to-file configuration.
//!
//! [`CityData`] maps city names to their trip-log CSV paths. It is passed
//! into callers explicitly; there is no process-wide registry.
//!
//! Stored as a plain JSON object on disk:
//! ```json
//! {
//!   "chicago": "data/chicago.csv",
//!   "new york city": "data/new_york_city.csv"
//! }
//! ```

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The standard three-city layout and its file names.
pub const DEFAULT_CITIES: &[(&str, &str)] = &[
    ("chicago", "chicago.csv"),
    ("new york city", "new_york_city.csv"),
    ("washington", "washington.csv"),
];

#[derive(Debug, Clone)]
pub struct CityData {
    entries: HashMap<String, PathBuf>,
}

impl CityData {
    /// Loads the mapping from a JSON file at `path`. City names are
    /// normalized to lowercase.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let raw: HashMap<String, PathBuf> = serde_json::from_str(&content)?;
        let entries = raw
            .into_iter()
            .map(|(city, file)| (city.to_lowercase(), file))
            .collect();
        Ok(Self { entries })
    }

    /// The standard three-city mapping rooted at `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let entries = DEFAULT_CITIES
            .iter()
            .map(|&(city, file)| (city.to_string(), dir.as_ref().join(file)))
            .collect();
        Self { entries }
    }

    /// Returns the CSV path for `city`, matching case-insensitively.
    pub fn resolve(&self, city: &str) -> Result<&Path> {
        self.entries
            .get(&city.trim().to_lowercase())
            .map(PathBuf::as_path)
            .ok_or_else(|| Error::InvalidSelector {
                kind: "city",
                value: city.to_string(),
            })
    }

    /// Configured city names, sorted for stable prompts and listings.
    pub fn cities(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
