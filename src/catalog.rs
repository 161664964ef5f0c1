// 📚 Tree Catalog - every tree type the user can plant
//
// Loaded once at startup from a JSON file (or the built-in defaults), grows
// only through register(), and is written back as a whole-file overwrite.
//
// File format: { "Oak": { "rate": 22.0 }, "Pine": { "rate": 20.0 } }

use crate::entities::Tree;
use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Built-in tree types, used when no catalog file exists
pub const DEFAULT_TREES: [(&str, f64); 10] = [
    ("Oak", 22.0),
    ("Maple", 18.0),
    ("Pine", 20.0),
    ("Willow", 24.0),
    ("Birch", 19.0),
    ("Beech", 21.0),
    ("Poplar", 23.0),
    ("Linden", 17.0),
    ("Ash", 20.5),
    ("Elm", 18.5),
];

// ============================================================================
// PERSISTED RECORD
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TreeRecord {
    /// Older files store the rate under its French key
    #[serde(alias = "taux_absorption")]
    rate: f64,
}

// ============================================================================
// OUTCOMES
// ============================================================================

/// Result of a successful register() call
#[derive(Debug, Clone, PartialEq)]
pub enum Registration {
    /// Name was new to the catalog
    Added,

    /// Name existed; its rate was overwritten
    Replaced { previous_rate: f64 },
}

/// Where the startup catalog came from
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    File,

    /// No file at the configured path
    Defaults,

    /// File existed but could not be loaded
    Fallback { reason: String },
}

// ============================================================================
// CATALOG
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    trees: BTreeMap<String, Arc<Tree>>,
}

impl Catalog {
    /// Catalog pre-loaded with the ten built-in tree types
    pub fn defaults() -> Self {
        let trees = DEFAULT_TREES
            .iter()
            .map(|(name, rate)| (name.to_string(), Tree::shared(*name, *rate)))
            .collect();
        Catalog { trees }
    }

    /// Load the catalog from a JSON file
    ///
    /// A missing file yields the defaults. A file that exists but cannot be
    /// read or parsed is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();

        if !path.exists() {
            debug!(path = %path.display(), "no catalog file, using defaults");
            return Ok(Self::defaults());
        }

        let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&content).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Startup helper: load, falling back to the defaults on any error
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> (Self, CatalogSource) {
        let path = path.as_ref();

        if !path.exists() {
            return (Self::defaults(), CatalogSource::Defaults);
        }

        match Self::load(path) {
            Ok(catalog) => {
                info!(path = %path.display(), trees = catalog.len(), "catalog loaded");
                (catalog, CatalogSource::File)
            }
            Err(e) => {
                warn!(error = %e, "catalog unreadable, falling back to defaults");
                (
                    Self::defaults(),
                    CatalogSource::Fallback {
                        reason: e.to_string(),
                    },
                )
            }
        }
    }

    /// Parse the name -> {rate} JSON object
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let records: BTreeMap<String, TreeRecord> = serde_json::from_str(content)?;

        let trees = records
            .into_iter()
            .map(|(name, record)| {
                let tree = Tree::shared(name.clone(), record.rate);
                (name, tree)
            })
            .collect();

        Ok(Catalog { trees })
    }

    /// Serialize to the name -> {rate} JSON object
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let records: BTreeMap<&str, TreeRecord> = self
            .trees
            .iter()
            .map(|(name, tree)| (name.as_str(), TreeRecord { rate: tree.rate() }))
            .collect();

        serde_json::to_string_pretty(&records)
    }

    /// Write the full catalog, overwriting whatever the file held
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CatalogError> {
        let path = path.as_ref();
        let content = self.to_json()?;

        fs::write(path, content).map_err(|source| CatalogError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), trees = self.len(), "catalog saved");
        Ok(())
    }

    /// Add a tree type, or overwrite the rate of an existing one
    ///
    /// Plantings already holding the old Tree keep the old rate.
    pub fn register(&mut self, name: &str, rate: f64) -> Result<Registration, CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if !rate.is_finite() {
            return Err(CatalogError::InvalidRate(rate.to_string()));
        }

        let previous = self
            .trees
            .insert(name.to_string(), Tree::shared(name, rate));

        let registration = match previous {
            Some(old) => Registration::Replaced {
                previous_rate: old.rate(),
            },
            None => Registration::Added,
        };

        debug!(name, rate, ?registration, "tree registered");
        Ok(registration)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Tree>> {
        self.trees.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.trees.contains_key(name)
    }

    /// Tree names in display order
    pub fn names(&self) -> Vec<&str> {
        self.trees.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Tree>> {
        self.trees.values()
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

/// Parse user input as an absorption rate
///
/// Accepts anything that reads as a finite number once surrounding spaces
/// are trimmed. Commas are not separators of any kind: "18,5" and "1,000"
/// are both rejected.
pub fn parse_rate(input: &str) -> Result<f64, CatalogError> {
    let trimmed = input.trim();

    match trimmed.parse::<f64>() {
        Ok(rate) if rate.is_finite() => Ok(rate),
        _ => Err(CatalogError::InvalidRate(trimmed.to_string())),
    }
}

// ============================================================================
// TESTS
// ============================================================================
