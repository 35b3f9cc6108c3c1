//! Normalized package graph shared by every index format

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One downloadable package as reported by a distribution index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Absolute URL of the package artifact
    pub url: String,
    /// Bare dependency names (version constraints and alternatives stripped)
    pub dependencies: Vec<String>,
}

impl PackageRecord {
    pub fn new(url: impl Into<String>, dependencies: Vec<String>) -> Self {
        Self {
            url: url.into(),
            dependencies,
        }
    }
}

/// Mapping from package name to its record, scoped to one
/// distribution/version/architecture selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageGraph {
    packages: HashMap<String, PackageRecord>,
}

impl PackageGraph {
    /// Create a new empty package graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any earlier record of the same name
    pub fn insert(&mut self, name: impl Into<String>, record: PackageRecord) -> Option<PackageRecord> {
        self.packages.insert(name.into(), record)
    }

    pub fn get(&self, name: &str) -> Option<&PackageRecord> {
        self.packages.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl FromIterator<(String, PackageRecord)> for PackageGraph {
    fn from_iter<I: IntoIterator<Item = (String, PackageRecord)>>(iter: I) -> Self {
        Self {
            packages: iter.into_iter().collect(),
        }
    }
}
