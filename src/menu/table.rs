//! Pricing table types and loading

use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_NOTE: &str = "Final bill will include 7% VAT and 10% service fee.";
const DEFAULT_UNAVAILABLE_NOTE: &str = "Not available at this branch";

#[derive(Error, Debug)]
pub enum MenuError {
    #[error("Failed to read pricing table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid pricing table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Process-wide pricing table, read-only after load
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuPricingTable {
    #[serde(default)]
    pub branches: HashMap<String, BranchInfo>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub display_rules: DisplayRules,
}

/// Per-branch menu settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BranchInfo {
    /// Hair-length codes offered at this branch, in display order
    #[serde(default)]
    pub lengths: Vec<String>,
}

/// A menu category
#[derive(Debug, Clone, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl Section {
    pub fn label(&self) -> &str {
        self.name_en.as_deref().unwrap_or(&self.id)
    }

    /// Categories containing per-length items need a length before pricing
    pub fn requires_length(&self) -> bool {
        self.items.iter().any(|item| item.per_length)
    }
}

/// A priced service
#[derive(Debug, Clone, Deserialize)]
pub struct MenuItem {
    pub id: String,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub per_length: bool,
    #[serde(default)]
    pub branch_prices: HashMap<String, BranchPricing>,
}

impl MenuItem {
    pub fn display_name(&self) -> &str {
        self.name_en.as_deref().unwrap_or(&self.id)
    }
}

/// An item's pricing at one branch. Only positive amounts are kept, so a
/// missing key and a zero price read the same.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawBranchPricing")]
pub enum BranchPricing {
    Unavailable,
    Priced {
        flat: Option<u64>,
        by_length: BTreeMap<String, u64>,
    },
}

impl BranchPricing {
    pub fn flat(&self) -> Option<u64> {
        match self {
            BranchPricing::Priced { flat, .. } => *flat,
            BranchPricing::Unavailable => None,
        }
    }

    pub fn at_length(&self, length: &str) -> Option<u64> {
        match self {
            BranchPricing::Priced { by_length, .. } => by_length.get(length).copied(),
            BranchPricing::Unavailable => None,
        }
    }
}

#[derive(Deserialize)]
struct RawBranchPricing {
    #[serde(default)]
    unavailable: bool,
    #[serde(default)]
    flat: Option<Value>,
    #[serde(flatten)]
    by_length: BTreeMap<String, Value>,
}

impl From<RawBranchPricing> for BranchPricing {
    fn from(raw: RawBranchPricing) -> Self {
        if raw.unavailable {
            return BranchPricing::Unavailable;
        }
        BranchPricing::Priced {
            flat: raw.flat.as_ref().and_then(positive_amount),
            by_length: raw
                .by_length
                .iter()
                .filter_map(|(length, value)| positive_amount(value).map(|v| (length.clone(), v)))
                .collect(),
        }
    }
}

fn positive_amount(value: &Value) -> Option<u64> {
    value.as_u64().filter(|amount| *amount > 0)
}

/// Notes appended to listing lines
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayRules {
    #[serde(default = "default_note")]
    pub note: String,
    #[serde(default = "default_unavailable_note")]
    pub unavailable_note: String,
}

impl Default for DisplayRules {
    fn default() -> Self {
        Self {
            note: default_note(),
            unavailable_note: default_unavailable_note(),
        }
    }
}

fn default_note() -> String {
    DEFAULT_NOTE.to_string()
}

fn default_unavailable_note() -> String {
    DEFAULT_UNAVAILABLE_NOTE.to_string()
}

impl MenuPricingTable {
    pub fn from_json(json: &str) -> Result<Self, MenuError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, MenuError> {
        let json = std::fs::read_to_string(path).map_err(|source| MenuError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load the table, degrading to an empty one on any failure
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(table) => {
                tracing::info!(
                    path = %path.display(),
                    sections = table.sections.len(),
                    branches = table.branches.len(),
                    "Loaded pricing table"
                );
                table
            }
            Err(e) => {
                tracing::error!(error = %e, "Pricing table unavailable, serving an empty menu");
                Self::default()
            }
        }
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    /// Length codes offered at a branch (empty for unknown branches)
    pub fn lengths(&self, branch: &str) -> &[String] {
        self.branches
            .get(branch)
            .map(|info| info.lengths.as_slice())
            .unwrap_or_default()
    }
}
