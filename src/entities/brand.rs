// 💳 Brand Registry - BIN prefix → brand/length/CVV/bank/country
//
// Issuers register BINs at different granularities, so lookup widens the
// prefix step by step: full code, 4 digits, 2 digits, 1 digit.
// Nothing matched → classic rule-based classification by leading digits.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Prefix lengths tried after the exact match, longest first.
const FALLBACK_PREFIX_LENGTHS: [usize; 3] = [4, 2, 1];

// ============================================================================
// BRAND PROFILE
// ============================================================================

/// Card metadata attached to a BIN prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandProfile {
    /// Display brand ("Visa", "Mastercard", "American Express", ...)
    #[serde(default = "default_brand")]
    pub brand: String,

    /// Total number of digits in the account number, check digit included
    #[serde(default = "default_length")]
    pub length: usize,

    /// CVV digits (3 or 4)
    #[serde(default = "default_cvv_length")]
    pub cvv_length: usize,

    /// Issuing bank
    #[serde(default = "default_unknown")]
    pub bank: String,

    /// Country code (ISO 3166-1 alpha-2)
    #[serde(default = "default_country")]
    pub country: String,

    #[serde(default = "default_country_name")]
    pub country_name: String,

    /// Lowercase scheme key written by the BIN selector ("visa", "amex", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    /// Funding type ("debit", "credit")
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
}

fn default_brand() -> String {
    "Unknown".to_string()
}

fn default_length() -> usize {
    16
}

fn default_cvv_length() -> usize {
    3
}

fn default_unknown() -> String {
    "Unknown".to_string()
}

fn default_country() -> String {
    "US".to_string()
}

fn default_country_name() -> String {
    "United States".to_string()
}

impl BrandProfile {
    /// Profile with baseline bank/country (Unknown, US)
    pub fn new(brand: &str, length: usize, cvv_length: usize) -> Self {
        BrandProfile {
            brand: brand.to_string(),
            length,
            cvv_length,
            bank: default_unknown(),
            country: default_country(),
            country_name: default_country_name(),
            scheme: None,
            card_type: None,
        }
    }

    /// Builder pattern: set issuing bank
    pub fn with_bank(mut self, bank: &str) -> Self {
        self.bank = bank.to_string();
        self
    }

    /// Builder pattern: set country code + display name
    pub fn with_country(mut self, country: &str, country_name: &str) -> Self {
        self.country = country.to_string();
        self.country_name = country_name.to_string();
        self
    }

    /// Builder pattern: set scheme + funding type
    pub fn with_scheme(mut self, scheme: &str, card_type: &str) -> Self {
        self.scheme = Some(scheme.to_string());
        self.card_type = Some(card_type.to_string());
        self
    }
}

/// Rule-based classification used when the table has no entry.
pub fn classify_by_rules(bin: &str) -> BrandProfile {
    if bin.starts_with('4') {
        BrandProfile::new("Visa", 16, 3)
    } else if bin.starts_with('5') {
        BrandProfile::new("Mastercard", 16, 3)
    } else if bin.starts_with("34") || bin.starts_with("37") {
        BrandProfile::new("American Express", 15, 4)
    } else {
        BrandProfile::new("Unknown", 16, 3)
    }
}

// ============================================================================
// RESOLUTION SOURCE
// ============================================================================

/// Where a resolved profile came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrandSource {
    /// Table hit on this prefix
    Table(String),

    /// Leading-digit rules
    Rules,
}

// ============================================================================
// BRAND REGISTRY
// ============================================================================

/// On-disk layout: `{ "bins": { "<prefix>": { ...profile } } }`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BinDatabaseFile {
    #[serde(default)]
    pub bins: HashMap<String, BrandProfile>,
}

/// Read-only BIN table. Built once, then shared by reference.
#[derive(Debug, Clone, Default)]
pub struct BrandRegistry {
    bins: HashMap<String, BrandProfile>,
}

impl BrandRegistry {
    /// Empty registry: every lookup goes to the rules
    pub fn new() -> Self {
        BrandRegistry {
            bins: HashMap::new(),
        }
    }

    /// Create registry from an in-memory table
    pub fn from_entries(bins: HashMap<String, BrandProfile>) -> Self {
        BrandRegistry { bins }
    }

    /// Load BIN table from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read BIN database: {:?}", path.as_ref()))?;

        let db: BinDatabaseFile =
            serde_json::from_str(&content).context("Failed to parse BIN database JSON")?;

        Ok(BrandRegistry::from_entries(db.bins))
    }

    /// Load BIN table, degrading to an empty registry on any failure.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(path.as_ref()) {
            Ok(registry) => {
                info!(entries = registry.len(), path = ?path.as_ref(), "BIN database loaded");
                registry
            }
            Err(e) => {
                warn!(error = %format!("{:#}", e), "BIN database load failed, using rule-based brand detection");
                BrandRegistry::new()
            }
        }
    }

    /// Resolve a BIN to its profile (table first, then rules)
    pub fn resolve(&self, bin: &str) -> BrandProfile {
        self.resolve_with_source(bin).0
    }

    /// Resolve and report which prefix (if any) matched
    pub fn resolve_with_source(&self, bin: &str) -> (BrandProfile, BrandSource) {
        if let Some((prefix, profile)) = self.lookup(bin) {
            debug!(bin, prefix, brand = %profile.brand, "BIN resolved from table");
            return (profile.clone(), BrandSource::Table(prefix.to_string()));
        }

        let profile = classify_by_rules(bin);
        debug!(bin, brand = %profile.brand, "BIN resolved by rules");
        (profile, BrandSource::Rules)
    }

    /// Table-only lookup: exact code, then 4/2/1-char prefixes
    pub fn lookup<'a>(&'a self, bin: &'a str) -> Option<(&'a str, &'a BrandProfile)> {
        if let Some(profile) = self.bins.get(bin) {
            return Some((bin, profile));
        }

        FALLBACK_PREFIX_LENGTHS.iter().find_map(|&n| {
            let prefix = bin.get(..n).unwrap_or(bin);
            self.bins.get(prefix).map(|profile| (prefix, profile))
        })
    }

    /// Exact-key access
    pub fn get(&self, prefix: &str) -> Option<&BrandProfile> {
        self.bins.get(prefix)
    }

    /// Number of table entries
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
