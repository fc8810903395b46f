// ⚙️ Generator Configuration - defaults → JSON file → environment → CLI flags

use crate::card::validate_bin;
use crate::error::{GenerationError, GenerationResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_BIN_DB: &str = "CARD_FORGE_BIN_DB";
pub const ENV_ADDRESS_DB: &str = "CARD_FORGE_ADDRESS_DB";
pub const ENV_SEED: &str = "CARD_FORGE_SEED";

/// Output layout for generated records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

/// Everything a generation run needs besides the RNG
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// BIN lookup table (`{ "bins": {...} }`)
    pub bin_db_path: PathBuf,

    /// Address lookup table (`{ "US": { state: { city: [...] } } }`)
    pub address_db_path: PathBuf,

    pub output_path: PathBuf,
    pub output_format: OutputFormat,

    pub bin: String,
    pub quantity: usize,

    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            bin_db_path: PathBuf::from("public/bin-database.json"),
            address_db_path: PathBuf::from("public/real-addresses.json"),
            output_path: PathBuf::from("generated_cards.txt"),
            output_format: OutputFormat::Text,
            bin: "451710".to_string(),
            quantity: 10,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Load from JSON; missing keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Apply `CARD_FORGE_*` environment overrides
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_BIN_DB) {
            self.bin_db_path = PathBuf::from(path);
        }

        if let Some(path) = lookup(ENV_ADDRESS_DB) {
            self.address_db_path = PathBuf::from(path);
        }

        if let Some(seed) = lookup(ENV_SEED) {
            let seed = seed
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{} must be an unsigned integer, got '{}'", ENV_SEED, seed))?;
            self.seed = Some(seed);
        }

        Ok(())
    }

    /// Reject runs that could only produce malformed records
    pub fn validate(&self) -> GenerationResult<()> {
        validate_bin(&self.bin)?;

        if self.quantity == 0 {
            return Err(GenerationError::InvalidCount(self.quantity));
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
