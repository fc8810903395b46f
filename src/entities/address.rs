// 🏠 Address Book - US mailing addresses sampled from a lookup table
//
// Layout: { "US": { "<state>": { "<city>": [ { "street", "zip" } ] } } }
// BTreeMap keeps iteration order stable, so a seeded RNG reproduces addresses.

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

const FALLBACK_STREETS: [&str; 6] = ["Main", "Oak", "Maple", "Cedar", "Elm", "Washington"];
const FALLBACK_SUFFIXES: [&str; 5] = ["St", "Ave", "Rd", "Dr", "Ln"];

/// One street entry under a city
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressEntry {
    pub street: String,
    pub zip: String,
}

/// city → entries
pub type CityTable = BTreeMap<String, Vec<AddressEntry>>;
/// state → cities
pub type StateTable = BTreeMap<String, CityTable>;

/// Where an address came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressSource {
    /// Sampled from the lookup table
    Database,
    /// Assembled from fixed street parts
    Generator,
}

impl AddressSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressSource::Database => "database",
            AddressSource::Generator => "generator",
        }
    }
}

/// Complete postal address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub source: AddressSource,
}

impl Address {
    /// One-line form: "street, city, state zip"
    pub fn one_line(&self) -> String {
        format!("{}, {}, {} {}", self.street, self.city, self.state, self.zip)
    }
}

// ============================================================================
// ADDRESS BOOK
// ============================================================================

/// Read-only address table keyed by country code.
#[derive(Debug, Clone, Default)]
pub struct AddressBook {
    countries: BTreeMap<String, StateTable>,
}

impl AddressBook {
    pub fn new() -> Self {
        AddressBook {
            countries: BTreeMap::new(),
        }
    }

    pub fn from_entries(countries: BTreeMap<String, StateTable>) -> Self {
        AddressBook { countries }
    }

    /// Load address table from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read address database: {:?}", path.as_ref()))?;

        let countries: BTreeMap<String, StateTable> =
            serde_json::from_str(&content).context("Failed to parse address database JSON")?;

        Ok(AddressBook::from_entries(countries))
    }

    /// Load address table, degrading to an empty book on any failure.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(path.as_ref()) {
            Ok(book) => {
                info!(states = book.state_count("US"), path = ?path.as_ref(), "Address database loaded");
                book
            }
            Err(e) => {
                warn!(error = %format!("{:#}", e), "Address database load failed, using generated addresses");
                AddressBook::new()
            }
        }
    }

    pub fn state_count(&self, country: &str) -> usize {
        self.countries.get(country).map_or(0, |states| states.len())
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Sample state → city → entry under "US"; any miss falls back to a generated address
    pub fn generate_address<R: Rng + ?Sized>(&self, rng: &mut R) -> Address {
        self.sample("US", rng)
            .unwrap_or_else(|| generate_fallback_address(rng))
    }

    fn sample<R: Rng + ?Sized>(&self, country: &str, rng: &mut R) -> Option<Address> {
        let states = self.countries.get(country)?;

        let state_names: Vec<&String> = states.keys().collect();
        let state = *state_names.choose(rng)?;

        let cities = &states[state];
        let city_names: Vec<&String> = cities.keys().collect();
        let city = *city_names.choose(rng)?;

        let entry = cities[city].choose(rng)?;

        Some(Address {
            street: entry.street.clone(),
            city: city.clone(),
            state: state.clone(),
            zip: entry.zip.clone(),
            country: country.to_string(),
            source: AddressSource::Database,
        })
    }
}

/// "{number} {street} {suffix}", Portland OR 97219
pub fn generate_fallback_address<R: Rng + ?Sized>(rng: &mut R) -> Address {
    let number = rng.gen_range(100..=9999);
    let street = FALLBACK_STREETS[rng.gen_range(0..FALLBACK_STREETS.len())];
    let suffix = FALLBACK_SUFFIXES[rng.gen_range(0..FALLBACK_SUFFIXES.len())];

    Address {
        street: format!("{} {} {}", number, street, suffix),
        city: "Portland".to_string(),
        state: "OR".to_string(),
        zip: "97219".to_string(),
        country: "US".to_string(),
        source: AddressSource::Generator,
    }
}

// ============================================================================
// TESTS
// ============================================================================
