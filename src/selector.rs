// 🃏 BIN Selector - pick debit BINs from a binlist CSV dump
//
// Reads rows (bin, brand, type, issuer, alpha_2, country, ...), keeps DEBIT
// cards, normalizes each to a BrandProfile and picks a country-diverse
// sample. Output uses the BIN database layout so it can be loaded directly
// by BrandRegistry.

use crate::entities::brand::{BinDatabaseFile, BrandProfile};
use crate::error::SelectorError;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::info;

const PROGRESS_EVERY: usize = 50_000;

// ============================================================================
// CSV ROW
// ============================================================================

/// Columns we use from binlist-data.csv (others are ignored)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BinListRow {
    #[serde(default)]
    pub bin: String,

    #[serde(default)]
    pub brand: String,

    #[serde(rename = "type", default)]
    pub card_type: String,

    #[serde(default)]
    pub issuer: String,

    #[serde(default)]
    pub alpha_2: String,

    #[serde(default)]
    pub country: String,
}

/// A BIN that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub bin: String,
    pub profile: BrandProfile,
}

/// Map a CSV row to a profile. `None` for non-debit or incomplete rows.
pub fn profile_for_debit_row(row: &BinListRow) -> Option<BrandProfile> {
    if !row.card_type.eq_ignore_ascii_case("DEBIT") {
        return None;
    }

    let brand = if row.brand.is_empty() { "Unknown" } else { row.brand.as_str() };
    let bank = if row.issuer.is_empty() { "Various" } else { row.issuer.as_str() };
    let raw_scheme = if row.brand.is_empty() {
        "unknown".to_string()
    } else {
        row.brand.to_lowercase().replace(' ', "")
    };

    let (scheme, brand, length, cvv_length) = if raw_scheme.contains("amex") || raw_scheme == "americanexpress" {
        ("amex".to_string(), "American Express".to_string(), 15, 4)
    } else if raw_scheme.contains("visa") {
        ("visa".to_string(), "Visa".to_string(), 16, 3)
    } else if raw_scheme.contains("mastercard") || raw_scheme.contains("master") {
        ("mastercard".to_string(), "Mastercard".to_string(), 16, 3)
    } else if raw_scheme.contains("discover") {
        ("discover".to_string(), "Discover".to_string(), 16, 3)
    } else if raw_scheme.contains("jcb") {
        ("jcb".to_string(), "JCB".to_string(), 16, 3)
    } else if raw_scheme.contains("dinersclub") || raw_scheme.contains("diners") {
        ("dinersclub".to_string(), "Diners Club".to_string(), 14, 3)
    } else if raw_scheme.contains("private") || brand.to_lowercase().contains("label") {
        ("unknown".to_string(), "Private Label".to_string(), 16, 3)
    } else {
        (raw_scheme, brand.to_string(), 16, 3)
    };

    if scheme.is_empty() || row.country.is_empty() || row.alpha_2.chars().count() != 2 {
        return None;
    }

    let profile = BrandProfile::new(&brand, length, cvv_length)
        .with_bank(bank)
        .with_country(&row.alpha_2, &row.country)
        .with_scheme(&scheme, &row.card_type.to_lowercase());

    Some(profile)
}

// ============================================================================
// SELECTOR
// ============================================================================

/// Valid debit BINs grouped by country code
#[derive(Debug, Default)]
pub struct BinSelector {
    by_country: BTreeMap<String, Vec<Candidate>>,
    processed: usize,
}

impl BinSelector {
    /// Load and filter a binlist CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, SelectorError> {
        let file = fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SelectorError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut selector = BinSelector::default();

        for result in rdr.deserialize() {
            let row: BinListRow = result?;
            selector.processed += 1;

            if selector.processed % PROGRESS_EVERY == 0 {
                info!(
                    processed = selector.processed,
                    valid = selector.candidate_count(),
                    "Reading BIN list"
                );
            }

            if row.bin.is_empty() {
                continue;
            }

            if let Some(profile) = profile_for_debit_row(&row) {
                selector
                    .by_country
                    .entry(profile.country.clone())
                    .or_default()
                    .push(Candidate { bin: row.bin, profile });
            }
        }

        info!(
            processed = selector.processed,
            valid = selector.candidate_count(),
            countries = selector.country_count(),
            "BIN list loaded"
        );

        Ok(selector)
    }

    /// Rows read from the CSV
    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn candidate_count(&self) -> usize {
        self.by_country.values().map(Vec::len).sum()
    }

    pub fn country_count(&self) -> usize {
        self.by_country.len()
    }

    /// Pick `n` candidates.
    ///
    /// With `diversity`: one random card per (shuffled) country first, then
    /// top up with a random sample of the whole pool. Without it: plain random
    /// sample. The top-up may repeat a BIN already picked.
    pub fn select<R: Rng + ?Sized>(&self, n: usize, diversity: bool, rng: &mut R) -> Vec<Candidate> {
        let all: Vec<&Candidate> = self.by_country.values().flatten().collect();

        if !diversity {
            return all
                .choose_multiple(rng, n.min(all.len()))
                .map(|c| (*c).clone())
                .collect();
        }

        let mut countries: Vec<&String> = self.by_country.keys().collect();
        countries.shuffle(rng);

        let mut selected = Vec::with_capacity(n);
        for country in countries {
            if selected.len() >= n {
                break;
            }
            if let Some(card) = self.by_country[country].choose(rng) {
                selected.push(card.clone());
            }
        }

        if selected.len() < n {
            let remaining = n - selected.len();
            selected.extend(
                all.choose_multiple(rng, remaining.min(all.len()))
                    .map(|c| (*c).clone()),
            );
        }

        selected
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

/// Selection in BIN database layout (later duplicates overwrite earlier ones)
pub fn to_bin_database(selected: &[Candidate]) -> BinDatabaseFile {
    let mut db = BinDatabaseFile::default();
    for card in selected {
        db.bins.insert(card.bin.clone(), card.profile.clone());
    }
    db
}

/// Write selection as `{ "bins": { ... } }`
pub fn save_selection<P: AsRef<Path>>(path: P, selected: &[Candidate]) -> Result<(), SelectorError> {
    if selected.is_empty() {
        return Err(SelectorError::NoCandidates);
    }

    let json = serde_json::to_string_pretty(&to_bin_database(selected))?;
    fs::write(path.as_ref(), json)?;
    Ok(())
}

/// country code → (country name, count)
pub fn country_distribution(selected: &[Candidate]) -> BTreeMap<String, (String, usize)> {
    let mut dist: BTreeMap<String, (String, usize)> = BTreeMap::new();
    for card in selected {
        let entry = dist
            .entry(card.profile.country.clone())
            .or_insert_with(|| (card.profile.country_name.clone(), 0));
        entry.1 += 1;
    }
    dist
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::brand::BrandRegistry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    const SAMPLE_CSV: &str = "\
bin,brand,type,category,issuer,alpha_2,alpha_3,country
451710,VISA,DEBIT,CLASSIC,Jyske Bank,DK,DNK,Denmark
451711,VISA,CREDIT,CLASSIC,Jyske Bank,DK,DNK,Denmark
532959,MASTERCARD,debit,STANDARD,Chase,US,USA,United States
374245,AMERICAN EXPRESS,DEBIT,,Amex Bank,GB,GBR,United Kingdom
601100,DISCOVER,DEBIT,,,US,USA,United States
356600,JCB,DEBIT,,JCB Co,JP,JPN,Japan
360000,DINERS CLUB,DEBIT,,Diners,FR,FRA,France
700000,,DEBIT,,Local Bank,XX1,,Nowhere
800000,PRIVATE LABEL,DEBIT,,Store,CA,CAN,Canada
900000,MAESTRO,DEBIT,,Maestro Bank,DE,DEU,
";

    fn row(brand: &str, card_type: &str) -> BinListRow {
        BinListRow {
            bin: "400000".to_string(),
            brand: brand.to_string(),
            card_type: card_type.to_string(),
            issuer: String::new(),
            alpha_2: "US".to_string(),
            country: "United States".to_string(),
        }
    }

    #[test]
    fn test_scheme_mapping() {
        let amex = profile_for_debit_row(&row("American Express", "DEBIT")).unwrap();
        assert_eq!((amex.brand.as_str(), amex.length, amex.cvv_length), ("American Express", 15, 4));
        assert_eq!(amex.scheme.as_deref(), Some("amex"));

        let diners = profile_for_debit_row(&row("Diners Club", "DEBIT")).unwrap();
        assert_eq!((diners.length, diners.cvv_length), (14, 3));

        let mc = profile_for_debit_row(&row("MASTERCARD", "Debit")).unwrap();
        assert_eq!(mc.brand, "Mastercard");
        assert_eq!(mc.card_type.as_deref(), Some("debit"));

        let private = profile_for_debit_row(&row("Private Label", "DEBIT")).unwrap();
        assert_eq!(private.brand, "Private Label");
        assert_eq!(private.scheme.as_deref(), Some("unknown"));

        let other = profile_for_debit_row(&row("Maestro", "DEBIT")).unwrap();
        assert_eq!(other.brand, "Maestro");
        assert_eq!(other.scheme.as_deref(), Some("maestro"));

        // Empty issuer → Various
        assert_eq!(other.bank, "Various");
    }

    #[test]
    fn test_non_debit_and_incomplete_rows_skipped() {
        assert!(profile_for_debit_row(&row("VISA", "CREDIT")).is_none());

        let mut bad_country = row("VISA", "DEBIT");
        bad_country.alpha_2 = "USA".to_string();
        assert!(profile_for_debit_row(&bad_country).is_none());

        let mut no_name = row("VISA", "DEBIT");
        no_name.country = String::new();
        assert!(profile_for_debit_row(&no_name).is_none());
    }

    #[test]
    fn test_load_csv() {
        let selector = BinSelector::from_reader(SAMPLE_CSV.as_bytes()).unwrap();

        assert_eq!(selector.processed(), 10);
        // credit, bad alpha_2 and empty country rows are dropped
        assert_eq!(selector.candidate_count(), 7);
        // DK, US (x2), GB, JP, FR, CA
        assert_eq!(selector.country_count(), 6);
    }

    #[test]
    fn test_diverse_selection_covers_countries_first() {
        let selector = BinSelector::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let mut rng = StdRng::seed_from_u64(31);

        let picked = selector.select(6, true, &mut rng);
        assert_eq!(picked.len(), 6);

        let countries: HashSet<&str> = picked.iter().map(|c| c.profile.country.as_str()).collect();
        assert_eq!(countries.len(), 6);
    }

    #[test]
    fn test_diverse_selection_tops_up() {
        let selector = BinSelector::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let mut rng = StdRng::seed_from_u64(32);

        // 6 countries, then 4 more from the pool of 7
        let picked = selector.select(10, true, &mut rng);
        assert_eq!(picked.len(), 10);

        // Asking for more than pool + countries caps the top-up at pool size
        let picked = selector.select(100, true, &mut rng);
        assert_eq!(picked.len(), 6 + 7);
    }

    #[test]
    fn test_random_selection() {
        let selector = BinSelector::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let mut rng = StdRng::seed_from_u64(33);

        let picked = selector.select(3, false, &mut rng);
        assert_eq!(picked.len(), 3);

        let bins: HashSet<&str> = picked.iter().map(|c| c.bin.as_str()).collect();
        assert_eq!(bins.len(), 3);

        assert_eq!(selector.select(50, false, &mut rng).len(), 7);
    }

    #[test]
    fn test_saved_selection_loads_as_registry() {
        let selector = BinSelector::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let mut rng = StdRng::seed_from_u64(34);
        let picked = selector.select(7, false, &mut rng);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selected-debit-cards.json");
        save_selection(&path, &picked).unwrap();

        let registry = BrandRegistry::from_file(&path).unwrap();
        assert_eq!(registry.len(), 7);

        let jyske = registry.get("451710").unwrap();
        assert_eq!(jyske.bank, "Jyske Bank");
        assert_eq!(jyske.country_name, "Denmark");
        assert_eq!(jyske.scheme.as_deref(), Some("visa"));
    }

    #[test]
    fn test_empty_selection_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");

        assert!(matches!(save_selection(&path, &[]), Err(SelectorError::NoCandidates)));
        assert!(!path.exists());
    }

    #[test]
    fn test_country_distribution() {
        let selector = BinSelector::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let mut rng = StdRng::seed_from_u64(35);
        let picked = selector.select(7, false, &mut rng);

        let dist = country_distribution(&picked);
        assert_eq!(dist["US"], ("United States".to_string(), 2));
        assert_eq!(dist["DK"].1, 1);
    }
}
