// 💳 Card Synthesizer - BIN → Luhn-valid number + expiry + CVV
//
// Pipeline per card:
//   1. resolve brand profile (table, then rules)
//   2. account segment = branch code ‖ Markov digits ‖ sequence number
//   3. append Luhn check digit, validate (bounded retry)
//   4. sample expiry, derive CVV, format for display
//
// The arithmetic below (bank seed, branch code, CVV LCG) is cosmetic
// pseudo-randomness kept stable for output compatibility.

use crate::entities::brand::{BrandProfile, BrandRegistry, BrandSource};
use crate::error::{GenerationError, GenerationResult};
use crate::{luhn, markov};
use chrono::{Datelike, Duration, Local, NaiveDate};
use md5::{Digest, Md5};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Branch code (2) + sequence number (2); Markov digits fill the rest.
pub const MIN_SEGMENT_LENGTH: usize = 4;

/// Longest BIN accepted (longest card number length)
pub const MAX_BIN_LENGTH: usize = 19;

pub const MIN_CARD_LENGTH: usize = 13;
pub const MAX_CARD_LENGTH: usize = 19;

/// Attempts before a checksum failure is reported as a defect
pub const MAX_CHECKSUM_ATTEMPTS: usize = 3;

/// Forward year offsets and their probabilities
pub const EXPIRY_YEAR_WEIGHTS: [(i64, f64); 5] =
    [(2, 0.15), (3, 0.40), (4, 0.25), (5, 0.15), (6, 0.05)];

/// Used if cumulative float mass never exceeds the draw
const DEFAULT_EXPIRY_YEARS: i64 = 3;

pub const COMMON_EXPIRY_MONTHS: [u32; 6] = [3, 5, 6, 9, 11, 12];
const COMMON_MONTH_PROBABILITY: f64 = 0.8;

const CVV_LCG_MULTIPLIER: u64 = 9301;
const CVV_LCG_INCREMENT: u64 = 49297;
const CVV_LCG_MODULUS: u64 = 233280;

/// Weak-pattern adjustments per CVV. One offset can wrap onto another
/// repeated pattern (888 → 111); a second one always clears it.
const MAX_CVV_ADJUSTMENTS: usize = 2;

// ============================================================================
// EXPIRY DATE
// ============================================================================

/// Card expiry, displayed as `MM/YY`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExpiryDate {
    /// 1-12
    pub month: u32,
    /// 0-99
    pub year: u32,
}

impl ExpiryDate {
    pub fn new(month: u32, year: u32) -> Option<Self> {
        if (1..=12).contains(&month) && year <= 99 {
            Some(ExpiryDate { month, year })
        } else {
            None
        }
    }

    /// `MMYY` read as an integer (03/28 → 328)
    pub fn as_number(&self) -> u64 {
        (self.month * 100 + self.year) as u64
    }
}

impl fmt::Display for ExpiryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.year)
    }
}

impl FromStr for ExpiryDate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (mm, yy) = s
            .split_once('/')
            .ok_or_else(|| format!("Expiry must be MM/YY: {}", s))?;

        if mm.len() != 2 || yy.len() != 2 {
            return Err(format!("Expiry must be MM/YY: {}", s));
        }

        let month = mm.parse::<u32>().map_err(|e| format!("Bad month '{}': {}", mm, e))?;
        let year = yy.parse::<u32>().map_err(|e| format!("Bad year '{}': {}", yy, e))?;

        ExpiryDate::new(month, year).ok_or_else(|| format!("Expiry out of range: {}", s))
    }
}

impl TryFrom<String> for ExpiryDate {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ExpiryDate> for String {
    fn from(value: ExpiryDate) -> Self {
        value.to_string()
    }
}

// ============================================================================
// CARD RECORD
// ============================================================================

/// One synthesized card. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub card_number: String,
    pub card_number_formatted: String,
    #[serde(rename = "expiryDate")]
    pub expiry: ExpiryDate,
    pub cvv: String,
    pub brand: String,
    pub bank: String,
    pub country: String,
    pub country_name: String,
}

impl CardRecord {
    /// Compact `number|MM/YY|cvv` line
    pub fn pipe_line(&self) -> String {
        format!("{}|{}|{}", self.card_number, self.expiry, self.cvv)
    }
}

// ============================================================================
// CARD SYNTHESIZER
// ============================================================================

/// Builds card records against a borrowed, read-only BIN table.
pub struct CardSynthesizer<'a> {
    registry: &'a BrandRegistry,
}

impl<'a> CardSynthesizer<'a> {
    pub fn new(registry: &'a BrandRegistry) -> Self {
        CardSynthesizer { registry }
    }

    /// Generate one card, expiry relative to today's local date
    pub fn generate<R: Rng + ?Sized>(&self, bin: &str, rng: &mut R) -> GenerationResult<CardRecord> {
        self.generate_at(bin, Local::now().date_naive(), rng)
    }

    /// Generate one card with an explicit "today"
    pub fn generate_at<R: Rng + ?Sized>(
        &self,
        bin: &str,
        today: NaiveDate,
        rng: &mut R,
    ) -> GenerationResult<CardRecord> {
        validate_bin(bin)?;

        for attempt in 1..=MAX_CHECKSUM_ATTEMPTS {
            let (profile, source) = self.registry.resolve_with_source(bin);
            validate_profile(bin, &profile)?;

            let segment_length = profile.length - bin.len() - 1;
            let segment = build_account_segment(bin, &profile.bank, segment_length, rng);

            let mut number = format!("{}{}", bin, segment);
            let check = luhn::compute_check_digit(&number);
            number.push(check);

            if !luhn::is_valid(&number) {
                warn!(bin, attempt, "Luhn validation failed, regenerating");
                continue;
            }

            let expiry = generate_expiry(today, rng);
            let cvv = derive_cvv(&number, &expiry, profile.cvv_length);

            if source == BrandSource::Rules {
                debug!(bin, brand = %profile.brand, "Card generated from rule-based profile");
            }

            return Ok(CardRecord {
                card_number_formatted: format_card_number(&number),
                card_number: number,
                expiry,
                cvv,
                brand: profile.brand,
                bank: profile.bank,
                country: profile.country,
                country_name: profile.country_name,
            });
        }

        Err(GenerationError::ChecksumExhausted {
            bin: bin.to_string(),
            attempts: MAX_CHECKSUM_ATTEMPTS,
        })
    }
}

// ============================================================================
// PRECONDITIONS
// ============================================================================

/// BIN must be 1-19 ASCII digits
pub fn validate_bin(bin: &str) -> GenerationResult<()> {
    if bin.is_empty() || bin.len() > MAX_BIN_LENGTH || !bin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GenerationError::InvalidBin(bin.to_string()));
    }
    Ok(())
}

/// Profile must leave room for the segment and carry a 3/4-digit CVV
pub fn validate_profile(bin: &str, profile: &BrandProfile) -> GenerationResult<()> {
    if !(MIN_CARD_LENGTH..=MAX_CARD_LENGTH).contains(&profile.length) {
        return Err(GenerationError::InvalidProfile {
            bin: bin.to_string(),
            reason: format!(
                "length {} outside {}-{}",
                profile.length, MIN_CARD_LENGTH, MAX_CARD_LENGTH
            ),
        });
    }

    if profile.cvv_length != 3 && profile.cvv_length != 4 {
        return Err(GenerationError::InvalidProfile {
            bin: bin.to_string(),
            reason: format!("cvvLength {} is not 3 or 4", profile.cvv_length),
        });
    }

    if bin.len() + 1 + MIN_SEGMENT_LENGTH > profile.length {
        return Err(GenerationError::BinTooLong {
            bin: bin.to_string(),
            brand: profile.brand.clone(),
            length: profile.length,
            min_segment: MIN_SEGMENT_LENGTH,
        });
    }

    Ok(())
}

// ============================================================================
// ACCOUNT SEGMENT
// ============================================================================

/// 0-99 seed from the bank name: first 32 bits of MD5, mod 100.
/// "Unknown" and empty names map to 0.
pub fn bank_seed(bank: &str) -> u64 {
    if bank.is_empty() || bank == "Unknown" {
        return 0;
    }

    let digest = Md5::digest(bank.as_bytes());
    let head = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    head as u64 % 100
}

/// (last 4 BIN digits + bank seed) mod 100
pub fn branch_code(bin: &str, seed: u64) -> u64 {
    (digits_value(last_n(bin, 4)) + seed) % 100
}

/// Segment between BIN and check digit, exactly `length` digits (length ≥ 4).
pub fn build_account_segment<R: Rng + ?Sized>(
    bin: &str,
    bank: &str,
    length: usize,
    rng: &mut R,
) -> String {
    let mut segment = format!("{:02}", branch_code(bin, bank_seed(bank)));

    for _ in 0..length.saturating_sub(MIN_SEGMENT_LENGTH) {
        let digit = markov::next_digit(&segment, rng);
        segment.push(char::from(b'0' + digit));
    }

    let sequence: u32 = rng.gen_range(10..=99);
    segment.push_str(&sequence.to_string());

    segment
}

// ============================================================================
// EXPIRY
// ============================================================================

/// Year offset for a uniform draw `u ∈ [0,1)`
pub fn expiry_years_for(u: f64) -> i64 {
    let mut cumulative = 0.0;

    for (years, weight) in EXPIRY_YEAR_WEIGHTS {
        cumulative += weight;
        if u < cumulative {
            return years;
        }
    }

    DEFAULT_EXPIRY_YEARS
}

/// today + 365 × sampled years; month biased toward the common set
pub fn generate_expiry<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> ExpiryDate {
    let years = expiry_years_for(rng.gen::<f64>());

    let month = if rng.gen::<f64>() < COMMON_MONTH_PROBABILITY {
        COMMON_EXPIRY_MONTHS.choose(rng).copied().unwrap_or(12)
    } else {
        rng.gen_range(1..=12)
    };

    let expires = today + Duration::days(365 * years);
    let year = expires.year().rem_euclid(100) as u32;

    ExpiryDate { month, year }
}

// ============================================================================
// CVV
// ============================================================================

/// LCG step over `(last 4 of number) + MMYY`
pub fn cvv_seed_value(number: &str, expiry: &ExpiryDate) -> u64 {
    let seed = digits_value(last_n(number, 4)) + expiry.as_number();
    (seed * CVV_LCG_MULTIPLIER + CVV_LCG_INCREMENT) % CVV_LCG_MODULUS
}

/// CVV for a card number + expiry
pub fn derive_cvv(number: &str, expiry: &ExpiryDate, cvv_length: usize) -> String {
    cvv_from_value(cvv_seed_value(number, expiry), cvv_length)
}

/// Map an LCG value into the CVV range, stepping past weak patterns
pub fn cvv_from_value(value: u64, cvv_length: usize) -> String {
    let offset = if cvv_length == 4 { 1234 } else { 123 };

    let mut adjusted = value;
    let mut cvv = map_cvv(adjusted, cvv_length);

    for _ in 0..MAX_CVV_ADJUSTMENTS {
        if !is_weak_cvv(&cvv) {
            break;
        }
        adjusted += offset;
        cvv = map_cvv(adjusted, cvv_length);
    }

    cvv.truncate(cvv_length);
    cvv
}

fn map_cvv(value: u64, cvv_length: usize) -> String {
    if cvv_length == 4 {
        (value % 9000 + 1000).to_string()
    } else {
        (value % 900 + 100).to_string()
    }
}

/// First three digits all the same ("000".."999")
pub fn is_weak_cvv(cvv: &str) -> bool {
    let head = cvv.as_bytes();
    head.len() >= 3 && head[0] == head[1] && head[1] == head[2]
}

// ============================================================================
// FORMATTING
// ============================================================================

/// 15 digits → `4 6 5`, everything else → `4 4 4 rest`
pub fn format_card_number(number: &str) -> String {
    if number.len() == 15 {
        return format!("{} {} {}", &number[..4], &number[4..10], &number[10..]);
    }

    let mut groups = Vec::with_capacity(4);
    let mut start = 0;

    for _ in 0..3 {
        if start >= number.len() {
            break;
        }
        let end = (start + 4).min(number.len());
        groups.push(&number[start..end]);
        start = end;
    }

    if start < number.len() {
        groups.push(&number[start..]);
    }

    groups.join(" ")
}

// ============================================================================
// HELPERS
// ============================================================================

fn last_n(s: &str, n: usize) -> &str {
    &s[s.len().saturating_sub(n)..]
}

/// Decimal value of an all-digit string
fn digits_value(digits: &str) -> u64 {
    digits
        .bytes()
        .filter(|b| b.is_ascii_digit())
        .fold(0, |acc, b| acc * 10 + (b - b'0') as u64)
}

// ============================================================================
// TESTS
// ============================================================================
