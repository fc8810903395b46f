// 📦 Record Assembler - card + holder name + address → exportable record

use crate::card::{CardRecord, CardSynthesizer};
use crate::entities::address::{Address, AddressBook};
use crate::entities::brand::BrandRegistry;
use crate::entities::person::IdentitySynthesizer;
use crate::error::{GenerationError, GenerationResult};
use chrono::{Local, NaiveDate, NaiveDateTime};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Timestamp layout used in records and report headers
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One complete synthetic record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRecord {
    /// Stable identity for the record (UUID v4)
    pub id: String,
    pub name: String,
    pub card: CardRecord,
    pub address: Address,
    /// Local time of generation, `YYYY-mm-dd HH:MM:SS`
    pub timestamp: String,
}

/// Combines card and identity synthesis over shared read-only tables.
pub struct RecordAssembler<'a> {
    cards: CardSynthesizer<'a>,
    identity: IdentitySynthesizer<'a>,
}

impl<'a> RecordAssembler<'a> {
    pub fn new(registry: &'a BrandRegistry, addresses: &'a AddressBook) -> Self {
        RecordAssembler {
            cards: CardSynthesizer::new(registry),
            identity: IdentitySynthesizer::new(addresses),
        }
    }

    /// Generate `count` records for `bin` using the current local time
    pub fn assemble<R: Rng + ?Sized>(
        &self,
        bin: &str,
        count: usize,
        rng: &mut R,
    ) -> GenerationResult<Vec<GeneratedRecord>> {
        self.assemble_at(bin, count, Local::now().naive_local(), rng)
    }

    /// Generate `count` records with an explicit clock
    pub fn assemble_at<R: Rng + ?Sized>(
        &self,
        bin: &str,
        count: usize,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> GenerationResult<Vec<GeneratedRecord>> {
        if count == 0 {
            return Err(GenerationError::InvalidCount(count));
        }

        let today: NaiveDate = now.date();
        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
        let mut records = Vec::with_capacity(count);

        for _ in 0..count {
            let card = self.cards.generate_at(bin, today, rng)?;
            let name = self.identity.generate_name(rng);
            let address = self.identity.generate_address(rng);

            records.push(GeneratedRecord {
                id: uuid::Uuid::new_v4().to_string(),
                name,
                card,
                address,
                timestamp: timestamp.clone(),
            });
        }

        info!(bin, count = records.len(), "Records generated");
        Ok(records)
    }
}

// ============================================================================
// TESTS
// ============================================================================
