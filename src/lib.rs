// Card Forge - Core Library
// Synthetic payment-card + identity records for testing and demos.
// Exposes all modules for use in the CLI and tests.

pub mod error;
pub mod luhn;           // Checksum: Luhn check digit + validation
pub mod markov;         // Digit transition model for account segments
pub mod entities;       // BIN table, address table, names
pub mod card;           // Card synthesis pipeline
pub mod record;         // Card + identity → exportable record
pub mod report;         // Text report + JSON export
pub mod selector;       // Debit BIN selection from binlist CSV
pub mod config;

// Re-export commonly used types
pub use error::{GenerationError, GenerationResult, SelectorError};
pub use entities::{
    Address, AddressBook, AddressSource,
    BrandProfile, BrandRegistry, BrandSource,
    IdentitySynthesizer,
};
pub use card::{
    CardRecord, CardSynthesizer, ExpiryDate,
    derive_cvv, format_card_number, is_weak_cvv,
};
pub use record::{GeneratedRecord, RecordAssembler};
pub use report::{render_report, save_json, save_report};
pub use selector::{BinSelector, Candidate, country_distribution, save_selection};
pub use config::{GeneratorConfig, OutputFormat};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
