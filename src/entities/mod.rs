// Entity Models - read-only lookup tables + identity generation
//
// Tables are loaded once, never mutated, and borrowed by the synthesizers.
// A missing or corrupt table degrades to an empty one.

pub mod brand;
pub mod address;
pub mod person;

pub use brand::{BinDatabaseFile, BrandProfile, BrandRegistry, BrandSource, classify_by_rules};
pub use address::{Address, AddressBook, AddressEntry, AddressSource};
pub use person::IdentitySynthesizer;
