// 🧑 Person Generator - US names + addresses for synthetic card holders

use super::address::{Address, AddressBook};
use rand::seq::SliceRandom;
use rand::Rng;

pub const FIRST_NAMES_MALE: [&str; 15] = [
    "James", "John", "Robert", "Michael", "William", "David", "Richard", "Joseph",
    "Thomas", "Charles", "Christopher", "Daniel", "Matthew", "Anthony", "Donald",
];

pub const FIRST_NAMES_FEMALE: [&str; 14] = [
    "Mary", "Patricia", "Jennifer", "Linda", "Barbara", "Elizabeth", "Susan",
    "Jessica", "Sarah", "Karen", "Nancy", "Lisa", "Betty", "Margaret",
];

pub const LAST_NAMES: [&str; 15] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
    "Rodriguez", "Martinez", "Wilson", "Anderson", "Thomas", "Taylor", "Moore",
];

/// Produces card-holder names and addresses.
///
/// Borrows the address table; the table is loaded once by the caller.
pub struct IdentitySynthesizer<'a> {
    addresses: &'a AddressBook,
}

impl<'a> IdentitySynthesizer<'a> {
    pub fn new(addresses: &'a AddressBook) -> Self {
        IdentitySynthesizer { addresses }
    }

    /// "First Last", first name drawn from the male or female list with equal odds
    pub fn generate_name<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let first_names: &[&str] = if rng.gen_bool(0.5) {
            &FIRST_NAMES_MALE
        } else {
            &FIRST_NAMES_FEMALE
        };

        // Both lists are non-empty consts
        let first = first_names.choose(rng).copied().unwrap_or("John");
        let last = LAST_NAMES.choose(rng).copied().unwrap_or("Smith");

        format!("{} {}", first, last)
    }

    pub fn generate_address<R: Rng + ?Sized>(&self, rng: &mut R) -> Address {
        self.addresses.generate_address(rng)
    }
}

// ============================================================================
// TESTS
// ============================================================================
