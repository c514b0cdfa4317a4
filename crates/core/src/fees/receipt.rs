//! Receipt number generation.

use chrono::{DateTime, Utc};
use rand::Rng;

use super::types::ReceiptNumber;

const SUFFIX_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUFFIX_LEN: usize = 5;

/// Generates receipt numbers of the form `{prefix}{epoch millis}{5 x base36}`.
///
/// Collisions are practically impossible but not ruled out; receipts are for
/// traceability only and nothing keys on them.
#[derive(Debug, Clone)]
pub struct ReceiptGenerator {
    prefix: String,
}

impl ReceiptGenerator {
    /// Creates a generator with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Generates a receipt number for a payment recorded at `at`.
    #[must_use]
    pub fn generate(&self, at: DateTime<Utc>) -> ReceiptNumber {
        self.generate_with(at, &mut rand::rng())
    }

    /// Generates a receipt number drawing the suffix from `rng`.
    pub fn generate_with<R: Rng + ?Sized>(&self, at: DateTime<Utc>, rng: &mut R) -> ReceiptNumber {
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| char::from(SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())]))
            .collect();
        ReceiptNumber(format!("{}{}{suffix}", self.prefix, at.timestamp_millis()))
    }
}

impl Default for ReceiptGenerator {
    fn default() -> Self {
        Self::new("RCP")
    }
}
