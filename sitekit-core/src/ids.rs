//! Collision-resistant identifiers for new documents.
//!
//! Identifiers are [`ID_LENGTH`] symbols drawn uniformly from the 64-symbol
//! URL-safe [`ID_ALPHABET`], giving 126 bits of entropy per identifier.

use rand::seq::SliceRandom;

/// Symbols used by generated identifiers.
pub const ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_-";

/// Number of symbols in a generated identifier.
pub const ID_LENGTH: usize = 21;

/// Produces identifiers for newly created documents.
pub trait IdGenerator: Send + Sync {
    /// Return a fresh identifier.
    fn generate(&self) -> String;
}

/// [`IdGenerator`] drawing from the thread-local CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        generate_id()
    }
}

/// Generate a random URL-safe identifier.
///
/// # Examples
///
/// ```
/// use sitekit_core::{ID_ALPHABET, ID_LENGTH, generate_id};
///
/// let id = generate_id();
/// assert_eq!(id.len(), ID_LENGTH);
/// assert!(id.bytes().all(|b| ID_ALPHABET.contains(&b)));
/// ```
#[must_use]
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .filter_map(|_| ID_ALPHABET.choose(&mut rng))
        .map(|symbol| char::from(*symbol))
        .collect()
}
