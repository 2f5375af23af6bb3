// src/common/id_generator.rs
//! Crockford Base32 user uid generator
//!
//! Generates human-readable, prefixed uids using Crockford Base32 encoding.
//! Format: U_XXXXXXXXXX (e.g., U_K7NP3XY2M4)
//!
//! Benefits:
//! - No ambiguous characters (excludes I, L, O, U)
//! - Case-insensitive
//! - Easy to read, type, and communicate verbally

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Random characters after the "U_" prefix (32^10 combinations)
const USER_UID_LENGTH: usize = 10;

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a user uid (U_XXXXXXXXXX)
///
/// # Example
/// ```
/// use crate::common::id_generator::generate_user_uid;
///
/// let uid = generate_user_uid();
/// // Returns something like "U_K7NP3XY2M4"
/// ```
pub fn generate_user_uid() -> String {
    format!("U_{}", generate_crockford_string(USER_UID_LENGTH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_user_uid_format() {
        let uid = generate_user_uid();
        assert!(uid.starts_with("U_"));
        assert_eq!(uid.len(), 2 + USER_UID_LENGTH);
    }

    #[test]
    fn test_crockford_alphabet_only() {
        let uid = generate_user_uid();
        let random_part = &uid[2..]; // Skip "U_"

        for c in random_part.chars() {
            assert!(
                CROCKFORD_ALPHABET.contains(&(c as u8)),
                "Character '{}' not in Crockford alphabet",
                c
            );
        }

        // Verify no ambiguous characters
        assert!(!random_part.contains('I'));
        assert!(!random_part.contains('L'));
        assert!(!random_part.contains('O'));
        assert!(!random_part.contains('U'));
    }

    #[test]
    fn test_uniqueness() {
        let mut uids = HashSet::new();
        for _ in 0..1000 {
            let uid = generate_user_uid();
            assert!(uids.insert(uid), "Duplicate uid generated");
        }
    }
}
