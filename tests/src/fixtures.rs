//! # Synthetic Record Tables
//!
//! Seeded generators for two overlapping parties. Every record has two
//! attributes: given name and surname. Bob's table re-uses a share of
//! Alice's people, some with a one-character typo in the surname.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use shared_types::RecordTable;
use tracing_subscriber::EnvFilter;

pub const GIVEN_NAMES: &[&str] = &[
    "anna", "ben", "carla", "david", "emma", "felix", "greta", "hugo", "ida", "jonas", "klara",
    "leon", "mia", "noah", "olga", "paul",
];

/// Public surname list; doubles as the reference values of both parties.
pub const SURNAMES: &[&str] = &[
    "bauer", "becker", "fischer", "hartmann", "hoffmann", "koch", "krause", "lange", "meyer",
    "mueller", "richter", "schmidt", "schneider", "schulz", "wagner", "weber", "wolf", "zimmermann",
];

/// Surname column
pub const SURNAME: usize = 1;

/// Install a test subscriber honouring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn person(rng: &mut StdRng) -> Vec<String> {
    let given = GIVEN_NAMES.choose(rng).copied().unwrap_or("anna");
    let surname = SURNAMES.choose(rng).copied().unwrap_or("bauer");
    vec![given.to_string(), surname.to_string()]
}

fn with_typo(rng: &mut StdRng, value: &str) -> String {
    let mut chars: Vec<char> = value.chars().collect();
    if chars.len() > 1 {
        let at = rng.gen_range(1..chars.len());
        chars[at] = 'x';
    }
    chars.into_iter().collect()
}

/// Two tables of `size` records each; `shared` of Bob's records copy an
/// Alice record, a quarter of those with a surname typo.
pub fn overlapping_parties(size: usize, shared: usize, seed: u64) -> (RecordTable, RecordTable) {
    let mut rng = StdRng::seed_from_u64(seed);

    let alice_rows: Vec<Vec<String>> = (0..size).map(|_| person(&mut rng)).collect();
    let mut bob_rows: Vec<Vec<String>> = Vec::with_capacity(size);
    for i in 0..size {
        if i < shared.min(size) {
            let mut row = alice_rows[i].clone();
            if rng.gen_ratio(1, 4) {
                row[SURNAME] = with_typo(&mut rng, &row[SURNAME]);
            }
            bob_rows.push(row);
        } else {
            bob_rows.push(person(&mut rng));
        }
    }
    bob_rows.shuffle(&mut rng);

    let alice = alice_rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| (format!("a{}", i), row))
        .collect();
    let bob = bob_rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| (format!("b{}", i), row))
        .collect();
    (alice, bob)
}

pub fn reference_values() -> Vec<String> {
    SURNAMES.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_seeded() {
        assert_eq!(overlapping_parties(20, 5, 7), overlapping_parties(20, 5, 7));
    }

    #[test]
    fn test_tables_have_requested_size() {
        let (alice, bob) = overlapping_parties(30, 10, 1);
        assert_eq!(alice.len(), 30);
        assert_eq!(bob.len(), 30);
        assert!(alice.iter().all(|(_, attrs)| attrs.len() == 2));
    }
}
