//! Hash functions for Bloom signatures
//!
//! Two independent cryptographic digests feed the double-hashing scheme:
//! SHA-256 (digest A) and SHA3-256 (digest B). Each digest is read as a
//! 256-bit big-endian integer and reduced modulo the filter length, so the
//! positions equal `(A + i * B) mod m` computed over the full-width integers.

use sha2::{Digest, Sha256};
use sha3::Sha3_256;

/// Reduce a big-endian byte string, read as an unsigned integer, modulo `m`.
fn reduce_mod(bytes: &[u8], m: u128) -> u128 {
    bytes
        .iter()
        .fold(0u128, |acc, &b| ((acc << 8) | b as u128) % m)
}

/// Digest A and digest B of an element, each already reduced modulo `m`.
pub fn digest_pair(element: &[u8], m: usize) -> (u128, u128) {
    let m = m as u128;
    let a = Sha256::digest(element);
    let b = Sha3_256::digest(element);
    (reduce_mod(&a, m), reduce_mod(&b, m))
}

/// Compute k bit positions for an element
///
/// Uses double hashing technique: g(i) = (A + i * B) mod m
///
/// Positions may repeat; callers collect them into a set.
pub fn compute_hash_positions(element: &[u8], k: usize, m: usize) -> Vec<usize> {
    if m == 0 {
        return Vec::new();
    }
    let (a, b) = digest_pair(element, m);
    let modulus = m as u128;

    (0..k)
        .map(|i| {
            let step = (i as u128 % modulus) * b % modulus;
            ((a + step) % modulus) as usize
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_deterministic() {
        let p1 = compute_hash_positions(b"sm", 5, 1000);
        let p2 = compute_hash_positions(b"sm", 5, 1000);

        assert_eq!(p1, p2, "Same input with same parameters must produce same output");
    }

    #[test]
    fn test_reduce_mod_matches_small_integers() {
        // 0x0102 = 258
        assert_eq!(reduce_mod(&[0x01, 0x02], 1000), 258);
        assert_eq!(reduce_mod(&[0x01, 0x02], 7), 258 % 7);
        assert_eq!(reduce_mod(&[], 7), 0);
    }

    #[test]
    fn test_reduce_mod_wide_integer() {
        // 2^128 mod 97: 2^48 ≡ 1 (mod 97), so 2^128 = 2^(48*2) * 2^32 ≡ 2^32 (mod 97)
        let mut bytes = vec![0x01];
        bytes.extend_from_slice(&[0u8; 16]);
        assert_eq!(reduce_mod(&bytes, 97), (1u128 << 32) % 97);
    }

    #[test]
    fn test_first_position_is_digest_a() {
        let m = 1800;
        let (a, _) = digest_pair(b"th", m);
        let positions = compute_hash_positions(b"th", 3, m);

        assert_eq!(positions[0] as u128, a, "g(0) = A mod m");
    }

    #[test]
    fn test_multiple_hash_functions_within_bounds() {
        let k = 7;
        let m = 10000;

        let positions = compute_hash_positions(b"test_qgram", k, m);

        assert_eq!(positions.len(), k, "Should produce k positions");
        for pos in &positions {
            assert!(*pos < m, "Position {} should be < m={}", pos, m);
        }

        let unique: std::collections::HashSet<_> = positions.iter().collect();
        assert!(unique.len() >= 3, "Hash functions should produce varied positions");
    }

    #[test]
    fn test_zero_length_filter_has_no_positions() {
        assert!(compute_hash_positions(b"ab", 3, 0).is_empty());
    }

    #[test]
    fn test_hash_uniformity() {
        // Test that hash positions are roughly uniform across the bit array
        let m = 1000;
        let k = 7;
        let mut counts = vec![0usize; 10]; // 10 buckets

        for i in 0..1000 {
            let element = format!("gram_{}", i);
            for pos in compute_hash_positions(element.as_bytes(), k, m) {
                counts[pos / 100] += 1;
            }
        }

        // Each bucket should have roughly 1000*7/10 = 700 entries
        // Allow 50% variance for statistical tolerance
        let expected = 700;
        for (i, count) in counts.iter().enumerate() {
            assert!(
                *count >= expected / 2 && *count <= expected * 3 / 2,
                "Bucket {} has {} entries, expected ~{}",
                i,
                count,
                expected
            );
        }
    }
}
