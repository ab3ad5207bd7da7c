//! Bloom signature
//!
//! A Bloom filter over q-grams, kept as a fixed-size bitset. Union,
//! intersection and subset tests operate on whole words.
//!
//! INVARIANTS:
//! - INVARIANT-1: A signature of length `m` never has a bit set at a position >= m
//! - INVARIANT-2: Encoding is deterministic for equal (input, m, k)

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};
use shared_types::BlockingError;

use super::hash_functions::compute_hash_positions;

/// Set of bit positions in `[0, len)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    #[serde(with = "bitvec_serde")]
    bits: BitVec<u64, Lsb0>,
}

/// Serde support for BitVec
mod bitvec_serde {
    use bitvec::prelude::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(bits: &BitVec<u64, Lsb0>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let words: Vec<u64> = bits.as_raw_slice().to_vec();
        (words, bits.len()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BitVec<u64, Lsb0>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (words, len): (Vec<u64>, usize) = Deserialize::deserialize(deserializer)?;
        let mut bits = BitVec::<u64, Lsb0>::from_vec(words);
        bits.resize(len, false);
        bits.set_uninitialized(false);
        Ok(bits)
    }
}

impl Signature {
    /// Create an empty signature of `len` bits
    pub fn new(len: usize) -> Self {
        Self {
            bits: bitvec![u64, Lsb0; 0; len],
        }
    }

    /// Build a signature from explicit bit positions
    ///
    /// Fails with a configuration error if any position is out of range.
    pub fn from_positions(
        len: usize,
        positions: impl IntoIterator<Item = usize>,
    ) -> Result<Self, BlockingError> {
        let mut sig = Self::new(len);
        for pos in positions {
            if pos >= len {
                return Err(BlockingError::Configuration(format!(
                    "bit position {} outside signature of length {}",
                    pos, len
                )));
            }
            sig.bits.set(pos, true);
        }
        Ok(sig)
    }

    /// Signature of a single element with `k` hash functions over `len` bits
    pub fn of_element(element: &str, len: usize, k: usize) -> Self {
        let mut sig = Self::new(len);
        for pos in compute_hash_positions(element.as_bytes(), k, len) {
            sig.bits.set(pos, true);
        }
        sig
    }

    /// OR `other` into this signature
    ///
    /// # Panics
    /// Panics if the signatures have different lengths.
    pub fn union_with(&mut self, other: &Signature) {
        assert_eq!(
            self.len(),
            other.len(),
            "Cannot merge signatures with different lengths"
        );
        for (s, o) in self
            .bits
            .as_raw_mut_slice()
            .iter_mut()
            .zip(other.bits.as_raw_slice())
        {
            *s |= *o;
        }
    }

    /// Bits set in both signatures
    pub fn intersection(&self, other: &Signature) -> Result<Signature, BlockingError> {
        self.check_len(other)?;
        let mut bits = self.bits.clone();
        for (s, o) in bits.as_raw_mut_slice().iter_mut().zip(other.bits.as_raw_slice()) {
            *s &= *o;
        }
        Ok(Signature { bits })
    }

    /// Whether every bit of this signature is also set in `other`
    ///
    /// Signatures of different lengths are never subsets of each other.
    pub fn is_subset_of(&self, other: &Signature) -> bool {
        self.len() == other.len()
            && self
                .bits
                .as_raw_slice()
                .iter()
                .zip(other.bits.as_raw_slice())
                .all(|(s, o)| s & !o == 0)
    }

    /// Whether bit `pos` is set
    pub fn contains(&self, pos: usize) -> bool {
        self.bits.get(pos).map(|b| *b).unwrap_or(false)
    }

    /// Set bit positions in ascending order
    pub fn positions(&self) -> Vec<usize> {
        self.bits.iter_ones().collect()
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// Fraction of set bits
    pub fn fill_ratio(&self) -> f64 {
        if self.bits.is_empty() {
            return 0.0;
        }
        self.count_ones() as f64 / self.len() as f64
    }

    /// Length in bits
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether no bit is set
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    fn check_len(&self, other: &Signature) -> Result<(), BlockingError> {
        if self.len() != other.len() {
            return Err(BlockingError::Configuration(format!(
                "signature length mismatch: {} vs {}",
                self.len(),
                other.len()
            )));
        }
        Ok(())
    }
}
