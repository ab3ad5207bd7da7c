//! Signature encoder with optional memoization
//!
//! Encoding is a pure function of (element, bf_len, num_hash_funct), so a
//! cache hit is always identical to recomputation.

use lru::LruCache;
use std::num::NonZeroUsize;

use super::config::{PSigConfig, SignatureParams};
use super::signature::Signature;

/// Turns strings and q-grams into Bloom signatures.
#[derive(Debug)]
pub struct SignatureEncoder {
    params: SignatureParams,
    cache: Option<LruCache<String, Signature>>,
}

impl SignatureEncoder {
    /// Create an encoder for the given configuration.
    pub fn new(config: &PSigConfig) -> Self {
        Self {
            params: config.fingerprint(),
            cache: NonZeroUsize::new(config.cache_capacity).map(LruCache::new),
        }
    }

    pub fn params(&self) -> SignatureParams {
        self.params
    }

    /// Signature of one element, never cached.
    pub fn encode(&self, element: &str) -> Signature {
        Signature::of_element(element, self.params.bf_len, self.params.num_hash_funct)
    }

    /// Signature of one element, served from the cache when possible.
    pub fn encode_cached(&mut self, element: &str) -> Signature {
        let (len, k) = (self.params.bf_len, self.params.num_hash_funct);
        match self.cache.as_mut() {
            Some(cache) => {
                if let Some(sig) = cache.get(element) {
                    return sig.clone();
                }
                let sig = Signature::of_element(element, len, k);
                cache.put(element.to_string(), sig.clone());
                sig
            }
            None => Signature::of_element(element, len, k),
        }
    }

    /// Union of the signatures of all given elements.
    pub fn encode_all<'a>(&mut self, elements: impl IntoIterator<Item = &'a str>) -> Signature {
        let mut sig = Signature::new(self.params.bf_len);
        for element in elements {
            sig.union_with(&self.encode_cached(element));
        }
        sig
    }

    /// Signature of a whole value: the union over its q-grams.
    pub fn encode_string(&mut self, value: &str) -> Signature {
        let grams: Vec<String> = self.params.qgram.qgrams(value).collect();
        self.encode_all(grams.iter().map(String::as_str))
    }

    /// Number of cached signatures.
    pub fn cached(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.len())
    }
}
