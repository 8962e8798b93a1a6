//! Fixed-width bit vectors for perceptual hashes.

use serde::{Serialize, Serializer};

use crate::errors::{PhoenixError, PhoenixResult};

/// A fixed-width bit vector, stored MSB-first in 64-bit words so the hex
/// rendering reads in the same row-major order the bits were pushed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashBits {
    words: Vec<u64>,
    len: usize,
}

impl HashBits {
    /// All-zero vector of `len` bits.
    pub fn zeroed(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    pub fn from_bools(bits: impl IntoIterator<Item = bool>) -> Self {
        let bits: Vec<bool> = bits.into_iter().collect();
        let mut out = Self::zeroed(bits.len());
        for (i, bit) in bits.into_iter().enumerate() {
            if bit {
                out.set(i);
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn set(&mut self, index: usize) {
        debug_assert!(index < self.len);
        self.words[index / 64] |= 1u64 << (63 - index % 64);
    }

    #[cfg(test)]
    fn get(&self, index: usize) -> bool {
        index < self.len && self.words[index / 64] & (1u64 << (63 - index % 64)) != 0
    }

    #[cfg(test)]
    fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// Number of differing bits. Widths must match.
    pub fn hamming(&self, other: &HashBits) -> PhoenixResult<u32> {
        if self.len != other.len {
            return Err(PhoenixError::IncompatibleFingerprint {
                left: self.len,
                right: other.len,
            });
        }
        Ok(self
            .words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| (a ^ b).count_ones())
            .sum())
    }

    /// Lowercase hex, one digit per four bits, trailing partial nibble padded.
    pub fn to_hex(&self) -> String {
        let digits = self.len.div_ceil(4);
        let mut hex: String = self.words.iter().map(|w| format!("{:016x}", w)).collect();
        hex.truncate(digits);
        hex
    }
}

impl std::fmt::Display for HashBits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for HashBits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}
