//! Perceptual Fingerprint Module
//!
//! Computes average-hash and difference-hash fingerprints for near-duplicate
//! image detection:
//! - decode with the `image` crate, then integer grayscale
//! - deterministic area-average downscale (see `grid`)
//! - Hamming-distance comparison between fingerprints of equal width

mod bits;
mod grid;

pub use bits::HashBits;

use image::RgbImage;
use serde::Serialize;

use crate::errors::{PhoenixError, PhoenixResult};
use grid::LumaPlane;

/// Default grid edge: 8x8 average hash and 9x8 difference hash, 64 bits each.
pub const DEFAULT_GRID: u32 = 8;

/// Hash dimensions. Fingerprints are only comparable when built with the
/// same configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashConfig {
    pub grid: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self { grid: DEFAULT_GRID }
    }
}

impl HashConfig {
    pub fn new(grid: u32) -> PhoenixResult<Self> {
        if !(2..=32).contains(&grid) {
            return Err(PhoenixError::validation(format!(
                "hash grid must be between 2 and 32, got {}",
                grid
            )));
        }
        Ok(Self { grid })
    }

    /// Bits per hash.
    pub fn hash_width(&self) -> usize {
        (self.grid * self.grid) as usize
    }
}

/// Perceptual fingerprint of one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageFingerprint {
    pub average_hash: HashBits,
    pub difference_hash: HashBits,
    pub source_width: u32,
    pub source_height: u32,
}

impl ImageFingerprint {
    /// Combined width of both hashes, the scale `similarity` is measured on.
    pub fn width(&self) -> usize {
        self.average_hash.len() + self.difference_hash.len()
    }

    /// Default "likely duplicate" threshold: 10% of the combined width.
    pub fn default_threshold(&self) -> u32 {
        (self.width() / 10) as u32
    }
}

/// Fingerprint encoded image bytes with the default 8x8 grid.
pub fn compute_fingerprint(bytes: &[u8]) -> PhoenixResult<ImageFingerprint> {
    compute_fingerprint_with(bytes, HashConfig::default())
}

pub fn compute_fingerprint_with(bytes: &[u8], config: HashConfig) -> PhoenixResult<ImageFingerprint> {
    let decoded = image::load_from_memory(bytes).map_err(|e| PhoenixError::decode(e, None))?;
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(PhoenixError::decode("image has no pixels", None));
    }
    Ok(fingerprint_rgb(&decoded.to_rgb8(), config))
}

/// Fingerprint already-decoded pixels.
pub fn fingerprint_rgb(img: &RgbImage, config: HashConfig) -> ImageFingerprint {
    let plane = LumaPlane::from_rgb(img);
    let n = config.grid;

    ImageFingerprint {
        average_hash: average_hash(&plane.downscale(n, n)),
        difference_hash: difference_hash(&plane.downscale(n + 1, n), n + 1),
        source_width: img.width(),
        source_height: img.height(),
    }
}

fn average_hash(cells: &[u64]) -> HashBits {
    // cell >= mean, without the division
    let total: u64 = cells.iter().sum();
    let count = cells.len() as u64;
    HashBits::from_bools(cells.iter().map(|&c| c * count >= total))
}

fn difference_hash(cells: &[u64], cols: u32) -> HashBits {
    HashBits::from_bools(
        cells
            .chunks(cols as usize)
            .flat_map(|row| row.windows(2).map(|pair| pair[0] >= pair[1])),
    )
}

/// Hamming distance between two fingerprints, summed over both hash types.
pub fn similarity(a: &ImageFingerprint, b: &ImageFingerprint) -> PhoenixResult<u32> {
    if a.average_hash.len() != b.average_hash.len() || a.difference_hash.len() != b.difference_hash.len() {
        return Err(PhoenixError::IncompatibleFingerprint {
            left: a.width(),
            right: b.width(),
        });
    }
    Ok(a.average_hash.hamming(&b.average_hash)? + a.difference_hash.hamming(&b.difference_hash)?)
}

/// Whether two fingerprints fall within `threshold` differing bits.
pub fn is_likely_duplicate(a: &ImageFingerprint, b: &ImageFingerprint, threshold: u32) -> PhoenixResult<bool> {
    Ok(similarity(a, b)? <= threshold)
}
