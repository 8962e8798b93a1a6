//! Image Investigation Module
//!
//! Builds the image report: exact-match digests, detected container format,
//! perceptual fingerprint and heuristic reuse indicators. Near-duplicate
//! lookups against explicit candidates and whole directories live in
//! `search`.

mod search;

pub use search::{compare_candidates, search_directory};

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::FingerprintOptions;
use crate::errors::{PhoenixError, PhoenixResult};
use crate::fingerprint::{compute_fingerprint_with, ImageFingerprint};
use crate::models::{ImageReport, REPORT_DISCLAIMER};
use crate::utils::{detect_image_signature, ContentDigests};

/// Dimensions typical of stock photography and wallpaper downloads.
const STOCK_DIMENSIONS: [(u32, u32); 4] = [(1200, 800), (1920, 1080), (1280, 720), (800, 600)];

/// Below this edge length an image is likely a thumbnail or a re-shared copy.
const LOW_RESOLUTION_EDGE: u32 = 300;

pub const REVERSE_SEARCH_SUGGESTIONS: [&str; 3] = [
    "TinEye (tineye.com) for exact and cropped copies",
    "Yandex Images for face and scene matches",
    "Bing Visual Search for product and location matches",
];

/// Analyze one image file. `comparisons` is left empty for the caller.
pub fn analyze_image(path: &Path, options: &FingerprintOptions) -> PhoenixResult<ImageReport> {
    log::info!("Analyzing image: {}", path.display());

    let bytes = read_image(path, options.max_image_bytes)?;
    let digests = ContentDigests::compute(&bytes);
    let format = detect_image_signature(&bytes);
    let fingerprint = decode_fingerprint(path, &bytes, options)?;

    log::debug!(
        "{}: {}x{}, aHash {}, dHash {}",
        path.display(),
        fingerprint.source_width,
        fingerprint.source_height,
        fingerprint.average_hash,
        fingerprint.difference_hash
    );

    Ok(ImageReport {
        path: path.to_path_buf(),
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        size_bytes: bytes.len() as u64,
        extension: path.extension().map(|e| e.to_string_lossy().to_lowercase()),
        format,
        width: fingerprint.source_width,
        height: fingerprint.source_height,
        sha256: digests.sha256,
        md5: digests.md5,
        reuse_indicators: reuse_indicators(fingerprint.source_width, fingerprint.source_height),
        fingerprint,
        comparisons: Vec::new(),
        reverse_search_suggestions: REVERSE_SEARCH_SUGGESTIONS.to_vec(),
        disclaimer: REPORT_DISCLAIMER,
    })
}

/// Read and fingerprint a file without building a full report.
pub fn fingerprint_file(path: &Path, options: &FingerprintOptions) -> PhoenixResult<ImageFingerprint> {
    let bytes = read_image(path, options.max_image_bytes)?;
    decode_fingerprint(path, &bytes, options)
}

/// Duplicate threshold in differing bits for fingerprints like `reference`.
pub fn effective_threshold(reference: &ImageFingerprint, options: &FingerprintOptions) -> u32 {
    options.threshold.unwrap_or_else(|| reference.default_threshold())
}

pub fn reuse_indicators(width: u32, height: u32) -> Vec<String> {
    let mut indicators = Vec::new();
    if STOCK_DIMENSIONS.contains(&(width, height)) {
        indicators.push(format!("Common stock photo dimensions ({}x{})", width, height));
    }
    if width < LOW_RESOLUTION_EDGE || height < LOW_RESOLUTION_EDGE {
        indicators.push(format!(
            "Low resolution ({}x{}), possibly a thumbnail or re-shared copy",
            width, height
        ));
    }
    indicators
}

fn read_image(path: &Path, max_bytes: u64) -> PhoenixResult<Vec<u8>> {
    let metadata = fs::metadata(path).map_err(|e| PhoenixError::io(e, path.to_path_buf()))?;
    if !metadata.is_file() {
        return Err(PhoenixError::validation(format!("{} is not a regular file", path.display())));
    }
    if metadata.len() > max_bytes {
        return Err(PhoenixError::validation(format!(
            "{} is {} bytes, over the {} byte limit",
            path.display(),
            metadata.len(),
            max_bytes
        )));
    }
    fs::read(path).map_err(|e| PhoenixError::io(e, path.to_path_buf()))
}

fn decode_fingerprint(path: &Path, bytes: &[u8], options: &FingerprintOptions) -> PhoenixResult<ImageFingerprint> {
    compute_fingerprint_with(bytes, options.hash).map_err(|e| match e {
        PhoenixError::Decode { message, .. } => PhoenixError::decode(message, Some(PathBuf::from(path))),
        other => other,
    })
}
