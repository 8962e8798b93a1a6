use md5::{Digest as Md5Digest, Md5};
use sha2::{Digest as Sha2Digest, Sha256};

/// Image container detection from magic bytes
pub fn detect_image_signature(data: &[u8]) -> Option<&'static str> {
    if data.len() < 4 {
        return None;
    }

    match data {
        [0xFF, 0xD8, 0xFF, ..] => Some("JPEG Image"),
        [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some("PNG Image"),
        [b'G', b'I', b'F', b'8', b'7', b'a', ..] => Some("GIF Image"),
        [b'G', b'I', b'F', b'8', b'9', b'a', ..] => Some("GIF Image"),
        [b'B', b'M', ..] => Some("BMP Image"),
        [b'I', b'I', 0x2A, 0x00, ..] | [b'M', b'M', 0x00, 0x2A, ..] => Some("TIFF Image"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("WebP Image"),
        [0x00, 0x00, 0x01, 0x00, ..] => Some("ICO File"),
        _ => None,
    }
}

/// Exact-match digests of raw file bytes
pub struct ContentDigests {
    pub sha256: String,
    pub md5: String,
}

impl ContentDigests {
    pub fn compute(data: &[u8]) -> Self {
        let mut md5_hasher = Md5::new();
        let mut sha256_hasher = Sha256::new();

        const CHUNK_SIZE: usize = 8192;
        for chunk in data.chunks(CHUNK_SIZE) {
            md5_hasher.update(chunk);
            sha256_hasher.update(chunk);
        }

        Self {
            sha256: hex::encode(sha256_hasher.finalize()),
            md5: format!("{:x}", md5_hasher.finalize()),
        }
    }
}

/// Shorten a label for single-line terminal display, keeping both ends.
pub fn truncate_middle(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        return s.to_string();
    }
    let half = max_len / 2;
    let start: String = s.chars().take(half).collect();
    let end: String = s.chars().skip(len - half).collect();
    format!("{}…{}", start, end)
}
