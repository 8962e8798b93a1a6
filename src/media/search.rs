use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::fingerprint_file;
use crate::config::FingerprintOptions;
use crate::errors::{PhoenixError, PhoenixResult};
use crate::fingerprint::{similarity, ImageFingerprint};
use crate::models::DuplicateMatch;

/// Fingerprint each explicitly named candidate against `reference`.
///
/// Candidates are user input, so any that cannot be read or decoded fails
/// the whole comparison.
pub fn compare_candidates(
    reference: &ImageFingerprint,
    candidates: &[PathBuf],
    threshold: u32,
    options: &FingerprintOptions,
) -> PhoenixResult<Vec<DuplicateMatch>> {
    candidates
        .iter()
        .map(|path| {
            let candidate = fingerprint_file(path, options)?;
            let distance = similarity(reference, &candidate)?;
            log::debug!("{}: distance {}", path.display(), distance);
            Ok(DuplicateMatch {
                path: path.clone(),
                distance,
                likely_duplicate: distance <= threshold,
            })
        })
        .collect()
}

/// Walk `dir` for images within `threshold` of `reference`, nearest first.
///
/// `exclude` (typically the reference image itself) is never reported.
/// Files that fail to read or decode are logged and skipped.
pub fn search_directory(
    reference: &ImageFingerprint,
    dir: &Path,
    exclude: Option<&Path>,
    threshold: u32,
    options: &FingerprintOptions,
) -> PhoenixResult<Vec<DuplicateMatch>> {
    if !dir.is_dir() {
        return Err(PhoenixError::validation(format!("{} is not a directory", dir.display())));
    }
    log::info!("Searching {} for near-duplicates (threshold {})", dir.display(), threshold);

    let excluded = exclude.and_then(|p| p.canonicalize().ok());
    let entries: Vec<DirEntry> = collect_images(dir, options.max_depth)
        .into_iter()
        .filter(|entry| match (&excluded, entry.path().canonicalize()) {
            (Some(skip), Ok(path)) => &path != skip,
            _ => true,
        })
        .collect();
    log::info!("Discovered {} candidate images", entries.len());

    let scan = || -> Vec<DuplicateMatch> {
        entries
            .into_par_iter()
            .filter_map(|entry| {
                let path = entry.into_path();
                let distance = fingerprint_file(&path, options).and_then(|candidate| similarity(reference, &candidate));
                match distance {
                    Ok(distance) if distance <= threshold => Some(DuplicateMatch {
                        path,
                        distance,
                        likely_duplicate: true,
                    }),
                    Ok(distance) => {
                        log::trace!("{}: distance {} above threshold", path.display(), distance);
                        None
                    }
                    Err(e) => {
                        log::warn!("Skipping {}: {}", path.display(), e);
                        None
                    }
                }
            })
            .collect()
    };

    let thread_count = options.thread_count();
    log::debug!("Fingerprinting with {} threads", thread_count);
    let mut matches = match rayon::ThreadPoolBuilder::new().num_threads(thread_count).build() {
        Ok(pool) => pool.install(scan),
        Err(e) => {
            log::warn!("Failed to initialize search thread pool, using default: {}", e);
            scan()
        }
    };

    matches.sort_by(|a, b| a.distance.cmp(&b.distance).then_with(|| a.path.cmp(&b.path)));
    log::info!("Found {} likely duplicates", matches.len());
    Ok(matches)
}

fn collect_images(dir: &Path, max_depth: usize) -> Vec<DirEntry> {
    WalkDir::new(dir)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Error accessing entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_image(entry.path()))
        .collect()
}

fn is_image(path: &Path) -> bool {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::super::test_images::{gradient, write_png};
    use super::*;
    use crate::fingerprint::HashConfig;
    use tempfile::TempDir;

    fn options() -> FingerprintOptions {
        FingerprintOptions {
            threads: 2,
            ..FingerprintOptions::default()
        }
    }

    #[test]
    fn test_compare_candidates() {
        let dir = TempDir::new().unwrap();
        let resized = write_png(dir.path(), "resized.png", gradient(128, 128, false));
        let inverted = write_png(dir.path(), "inverted.png", gradient(64, 64, true));
        let reference = crate::fingerprint::fingerprint_rgb(&gradient(64, 64, false), HashConfig::default());

        let matches = compare_candidates(&reference, &[resized.clone(), inverted.clone()], 12, &options()).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].path, resized);
        assert!(matches[0].likely_duplicate);
        assert_eq!(matches[1].distance, 128);
        assert!(!matches[1].likely_duplicate);
    }

    #[test]
    fn test_compare_fails_on_unreadable_candidate() {
        let reference = crate::fingerprint::fingerprint_rgb(&gradient(64, 64, false), HashConfig::default());
        let result = compare_candidates(&reference, &[PathBuf::from("/nonexistent.png")], 12, &options());
        assert!(result.is_err());
    }

    #[test]
    fn test_search_directory_finds_near_duplicates() {
        let dir = TempDir::new().unwrap();
        let reference_path = write_png(dir.path(), "reference.png", gradient(64, 64, false));
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        let copy = write_png(&nested, "copy.png", gradient(96, 96, false));
        write_png(dir.path(), "inverted.png", gradient(64, 64, true));
        std::fs::write(dir.path().join("fake.jpg"), b"not really a jpeg").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        let reference = super::super::fingerprint_file(&reference_path, &options()).unwrap();
        let matches = search_directory(&reference, dir.path(), Some(&reference_path), 12, &options()).unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].path.file_name(), copy.file_name());
        assert!(matches[0].likely_duplicate);
    }

    #[test]
    fn test_search_requires_directory() {
        let dir = TempDir::new().unwrap();
        let file = write_png(dir.path(), "a.png", gradient(16, 16, false));
        let reference = super::super::fingerprint_file(&file, &options()).unwrap();
        assert!(matches!(
            search_directory(&reference, &file, None, 12, &options()),
            Err(PhoenixError::Validation(_))
        ));
    }

    #[test]
    fn test_is_image() {
        assert!(is_image(Path::new("a/photo.JPG")));
        assert!(is_image(Path::new("b.webp")));
        assert!(!is_image(Path::new("c.txt")));
        assert!(!is_image(Path::new("no_extension")));
    }
}
