use clap::{ArgGroup, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "iphoenix",
    about = "iPhoenix - public footprint investigation: username presence and image near-duplicates",
    version
)]
#[command(group(ArgGroup::new("target").required(true).args(["username", "image"])))]
pub struct Args {
    /// Username to look up across public platforms
    #[arg(short, long)]
    pub username: Option<String>,

    /// Image file to fingerprint
    #[arg(short, long)]
    pub image: Option<PathBuf>,

    /// Other images to compare against --image
    #[arg(long, value_delimiter = ',', requires = "image")]
    pub compare: Vec<PathBuf>,

    /// Directory to search for near-duplicates of --image
    #[arg(long, requires = "image")]
    pub search_dir: Option<PathBuf>,

    /// Maximum directory traversal depth for --search-dir
    #[arg(long, default_value = "10")]
    pub max_depth: usize,

    /// Platform catalog TOML file (defaults to the built-in catalog)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Maximum concurrent requests across all platforms
    #[arg(short, long, default_value = "10")]
    pub workers: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "8")]
    pub timeout_secs: u64,

    /// Retries per platform on transient failures
    #[arg(long, default_value = "2")]
    pub retries: u32,

    /// Deadline for the whole username run in seconds
    #[arg(long, default_value = "60")]
    pub deadline_secs: u64,

    /// Maximum response body read per request, in KiB
    #[arg(long, default_value = "64")]
    pub max_body_kb: usize,

    /// Perceptual hash grid edge (8 = 64-bit hashes)
    #[arg(long, default_value = "8")]
    pub hash_grid: u32,

    /// Duplicate threshold in differing bits (default: 10% of hash width)
    #[arg(long)]
    pub threshold: Option<u32>,

    /// Maximum image file size in MB
    #[arg(long, default_value = "50")]
    pub max_image_mb: u64,

    /// Number of fingerprinting threads for --search-dir (0 = auto-detect)
    #[arg(short, long, default_value = "0")]
    pub threads: usize,

    /// Write the report as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable verbose logging of all operations
    #[arg(short, long)]
    pub verbose: bool,

    /// Hide progress bars and use quiet output
    #[arg(short, long)]
    pub quiet: bool,
}

/// What a run investigates.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Username(String),
    Image(PathBuf),
}

impl Args {
    pub fn target(&self) -> Option<Target> {
        match (&self.username, &self.image) {
            (Some(username), None) => Some(Target::Username(username.clone())),
            (None, Some(image)) => Some(Target::Image(image.clone())),
            _ => None,
        }
    }
}
