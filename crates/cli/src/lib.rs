use std::fs;
use std::io::{BufReader, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use sha2::{Digest, Sha256};
use tracing_subscriber::EnvFilter;

use avrcycles_core::config::AnalyzerConfig;

pub mod commands;

/// Check that `path` names an existing listing file with an accepted extension.
///
/// These are usage errors: they are reported before any analysis starts.
pub fn validate_listing_path(path: &str, config: &AnalyzerConfig) -> Result<PathBuf> {
    let path = PathBuf::from(path);
    if !path.exists() {
        return Err(anyhow!("Listing file not found: {}", path.display()));
    }
    if !path.is_file() {
        return Err(anyhow!("Listing path is not a file: {}", path.display()));
    }
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    if !config.accepts_extension(extension) {
        let accepted: Vec<String> = config.extensions.iter().map(|e| format!(".{e}")).collect();
        return Err(anyhow!(
            "Unsupported listing type '.{}' for {} (expected {})",
            extension,
            path.display(),
            accepted.join(", ")
        ));
    }
    Ok(path)
}

/// Compute the SHA-256 hash of a file and return it as a hex string.
pub fn sha256_file(path: &Path) -> Result<String> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open listing for hashing: {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = reader
            .read(&mut buf)
            .with_context(|| format!("Failed to read listing for hashing: {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    let digest = hasher.finalize();
    Ok(format!("{:x}", digest))
}

/// Log filter for a `-v` count; `RUST_LOG` wins when set.
pub fn log_filter(verbosity: u8) -> EnvFilter {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the stderr log subscriber. Safe to call more than once.
pub fn init_tracing(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
}
