use std::fs;
use std::path::PathBuf;

use avrcycles::{sha256_file, validate_listing_path};
use avrcycles_core::config::AnalyzerConfig;
use tempfile::tempdir;

fn blink() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../core/tests/fixtures/blink.avra")
}

#[test]
fn validate_listing_path_accepts_avra_file() {
    let path = validate_listing_path(blink().to_str().unwrap(), &AnalyzerConfig::default())
        .expect("valid listing");
    assert!(path.is_file());
}

#[test]
fn validate_listing_path_rejects_missing_file() {
    let err = validate_listing_path("does/not/exist.avra", &AnalyzerConfig::default())
        .unwrap_err();
    assert!(err.to_string().contains("Listing file not found"));
}

#[test]
fn validate_listing_path_rejects_directory() {
    let dir = tempdir().expect("tempdir");
    let err = validate_listing_path(dir.path().to_str().unwrap(), &AnalyzerConfig::default())
        .unwrap_err();
    assert!(err.to_string().contains("not a file"));
}

#[test]
fn validate_listing_path_rejects_other_extensions() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("listing.txt");
    fs::write(&path, "").unwrap();
    let err =
        validate_listing_path(path.to_str().unwrap(), &AnalyzerConfig::default()).unwrap_err();
    assert!(err.to_string().contains("Unsupported listing type '.txt'"));

    let config = AnalyzerConfig { extensions: vec!["txt".into()], ..AnalyzerConfig::default() };
    assert!(validate_listing_path(path.to_str().unwrap(), &config).is_ok());
}

#[test]
fn sha256_file_matches_known_digest() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("empty.avra");
    fs::write(&path, "").unwrap();
    assert_eq!(
        sha256_file(&path).unwrap(),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}
