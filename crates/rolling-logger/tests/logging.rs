//! Installs the global subscriber, so it runs as its own test binary with a
//! single test.

use std::fs;

use rolling_logger::{init_logger, log_file_path, recent_lines, LoggerError};

#[test]
fn test_logger_lifecycle() {
    assert!(matches!(rolling_logger::info("too early"), Err(LoggerError::NotInitialized)));
    assert!(recent_lines().is_empty());

    let tmp = tempfile::tempdir().unwrap();
    let log_dir = tmp.path().join("logs");
    init_logger(log_dir.clone(), "OkrBoard").unwrap();

    log::info!("via log facade");
    rolling_logger::warn("via helper").unwrap();

    let recent = recent_lines();
    assert!(recent.iter().any(|l| l.contains("INFO") && l.contains("via log facade")));
    assert!(recent.iter().any(|l| l.contains("WARN") && l.contains("via helper")));

    let written = fs::read_to_string(log_file_path(&log_dir, "OkrBoard", 0)).unwrap();
    assert!(written.contains("via log facade"));
    assert!(written.contains("via helper"));

    assert!(init_logger(log_dir, "OkrBoard").is_err());
}
