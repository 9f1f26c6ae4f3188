//! Tests for the Log Writer
//!
//! These tests verify:
//! - File creation on initialize (and tolerance of an existing file)
//! - Separator placement between appended records
//! - Atomic replace_all and appends after it
//! - Sync strategies

use std::fs;
use std::path::PathBuf;

use figmentdb::config::{Config, SyncStrategy};
use figmentdb::log::LogWriter;
use figmentdb::FigmentError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_log() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("db.json");
    (temp_dir, log_path)
}

fn config_for(path: &PathBuf) -> Config {
    Config::builder()
        .path(path)
        .sync_strategy(SyncStrategy::EveryWrite)
        .build()
}

// =============================================================================
// Initialize Tests
// =============================================================================

#[test]
fn test_initialize_creates_empty_file() {
    let (_temp, log_path) = setup_temp_log();

    let writer = LogWriter::initialize(&config_for(&log_path)).unwrap();

    assert!(log_path.exists());
    assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    assert!(writer.is_empty());
}

#[test]
fn test_initialize_existing_file_is_not_an_error() {
    let (_temp, log_path) = setup_temp_log();
    fs::write(&log_path, r#"{"key":"a","value":1}"#).unwrap();

    let writer = LogWriter::initialize(&config_for(&log_path)).unwrap();

    assert_eq!(writer.len(), 21);
    assert_eq!(
        fs::read_to_string(&log_path).unwrap(),
        r#"{"key":"a","value":1}"#
    );
}

#[test]
fn test_initialize_creates_parent_dirs() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("nested").join("deeper").join("db.json");

    LogWriter::initialize(&config_for(&log_path)).unwrap();

    assert!(log_path.exists());
}

#[test]
fn test_initialize_missing_parent_without_create_is_unavailable() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("missing").join("db.json");
    let config = Config::builder()
        .path(&log_path)
        .create_parent_dirs(false)
        .build();

    let err = LogWriter::initialize(&config).err().unwrap();

    assert!(matches!(err, FigmentError::StorageUnavailable { .. }));
    assert!(err.is_fatal());
}

#[test]
fn test_initialize_directory_path_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder().path(temp_dir.path()).build();

    let err = LogWriter::initialize(&config).err().unwrap();

    assert!(matches!(err, FigmentError::Config(_)));
}

// =============================================================================
// Append Tests
// =============================================================================

#[test]
fn test_first_append_has_no_separator() {
    let (_temp, log_path) = setup_temp_log();
    let mut writer = LogWriter::initialize(&config_for(&log_path)).unwrap();

    let bytes = writer.append(r#"{"key":"a","value":1}"#).unwrap();

    assert_eq!(bytes, 21);
    assert_eq!(
        fs::read_to_string(&log_path).unwrap(),
        r#"{"key":"a","value":1}"#
    );
}

#[test]
fn test_appends_are_newline_separated() {
    let (_temp, log_path) = setup_temp_log();
    let mut writer = LogWriter::initialize(&config_for(&log_path)).unwrap();

    writer.append(r#"{"key":"a","value":1}"#).unwrap();
    writer.append(r#"{"key":"b","value":2}"#).unwrap();
    writer.append(r#"{"key":"a"}"#).unwrap();

    assert_eq!(
        fs::read_to_string(&log_path).unwrap(),
        "{\"key\":\"a\",\"value\":1}\n{\"key\":\"b\",\"value\":2}\n{\"key\":\"a\"}"
    );
    assert_eq!(writer.record_count(), 3);
    assert_eq!(writer.len(), fs::metadata(&log_path).unwrap().len());
}

#[test]
fn test_append_to_existing_file_adds_separator() {
    let (_temp, log_path) = setup_temp_log();
    fs::write(&log_path, r#"{"key":"a","value":1}"#).unwrap();
    let mut writer = LogWriter::initialize(&config_for(&log_path)).unwrap();

    writer.append(r#"{"key":"b","value":2}"#).unwrap();

    assert_eq!(
        fs::read_to_string(&log_path).unwrap(),
        "{\"key\":\"a\",\"value\":1}\n{\"key\":\"b\",\"value\":2}"
    );
}

#[test]
fn test_os_buffered_append_is_visible_and_syncable() {
    let (_temp, log_path) = setup_temp_log();
    let config = Config::builder()
        .path(&log_path)
        .sync_strategy(SyncStrategy::OsBuffered)
        .build();
    let mut writer = LogWriter::initialize(&config).unwrap();

    writer.append(r#"{"key":"a","value":1}"#).unwrap();
    assert_eq!(
        fs::read_to_string(&log_path).unwrap(),
        r#"{"key":"a","value":1}"#
    );

    writer.sync().unwrap();
}

// =============================================================================
// Replace Tests
// =============================================================================

#[test]
fn test_replace_all_overwrites_contents() {
    let (_temp, log_path) = setup_temp_log();
    let mut writer = LogWriter::initialize(&config_for(&log_path)).unwrap();
    for i in 0..10 {
        writer.append(&format!(r#"{{"key":"k","value":{}}}"#, i)).unwrap();
    }

    let bytes = writer.replace_all([r#"{"key":"k","value":9}"#]).unwrap();

    assert_eq!(bytes, 21);
    assert_eq!(
        fs::read_to_string(&log_path).unwrap(),
        r#"{"key":"k","value":9}"#
    );
    assert_eq!(writer.record_count(), 1);
}

#[test]
fn test_replace_all_with_nothing_empties_file() {
    let (_temp, log_path) = setup_temp_log();
    let mut writer = LogWriter::initialize(&config_for(&log_path)).unwrap();
    writer.append(r#"{"key":"a"}"#).unwrap();

    writer.replace_all(Vec::<String>::new()).unwrap();

    assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    assert!(writer.is_empty());
}

#[test]
fn test_append_after_replace_goes_to_new_file() {
    let (_temp, log_path) = setup_temp_log();
    let mut writer = LogWriter::initialize(&config_for(&log_path)).unwrap();
    writer.append(r#"{"key":"a","value":1}"#).unwrap();
    writer.append(r#"{"key":"a","value":2}"#).unwrap();

    writer.replace_all([r#"{"key":"a","value":2}"#]).unwrap();
    writer.append(r#"{"key":"b","value":3}"#).unwrap();

    assert_eq!(
        fs::read_to_string(&log_path).unwrap(),
        "{\"key\":\"a\",\"value\":2}\n{\"key\":\"b\",\"value\":3}"
    );
    assert_eq!(writer.record_count(), 2);
}

#[test]
fn test_replace_all_leaves_no_temp_file() {
    let (temp, log_path) = setup_temp_log();
    let config = config_for(&log_path);
    let mut writer = LogWriter::initialize(&config).unwrap();

    writer.replace_all([r#"{"key":"a","value":1}"#]).unwrap();

    assert!(!config.compaction_tmp_path().exists());
    let names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("db.json")]);
}

#[test]
fn test_replace_all_rename_failure_removes_temp_file() {
    let (_temp, log_path) = setup_temp_log();
    let config = config_for(&log_path);
    let mut writer = LogWriter::initialize(&config).unwrap();

    // A non-empty directory at the log path cannot be renamed over
    fs::remove_file(&log_path).unwrap();
    fs::create_dir(&log_path).unwrap();
    fs::write(log_path.join("keep"), "x").unwrap();

    let err = writer.replace_all([r#"{"key":"a","value":1}"#]).unwrap_err();

    assert!(matches!(err, FigmentError::WriteFailure(_)));
    assert!(!config.compaction_tmp_path().exists());
    assert!(log_path.join("keep").exists());
}
