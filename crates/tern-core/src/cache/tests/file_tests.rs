use std::fs;

use tempfile::tempdir;

use crate::cache::error::CacheError;
use crate::cache::{CacheEntry, CachePool, FileCachePool};
use crate::kernel::error::Error;

#[test]
fn test_open_creates_directory() {
    let temp_dir = tempdir().unwrap();
    let cache_dir = temp_dir.path().join("var").join("cache");

    let pool = FileCachePool::open(&cache_dir).expect("open should create the directory");

    assert!(cache_dir.is_dir());
    assert_eq!(pool.directory(), cache_dir.as_path());
}

#[test]
fn test_entries_survive_reopening() {
    let temp_dir = tempdir().unwrap();
    let entry = CacheEntry::new("container", serde_json::json!({ "components": [] }));

    {
        let pool = FileCachePool::open(temp_dir.path()).unwrap();
        pool.save(entry.clone()).unwrap();
    }

    let reopened = FileCachePool::open(temp_dir.path()).unwrap();
    assert!(reopened.has_item("container").unwrap());
    assert_eq!(reopened.get_item("container").unwrap(), Some(entry));
}

#[test]
fn test_missing_entry_is_none() {
    let temp_dir = tempdir().unwrap();
    let pool = FileCachePool::open(temp_dir.path()).unwrap();

    assert!(!pool.has_item("container").unwrap());
    assert!(pool.get_item("container").unwrap().is_none());
}

#[test]
fn test_corrupt_entry_is_reported() {
    let temp_dir = tempdir().unwrap();
    let pool = FileCachePool::open(temp_dir.path()).unwrap();
    fs::write(temp_dir.path().join("container.json"), b"{ not json").unwrap();

    match pool.get_item("container") {
        Err(Error::Cache(CacheError::Corrupt { key, .. })) => assert_eq!(key, "container"),
        other => panic!("Expected corrupt entry error, got {:?}", other),
    }
}

#[test]
fn test_clear_only_removes_entries() {
    let temp_dir = tempdir().unwrap();
    let pool = FileCachePool::open(temp_dir.path()).unwrap();
    pool.save(CacheEntry::new("a", serde_json::json!(1))).unwrap();
    pool.save(CacheEntry::new("b", serde_json::json!(2))).unwrap();
    fs::write(temp_dir.path().join("README"), b"keep me").unwrap();

    assert_eq!(pool.clear().unwrap(), 2);
    assert!(!pool.has_item("a").unwrap());
    assert!(temp_dir.path().join("README").exists());
}

#[test]
fn test_open_fails_when_path_is_a_file() {
    let temp_dir = tempdir().unwrap();
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, b"").unwrap();

    let result = FileCachePool::open(blocker.join("cache"));

    assert!(matches!(result, Err(Error::StorageSystem(_))), "Got {:?}", result);
}
