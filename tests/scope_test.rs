//! Scoped acquisition: every exit path flushes the archive

use std::panic::{self, AssertUnwindSafe};
use zhip_rs::{ArchiveMap, OpenMode, ZhipError};

/// Helper: read every key of a finished archive
fn keys_on_disk(path: &std::path::Path) -> Vec<String> {
    let mut reader = ArchiveMap::new(path, OpenMode::Read);
    reader.keys().unwrap().collect()
}

#[test]
fn test_with_scope_flushes_on_success() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ok.zip");
    let mut map = ArchiveMap::new(&path, OpenMode::Write);

    let count = map
        .with_scope(|m| {
            m.set("a", b"1")?;
            m.set("b", b"2")?;
            m.len()
        })
        .unwrap();

    assert_eq!(count, 2);
    assert!(!map.is_open());
    assert_eq!(keys_on_disk(&path), vec!["a", "b"]);
}

#[test]
fn test_with_scope_flushes_on_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("error.zip");
    let mut map = ArchiveMap::new(&path, OpenMode::Write);

    let result = map.with_scope(|m| {
        m.set("a", b"1")?;
        m.set("b", b"2")?;
        m.get("never-written")?;
        m.set("c", b"3")
    });

    assert!(matches!(result, Err(ZhipError::NotFound(_))));
    assert!(!map.is_open());
    assert_eq!(keys_on_disk(&path), vec!["a", "b"]);
}

#[test]
fn test_guard_flushes_on_early_return() {
    fn write_then_fail(map: &mut ArchiveMap) -> zhip_rs::Result<()> {
        let mut scope = map.scope();
        scope.set("written", b"yes")?;
        scope.remove("written")?;
        scope.close()
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("early.zip");
    let mut map = ArchiveMap::open(&path);

    assert!(matches!(
        write_then_fail(&mut map),
        Err(ZhipError::Unsupported(_))
    ));
    assert!(!map.is_open());
    assert_eq!(keys_on_disk(&path), vec!["written"]);
}

#[test]
fn test_guard_flushes_on_panic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("panic.zip");
    let mut map = ArchiveMap::open(&path);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut scope = map.scope();
        scope.set("before-panic", b"kept").unwrap();
        panic!("block aborted");
    }));

    assert!(outcome.is_err());
    assert!(!map.is_open());

    let mut reader = ArchiveMap::new(&path, OpenMode::Read);
    assert_eq!(reader.get("before-panic").unwrap(), b"kept");
}

#[test]
fn test_map_usable_after_scope() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reuse.zip");
    let mut map = ArchiveMap::open(&path);

    map.with_scope(|m| m.set("one", b"1")).unwrap();
    map.with_scope(|m| m.set("two", b"2")).unwrap();

    assert_eq!(keys_on_disk(&path), vec!["one", "two"]);
}
