//! Tests for SquirrelRepository
//!
//! These tests verify:
//! - CRUD operations and creation ordering
//! - Field validation on create and replace
//! - Id assignment (monotonic, never reused, survives reopen)
//! - Persistence through the record store
//! - Concurrent writers do not lose updates

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use squirrelstore::repository::StoredLine;
use squirrelstore::store::RecordStore;
use squirrelstore::{SquirrelError, SquirrelFields, SquirrelRecord, SquirrelRepository};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_repo() -> (TempDir, PathBuf, SquirrelRepository) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("squirrels.db");
    let repo = SquirrelRepository::open(&path).unwrap();
    (temp_dir, path, repo)
}

fn fields(name: &str, size: &str) -> SquirrelFields {
    SquirrelFields::new(name, size)
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_repository_is_empty() {
    let (_temp, _path, repo) = setup_temp_repo();

    assert!(repo.list().unwrap().is_empty());
    assert_eq!(repo.next_id().unwrap(), 1);
}

#[test]
fn test_create_then_list() {
    let (_temp, _path, repo) = setup_temp_repo();

    let created = repo.create(fields("Sam", "large")).unwrap();
    let all = repo.list().unwrap();

    assert_eq!(all.len(), 1);
    assert_eq!(all[0], created);
    assert_eq!(created.name, "Sam");
    assert_eq!(created.size, "large");
}

#[test]
fn test_list_preserves_creation_order() {
    let (_temp, _path, repo) = setup_temp_repo();

    for i in 0..3 {
        repo.create(fields(&format!("N{}", i), &format!("S{}", i))).unwrap();
    }

    let names: Vec<_> = repo.list().unwrap().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["N0", "N1", "N2"]);
}

#[test]
fn test_get_existing_and_missing() {
    let (_temp, _path, repo) = setup_temp_repo();
    let created = repo.create(fields("Nutkin", "small")).unwrap();

    assert_eq!(repo.get(created.id).unwrap(), created);
    assert!(matches!(repo.get(9999), Err(SquirrelError::NotFound(9999))));
}

#[test]
fn test_replace_updates_in_place() {
    let (_temp, _path, repo) = setup_temp_repo();
    let a = repo.create(fields("A", "B")).unwrap();
    let b = repo.create(fields("X", "Y")).unwrap();

    let updated = repo.replace(a.id, fields("A2", "C")).unwrap();

    assert_eq!(updated, SquirrelRecord { id: a.id, name: "A2".into(), size: "C".into() });
    // Position in the collection is unchanged
    assert_eq!(repo.list().unwrap(), vec![updated, b]);
}

#[test]
fn test_replace_missing_id() {
    let (_temp, _path, repo) = setup_temp_repo();

    let result = repo.replace(9999, fields("X", "Y"));

    assert!(matches!(result, Err(SquirrelError::NotFound(9999))));
}

#[test]
fn test_delete_removes_record() {
    let (_temp, _path, repo) = setup_temp_repo();
    let a = repo.create(fields("T", "S")).unwrap();
    let b = repo.create(fields("U", "V")).unwrap();

    repo.delete(a.id).unwrap();

    assert!(matches!(repo.get(a.id), Err(SquirrelError::NotFound(_))));
    assert_eq!(repo.list().unwrap(), vec![b]);
}

#[test]
fn test_delete_missing_id() {
    let (_temp, _path, repo) = setup_temp_repo();

    assert!(matches!(repo.delete(9999), Err(SquirrelError::NotFound(9999))));
}

#[test]
fn test_full_lifecycle() {
    let (_temp, _path, repo) = setup_temp_repo();

    let created = repo.create(fields("Seq", "one")).unwrap();
    repo.replace(created.id, fields("Seq2", "two")).unwrap();

    let fetched = repo.get(created.id).unwrap();
    assert_eq!(fetched.name, "Seq2");
    assert_eq!(fetched.size, "two");

    repo.delete(created.id).unwrap();
    assert!(matches!(repo.get(created.id), Err(SquirrelError::NotFound(_))));
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_create_requires_both_fields() {
    let (_temp, _path, repo) = setup_temp_repo();

    let cases = [
        SquirrelFields { name: None, size: Some("large".into()) },
        SquirrelFields { name: Some("Sam".into()), size: None },
        SquirrelFields { name: Some("".into()), size: Some("large".into()) },
        SquirrelFields { name: Some("Sam".into()), size: Some("".into()) },
        SquirrelFields::default(),
    ];

    for case in cases {
        let result = repo.create(case.clone());
        assert!(
            matches!(result, Err(SquirrelError::Validation(_))),
            "{:?} should be rejected",
            case
        );
    }

    assert!(repo.list().unwrap().is_empty());
    // Rejected creates do not consume ids
    assert_eq!(repo.next_id().unwrap(), 1);
}

#[test]
fn test_replace_requires_both_fields() {
    let (_temp, _path, repo) = setup_temp_repo();
    let created = repo.create(fields("X", "Y")).unwrap();

    let result = repo.replace(
        created.id,
        SquirrelFields { name: Some("Only".into()), size: None },
    );

    assert!(matches!(result, Err(SquirrelError::Validation(_))));
    assert_eq!(repo.get(created.id).unwrap(), created);
}

#[test]
fn test_replace_validates_before_lookup() {
    let (_temp, _path, repo) = setup_temp_repo();

    let result = repo.replace(9999, SquirrelFields::default());

    assert!(matches!(result, Err(SquirrelError::Validation(_))));
}

// =============================================================================
// Id Assignment Tests
// =============================================================================

#[test]
fn test_ids_are_monotonic() {
    let (_temp, _path, repo) = setup_temp_repo();

    let ids: Vec<_> = (0..5)
        .map(|i| repo.create(fields(&i.to_string(), "s")).unwrap().id)
        .collect();

    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_ids_not_reused_after_delete() {
    let (_temp, _path, repo) = setup_temp_repo();
    let a = repo.create(fields("a", "s")).unwrap();
    let b = repo.create(fields("b", "s")).unwrap();

    repo.delete(b.id).unwrap();
    repo.delete(a.id).unwrap();
    let c = repo.create(fields("c", "s")).unwrap();

    assert!(c.id > b.id);
}

#[test]
fn test_ids_not_reused_after_reopen() {
    let (_temp, path, repo) = setup_temp_repo();
    repo.create(fields("a", "s")).unwrap();
    let last = repo.create(fields("b", "s")).unwrap();
    repo.delete(last.id).unwrap();
    drop(repo);

    let reopened = SquirrelRepository::open(&path).unwrap();
    let next = reopened.create(fields("c", "s")).unwrap();

    assert_eq!(next.id, last.id + 1);
}

#[test]
fn test_last_id_is_handed_out_once() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("squirrels.db");
    fs::write(
        &path,
        format!("{{\"type\":\"meta\",\"next_id\":{}}}\n", u64::MAX - 1),
    )
    .unwrap();
    let repo = SquirrelRepository::open(&path).unwrap();

    let last = repo.create(fields("last", "s")).unwrap();
    assert_eq!(last.id, u64::MAX - 1);

    let result = repo.create(fields("one too many", "s"));
    assert!(matches!(result, Err(SquirrelError::Storage(_))));

    // The failed create wrote nothing
    assert_eq!(repo.list().unwrap(), vec![last]);
    assert_eq!(repo.next_id().unwrap(), u64::MAX);
}

#[test]
fn test_exhausted_counter_fails_create() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("squirrels.db");
    fs::write(
        &path,
        format!("{{\"type\":\"meta\",\"next_id\":{}}}\n", u64::MAX),
    )
    .unwrap();
    let repo = SquirrelRepository::open(&path).unwrap();

    let result = repo.create(fields("a", "s"));

    assert!(matches!(result, Err(SquirrelError::Storage(_))));
    assert!(repo.list().unwrap().is_empty());
}

#[test]
fn test_record_with_max_id_still_opens() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("squirrels.db");
    fs::write(
        &path,
        format!(
            "{{\"type\":\"squirrel\",\"id\":{},\"name\":\"a\",\"size\":\"b\"}}\n",
            u64::MAX
        ),
    )
    .unwrap();

    let repo = SquirrelRepository::open(&path).unwrap();

    assert_eq!(repo.get(u64::MAX).unwrap().name, "a");
    assert_eq!(repo.list().unwrap().len(), 1);
    assert!(matches!(
        repo.create(fields("c", "s")),
        Err(SquirrelError::Storage(_))
    ));

    // Other operations keep working
    repo.replace(u64::MAX, fields("a2", "b2")).unwrap();
    repo.delete(u64::MAX).unwrap();
    assert!(repo.list().unwrap().is_empty());
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_records_survive_reopen() {
    let (_temp, path, repo) = setup_temp_repo();
    let a = repo.create(fields("Sam", "large")).unwrap();
    let b = repo.create(fields("Mr Nutkin", "small & quick")).unwrap();
    drop(repo);

    let reopened = SquirrelRepository::open(&path).unwrap();

    assert_eq!(reopened.list().unwrap(), vec![a, b]);
}

#[test]
fn test_file_layout_is_meta_then_records() {
    let (_temp, path, repo) = setup_temp_repo();
    let a = repo.create(fields("Sam", "large")).unwrap();

    let lines = RecordStore::open(&path).unwrap().load_strings().unwrap();

    assert_eq!(lines.len(), 2);
    assert_eq!(StoredLine::decode(&lines[0]).unwrap(), StoredLine::Meta { next_id: 2 });
    assert_eq!(StoredLine::decode(&lines[1]).unwrap(), StoredLine::Squirrel(a));
}

#[test]
fn test_values_with_line_breaks_stay_on_one_line() {
    let (_temp, path, repo) = setup_temp_repo();
    let created = repo.create(fields("two\nlines", "cr\rhere")).unwrap();

    let lines = RecordStore::open(&path).unwrap().load_strings().unwrap();
    assert_eq!(lines.len(), 2);

    assert_eq!(repo.get(created.id).unwrap().name, "two\nlines");
}

#[test]
fn test_file_without_meta_line_derives_next_id() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("squirrels.db");
    fs::write(
        &path,
        "{\"type\":\"squirrel\",\"id\":7,\"name\":\"a\",\"size\":\"b\"}\n",
    )
    .unwrap();

    let repo = SquirrelRepository::open(&path).unwrap();

    assert_eq!(repo.next_id().unwrap(), 8);
    assert_eq!(repo.get(7).unwrap().name, "a");
}

#[test]
fn test_blank_lines_are_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("squirrels.db");
    fs::write(&path, "\n\n").unwrap();

    let repo = SquirrelRepository::open(&path).unwrap();

    assert!(repo.list().unwrap().is_empty());
}

#[test]
fn test_corrupt_file_fails_to_open() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("squirrels.db");
    fs::write(&path, "not json\n").unwrap();

    let result = SquirrelRepository::open(&path);

    assert!(matches!(result, Err(SquirrelError::Serialization(_))));
}

#[test]
fn test_duplicate_ids_fail_to_open() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("squirrels.db");
    let line = "{\"type\":\"squirrel\",\"id\":1,\"name\":\"a\",\"size\":\"b\"}";
    fs::write(&path, format!("{}\n{}\n", line, line)).unwrap();

    let result = SquirrelRepository::open(&path);

    assert!(matches!(result, Err(SquirrelError::Storage(_))));
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_creates_lose_nothing() {
    let (_temp, _path, repo) = setup_temp_repo();
    let repo = Arc::new(repo);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let repo = Arc::clone(&repo);
            thread::spawn(move || {
                for i in 0..10 {
                    repo.create(fields(&format!("t{}-{}", t, i), "s")).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let all = repo.list().unwrap();
    assert_eq!(all.len(), 40);

    let mut ids: Vec<_> = all.iter().map(|r| r.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 40);
}
