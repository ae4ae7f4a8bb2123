// Discovery contract: fixed one-level scan, two naming patterns, and the
// deterministic prefix-group-then-suffix-group ordering.

use std::fs;
use std::path::Path;

use rill::runner::discovery::{discover_check_files, NamePattern};

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), "(assert true)\n").unwrap();
}

#[test]
fn groups_are_sorted_and_prefix_group_comes_first() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    touch(dir, "test_b.rill");
    touch(dir, "test_a.rill");
    touch(dir, "z_test.rill");
    touch(dir, "a_test.rill");

    let files = discover_check_files(dir).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|f| f.path.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["test_a.rill", "test_b.rill", "a_test.rill", "z_test.rill"]);

    assert_eq!(files[0].pattern, NamePattern::TestPrefix);
    assert_eq!(files[1].pattern, NamePattern::TestPrefix);
    assert_eq!(files[2].pattern, NamePattern::TestSuffix);
    assert_eq!(files[3].pattern, NamePattern::TestSuffix);
}

#[test]
fn non_matching_files_and_nested_directories_are_ignored() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    touch(dir, "test_real.rill");
    touch(dir, "helpers.rill");
    touch(dir, "test_wrong_extension.txt");
    touch(dir, "testnounderscore.rill");

    let nested = dir.join("nested");
    fs::create_dir(&nested).unwrap();
    touch(&nested, "test_hidden.rill");

    let files = discover_check_files(dir).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|f| f.path.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["test_real.rill"]);
}

#[test]
fn a_file_matching_both_patterns_is_discovered_once() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    touch(dir, "test_edge_test.rill");

    let files = discover_check_files(dir).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].pattern, NamePattern::TestPrefix);
}

#[test]
fn empty_directory_discovers_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(discover_check_files(tmp.path()).unwrap().is_empty());
}

#[test]
fn unreadable_root_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("does-not-exist");
    let err = discover_check_files(&missing).unwrap_err();
    assert_eq!(err.category(), rill::ErrorCategory::Fault);
}
