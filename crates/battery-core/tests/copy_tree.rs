use std::fs;

use battery_core::{copy_tree, read_text, remove_tree, write_text};
use tempfile::tempdir;

#[test]
fn copies_nested_tree() {
    let root = tempdir().expect("tempdir");
    let src = root.path().join("src");
    write_text(&src.join("task.js"), "var x = 1;").expect("write");
    write_text(&src.join("css/style.css"), "body {}").expect("write");
    fs::create_dir_all(src.join("empty")).expect("mkdir");

    let dest = root.path().join("out/static/experiments/simple_rt");
    let stats = copy_tree(&src, &dest).expect("copy");
    assert_eq!(stats.files, 2);
    assert_eq!(stats.directories, 3);
    assert_eq!(
        fs::read_to_string(dest.join("css/style.css")).expect("read"),
        "body {}"
    );
    assert!(dest.join("empty").is_dir());
}

#[test]
fn refuses_existing_destination() {
    let root = tempdir().expect("tempdir");
    let src = root.path().join("src");
    write_text(&src.join("a.js"), "a").expect("write");
    let dest = root.path().join("dest");
    fs::create_dir_all(&dest).expect("mkdir");
    let err = copy_tree(&src, &dest).expect_err("existing destination");
    assert_eq!(err.code(), "battery_core.copy_exists");
    assert!(!dest.join("a.js").exists());
}

#[test]
fn missing_source_is_an_error() {
    let root = tempdir().expect("tempdir");
    let err =
        copy_tree(&root.path().join("nope"), &root.path().join("dest")).expect_err("missing");
    assert_eq!(err.code(), "battery_core.copy_source");
    assert!(!root.path().join("dest").exists());
}

#[test]
fn write_text_creates_missing_parents() {
    let root = tempdir().expect("tempdir");
    let path = root.path().join("out/static/js/load_experiments.js");
    write_text(&path, "var t = [];\n").expect("write");
    assert_eq!(read_text(&path).expect("read"), "var t = [];\n");
}

#[test]
fn remove_tree_tolerates_missing_path() {
    let root = tempdir().expect("tempdir");
    remove_tree(&root.path().join("missing")).expect("missing is fine");
}
