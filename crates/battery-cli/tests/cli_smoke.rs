use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn battery(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_battery"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("run battery")
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, contents).expect("write");
}

fn seed_sources(root: &Path) {
    write(
        &root.join("battery/static/js/load_experiments.js"),
        concat!(
            "switch (a) {[SUB_EXPERIMENTLOAD_SUB]}\n",
            "switch (b) {[SUB_EXPERIMENTCONCAT_SUB]}\n",
            "var t = [SUB_EXPERIMENTTIMES_SUB];\n",
        ),
    );
    write(
        &root.join("experiments/simple_rt/psiturk.json"),
        r#"[{"tag": "simple_rt", "run": ["simple_rt.js"], "time": 3.5}]"#,
    );
    write(&root.join("experiments/simple_rt/simple_rt.js"), "// task");
    write(
        &root.join("experiments/choice_rt/psiturk.json"),
        r#"[{"tag": "choice_rt", "run": ["choice_rt.js"], "time": 4}]"#,
    );
}

#[test]
fn generate_from_local_sources() {
    let root = tempdir().expect("tempdir");
    seed_sources(root.path());
    let dest = root.path().join("out");
    let output = battery(&[
        "generate",
        "--dest",
        dest.to_str().expect("utf8"),
        "--sources",
        root.path().to_str().expect("utf8"),
        "--experiment",
        "simple_rt",
        "--field",
        "port=8080",
        "--json",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["relocated"], serde_json::json!(["simple_rt"]));

    let script = fs::read_to_string(dest.join("static/js/load_experiments.js")).expect("script");
    assert!(script.contains("case \"simple_rt\":"));
    assert!(!script.contains("choice_rt"));
    let config = fs::read_to_string(dest.join("config.txt")).expect("config");
    assert!(config.contains("port = 8080\n"));
}

#[test]
fn existing_destination_is_reported_not_failed() {
    let root = tempdir().expect("tempdir");
    seed_sources(root.path());
    let output = battery(&[
        "generate",
        "--dest",
        root.path().to_str().expect("utf8"),
        "--sources",
        root.path().to_str().expect("utf8"),
    ]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("cannot generate"));
}

#[test]
fn list_prints_catalog() {
    let root = tempdir().expect("tempdir");
    seed_sources(root.path());
    let output = battery(&[
        "list",
        "--repo",
        root.path().join("experiments").to_str().expect("utf8"),
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "choice_rt 4 1\nsimple_rt 3.5 1\n");
}

#[test]
fn render_config_applies_fields() {
    let root = tempdir().expect("tempdir");
    let template = root.path().join("config.txt");
    write(&template, "[foo]\na = 1\nb = 2");
    let output = battery(&[
        "render-config",
        "--template",
        template.to_str().expect("utf8"),
        "--field",
        "b=9",
    ]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "[foo]\na = 1\nb = 9");
}

#[test]
fn long_version_is_json() {
    let output = battery(&["version", "--long"]);
    assert!(output.status.success());
    let info: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(info["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(info["metadata_file"], "psiturk.json");
    if let Some(commit) = info.get("git_commit") {
        assert!(!commit.as_str().expect("string").is_empty());
    }
}
