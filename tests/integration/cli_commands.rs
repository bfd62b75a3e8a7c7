#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use tempfile::TempDir;

fn setup_data_root(name: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let dataset = dir.path().join(name);
    fs::create_dir_all(&dataset).expect("dataset dir");
    fs::write(
        dataset.join(format!("{name}.features_small")),
        "id,m1,m2,tag,a\n1,x,y,red,1\n2,x,y,blue,2\n3,x,y,red,0\n",
    )
    .expect("features");
    fs::write(
        dataset.join(format!("{name}.graph_small")),
        "src,dst\n1,2\n2,3\n3,42\n",
    )
    .expect("edges");
    let root = dir.path().to_path_buf();
    (dir, root)
}

fn empty_config(dir: &Path) -> PathBuf {
    let path = dir.join("cli.toml");
    fs::write(&path, "").expect("config");
    path
}

fn parse_json(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).expect("json output")
}

#[test]
fn load_prints_json_summary() {
    let (dir, root) = setup_data_root("demo");
    let output = cargo_bin_cmd!("gindata")
        .arg("--config")
        .arg(empty_config(dir.path()))
        .args(["--format", "json", "load", "demo", "--data-root"])
        .arg(&root)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json = parse_json(&output);
    assert_eq!(json["num_classes"], 1);
    assert_eq!(json["num_tags"], 2);
    assert_eq!(json["num_nodes"], 3);
    assert_eq!(json["unresolved_endpoints"], 1);
}

#[test]
fn config_file_supplies_data_root_and_policy() {
    let (dir, root) = setup_data_root("demo");
    let config = dir.path().join("cli.toml");
    fs::write(
        &config,
        format!(
            "[dataset]\ndata_root = {:?}\nunknown_ids = \"drop\"\ndegree_as_tag = true\n",
            root.display().to_string()
        ),
    )
    .expect("config");
    let output = cargo_bin_cmd!("gindata")
        .arg("--config")
        .arg(&config)
        .args(["--format", "json", "load", "demo"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json = parse_json(&output);
    assert_eq!(json["num_edges"], 2);
    // degrees 1, 2, 1
    assert_eq!(json["num_tags"], 2);
}

#[test]
fn reject_policy_exits_with_error() {
    let (dir, root) = setup_data_root("demo");
    let assert = cargo_bin_cmd!("gindata")
        .arg("--config")
        .arg(empty_config(dir.path()))
        .args(["load", "demo", "--unknown-ids", "reject", "--data-root"])
        .arg(&root)
        .assert()
        .failure()
        .code(1);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("unknown node id 42"), "stderr: {stderr}");
}

#[test]
fn split_rejects_fold_out_of_range() {
    let (dir, root) = setup_data_root("demo");
    let assert = cargo_bin_cmd!("gindata")
        .arg("--config")
        .arg(empty_config(dir.path()))
        .args(["split", "demo", "--fold", "10", "--data-root"])
        .arg(&root)
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("fold_idx must be from 0 to 9"), "stderr: {stderr}");
}

#[test]
fn missing_dataset_reports_error() {
    let dir = TempDir::new().expect("tempdir");
    cargo_bin_cmd!("gindata")
        .arg("--config")
        .arg(empty_config(dir.path()))
        .args(["load", "nowhere", "--data-root"])
        .arg(dir.path())
        .assert()
        .failure()
        .code(1);
}
