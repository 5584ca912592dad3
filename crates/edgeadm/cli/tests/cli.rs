use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn edgeadm() -> Command {
    let mut cmd = Command::cargo_bin("edgeadm").unwrap();
    cmd.env("EDGEADM_CONFIG", "/nonexistent/edgeadm/config.toml");
    cmd
}

fn edge_config(path: &Path) -> Command {
    let mut cmd = edgeadm();
    cmd.args([
        "edge-config",
        "--cloudcore-ipport",
        "1.2.3.4:10000",
        "--edgenode-name",
        "test-node",
        "--edgenode-ip",
        "10.0.0.2",
        "--config",
    ])
    .arg(path);
    cmd
}

#[test]
fn test_help_lists_commands() {
    edgeadm()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("manifest"))
        .stdout(predicate::str::contains("join"))
        .stdout(predicate::str::contains("edge-config"));
}

#[test]
fn test_edge_config_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config").join("edgecore.yaml");

    edge_config(&path)
        .args(["--labels", "zone=a,rack=7", "--with-edge-taint"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("EdgeCore configuration written"));

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("test-node"));
    assert!(written.contains("https://1.2.3.4:10002"));
    assert!(written.contains("node-role.kubernetes.io/edge"));
    assert!(written.contains("zone: a"));
}

#[test]
fn test_edge_config_is_byte_identical_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edgecore.yaml");

    edge_config(&path).assert().success();
    let first = std::fs::read(&path).unwrap();
    edge_config(&path).assert().success();
    assert_eq!(first, std::fs::read(&path).unwrap());
}

#[test]
fn test_unsupported_cgroup_driver_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edgecore.yaml");

    edge_config(&path)
        .args(["--cgroupdriver", "cgroupv3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported CGroupDriver: cgroupv3"));
    assert!(!path.exists());
}

#[test]
fn test_invalid_node_ip_is_not_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edgecore.yaml");

    edgeadm()
        .args([
            "edge-config",
            "--cloudcore-ipport",
            "1.2.3.4:10000",
            "--edgenode-name",
            "test-node",
            "--edgenode-ip",
            "not-an-ip",
            "--config",
        ])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("nodeIP"));
    assert!(!path.exists());
}

#[test]
fn test_manifest_generate_rejects_unknown_profile() {
    edgeadm()
        .args(["manifest", "generate", "--profile", "unknown=1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported profile unknown=1"));
}
