//! CLI integration tests against the shipped `deploy/` tree

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const DEPLOY: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/deploy");

fn stackconf() -> Command {
    let mut cmd = Command::cargo_bin("stackconf").unwrap();
    cmd.env_remove("STACKCONF_ROOT")
        .env_remove("STACKCONF_NAMESPACE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_output() {
    stackconf()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--module"))
        .stdout(predicate::str::contains("--stage"));
}

#[test]
fn prints_resolved_module_config() {
    stackconf()
        .args(["--root", DEPLOY, "--offline", "--module", "app", "--stage", "dev"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"appConfig\""))
        .stdout(predicate::str::contains("\"globalConfig\""))
        .stdout(predicate::str::contains("fwConfig").not())
        .stderr(predicate::str::contains("falling back"));
}

#[test]
fn output_is_json() {
    let output = stackconf()
        .args(["--root", DEPLOY, "--offline", "--module", "vpc", "--stage", "dev"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["stage"], "dev");
    assert_eq!(value["vpcConfig"]["us-east-1"]["cidr"], "10.10.0.0/16");
}

#[test]
fn applies_overrides_on_request() {
    let output = stackconf()
        .args(["--root", DEPLOY, "--offline", "--module", "app", "--stage", "dev", "--overrides"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["appConfig"]["memorySize"], 1024);
}

#[test]
fn missing_stage_exits_with_both_locations() {
    stackconf()
        .args(["--root", DEPLOY, "--offline", "--module", "app", "--stage", "ghost"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("/stackconf/ghost/global/config"))
        .stderr(predicate::str::contains("conf/ghost.json"));
}

#[test]
fn invalid_config_lists_fields() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("conf")).unwrap();
    fs::create_dir_all(root.join("app/conf")).unwrap();
    fs::copy(format!("{DEPLOY}/conf/schema.json"), root.join("conf/schema.json")).unwrap();
    fs::copy(format!("{DEPLOY}/conf/dev.json"), root.join("conf/dev.json")).unwrap();
    fs::copy(format!("{DEPLOY}/app/conf/schema.json"), root.join("app/conf/schema.json")).unwrap();
    fs::write(
        root.join("app/conf/dev.json"),
        r#"{"name": "Orders", "version": "1.0.0", "runtime": "java21"}"#,
    )
    .unwrap();

    stackconf()
        .args(["--offline", "--module", "app", "--stage", "dev", "--root"])
        .arg(root)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Validation errors:"))
        .stderr(predicate::str::contains("app:/name"))
        .stderr(predicate::str::contains("app:/runtime"));
}

#[test]
fn rejects_bad_stage() {
    stackconf()
        .args(["--root", DEPLOY, "--offline", "--module", "app", "--stage", "../dev"])
        .assert()
        .failure()
        .code(6);
}

#[test]
fn offline_secrets_fail() {
    stackconf()
        .args(["--offline", "--secret", "/stackconf/dev/app/api-key"])
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("/stackconf/dev/app/api-key"));
}

#[test]
fn stage_env_var_is_ignored() {
    stackconf()
        .env("STACKCONF_STAGE", "dev")
        .args(["--root", DEPLOY, "--offline", "--module", "app"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--stage"));
}

}
