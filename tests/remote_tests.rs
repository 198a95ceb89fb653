//! Parameter store implementations

use stackconf::remote::{AwsCliParameterStore, InMemoryParameterStore, OfflineParameterStore, ParameterStore, RemoteError};

#[test]
fn in_memory_store_reports_missing_parameters() {
    let store = InMemoryParameterStore::new().with_parameter("/ns/dev/app/config", "{}");

    assert_eq!(store.get_parameter("/ns/dev/app/config").unwrap(), "{}");
    assert_eq!(
        store.get_parameter("/ns/dev/fw/config").unwrap_err(),
        RemoteError::not_found("/ns/dev/fw/config")
    );
}

#[test]
fn forced_failure_applies_to_every_read() {
    let store = InMemoryParameterStore::new()
        .with_parameter("/ns/dev/app/config", "{}")
        .failing(RemoteError::unreachable("no route to host"));

    assert!(matches!(
        store.get_parameter("/ns/dev/app/config"),
        Err(RemoteError::Unreachable { .. })
    ));
}

#[test]
fn targeted_failure_leaves_other_parameters_readable() {
    let store = InMemoryParameterStore::new()
        .with_parameter("/ns/dev/global/config", "{}")
        .with_parameter("/ns/dev/app/config", "{}")
        .failing_for("/ns/dev/app/config", RemoteError::access_denied("denied"));

    assert_eq!(store.get_parameter("/ns/dev/global/config").unwrap(), "{}");
    assert!(matches!(
        store.get_parameter("/ns/dev/app/config"),
        Err(RemoteError::AccessDenied { .. })
    ));
}

#[test]
fn offline_store_is_unreachable() {
    assert!(matches!(
        OfflineParameterStore.get_parameter("/ns/dev/app/config"),
        Err(RemoteError::Unreachable { .. })
    ));
}

#[cfg(unix)]
mod cli_store {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt as _;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    fn script(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("fake-aws");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn returns_trimmed_value() {
        let dir = TempDir::new().unwrap();
        let program = script(&dir, r#"echo '{"region": "us-east-1"}'"#);
        let store = AwsCliParameterStore::new().with_program(program.display().to_string());

        assert_eq!(
            store.get_parameter("/ns/dev/global/config").unwrap(),
            r#"{"region": "us-east-1"}"#
        );
    }

    #[test]
    fn maps_not_found_output() {
        let dir = TempDir::new().unwrap();
        let program = script(
            &dir,
            "echo 'An error occurred (ParameterNotFound) when calling the GetParameter operation: ' >&2\nexit 254",
        );
        let store = AwsCliParameterStore::new().with_program(program.display().to_string());

        assert_eq!(
            store.get_parameter("/ns/dev/app/config").unwrap_err(),
            RemoteError::not_found("/ns/dev/app/config")
        );
    }

    #[test]
    fn slow_reads_time_out() {
        let dir = TempDir::new().unwrap();
        let program = script(&dir, "exec sleep 5");
        let store = AwsCliParameterStore::new()
            .with_program(program.display().to_string())
            .with_timeout(Duration::from_millis(200));

        let err = store.get_parameter("/ns/dev/app/config").unwrap_err();
        assert!(matches!(err, RemoteError::Timeout { .. }));
        assert!(err.to_string().contains("200ms"), "{err}");
    }

    #[test]
    fn output_larger_than_pipe_buffer_is_read_fully() {
        let dir = TempDir::new().unwrap();
        let program = script(&dir, "head -c 200000 /dev/zero | tr '\\0' 'a'");
        let store = AwsCliParameterStore::new()
            .with_program(program.display().to_string())
            .with_timeout(Duration::from_secs(5));

        let value = store.get_parameter("/ns/dev/app/config").unwrap();
        assert_eq!(value.len(), 200_000);
        assert!(value.bytes().all(|b| b == b'a'));
    }
}
