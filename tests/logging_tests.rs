//! Log output of configuration resolution

mod common;

use stackconf::config::{ConfigRequest, Module, SourceResolver};
use stackconf::remote::{InMemoryParameterStore, RemoteError};
use stackconf::utils::path::DocumentKind;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::Level;

/// In-memory log sink shared between the subscriber and the test
#[derive(Clone, Default)]
struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.buffer.lock().unwrap().clone()).unwrap()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber writing plain-text logs at `level` into a buffer
fn capture<F: FnOnce()>(level: Level, f: F) -> String {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_target(false)
        .with_max_level(level)
        .finish();

    tracing::subscriber::with_default(subscriber, f);
    logs.contents()
}

fn fallback_lines(logs: &str) -> Vec<&str> {
    logs.lines().filter(|line| line.contains("falling back")).collect()
}

#[test]
fn fallback_notice_names_the_remote_path() {
    let system = common::fixture_system();
    let store = InMemoryParameterStore::new().failing(RemoteError::access_denied("access denied"));
    let resolver = SourceResolver::new(&system, &store, "stackconf", Path::new(common::ROOT));
    let request = ConfigRequest::new(Module::App, "dev").unwrap();

    let logs = capture(Level::INFO, || {
        resolver.resolve(&request, DocumentKind::Config).unwrap();
    });

    let lines = fallback_lines(&logs);
    assert_eq!(lines.len(), 1, "logs: {logs}");
    assert!(lines[0].contains("INFO"));
    assert!(lines[0].contains("/stackconf/dev/app/config"));
    assert!(lines[0].contains("/repo/app/conf/dev.json"));
}

#[test]
fn remote_hit_logs_no_fallback() {
    let system = common::fixture_system();
    let store = InMemoryParameterStore::new()
        .with_parameter("/stackconf/dev/app/config", r#"{"name": "from-remote"}"#);
    let resolver = SourceResolver::new(&system, &store, "stackconf", Path::new(common::ROOT));
    let request = ConfigRequest::new(Module::App, "dev").unwrap();

    let logs = capture(Level::INFO, || {
        resolver.resolve(&request, DocumentKind::Config).unwrap();
    });

    assert!(fallback_lines(&logs).is_empty(), "logs: {logs}");
}

#[test]
fn load_config_logs_one_notice_per_fallen_back_document() {
    let system = common::fixture_system();
    let store = InMemoryParameterStore::new()
        .with_parameter(
            "/stackconf/dev/global/config",
            include_str!("../deploy/conf/dev.json"),
        )
        .failing_for("/stackconf/dev/app/config", RemoteError::access_denied("access denied"));
    let manager = common::manager(&system, &store);
    let request = ConfigRequest::new(Module::App, "dev").unwrap();

    let logs = capture(Level::INFO, || {
        manager.load_config(&request).unwrap();
    });

    let lines = fallback_lines(&logs);
    assert_eq!(lines.len(), 1, "logs: {logs}");
    assert!(lines[0].contains("/stackconf/dev/app/config"));
}

#[test]
fn parameter_values_are_never_logged() {
    let system = common::fixture_system();
    let store = InMemoryParameterStore::new()
        .with_parameter("/stackconf/dev/app/config", "s3cr3t-not-json-value")
        .with_parameter("/stackconf/dev/app/api-key", "s3cr3t-api-key");
    let manager = common::manager(&system, &store);
    let request = ConfigRequest::new(Module::App, "dev").unwrap();

    let logs = capture(Level::TRACE, || {
        manager.load_config(&request).unwrap();
        manager.get_secrets(["/stackconf/dev/app/api-key"]).unwrap();
    });

    assert!(logs.contains("/stackconf/dev/app/config"));
    assert!(logs.contains("/stackconf/dev/app/api-key"));
    assert!(!logs.contains("s3cr3t"), "logs: {logs}");
}
