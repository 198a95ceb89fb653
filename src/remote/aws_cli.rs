//! Parameter store backed by the `aws ssm get-parameter` command

use super::{ParameterStore, RemoteError};
use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Reads parameters through the AWS CLI
///
/// Each read spawns one process with a bounded wait. A read that exceeds the
/// timeout kills the child and reports `RemoteError::Timeout`, so an
/// unreachable endpoint never hangs the caller.
#[derive(Debug, Clone)]
pub struct AwsCliParameterStore {
    program: String,
    region: Option<String>,
    profile: Option<String>,
    timeout: Duration,
}

impl AwsCliParameterStore {
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            program: "aws".to_owned(),
            region: None,
            profile: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use a different executable, e.g. a wrapper script
    #[must_use]
    #[inline]
    pub fn with_program<S: Into<String>>(mut self, program: S) -> Self {
        self.program = program.into();
        self
    }

    #[must_use]
    #[inline]
    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }

    #[must_use]
    #[inline]
    pub fn with_profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile;
        self
    }

    #[must_use]
    #[inline]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self, name: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args([
            "ssm",
            "get-parameter",
            "--name",
            name,
            "--with-decryption",
            "--query",
            "Parameter.Value",
            "--output",
            "text",
        ]);
        if let Some(region) = self.region.as_deref() {
            cmd.args(["--region", region]);
        }
        if let Some(profile) = self.profile.as_deref() {
            cmd.args(["--profile", profile]);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    fn wait_bounded(&self, child: &mut Child, name: &str) -> Result<ExitStatus, RemoteError> {
        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(RemoteError::Timeout {
                        name: name.to_owned(),
                        timeout: self.timeout,
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => return Err(RemoteError::unreachable(e.to_string())),
            }
        }
    }
}

/// Read a child pipe to the end on its own thread so the child never blocks
/// on a full pipe while the caller polls for exit
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buffer)?;
        }
        Ok(buffer)
    })
}

fn collect(reader: JoinHandle<io::Result<Vec<u8>>>) -> Result<Vec<u8>, RemoteError> {
    reader
        .join()
        .map_err(|_| RemoteError::unreachable("output reader panicked"))?
        .map_err(|e| RemoteError::unreachable(e.to_string()))
}

impl Default for AwsCliParameterStore {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterStore for AwsCliParameterStore {
    fn get_parameter(&self, name: &str) -> Result<String, RemoteError> {
        debug!("Reading remote parameter {}", name);

        let mut child = self.command(name).spawn().map_err(|e| {
            RemoteError::unreachable(format!("failed to run '{}': {e}", self.program))
        })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = self.wait_bounded(&mut child, name)?;
        let stdout = collect(stdout)?;
        let stderr = collect(stderr)?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            return Err(classify_failure(name, stderr.trim()));
        }

        let value = String::from_utf8(stdout).map_err(|e| RemoteError::Malformed {
            name: name.to_owned(),
            message: e.to_string(),
        })?;

        Ok(value.trim_end_matches(['\r', '\n']).to_owned())
    }
}

/// Map the CLI's error output onto a `RemoteError` variant
#[must_use]
pub fn classify_failure(name: &str, stderr: &str) -> RemoteError {
    if stderr.contains("ParameterNotFound") {
        return RemoteError::not_found(name);
    }

    let denied_markers = [
        "AccessDenied",
        "UnrecognizedClientException",
        "ExpiredToken",
        "Unable to locate credentials",
        "InvalidSignatureException",
    ];
    if denied_markers.iter().any(|marker| stderr.contains(marker)) {
        return RemoteError::access_denied(first_line(stderr));
    }

    RemoteError::unreachable(first_line(stderr))
}

fn first_line(text: &str) -> String {
    text.lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("no error output")
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_missing_parameter() {
        let err = classify_failure(
            "/ns/dev/app/config",
            "An error occurred (ParameterNotFound) when calling the GetParameter operation:",
        );
        assert_eq!(err, RemoteError::not_found("/ns/dev/app/config"));
    }

    #[test]
    fn classifies_missing_credentials() {
        let err = classify_failure("/ns/dev/app/config", "\nUnable to locate credentials. You can configure credentials by running \"aws configure\".");
        assert!(matches!(err, RemoteError::AccessDenied { .. }));
    }

    #[test]
    fn unknown_failures_are_unreachable() {
        let err = classify_failure("/ns/dev/app/config", "Could not connect to the endpoint URL");
        assert_eq!(
            err,
            RemoteError::unreachable("Could not connect to the endpoint URL")
        );
    }

    #[test]
    fn missing_program_is_unreachable() {
        let store = AwsCliParameterStore::new().with_program("definitely-not-a-real-aws-binary");
        let err = store.get_parameter("/ns/dev/app/config").unwrap_err();
        assert!(matches!(err, RemoteError::Unreachable { .. }));
    }
}
