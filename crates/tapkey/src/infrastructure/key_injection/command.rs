//! Shared helper for injectors that shell out to a platform tool.
//!
//! Each backend builds an argument list and a stderr classifier; this module
//! runs the program, waits for it, and turns the outcome into an
//! [`InjectionError`].

use std::process::Stdio;

use tokio::process::Command;
use tracing::trace;

use crate::application::dispatch_tag::InjectionError;

/// Returns a remediation hint when `stderr` shows the OS blocked injection.
pub(super) type PermissionClassifier = fn(&str) -> Option<String>;

/// Runs `program` with `args` and waits for it to exit.
///
/// # Errors
///
/// - [`InjectionError::NotInstalled`] if the program is not on `PATH`.
/// - [`InjectionError::Spawn`] for any other launch failure.
/// - [`InjectionError::PermissionDenied`] if `classify` recognizes stderr.
/// - [`InjectionError::Failed`] for any other non-zero exit.
pub(super) async fn run(
    program: &'static str,
    args: &[String],
    classify: PermissionClassifier,
) -> Result<(), InjectionError> {
    trace!(program, ?args, "spawning key injector");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => InjectionError::NotInstalled { program },
            _ => InjectionError::Spawn { program, source },
        })?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if let Some(hint) = classify(&stderr) {
        return Err(InjectionError::PermissionDenied(hint));
    }
    Err(InjectionError::Failed {
        program,
        status: output.status.to_string(),
        stderr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never(_: &str) -> Option<String> {
        None
    }

    #[tokio::test]
    async fn test_missing_program_maps_to_not_installed() {
        // Act
        let result = run("tapkey-no-such-helper-program", &[], never).await;

        // Assert
        assert!(matches!(
            result,
            Err(InjectionError::NotInstalled {
                program: "tapkey-no-such-helper-program"
            })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_exit_is_ok() {
        let result = run("true", &[], never).await;
        assert!(result.is_ok(), "got {result:?}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_maps_to_failed_with_stderr() {
        let args = vec!["-c".to_string(), "echo boom >&2; exit 3".to_string()];

        let result = run("sh", &args, never).await;

        match result {
            Err(InjectionError::Failed { program, stderr, .. }) => {
                assert_eq!(program, "sh");
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_classifier_turns_failure_into_permission_denied() {
        let args = vec!["-c".to_string(), "echo 'not allowed' >&2; exit 1".to_string()];
        fn classify(stderr: &str) -> Option<String> {
            stderr.contains("not allowed").then(|| "grant access".to_string())
        }

        let result = run("sh", &args, classify).await;

        assert!(matches!(result, Err(InjectionError::PermissionDenied(h)) if h == "grant access"));
    }
}
