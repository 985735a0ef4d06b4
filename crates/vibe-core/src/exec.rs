//! Shell command execution
//!
//! Runs one fully resolved command string through `sh -c`, capturing both
//! output streams and the exit status. Templates are allowed to contain
//! pipes and redirections, which is why the string goes to a shell rather
//! than being argv-split here.
//!
//! One shot, no retries, no timeout: these are interactive developer
//! commands and `npm install` may legitimately run for minutes.

use std::process::Command;

use tracing::debug;

/// Outcome of executing one shell command
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// True when the child exited with status 0
    pub succeeded: bool,
    pub stdout: String,
    pub stderr: String,
    /// Launch failure description, when the child never ran
    pub error: Option<String>,
}

/// Run `command` as a single shell command and capture the outcome
///
/// A launch failure (shell missing, permission denied) is captured into
/// the result rather than propagated; callers always get a report.
pub fn execute(command: &str) -> ExecutionResult {
    debug!(command = %command, "executing shell command");

    let output = Command::new("sh").arg("-c").arg(command).output();

    match output {
        Ok(output) => {
            let result = ExecutionResult {
                succeeded: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                error: None,
            };
            debug!(
                succeeded = result.succeeded,
                status = ?output.status.code(),
                "command finished"
            );
            result
        }
        Err(err) => ExecutionResult {
            succeeded: false,
            stdout: String::new(),
            stderr: String::new(),
            error: Some(format!("failed to launch command: {}", err)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_template;

    #[test]
    fn test_captures_stdout() {
        let result = execute("echo hello");
        assert!(result.succeeded);
        assert_eq!(result.stdout, "hello\n");
        assert!(result.error.is_none());
    }

    #[test]
    fn test_captures_stderr() {
        let result = execute("echo oops >&2");
        assert!(result.succeeded);
        assert_eq!(result.stderr, "oops\n");
    }

    #[test]
    fn test_nonzero_exit_fails() {
        let result = execute("exit 3");
        assert!(!result.succeeded);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_command_not_found_reported() {
        let result = execute("definitely-not-a-real-binary-4242");
        assert!(!result.succeeded);
        assert!(!result.stderr.is_empty());
    }

    #[test]
    fn test_stdout_kept_on_failure() {
        let result = execute("echo partial; exit 1");
        assert!(!result.succeeded);
        assert_eq!(result.stdout, "partial\n");
    }

    #[test]
    fn test_injection_stays_literal() {
        // A hostile argument quoted by the formatter must come out as data.
        let command = format_template("echo {0}", &["hello; echo INJECTED".to_string()]);
        let result = execute(&command);
        assert!(result.succeeded);
        assert_eq!(result.stdout, "hello; echo INJECTED\n");
    }
}
