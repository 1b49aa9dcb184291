use std::path::Path;
use std::process::Command;

use crate::errors::CovbenchError;

/// Captured result of one external command.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Seam between the benchmark driver and real child processes.
pub trait CommandRunner {
    /// Run `command` with `dir` as the child's working directory.
    ///
    /// With `check` set, a non-zero exit is a `ProcessFailed` error. Without
    /// it the output is returned as-is, so timing-only callers can still
    /// scrape whatever the wrapper wrote.
    fn run(&self, command: &str, dir: &Path, check: bool) -> Result<RunOutput, CovbenchError>;
}

/// Production runner: executes the command under bash's `time` keyword, so
/// the wall-clock report lands on the captured stderr whatever the command
/// writes itself.
///
/// The working directory is scoped to the child process via
/// `Command::current_dir`; the parent process never changes directory.
pub struct TimedRunner;

impl CommandRunner for TimedRunner {
    fn run(&self, command: &str, dir: &Path, check: bool) -> Result<RunOutput, CovbenchError> {
        // Subshell so `time` covers the whole compound command, not just its
        // first step.
        let wrapped = format!("time ( {command} )");

        let output = Command::new("bash")
            .arg("-c")
            .arg(&wrapped)
            .current_dir(dir)
            .output()
            .map_err(|source| CovbenchError::ProcessSpawn {
                command: command.to_string(),
                source,
            })?;

        let exit_code = output.status.code().unwrap_or(-1);

        if check && exit_code != 0 {
            return Err(CovbenchError::ProcessFailed {
                command: command.to_string(),
                code: exit_code,
            });
        }

        Ok(RunOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code,
        })
    }
}
