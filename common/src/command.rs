//! Command execution utilities
//!
//! Provides consistent command execution with proper error handling and logging.

use anyhow::{anyhow, Context, Result};
use std::process::{Command, Stdio};
use tracing::debug;

/// Result of a command execution.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

/// Run a command and return its output.
///
/// This is a low-level function that returns both stdout and stderr.
/// Use `run_checked` if you want to treat non-zero exit as an error.
pub fn run(cmd: &str, args: &[&str]) -> Result<CommandOutput> {
    debug!(cmd = %cmd, args = ?args, "Running command");

    let output = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .context(format!("Failed to execute {}", cmd))?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        success: output.status.success(),
        code: output.status.code(),
    })
}

/// Run a command and return stdout if successful, error otherwise.
///
/// # Example
/// ```ignore
/// let uname = run_checked("uname", &["-m"])?;
/// ```
pub fn run_checked(cmd: &str, args: &[&str]) -> Result<String> {
    let output = run(cmd, args)?;
    if output.success {
        Ok(output.stdout)
    } else {
        let code = output
            .code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        Err(anyhow!("{} failed (exit {}): {}", cmd, code, output.stderr))
    }
}

/// Read a single kernel value by name.
///
/// # Example
/// ```ignore
/// let machine = sysctl("hw.machine")?;
/// ```
pub fn sysctl(name: &str) -> Result<String> {
    run_checked("sysctl", &["-n", name])
}
