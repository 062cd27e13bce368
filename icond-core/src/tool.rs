//! Spawning the external programs the pipeline delegates to (esbuild, tsc, npm, git).

use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::error::ToolError;

fn command<I, S>(program: &str, args: I, cwd: Option<&Path>) -> Command
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    cmd
}

fn launch_error(program: &str, e: std::io::Error) -> ToolError {
    if e.kind() == ErrorKind::NotFound {
        error!(program, "Tool not found on PATH");
        ToolError::NotFound {
            program: program.to_string(),
        }
    } else {
        error!(program, error = ?e, "Failed to launch tool");
        ToolError::Launch {
            program: program.to_string(),
            source: e,
        }
    }
}

/// Runs `program` to completion, capturing its output, and returns stdout.
pub async fn capture<I, S>(program: &str, args: I, cwd: Option<&Path>) -> Result<String, ToolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = command(program, args, cwd)
        .output()
        .await
        .map_err(|e| launch_error(program, e))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        error!(program, status = %output.status, stderr = %stderr, "Tool exited with non-zero code");
        return Err(ToolError::Failed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr,
        });
    }
    debug!(program, "Tool finished");
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Runs `program` with inherited stdio, so its own progress output reaches the user.
pub async fn run_inherited<I, S>(program: &str, args: I, cwd: Option<&Path>) -> Result<(), ToolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let status = command(program, args, cwd)
        .status()
        .await
        .map_err(|e| launch_error(program, e))?;
    if status.success() {
        info!(program, status = ?status, "Tool finished");
        Ok(())
    } else {
        error!(program, status = %status, "Tool exited with non-zero code");
        Err(ToolError::Failed {
            program: program.to_string(),
            status: status.to_string(),
            stderr: String::new(),
        })
    }
}
