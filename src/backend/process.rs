// Subprocess plumbing shared by the backends

use std::process::{Output, Stdio};
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use crate::errors::ResolveError;

/// Run a command capturing stdout/stderr, killing the child on timeout
pub(crate) async fn run_with_timeout(
    program: &str,
    args: Vec<String>,
    timeout_secs: u64,
) -> Result<Output, ResolveError> {
    let mut child = Command::new(program)
        .args(&args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ResolveError::Execution(format!("failed to start {}: {}", program, e)))?;

    let mut stdout_pipe = child.stdout.take().ok_or_else(|| {
        ResolveError::Execution(format!("failed to capture stdout from {}", program))
    })?;
    let mut stderr_pipe = child.stderr.take().ok_or_else(|| {
        ResolveError::Execution(format!("failed to capture stderr from {}", program))
    })?;

    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stdout_pipe.read_to_end(&mut buf).await.map(|_| buf)
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stderr_pipe.read_to_end(&mut buf).await.map(|_| buf)
    });

    match timeout(Duration::from_secs(timeout_secs), child.wait()).await {
        Ok(status_res) => {
            let status = status_res.map_err(|e| {
                ResolveError::Execution(format!("failed to wait for {}: {}", program, e))
            })?;
            let stdout = stdout_task
                .await
                .map_err(|e| ResolveError::Execution(format!("stdout task failed: {}", e)))?
                .map_err(|e| ResolveError::Execution(format!("failed to read stdout: {}", e)))?;
            let stderr = stderr_task
                .await
                .map_err(|e| ResolveError::Execution(format!("stderr task failed: {}", e)))?
                .map_err(|e| ResolveError::Execution(format!("failed to read stderr: {}", e)))?;
            Ok(Output {
                status,
                stdout,
                stderr,
            })
        }
        Err(_) => {
            let _ = child.kill().await;
            stdout_task.abort();
            stderr_task.abort();
            Err(ResolveError::Execution(format!(
                "{} timed out after {}s",
                program, timeout_secs
            )))
        }
    }
}
