//! Shell-backed process runner
//!
//! Every step runs as `sh -c <command>` with a cleared environment, piped
//! stdout/stderr and a null stdin. The child is killed when its future is
//! dropped, which is how timeouts are enforced.

use async_trait::async_trait;
use runbook_application::{
    InvocationProgress, OutputMode, OutputStream, ProcessError, ProcessOutcome, ProcessRequest,
    ProcessRunner,
};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tracing::debug;

/// Runs commands through a POSIX shell
pub struct ShellProcessRunner {
    shell: PathBuf,
}

impl ShellProcessRunner {
    pub fn new() -> Self {
        Self {
            shell: PathBuf::from("sh"),
        }
    }

    pub fn with_shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.shell = shell.into();
        self
    }

    fn command(&self, request: &ProcessRequest) -> Command {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(&request.command)
            .env_clear()
            .envs(request.env.iter())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(cwd) = &request.cwd {
            cmd.current_dir(cwd);
        }

        // Linux: request kernel to send SIGTERM to child when parent dies.
        // This catches cases where Drop doesn't run (SIGKILL, OOM kill).
        #[cfg(target_os = "linux")]
        unsafe {
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        cmd
    }

    async fn collect(
        child: Child,
        mode: OutputMode,
        progress: &dyn InvocationProgress,
    ) -> Result<ProcessOutcome, ProcessError> {
        match mode {
            OutputMode::Buffered => Self::collect_buffered(child).await,
            OutputMode::Streaming => Self::collect_streaming(child, progress).await,
        }
    }

    async fn collect_buffered(child: Child) -> Result<ProcessOutcome, ProcessError> {
        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ProcessError::Io(e.to_string()))?;

        Ok(ProcessOutcome {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).trim_end().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
        })
    }

    async fn collect_streaming(
        mut child: Child,
        progress: &dyn InvocationProgress,
    ) -> Result<ProcessOutcome, ProcessError> {
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ProcessError::Io("stdout was not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ProcessError::Io("stderr was not captured".to_string()))?;

        // Both pipes must reach EOF before waiting, or a full pipe can block the child
        let (out_lines, err_lines) = tokio::join!(
            drain_lines(stdout, OutputStream::Stdout, progress),
            drain_lines(stderr, OutputStream::Stderr, progress),
        );
        let out_lines = out_lines.map_err(|e| ProcessError::Io(e.to_string()))?;
        let err_lines = err_lines.map_err(|e| ProcessError::Io(e.to_string()))?;

        let status = child
            .wait()
            .await
            .map_err(|e| ProcessError::Io(e.to_string()))?;

        Ok(ProcessOutcome {
            exit_code: status.code(),
            stdout: out_lines.join("\n").trim_end().to_string(),
            stderr: err_lines.join("\n").trim_end().to_string(),
        })
    }
}

impl Default for ShellProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Read `reader` to EOF line by line, reporting and keeping every line
async fn drain_lines<R>(
    reader: R,
    stream: OutputStream,
    progress: &dyn InvocationProgress,
) -> std::io::Result<Vec<String>>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut lines = Vec::new();
    let mut raw = Vec::new();

    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw).await? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&raw)
            .trim_end_matches(['\n', '\r'])
            .to_string();
        progress.on_output_line(stream, &line);
        lines.push(line);
    }

    Ok(lines)
}

#[async_trait]
impl ProcessRunner for ShellProcessRunner {
    async fn run(
        &self,
        request: ProcessRequest,
        progress: &dyn InvocationProgress,
    ) -> Result<ProcessOutcome, ProcessError> {
        let child = self
            .command(&request)
            .spawn()
            .map_err(|e| ProcessError::Spawn(e.to_string()))?;
        debug!("Spawned pid {:?}: {}", child.id(), request.command);

        let collect = Self::collect(child, request.mode, progress);
        match request.timeout {
            // Dropping the future drops the child, which kills it
            Some(limit) => tokio::time::timeout(limit, collect)
                .await
                .map_err(|_| ProcessError::TimedOut(limit))?,
            None => collect.await,
        }
    }
}
