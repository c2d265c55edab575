//! Bounded process execution
//!
//! Runs one [`CommandSpec`] with its timeout. On unix the child leads its own
//! process group so a timeout can take down anything it forked.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
#[cfg(unix)]
use nix::sys::signal::Signal;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::commands::CommandSpec;
use crate::error::{Result, RunnerError};
use crate::outcome::ExecutionOutcome;

/// Time a timed out group gets between SIGTERM and SIGKILL
const KILL_GRACE: Duration = Duration::from_secs(2);

/// Time output pipes may stay open after the child itself has exited
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Upper bound on waiting for anything after SIGKILL
const REAP_TIMEOUT: Duration = Duration::from_secs(5);

type PipeTask = JoinHandle<std::io::Result<Vec<u8>>>;

/// Something that can run a [`CommandSpec`] to completion
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, spec: &CommandSpec) -> ExecutionOutcome;
}

/// Executes commands as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn execute(&self, spec: &CommandSpec) -> ExecutionOutcome {
        execute(spec).await
    }
}

enum Finished {
    Exited {
        status: ExitStatus,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
    },
    TimedOut,
}

/// Spawn `spec`, wait for it within its timeout and classify the result.
///
/// Never returns an error: spawn and IO failures become
/// [`ExecutionOutcome::ExecutionFailed`] without an exit code.
pub async fn execute(spec: &CommandSpec) -> ExecutionOutcome {
    match run_bounded(spec).await {
        Ok(Finished::Exited {
            status,
            stdout,
            stderr,
        }) => {
            let stdout = String::from_utf8_lossy(&stdout).into_owned();
            let stderr = String::from_utf8_lossy(&stderr).into_owned();

            debug!(program = %spec.program, code = ?status.code(), "command exited");

            if status.success() {
                ExecutionOutcome::Success { stdout, stderr }
            } else {
                ExecutionOutcome::ExecutionFailed {
                    stderr,
                    exit_code: status.code(),
                }
            }
        }
        Ok(Finished::TimedOut) => {
            warn!(
                program = %spec.program,
                timeout = ?spec.timeout,
                "command timed out and was killed"
            );
            ExecutionOutcome::TimedOut {
                after: spec.timeout,
            }
        }
        Err(e) => {
            warn!(program = %spec.program, error = %e, "command could not be run");
            ExecutionOutcome::ExecutionFailed {
                stderr: e.to_string(),
                exit_code: None,
            }
        }
    }
}

async fn run_bounded(spec: &CommandSpec) -> Result<Finished> {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(dir) = &spec.current_dir {
        cmd.current_dir(dir);
    }

    #[cfg(unix)]
    cmd.process_group(0);

    debug!(argv = ?spec.argv(), cwd = ?spec.current_dir, "spawning command");

    let mut child = cmd
        .spawn()
        .map_err(|e| RunnerError::spawn_failed(&spec.program, e))?;

    // The group id outlives the leader, so keep it for after wait().
    let pgid = child.id();

    // Drained on their own tasks so a chatty child cannot block on a full
    // pipe buffer while we wait for it.
    let stdout = tokio::spawn(read_all(child.stdout.take()));
    let stderr = tokio::spawn(read_all(child.stderr.take()));

    match tokio::time::timeout(spec.timeout, child.wait()).await {
        Ok(status) => {
            let status = status?;
            let (stdout, stderr) = drain_pipes(pgid, stdout, stderr).await?;
            Ok(Finished::Exited {
                status,
                stdout,
                stderr,
            })
        }
        Err(_) => {
            terminate(&mut child).await;
            stdout.abort();
            stderr.abort();
            Ok(Finished::TimedOut)
        }
    }
}

async fn read_all<R: AsyncRead + Unpin>(pipe: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

async fn join_pipe(task: PipeTask) -> std::io::Result<Vec<u8>> {
    task.await.map_err(std::io::Error::other)?
}

/// Collect output once the child has exited.
///
/// Background descendants can keep a pipe open long after the child is gone.
/// Whatever still holds one after [`DRAIN_GRACE`] is killed with the rest of
/// the group, which closes the pipes and ends the reads.
async fn drain_pipes(
    pgid: Option<u32>,
    stdout: PipeTask,
    stderr: PipeTask,
) -> Result<(Vec<u8>, Vec<u8>)> {
    let aborts = [stdout.abort_handle(), stderr.abort_handle()];
    let mut both = Box::pin(async move { tokio::try_join!(join_pipe(stdout), join_pipe(stderr)) });

    if let Ok(result) = tokio::time::timeout(DRAIN_GRACE, &mut both).await {
        return Ok(result?);
    }

    debug!(?pgid, "descendants still hold output pipes, killing leftover group");
    #[cfg(unix)]
    if let Some(pid) = pgid {
        signal_group(pid, Signal::SIGKILL);
    }

    match tokio::time::timeout(REAP_TIMEOUT, both).await {
        Ok(result) => Ok(result?),
        Err(_) => {
            warn!(?pgid, "output pipes still open after killing the group");
            aborts.iter().for_each(|handle| handle.abort());
            Ok((Vec::new(), Vec::new()))
        }
    }
}

/// Stop a timed out child and everything it started.
///
/// The group gets SIGTERM first so a `sudo` leader can relay it to a command
/// running as another user, then SIGKILL after [`KILL_GRACE`]. Every wait is
/// bounded.
async fn terminate(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        signal_group(pid, Signal::SIGTERM);
        if tokio::time::timeout(KILL_GRACE, child.wait()).await.is_err() {
            debug!(pid, "group ignored SIGTERM");
        }
        signal_group(pid, Signal::SIGKILL);
    }

    // Errors here mean the child already exited; wait() still reaps it.
    let _ = child.start_kill();
    match tokio::time::timeout(REAP_TIMEOUT, child.wait()).await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => warn!(error = %e, "failed to reap timed out child"),
        Err(_) => warn!("timed out child did not exit after SIGKILL"),
    }
}

#[cfg(unix)]
fn signal_group(pid: u32, signal: Signal) {
    use nix::errno::Errno;
    use nix::sys::signal::killpg;
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return;
    };

    match killpg(Pid::from_raw(raw), signal) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(errno) => warn!(pid, %errno, ?signal, "failed to signal process group"),
    }
}
