//! Display process control
//!
//! Launches the external display program for one media item and exposes its
//! input stream for control bytes. The program is executed directly from the
//! profile's argv template (no shell), with the media path as last argument.
//!
//! Termination is a request: on Unix the process receives SIGTERM so it can
//! act on a quit byte already written and restore the screen. SIGKILL is
//! only used when the request cannot be delivered, or when the handle is
//! dropped.

use crate::error::{Error, Result};
use crate::media::{MediaItem, MediaProfile};
use std::io;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin};
use tracing::{debug, info, warn};

/// A running display program
///
/// Killed on drop, so a supervision loop that is torn down never leaves an
/// orphaned player on screen.
#[derive(Debug)]
pub struct DisplayProcess {
    child: Child,
    input: Option<ControlInput>,
}

impl DisplayProcess {
    /// Launch the profile's display program for `item`
    pub fn spawn(profile: &MediaProfile, item: &MediaItem) -> Result<Self> {
        info!("exec: {} '{}'", profile.command, item);

        let mut child = tokio::process::Command::new(profile.command.program())
            .args(profile.command.args())
            .arg(item.path())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::Launch {
                program: profile.command.program().to_string(),
                source,
            })?;

        let pid = child.id().unwrap_or_default();
        if let Some(stdout) = child.stdout.take() {
            forward_output(pid, "stdout", stdout);
        }
        if let Some(stderr) = child.stderr.take() {
            forward_output(pid, "stderr", stderr);
        }
        let input = child.stdin.take().map(|stdin| ControlInput { stdin });

        Ok(Self { child, input })
    }

    /// Take the input stream so it can be written while [`wait`](Self::wait) is pending
    pub fn take_input(&mut self) -> Option<ControlInput> {
        self.input.take()
    }

    /// Wait for the process to exit
    ///
    /// Cancel-safe. The input stream must have been taken beforehand:
    /// waiting closes any stdin still held by the child handle, which most
    /// players read as a request to quit.
    pub async fn wait(&mut self) -> io::Result<ExitStatus> {
        self.child.wait().await
    }

    /// Request termination
    ///
    /// Terminating a process that already exited is a no-op. Falls back to
    /// killing when the request cannot be sent.
    pub fn terminate(&mut self) {
        if let Err(e) = request_exit(&mut self.child) {
            warn!("Failed to request exit ({}), killing", e);
            if let Err(e) = self.child.start_kill() {
                info!("process missing when killing: {}", e);
            }
        }
    }
}

/// Send SIGTERM; a process that is already gone counts as success
#[cfg(unix)]
fn request_exit(child: &mut Child) -> io::Result<()> {
    // Reaped already
    let Some(pid) = child.id() else {
        return Ok(());
    };
    let pid = libc::pid_t::try_from(pid)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // SAFETY: kill(2) takes plain integers and touches no memory of ours
    if unsafe { libc::kill(pid, libc::SIGTERM) } == 0 {
        return Ok(());
    }

    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        info!("process missing when terminating: {}", err);
        return Ok(());
    }
    Err(err)
}

#[cfg(not(unix))]
fn request_exit(child: &mut Child) -> io::Result<()> {
    child.start_kill()
}

/// Writable control stream of a display process
#[derive(Debug)]
pub struct ControlInput {
    stdin: ChildStdin,
}

impl ControlInput {
    /// Write one control byte
    ///
    /// Fails with `BrokenPipe` once the process has exited.
    pub async fn send(&mut self, byte: u8) -> io::Result<()> {
        self.stdin.write_all(&[byte]).await?;
        self.stdin.flush().await
    }
}

/// Drain a child output pipe into the log so the child never blocks on a full pipe
fn forward_output<R>(pid: u32, stream: &'static str, reader: R)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut line = Vec::new();
        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line).await {
                Ok(0) => break,
                Ok(_) => {
                    let text = String::from_utf8_lossy(&line);
                    debug!(pid, stream, "{}", text.trim_end());
                }
                Err(e) => {
                    debug!(pid, stream, "output closed: {}", e);
                    break;
                }
            }
        }
    });
}
