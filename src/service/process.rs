use std::ffi::OsStr;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::HarnessError;

/// How long to wait for the output readers to reach EOF once the child is gone
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Combined stdout/stderr of the service, in arrival order
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    inner: Arc<Mutex<String>>,
}

impl LogBuffer {
    pub fn push_line(&self, line: &str) {
        let mut buf = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        buf.push_str(line);
        buf.push('\n');
    }

    pub fn contents(&self) -> String {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).is_empty()
    }
}

/// The service under test running as a child process.
///
/// The child is killed when this value is dropped, so every exit path of the
/// harness releases it.
pub struct ServiceProcess {
    program: String,
    child: Child,
    log: LogBuffer,
    readers: Vec<JoinHandle<()>>,
}

impl ServiceProcess {
    /// Start `<program> -c <config_path>`
    pub fn spawn(program: &Path, config_path: &Path) -> Result<Self, HarnessError> {
        info!("Starting WebSentry service");
        Self::spawn_command(program, [OsStr::new("-c"), config_path.as_os_str()])
    }

    /// Start an arbitrary command with its output captured
    pub fn spawn_command<I, S>(program: impl AsRef<OsStr>, args: I) -> Result<Self, HarnessError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let program_name = program.as_ref().to_string_lossy().into_owned();

        let mut child = Command::new(program.as_ref())
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| HarnessError::Spawn {
                program: program_name.clone(),
                source,
            })?;

        let log = LogBuffer::default();
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(tokio::spawn(collect_lines(stdout, log.clone())));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(tokio::spawn(collect_lines(stderr, log.clone())));
        }

        debug!(program = %program_name, pid = ?child.id(), "Spawned service process");

        Ok(Self {
            program: program_name,
            child,
            log,
            readers,
        })
    }

    /// Exit status if the process has already terminated; never blocks
    pub fn has_exited(&mut self) -> Result<Option<ExitStatus>, HarnessError> {
        Ok(self.child.try_wait()?)
    }

    /// Kill the process (if still running) and reap it
    pub async fn terminate(&mut self) -> Result<(), HarnessError> {
        if let Some(status) = self.child.try_wait()? {
            debug!(%status, "Service already exited");
            return Ok(());
        }

        self.child.kill().await?;
        info!(program = %self.program, "Terminated service process");
        Ok(())
    }

    /// Wait for the output readers to finish and return the full log.
    ///
    /// Only meaningful after the process has exited; readers still blocked
    /// after `DRAIN_TIMEOUT` are abandoned.
    pub async fn drain_log(&mut self) -> String {
        for reader in self.readers.drain(..) {
            match tokio::time::timeout(DRAIN_TIMEOUT, reader).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Log reader task failed: {}", e),
                Err(_) => warn!("Timed out draining service output"),
            }
        }
        self.log.contents()
    }
}

async fn collect_lines<R>(stream: R, log: LogBuffer)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(stream).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => log.push_line(&line),
            Ok(None) => break,
            Err(e) => {
                debug!("Stopped reading service output: {}", e);
                break;
            }
        }
    }
}
