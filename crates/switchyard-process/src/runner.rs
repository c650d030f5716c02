use std::ffi::OsString;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;
use wait_timeout::ChildExt;

use crate::error::ProcessError;
use crate::handle::{ProcessHandle, SharedChild};

/// How often a spawned child is checked for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Captured output of a process that exited successfully.
///
/// Both streams are trimmed of surrounding whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessResult {
    stdout: String,
    stderr: String,
}

impl ProcessResult {
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    pub fn into_stdout(self) -> String {
        self.stdout
    }
}

/// Builder for one external process invocation.
///
/// Standard input is closed; standard output and standard error are
/// captured.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    executable: String,
    args: Vec<String>,
    envs: Vec<(OsString, OsString)>,
    clear_env: bool,
    current_dir: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// Runs `executable`. A name without `/` is looked up on `PATH`.
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            args: Vec::new(),
            envs: Vec::new(),
            clear_env: false,
            current_dir: None,
            timeout: None,
        }
    }

    /// Splits `line` with shell quoting rules; the first word is the
    /// executable.
    ///
    /// ```
    /// use switchyard_process::ProcessRunner;
    ///
    /// let runner = ProcessRunner::from_line("grep -e 'two words' notes.txt").unwrap();
    /// assert_eq!(runner.executable(), "grep");
    /// assert_eq!(runner.arguments(), &["-e", "two words", "notes.txt"]);
    /// ```
    pub fn from_line(line: &str) -> Result<Self, ProcessError> {
        let mut words = shell_words::split(line)?.into_iter();
        let executable = words.next().ok_or(ProcessError::InvalidLaunchPath)?;
        Ok(Self::new(executable).args(words))
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        self.envs
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Starts the process with only the variables set through
    /// [`env`](Self::env) and [`envs`](Self::envs).
    pub fn env_clear(mut self) -> Self {
        self.clear_env = true;
        self
    }

    /// Working directory of the process. Relative executable paths are
    /// resolved against it too.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Kills the process when it runs longer than `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// The invocation as a single shell-quoted line, for messages.
    pub fn command_line(&self) -> String {
        shell_words::join(std::iter::once(&self.executable).chain(&self.args))
    }

    /// Locates the executable and checks that it can be launched.
    pub fn resolve(&self) -> Result<PathBuf, ProcessError> {
        if self.executable.is_empty() {
            return Err(ProcessError::InvalidLaunchPath);
        }

        let path = if self.executable.contains('/') {
            let path = PathBuf::from(&self.executable);
            match &self.current_dir {
                Some(dir) if path.is_relative() => dir.join(path),
                _ => path,
            }
        } else {
            let cwd = match &self.current_dir {
                Some(dir) => dir.clone(),
                None => std::env::current_dir()?,
            };
            which::which_in(&self.executable, self.search_path(), cwd)
                .map_err(|_| ProcessError::FileNotFound(PathBuf::from(&self.executable)))?
        };

        if !path.exists() {
            return Err(ProcessError::FileNotFound(path));
        }
        if !is_executable(&path) {
            return Err(ProcessError::NotExecutable(path));
        }
        Ok(path)
    }

    fn search_path(&self) -> Option<OsString> {
        let configured = self
            .envs
            .iter()
            .rev()
            .find(|(key, _)| key == "PATH")
            .map(|(_, value)| value.clone());

        match configured {
            Some(path) => Some(path),
            None if self.clear_env => None,
            None => std::env::var_os("PATH"),
        }
    }

    fn launch(&self) -> Result<Child, ProcessError> {
        let path = self.resolve()?;

        let mut command = Command::new(&path);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if self.clear_env {
            command.env_clear();
        }
        command.envs(self.envs.iter().map(|(key, value)| (key, value)));

        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        debug!(executable = %path.display(), args = ?self.args, "launching process");
        Ok(command.spawn()?)
    }

    /// Runs the process to completion.
    ///
    /// A non-zero exit becomes [`ProcessError::UnsuccessfulExit`].
    pub fn run(&self) -> Result<ProcessResult, ProcessError> {
        let mut child = self.launch()?;
        let capture = Capture::start(&mut child);
        let label = self.command_line();

        let status = match self.timeout {
            Some(limit) => match child.wait_timeout(limit)? {
                Some(status) => status,
                None => {
                    child.kill()?;
                    child.wait()?;
                    return Err(timed_out(&label, limit));
                }
            },
            None => child.wait()?,
        };
        debug!(command = %label, %status, "process exited");
        capture.finish(status)
    }

    /// Starts the process without waiting for it.
    ///
    /// [`ProcessHandle::wait`] returns the same result [`run`](Self::run)
    /// would have.
    pub fn spawn(&self) -> Result<ProcessHandle, ProcessError> {
        self.spawn_with(|outcome| outcome)
    }

    /// Starts the process and hands its result to `on_exit` on a background
    /// thread once it finishes.
    ///
    /// [`ProcessHandle::wait`] returns whatever `on_exit` returned.
    pub fn spawn_with<F, T>(&self, on_exit: F) -> Result<ProcessHandle<T>, ProcessError>
    where
        F: FnOnce(Result<ProcessResult, ProcessError>) -> T + Send + 'static,
        T: Send + 'static,
    {
        let mut child = self.launch()?;
        let pid = child.id();
        let capture = Capture::start(&mut child);
        let shared = Arc::new(SharedChild::new(child));

        let watched = Arc::clone(&shared);
        let timeout = self.timeout;
        let label = self.command_line();
        let waiter = thread::Builder::new()
            .name(format!("process-{}", pid))
            .spawn(move || {
                let outcome = watch(&watched, timeout, &label).and_then(|status| {
                    debug!(command = %label, %status, "process exited");
                    capture.finish(status)
                });
                on_exit(outcome)
            })?;

        Ok(ProcessHandle::new(pid, shared, waiter))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Reads a pipe to the end on its own thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<io::Result<String>> {
    thread::spawn(move || {
        let mut bytes = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut bytes)?;
        }
        Ok(String::from_utf8_lossy(&bytes).trim().to_string())
    })
}

fn join_reader(reader: JoinHandle<io::Result<String>>) -> Result<String, ProcessError> {
    match reader.join() {
        Ok(text) => Ok(text?),
        Err(_) => Err(io::Error::other("output reader panicked").into()),
    }
}

fn timed_out(label: &str, limit: Duration) -> ProcessError {
    debug!(command = label, ?limit, "process timed out");
    ProcessError::Timeout(label.to_string(), limit)
}

/// Output of a running child, read on background threads.
struct Capture {
    stdout: JoinHandle<io::Result<String>>,
    stderr: JoinHandle<io::Result<String>>,
}

impl Capture {
    fn start(child: &mut Child) -> Self {
        Self {
            stdout: drain(child.stdout.take()),
            stderr: drain(child.stderr.take()),
        }
    }

    fn finish(self, status: ExitStatus) -> Result<ProcessResult, ProcessError> {
        let stdout = join_reader(self.stdout)?;
        let stderr = join_reader(self.stderr)?;

        if !status.success() {
            let reason = [&stderr, &stdout]
                .into_iter()
                .find(|text| !text.is_empty())
                .cloned();
            return Err(ProcessError::UnsuccessfulExit {
                code: status.code(),
                reason,
            });
        }

        Ok(ProcessResult { stdout, stderr })
    }
}

/// Waits for a spawned child, killing it once `timeout` has passed.
///
/// Every path that ends the wait, including a failed `try_wait`, marks the
/// child finished under the same lock, so no signal can follow.
fn watch(
    shared: &SharedChild,
    timeout: Option<Duration>,
    label: &str,
) -> Result<ExitStatus, ProcessError> {
    let started = Instant::now();

    loop {
        let mut state = shared.lock();
        let ended = match state.child.try_wait() {
            Ok(Some(status)) => Some(Ok(status)),
            Ok(None) => match timeout {
                Some(limit) if started.elapsed() >= limit => {
                    let killed = state.child.kill().and_then(|()| state.child.wait());
                    Some(match killed {
                        Ok(_) => Err(timed_out(label, limit)),
                        Err(err) => Err(err.into()),
                    })
                }
                _ => None,
            },
            Err(err) => Some(Err(err.into())),
        };

        if let Some(outcome) = ended {
            state.finished = true;
            return outcome;
        }
        drop(state);
        thread::sleep(POLL_INTERVAL);
    }
}
