//! External process invocation
//!
//! Stages describe the commands they need as [`Invocation`] values and hand
//! them to a [`CommandRunner`]. The real runner inherits stdio so generator
//! and compiler output reach the terminal untouched; tests substitute a
//! runner that records invocations instead.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// How a child process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStatus {
    code: Option<i32>,
}

impl ProcessStatus {
    /// Status for a process that exited with `code`
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Status for a process terminated by a signal
    #[must_use]
    pub const fn terminated() -> Self {
        Self { code: None }
    }

    /// Exit code, `None` when terminated by a signal
    #[must_use]
    pub const fn code(self) -> Option<i32> {
        self.code
    }

    #[must_use]
    pub const fn success(self) -> bool {
        matches!(self.code, Some(0))
    }
}

impl From<std::process::ExitStatus> for ProcessStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => f.write_str("termination by signal"),
        }
    }
}

/// One external command: program, arguments and working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    quiet: bool,
}

impl Invocation {
    #[must_use]
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            cwd: None,
            quiet: false,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Discard the child's stdout (stderr is still inherited)
    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub const fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// The command line as a single space-separated string
    #[must_use]
    pub fn command_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Executes invocations and reports how they ended
///
/// `Err` means the process could not be launched at all; a launched process
/// that fails is reported through the returned [`ProcessStatus`].
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<ProcessStatus>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, invocation: &Invocation) -> io::Result<ProcessStatus> {
        (**self).run(invocation)
    }
}

/// Runs invocations as real child processes, blocking until they exit
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<ProcessStatus> {
        crate::debug!("running: {invocation}");

        let mut cmd = Command::new(invocation.program());
        cmd.args(invocation.arguments());
        if let Some(dir) = invocation.cwd() {
            crate::debug!("  in {}", dir.display());
            cmd.current_dir(dir);
        }
        if invocation.is_quiet() {
            cmd.stdout(Stdio::null());
        }

        let status = cmd.status()?;
        crate::debug!("  finished with {}", ProcessStatus::from(status));
        Ok(status.into())
    }
}
