use async_trait::async_trait;
use console::style;
use nix::sys::signal::Signal;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command as TokioCommand;
use tokio::time;
use tracing::{debug, info, warn};

/// Outcome of one external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    /// Exit code, or the negated signal number if the child was killed
    pub retcode: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessResult {
    pub fn new(retcode: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            retcode,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.retcode == 0
    }

    /// Non-empty lines of stdout, e.g. the entries printed by `ls`
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines().map(str::trim_end).filter(|l| !l.is_empty())
    }
}

/// How a command should be run and judged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Fail when the command exits non-zero
    pub expect_zero: bool,
    pub timeout: Option<Duration>,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            expect_zero: true,
            timeout: None,
        }
    }
}

impl ExecuteOptions {
    pub fn expect_zero(expect_zero: bool) -> Self {
        Self {
            expect_zero,
            ..Default::default()
        }
    }
}

/// Errors raised while running an external command
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Refusing to execute an empty command")]
    EmptyCommand,

    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command `{command}` exited with code {retcode}: {stderr}")]
    NonZeroExit {
        command: String,
        retcode: i32,
        stderr: String,
    },

    #[error("Command `{command}` timed out after {timeout:?}")]
    TimedOut { command: String, timeout: Duration },
}

pub type ExecResult<T> = Result<T, ExecutionError>;

/// Render an argument list the way a shell user would type it
pub fn render_command(argv: &[String]) -> String {
    argv.join(" ")
}

/// Human readable form of a return code, naming the signal for killed children
pub fn describe_retcode(retcode: i32) -> String {
    if retcode < 0 {
        if let Ok(signal) = Signal::try_from(-retcode) {
            return format!("killed by {}", signal.as_str());
        }
    }
    format!("exit code {}", retcode)
}

fn retcode_from_status(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}

/// Apply the `expect_zero` contract to a finished command
pub fn check_result(
    argv: &[String],
    result: ProcessResult,
    options: ExecuteOptions,
) -> ExecResult<ProcessResult> {
    if result.success() || !options.expect_zero {
        return Ok(result);
    }
    warn!(
        command = %render_command(argv),
        status = %describe_retcode(result.retcode),
        "Command exited unsuccessfully"
    );
    Err(ExecutionError::NonZeroExit {
        command: render_command(argv),
        retcode: result.retcode,
        stderr: result.stderr,
    })
}

/// Abstraction for command execution to enable testing without real commands
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `argv[0]` with the remaining arguments and wait for it to finish
    async fn execute(&self, argv: &[String], options: ExecuteOptions)
    -> ExecResult<ProcessResult>;
}

/// Real command executor using tokio::process::Command
pub struct RealCommandExecutor;

#[async_trait]
impl CommandExecutor for RealCommandExecutor {
    async fn execute(
        &self,
        argv: &[String],
        options: ExecuteOptions,
    ) -> ExecResult<ProcessResult> {
        let (program, args) = argv.split_first().ok_or(ExecutionError::EmptyCommand)?;
        let command = render_command(argv);
        debug!(command = %command, expect_zero = options.expect_zero, "Executing");

        let mut child = TokioCommand::new(program);
        child
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match options.timeout {
            Some(timeout) => time::timeout(timeout, child.output())
                .await
                .map_err(|_| ExecutionError::TimedOut {
                    command: command.clone(),
                    timeout,
                })?,
            None => child.output().await,
        }
        .map_err(|source| ExecutionError::Spawn {
            command: command.clone(),
            source,
        })?;

        let result = ProcessResult::new(
            retcode_from_status(output.status),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
        debug!(command = %command, retcode = result.retcode, "Finished");
        check_result(argv, result, options)
    }
}

/// Command executor that prints what would run and reports success
pub struct DryRunCommandExecutor;

#[async_trait]
impl CommandExecutor for DryRunCommandExecutor {
    async fn execute(
        &self,
        argv: &[String],
        options: ExecuteOptions,
    ) -> ExecResult<ProcessResult> {
        if argv.is_empty() {
            return Err(ExecutionError::EmptyCommand);
        }
        let command = render_command(argv);
        info!(command = %command, "Dry run, not executing");
        println!("{} {}", style("[dry-run]").dim(), command);
        check_result(argv, ProcessResult::new(0, "", ""), options)
    }
}
