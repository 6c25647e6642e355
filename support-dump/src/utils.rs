use crate::error::{ArchiveTask, CommandSpawn, Result, WriteArtifact};
use async_trait::async_trait;
use snafu::ResultExt;
use std::{fmt, path::Path, process::Stdio};
use tokio::{fs, process::Command, task::JoinHandle};
use tracing::debug;

/// A program and its arguments. Arguments are handed to the program as-is, they are never
/// joined into a shell string on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KubeCommand {
    program: String,
    args: Vec<String>,
}

impl KubeCommand {
    /// Create a command for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        self.program.as_str()
    }

    pub fn arguments(&self) -> &[String] {
        self.args.as_slice()
    }

    /// True if the program followed by the arguments starts with `tokens`.
    pub fn starts_with(&self, tokens: &[&str]) -> bool {
        let mut words = std::iter::once(&self.program).chain(self.args.iter());
        tokens
            .iter()
            .all(|token| words.next().is_some_and(|word| word == token))
    }
}

impl fmt::Display for KubeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// What a finished command left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the command exited with status zero.
    pub success: bool,
    /// The exit code, if the command was not killed by a signal.
    pub exit_code: Option<i32>,
    /// Captured stdout.
    pub stdout: Vec<u8>,
    /// Captured stderr, kept apart so warnings of the CLI never mix into parsed listings.
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Captured stdout followed by captured stderr, as saved in an artifact.
    pub fn combined(&self) -> Vec<u8> {
        let mut combined = Vec::with_capacity(self.stdout.len() + self.stderr.len());
        combined.extend_from_slice(&self.stdout);
        combined.extend_from_slice(&self.stderr);
        combined
    }

    /// The combined output as lossy UTF-8, for log messages.
    pub fn output_lossy(&self) -> String {
        String::from_utf8_lossy(&self.combined()).trim_end().to_string()
    }
}

/// Runs commands to completion. A command which could not be launched is an error, a command
/// which ran and failed is an `Ok` with `success == false`.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &KubeCommand) -> Result<CommandOutput>;
}

/// Runs commands as child processes of this process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &KubeCommand) -> Result<CommandOutput> {
        debug!(%command, "Running command");
        let output = Command::new(command.program())
            .args(command.arguments())
            .stdin(Stdio::null())
            .output()
            .await
            .context(CommandSpawn {
                command: command.to_string(),
            })?;

        Ok(CommandOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Write a collected artifact, replacing any previous content.
pub async fn write_artifact(path: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
    fs::write(path.as_ref(), contents)
        .await
        .context(WriteArtifact {
            path: path.as_ref().to_path_buf(),
        })
}

/// Flatten join errors and blocking task errors.
pub async fn joined_flatten<T>(handle: JoinHandle<Result<T>>) -> Result<T> {
    match handle.await.context(ArchiveTask) {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(err)) => Err(err),
        Err(err) => Err(err),
    }
}
