//! A [`CommandRunner`] answering from a script, for tests.

use crate::{
    config::DumpConfig,
    error::{Error, Result},
    kube_cli::KubeCli,
    utils::{CommandOutput, CommandRunner, KubeCommand},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::{path::PathBuf, sync::Mutex};

#[derive(Debug, Clone)]
enum Reply {
    Exit {
        success: bool,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
    },
    Unlaunchable,
}

/// Answers each command with the reply of the first rule whose tokens prefix it. Commands
/// matching no rule fail with a non-zero exit. Every command received is recorded.
#[derive(Debug, Default)]
pub(crate) struct ScriptedRunner {
    rules: Vec<(Vec<String>, Reply)>,
    calls: Mutex<Vec<KubeCommand>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn rule(mut self, tokens: &[&str], reply: Reply) -> Self {
        self.rules
            .push((tokens.iter().map(|t| t.to_string()).collect(), reply));
        self
    }

    /// Succeed, printing `output` on stdout.
    pub(crate) fn ok(self, tokens: &[&str], output: impl AsRef<[u8]>) -> Self {
        self.ok_with_stderr(tokens, output, "")
    }

    /// Succeed, printing on both streams.
    pub(crate) fn ok_with_stderr(
        self,
        tokens: &[&str],
        stdout: impl AsRef<[u8]>,
        stderr: impl AsRef<[u8]>,
    ) -> Self {
        self.rule(
            tokens,
            Reply::Exit {
                success: true,
                stdout: stdout.as_ref().to_vec(),
                stderr: stderr.as_ref().to_vec(),
            },
        )
    }

    /// Exit with 1, printing `output` on stderr.
    pub(crate) fn fail(self, tokens: &[&str], output: impl AsRef<[u8]>) -> Self {
        self.rule(
            tokens,
            Reply::Exit {
                success: false,
                stdout: Vec::new(),
                stderr: output.as_ref().to_vec(),
            },
        )
    }

    pub(crate) fn unlaunchable(self, tokens: &[&str]) -> Self {
        self.rule(tokens, Reply::Unlaunchable)
    }

    pub(crate) fn calls(&self) -> Vec<KubeCommand> {
        self.calls.lock().unwrap().clone()
    }

    /// Rendered commands, handy for `contains` assertions.
    pub(crate) fn call_lines(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, command: &KubeCommand) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(command.clone());

        let reply = self
            .rules
            .iter()
            .find(|(tokens, _)| {
                let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();
                command.starts_with(&tokens)
            })
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::Exit {
                success,
                stdout,
                stderr,
            }) => Ok(CommandOutput {
                success,
                exit_code: Some(if success { 0 } else { 1 }),
                stdout,
                stderr,
            }),
            Some(Reply::Unlaunchable) => Err(Error::CommandSpawn {
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
                command: command.to_string(),
            }),
            None => Ok(CommandOutput {
                success: false,
                exit_code: Some(1),
                stdout: Vec::new(),
                stderr: format!("unscripted command: {command}").into_bytes(),
            }),
        }
    }
}

/// Settings for namespace `pgdb` started at a fixed time.
pub(crate) fn test_config(kube_cli: KubeCli, output_root: impl Into<PathBuf>) -> DumpConfig {
    let started_at = NaiveDate::from_ymd_opt(2020, 3, 7)
        .and_then(|date| date.and_hms_opt(12, 30, 0))
        .unwrap();
    DumpConfig::new("pgdb", output_root, kube_cli, started_at).unwrap()
}
