use crate::{
    error::{ClusterUnreachable, KubeCliNotFound, Result},
    utils::{CommandRunner, KubeCommand},
};
use snafu::ensure;
use std::fmt;
use tracing::{debug, info};

/// The kubernetes command line tools the dump can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KubeCli {
    /// The OpenShift CLI.
    Oc,
    /// The upstream kubernetes CLI.
    Kubectl,
}

impl KubeCli {
    /// Probe order, the first one found wins.
    pub const PREFERENCE: [KubeCli; 2] = [KubeCli::Oc, KubeCli::Kubectl];

    /// Name of the binary on the PATH.
    pub fn binary(&self) -> &'static str {
        match self {
            KubeCli::Oc => "oc",
            KubeCli::Kubectl => "kubectl",
        }
    }

    /// True for the OpenShift CLI.
    pub fn is_openshift(&self) -> bool {
        matches!(self, KubeCli::Oc)
    }

    /// A new command invoking this CLI.
    pub fn command(&self) -> KubeCommand {
        KubeCommand::new(self.binary())
    }

    /// The cheap call which fails when the cluster is unreachable or the session is
    /// unauthenticated.
    pub fn access_probe(&self) -> KubeCommand {
        match self {
            KubeCli::Oc => self.command().arg("whoami"),
            KubeCli::Kubectl => self.command().arg("cluster-info"),
        }
    }
}

impl fmt::Display for KubeCli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

/// Pick the kubernetes CLI to use, preferring `oc` over `kubectl`.
pub async fn resolve_kube_cli(runner: &dyn CommandRunner) -> Result<KubeCli> {
    for cli in KubeCli::PREFERENCE {
        let probe = KubeCommand::new("which").arg(cli.binary());
        match runner.run(&probe).await {
            Ok(output) if output.success => {
                debug!(cli = cli.binary(), "Found kubernetes CLI");
                return Ok(cli);
            }
            Ok(_) => debug!(cli = cli.binary(), "Kubernetes CLI not on PATH"),
            Err(error) => debug!(cli = cli.binary(), %error, "Failed to look up kubernetes CLI"),
        }
    }
    KubeCliNotFound.fail()
}

/// Make sure the resolved CLI can talk to the cluster before anything is collected.
pub async fn check_cluster_access(runner: &dyn CommandRunner, cli: KubeCli) -> Result<()> {
    let probe = cli.access_probe();
    let output = runner.run(&probe).await?;
    ensure!(
        output.success,
        ClusterUnreachable {
            command: probe.to_string(),
            output: output.output_lossy(),
        }
    );
    info!(cli = cli.binary(), "Connected to kubernetes cluster");
    Ok(())
}
