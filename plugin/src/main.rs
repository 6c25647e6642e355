use crate::cli_utils::supportability::DumpArgs;
use crate::constants::{codes, BANNER_NOTE, BANNER_TITLE};

use anyhow::Context;
use clap::Parser;
use support_dump::SystemRunner;
use tracing::error;

pub(crate) mod cli_utils;
pub mod console_logger;
pub mod constants;

#[derive(Parser, Debug)]
#[clap(name = "crunchy-support-dump", version, about = "Crunchy support dump collector")]
struct CliArgs {
    #[clap(flatten)]
    dump: DumpArgs,

    /// Log debug output, unless RUST_LOG says otherwise.
    #[clap(long, short = 'v')]
    verbose: bool,
}

impl CliArgs {
    async fn execute(&self) -> anyhow::Result<()> {
        self.dump
            .execute(&SystemRunner)
            .await
            .context("Failed to create support dump")
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = CliArgs::parse();
    cli_utils::init_tracing(args.verbose);
    console_logger::banner(BANNER_TITLE, BANNER_NOTE);

    if let Err(err) = args.execute().await {
        error!("{err:#}");
        std::process::exit(cli_utils::exit_code(&err));
    }
    std::process::exit(codes::SUCCESS);
}
