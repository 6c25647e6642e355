use crate::{cli_utils::supportability::DumpArgs, console_logger};
use support_dump::{error::Result, init_session, run_dump, CommandRunner};

impl DumpArgs {
    /// Resolve the CLI, check cluster access, collect and archive.
    pub(crate) async fn execute(&self, runner: &dyn CommandRunner) -> Result<()> {
        let config = init_session(
            runner,
            self.namespace(),
            self.output_dir(),
            self.pg_log_limit(),
        )
        .await?;

        let summary = run_dump(runner, &config).await?;

        let skipped = summary.report.skipped_steps().count();
        if skipped > 0 {
            console_logger::info(
                "Steps with nothing collected",
                Some(skipped.to_string().as_str()),
            );
        }
        console_logger::info(
            "Support dump archive",
            Some(summary.archive.display().to_string().as_str()),
        );
        Ok(())
    }
}
