use canvas_groups::adapters::{ProcessEnv, TerminalPrompt};
use canvas_groups::utils::{logger, validation::Validate};
use canvas_groups::{create_groups, CliConfig};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting canvas-groups");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings = cli.resolve()?;
    if let Err(e) = settings.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        return Err(e.into());
    }

    let options = settings.into_options();
    match create_groups(&options, &ProcessEnv, &TerminalPrompt).await {
        Ok(report) => {
            tracing::info!(
                "Created group set '{}' with {} groups and {} memberships",
                report.category.name,
                report.groups.len(),
                report.memberships_created()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            tracing::error!("Suggestion: {}", e.recovery_suggestion());
            Err(e.into())
        }
    }
}
