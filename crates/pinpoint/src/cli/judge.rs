//! The `pinpoint judge` command: multi-call workflow.
//!
//! Failures from the model API are not handled here; they propagate out of
//! `main` as an error report with the full cause chain and exit code 1.

use super::RunArgs;
use pinpoint_core::{
    parse_judgment, Config, GeminiClient, GeminiSettings, JudgeOrchestrator, ReportWriter,
    RetryPolicy,
};

/// Execute the judge command.
pub async fn execute(args: RunArgs, config: &Config) -> anyhow::Result<()> {
    // Resolve the key before any network traffic
    let settings = GeminiSettings::from_config(config, args.model.as_deref())?;
    tracing::info!("Describing {:?} with {}", args.image, settings.model);

    let orchestrator = JudgeOrchestrator::new(Box::new(GeminiClient::new(settings)))
        .with_retry(RetryPolicy::from(&config.llm));
    let report = orchestrator.run(&args.image).await?;

    if args.strict {
        let judgment = parse_judgment(&report.judgment)?;
        if let Some(best) = judgment.best() {
            tracing::info!(
                "Best description: [{}] (rating {})",
                best.idx,
                best.rating
            );
        }
    }

    let path = ReportWriter::new(args.report_dir(config)).write_multi(&report)?;
    println!("\nResults saved to {}", path.display());
    Ok(())
}
