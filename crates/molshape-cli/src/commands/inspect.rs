use crate::cli::InspectArgs;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use molshape::{
    engine::{config::RenderConfig, progress::ProgressReporter},
    workflows::classify,
};
use tracing::info;

pub async fn run(args: InspectArgs) -> Result<()> {
    let lines = classify::lines_from(args.smiles.iter().cloned());
    let render = args.diagrams.as_ref().map(|_| RenderConfig::default());

    let progress_handler = CliProgressHandler::new("Inspecting");
    info!("Classifying {} identifier(s) without lookup.", lines.len());

    let results = tokio::task::spawn_blocking(move || {
        let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
        classify::inspect(&lines, render, &reporter)
    })
    .await
    .map_err(|e| CliError::Other(anyhow::anyhow!("Inspection task failed: {}", e)))?;

    super::emit_results(&results, args.diagrams.as_deref(), args.csv.as_deref())
}
