use crate::cli::ClassifyArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use molshape::{
    engine::progress::ProgressReporter,
    workflows::classify::{self, InputLine},
};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

pub async fn run(args: ClassifyArgs, threads: Option<usize>) -> Result<()> {
    info!("Building configuration from defaults, file and CLI arguments...");
    let app_config = build_config(&args, threads)?;
    debug!("Final pipeline configuration: {:?}", &app_config.core_config);

    let lines = collect_lines(&args)?;
    if lines.is_empty() {
        return Err(CliError::Argument(
            "no chemical names given; pass names as arguments or use --input".to_string(),
        ));
    }

    let progress_handler = CliProgressHandler::new("Classifying");
    let core_config = app_config.core_config.clone();

    println!("Classifying {} name(s)...", lines.len());
    info!("Invoking the core classification workflow...");

    let results = tokio::task::spawn_blocking(move || {
        let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
        classify::run(&lines, &core_config, &reporter)
    })
    .await
    .map_err(|e| CliError::Other(anyhow::anyhow!("Classification task failed: {}", e)))??;

    super::emit_results(
        &results,
        app_config.diagrams_dir.as_deref(),
        app_config.csv_path.as_deref(),
    )
}

fn collect_lines(args: &ClassifyArgs) -> Result<Vec<InputLine>> {
    match &args.input {
        Some(path) => Ok(classify::split_input(&read_input(path)?)),
        None => Ok(classify::lines_from(args.names.iter().cloned())),
    }
}

/// Reads the whole text block from a file, or from standard input for `-`.
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        info!("Reading names from standard input");
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    info!("Reading names from {:?}", path);
    std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}
