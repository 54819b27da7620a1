use molshape::engine::config::PipelineConfig;
use std::path::PathBuf;

/// Everything the `classify` command needs after all layers are merged.
#[derive(Debug)]
pub struct AppConfig {
    pub core_config: PipelineConfig,
    /// Where PNG diagrams go; rendering only runs when this is set.
    pub diagrams_dir: Option<PathBuf>,
    pub csv_path: Option<PathBuf>,
}
