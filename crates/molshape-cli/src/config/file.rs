use crate::error::{CliError, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileResolverConfig {
    pub base_url: Option<String>,
    pub property: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileRenderConfig {
    pub enabled: Option<bool>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Default destination for diagrams when `--diagrams` is not given.
    pub directory: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FilePipelineConfig {
    pub workers: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub resolver: Option<FileResolverConfig>,
    pub render: Option<FileRenderConfig>,
    pub pipeline: Option<FilePipelineConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads the explicitly given file, or else the per-user file if one
    /// exists, or else an empty configuration.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                debug!("No configuration file found; using built-in defaults.");
                Ok(Self::default())
            }
        }
    }
}

/// `<config dir>/molshape/config.toml` for the current user.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "molshape", "molshape")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn full_file_is_parsed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [resolver]
            base-url = "http://localhost:8080/rest/pug"
            property = "IsomericSMILES"

            [render]
            enabled = false
            width = 400
            height = 250
            directory = "out/diagrams"

            [pipeline]
            workers = 3
            "#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        let resolver = config.resolver.unwrap();
        let render = config.render.unwrap();
        assert_eq!(resolver.base_url.as_deref(), Some("http://localhost:8080/rest/pug"));
        assert_eq!(resolver.property.as_deref(), Some("IsomericSMILES"));
        assert_eq!(render.enabled, Some(false));
        assert_eq!(render.width, Some(400));
        assert_eq!(render.height, Some(250));
        assert_eq!(render.directory, Some(PathBuf::from("out/diagrams")));
        assert_eq!(config.pipeline.unwrap().workers, Some(3));
    }

    #[test]
    fn missing_sections_stay_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[pipeline]\nworkers = 2\n").unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        assert!(config.resolver.is_none());
        assert!(config.render.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[resolver]\ntimeout = 5\n").unwrap();

        let result = FileConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn explicit_missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = FileConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(CliError::Io(_))));
    }

    #[test]
    fn default_path_ends_with_config_file_name() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with(CONFIG_FILE_NAME));
        }
    }
}
