use reqwest::Url;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";
pub const DEFAULT_PROPERTY: &str = "CanonicalSMILES";
pub const DEFAULT_CANVAS_SIZE: u32 = 300;
pub const MIN_CANVAS_SIZE: u32 = 64;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Service root without a trailing slash.
    pub base_url: String,
    /// Compound property requested from the service.
    pub property: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_SIZE,
            height: DEFAULT_CANVAS_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub resolver: ResolverConfig,
    /// `None` disables diagram rendering.
    pub render: Option<RenderConfig>,
    /// Number of lines processed concurrently; `1` runs on the calling thread.
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            resolver: ResolverConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                property: DEFAULT_PROPERTY.to_string(),
            },
            render: Some(RenderConfig::default()),
            workers: 1,
        }
    }
}

#[derive(Default)]
pub struct PipelineConfigBuilder {
    base_url: Option<String>,
    property: Option<String>,
    render_enabled: Option<bool>,
    canvas_width: Option<u32>,
    canvas_height: Option<u32>,
    workers: Option<usize>,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
    pub fn property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }
    pub fn render_enabled(mut self, enabled: bool) -> Self {
        self.render_enabled = Some(enabled);
        self
    }
    pub fn canvas_width(mut self, width: u32) -> Self {
        self.canvas_width = Some(width);
        self
    }
    pub fn canvas_height(mut self, height: u32) -> Self {
        self.canvas_height = Some(height);
        self
    }
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Validates the collected parameters.
    ///
    /// The base URL and property are required; rendering defaults to an
    /// enabled 300×300 canvas and the pipeline to a single worker.
    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingParameter("base_url"))?;
        let property = self
            .property
            .ok_or(ConfigError::MissingParameter("property"))?;

        let resolver = ResolverConfig {
            base_url: validate_base_url(&base_url)?,
            property: validate_property(&property)?,
        };

        let render = if self.render_enabled.unwrap_or(true) {
            Some(RenderConfig {
                width: validate_canvas("canvas_width", self.canvas_width)?,
                height: validate_canvas("canvas_height", self.canvas_height)?,
            })
        } else {
            None
        };

        let workers = self.workers.unwrap_or(1);
        if workers == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "workers",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(PipelineConfig {
            resolver,
            render,
            workers,
        })
    }
}

fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidParameter {
        name: "base_url",
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("must not carry a query or fragment".to_string()));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn validate_property(raw: &str) -> Result<String, ConfigError> {
    let property = raw.trim();
    if property.is_empty() || !property.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::InvalidParameter {
            name: "property",
            reason: format!("'{raw}' is not a property name"),
        });
    }
    Ok(property.to_string())
}

fn validate_canvas(name: &'static str, value: Option<u32>) -> Result<u32, ConfigError> {
    let size = value.unwrap_or(DEFAULT_CANVAS_SIZE);
    if size < MIN_CANVAS_SIZE {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: format!("{size} px is below the {MIN_CANVAS_SIZE} px minimum"),
        });
    }
    Ok(size)
}
