use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::ClassifyArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use molshape::engine::config as core_config;
use std::str::FromStr;

/// Merges defaults, the config file, `--set` overrides and CLI flags, in
/// increasing order of precedence, and validates the result.
pub fn build_config(args: &ClassifyArgs, threads: Option<usize>) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = FileConfig::load(args.config.as_deref())?;
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let resolver_file = file_config.resolver.take().unwrap_or_default();
    let base_url = args
        .base_url
        .clone()
        .or(resolver_file.base_url)
        .unwrap_or(defaults.base_url);
    let property = args
        .property
        .clone()
        .or(resolver_file.property)
        .unwrap_or(defaults.property);

    let render_file = file_config.render.take().unwrap_or_default();
    let diagrams_dir = if args.no_diagrams {
        None
    } else {
        args.diagrams.clone().or(render_file.directory)
    };
    let render_enabled = !args.no_diagrams
        && diagrams_dir.is_some()
        && render_file.enabled.unwrap_or(defaults.render_enabled);

    let workers = threads
        .or(file_config.pipeline.take().and_then(|p| p.workers))
        .unwrap_or(defaults.workers);

    let core_config = core_config::PipelineConfigBuilder::new()
        .base_url(base_url)
        .property(property)
        .render_enabled(render_enabled)
        .canvas_width(render_file.width.unwrap_or(defaults.canvas_width))
        .canvas_height(render_file.height.unwrap_or(defaults.canvas_height))
        .workers(workers)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        diagrams_dir: if render_enabled { diagrams_dir } else { None },
        csv_path: args.csv.clone(),
        core_config,
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for pair in set_values {
        let (key, value) =
            parser::parse_key_value(pair).map_err(|e| CliError::Config(e.to_string()))?;

        match key {
            "resolver.base-url" => {
                config
                    .resolver
                    .get_or_insert_with(Default::default)
                    .base_url = Some(value.to_string());
            }
            "resolver.property" => {
                config
                    .resolver
                    .get_or_insert_with(Default::default)
                    .property = Some(value.to_string());
            }
            "render.enabled" => {
                config.render.get_or_insert_with(Default::default).enabled =
                    Some(parser::parse_bool(value).ok_or_else(|| {
                        CliError::Config(format!("Invalid boolean value for {}: {}", key, value))
                    })?);
            }
            "render.width" => {
                config.render.get_or_insert_with(Default::default).width =
                    Some(parse_value(key, value, "integer")?);
            }
            "render.height" => {
                config.render.get_or_insert_with(Default::default).height =
                    Some(parse_value(key, value, "integer")?);
            }
            "render.directory" => {
                config.render.get_or_insert_with(Default::default).directory =
                    Some(value.into());
            }
            "pipeline.workers" => {
                config.pipeline.get_or_insert_with(Default::default).workers =
                    Some(parse_value(key, value, "integer")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
