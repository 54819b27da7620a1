//! Layered CLI configuration: built-in defaults, an optional TOML file,
//! `--set KEY=VALUE` overrides and finally dedicated command-line flags.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::build_config;
