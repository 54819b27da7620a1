use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "MolShape Developers",
    version,
    about = "MolShape CLI - Resolve chemical names to structures, classify their shape and draw 2D diagrams.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Number of names looked up concurrently.
    /// Defaults to 1 (one request at a time).
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve chemical names and classify the shape of each structure.
    Classify(ClassifyArgs),
    /// Classify SMILES strings directly, without a name lookup.
    Inspect(InspectArgs),
}

/// Arguments for the `classify` subcommand.
#[derive(Args, Debug, Default)]
pub struct ClassifyArgs {
    /// Chemical names to classify, one per argument.
    #[arg(value_name = "NAMES", conflicts_with = "input")]
    pub names: Vec<String>,

    /// Read names from a text file, one per line ('-' reads standard input).
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    /// Defaults to the per-user config file when it exists.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Resolver Overrides ---
    /// Override the root URL of the lookup service.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Override the compound property requested from the lookup service.
    #[arg(long, value_name = "NAME")]
    pub property: Option<String>,

    // --- Output ---
    /// Skip diagram rendering entirely.
    #[arg(long, conflicts_with = "diagrams")]
    pub no_diagrams: bool,

    /// Write one PNG diagram per classified structure into this directory.
    #[arg(long, value_name = "DIR")]
    pub diagrams: Option<PathBuf>,

    /// Also write the results as a CSV report.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S render.width=400
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// SMILES strings to classify.
    #[arg(required = true, value_name = "SMILES")]
    pub smiles: Vec<String>,

    /// Write one PNG diagram per parsed structure into this directory.
    #[arg(long, value_name = "DIR")]
    pub diagrams: Option<PathBuf>,

    /// Also write the results as a CSV report.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}
