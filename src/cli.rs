use anyhow::Result;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the Terraform chart values for the given manifest
    Compile(CompileArgs),

    /// Compute the infrastructure status from Terraform outputs
    Status(StatusArgs),

    /// Validate the given YAML manifest
    Validate(ValidateArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Path to the YAML manifest describing the infrastructure
    #[arg(short, long, default_value = "infrastructure.yaml")]
    pub file: Utf8PathBuf,

    /// Path to the YAML file holding the service principal credentials
    #[arg(short, long, default_value = "credentials.yaml")]
    pub credentials: Utf8PathBuf,

    /// Output format of the chart values
    #[arg(long, default_value = "yaml")]
    pub format: OutputFormat,

    /// Set the log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Path to the YAML manifest describing the infrastructure
    #[arg(short, long, default_value = "infrastructure.yaml")]
    pub file: Utf8PathBuf,

    /// Path to the JSON file with the Terraform outputs
    #[arg(short, long, default_value = "terraform-output.json")]
    pub state: Utf8PathBuf,

    /// Set the log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the YAML manifest to validate
    #[arg(short, long, default_value = "infrastructure.yaml")]
    pub file: Utf8PathBuf,

    /// Set the log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

/// Rendering of the computed chart values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Log levels selectable on the command line, mapped onto `tracing` levels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

pub fn parse_args() -> Result<Cli> {
    Ok(Cli::parse())
}
