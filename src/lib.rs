pub mod api;
pub mod cli;
pub mod config;
pub mod controlplane;
pub mod error;
pub mod terraform;

pub use error::AzinfraError;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{FmtSubscriber, filter::LevelFilter};

pub fn init_logging(log_level: cli::LogLevel) -> Result<()> {
    let filter = match log_level {
        cli::LogLevel::Trace => LevelFilter::TRACE,
        cli::LogLevel::Debug => LevelFilter::DEBUG,
        cli::LogLevel::Info => LevelFilter::INFO,
        cli::LogLevel::Warn => LevelFilter::WARN,
        cli::LogLevel::Error => LevelFilter::ERROR,
    };

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(filter)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .context("failed to set global default tracing subscriber")
}

/// Loads and validates the manifest at `path`.
fn load_valid_manifest(path: &camino::Utf8Path) -> Result<config::Manifest> {
    let manifest = config::load_manifest(path)
        .with_context(|| format!("failed to load manifest from {}", path))?;
    manifest.validate().context("manifest validation failed")?;
    Ok(manifest)
}

/// Computes the chart values for a manifest and renders them.
pub fn run_compile(opts: &cli::CompileArgs) -> Result<String> {
    let manifest = load_valid_manifest(&opts.file)?;
    let auth = config::load_client_auth(&opts.credentials)
        .with_context(|| format!("failed to load credentials from {}", opts.credentials))?;

    let values = terraform::compute_chart_values(
        &manifest.infrastructure,
        &auth,
        &manifest.provider_config,
        &manifest.cluster_context(),
    )
    .context("failed to compute terraform chart values")?;

    let rendered = match opts.format {
        cli::OutputFormat::Json => serde_json::to_string_pretty(&values)
            .context("failed to render chart values as JSON")?,
        cli::OutputFormat::Yaml => values.to_yaml().context("failed to render chart values as YAML")?,
    };

    info!(
        "computed chart values for {}/{}",
        manifest.infrastructure.namespace, manifest.infrastructure.name
    );
    Ok(rendered)
}

/// Computes the infrastructure status from Terraform outputs and renders it as JSON.
pub fn run_status(opts: &cli::StatusArgs) -> Result<String> {
    let manifest = load_valid_manifest(&opts.file)?;
    let state = terraform::load_state(&opts.state)
        .with_context(|| format!("failed to load terraform state from {}", opts.state))?;

    let status = terraform::status_from_terraform_state(&state, &manifest.provider_config);
    let rendered =
        serde_json::to_string_pretty(&status).context("failed to render infrastructure status")?;

    info!(
        "computed infrastructure status for {}/{}",
        manifest.infrastructure.namespace, manifest.infrastructure.name
    );
    Ok(rendered)
}

pub fn run_validate(opts: &cli::ValidateArgs) -> Result<()> {
    let manifest = load_valid_manifest(&opts.file)?;
    info!("validation successful:\n{:#?}", manifest);
    Ok(())
}
