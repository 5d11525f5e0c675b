use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::time::Duration;
use tracing::info;

use echo_base::cleaner::Fallback;
use echo_base::environment::Settings;
use echo_base::logging::configure_logging;
use echo_base::scenario;
use echo_base::swapi::SwapiClient;

/// Builds the uninhabited planet list and the Echo Base evacuation document
/// from local fixtures and SWAPI. Flags override the matching environment
/// variables.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SWAPI root, e.g. https://swapi.dev/api (SWAPI_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Per-request timeout in seconds (SWAPI_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Planet list fixture (PLANETS_INPUT_PATH)
    #[arg(long)]
    planets: Option<PathBuf>,

    /// Echo Base fixture (ECHO_BASE_INPUT_PATH)
    #[arg(long)]
    echo_base: Option<PathBuf>,

    /// Uninhabited planet output (PLANETS_OUTPUT_PATH)
    #[arg(long)]
    planets_out: Option<PathBuf>,

    /// Echo Base output (ECHO_BASE_OUTPUT_PATH)
    #[arg(long)]
    echo_base_out: Option<PathBuf>,

    /// Store numeric fields that fail to parse as `keep` or `null` (UNPARSED_VALUES)
    #[arg(long)]
    unparsed: Option<Fallback>,
}

impl Cli {
    fn apply(self, mut settings: Settings) -> Settings {
        if let Some(endpoint) = self.endpoint {
            settings.endpoint = endpoint;
        }
        if let Some(secs) = self.timeout_secs {
            settings.timeout = Duration::from_secs(secs);
        }
        if let Some(path) = self.planets {
            settings.planets_input = path;
        }
        if let Some(path) = self.echo_base {
            settings.echo_base_input = path;
        }
        if let Some(path) = self.planets_out {
            settings.planets_output = path;
        }
        if let Some(path) = self.echo_base_out {
            settings.echo_base_output = path;
        }
        if let Some(fallback) = self.unparsed {
            settings.unparsed = fallback;
        }
        settings
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    configure_logging();

    let settings = Cli::parse().apply(Settings::from_env());
    info!("Using SWAPI at {}", settings.endpoint);

    let client = SwapiClient::new(&settings.endpoint, settings.timeout)
        .context("Failed to create SWAPI client")?;

    scenario::run(&client, &settings)
        .await
        .context("Echo Base run failed")?;

    info!(
        "Wrote {} and {}",
        settings.planets_output.display(),
        settings.echo_base_output.display()
    );
    Ok(())
}
