use crate::args::GlobalArgs;
use crate::config::load_api_key::load_api_key;
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;

mod load_api_key;

/// Settings shared by every subcommand.
#[derive(Clone)]
pub struct AppConfig {
    /// Alpha Vantage key used for forex lookups
    pub(crate) forex_api_key: String,
    /// Per-request HTTP timeout
    pub(crate) timeout: Duration,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("forex_api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AppConfig {
    pub(crate) fn setup(args: &GlobalArgs) -> Result<AppConfig> {
        if let Err(e) = dotenvy::from_filename(&args.env_file) {
            if !e.not_found() {
                return Err(e).with_context(|| {
                    format!("Failed to read env file {}", args.env_file.display())
                });
            }
        }

        let forex_api_key = load_api_key().context("Failed to load API key")?;
        let timeout = Duration::from_secs(args.timeout);

        info!("Using HTTP timeout of {}s", timeout.as_secs());

        Ok(AppConfig {
            forex_api_key,
            timeout,
        })
    }
}
