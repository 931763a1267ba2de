//! Environment-driven configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context};

use crate::certificate::RenderStrategy;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    /// Directory holding `day1.pdf`, `day2.pdf` and `both.pdf`.
    pub template_dir: PathBuf,
    pub render_strategy: RenderStrategy,
    /// External rendering program, invoked as `<command> <template> <name>`.
    pub renderer_command: PathBuf,
    pub render_timeout: Duration,
    /// Prefix for the name drawn on certificates, e.g. `"Mr. "`. Empty by
    /// default.
    pub honorific_prefix: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let template_dir = PathBuf::from(
            std::env::var("TEMPLATE_DIR").unwrap_or_else(|_| "certs".to_string()),
        );
        let render_strategy = std::env::var("RENDER_STRATEGY")
            .unwrap_or_else(|_| "overlay".to_string())
            .parse::<RenderStrategy>()
            .map_err(|e| anyhow!(e))?;
        let renderer_command = PathBuf::from(
            std::env::var("RENDERER_COMMAND")
                .unwrap_or_else(|_| "pdf-name-overlay".to_string()),
        );
        let timeout_secs: u64 = std::env::var("RENDER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .context("RENDER_TIMEOUT_SECS must be a whole number of seconds")?;
        let honorific_prefix = std::env::var("HONORIFIC_PREFIX").unwrap_or_default();

        Ok(Self {
            database_url,
            bind_addr,
            template_dir,
            render_strategy,
            renderer_command,
            render_timeout: Duration::from_secs(timeout_secs),
            honorific_prefix,
        })
    }
}
