//! Database module - AppState construction and registrant lookups.
//!
//! All process-wide stores (connection pool, template store, renderer) are
//! built here, explicitly, before the HTTP server starts accepting traffic.
//! A failure in any of them keeps the process from coming up at all.

mod registrant;

use std::sync::Arc;
use std::time::Duration;

use log::info;
use sqlx::PgPool;

use crate::certificate::{build_renderer, Renderer, TemplateStore};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub templates: Arc<TemplateStore>,
    pub renderer: Arc<dyn Renderer + Send + Sync>,
    /// Prefix prepended to the name drawn on certificates. Empty by default.
    pub honorific: String,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("registrant store connected");

        let templates = Arc::new(TemplateStore::load(&config.template_dir)?);
        info!("template store ready with {} documents", templates.len());

        let renderer = build_renderer(
            config.render_strategy,
            templates.clone(),
            config.renderer_command.clone(),
            config.render_timeout,
        );

        Ok(Self {
            pool,
            templates,
            renderer,
            honorific: config.honorific_prefix.clone(),
        })
    }

    /// Assemble state from already-built parts. Used by tests that bring
    /// their own pool, store or renderer.
    pub fn with_parts(
        pool: PgPool,
        templates: Arc<TemplateStore>,
        renderer: Arc<dyn Renderer + Send + Sync>,
        honorific: impl Into<String>,
    ) -> Self {
        Self {
            pool,
            templates,
            renderer,
            honorific: honorific.into(),
        }
    }

    /// Liveness probe against the registrant store.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
    }
}
