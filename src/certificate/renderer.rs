//! Rendering strategy abstraction.
//!
//! The request handler only sees the `Renderer` trait; whether a certificate
//! is produced by the in-process overlay or by delegating to an external
//! program is decided once, from configuration, at startup.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::overlay::OverlayRenderer;
use super::store::TemplateStore;
use super::subprocess::SubprocessRenderer;
use super::{CertificateError, TemplateKind};

/// Produces finished certificate bytes for a template kind and display text.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(
        &self,
        kind: TemplateKind,
        display_text: &str,
    ) -> Result<Vec<u8>, CertificateError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStrategy {
    /// Overlay the name with the in-process document editor.
    Overlay,
    /// Delegate to an external rendering program and capture its stdout.
    Subprocess,
}

impl FromStr for RenderStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overlay" | "inprocess" | "in-process" => Ok(Self::Overlay),
            "subprocess" | "external" => Ok(Self::Subprocess),
            other => Err(format!(
                "unknown render strategy '{other}' (expected 'overlay' or 'subprocess')"
            )),
        }
    }
}

/// Construct the configured strategy over the shared template store.
pub fn build_renderer(
    strategy: RenderStrategy,
    templates: Arc<TemplateStore>,
    command: PathBuf,
    timeout: Duration,
) -> Arc<dyn Renderer + Send + Sync> {
    match strategy {
        RenderStrategy::Overlay => Arc::new(OverlayRenderer::new(templates)),
        RenderStrategy::Subprocess => {
            Arc::new(SubprocessRenderer::new(templates, command, timeout))
        }
    }
}
