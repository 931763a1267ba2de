//! Certificate generation.
//!
//! Everything between "registrant looked up" and "bytes on the wire" lives
//! here: attendance-based template selection, the template store, the two
//! interchangeable rendering strategies, and the download handler.

pub mod eligibility;
pub mod handlers;
pub mod metrics;
pub mod overlay;
pub mod renderer;
pub mod store;
pub mod subprocess;

pub use eligibility::{select_template, TemplateKind};
pub use overlay::OverlayRenderer;
pub use renderer::{build_renderer, RenderStrategy, Renderer};
pub use store::{TemplateAsset, TemplateStore, TemplateStoreError};
pub use subprocess::SubprocessRenderer;

use std::time::Duration;

use thiserror::Error;

/// Per-request generation failures. Selection itself cannot fail; everything
/// past it can, and none of it is retried.
#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("no template provisioned for {0}")]
    TemplateNotFound(TemplateKind),
    #[error("template document is corrupt: {0}")]
    TemplateCorrupt(#[source] lopdf::Error),
    #[error("failed to start renderer process: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("certificate rendering failed: {0}")]
    Render(String),
    #[error("renderer process exceeded the {0:?} deadline")]
    Timeout(Duration),
}

/// A finished certificate: the complete document plus the download filename.
/// Built per request and dropped as soon as the response is written.
#[derive(Debug)]
pub struct RenderedCertificate {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl RenderedCertificate {
    /// Wrap rendered bytes with a download filename derived from the
    /// registrant's display name. The name is user-controlled, so path
    /// separators and control characters are stripped before it can reach a
    /// Content-Disposition header.
    pub fn new(display_name: &str, bytes: Vec<u8>) -> Self {
        let safe = sanitize_filename::sanitize(display_name);
        let stem = if safe.is_empty() {
            "registrant"
        } else {
            safe.as_str()
        };
        Self {
            filename: format!("certificate_{stem}.pdf"),
            bytes,
        }
    }
}
