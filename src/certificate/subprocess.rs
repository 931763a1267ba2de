//! Out-of-process rendering strategy.
//!
//! Spawns the configured rendering program once per request with the template
//! path and display text as its two arguments. The finished document arrives
//! on the child's stdout; stderr is diagnostic only. Exit code 0 is the sole
//! success signal, and a non-zero exit invalidates every buffered byte.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio_util::io::ReaderStream;

use super::renderer::Renderer;
use super::store::TemplateStore;
use super::{CertificateError, TemplateKind};

pub struct SubprocessRenderer {
    templates: Arc<TemplateStore>,
    command: PathBuf,
    timeout: Duration,
}

impl SubprocessRenderer {
    pub fn new(templates: Arc<TemplateStore>, command: PathBuf, timeout: Duration) -> Self {
        Self {
            templates,
            command,
            timeout,
        }
    }
}

#[async_trait]
impl Renderer for SubprocessRenderer {
    async fn render(
        &self,
        kind: TemplateKind,
        display_text: &str,
    ) -> Result<Vec<u8>, CertificateError> {
        let asset = self.templates.get(kind)?;
        debug!(
            "spawning {} for {} template",
            self.command.display(),
            kind
        );

        // kill_on_drop covers every abandonment path, including the request
        // being aborted while the child is still running.
        let mut child = Command::new(&self.command)
            .arg(&asset.path)
            .arg(display_text)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(CertificateError::Spawn)?;

        let stdout = child.stdout.take().ok_or_else(|| {
            CertificateError::Render("renderer stdout was not captured".to_string())
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            CertificateError::Render("renderer stderr was not captured".to_string())
        })?;

        // Diagnostics are logged as they arrive but never fail the request
        // by themselves.
        let stderr_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                warn!("renderer stderr: {line}");
            }
        });

        let collect = async {
            let mut buffer = Vec::new();
            let mut chunks = ReaderStream::new(stdout);
            // Chunks are appended strictly in arrival order; the exit status
            // is observed only after stdout reaches end of stream.
            while let Some(chunk) = chunks.next().await {
                let chunk = chunk.map_err(|e| {
                    CertificateError::Render(format!("failed reading renderer output: {e}"))
                })?;
                buffer.extend_from_slice(&chunk);
            }
            let status = child.wait().await.map_err(|e| {
                CertificateError::Render(format!("failed waiting for renderer exit: {e}"))
            })?;
            Ok::<_, CertificateError>((status, buffer))
        };

        let outcome = tokio::time::timeout(self.timeout, collect).await;
        let (status, buffer) = match outcome {
            Ok(result) => result?,
            Err(_) => {
                stderr_task.abort();
                if let Err(e) = child.start_kill() {
                    warn!("failed to kill timed-out renderer: {e}");
                }
                let _ = child.wait().await;
                return Err(CertificateError::Timeout(self.timeout));
            }
        };
        let _ = stderr_task.await;

        if !status.success() {
            let code = status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "killed by signal".to_string());
            return Err(CertificateError::Render(format!(
                "renderer exited with status {code} after writing {} bytes",
                buffer.len()
            )));
        }

        debug!("renderer produced {} bytes for {}", buffer.len(), kind);
        Ok(buffer)
    }
}
