//! Pre-provisioned certificate template store.
//!
//! Templates are loaded once at startup from the configured directory and
//! shared read-only across requests. Loading parses every document, so a
//! missing or corrupt template keeps the server from reporting ready instead
//! of surfacing on the first unlucky request.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::info;
use lopdf::Document;
use thiserror::Error;

use super::eligibility::TemplateKind;
use super::CertificateError;

/// A single template: the parsed-once bytes plus the on-disk path handed to
/// the external renderer.
#[derive(Debug, Clone)]
pub struct TemplateAsset {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Startup-time provisioning failures.
#[derive(Debug, Error)]
pub enum TemplateStoreError {
    #[error("template directory {} does not exist", .0.display())]
    MissingDirectory(PathBuf),
    #[error("missing {kind} template at {}", .path.display())]
    MissingTemplate { kind: TemplateKind, path: PathBuf },
    #[error("failed to read {kind} template at {}: {source}", .path.display())]
    Unreadable {
        kind: TemplateKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{kind} template at {} is not a valid document: {source}", .path.display())]
    Corrupt {
        kind: TemplateKind,
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },
}

#[derive(Debug, Default)]
pub struct TemplateStore {
    assets: HashMap<TemplateKind, TemplateAsset>,
}

impl TemplateStore {
    /// Load and validate every template kind from `dir`.
    pub fn load(dir: &Path) -> Result<Self, TemplateStoreError> {
        if !dir.is_dir() {
            return Err(TemplateStoreError::MissingDirectory(dir.to_path_buf()));
        }

        let mut assets = HashMap::new();
        for kind in TemplateKind::all() {
            let path = dir.join(kind.file_name());
            if !path.is_file() {
                return Err(TemplateStoreError::MissingTemplate { kind, path });
            }
            let bytes = std::fs::read(&path).map_err(|source| TemplateStoreError::Unreadable {
                kind,
                path: path.clone(),
                source,
            })?;
            Document::load_mem(&bytes).map_err(|source| TemplateStoreError::Corrupt {
                kind,
                path: path.clone(),
                source,
            })?;
            info!("loaded {} template from {}", kind, path.display());
            assets.insert(kind, TemplateAsset { path, bytes });
        }

        Ok(Self { assets })
    }

    /// Assemble a store from explicit assets. Skips document validation, so
    /// request-time corruption paths stay reachable; used by tests and by
    /// deployments that provision a subset of templates.
    pub fn from_assets(assets: HashMap<TemplateKind, TemplateAsset>) -> Self {
        Self { assets }
    }

    pub fn get(&self, kind: TemplateKind) -> Result<&TemplateAsset, CertificateError> {
        self.assets
            .get(&kind)
            .ok_or(CertificateError::TemplateNotFound(kind))
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
