//! External renderer boundary.
//!
//! The renderer is an independently versioned artifact. The host only reads
//! its manifest and checks that the listed files exist; it never loads or
//! controls the renderer itself. Any failure here is reported as a
//! `RendererStatus` and never reaches the simulation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererManifest {
    pub name: String,
    pub version: String,
    /// Entry point, relative to the manifest's directory.
    pub entry: String,
    /// Additional asset files, relative to the manifest's directory.
    #[serde(default)]
    pub assets: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot read renderer manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed renderer manifest: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("renderer manifest field `{0}` is empty")]
    EmptyField(&'static str),
    #[error("renderer asset not found: {0}")]
    MissingAsset(PathBuf),
}

/// Outcome of probing the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RendererStatus {
    NotConfigured,
    Ready { name: String, version: String },
    Unavailable { reason: String },
}

impl RendererManifest {
    pub fn from_json_str(json: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.check_fields()?;
        Ok(manifest)
    }

    /// Read the manifest and verify every listed file exists.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::from_json_str(&text)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        manifest.check_assets(base)?;
        Ok(manifest)
    }

    fn check_fields(&self) -> Result<(), ManifestError> {
        if self.name.trim().is_empty() {
            return Err(ManifestError::EmptyField("name"));
        }
        if self.version.trim().is_empty() {
            return Err(ManifestError::EmptyField("version"));
        }
        if self.entry.trim().is_empty() {
            return Err(ManifestError::EmptyField("entry"));
        }
        Ok(())
    }

    fn check_assets(&self, base: &Path) -> Result<(), ManifestError> {
        for file in std::iter::once(&self.entry).chain(&self.assets) {
            let full = base.join(file);
            if !full.is_file() {
                return Err(ManifestError::MissingAsset(full));
            }
        }
        Ok(())
    }
}

/// Probe the renderer described at `path`, if any.
pub fn probe(path: Option<&Path>) -> RendererStatus {
    let Some(path) = path else {
        return RendererStatus::NotConfigured;
    };
    match RendererManifest::load(path) {
        Ok(m) => {
            log::info!("Renderer {} {} ready", m.name, m.version);
            RendererStatus::Ready {
                name: m.name,
                version: m.version,
            }
        }
        Err(e) => {
            log::warn!("Renderer unavailable, continuing headless: {e}");
            RendererStatus::Unavailable {
                reason: e.to_string(),
            }
        }
    }
}
