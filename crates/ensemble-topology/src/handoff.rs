//! Hand-off of a completed topology to the infrastructure platform.
//!
//! A [`Manifest`] wraps the topology with run metadata. Sinks publish the
//! rendered manifest; nothing is published for a failed run because a
//! manifest can only be built from a [`Topology`].

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::topology::Topology;

/// Version of the manifest layout.
pub const MANIFEST_SCHEMA_VERSION: &str = "0.1.0";

/// Errors raised while publishing a manifest.
#[derive(Debug, Error)]
pub enum HandoffError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error.
    #[error("serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Serialized form of a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManifestFormat {
    #[default]
    Json,
    Yaml,
}

impl ManifestFormat {
    /// YAML for `.yaml`/`.yml` files, JSON otherwise.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// A completed topology plus run metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub schema_version: String,
    /// Identifies one composition run.
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub topology: Topology,
}

impl Manifest {
    pub fn new(topology: Topology) -> Self {
        Self::with_run(topology, Uuid::new_v4(), Utc::now())
    }

    pub fn with_run(topology: Topology, run_id: Uuid, generated_at: DateTime<Utc>) -> Self {
        Self {
            schema_version: MANIFEST_SCHEMA_VERSION.to_string(),
            run_id,
            generated_at,
            topology,
        }
    }

    pub fn render(&self, format: ManifestFormat) -> Result<String, HandoffError> {
        Ok(match format {
            ManifestFormat::Json => serde_json::to_string_pretty(self)?,
            ManifestFormat::Yaml => serde_yaml::to_string(self)?,
        })
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, HandoffError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Destination of a rendered manifest.
pub trait TopologySink {
    fn publish(&self, manifest: &Manifest) -> Result<(), HandoffError>;
}

/// Writes the manifest to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink {
    format: ManifestFormat,
}

impl StdoutSink {
    pub fn new(format: ManifestFormat) -> Self {
        Self { format }
    }
}

impl TopologySink for StdoutSink {
    fn publish(&self, manifest: &Manifest) -> Result<(), HandoffError> {
        let rendered = manifest.render(self.format)?;
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", rendered.trim_end())?;
        out.flush()?;
        Ok(())
    }
}

/// Writes the manifest to a file, replacing any previous content.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
    format: ManifestFormat,
}

impl FileSink {
    /// Format is chosen from the file extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = ManifestFormat::from_path(&path);
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ManifestFormat {
        self.format
    }
}

impl TopologySink for FileSink {
    fn publish(&self, manifest: &Manifest) -> Result<(), HandoffError> {
        let rendered = manifest.render(self.format)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, rendered)?;

        tracing::info!(
            path = %self.path.display(),
            run_id = %manifest.run_id,
            "Wrote topology manifest"
        );
        Ok(())
    }
}
