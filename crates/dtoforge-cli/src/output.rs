//! Manifest output.

use crate::error::{CliError, Result};
use dtoforge_core::{GenerationOutput, GeneratorConfig};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// The run configuration together with everything it produced.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest<'a> {
    pub config: &'a GeneratorConfig,
    #[serde(flatten)]
    pub output: &'a GenerationOutput,
}

impl<'a> Manifest<'a> {
    pub fn new(config: &'a GeneratorConfig, output: &'a GenerationOutput) -> Self {
        Self { config, output }
    }

    /// Pretty-printed JSON.
    pub fn render(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the manifest, creating parent directories as needed.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.render()?;
        let write_err = |source| CliError::WriteManifest {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, json).map_err(write_err)?;

        info!(path = %path.display(), files = self.output.files.len(), "manifest written");
        Ok(())
    }
}
