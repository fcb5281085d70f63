//! Generation driver.

use crate::config::{GeneratorConfig, OutputLayout};
use crate::diagnostics::ConfigurationError;
use crate::error::Result;
use crate::layout::relative_dir;
use crate::naming::enum_const_name;
use crate::params::{compute_params, ModelParams};
use crate::schema::{EnumDef, SchemaRegistry};
use crate::shape::Shape;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

/// A file the renderer is expected to write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedFile {
    pub path: PathBuf,
    #[serde(flatten)]
    pub content: FileContent,
}

/// What a planned file holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum FileContent {
    /// One DTO or entity class.
    #[serde(rename_all = "camelCase")]
    Shape {
        model: String,
        shape: Shape,
        class_name: String,
    },
    /// A barrel re-exporting every listed module.
    Index { exports: Vec<String> },
}

impl PlannedFile {
    /// Model the file belongs to; `None` for index files.
    pub fn model(&self) -> Option<&str> {
        match &self.content {
            FileContent::Shape { model, .. } => Some(model),
            FileContent::Index { .. } => None,
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self.content, FileContent::Index { .. })
    }
}

/// Values of an enum under their constant name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumListing {
    pub name: String,
    pub const_name: String,
    pub values: Vec<String>,
}

impl From<&EnumDef> for EnumListing {
    fn from(def: &EnumDef) -> Self {
        Self {
            name: def.name.clone(),
            const_name: enum_const_name(&def.name),
            values: def.values.clone(),
        }
    }
}

/// Everything computed by one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutput {
    /// Types first, then models, in registry order.
    pub models: Vec<ModelParams>,
    pub files: Vec<PlannedFile>,
    pub enums: Vec<EnumListing>,
    pub diagnostics: Vec<ConfigurationError>,
}

impl GenerationOutput {
    /// Get the parameters computed for a model or type.
    pub fn model(&self, name: &str) -> Option<&ModelParams> {
        self.models.iter().find(|m| m.model == name)
    }
}

/// Runs the parameter computer over a whole registry.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Compute every type and model of the registry.
    ///
    /// A dangling relation anywhere aborts the run; configuration conflicts
    /// are logged and collected.
    #[instrument(skip_all, fields(output = %self.config.output.display()))]
    pub fn run(&self, registry: &SchemaRegistry) -> Result<GenerationOutput> {
        info!(
            models = registry.models().len(),
            types = registry.types().len(),
            enums = registry.enums().len(),
            ignored = registry.ignored().len(),
            "generating DTO parameters"
        );

        let mut output = GenerationOutput::default();
        for model in registry.types().iter().chain(registry.models()) {
            let params = compute_params(model, registry, &self.config)?;

            for bundle in params.bundles() {
                output.files.push(PlannedFile {
                    path: bundle.path.clone(),
                    content: FileContent::Shape {
                        model: bundle.model.clone(),
                        shape: bundle.shape,
                        class_name: bundle.class_name.clone(),
                    },
                });
            }
            for diagnostic in &params.diagnostics {
                warn!(kind = ?diagnostic.kind, "{}", diagnostic);
            }

            info!(model = %model.name, identity = model.identity, "model processed");
            output.diagnostics.extend(params.diagnostics.iter().cloned());
            output.models.push(params);
        }

        output.enums = registry.enums().iter().map(EnumListing::from).collect();

        if self.config.render.re_export {
            let indexes = self.plan_indexes(&output.files);
            debug!(indexes = indexes.len(), "planned re-export indexes");
            output.files.extend(indexes);
        }

        info!(
            files = output.files.len(),
            diagnostics = output.diagnostics.len(),
            "generation planned"
        );
        Ok(output)
    }

    /// One `index.ts` per directory holding planned files, plus a root index
    /// over those directories in resource layout.
    fn plan_indexes(&self, files: &[PlannedFile]) -> Vec<PlannedFile> {
        let mut dirs: BTreeMap<PathBuf, Vec<String>> = BTreeMap::new();
        for file in files {
            let (Some(dir), Some(stem)) = (file.path.parent(), file.path.file_stem()) else {
                continue;
            };
            dirs.entry(dir.to_path_buf())
                .or_default()
                .push(format!("./{}", stem.to_string_lossy()));
        }

        let root = match self.config.layout {
            OutputLayout::Flat => None,
            OutputLayout::Resource { .. } => Some(PlannedFile {
                path: self.config.output.join("index.ts"),
                content: FileContent::Index {
                    exports: dirs
                        .keys()
                        .map(|dir| relative_dir(&self.config.output, dir))
                        .collect(),
                },
            }),
        };

        dirs.into_iter()
            .map(|(dir, exports)| PlannedFile {
                path: dir.join("index.ts"),
                content: FileContent::Index { exports },
            })
            .chain(root)
            .collect()
    }
}
