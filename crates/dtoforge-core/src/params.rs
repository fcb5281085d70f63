//! Per-model parameter computation.
//!
//! Structural facts about every field (foreign-key ownership, relation
//! targets, identifying relations, the size of the Connect key set) are
//! derived once per model. A single loop over the model's shapes then
//! classifies each field and projects relations.

use crate::classify::{classify, FieldContext, FieldDecision};
use crate::config::GeneratorConfig;
use crate::diagnostics::ConfigurationError;
use crate::directive::CastType;
use crate::error::Result;
use crate::layout::shape_file;
use crate::relation::{lookup_target, project, RelationProjection};
use crate::schema::{FieldDef, FieldKind, ModelDef, SchemaRegistry};
use crate::shape::Shape;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, instrument};

/// A field as emitted in one shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeField {
    pub name: String,
    /// Emitted type.
    #[serde(rename = "type")]
    pub ty: String,
    pub kind: FieldKind,
    pub is_list: bool,
    /// The key may be omitted.
    pub is_optional: bool,
    /// The value may be null.
    pub is_nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<RelationProjection>,
    /// Import for a `@DtoCastType` replacement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast: Option<CastType>,
}

/// The ordered fields of one shape of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeBundle {
    pub model: String,
    pub shape: Shape,
    pub class_name: String,
    /// Planned output file.
    pub path: PathBuf,
    /// Fields in declaration order.
    pub fields: Vec<ShapeField>,
}

impl ShapeBundle {
    /// Get a field by name.
    pub fn field(&self, name: &str) -> Option<&ShapeField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in emission order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

/// Every shape computed for one model or type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelParams {
    pub model: String,
    pub identity: bool,
    /// Bundles in shape order; types only have Plain, Create and Update.
    pub bundles: Vec<ShapeBundle>,
    /// Conflicts resolved while reading the model's directives.
    pub diagnostics: Vec<ConfigurationError>,
}

impl ModelParams {
    /// Get the bundle of a shape.
    pub fn bundle(&self, shape: Shape) -> Option<&ShapeBundle> {
        self.bundles.iter().find(|b| b.shape == shape)
    }

    /// Iterate over the bundles.
    pub fn bundles(&self) -> impl Iterator<Item = &ShapeBundle> {
        self.bundles.iter()
    }
}

struct FieldSlot<'a> {
    field: &'a FieldDef,
    target: Option<&'a ModelDef>,
    ctx: FieldContext<'a>,
}

struct ModelAnalysis<'a> {
    model: &'a ModelDef,
    slots: Vec<FieldSlot<'a>>,
}

impl<'a> ModelAnalysis<'a> {
    fn new(model: &'a ModelDef, registry: &'a SchemaRegistry) -> Result<Self> {
        let mut slots = Vec::with_capacity(model.fields.len());
        for field in &model.fields {
            let mut ctx = FieldContext::new(model.directives());
            let target = if field.is_relation() {
                let target = lookup_target(registry, model, field)?;
                ctx.embedded = !target.identity;
                ctx.identifying = model.is_identifying_relation(field);
                Some(target)
            } else {
                ctx.foreign_key_owner = model.foreign_key_owner(&field.name);
                None
            };
            slots.push(FieldSlot { field, target, ctx });
        }

        let mut analysis = Self { model, slots };
        if model.identity {
            let keys = analysis
                .slots
                .iter()
                .filter(|slot| classify(slot.field, Shape::Connect, &slot.ctx).is_included())
                .count();
            for slot in &mut analysis.slots {
                slot.ctx.single_connect_key = keys == 1;
            }
        }
        Ok(analysis)
    }

    fn bundle(&self, shape: Shape, config: &GeneratorConfig) -> ShapeBundle {
        let model = &self.model.name;
        let fields = self
            .slots
            .iter()
            .filter_map(|slot| {
                let FieldDecision::Included(inclusion) = classify(slot.field, shape, &slot.ctx)
                else {
                    return None;
                };
                let relation = slot
                    .target
                    .and_then(|target| project(slot.field, shape, self.model, target, config));
                let cast = if slot.field.is_relation() {
                    None
                } else {
                    slot.field.cast().cloned()
                };

                Some(ShapeField {
                    name: slot.field.name.clone(),
                    ty: inclusion.effective_type,
                    kind: slot.field.kind,
                    is_list: slot.field.is_list,
                    is_optional: inclusion.optional,
                    is_nullable: inclusion.nullable,
                    relation,
                    cast,
                })
            })
            .collect();

        ShapeBundle {
            model: model.clone(),
            shape,
            class_name: config.naming.class_name(shape, model),
            path: shape_file(config, model, shape),
            fields,
        }
    }
}

/// Compute every shape of a model or type.
///
/// Fails if a relation field targets a model absent from the registry.
#[instrument(skip_all, fields(model = %model.name))]
pub fn compute_params(
    model: &ModelDef,
    registry: &SchemaRegistry,
    config: &GeneratorConfig,
) -> Result<ModelParams> {
    let analysis = ModelAnalysis::new(model, registry)?;

    let mut bundles = Vec::new();
    for &shape in Shape::for_model(model.identity) {
        let bundle = analysis.bundle(shape, config);
        debug!(%shape, fields = bundle.fields.len(), "computed shape");
        bundles.push(bundle);
    }

    Ok(ModelParams {
        model: model.name.clone(),
        identity: model.identity,
        bundles,
        diagnostics: ConfigurationError::inspect(model),
    })
}
