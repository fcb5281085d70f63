//! Field classification.
//!
//! [`classify`] is the single decision function behind every shape: given a
//! field, a shape and the structural facts of the owning model it decides
//! whether the field is emitted, whether its key may be omitted and which
//! type it is emitted as.
//!
//! Directive exclusions are checked first, in a fixed order where the first
//! match wins. Structural rules (stored data, relation capabilities, foreign
//! keys, identifying keys) apply after them.

use crate::directive::{Directive, DirectiveSet};
use crate::relation::RelationPolicy;
use crate::schema::FieldDef;
use crate::shape::Shape;
use serde::Serialize;

/// Why a field is not part of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Exclusion {
    /// `@DtoEntityHidden` on the Entity shape.
    EntityHidden,
    /// `@DtoApiHidden` on any API shape.
    ApiHidden,
    /// `@DtoCreateHidden` on Create.
    CreateHidden,
    /// `@DtoUpdateHidden` on Update.
    UpdateHidden,
    /// `@DtoReadOnly` on Create or Update.
    ReadOnly,
    /// Generated id or update timestamp on Create or Update.
    Generated,
    /// Relation to a model is not stored data.
    NotStored,
    /// No mutation capability granted for this shape.
    NoRelationCapability,
    /// Foreign key represented by its relation.
    ForeignKey,
    /// Not an identity or unique key.
    NotIdentifying,
    /// Relation replaced by its foreign keys.
    Flattened,
    /// Shape has no place for the field.
    NotApplicable,
}

/// How an included field is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inclusion {
    /// The key may be omitted.
    pub optional: bool,
    /// The value may be null.
    pub nullable: bool,
    /// Emitted type, after `@DtoCastType`.
    pub effective_type: String,
    /// Mutation capabilities for relations to models.
    pub relation_policy: RelationPolicy,
}

/// Outcome of classifying one field for one shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldDecision {
    Included(Inclusion),
    Excluded(Exclusion),
}

impl FieldDecision {
    pub fn is_included(&self) -> bool {
        matches!(self, FieldDecision::Included(_))
    }

    pub fn inclusion(&self) -> Option<&Inclusion> {
        match self {
            FieldDecision::Included(inclusion) => Some(inclusion),
            FieldDecision::Excluded(_) => None,
        }
    }

    pub fn exclusion(&self) -> Option<Exclusion> {
        match self {
            FieldDecision::Included(_) => None,
            FieldDecision::Excluded(reason) => Some(*reason),
        }
    }
}

/// Structural facts about a field, derived once per model.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldContext<'a> {
    /// Directives of the owning model.
    pub model_directives: DirectiveSet,
    /// Relation this scalar is a foreign key of.
    pub foreign_key_owner: Option<&'a FieldDef>,
    /// Relation whose foreign keys are all identity or unique scalars.
    pub identifying: bool,
    /// Relation targets an identity-less type.
    pub embedded: bool,
    /// The Connect shape of the model has exactly one entry.
    pub single_connect_key: bool,
}

impl<'a> FieldContext<'a> {
    /// Context with only the owning model's directives.
    pub fn new(model_directives: DirectiveSet) -> Self {
        Self {
            model_directives,
            ..Self::default()
        }
    }

    fn relation_required(&self, field: &FieldDef) -> bool {
        field.has(Directive::RelationRequired)
            || self
                .foreign_key_owner
                .is_some_and(|owner| owner.has(Directive::RelationRequired))
    }
}

/// Classify a field for one shape.
pub fn classify(field: &FieldDef, shape: Shape, ctx: &FieldContext<'_>) -> FieldDecision {
    if let Some(reason) = directive_exclusion(field, shape) {
        return FieldDecision::Excluded(reason);
    }

    let to_model = field.is_relation() && !ctx.embedded;
    let relation_policy = if to_model {
        RelationPolicy::for_shape(field.directives(), shape)
    } else {
        RelationPolicy::None
    };

    if let Some(reason) = structural_exclusion(field, shape, ctx, relation_policy) {
        return FieldDecision::Excluded(reason);
    }

    let relation_required = ctx.relation_required(field);
    let create_optional = !relation_required
        && (to_model
            || !field.is_required
            || field.has_default_value
            || field.has(Directive::CreateOptional));

    let optional = match shape {
        Shape::Plain => false,
        Shape::Entity => to_model,
        Shape::Connect => !ctx.single_connect_key,
        Shape::Create => create_optional,
        Shape::Update if ctx.model_directives.contains(Directive::FullUpdate) => create_optional,
        Shape::Update => !relation_required,
    };

    let effective_type = match field.cast() {
        Some(cast) if !field.is_relation() => cast.type_name.clone(),
        _ => field.base_type.clone(),
    };

    // relation-required in an input shape makes the value mandatory too
    let nullable = shape != Shape::Connect
        && field.is_nullable()
        && !(shape.is_input() && relation_required);

    FieldDecision::Included(Inclusion {
        optional,
        nullable,
        effective_type,
        relation_policy,
    })
}

fn directive_exclusion(field: &FieldDef, shape: Shape) -> Option<Exclusion> {
    if !shape.is_api() {
        return field
            .has(Directive::EntityHidden)
            .then_some(Exclusion::EntityHidden);
    }
    if field.has(Directive::ApiHidden) {
        return Some(Exclusion::ApiHidden);
    }
    match shape {
        Shape::Create if field.has(Directive::CreateHidden) => Some(Exclusion::CreateHidden),
        Shape::Update if field.has(Directive::UpdateHidden) => Some(Exclusion::UpdateHidden),
        _ if shape.is_input() && field.has(Directive::ReadOnly) => Some(Exclusion::ReadOnly),
        _ if shape.is_input() && field.is_generated() => Some(Exclusion::Generated),
        _ => None,
    }
}

fn structural_exclusion(
    field: &FieldDef,
    shape: Shape,
    ctx: &FieldContext<'_>,
    policy: RelationPolicy,
) -> Option<Exclusion> {
    if field.is_relation() {
        if ctx.embedded {
            return (shape == Shape::Connect).then_some(Exclusion::NotApplicable);
        }
        return match shape {
            Shape::Plain => Some(Exclusion::NotStored),
            _ if shape.is_input() && policy.is_none() => Some(Exclusion::NoRelationCapability),
            Shape::Connect if field.includes_foreign_keys() => Some(Exclusion::Flattened),
            Shape::Connect if !ctx.identifying => Some(Exclusion::NotIdentifying),
            _ => None,
        };
    }

    let flattened = ctx
        .foreign_key_owner
        .map(FieldDef::includes_foreign_keys);

    match shape {
        _ if shape.is_input() && flattened == Some(false) => Some(Exclusion::ForeignKey),
        Shape::Connect if !field.is_identifying() => Some(Exclusion::NotIdentifying),
        Shape::Connect if flattened == Some(false) => Some(Exclusion::ForeignKey),
        _ => None,
    }
}
