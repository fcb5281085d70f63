//! Non-fatal configuration diagnostics.
//!
//! Conflicting or meaningless directive combinations never abort a run. They
//! are resolved deterministically, reported here and logged by the generator.

use crate::directive::Directive;
use crate::schema::{FieldDef, ModelDef};
use serde::Serialize;
use thiserror::Error;

/// What kind of conflict was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfigurationErrorKind {
    /// `@DtoRelationRequired` and `@DtoCreateOptional` on one field; required wins.
    RelationRequiredOverridesCreateOptional,
    /// `@DtoUpdateOptional` on a full-update model; Update mirrors Create.
    UpdateOptionalUnderFullUpdate,
    /// A relation-only directive on a scalar or enum field; ignored.
    RelationDirectiveOnScalar,
    /// `@DtoRelationIncludeId` on a relation without foreign keys; ignored.
    IncludeIdWithoutForeignKey,
    /// Disconnect granted on a required to-one relation; kept.
    DisconnectOnRequiredRelation,
    /// `@DtoCastType` without a usable payload; ignored.
    MalformedCastType,
    /// `@DtoCastType` on a relation field; ignored.
    CastOnRelation,
    /// Flat resource layout requested without the resource layout; ignored.
    ResourceFlagWithoutResourceLayout,
}

/// A resolved configuration conflict.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationError {
    /// Model the conflict was found on, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Field the conflict was found on, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Conflict kind.
    pub kind: ConfigurationErrorKind,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.model, &self.field) {
            (Some(model), Some(field)) => write!(f, "{}.{}: {}", model, field, self.message),
            (Some(model), None) => write!(f, "{}: {}", model, self.message),
            _ => f.write_str(&self.message),
        }
    }
}

impl ConfigurationError {
    /// Create a diagnostic not tied to any model.
    pub fn global(kind: ConfigurationErrorKind, message: impl Into<String>) -> Self {
        Self {
            model: None,
            field: None,
            kind,
            message: message.into(),
        }
    }

    /// Create a diagnostic for a field.
    pub fn field(
        model: &ModelDef,
        field: &FieldDef,
        kind: ConfigurationErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            model: Some(model.name.clone()),
            field: Some(field.name.clone()),
            kind,
            message: message.into(),
        }
    }

    /// Report every conflicting directive combination on a model.
    pub fn inspect(model: &ModelDef) -> Vec<Self> {
        use ConfigurationErrorKind::*;

        let mut found = Vec::new();
        for field in &model.fields {
            let mut report = |kind, message: String| {
                found.push(Self::field(model, field, kind, message));
            };

            if field.has(Directive::RelationRequired) && field.has(Directive::CreateOptional) {
                report(
                    RelationRequiredOverridesCreateOptional,
                    format!(
                        "{} takes precedence over {}",
                        Directive::RelationRequired,
                        Directive::CreateOptional
                    ),
                );
            }

            if model.is_full_update() && field.has(Directive::UpdateOptional) {
                report(
                    UpdateOptionalUnderFullUpdate,
                    format!(
                        "{} is ignored on a {} model",
                        Directive::UpdateOptional,
                        Directive::FullUpdate
                    ),
                );
            }

            if field.is_relation() {
                if field.has(Directive::RelationIncludeId) && field.relation_from_fields.is_empty() {
                    report(
                        IncludeIdWithoutForeignKey,
                        format!(
                            "{} has no foreign key to expose on this side of the relation",
                            Directive::RelationIncludeId
                        ),
                    );
                }
                if field.has(Directive::CanDisconnectOnUpdate) && field.is_required && !field.is_list {
                    report(
                        DisconnectOnRequiredRelation,
                        format!(
                            "{} on a required relation will fail at runtime",
                            Directive::CanDisconnectOnUpdate
                        ),
                    );
                }
                if field.has(Directive::CastType) {
                    report(
                        CastOnRelation,
                        format!("{} is ignored on relation fields", Directive::CastType),
                    );
                }
            } else {
                for directive in Directive::RELATION_ONLY {
                    if field.has(directive) {
                        report(
                            RelationDirectiveOnScalar,
                            format!("{} is ignored on non-relation fields", directive),
                        );
                    }
                }
                if let Some(reason) = field.cast_error() {
                    report(MalformedCastType, reason.to_string());
                }
            }
        }
        found
    }
}
