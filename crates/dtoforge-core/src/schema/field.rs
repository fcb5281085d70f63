//! Field definitions.

use crate::directive::{CastType, Directive, DirectiveSet};
use serde::{Deserialize, Serialize};

/// What a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Builtin scalar value.
    Scalar,
    /// Enum-valued field.
    Enum,
    /// Reference to another model or an embedded composite type.
    Relation,
}

/// A field definition within a model or type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Field kind.
    pub kind: FieldKind,
    /// Schema type identifier (scalar name, enum name or target model).
    pub base_type: String,
    /// Whether the field holds a list.
    pub is_list: bool,
    /// Whether the field is required (non-nullable) in the schema.
    pub is_required: bool,
    /// Free-text documentation.
    pub documentation: Option<String>,
    /// Part of the primary identity.
    pub is_id: bool,
    /// Carries a unique constraint.
    pub is_unique: bool,
    /// Has a schema-level default value.
    pub has_default_value: bool,
    /// Maintained by the persistence layer on every write.
    pub is_updated_at: bool,
    /// Target model name for relation fields.
    pub relation_target: Option<String>,
    /// Foreign-key scalars on this model backing the relation.
    pub relation_from_fields: Vec<String>,
    directives: DirectiveSet,
    cast: Option<CastType>,
    cast_error: Option<String>,
}

impl FieldDef {
    fn new(name: impl Into<String>, kind: FieldKind, base_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            base_type: base_type.into(),
            is_list: false,
            is_required: true,
            documentation: None,
            is_id: false,
            is_unique: false,
            has_default_value: false,
            is_updated_at: false,
            relation_target: None,
            relation_from_fields: Vec::new(),
            directives: DirectiveSet::empty(),
            cast: None,
            cast_error: None,
        }
    }

    /// Create a required scalar field.
    pub fn scalar(name: impl Into<String>, scalar: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Scalar, scalar)
    }

    /// Create a required enum field.
    pub fn enumeration(name: impl Into<String>, enum_name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Enum, enum_name)
    }

    /// Create a required relation field pointing at `target`.
    pub fn relation(name: impl Into<String>, target: impl Into<String>) -> Self {
        let target = target.into();
        let mut field = Self::new(name, FieldKind::Relation, target.clone());
        field.relation_target = Some(target);
        field
    }

    /// Mark as not required.
    pub fn optional(mut self) -> Self {
        self.is_required = false;
        self
    }

    /// Mark as a list.
    pub fn list(mut self) -> Self {
        self.is_list = true;
        self
    }

    /// Mark as the identity field.
    pub fn id(mut self) -> Self {
        self.is_id = true;
        self
    }

    /// Mark as unique.
    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    /// Mark as having a default value.
    pub fn with_default(mut self) -> Self {
        self.has_default_value = true;
        self
    }

    /// Mark as an update timestamp.
    pub fn updated_at(mut self) -> Self {
        self.is_updated_at = true;
        self
    }

    /// Set the foreign-key scalars backing this relation.
    pub fn from_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relation_from_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set documentation and scan it for directives.
    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        let documentation = documentation.into();
        self.directives = DirectiveSet::scan(&documentation);
        match CastType::parse(&documentation) {
            Ok(cast) => {
                self.cast = cast;
                self.cast_error = None;
            }
            Err(reason) => {
                self.cast = None;
                self.cast_error = Some(reason);
            }
        }
        self.documentation = Some(documentation);
        self
    }

    /// Directives found in the documentation.
    pub fn directives(&self) -> DirectiveSet {
        self.directives
    }

    /// Check for a directive.
    pub fn has(&self, directive: Directive) -> bool {
        self.directives.contains(directive)
    }

    /// Replacement type from `@DtoCastType`, if well-formed.
    pub fn cast(&self) -> Option<&CastType> {
        self.cast.as_ref()
    }

    /// Why a present `@DtoCastType` could not be used.
    pub fn cast_error(&self) -> Option<&str> {
        self.cast_error.as_deref()
    }

    /// Check if this is a relation field.
    pub fn is_relation(&self) -> bool {
        self.kind == FieldKind::Relation
    }

    /// Name of the referenced model for relation fields.
    pub fn target(&self) -> &str {
        self.relation_target.as_deref().unwrap_or(&self.base_type)
    }

    /// Identity or unique scalar.
    pub fn is_identifying(&self) -> bool {
        self.is_id || self.is_unique
    }

    /// Value is produced by the persistence layer and never accepted as input.
    pub fn is_generated(&self) -> bool {
        (self.is_id && self.has_default_value) || self.is_updated_at
    }

    /// Value may be null.
    pub fn is_nullable(&self) -> bool {
        !self.is_required && !self.is_list
    }

    /// Relation exposes its foreign-key scalars instead of a nested reference.
    ///
    /// Only the owning side has foreign keys; on the back-relation side the
    /// directive has nothing to expose and the nested form is kept.
    pub fn includes_foreign_keys(&self) -> bool {
        self.is_relation()
            && self.has(Directive::RelationIncludeId)
            && !self.relation_from_fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_builder() {
        let field = FieldDef::scalar("id", "String").id().with_default();

        assert_eq!(field.kind, FieldKind::Scalar);
        assert!(field.is_required);
        assert!(field.is_identifying());
        assert!(field.is_generated());
        assert!(!field.is_relation());
    }

    #[test]
    fn test_relation_builder() {
        let field = FieldDef::relation("author", "User")
            .optional()
            .from_fields(["authorId"]);

        assert!(field.is_relation());
        assert_eq!(field.target(), "User");
        assert_eq!(field.base_type, "User");
        assert_eq!(field.relation_from_fields, vec!["authorId".to_string()]);
        assert!(field.is_nullable());
    }

    #[test]
    fn test_documentation_scanned_once() {
        let field = FieldDef::scalar("settings", "Json")
            .with_documentation("@DtoReadOnly @DtoCastType(UserSettings, ./settings)");

        assert!(field.has(Directive::ReadOnly));
        assert!(field.has(Directive::CastType));
        assert_eq!(field.cast().unwrap().type_name, "UserSettings");
        assert!(field.cast_error().is_none());
    }

    #[test]
    fn test_malformed_cast_recorded() {
        let field = FieldDef::scalar("settings", "Json").with_documentation("@DtoCastType");

        assert!(field.cast().is_none());
        assert!(field.cast_error().is_some());
    }

    #[test]
    fn test_list_is_not_nullable() {
        let field = FieldDef::scalar("tags", "String").list().optional();
        assert!(!field.is_nullable());
    }

    #[test]
    fn test_include_id_needs_foreign_keys() {
        let owning = FieldDef::relation("author", "User")
            .from_fields(["authorId"])
            .with_documentation("@DtoRelationIncludeId");
        let back = FieldDef::relation("posts", "Post")
            .list()
            .with_documentation("@DtoRelationIncludeId");

        assert!(owning.includes_foreign_keys());
        assert!(!back.includes_foreign_keys());
    }

    #[test]
    fn test_updated_at_is_generated() {
        let field = FieldDef::scalar("updatedAt", "DateTime").updated_at();
        assert!(field.is_generated());
        assert!(!FieldDef::scalar("id", "Int").id().is_generated());
    }
}
