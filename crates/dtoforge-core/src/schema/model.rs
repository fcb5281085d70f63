//! Model and composite type definitions.

use super::field::FieldDef;
use crate::directive::{Directive, DirectiveSet};

/// A model (with identity) or a composite type (without).
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDef {
    /// Model name (unique within the registry).
    pub name: String,
    /// Persisted models have identity; reusable structural types do not.
    pub identity: bool,
    /// Free-text documentation.
    pub documentation: Option<String>,
    /// Field definitions in declaration order.
    pub fields: Vec<FieldDef>,
    directives: DirectiveSet,
}

impl ModelDef {
    fn new(name: impl Into<String>, identity: bool) -> Self {
        Self {
            name: name.into(),
            identity,
            documentation: None,
            fields: Vec::new(),
            directives: DirectiveSet::empty(),
        }
    }

    /// Create a persisted model.
    pub fn model(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }

    /// Create an identity-less composite type.
    pub fn composite(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }

    /// Add a field.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Add multiple fields.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Set documentation and scan it for model-level directives.
    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        let documentation = documentation.into();
        self.directives = DirectiveSet::scan(&documentation);
        self.documentation = Some(documentation);
        self
    }

    /// Model-level directives.
    pub fn directives(&self) -> DirectiveSet {
        self.directives
    }

    /// Check for a model-level directive.
    pub fn has(&self, directive: Directive) -> bool {
        self.directives.contains(directive)
    }

    /// Update mirrors Create optionality.
    pub fn is_full_update(&self) -> bool {
        self.has(Directive::FullUpdate)
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Relation fields.
    pub fn relation_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.is_relation())
    }

    /// The relation a scalar field is a foreign key of, if any.
    pub fn foreign_key_owner(&self, field: &str) -> Option<&FieldDef> {
        self.relation_fields()
            .find(|r| r.relation_from_fields.iter().any(|f| f == field))
    }

    /// A relation is identifying when every foreign key backing it is an
    /// identity or unique scalar of this model.
    pub fn is_identifying_relation(&self, relation: &FieldDef) -> bool {
        !relation.relation_from_fields.is_empty()
            && relation.relation_from_fields.iter().all(|name| {
                self.get_field(name)
                    .is_some_and(|f| !f.is_relation() && f.is_identifying())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ModelDef {
        ModelDef::model("Profile")
            .with_field(FieldDef::scalar("id", "Int").id().with_default())
            .with_field(FieldDef::scalar("userId", "Int").unique())
            .with_field(FieldDef::relation("user", "User").from_fields(["userId"]))
            .with_field(FieldDef::scalar("editorId", "Int"))
            .with_field(FieldDef::relation("editor", "User").from_fields(["editorId"]))
    }

    #[test]
    fn test_model_builder() {
        let model = ModelDef::model("User")
            .with_documentation("@DtoTypeFullUpdate")
            .with_fields([
                FieldDef::scalar("id", "String").id(),
                FieldDef::scalar("name", "String"),
            ]);

        assert!(model.identity);
        assert!(model.is_full_update());
        assert_eq!(model.fields.len(), 2);
        assert!(model.get_field("name").is_some());
        assert!(model.get_field("missing").is_none());
    }

    #[test]
    fn test_composite_has_no_identity() {
        assert!(!ModelDef::composite("Address").identity);
    }

    #[test]
    fn test_foreign_key_owner() {
        let model = profile();

        assert_eq!(model.foreign_key_owner("userId").unwrap().name, "user");
        assert_eq!(model.foreign_key_owner("editorId").unwrap().name, "editor");
        assert!(model.foreign_key_owner("id").is_none());
    }

    #[test]
    fn test_identifying_relation() {
        let model = profile();

        assert!(model.is_identifying_relation(model.get_field("user").unwrap()));
        assert!(!model.is_identifying_relation(model.get_field("editor").unwrap()));

        let back = FieldDef::relation("posts", "Post").list();
        assert!(!model.is_identifying_relation(&back));
    }
}
