//! Schema registry - the immutable snapshot a generation run reads from.

use super::{EnumDef, ModelDef};
use crate::directive::Directive;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Model(usize),
    Type(usize),
}

/// All models, composite types and enums of one generation run.
///
/// Models and types annotated with `@DtoIgnoreModel` are dropped on insertion;
/// their names are remembered so dangling relations can say why the target is
/// missing.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    models: Vec<ModelDef>,
    types: Vec<ModelDef>,
    enums: Vec<EnumDef>,
    ignored: Vec<String>,
    index: HashMap<String, Slot>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model or type, routed by its identity flag.
    pub fn with_model(mut self, model: ModelDef) -> Self {
        self.insert(model);
        self
    }

    /// Add multiple models or types.
    pub fn with_models(mut self, models: impl IntoIterator<Item = ModelDef>) -> Self {
        for model in models {
            self.insert(model);
        }
        self
    }

    /// Add an enum.
    pub fn with_enum(mut self, def: EnumDef) -> Self {
        self.enums.push(def);
        self
    }

    fn insert(&mut self, model: ModelDef) {
        if model.has(Directive::IgnoreModel) {
            debug!(model = %model.name, "dropping model annotated with @DtoIgnoreModel");
            self.ignored.push(model.name);
            return;
        }
        if self.index.contains_key(&model.name) {
            debug!(model = %model.name, "dropping duplicate declaration, keeping the first");
            return;
        }

        let name = model.name.clone();
        let slot = if model.identity {
            self.models.push(model);
            Slot::Model(self.models.len() - 1)
        } else {
            self.types.push(model);
            Slot::Type(self.types.len() - 1)
        };
        self.index.insert(name, slot);
    }

    /// Look up a model or type by name.
    pub fn get(&self, name: &str) -> Option<&ModelDef> {
        match self.index.get(name)? {
            Slot::Model(i) => self.models.get(*i),
            Slot::Type(i) => self.types.get(*i),
        }
    }

    /// Models with identity, in insertion order.
    pub fn models(&self) -> &[ModelDef] {
        &self.models
    }

    /// Identity-less types, in insertion order.
    pub fn types(&self) -> &[ModelDef] {
        &self.types
    }

    /// Enums, in insertion order.
    pub fn enums(&self) -> &[EnumDef] {
        &self.enums
    }

    /// Names dropped by `@DtoIgnoreModel`.
    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }

    /// Check whether a name was dropped by `@DtoIgnoreModel`.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored.iter().any(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDef;

    fn sample_registry() -> SchemaRegistry {
        SchemaRegistry::new()
            .with_model(
                ModelDef::model("User").with_field(FieldDef::scalar("id", "String").id()),
            )
            .with_model(
                ModelDef::composite("Address").with_field(FieldDef::scalar("city", "String")),
            )
            .with_model(ModelDef::model("AuditLog").with_documentation("@DtoIgnoreModel"))
            .with_enum(EnumDef::new("Role", ["USER", "ADMIN"]))
    }

    #[test]
    fn test_routing_by_identity() {
        let registry = sample_registry();

        assert_eq!(registry.models().len(), 1);
        assert_eq!(registry.types().len(), 1);
        assert_eq!(registry.enums().len(), 1);
        assert!(registry.get("User").unwrap().identity);
        assert!(!registry.get("Address").unwrap().identity);
    }

    #[test]
    fn test_ignored_models_are_dropped() {
        let registry = sample_registry();

        assert!(registry.get("AuditLog").is_none());
        assert!(registry.is_ignored("AuditLog"));
        assert!(!registry.is_ignored("User"));
        assert_eq!(registry.ignored(), &["AuditLog".to_string()]);
    }

    #[test]
    fn test_duplicate_name_keeps_first() {
        let registry = SchemaRegistry::new()
            .with_model(ModelDef::model("User").with_field(FieldDef::scalar("id", "String").id()))
            .with_model(ModelDef::composite("User").with_field(FieldDef::scalar("bio", "String")));

        assert_eq!(registry.models().len(), 1);
        assert!(registry.types().is_empty());
        assert!(registry.get("User").unwrap().get_field("id").is_some());
    }

    #[test]
    fn test_lookup_missing() {
        assert!(sample_registry().get("Nope").is_none());
    }
}
