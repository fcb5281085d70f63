//! JSON schema document ingestion.

use super::{EnumDef, FieldDef, FieldKind, ModelDef, SchemaRegistry};
use crate::error::Result;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// The input document handed over by the schema collaborator.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    /// Persisted models.
    #[serde(default)]
    pub models: Vec<RawModel>,
    /// Identity-less composite types.
    #[serde(default)]
    pub types: Vec<RawModel>,
    /// Enums.
    #[serde(default)]
    pub enums: Vec<EnumDef>,
    /// String-valued generator options.
    #[serde(default)]
    pub generator: BTreeMap<String, Value>,
}

/// A model or type as it appears in the document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawModel {
    pub name: String,
    /// Overrides the list the model appears in.
    #[serde(default)]
    pub identity: Option<bool>,
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(default)]
    pub fields: Vec<RawField>,
}

/// A field as it appears in the document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawField {
    pub name: String,
    pub kind: FieldKind,
    #[serde(rename = "type")]
    pub base_type: String,
    #[serde(default)]
    pub is_list: bool,
    #[serde(default = "default_required")]
    pub is_required: bool,
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(default)]
    pub is_id: bool,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default)]
    pub has_default_value: bool,
    #[serde(default)]
    pub is_updated_at: bool,
    #[serde(default)]
    pub relation_target: Option<String>,
    #[serde(default)]
    pub relation_from_fields: Vec<String>,
}

fn default_required() -> bool {
    true
}

impl SchemaDocument {
    /// Decode a document from JSON.
    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Generator options with every value rendered as a string.
    pub fn generator_options(&self) -> BTreeMap<String, String> {
        self.generator
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect()
    }

    /// Build the registry, scanning directives once per field and model.
    pub fn into_registry(self) -> SchemaRegistry {
        let models = self.models.into_iter().map(|m| m.into_model(true));
        let types = self.types.into_iter().map(|m| m.into_model(false));

        self.enums.into_iter().fold(
            SchemaRegistry::new().with_models(types).with_models(models),
            SchemaRegistry::with_enum,
        )
    }
}

impl RawModel {
    fn into_model(self, identity: bool) -> ModelDef {
        let base = if self.identity.unwrap_or(identity) {
            ModelDef::model(self.name)
        } else {
            ModelDef::composite(self.name)
        };
        let base = match self.documentation {
            Some(doc) => base.with_documentation(doc),
            None => base,
        };
        base.with_fields(self.fields.into_iter().map(FieldDef::from))
    }
}

impl From<RawField> for FieldDef {
    fn from(raw: RawField) -> Self {
        let mut field = match raw.kind {
            FieldKind::Scalar => FieldDef::scalar(raw.name, raw.base_type),
            FieldKind::Enum => FieldDef::enumeration(raw.name, raw.base_type),
            FieldKind::Relation => {
                let target = raw.relation_target.unwrap_or_else(|| raw.base_type.clone());
                let mut field = FieldDef::relation(raw.name, target);
                field.base_type = raw.base_type;
                field.from_fields(raw.relation_from_fields)
            }
        };

        field.is_list = raw.is_list;
        field.is_required = raw.is_required;
        field.is_id = raw.is_id;
        field.is_unique = raw.is_unique;
        field.has_default_value = raw.has_default_value;
        field.is_updated_at = raw.is_updated_at;

        match raw.documentation {
            Some(doc) => field.with_documentation(doc),
            None => field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::Directive;

    const DOCUMENT: &str = r#"{
        "models": [
            {
                "name": "User",
                "documentation": "@DtoTypeFullUpdate",
                "fields": [
                    { "name": "id", "kind": "scalar", "type": "String", "isId": true, "hasDefaultValue": true },
                    { "name": "email", "kind": "scalar", "type": "String", "isUnique": true,
                      "documentation": "login name\n@DtoCreateOptional" },
                    { "name": "address", "kind": "relation", "type": "Address", "isRequired": false },
                    { "name": "posts", "kind": "relation", "type": "Post", "isList": true }
                ]
            },
            { "name": "Secret", "documentation": "@DtoIgnoreModel", "fields": [] }
        ],
        "types": [
            { "name": "Address", "fields": [ { "name": "city", "kind": "scalar", "type": "String" } ] }
        ],
        "enums": [ { "name": "Role", "values": ["USER", "ADMIN"] } ],
        "generator": { "fileNamingStyle": "kebab", "outputToNestJsResourceStructure": true }
    }"#;

    #[test]
    fn test_decode_document() {
        let document = SchemaDocument::from_json(DOCUMENT).unwrap();

        assert_eq!(document.models.len(), 2);
        assert_eq!(document.types.len(), 1);
        assert_eq!(document.enums[0].values, vec!["USER", "ADMIN"]);
    }

    #[test]
    fn test_generator_options_as_strings() {
        let options = SchemaDocument::from_json(DOCUMENT).unwrap().generator_options();

        assert_eq!(options["fileNamingStyle"], "kebab");
        assert_eq!(options["outputToNestJsResourceStructure"], "true");
    }

    #[test]
    fn test_into_registry() {
        let registry = SchemaDocument::from_json(DOCUMENT).unwrap().into_registry();

        let user = registry.get("User").unwrap();
        assert!(user.identity);
        assert!(user.is_full_update());

        let email = user.get_field("email").unwrap();
        assert!(email.is_unique);
        assert!(email.has(Directive::CreateOptional));

        let address = user.get_field("address").unwrap();
        assert!(address.is_relation());
        assert!(!address.is_required);
        assert_eq!(address.target(), "Address");

        assert!(!registry.get("Address").unwrap().identity);
        assert!(registry.is_ignored("Secret"));
    }

    #[test]
    fn test_relation_target_defaults_to_type() {
        let registry = SchemaDocument::from_json(DOCUMENT).unwrap().into_registry();
        let posts = registry.get("User").unwrap().get_field("posts").unwrap();

        assert_eq!(posts.relation_target.as_deref(), Some("Post"));
        assert!(posts.is_list);
    }

    #[test]
    fn test_invalid_document() {
        let err = SchemaDocument::from_json(r#"{ "models": [ { "fields": [] } ] }"#).unwrap_err();
        assert!(err.to_string().starts_with("invalid schema document"));
    }
}
