//! Relation projection.
//!
//! For a relation field and a target shape this module decides which
//! mutation capabilities are exposed and which shape of the target model is
//! referenced, together with the import path from the current shape's
//! output directory to the target's.

use crate::config::GeneratorConfig;
use crate::directive::{Directive, DirectiveSet};
use crate::error::{DanglingRelationError, Result};
use crate::layout::{module_specifier, relative_dir, shape_dir};
use crate::schema::{FieldDef, ModelDef, SchemaRegistry};
use crate::shape::Shape;
use serde::Serialize;

/// Mutation capabilities a relation exposes in one shape.
///
/// Every combination of granted capabilities has its own variant so a
/// policy is never wider than the directives that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationPolicy {
    /// Relation cannot be set through this shape.
    #[default]
    None,
    CreateOnly,
    ConnectOnly,
    CreateOrConnect,
    DisconnectOnly,
    ConnectOrDisconnect,
    CreateOrDisconnect,
    CreateConnectOrDisconnect,
}

impl RelationPolicy {
    /// Build a policy from individual grants.
    pub const fn from_capabilities(create: bool, connect: bool, disconnect: bool) -> Self {
        match (create, connect, disconnect) {
            (false, false, false) => RelationPolicy::None,
            (true, false, false) => RelationPolicy::CreateOnly,
            (false, true, false) => RelationPolicy::ConnectOnly,
            (true, true, false) => RelationPolicy::CreateOrConnect,
            (false, false, true) => RelationPolicy::DisconnectOnly,
            (false, true, true) => RelationPolicy::ConnectOrDisconnect,
            (true, false, true) => RelationPolicy::CreateOrDisconnect,
            (true, true, true) => RelationPolicy::CreateConnectOrDisconnect,
        }
    }

    /// Policy granted by a field's directives in one shape.
    ///
    /// Only Create and Update accept nested relation input, and only Update
    /// can disconnect.
    pub const fn for_shape(directives: DirectiveSet, shape: Shape) -> Self {
        match shape {
            Shape::Create => Self::from_capabilities(
                directives.contains(Directive::CanCreateOnCreate),
                directives.contains(Directive::CanConnectOnCreate),
                false,
            ),
            Shape::Update => Self::from_capabilities(
                directives.contains(Directive::CanCreateOnUpdate),
                directives.contains(Directive::CanConnectOnUpdate),
                directives.contains(Directive::CanDisconnectOnUpdate),
            ),
            Shape::Plain | Shape::Connect | Shape::Entity => RelationPolicy::None,
        }
    }

    pub const fn allows_create(self) -> bool {
        matches!(
            self,
            RelationPolicy::CreateOnly
                | RelationPolicy::CreateOrConnect
                | RelationPolicy::CreateOrDisconnect
                | RelationPolicy::CreateConnectOrDisconnect
        )
    }

    pub const fn allows_connect(self) -> bool {
        matches!(
            self,
            RelationPolicy::ConnectOnly
                | RelationPolicy::CreateOrConnect
                | RelationPolicy::ConnectOrDisconnect
                | RelationPolicy::CreateConnectOrDisconnect
        )
    }

    pub const fn allows_disconnect(self) -> bool {
        matches!(
            self,
            RelationPolicy::DisconnectOnly
                | RelationPolicy::ConnectOrDisconnect
                | RelationPolicy::CreateOrDisconnect
                | RelationPolicy::CreateConnectOrDisconnect
        )
    }

    pub const fn is_none(self) -> bool {
        matches!(self, RelationPolicy::None)
    }
}

/// To-one or to-many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Cardinality {
    ToOne,
    ToMany,
}

impl Cardinality {
    pub fn of(field: &FieldDef) -> Self {
        if field.is_list {
            Cardinality::ToMany
        } else {
            Cardinality::ToOne
        }
    }
}

/// Reference from one shape's output location to a shape of another model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossReference {
    /// Referenced model.
    pub model: String,
    /// Referenced shape.
    pub shape: Shape,
    /// Referenced class name.
    pub class_name: String,
    /// Relative directory, `.` when both live in the same directory.
    pub path: String,
    /// Import module specifier (`<path>/<file stem>`).
    pub module: String,
}

impl CrossReference {
    /// Reference from `origin`'s `origin_shape` to `target`'s `target_shape`.
    pub fn between(
        config: &GeneratorConfig,
        origin: &str,
        origin_shape: Shape,
        target: &str,
        target_shape: Shape,
    ) -> Self {
        let path = relative_dir(
            &shape_dir(config, origin, origin_shape),
            &shape_dir(config, target, target_shape),
        );
        let module = module_specifier(&path, &config.naming.file_stem(target_shape, target));

        Self {
            model: target.to_string(),
            shape: target_shape,
            class_name: config.naming.class_name(target_shape, target),
            path,
            module,
        }
    }

    /// Target lives next to the referencing file.
    pub fn is_same_location(&self) -> bool {
        self.path == "."
    }
}

/// Disconnect input of an Update relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Disconnect {
    /// To-one: a boolean flag.
    Signal,
    /// To-many: identifiers of the records to detach.
    Identifiers(CrossReference),
}

/// How a relation field appears in one shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationProjection {
    /// Target model name.
    pub target: String,
    pub cardinality: Cardinality,
    /// Target is an identity-less composite type.
    pub embedded: bool,
    pub policy: RelationPolicy,
    /// Direct reference (Plain, Connect, Entity and embedded types).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<CrossReference>,
    /// Nested-create sub-key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create: Option<CrossReference>,
    /// Connect sub-key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect: Option<CrossReference>,
    /// Disconnect sub-key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disconnect: Option<Disconnect>,
}

impl RelationProjection {
    /// With more than one sub-key every sub-key is optional and exactly one
    /// is supplied at use time.
    pub fn sub_keys_optional(&self) -> bool {
        let count = [
            self.create.is_some(),
            self.connect.is_some(),
            self.disconnect.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count();
        count > 1
    }
}

/// Find the model a relation field points at.
pub fn lookup_target<'r>(
    registry: &'r SchemaRegistry,
    origin: &ModelDef,
    field: &FieldDef,
) -> Result<&'r ModelDef> {
    let target = field.target();
    registry.get(target).ok_or_else(|| {
        DanglingRelationError {
            model: origin.name.clone(),
            field: field.name.clone(),
            target: target.to_string(),
            ignored: registry.is_ignored(target),
        }
        .into()
    })
}

/// Resolve a relation field for one shape.
///
/// Returns `Ok(None)` for non-relation fields and for shapes in which the
/// relation carries no reference.
pub fn resolve(
    field: &FieldDef,
    shape: Shape,
    registry: &SchemaRegistry,
    origin: &ModelDef,
    config: &GeneratorConfig,
) -> Result<Option<RelationProjection>> {
    if !field.is_relation() {
        return Ok(None);
    }
    let target = lookup_target(registry, origin, field)?;
    Ok(project(field, shape, origin, target, config))
}

/// Projection against an already resolved target.
pub(crate) fn project(
    field: &FieldDef,
    shape: Shape,
    origin: &ModelDef,
    target: &ModelDef,
    config: &GeneratorConfig,
) -> Option<RelationProjection> {
    let reference = |target_shape| {
        CrossReference::between(config, &origin.name, shape, &target.name, target_shape)
    };
    let cardinality = Cardinality::of(field);
    let base = RelationProjection {
        target: target.name.clone(),
        cardinality,
        embedded: !target.identity,
        policy: RelationPolicy::None,
        reference: None,
        create: None,
        connect: None,
        disconnect: None,
    };

    if !target.identity {
        let target_shape = match shape {
            Shape::Plain | Shape::Entity => Shape::Plain,
            Shape::Create => Shape::Create,
            Shape::Update => Shape::Update,
            Shape::Connect => return None,
        };
        return Some(RelationProjection {
            reference: Some(reference(target_shape)),
            ..base
        });
    }

    match shape {
        Shape::Plain => None,
        Shape::Entity => Some(RelationProjection {
            reference: Some(reference(Shape::Entity)),
            ..base
        }),
        Shape::Connect if field.includes_foreign_keys() => None,
        Shape::Connect => Some(RelationProjection {
            reference: Some(reference(Shape::Connect)),
            ..base
        }),
        Shape::Create | Shape::Update => {
            let policy = RelationPolicy::for_shape(field.directives(), shape);
            if policy.is_none() {
                return None;
            }
            let disconnect = policy.allows_disconnect().then(|| match cardinality {
                Cardinality::ToOne => Disconnect::Signal,
                Cardinality::ToMany => Disconnect::Identifiers(reference(Shape::Connect)),
            });
            Some(RelationProjection {
                policy,
                create: policy.allows_create().then(|| reference(Shape::Create)),
                connect: policy.allows_connect().then(|| reference(Shape::Connect)),
                disconnect,
                ..base
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NamingStyle, OutputLayout};
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new()
            .with_model(
                ModelDef::composite("Address").with_field(FieldDef::scalar("city", "String")),
            )
            .with_model(
                ModelDef::model("User")
                    .with_field(FieldDef::scalar("id", "String").id())
                    .with_field(FieldDef::relation("posts", "Post").list().with_documentation(
                        "@DtoRelationCanConnectOnUpdate @DtoRelationCanDisconnectOnUpdate",
                    ))
                    .with_field(FieldDef::relation("address", "Address").optional()),
            )
            .with_model(
                ModelDef::model("Post")
                    .with_field(FieldDef::scalar("id", "String").id())
                    .with_field(FieldDef::scalar("authorId", "String"))
                    .with_field(
                        FieldDef::relation("author", "User")
                            .from_fields(["authorId"])
                            .with_documentation(
                                "@DtoRelationCanCreateOnCreate @DtoRelationCanConnectOnCreate",
                            ),
                    )
                    .with_field(FieldDef::scalar("parentId", "String").optional())
                    .with_field(
                        FieldDef::relation("parent", "Post")
                            .optional()
                            .from_fields(["parentId"])
                            .with_documentation(
                                "@DtoRelationCanConnectOnCreate @DtoRelationCanDisconnectOnUpdate",
                            ),
                    ),
            )
            .with_model(ModelDef::model("Draft").with_documentation("@DtoIgnoreModel"))
    }

    fn resolve_field(
        config: &GeneratorConfig,
        model: &str,
        field: &str,
        shape: Shape,
    ) -> Option<RelationProjection> {
        let registry = registry();
        let origin = registry.get(model).unwrap();
        resolve(origin.get_field(field).unwrap(), shape, &registry, origin, config).unwrap()
    }

    #[test]
    fn test_policy_from_capabilities() {
        assert_eq!(RelationPolicy::from_capabilities(false, false, false), RelationPolicy::None);
        assert_eq!(
            RelationPolicy::from_capabilities(true, true, false),
            RelationPolicy::CreateOrConnect
        );

        let policy = RelationPolicy::from_capabilities(false, true, true);
        assert!(!policy.allows_create());
        assert!(policy.allows_connect());
        assert!(policy.allows_disconnect());
    }

    #[test]
    fn test_create_never_disconnects() {
        let directives = DirectiveSet::scan(
            "@DtoRelationCanDisconnectOnUpdate @DtoRelationCanConnectOnCreate",
        );

        assert_eq!(
            RelationPolicy::for_shape(directives, Shape::Create),
            RelationPolicy::ConnectOnly
        );
        assert_eq!(
            RelationPolicy::for_shape(directives, Shape::Update),
            RelationPolicy::DisconnectOnly
        );
        assert_eq!(RelationPolicy::for_shape(directives, Shape::Plain), RelationPolicy::None);
    }

    #[test]
    fn test_create_union_of_shapes() {
        let config = GeneratorConfig::default();
        let projection = resolve_field(&config, "Post", "author", Shape::Create).unwrap();

        assert_eq!(projection.policy, RelationPolicy::CreateOrConnect);
        assert!(projection.sub_keys_optional());
        assert_eq!(projection.create.unwrap().class_name, "CreateUserDto");
        assert_eq!(projection.connect.unwrap().class_name, "ConnectUserDto");
        assert!(projection.disconnect.is_none());
    }

    #[test]
    fn test_no_grant_no_projection() {
        let config = GeneratorConfig::default();
        assert!(resolve_field(&config, "Post", "author", Shape::Update).is_none());
        assert!(resolve_field(&config, "Post", "author", Shape::Plain).is_none());
    }

    #[test]
    fn test_update_disconnect_to_many() {
        let config = GeneratorConfig::default();
        let projection = resolve_field(&config, "User", "posts", Shape::Update).unwrap();

        assert_eq!(projection.policy, RelationPolicy::ConnectOrDisconnect);
        assert_eq!(projection.cardinality, Cardinality::ToMany);
        match projection.disconnect {
            Some(Disconnect::Identifiers(reference)) => {
                assert_eq!(reference.class_name, "ConnectPostDto")
            }
            other => panic!("unexpected disconnect: {:?}", other),
        }
    }

    #[test]
    fn test_update_disconnect_to_one() {
        let config = GeneratorConfig::default();
        let projection = resolve_field(&config, "Post", "parent", Shape::Update).unwrap();

        assert_eq!(projection.policy, RelationPolicy::DisconnectOnly);
        assert_eq!(projection.cardinality, Cardinality::ToOne);
        assert_eq!(projection.disconnect, Some(Disconnect::Signal));
        assert!(projection.create.is_none());
        assert!(projection.connect.is_none());
    }

    #[test]
    fn test_single_grant_sub_key_required() {
        let config = GeneratorConfig::default();
        let projection = resolve_field(&config, "Post", "parent", Shape::Create).unwrap();

        assert_eq!(projection.policy, RelationPolicy::ConnectOnly);
        assert!(!projection.sub_keys_optional());
    }

    #[test]
    fn test_self_reference_same_location() {
        let config = GeneratorConfig::new("src")
            .with_file_style(NamingStyle::Kebab)
            .with_layout(OutputLayout::Resource { flat: false });
        let projection = resolve_field(&config, "Post", "parent", Shape::Create).unwrap();
        let connect = projection.connect.unwrap();

        assert!(connect.is_same_location());
        assert_eq!(connect.module, "./connect-post.dto");
        assert!(!connect.module.contains(".."));
    }

    #[test]
    fn test_cross_resource_reference() {
        let config = GeneratorConfig::new("src")
            .with_file_style(NamingStyle::Kebab)
            .with_layout(OutputLayout::Resource { flat: false });
        let projection = resolve_field(&config, "Post", "author", Shape::Entity).unwrap();
        let reference = projection.reference.unwrap();

        assert_eq!(reference.class_name, "User");
        assert_eq!(reference.path, "../../user/entities");
        assert_eq!(reference.module, "../../user/entities/user.entity");
    }

    #[test]
    fn test_connect_references_target_connect() {
        let config = GeneratorConfig::default();
        let projection = resolve_field(&config, "Post", "author", Shape::Connect).unwrap();

        assert_eq!(projection.reference.unwrap().module, "./connectUser.dto");
    }

    #[test]
    fn test_embedded_type_projection() {
        let config = GeneratorConfig::default();

        let plain = resolve_field(&config, "User", "address", Shape::Entity).unwrap();
        assert!(plain.embedded);
        assert_eq!(plain.reference.unwrap().class_name, "AddressDto");

        let update = resolve_field(&config, "User", "address", Shape::Update).unwrap();
        assert_eq!(update.policy, RelationPolicy::None);
        assert_eq!(update.reference.unwrap().class_name, "UpdateAddressDto");

        assert!(resolve_field(&config, "User", "address", Shape::Connect).is_none());
    }

    #[test]
    fn test_non_relation_resolves_to_none() {
        let config = GeneratorConfig::default();
        assert!(resolve_field(&config, "Post", "authorId", Shape::Create).is_none());
    }

    #[test]
    fn test_dangling_relation() {
        let registry = registry();
        let origin = ModelDef::model("Comment")
            .with_field(FieldDef::relation("draft", "Draft"));
        let field = origin.get_field("draft").unwrap();

        let err = resolve(field, Shape::Create, &registry, &origin, &GeneratorConfig::default())
            .unwrap_err();
        match err {
            Error::DanglingRelation(err) => {
                assert_eq!(err.model, "Comment");
                assert_eq!(err.field, "draft");
                assert_eq!(err.target, "Draft");
                assert!(err.ignored);
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
