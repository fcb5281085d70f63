//! Output shapes.

use serde::Serialize;

/// One of the DTO projections computed for a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Shape {
    /// Mirrors stored data.
    Plain,
    /// Insertion payload.
    Create,
    /// Partial or full modification payload.
    Update,
    /// Reference to an existing record.
    Connect,
    /// Internal entity.
    Entity,
}

impl Shape {
    /// Shapes produced for models with identity.
    pub const ALL: [Shape; 5] = [
        Shape::Plain,
        Shape::Create,
        Shape::Update,
        Shape::Connect,
        Shape::Entity,
    ];

    /// Shapes produced for identity-less types.
    pub const TYPE_SHAPES: [Shape; 3] = [Shape::Plain, Shape::Create, Shape::Update];

    /// Shapes applicable to a model with or without identity.
    pub fn for_model(identity: bool) -> &'static [Shape] {
        if identity {
            &Self::ALL
        } else {
            &Self::TYPE_SHAPES
        }
    }

    /// Create or Update.
    pub const fn is_input(self) -> bool {
        matches!(self, Shape::Create | Shape::Update)
    }

    /// Every shape except Entity is part of the public API surface.
    pub const fn is_api(self) -> bool {
        !matches!(self, Shape::Entity)
    }

    /// Lowercase shape name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Shape::Plain => "plain",
            Shape::Create => "create",
            Shape::Update => "update",
            Shape::Connect => "connect",
            Shape::Entity => "entity",
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
