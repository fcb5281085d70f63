//! dtoforge core - field classification and relation projection.
//!
//! This crate turns an annotated schema registry (models, composite types,
//! enums) into ordered field bundles for each DTO shape a NestJS API layer
//! needs: Plain, Create, Update, Connect and Entity.
//!
//! # Pipeline
//!
//! ```text
//! SchemaDocument (JSON)
//!   -> SchemaRegistry        directives scanned once per field/model
//!   -> Generator::run        types first, then models
//!      -> compute_params     one loop over Shape
//!         -> classify        inclusion, optionality, type override
//!         -> resolve         relation policy and cross-model references
//!   -> GenerationOutput      bundles, planned files, enums, diagnostics
//! ```
//!
//! # Usage
//!
//! ```rust
//! use dtoforge_core::{FieldDef, GeneratorConfig, Generator, ModelDef, SchemaRegistry};
//!
//! let registry = SchemaRegistry::new().with_model(
//!     ModelDef::model("User")
//!         .with_field(FieldDef::scalar("id", "String").id().with_default())
//!         .with_field(FieldDef::scalar("email", "String").unique()),
//! );
//!
//! let output = Generator::new(GeneratorConfig::new("src/generated"))
//!     .run(&registry)
//!     .unwrap();
//! assert_eq!(output.models.len(), 1);
//! ```

pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod directive;
pub mod error;
pub mod generator;
pub mod layout;
pub mod naming;
pub mod params;
pub mod relation;
pub mod schema;
pub mod shape;

pub use classify::{classify, Exclusion, FieldContext, FieldDecision, Inclusion};
pub use config::{
    GeneratorConfig, NamingConfig, NamingStyle, OutputLayout, OutputType, RenderOptions,
};
pub use diagnostics::{ConfigurationError, ConfigurationErrorKind};
pub use directive::{has_directive, CastType, Directive, DirectiveSet};
pub use error::{DanglingRelationError, Error, Result};
pub use generator::{EnumListing, FileContent, GenerationOutput, Generator, PlannedFile};
pub use params::{compute_params, ModelParams, ShapeBundle, ShapeField};
pub use relation::{
    resolve, Cardinality, CrossReference, Disconnect, RelationPolicy, RelationProjection,
};
pub use schema::{EnumDef, FieldDef, FieldKind, ModelDef, SchemaDocument, SchemaRegistry};
pub use shape::Shape;
