//! Schema registry for DTO generation.
//!
//! Models, composite types and enums are read once from the input document.
//! Documentation is scanned for directives at ingestion time, so the rest of
//! the pipeline only ever sees typed [`DirectiveSet`](crate::DirectiveSet)s.

mod document;
mod enums;
mod field;
mod model;
mod registry;

pub use document::{RawField, RawModel, SchemaDocument};
pub use enums::EnumDef;
pub use field::{FieldDef, FieldKind};
pub use model::ModelDef;
pub use registry::SchemaRegistry;
