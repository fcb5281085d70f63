//! Enum definitions.

use serde::{Deserialize, Serialize};

/// An enum and its values in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDef {
    /// Enum name.
    pub name: String,
    /// Value names.
    pub values: Vec<String>,
}

impl EnumDef {
    /// Create an enum definition.
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}
