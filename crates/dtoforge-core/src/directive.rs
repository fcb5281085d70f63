//! Directive vocabulary recognised in documentation text.
//!
//! Documentation comments are the only channel for generation policy. The
//! vocabulary is closed: anything that is not one of the tokens below is
//! prose and is ignored. Directives are scanned once when a field or model is
//! ingested and kept as a [`DirectiveSet`].

use serde::ser::{Serialize, Serializer};

/// A recognised documentation directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Directive {
    /// Drop the whole model or type from generation.
    IgnoreModel,
    /// Never accept the field as input.
    ReadOnly,
    /// Hide the field from the Create shape.
    CreateHidden,
    /// Hide the field from the Update shape.
    UpdateHidden,
    /// Hide the field from the Entity shape.
    EntityHidden,
    /// Hide the field from every API shape (Entity keeps it).
    ApiHidden,
    /// Make a required field optional in Create.
    CreateOptional,
    /// Make a field optional in Update.
    UpdateOptional,
    /// Force the field to be present in Create and Update.
    RelationRequired,
    /// Expose the raw foreign-key scalars instead of a nested reference.
    RelationIncludeId,
    /// Allow nested create of the related record on Create.
    CanCreateOnCreate,
    /// Allow connecting an existing related record on Create.
    CanConnectOnCreate,
    /// Allow nested create of the related record on Update.
    CanCreateOnUpdate,
    /// Allow connecting an existing related record on Update.
    CanConnectOnUpdate,
    /// Allow disconnecting related records on Update.
    CanDisconnectOnUpdate,
    /// Update mirrors Create optionality instead of being partial.
    FullUpdate,
    /// Replace the emitted type with the directive payload.
    CastType,
}

impl Directive {
    /// Every directive, in declaration order.
    pub const ALL: [Directive; 17] = [
        Directive::IgnoreModel,
        Directive::ReadOnly,
        Directive::CreateHidden,
        Directive::UpdateHidden,
        Directive::EntityHidden,
        Directive::ApiHidden,
        Directive::CreateOptional,
        Directive::UpdateOptional,
        Directive::RelationRequired,
        Directive::RelationIncludeId,
        Directive::CanCreateOnCreate,
        Directive::CanConnectOnCreate,
        Directive::CanCreateOnUpdate,
        Directive::CanConnectOnUpdate,
        Directive::CanDisconnectOnUpdate,
        Directive::FullUpdate,
        Directive::CastType,
    ];

    /// Directives that only make sense on relation fields.
    pub const RELATION_ONLY: [Directive; 6] = [
        Directive::RelationIncludeId,
        Directive::CanCreateOnCreate,
        Directive::CanConnectOnCreate,
        Directive::CanCreateOnUpdate,
        Directive::CanConnectOnUpdate,
        Directive::CanDisconnectOnUpdate,
    ];

    /// The literal token matched in documentation text.
    pub const fn token(self) -> &'static str {
        match self {
            Directive::IgnoreModel => "@DtoIgnoreModel",
            Directive::ReadOnly => "@DtoReadOnly",
            Directive::CreateHidden => "@DtoCreateHidden",
            Directive::UpdateHidden => "@DtoUpdateHidden",
            Directive::EntityHidden => "@DtoEntityHidden",
            Directive::ApiHidden => "@DtoApiHidden",
            Directive::CreateOptional => "@DtoCreateOptional",
            Directive::UpdateOptional => "@DtoUpdateOptional",
            Directive::RelationRequired => "@DtoRelationRequired",
            Directive::RelationIncludeId => "@DtoRelationIncludeId",
            Directive::CanCreateOnCreate => "@DtoRelationCanCreateOnCreate",
            Directive::CanConnectOnCreate => "@DtoRelationCanConnectOnCreate",
            Directive::CanCreateOnUpdate => "@DtoRelationCanCreateOnUpdate",
            Directive::CanConnectOnUpdate => "@DtoRelationCanConnectOnUpdate",
            Directive::CanDisconnectOnUpdate => "@DtoRelationCanDisconnectOnUpdate",
            Directive::FullUpdate => "@DtoTypeFullUpdate",
            Directive::CastType => "@DtoCastType",
        }
    }

    const fn bit(self) -> u32 {
        1 << (self as u8)
    }
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

impl Serialize for Directive {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

/// Check whether documentation text carries a directive.
///
/// Matching is literal substring presence of the directive token.
pub fn has_directive(text: &str, directive: Directive) -> bool {
    text.contains(directive.token())
}

/// A fixed-size set of directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DirectiveSet(u32);

impl DirectiveSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Scan documentation text for every known directive.
    pub fn scan(text: &str) -> Self {
        Directive::ALL
            .into_iter()
            .filter(|d| has_directive(text, *d))
            .collect()
    }

    /// Add a directive.
    pub const fn with(self, directive: Directive) -> Self {
        Self(self.0 | directive.bit())
    }

    /// Check membership.
    pub const fn contains(self, directive: Directive) -> bool {
        self.0 & directive.bit() != 0
    }

    /// Check if the set is empty.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over the members in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Directive> {
        Directive::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Directive> for DirectiveSet {
    fn from_iter<I: IntoIterator<Item = Directive>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl Serialize for DirectiveSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Replacement type carried by `@DtoCastType(Type, ImportPath, ImportName)`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastType {
    /// Type expression emitted in place of the schema type.
    pub type_name: String,
    /// Module the type is imported from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_from: Option<String>,
    /// Exported name to import, when it differs from the type expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_name: Option<String>,
}

impl CastType {
    /// Extract the cast payload from documentation text.
    ///
    /// Returns `Ok(None)` when the directive is absent and `Err` with a
    /// description when the directive is present but has no usable payload.
    pub fn parse(text: &str) -> Result<Option<Self>, String> {
        let token = Directive::CastType.token();
        let Some(start) = text.find(token) else {
            return Ok(None);
        };

        let rest = text[start + token.len()..].trim_start();
        let Some(body) = rest.strip_prefix('(') else {
            return Err(format!("{} expects a parenthesised type", token));
        };

        let args = split_arguments(body).ok_or_else(|| format!("unclosed {}(...)", token))?;
        let mut args = args.into_iter();

        let type_name = args.next().unwrap_or_default();
        if type_name.is_empty() {
            return Err(format!("{} is missing the replacement type", token));
        }

        let import_from = args.next().map(unquote).filter(|s| !s.is_empty());
        let import_name = args.next().map(unquote).filter(|s| !s.is_empty());

        Ok(Some(Self {
            type_name,
            import_from,
            import_name,
        }))
    }
}

/// Split the text after an opening parenthesis into top-level arguments.
///
/// Returns `None` if the closing parenthesis is missing.
fn split_arguments(body: &str) -> Option<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for ch in body.chars() {
        match ch {
            ')' if depth == 0 => {
                args.push(current.trim().to_string());
                return Some(args);
            }
            ',' if depth == 0 => {
                args.push(current.trim().to_string());
                current.clear();
                continue;
            }
            '<' | '(' | '[' | '{' => depth += 1,
            '>' | ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        current.push(ch);
    }

    None
}

fn unquote(arg: String) -> String {
    let trimmed = arg.trim();
    for quote in ['\'', '"', '`'] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|s| s.strip_suffix(quote))
        {
            return inner.to_string();
        }
    }
    trimmed.to_string()
}
