//! Run-wide generator configuration.
//!
//! One immutable [`GeneratorConfig`] is threaded through every call of a
//! generation run. It is built from defaults, then from the string-valued
//! options of the schema document, then from command-line overrides.

use crate::diagnostics::{ConfigurationError, ConfigurationErrorKind};
use crate::error::{Error, Result};
use crate::layout;
use convert_case::{Case, Casing};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Default class name prefix for Connect DTOs.
pub const DEFAULT_CONNECT_PREFIX: &str = "Connect";

/// Default class name prefix for Create DTOs.
pub const DEFAULT_CREATE_PREFIX: &str = "Create";

/// Default class name prefix for Update DTOs.
pub const DEFAULT_UPDATE_PREFIX: &str = "Update";

/// Default class name suffix for DTOs.
pub const DEFAULT_DTO_SUFFIX: &str = "Dto";

/// Casing applied to generated file and directory names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingStyle {
    /// `createUser`
    #[default]
    Camel,
    /// `create-user`
    Kebab,
    /// `CreateUser`
    Pascal,
    /// `create_user`
    Snake,
}

impl NamingStyle {
    /// Accepted option values.
    pub const VARIANTS: [&'static str; 4] = ["kebab", "camel", "pascal", "snake"];

    /// Apply the casing to a name.
    pub fn apply(self, name: &str) -> String {
        let case = match self {
            NamingStyle::Camel => Case::Camel,
            NamingStyle::Kebab => Case::Kebab,
            NamingStyle::Pascal => Case::Pascal,
            NamingStyle::Snake => Case::Snake,
        };
        name.to_case(case)
    }

    /// Lowercase option value.
    pub const fn as_str(self) -> &'static str {
        match self {
            NamingStyle::Camel => "camel",
            NamingStyle::Kebab => "kebab",
            NamingStyle::Pascal => "pascal",
            NamingStyle::Snake => "snake",
        }
    }
}

impl FromStr for NamingStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "camel" => Ok(NamingStyle::Camel),
            "kebab" => Ok(NamingStyle::Kebab),
            "pascal" => Ok(NamingStyle::Pascal),
            "snake" => Ok(NamingStyle::Snake),
            other => Err(Error::invalid_option(
                "file naming style",
                other,
                &Self::VARIANTS,
            )),
        }
    }
}

impl std::fmt::Display for NamingStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class name prefixes/suffixes and file naming style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamingConfig {
    pub connect_prefix: String,
    pub create_prefix: String,
    pub update_prefix: String,
    pub dto_suffix: String,
    pub entity_prefix: String,
    pub entity_suffix: String,
    pub file_style: NamingStyle,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            connect_prefix: DEFAULT_CONNECT_PREFIX.to_string(),
            create_prefix: DEFAULT_CREATE_PREFIX.to_string(),
            update_prefix: DEFAULT_UPDATE_PREFIX.to_string(),
            dto_suffix: DEFAULT_DTO_SUFFIX.to_string(),
            entity_prefix: String::new(),
            entity_suffix: String::new(),
            file_style: NamingStyle::default(),
        }
    }
}

/// Directory layout of the generated files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase", tag = "mode")]
pub enum OutputLayout {
    /// Every file in the output root.
    #[default]
    Flat,
    /// One directory per resource, as laid out by NestJS resource modules.
    ///
    /// With `flat` unset, DTOs go to `<resource>/dto` and entities to
    /// `<resource>/entities`; with `flat` set, both live in `<resource>`.
    Resource { flat: bool },
}

/// Module the generated files import Prisma types from by default.
pub const DEFAULT_PRISMA_CLIENT_IMPORT_PATH: &str = "@prisma/client";

/// Kind of TypeScript declaration emitted per shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    #[default]
    Class,
    Interface,
}

impl FromStr for OutputType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "class" => Ok(OutputType::Class),
            "interface" => Ok(OutputType::Interface),
            other => Err(Error::InvalidOption {
                option: "output type".to_string(),
                value: other.to_string(),
                expected: "'class' and 'interface'".to_string(),
            }),
        }
    }
}

/// Options the planner does not interpret but hands to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    pub output_type: OutputType,
    /// Emit class-validator decorators.
    pub class_validation: bool,
    /// Emit plain types without Swagger or validator imports.
    pub no_dependencies: bool,
    /// Mark required class properties with `!`.
    pub definite_assignment_assertion: bool,
    /// Mark required Entity properties as required in `@ApiProperty`.
    pub required_response_api_property: bool,
    /// Export the nested relation input classes.
    pub export_relation_modifier_classes: bool,
    /// Format the rendered files with prettier.
    pub prettier: bool,
    /// Plan an `index.ts` barrel per output directory.
    pub re_export: bool,
    /// Module specifier used to import Prisma types.
    pub prisma_client_import_path: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            output_type: OutputType::default(),
            class_validation: false,
            no_dependencies: false,
            definite_assignment_assertion: false,
            required_response_api_property: true,
            export_relation_modifier_classes: true,
            prettier: false,
            re_export: false,
            prisma_client_import_path: DEFAULT_PRISMA_CLIENT_IMPORT_PATH.to_string(),
        }
    }
}

impl RenderOptions {
    /// Reject option combinations the renderer cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.class_validation && self.output_type != OutputType::Class {
            return Err(Error::ConflictingOptions(
                "To use 'validation' validation decorators, 'outputType' must be 'class'.".into(),
            ));
        }
        if self.class_validation && self.no_dependencies {
            return Err(Error::ConflictingOptions(
                "To use 'validation' validation decorators, 'noDependencies' cannot be false."
                    .into(),
            ));
        }
        if self.definite_assignment_assertion && self.output_type != OutputType::Class {
            return Err(Error::ConflictingOptions(
                "To use 'definiteAssignmentAssertion', 'outputType' must be 'class'.".into(),
            ));
        }
        Ok(())
    }
}

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Output root directory.
    pub output: PathBuf,
    /// Naming policy.
    pub naming: NamingConfig,
    /// Directory layout.
    pub layout: OutputLayout,
    /// Renderer pass-through options.
    pub render: RenderOptions,
}

impl GeneratorConfig {
    /// Create a configuration with default naming and a flat layout.
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            naming: NamingConfig::default(),
            layout: OutputLayout::default(),
            render: RenderOptions::default(),
        }
    }

    /// Set the naming policy.
    pub fn with_naming(mut self, naming: NamingConfig) -> Self {
        self.naming = naming;
        self
    }

    /// Set the file naming style.
    pub fn with_file_style(mut self, style: NamingStyle) -> Self {
        self.naming.file_style = style;
        self
    }

    /// Set the directory layout.
    pub fn with_layout(mut self, layout: OutputLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the renderer options.
    pub fn with_render(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Import path of the Prisma client as seen from a generated file.
    ///
    /// A client generated into `node_modules/@prisma/client` is imported by
    /// package name; any other location is reached relative to the file.
    pub fn prisma_client_import_path(&self, client_output: Option<&Path>) -> String {
        let client = match client_output {
            Some(path) if !path.ends_with("node_modules/@prisma/client") => path,
            _ => return DEFAULT_PRISMA_CLIENT_IMPORT_PATH.to_string(),
        };

        let depth = match self.layout {
            OutputLayout::Flat => "",
            OutputLayout::Resource { flat: true } => "../",
            OutputLayout::Resource { flat: false } => "../../",
        };
        let relative = layout::relative_dir(&self.output, client);
        let relative = match relative.as_str() {
            "." => "",
            other => other.strip_prefix("./").unwrap_or(other),
        };

        let path = format!("{}{}", depth, relative);
        if path.starts_with('.') {
            path
        } else {
            format!("./{}", path)
        }
    }

    /// Build a configuration from string-valued generator options.
    ///
    /// Unknown keys are ignored. Returns the configuration together with any
    /// conflicting options that were resolved along the way. Renderer
    /// options that cannot be combined abort with an error.
    pub fn from_options(
        output: impl Into<PathBuf>,
        options: &BTreeMap<String, String>,
    ) -> Result<(Self, Vec<ConfigurationError>)> {
        let mut config = Self::new(output);
        let mut diagnostics = Vec::new();

        let text = |key: &str, default: &str| {
            options
                .get(key)
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };

        config.naming = NamingConfig {
            connect_prefix: text("connectDtoPrefix", DEFAULT_CONNECT_PREFIX),
            create_prefix: text("createDtoPrefix", DEFAULT_CREATE_PREFIX),
            update_prefix: text("updateDtoPrefix", DEFAULT_UPDATE_PREFIX),
            dto_suffix: text("dtoSuffix", DEFAULT_DTO_SUFFIX),
            entity_prefix: text("entityPrefix", ""),
            entity_suffix: text("entitySuffix", ""),
            file_style: match options.get("fileNamingStyle") {
                Some(style) => style.parse()?,
                None => NamingStyle::default(),
            },
        };

        let resource = flag(options, "outputToNestJsResourceStructure", false);
        let flat = flag(options, "flatResourceStructure", false);
        config.layout = if resource {
            OutputLayout::Resource { flat }
        } else {
            if flat {
                diagnostics.push(ConfigurationError::global(
                    ConfigurationErrorKind::ResourceFlagWithoutResourceLayout,
                    "flatResourceStructure has no effect without outputToNestJsResourceStructure",
                ));
            }
            OutputLayout::Flat
        };

        let output_type = match options.get("outputType") {
            Some(value) => value.parse()?,
            None => OutputType::default(),
        };
        let client_output = options.get("prismaClientOutput").map(PathBuf::from);
        config.render = RenderOptions {
            output_type,
            class_validation: flag(options, "classValidation", false),
            no_dependencies: flag(options, "noDependencies", false),
            definite_assignment_assertion: flag(options, "definiteAssignmentAssertion", false),
            required_response_api_property: flag(options, "requiredResponseApiProperty", true),
            export_relation_modifier_classes: flag(
                options,
                "exportRelationModifierClasses",
                true,
            ),
            prettier: flag(options, "prettier", false),
            re_export: flag(options, "reExport", false),
            prisma_client_import_path: config
                .prisma_client_import_path(client_output.as_deref()),
        };
        config.render.validate()?;

        for key in options.keys().filter(|k| !KNOWN_OPTIONS.contains(&k.as_str())) {
            debug!(option = %key, "ignoring generator option");
        }

        Ok((config, diagnostics))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new("./generated")
    }
}

const KNOWN_OPTIONS: [&str; 18] = [
    "connectDtoPrefix",
    "createDtoPrefix",
    "updateDtoPrefix",
    "dtoSuffix",
    "entityPrefix",
    "entitySuffix",
    "fileNamingStyle",
    "outputToNestJsResourceStructure",
    "flatResourceStructure",
    "outputType",
    "classValidation",
    "noDependencies",
    "definiteAssignmentAssertion",
    "requiredResponseApiProperty",
    "exportRelationModifierClasses",
    "prettier",
    "reExport",
    "prismaClientOutput",
];

/// Only the literal strings `true` and `false` are understood; anything else
/// falls back to the default.
fn flag(options: &BTreeMap<String, String>, key: &str, default: bool) -> bool {
    match options.get(key).map(String::as_str) {
        Some("true") => true,
        Some("false") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();

        assert_eq!(config.output, PathBuf::from("./generated"));
        assert_eq!(config.layout, OutputLayout::Flat);
        assert_eq!(config.naming.create_prefix, "Create");
        assert_eq!(config.naming.dto_suffix, "Dto");
        assert_eq!(config.naming.file_style, NamingStyle::Camel);
    }

    #[test]
    fn test_config_builder() {
        let config = GeneratorConfig::new("out")
            .with_file_style(NamingStyle::Kebab)
            .with_layout(OutputLayout::Resource { flat: true });

        assert_eq!(config.naming.file_style, NamingStyle::Kebab);
        assert_eq!(config.layout, OutputLayout::Resource { flat: true });
    }

    #[test]
    fn test_from_options() {
        let (config, diagnostics) = GeneratorConfig::from_options(
            "out",
            &options(&[
                ("createDtoPrefix", "New"),
                ("entitySuffix", "Entity"),
                ("fileNamingStyle", "snake"),
                ("outputToNestJsResourceStructure", "true"),
                ("emitCompositeTypes", "true"),
            ]),
        )
        .unwrap();

        assert!(diagnostics.is_empty());
        assert_eq!(config.naming.create_prefix, "New");
        assert_eq!(config.naming.update_prefix, "Update");
        assert_eq!(config.naming.entity_suffix, "Entity");
        assert_eq!(config.naming.file_style, NamingStyle::Snake);
        assert_eq!(config.layout, OutputLayout::Resource { flat: false });
        assert_eq!(config.render, RenderOptions::default());
    }

    #[test]
    fn test_render_options_from_options() {
        let (config, _) = GeneratorConfig::from_options(
            "out",
            &options(&[
                ("classValidation", "true"),
                ("requiredResponseApiProperty", "false"),
                ("exportRelationModifierClasses", "no"),
                ("prettier", "true"),
                ("reExport", "true"),
            ]),
        )
        .unwrap();

        assert_eq!(config.render.output_type, OutputType::Class);
        assert!(config.render.class_validation);
        assert!(!config.render.required_response_api_property);
        assert!(config.render.export_relation_modifier_classes);
        assert!(config.render.prettier);
        assert!(config.render.re_export);
        assert_eq!(config.render.prisma_client_import_path, "@prisma/client");
    }

    #[test]
    fn test_invalid_output_type() {
        let err = GeneratorConfig::from_options(
            "out",
            &options(&[
                ("outputType", "bogus"),
                ("classValidation", "true"),
                ("noDependencies", "true"),
                ("reExport", "true"),
            ]),
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "'bogus' is not a valid output type. Valid options are 'class' and 'interface'."
        );
    }

    #[test]
    fn test_conflicting_render_options() {
        let reject = |pairs: &[(&str, &str)]| {
            GeneratorConfig::from_options("out", &options(pairs))
                .unwrap_err()
                .to_string()
        };

        assert_eq!(
            reject(&[("outputType", "interface"), ("classValidation", "true")]),
            "To use 'validation' validation decorators, 'outputType' must be 'class'."
        );
        assert_eq!(
            reject(&[("classValidation", "true"), ("noDependencies", "true")]),
            "To use 'validation' validation decorators, 'noDependencies' cannot be false."
        );
        assert_eq!(
            reject(&[("outputType", "interface"), ("definiteAssignmentAssertion", "true")]),
            "To use 'definiteAssignmentAssertion', 'outputType' must be 'class'."
        );

        let (config, _) = GeneratorConfig::from_options(
            "out",
            &options(&[("outputType", "interface"), ("noDependencies", "true")]),
        )
        .unwrap();
        assert_eq!(config.render.output_type, OutputType::Interface);
    }

    #[test]
    fn test_prisma_client_import_path() {
        let flat = GeneratorConfig::new("src/generated");
        let resource = flat.clone().with_layout(OutputLayout::Resource { flat: false });
        let resource_flat = flat.clone().with_layout(OutputLayout::Resource { flat: true });
        let client = Path::new("src/prisma/client");

        assert_eq!(flat.prisma_client_import_path(None), "@prisma/client");
        assert_eq!(
            flat.prisma_client_import_path(Some(Path::new("node_modules/@prisma/client"))),
            "@prisma/client"
        );
        assert_eq!(flat.prisma_client_import_path(Some(client)), "../prisma/client");
        assert_eq!(
            resource.prisma_client_import_path(Some(client)),
            "../../../prisma/client"
        );
        assert_eq!(
            resource_flat.prisma_client_import_path(Some(client)),
            "../../prisma/client"
        );
        assert_eq!(
            flat.prisma_client_import_path(Some(Path::new("src/generated/client"))),
            "./client"
        );
    }

    #[test]
    fn test_prisma_client_output_option() {
        let (config, _) = GeneratorConfig::from_options(
            "src/generated",
            &options(&[("prismaClientOutput", "src/client")]),
        )
        .unwrap();

        assert_eq!(config.render.prisma_client_import_path, "../client");
    }

    #[test]
    fn test_invalid_naming_style() {
        let err = GeneratorConfig::from_options("out", &options(&[("fileNamingStyle", "upper")]))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "'upper' is not a valid file naming style. Valid options are 'kebab', 'camel', 'pascal', 'snake'."
        );
    }

    #[test]
    fn test_flat_flag_without_resource_layout() {
        let (config, diagnostics) =
            GeneratorConfig::from_options("out", &options(&[("flatResourceStructure", "true")]))
                .unwrap();

        assert_eq!(config.layout, OutputLayout::Flat);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].kind,
            ConfigurationErrorKind::ResourceFlagWithoutResourceLayout
        );
    }

    #[test]
    fn test_boolean_flags_fall_back_to_default() {
        let (config, _) = GeneratorConfig::from_options(
            "out",
            &options(&[("outputToNestJsResourceStructure", "yes")]),
        )
        .unwrap();

        assert_eq!(config.layout, OutputLayout::Flat);
    }

    #[test]
    fn test_naming_style_apply() {
        assert_eq!(NamingStyle::Camel.apply("CreateUserProfile"), "createUserProfile");
        assert_eq!(NamingStyle::Kebab.apply("CreateUserProfile"), "create-user-profile");
        assert_eq!(NamingStyle::Pascal.apply("userProfile"), "UserProfile");
        assert_eq!(NamingStyle::Snake.apply("UserProfile"), "user_profile");
    }
}
