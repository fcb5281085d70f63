//! Command-line configuration.

use clap::{Parser, ValueEnum};
use dtoforge_core::{ConfigurationError, GeneratorConfig, NamingStyle};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default output directory.
pub const DEFAULT_OUTPUT: &str = "./src/generated";

/// Default manifest file name, relative to the output directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Casing of generated file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FileNamingStyle {
    /// createUser.dto.ts
    Camel,
    /// create-user.dto.ts
    Kebab,
    /// CreateUser.dto.ts
    Pascal,
    /// create_user.dto.ts
    Snake,
}

impl From<FileNamingStyle> for NamingStyle {
    fn from(style: FileNamingStyle) -> Self {
        match style {
            FileNamingStyle::Camel => NamingStyle::Camel,
            FileNamingStyle::Kebab => NamingStyle::Kebab,
            FileNamingStyle::Pascal => NamingStyle::Pascal,
            FileNamingStyle::Snake => NamingStyle::Snake,
        }
    }
}

/// Kind of declaration the renderer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputTypeArg {
    Class,
    Interface,
}

impl OutputTypeArg {
    fn as_str(self) -> &'static str {
        match self {
            OutputTypeArg::Class => "class",
            OutputTypeArg::Interface => "interface",
        }
    }
}

/// dtoforge - plan NestJS DTOs from an annotated schema document.
///
/// Options given here override the `generator` block of the document.
#[derive(Parser, Debug)]
#[command(name = "dtoforge")]
#[command(version, about = "Plan NestJS DTO classes from an annotated schema", long_about = None)]
pub struct Args {
    /// Schema document (JSON).
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Output directory of the generated files.
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Manifest path (defaults to <output>/manifest.json).
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Print the manifest to stdout instead of writing it.
    #[arg(long)]
    pub dry_run: bool,

    /// File naming style.
    #[arg(long, value_enum)]
    pub file_naming_style: Option<FileNamingStyle>,

    /// Class name prefix of Connect DTOs.
    #[arg(long)]
    pub connect_dto_prefix: Option<String>,

    /// Class name prefix of Create DTOs.
    #[arg(long)]
    pub create_dto_prefix: Option<String>,

    /// Class name prefix of Update DTOs.
    #[arg(long)]
    pub update_dto_prefix: Option<String>,

    /// Class name suffix of DTOs.
    #[arg(long)]
    pub dto_suffix: Option<String>,

    /// Class name prefix of entities.
    #[arg(long)]
    pub entity_prefix: Option<String>,

    /// Class name suffix of entities.
    #[arg(long)]
    pub entity_suffix: Option<String>,

    /// Group files per resource, NestJS style.
    #[arg(long)]
    pub resource_structure: Option<bool>,

    /// Keep DTOs and entities side by side inside each resource directory.
    #[arg(long)]
    pub flat_resource_structure: Option<bool>,

    /// Emit classes or interfaces.
    #[arg(long, value_enum)]
    pub output_type: Option<OutputTypeArg>,

    /// Add class-validator decorators.
    #[arg(long)]
    pub class_validation: Option<bool>,

    /// Emit plain types without decorator imports.
    #[arg(long)]
    pub no_dependencies: Option<bool>,

    /// Mark required class properties with a definite assignment assertion.
    #[arg(long)]
    pub definite_assignment_assertion: Option<bool>,

    /// Mark required entity properties as required in the API docs.
    #[arg(long)]
    pub required_response_api_property: Option<bool>,

    /// Export the nested relation input classes.
    #[arg(long)]
    pub export_relation_modifier_classes: Option<bool>,

    /// Format rendered files with prettier.
    #[arg(long)]
    pub prettier: Option<bool>,

    /// Plan an index.ts per output directory.
    #[arg(long)]
    pub re_export: Option<bool>,

    /// Output directory of the Prisma client, if not in node_modules.
    #[arg(long)]
    pub prisma_client_output: Option<PathBuf>,
}

impl Args {
    /// Merge the flags over the document's generator options and build the
    /// generator configuration.
    pub fn resolve(
        &self,
        mut options: BTreeMap<String, String>,
    ) -> dtoforge_core::Result<(GeneratorConfig, Vec<ConfigurationError>)> {
        let mut set = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                options.insert(key.to_string(), value);
            }
        };

        set("connectDtoPrefix", self.connect_dto_prefix.clone());
        set("createDtoPrefix", self.create_dto_prefix.clone());
        set("updateDtoPrefix", self.update_dto_prefix.clone());
        set("dtoSuffix", self.dto_suffix.clone());
        set("entityPrefix", self.entity_prefix.clone());
        set("entitySuffix", self.entity_suffix.clone());
        set(
            "fileNamingStyle",
            self.file_naming_style
                .map(|style| NamingStyle::from(style).to_string()),
        );
        set(
            "outputToNestJsResourceStructure",
            self.resource_structure.map(|flag| flag.to_string()),
        );
        set(
            "flatResourceStructure",
            self.flat_resource_structure.map(|flag| flag.to_string()),
        );
        set(
            "outputType",
            self.output_type.map(|kind| kind.as_str().to_string()),
        );

        let flags = [
            ("classValidation", self.class_validation),
            ("noDependencies", self.no_dependencies),
            ("definiteAssignmentAssertion", self.definite_assignment_assertion),
            ("requiredResponseApiProperty", self.required_response_api_property),
            ("exportRelationModifierClasses", self.export_relation_modifier_classes),
            ("prettier", self.prettier),
            ("reExport", self.re_export),
        ];
        for (key, flag) in flags {
            set(key, flag.map(|flag| flag.to_string()));
        }
        set(
            "prismaClientOutput",
            self.prisma_client_output
                .as_ref()
                .map(|path| path.display().to_string()),
        );

        GeneratorConfig::from_options(self.output.clone(), &options)
    }

    /// Where the manifest is written.
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest
            .clone()
            .unwrap_or_else(|| self.output.join(MANIFEST_FILE))
    }
}
