//! Output directories and relative reference paths.

use crate::config::{GeneratorConfig, OutputLayout};
use crate::shape::Shape;
use std::path::{Component, Path, PathBuf};

/// Where a model's files are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Directory of Plain, Create, Update and Connect files.
    pub dto_dir: PathBuf,
    /// Directory of the Entity file.
    pub entity_dir: PathBuf,
}

/// Compute the output directories of a model.
pub fn locate(config: &GeneratorConfig, model: &str) -> Location {
    match config.layout {
        OutputLayout::Flat => Location {
            dto_dir: config.output.clone(),
            entity_dir: config.output.clone(),
        },
        OutputLayout::Resource { flat } => {
            let resource = config.output.join(config.naming.resource_dir(model));
            if flat {
                Location {
                    dto_dir: resource.clone(),
                    entity_dir: resource,
                }
            } else {
                Location {
                    dto_dir: resource.join("dto"),
                    entity_dir: resource.join("entities"),
                }
            }
        }
    }
}

/// Output directory of one shape of a model.
pub fn shape_dir(config: &GeneratorConfig, model: &str, shape: Shape) -> PathBuf {
    let location = locate(config, model);
    match shape {
        Shape::Entity => location.entity_dir,
        _ => location.dto_dir,
    }
}

/// Planned file path of one shape of a model.
pub fn shape_file(config: &GeneratorConfig, model: &str, shape: Shape) -> PathBuf {
    shape_dir(config, model, shape).join(format!("{}.ts", config.naming.file_stem(shape, model)))
}

/// Relative path from one directory to another, `/`-separated.
///
/// Returns `.` when both are the same directory and prefixes downward paths
/// with `./` so the result is always usable as a relative module specifier.
pub fn relative_dir(from: &Path, to: &Path) -> String {
    let from = normalize(from);
    let to = normalize(to);

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    parts.extend(std::iter::repeat("..").take(from.len() - common));
    parts.extend(to[common..].iter().map(String::as_str));

    if parts.is_empty() {
        ".".to_string()
    } else if parts[0] == ".." {
        parts.join("/")
    } else {
        format!("./{}", parts.join("/"))
    }
}

/// Module specifier for a file stem in a relative directory.
pub fn module_specifier(relative: &str, stem: &str) -> String {
    format!("{}/{}", relative, stem)
}

fn normalize(path: &Path) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.last().is_some_and(|p| p != "..") {
                    parts.pop();
                } else {
                    parts.push("..".to_string());
                }
            }
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::RootDir | Component::Prefix(_) => parts.clear(),
        }
    }
    parts
}
