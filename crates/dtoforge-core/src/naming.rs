//! Class names and file stems per shape.

use crate::config::NamingConfig;
use crate::shape::Shape;
use convert_case::{Case, Casing};

impl NamingConfig {
    /// Class name of a model's shape.
    pub fn class_name(&self, shape: Shape, model: &str) -> String {
        let pascal = model.to_case(Case::Pascal);
        match shape {
            Shape::Plain => format!("{}{}", pascal, self.dto_suffix),
            Shape::Create => format!("{}{}{}", self.create_prefix, pascal, self.dto_suffix),
            Shape::Update => format!("{}{}{}", self.update_prefix, pascal, self.dto_suffix),
            Shape::Connect => format!("{}{}{}", self.connect_prefix, pascal, self.dto_suffix),
            Shape::Entity => format!("{}{}{}", self.entity_prefix, pascal, self.entity_suffix),
        }
    }

    /// File name of a model's shape, without the `.ts` extension.
    pub fn file_stem(&self, shape: Shape, model: &str) -> String {
        let style = self.file_style;
        match shape {
            Shape::Plain => format!("{}.dto", style.apply(model)),
            Shape::Create => format!("{}.dto", style.apply(&format!("{}{}", self.create_prefix, model))),
            Shape::Update => format!("{}.dto", style.apply(&format!("{}{}", self.update_prefix, model))),
            Shape::Connect => {
                format!("{}.dto", style.apply(&format!("{}{}", self.connect_prefix, model)))
            }
            Shape::Entity => format!(
                "{}.entity",
                style.apply(&format!("{}{}{}", self.entity_prefix, model, self.entity_suffix))
            ),
        }
    }

    /// Directory name of a model in the resource layout.
    pub fn resource_dir(&self, model: &str) -> String {
        self.file_style.apply(model)
    }
}

/// Constant name under which an enum's values are listed.
pub fn enum_const_name(name: &str) -> String {
    name.to_case(Case::Camel)
}
