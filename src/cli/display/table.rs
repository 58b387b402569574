//! Table rendering for CLI output

use super::{AttributeIcon, ColorTheme};
use crate::domain::codec::DecodedObject;
use crate::domain::schema::{ResolvedType, TypeRegistry};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render catalog types as a formatted table
    pub fn render_type_list<'a>(&self, types: impl IntoIterator<Item = &'a ResolvedType>) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("TYPE").set_alignment(CellAlignment::Left),
                Cell::new("BASE").set_alignment(CellAlignment::Left),
                Cell::new("DISCRIMINATOR").set_alignment(CellAlignment::Left),
                Cell::new("ATTRIBUTES").set_alignment(CellAlignment::Center),
            ]);

        let mut count = 0;
        for ty in types {
            count += 1;
            let base = ty.schema().base.as_deref().unwrap_or("-");
            let discriminator = match (ty.discriminator(), ty.discriminator_value()) {
                (Some(disc), Some(value)) => format!("{} = {}", disc.key(), value),
                (Some(disc), None) => format!("{} (root)", disc.key()),
                _ => "-".to_string(),
            };

            table.add_row(vec![
                Cell::new(ty.name()),
                Cell::new(base).fg(self.theme.muted),
                Cell::new(discriminator).fg(self.theme.discriminator),
                Cell::new(ty.attributes().len()).set_alignment(CellAlignment::Center),
            ]);
        }

        if count == 0 {
            return "No model types found".to_string();
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Model Catalog {} ─╮\n",
            format!("[{} types]", count).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    /// Render the flattened attributes of one type
    pub fn render_schema(&self, ty: &ResolvedType, registry: &TypeRegistry) -> String {
        let disc_name = ty.discriminator().map(|d| d.name());

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new(""),
                Cell::new("ATTRIBUTE"),
                Cell::new("WIRE KEY"),
                Cell::new("TYPE"),
                Cell::new("PRESENCE"),
                Cell::new("CONSTRAINTS"),
            ]);

        for attr in ty.attributes() {
            let is_disc = disc_name == Some(attr.name());
            let color = self.theme.get_attribute_color(attr.is_required(), is_disc);
            table.add_row(vec![
                Cell::new(AttributeIcon::get_attribute_icon(attr.is_required(), is_disc)).fg(color),
                Cell::new(attr.name()),
                Cell::new(attr.key()),
                Cell::new(attr.kind().to_string()),
                Cell::new(AttributeIcon::get_presence_text(attr.is_required(), is_disc)).fg(color),
                Cell::new(attr.spec.constraints.summary()).fg(self.theme.muted),
            ]);
        }

        let mut output = format!("{}\n", ty.name().bold());
        if let Some(ref description) = ty.schema().description {
            output.push_str(&format!("{}\n", description));
        }
        if !ty.ancestors().is_empty() {
            output.push_str(&format!("Extends: {}\n", ty.ancestors().join(" → ")));
        }
        let subtypes: Vec<&str> = registry
            .subtypes_of(ty.name())
            .into_iter()
            .map(|t| t.name())
            .collect();
        if !subtypes.is_empty() {
            output.push_str(&format!("Known subtypes: {}\n", subtypes.join(", ")));
        }
        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    /// Render a decoded object's attribute values
    pub fn render_object(&self, object: &DecodedObject, registry: &TypeRegistry) -> String {
        let resolved = registry.get(object.type_name());
        let disc_name = resolved.and_then(|t| t.discriminator()).map(|d| d.name());

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new(""),
                Cell::new("ATTRIBUTE"),
                Cell::new("VALUE"),
            ]);

        for (name, value) in object.attributes() {
            let required = resolved
                .and_then(|t| t.attribute(name))
                .is_some_and(|a| a.is_required());
            let is_disc = disc_name == Some(name);
            let color = self.theme.get_attribute_color(required, is_disc);
            let rendered = serde_json::to_string(value).unwrap_or_else(|_| "<unprintable>".to_string());
            table.add_row(vec![
                Cell::new(AttributeIcon::get_attribute_icon(required, is_disc)).fg(color),
                Cell::new(name),
                Cell::new(rendered),
            ]);
        }

        for (key, raw) in object.extra() {
            table.add_row(vec![
                Cell::new(AttributeIcon::PASS_THROUGH).fg(self.theme.pass_through),
                Cell::new(key).fg(self.theme.pass_through),
                Cell::new(raw.to_string()),
            ]);
        }

        let mut output = format!("Resolved type: {}\n", object.type_name().bold());
        output.push_str(&table.to_string());
        output.push('\n');
        output.push_str(&format!(
            "Legend: {} discriminator  {} required  {} optional  {} pass-through\n",
            AttributeIcon::DISCRIMINATOR.cyan(),
            AttributeIcon::REQUIRED.yellow(),
            AttributeIcon::OPTIONAL.green(),
            AttributeIcon::PASS_THROUGH.magenta()
        ));
        output
    }
}
