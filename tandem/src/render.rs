//! Markdown renderer
//!
//! Renders a form projection as a small markdown document: the converter
//! tabs, then one table row per field.

use crate::{FieldView, FormView};

/// Form renderer
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Render the form
    pub fn render(&self, view: &FormView) -> String {
        let mut output = String::new();

        output.push_str(&format!("## {}\n\n", view.converter_name));

        let tabs: Vec<String> = view
            .converters
            .iter()
            .map(|c| {
                if c.id == view.active_converter {
                    format!("**{}**", c.name)
                } else {
                    c.name.to_string()
                }
            })
            .collect();
        output.push_str(&format!("Converters: {}\n\n", tabs.join(" | ")));

        output.push_str("| field | value | unit |\n");
        output.push_str("|-------|-------|------|\n");
        output.push_str(&self.render_field("left", &view.left));
        output.push_str(&self.render_field("right", &view.right));

        output
    }

    fn render_field(&self, name: &str, field: &FieldView) -> String {
        format!(
            "| {} | {} | {} |\n",
            name,
            escape_cell(&field.raw_text),
            field.label
        )
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep raw user text from breaking the table
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Form;
    use std::sync::Arc;

    #[test]
    fn test_render_form() {
        let mut form = Form::new(Arc::new(tandem_units::standard_registry())).unwrap();
        form.set_left_value("0").unwrap();

        let markdown = Renderer::new().render(&form.view());
        assert!(markdown.starts_with("## Temperature\n"));
        assert!(markdown.contains("Converters: **Temperature** | Weight"));
        assert!(markdown.contains("| left | 0 | Celsius (°C) |"));
        assert!(markdown.contains("| right | 32.00 | Fahrenheit (°F) |"));
    }

    #[test]
    fn test_render_escapes_pipes() {
        let mut form = Form::new(Arc::new(tandem_units::standard_registry())).unwrap();
        form.set_left_value("1|2").unwrap();

        let markdown = Renderer::new().render(&form.view());
        assert!(markdown.contains("| left | 1\\|2 |"));
    }
}
