//! Block expansion and placeholder substitution

use serde_json::Value;

use super::parser::Node;
use super::value::{is_truthy, item_to_string, resolve, scalar_to_string};

/// Escaping policy for substituted values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Subject, text, SMS and push output. Values are inserted as-is.
    #[default]
    Plain,

    /// HTML output. Every substituted value is entity-escaped.
    Html,
}

impl OutputMode {
    fn apply(self, value: &str, out: &mut String) {
        match self {
            OutputMode::Plain => out.push_str(value),
            OutputMode::Html => escape_html_into(value, out),
        }
    }
}

/// Escape `&`, `<`, `>`, `"` and `'` as HTML entities.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    escape_html_into(value, &mut out);
    out
}

fn escape_html_into(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// Render parsed instructions against the top-level variable bag.
pub fn render_nodes(nodes: &[Node], variables: &Value, mode: OutputMode) -> String {
    let mut out = String::new();
    render_into(nodes, variables, mode, &mut out);
    out
}

/// Conditional bodies render in the same scope as the enclosing template.
fn render_into(nodes: &[Node], variables: &Value, mode: OutputMode, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Variable(path) => {
                mode.apply(&scalar_to_string(resolve(path, variables)), out);
            }
            // Only produced inside loop bodies; unreachable at the top level.
            Node::CurrentItem => {}
            Node::If { path, body } => {
                if is_truthy(resolve(path, variables)) {
                    render_into(body, variables, mode, out);
                }
            }
            Node::Each { path, body } => {
                if let Some(Value::Array(items)) = resolve(path, variables) {
                    for item in items {
                        render_item(body, item, mode, out);
                    }
                }
            }
        }
    }
}

/// Loop bodies resolve placeholders against the current item only.
fn render_item(body: &[Node], item: &Value, mode: OutputMode, out: &mut String) {
    for node in body {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::CurrentItem => mode.apply(&item_to_string(Some(item)), out),
            Node::Variable(path) => mode.apply(&item_to_string(resolve(path, item)), out),
            _ => {}
        }
    }
}
