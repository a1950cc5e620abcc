//! Markdown rendering for injected data.
//!
//! Dynamic instruction callbacks often need to show a record to the model.
//! [`to_markdown`] turns any serializable value into a nested bullet list,
//! which models read more reliably than raw JSON.

use serde::Serialize;
use serde_json::Value;

/// Renders a serializable value as a markdown bullet list.
///
/// Objects become `- **key**: value` bullets, nesting for objects and arrays.
/// Scalars render via their JSON form minus string quotes. Serialization
/// failures render as a placeholder instead of failing the caller.
pub fn to_markdown<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(value) => {
            let mut out = String::new();
            render_value(&value, 0, &mut out);
            out.trim_end().to_string()
        }
        Err(err) => format!("<unserializable: {err}>"),
    }
}

fn render_value(value: &Value, indent: usize, out: &mut String) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                render_entry(Some(key), val, indent, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                render_entry(None, item, indent, out);
            }
        }
        scalar => {
            out.push_str(&scalar_text(scalar));
            out.push('\n');
        }
    }
}

fn render_entry(key: Option<&str>, value: &Value, indent: usize, out: &mut String) {
    let pad = "  ".repeat(indent);
    match value {
        Value::Object(_) | Value::Array(_) => {
            match key {
                Some(key) => out.push_str(&format!("{pad}- **{key}**:\n")),
                None => out.push_str(&format!("{pad}-\n")),
            }
            render_value(value, indent + 1, out);
        }
        scalar => match key {
            Some(key) => out.push_str(&format!("{pad}- **{key}**: {}\n", scalar_text(scalar))),
            None => out.push_str(&format!("{pad}- {}\n", scalar_text(scalar))),
        },
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_flat_object_as_bullets() {
        let rendered = to_markdown(&json!({
            "customer_id": "1",
            "name": "John Doe"
        }));

        assert!(rendered.contains("- **customer_id**: 1"));
        assert!(rendered.contains("- **name**: John Doe"));
    }

    #[test]
    fn renders_nested_records_with_indentation() {
        let rendered = to_markdown(&json!({
            "name": "John Doe",
            "orders": [
                {"order_id": "12345", "status": "shipped"}
            ]
        }));

        assert!(rendered.contains("- **orders**:"));
        assert!(rendered.contains("  -\n"));
        assert!(rendered.contains("    - **order_id**: 12345"));
    }

    #[test]
    fn renders_scalars_and_arrays() {
        assert_eq!(to_markdown(&json!("plain")), "plain");
        assert_eq!(to_markdown(&json!(42)), "42");

        let list = to_markdown(&json!(["a", "b"]));
        assert_eq!(list, "- a\n- b");
    }
}
