// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Plain-text tree view of an opaque JSON payload.
//!
//! Values are shown as they are; nothing here knows what a metric means.

use serde_json::Value;

pub const NO_DATA_PLACEHOLDER: &str = "No data loaded";
pub const NULL_PLACEHOLDER: &str = "—";

/// Arrays longer than this show their first items followed by `… N more`.
pub const MAX_ARRAY_ITEMS: usize = 8;

const INLINE_ARRAY_MAX_WIDTH: usize = 48;
const INDENT: &str = "  ";

/// Lines of the panel body for `payload`; `None` renders the placeholder.
pub fn panel_lines(payload: Option<&Value>) -> Vec<String> {
    let Some(value) = payload else {
        return vec![NO_DATA_PLACEHOLDER.to_owned()];
    };

    let mut out = Vec::new();
    match nested(value) {
        Some(Nested::Object(map)) => push_object(&mut out, map, 0),
        Some(Nested::Array(items)) => push_array(&mut out, items, 0),
        None => out.push(render_leaf(value)),
    }
    out
}

fn push_object(out: &mut Vec<String>, map: &serde_json::Map<String, Value>, depth: usize) {
    let pad = INDENT.repeat(depth);
    for (key, value) in map {
        match nested(value) {
            Some(Nested::Object(inner)) => {
                out.push(format!("{pad}{key}:"));
                push_object(out, inner, depth + 1);
            }
            Some(Nested::Array(items)) => {
                out.push(format!("{pad}{key}:"));
                push_array(out, items, depth + 1);
            }
            None => out.push(format!("{pad}{key}: {}", render_leaf(value))),
        }
    }
}

fn push_array(out: &mut Vec<String>, items: &[Value], depth: usize) {
    let pad = INDENT.repeat(depth);
    for item in items.iter().take(MAX_ARRAY_ITEMS) {
        match nested(item) {
            Some(Nested::Object(inner)) => {
                out.push(format!("{pad}-"));
                push_object(out, inner, depth + 1);
            }
            Some(Nested::Array(inner)) => {
                out.push(format!("{pad}-"));
                push_array(out, inner, depth + 1);
            }
            None => out.push(format!("{pad}- {}", render_leaf(item))),
        }
    }
    if items.len() > MAX_ARRAY_ITEMS {
        out.push(format!("{pad}… {} more", items.len() - MAX_ARRAY_ITEMS));
    }
}

enum Nested<'a> {
    Object(&'a serde_json::Map<String, Value>),
    Array(&'a [Value]),
}

/// Containers that need their own lines; empty or short scalar containers stay inline.
fn nested(value: &Value) -> Option<Nested<'_>> {
    match value {
        Value::Object(map) if !map.is_empty() => Some(Nested::Object(map)),
        Value::Array(items) if !items.is_empty() && inline_array(items).is_none() => {
            Some(Nested::Array(items))
        }
        _ => None,
    }
}

fn render_leaf(value: &Value) -> String {
    match value {
        Value::Null => NULL_PLACEHOLDER.to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Object(_) => "{}".to_owned(),
        Value::Array(items) => inline_array(items).unwrap_or_else(|| "[]".to_owned()),
    }
}

/// `[a, b, c]` when every item is a scalar and the result is short enough.
fn inline_array(items: &[Value]) -> Option<String> {
    if items.len() > MAX_ARRAY_ITEMS {
        return None;
    }
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Object(_) | Value::Array(_) => return None,
            scalar => parts.push(render_leaf(scalar)),
        }
    }
    let rendered = format!("[{}]", parts.join(", "));
    (rendered.chars().count() <= INLINE_ARRAY_MAX_WIDTH).then_some(rendered)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{panel_lines, MAX_ARRAY_ITEMS, NO_DATA_PLACEHOLDER, NULL_PLACEHOLDER};

    #[test]
    fn missing_payload_renders_placeholder() {
        assert_eq!(panel_lines(None), vec![NO_DATA_PLACEHOLDER]);
    }

    #[test]
    fn null_payload_renders_dash() {
        assert_eq!(panel_lines(Some(&json!(null))), vec![NULL_PLACEHOLDER]);
    }

    #[test]
    fn objects_render_as_key_value_tree() {
        let value = json!({
            "a": 1,
            "b": [2, 3],
            "timing": { "total_ms": 12.5, "skipped": null },
        });
        assert_eq!(
            panel_lines(Some(&value)),
            vec!["a: 1", "b: [2, 3]", "timing:", "  total_ms: 12.5", "  skipped: —"]
        );
    }

    #[test]
    fn object_keys_keep_file_order() {
        let value: serde_json::Value =
            serde_json::from_str(r#"{"rmse": 0.4, "frames": 12, "aligned": true}"#).unwrap();
        assert_eq!(panel_lines(Some(&value)), vec!["rmse: 0.4", "frames: 12", "aligned: true"]);
    }

    #[test]
    fn arrays_of_objects_are_listed() {
        let value = json!([{ "name": "ba" }, "x"]);
        assert_eq!(panel_lines(Some(&value)), vec!["-", "  name: ba", "- x"]);
    }

    #[test]
    fn long_arrays_are_truncated() {
        let items = (0..MAX_ARRAY_ITEMS + 3).collect::<Vec<_>>();
        let lines = panel_lines(Some(&json!({ "residuals": items })));
        assert_eq!(lines[0], "residuals:");
        assert_eq!(lines.len(), 1 + MAX_ARRAY_ITEMS + 1);
        assert_eq!(lines.last().unwrap(), "  … 3 more");
    }

    #[test]
    fn scalars_and_empty_containers_are_single_lines() {
        assert_eq!(panel_lines(Some(&json!("ok"))), vec!["ok"]);
        assert_eq!(panel_lines(Some(&json!({}))), vec!["{}"]);
        assert_eq!(panel_lines(Some(&json!([]))), vec!["[]"]);
        assert_eq!(panel_lines(Some(&json!({"e": {}}))), vec!["e: {}"]);
    }
}
