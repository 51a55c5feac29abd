// Copyright 2026 Stockwatch Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTML stock view.
//!
//! Three category columns plus a weather banner. Purely presentational:
//! it consumes the fallback-resolved payload and never touches the cache.

use serde_json::Value;
use std::fmt::Write;
use stockwatch::{Category, ItemShape, Payload};

/// Column order on the page.
const COLUMNS: [Category; 3] = [Category::Seeds, Category::Gear, Category::Eggs];

/// Ordered `(substring, glyph)` rules; first match wins, so more specific
/// patterns must come before the ones they contain.
const GLYPH_RULES: &[(&str, &str)] = &[
    ("watermelon", "🍉"),
    ("eggplant", "🍆"),
    ("carrot", "🥕"),
    ("strawberry", "🍓"),
    ("blueberry", "🫐"),
    ("tomato", "🍅"),
    ("corn", "🌽"),
    ("apple", "🍎"),
    ("pumpkin", "🎃"),
    ("mushroom", "🍄"),
    ("pepper", "🌶️"),
    ("grape", "🍇"),
    ("bamboo", "🎋"),
    ("cactus", "🌵"),
    ("mango", "🥭"),
    ("coconut", "🥥"),
    ("cacao", "🍫"),
    ("bean", "🫘"),
    ("tulip", "🌷"),
    ("daffodil", "🌼"),
    ("egg", "🥚"),
    ("watering can", "💧"),
    ("sprinkler", "💦"),
    ("trowel", "🛠️"),
    ("wrench", "🔧"),
    ("lightning rod", "⚡"),
    ("staff", "🪄"),
    ("tool", "🧰"),
];

/// Glyph for an item name, if any rule matches.
pub fn glyph_for(name: &str) -> Option<&'static str> {
    let lower = name.to_lowercase();
    GLYPH_RULES
        .iter()
        .find(|(pattern, _)| lower.contains(pattern))
        .map(|(_, glyph)| *glyph)
}

/// Display label: glyph-prefixed when a rule matches.
pub fn decorate(name: &str) -> String {
    match glyph_for(name) {
        Some(glyph) => format!("{glyph} {name}"),
        None => name.to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("failed to format page: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Shown when rendering fails.
pub const ERROR_PAGE: &str = "<!DOCTYPE html><html><head><title>Garden Stock</title></head>\
<body style=\"font-family: Arial, sans-serif; text-align: center; padding: 40px;\">\
<h1>Garden Stock</h1><p>Stock data is temporarily unavailable. Please refresh shortly.</p>\
</body></html>";

/// Render the full page.
///
/// `sample` marks the payload as placeholder data so the page says so.
pub fn render_page<T: ItemShape>(
    payload: &Payload<T>,
    weather: &Value,
    sample: bool,
) -> Result<String, ViewError> {
    let mut html = String::with_capacity(4096);
    write_page(&mut html, payload, weather, sample)?;
    Ok(html)
}

/// Write the full page into `out`.
pub fn write_page<T: ItemShape, W: Write>(
    out: &mut W,
    payload: &Payload<T>,
    weather: &Value,
    sample: bool,
) -> Result<(), ViewError> {
    out.write_str(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta http-equiv="refresh" content="10">
    <title>Garden Stock</title>
    <style>
        body { font-family: Arial, sans-serif; padding: 20px; text-align: center; }
        .weather { margin-bottom: 16px; padding: 8px; background: #eef6ff; border-radius: 6px; }
        .sample { color: #a15c00; }
        .container { display: flex; justify-content: space-around; }
        .column { border: 1px solid #ccc; padding: 10px; width: 30%; }
        .column h2 { text-align: center; }
        .item { display: flex; justify-content: space-between; margin-bottom: 5px; }
        .empty { color: #888; }
    </style>
</head>
<body>
    <h1>Garden Stock</h1>
"#,
    )?;

    write_weather(out, weather)?;
    if sample {
        out.write_str("    <p class=\"sample\">Live stock unavailable, showing sample data.</p>\n")?;
    }

    out.write_str("    <div class=\"container\">\n")?;
    for category in COLUMNS {
        write_column(out, category.title(), payload.get(category))?;
    }
    out.write_str("    </div>\n</body>\n</html>\n")?;
    Ok(())
}

fn write_column<T: ItemShape, W: Write>(
    out: &mut W,
    title: &str,
    items: &[T],
) -> Result<(), ViewError> {
    writeln!(out, "        <div class=\"column\"><h2>{}</h2>", escape(title))?;
    if items.is_empty() {
        out.write_str("            <div class=\"empty\">Out of stock</div>\n")?;
    }
    for item in items {
        let (name, quantity) = item.display();
        writeln!(
            out,
            "            <div class=\"item\"><span>{}</span><span>{}</span></div>",
            escape(&decorate(&name)),
            escape(&quantity)
        )?;
    }
    out.write_str("        </div>\n")?;
    Ok(())
}

fn write_weather<W: Write>(out: &mut W, weather: &Value) -> Result<(), ViewError> {
    let summary = match weather.as_object() {
        Some(map) if map.get("status").and_then(Value::as_str) != Some("unknown") => map
            .iter()
            .filter_map(|(k, v)| scalar_text(v).map(|text| format!("{k}: {text}")))
            .collect::<Vec<_>>()
            .join(" · "),
        _ => "unknown".to_string(),
    };
    writeln!(
        out,
        "    <div class=\"weather\">Weather: {}</div>",
        escape(&summary)
    )?;
    Ok(())
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stockwatch::StockItem;

    /// Accepts `room` bytes, then fails like a full buffer.
    struct Bounded {
        room: usize,
    }

    impl Write for Bounded {
        fn write_str(&mut self, s: &str) -> std::fmt::Result {
            self.room = self.room.checked_sub(s.len()).ok_or(std::fmt::Error)?;
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_reported() {
        let payload = Payload::empty().with(Category::Seeds, vec!["Carrot **x21**".to_string()]);
        let mut sink = Bounded { room: 64 };
        let err = write_page(&mut sink, &payload, &json!({}), false).unwrap_err();
        assert!(matches!(err, ViewError::Format(_)));

        let mut sink = Bounded { room: usize::MAX };
        assert!(write_page(&mut sink, &payload, &json!({}), false).is_ok());
    }

    #[test]
    fn test_first_matching_rule_wins() {
        assert_eq!(glyph_for("Watermelon"), Some("🍉"));
        assert_eq!(glyph_for("Eggplant"), Some("🍆"));
        assert_eq!(glyph_for("Bug Egg"), Some("🥚"));
        assert_eq!(glyph_for("Favorite Tool"), Some("🧰"));
        assert_eq!(glyph_for("Rainbow Sack"), None);
    }

    #[test]
    fn test_decorate() {
        assert_eq!(decorate("Carrot"), "🥕 Carrot");
        assert_eq!(decorate("Mystery"), "Mystery");
    }

    #[test]
    fn test_render_encoded_items() {
        let payload: Payload<String> =
            Payload::empty().with(Category::Seeds, vec!["Carrot **x21**".to_string()]);
        let html = render_page(&payload, &json!({"status": "unknown"}), false).unwrap();
        assert!(html.contains("<span>🥕 Carrot</span><span>21</span>"));
        assert!(html.contains("Weather: unknown"));
        assert!(html.contains("Out of stock"));
        assert!(!html.contains("sample data"));
    }

    #[test]
    fn test_render_escapes_content() {
        let payload = Payload::empty().with(
            Category::Gear,
            vec![StockItem::new("<script>alert(1)</script>", "x1")],
        );
        let html = render_page(&payload, &json!({"weather": "Rain & Wind"}), true).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Weather: weather: Rain &amp; Wind"));
        assert!(html.contains("sample data"));
    }

    #[test]
    fn test_columns_in_order() {
        let html = render_page(&Payload::<String>::empty(), &json!({}), false).unwrap();
        let seeds = html.find("<h2>Seeds</h2>").unwrap();
        let gear = html.find("<h2>Gear</h2>").unwrap();
        let eggs = html.find("<h2>Eggs</h2>").unwrap();
        assert!(seeds < gear && gear < eggs);
    }
}
