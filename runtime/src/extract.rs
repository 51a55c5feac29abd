//! Extract stock sections from rendered stock-page HTML.
//!
//! Uses the `scraper` crate for CSS selector-based parsing. Each section is
//! located by element id, and every `.stock-item` inside it contributes one
//! `{name, quantity}` entry when both fields are present.

use scraper::{ElementRef, Html, Selector};
use serde_json::{json, Map, Value};
use stockwatch::{Category, StockItem};

/// Selectors that must be present before the page counts as loaded.
pub const REQUIRED_SELECTORS: [&str; 4] = [
    ".stock-sections-grid",
    ".stock-item",
    ".item-name",
    ".item-quantity",
];

const ITEM_SELECTOR: &str = ".stock-item";
const NAME_SELECTOR: &str = ".item-name";
const QUANTITY_SELECTOR: &str = ".item-quantity";

/// Section element id and the raw key it is emitted under.
pub fn section_for(category: Category) -> (&'static str, &'static str) {
    match category {
        Category::Gear => ("gear-section", "gears"),
        Category::Seeds => ("seeds-section", "seeds"),
        Category::Eggs => ("eggs-section", "eggs"),
    }
}

/// Build the raw payload for all three sections.
///
/// Missing sections produce empty lists; the normalizer sees the same shape
/// the stock server accepts on its ingest endpoint.
pub fn extract_payload(html: &str) -> Value {
    let doc = Html::parse_document(html);
    let mut raw = Map::new();
    for category in Category::ALL {
        let (section_id, key) = section_for(category);
        let items: Vec<Value> = extract_section(&doc, section_id)
            .into_iter()
            .map(|item| json!({ "name": item.name, "quantity": item.quantity }))
            .collect();
        raw.insert(key.to_string(), Value::Array(items));
    }
    Value::Object(raw)
}

/// Items from the element with the given id, in document order.
pub fn extract_section(doc: &Html, section_id: &str) -> Vec<StockItem> {
    let section_css = format!("#{section_id}");
    let (Ok(section_sel), Ok(item_sel), Ok(name_sel), Ok(qty_sel)) = (
        Selector::parse(&section_css),
        Selector::parse(ITEM_SELECTOR),
        Selector::parse(NAME_SELECTOR),
        Selector::parse(QUANTITY_SELECTOR),
    ) else {
        return Vec::new();
    };

    let Some(section) = doc.select(&section_sel).next() else {
        return Vec::new();
    };

    section
        .select(&item_sel)
        .filter_map(|item| {
            let name = item.select(&name_sel).next()?;
            let quantity = item.select(&qty_sel).next()?;
            Some(StockItem::new(element_text(&name), element_text(&quantity)))
        })
        .collect()
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
