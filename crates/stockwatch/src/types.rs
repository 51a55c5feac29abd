//! Core data types for stock snapshots.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One of the three stock categories tracked by the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Gear,
    Seeds,
    Eggs,
}

impl Category {
    /// All categories in canonical order.
    pub const ALL: [Category; 3] = [Category::Gear, Category::Seeds, Category::Eggs];

    /// Canonical JSON key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Gear => "gear",
            Self::Seeds => "seeds",
            Self::Eggs => "eggs",
        }
    }

    /// Raw keys accepted for this category, in lookup order. Matching is exact.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Gear => &["gear", "gears"],
            Self::Seeds => &["seeds", "seed"],
            Self::Eggs => &["eggs", "egg"],
        }
    }

    /// Human-readable column title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Gear => "Gear",
            Self::Seeds => "Seeds",
            Self::Eggs => "Eggs",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The element type stored in a [`Payload`].
///
/// The cache never looks inside an item; only the normalizer (to filter
/// malformed entries) and the view (to print it) do.
pub trait ItemShape:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Short name of the shape, used in logs.
    const SHAPE: &'static str;

    /// Accept a raw element if it has the expected shape.
    fn from_raw(raw: &Value) -> Option<Self>;

    /// `(name, quantity)` pair for display.
    fn display(&self) -> (String, String);
}

/// A structured stock entry, as scraped from the rendered stock page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub name: String,
    pub quantity: String,
}

impl StockItem {
    pub fn new(name: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
        }
    }
}

impl ItemShape for StockItem {
    const SHAPE: &'static str = "structured";

    fn from_raw(raw: &Value) -> Option<Self> {
        let obj = raw.as_object()?;
        let name = obj.get("name")?.as_str()?;
        let quantity = match obj.get("quantity")? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        Some(Self::new(name, quantity))
    }

    fn display(&self) -> (String, String) {
        (self.name.clone(), self.quantity.clone())
    }
}

/// Encoded items such as `"Carrot **x21**"`, as served by the stock API.
impl ItemShape for String {
    const SHAPE: &'static str = "encoded";

    fn from_raw(raw: &Value) -> Option<Self> {
        raw.as_str().map(str::to_string)
    }

    fn display(&self) -> (String, String) {
        crate::encoded::parse_encoded(self)
    }
}

/// A canonical three-category stock snapshot.
///
/// All three categories are always present. Item order is source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: ItemShape")]
pub struct Payload<T> {
    pub gear: Vec<T>,
    pub seeds: Vec<T>,
    pub eggs: Vec<T>,
}

impl<T> Default for Payload<T> {
    fn default() -> Self {
        Self {
            gear: Vec::new(),
            seeds: Vec::new(),
            eggs: Vec::new(),
        }
    }
}

impl<T> Payload<T> {
    /// The all-empty payload.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, category: Category) -> &[T] {
        match category {
            Category::Gear => &self.gear,
            Category::Seeds => &self.seeds,
            Category::Eggs => &self.eggs,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut Vec<T> {
        match category {
            Category::Gear => &mut self.gear,
            Category::Seeds => &mut self.seeds,
            Category::Eggs => &mut self.eggs,
        }
    }

    /// Builder-style setter, mostly for tests and fixtures.
    pub fn with(mut self, category: Category, items: Vec<T>) -> Self {
        *self.get_mut(category) = items;
        self
    }

    /// True iff every category is empty.
    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.get(*c).is_empty())
    }

    /// Number of entries across all categories.
    pub fn total_items(&self) -> usize {
        Category::ALL.iter().map(|c| self.get(*c).len()).sum()
    }
}

/// Emptiness oracle: a payload "has data" when at least one category does.
pub fn is_empty<T>(payload: &Payload<T>) -> bool {
    payload.is_empty()
}
