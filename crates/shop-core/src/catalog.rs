//! # Catalog Types
//!
//! Product catalog for the storefront.
//! Entries are created at load time (from `config/catalog.toml` or the built-in
//! seed) and live for the whole process. Only price and stock change afterwards.

use crate::error::{StoreError, StoreResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Product category, used to pick default attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Electronics,
    Clothing,
    Book,
    General,
}

impl Category {
    /// Default attributes applied on top of caller-supplied ones
    pub fn default_attributes(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Category::Electronics => &[("warranty", "1 year"), ("category", "Electronics")],
            Category::Clothing => &[("size", "M"), ("category", "Clothing")],
            Category::Book => &[("format", "Paperback"), ("category", "Books")],
            Category::General => &[("category", "General")],
        }
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    /// Unrecognized categories map to `General`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "electronics" => Category::Electronics,
            "clothing" => Category::Clothing,
            "book" => Category::Book,
            _ => Category::General,
        })
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::General
    }
}

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Stable unique product identifier (e.g., "P001")
    pub id: String,

    /// Display name
    pub name: String,

    /// Current list price
    pub base_price: Decimal,

    /// Units on hand
    pub stock: u32,

    /// Free-form attributes (color, size, warranty, ...)
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl CatalogEntry {
    /// Create an entry with no attributes
    pub fn new(id: impl Into<String>, name: impl Into<String>, base_price: Decimal, stock: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_price,
            stock,
            attributes: HashMap::new(),
        }
    }

    /// Create an entry for a category.
    ///
    /// Caller attributes are merged first; the category defaults are applied
    /// afterwards, so a default wins when both set the same key.
    pub fn from_category(
        category: Category,
        id: impl Into<String>,
        name: impl Into<String>,
        base_price: Decimal,
        stock: u32,
        attributes: Option<HashMap<String, String>>,
    ) -> Self {
        let mut entry = Self::new(id, name, base_price, stock);
        if let Some(attributes) = attributes {
            entry.attributes.extend(attributes);
        }
        for (key, value) in category.default_attributes() {
            entry.attributes.insert((*key).to_string(), (*value).to_string());
        }
        entry
    }

    /// Builder: add an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Check whether `quantity` units can be taken from stock
    pub fn has_stock_for(&self, quantity: u32) -> bool {
        self.stock >= quantity
    }
}

/// In-memory catalog keyed by product id
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, CatalogEntry>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Insert (or replace) an entry
    pub fn insert(&mut self, entry: CatalogEntry) {
        self.entries.insert(entry.id.clone(), entry);
    }

    /// Find an entry by id
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    /// Find an entry or fail with `ProductNotFound`
    pub fn require(&self, id: &str) -> StoreResult<&CatalogEntry> {
        self.entries.get(id).ok_or_else(|| StoreError::ProductNotFound {
            product_id: id.to_string(),
        })
    }

    /// Set the price of an entry, returning the previous price.
    ///
    /// Negative prices are rejected before anything changes.
    pub fn set_price(&mut self, id: &str, new_price: Decimal) -> StoreResult<Decimal> {
        if new_price < Decimal::ZERO {
            return Err(StoreError::InvalidPrice {
                message: format!("price for {} must not be negative (got {})", id, new_price),
            });
        }
        let entry = self.entry_mut(id)?;
        let old = entry.base_price;
        entry.base_price = new_price;
        Ok(old)
    }

    /// Set the stock of an entry, returning the previous stock
    pub fn set_stock(&mut self, id: &str, new_stock: u32) -> StoreResult<u32> {
        let entry = self.entry_mut(id)?;
        let old = entry.stock;
        entry.stock = new_stock;
        Ok(old)
    }

    /// All entries sorted by id
    pub fn entries(&self) -> Vec<&CatalogEntry> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, id: &str) -> StoreResult<&mut CatalogEntry> {
        self.entries
            .get_mut(id)
            .ok_or_else(|| StoreError::ProductNotFound {
                product_id: id.to_string(),
            })
    }
}

/// One product row in a catalog seed file
#[derive(Debug, Clone, Deserialize)]
pub struct SeedProduct {
    /// Category name; unrecognized names fall back to `General`
    #[serde(default)]
    pub category: String,
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    #[serde(default)]
    pub attributes: Option<HashMap<String, String>>,
}

impl SeedProduct {
    /// Build the catalog entry, applying category defaults
    pub fn into_entry(self) -> CatalogEntry {
        let category = self.category.parse().unwrap_or_default();
        CatalogEntry::from_category(
            category,
            self.id,
            self.name,
            self.price,
            self.stock,
            self.attributes,
        )
    }
}

/// Catalog seed (loaded from config)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

impl CatalogSeed {
    /// Load a seed from a TOML string
    pub fn from_toml(toml_str: &str) -> StoreResult<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// The sample products the storefront ships with
    pub fn builtin() -> Self {
        let attrs = |pairs: &[(&str, &str)]| {
            Some(
                pairs
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect::<HashMap<_, _>>(),
            )
        };

        Self {
            products: vec![
                SeedProduct {
                    category: "electronics".into(),
                    id: "P001".into(),
                    name: "Smartphone".into(),
                    price: Decimal::new(59999, 2),
                    stock: 50,
                    attributes: attrs(&[("color", "Black"), ("memory", "256GB")]),
                },
                SeedProduct {
                    category: "clothing".into(),
                    id: "P002".into(),
                    name: "T-Shirt".into(),
                    price: Decimal::new(2999, 2),
                    stock: 100,
                    attributes: attrs(&[("color", "Blue"), ("size", "L")]),
                },
                SeedProduct {
                    category: "book".into(),
                    id: "P003".into(),
                    name: "Rust Design Patterns".into(),
                    price: Decimal::new(4999, 2),
                    stock: 30,
                    attributes: None,
                },
                SeedProduct {
                    category: "electronics".into(),
                    id: "P004".into(),
                    name: "Laptop".into(),
                    price: Decimal::new(129999, 2),
                    stock: 25,
                    attributes: None,
                },
            ],
        }
    }

    /// Convert every row into a catalog entry
    pub fn into_entries(self) -> Vec<CatalogEntry> {
        self.products.into_iter().map(SeedProduct::into_entry).collect()
    }
}
