//! Product snapshot as returned by the product store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{Price, ProductId};

/// Products with fewer units than this (but more than zero) are flagged as
/// running low.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// A sellable item.
///
/// Rows are owned by the external store; the storefront only reads
/// snapshots. Optional columns that come back missing or `null` fall back to
/// their empty value instead of failing the whole catalog load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Category identifier matched against the category tabs.
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Units available.
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock: u32,
    /// Size labels in display order. The first one is preselected.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// The size preselected on the product card.
    #[must_use]
    pub fn default_size(&self) -> Option<&str> {
        self.sizes.first().map(String::as_str)
    }

    /// Whether `size` is one of this product's size labels.
    #[must_use]
    pub fn has_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    #[must_use]
    pub const fn is_sold_out(&self) -> bool {
        self.stock == 0
    }

    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.stock > 0 && self.stock < LOW_STOCK_THRESHOLD
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product(stock: u32, sizes: &[&str]) -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Air Max".to_string(),
            price: Price::from_units(120),
            category: "sneakers".to_string(),
            image_url: None,
            stock,
            sizes: sizes.iter().map(ToString::to_string).collect(),
            created_at: None,
        }
    }

    #[test]
    fn test_deserialize_store_row() {
        let row = json!({
            "id": "6c1e2a",
            "name": "Gorra NY",
            "price": 35.5,
            "category": "caps",
            "image_url": "https://cdn.example.com/gorra.jpg",
            "stock": 3,
            "sizes": ["Única"],
            "created_at": "2024-11-02T15:04:05.123456+00:00"
        });

        let product: Product = serde_json::from_value(row).unwrap();
        assert_eq!(product.id.as_str(), "6c1e2a");
        assert_eq!(product.price.to_string(), "$35.5");
        assert_eq!(product.category, "caps");
        assert_eq!(product.sizes, vec!["Única".to_string()]);
        assert!(product.created_at.is_some());
    }

    #[test]
    fn test_deserialize_tolerates_missing_and_null_fields() {
        let row = json!({
            "id": "p9",
            "name": "Sin datos",
            "price": 10,
            "category": null,
            "stock": null,
            "sizes": null
        });

        let product: Product = serde_json::from_value(row).unwrap();
        assert_eq!(product.category, "");
        assert_eq!(product.stock, 0);
        assert!(product.sizes.is_empty());
        assert!(product.image_url.is_none());
        assert!(product.created_at.is_none());
    }

    #[test]
    fn test_default_size_is_first() {
        assert_eq!(product(10, &["M", "L"]).default_size(), Some("M"));
        assert_eq!(product(10, &[]).default_size(), None);
    }

    #[test]
    fn test_has_size() {
        let p = product(10, &["M", "L"]);
        assert!(p.has_size("L"));
        assert!(!p.has_size("XL"));
    }

    #[test]
    fn test_stock_flags() {
        assert!(product(0, &["M"]).is_sold_out());
        assert!(!product(0, &["M"]).is_low_stock());
        assert!(product(4, &["M"]).is_low_stock());
        assert!(!product(5, &["M"]).is_low_stock());
        assert!(!product(5, &["M"]).is_sold_out());
    }
}
