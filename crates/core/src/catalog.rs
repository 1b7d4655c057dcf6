//! Category filtering over a catalog snapshot.

use crate::types::{ALL_CATEGORIES, Product};

/// Select the products shown under a category tab.
///
/// [`ALL_CATEGORIES`] returns every product; any other id returns the
/// products whose `category` equals it exactly. Relative order is kept, so a
/// catalog loaded in category order stays grouped.
///
/// ```
/// use freedom_project_core::{Price, Product, ProductId, filter_by_category};
///
/// let cap = Product {
///     id: ProductId::new("c1"),
///     name: "Gorra".into(),
///     price: Price::from_units(20),
///     category: "caps".into(),
///     image_url: None,
///     stock: 1,
///     sizes: vec!["Única".into()],
///     created_at: None,
/// };
/// let products = vec![cap];
///
/// assert_eq!(filter_by_category(&products, "caps").len(), 1);
/// assert!(filter_by_category(&products, "men").is_empty());
/// ```
#[must_use]
pub fn filter_by_category<'a>(products: &'a [Product], category: &str) -> Vec<&'a Product> {
    if category == ALL_CATEGORIES {
        return products.iter().collect();
    }
    products
        .iter()
        .filter(|product| product.category == category)
        .collect()
}
