//! Core types for the storefront.
//!
//! This module provides type-safe wrappers for the catalog's domain concepts.

pub mod category;
pub mod id;
pub mod price;
pub mod product;

pub use category::{ALL_CATEGORIES, CATEGORY_TABS, CategoryTab, tab_label};
pub use id::ProductId;
pub use price::Price;
pub use product::{LOW_STOCK_THRESHOLD, Product};
