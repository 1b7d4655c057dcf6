//! Freedom Project Core - Shared domain library.
//!
//! This crate provides the storefront's domain model:
//! - [`types`] - Products, prices, IDs, and the fixed category tabs
//! - [`catalog`] - Category filtering over a product snapshot
//! - [`cart`] - The visitor's cart and its line bookkeeping
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no session handling. The storefront binary loads products,
//! keeps carts in the visitor session, and renders views from these types.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod types;

pub use cart::{Cart, CartError, CartLine};
pub use catalog::filter_by_category;
pub use types::*;
