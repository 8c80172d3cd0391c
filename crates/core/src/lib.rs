//! Threadline Core - Shared domain types and cart state.
//!
//! This crate provides the types used by the Threadline storefront:
//! - product and pricing types consumed from the catalog
//! - the shopping cart state manager
//! - validated customer identity types
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP,
//! no session handling. The storefront binary owns where a [`Cart`] lives;
//! this crate owns what a cart is allowed to look like.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices and emails
//! - [`product`] - Catalog products, colours and print areas
//! - [`cart`] - The cart state manager and its line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod product;
pub mod types;

pub use cart::{Cart, CartItem, LineKey};
pub use product::{Color, PrintArea, Product, ProductImage, ProductSnapshot, ViewSide};
pub use types::*;
