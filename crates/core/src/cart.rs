//! Shopping cart state.
//!
//! A [`Cart`] is an ordered list of line items plus the visibility flag of
//! the cart drawer. Lines are identified by a [`LineKey`] of
//! (product id, size, colour name); adding a product that matches an
//! existing key merges into that line instead of appending a duplicate.
//!
//! Totals are never stored. [`Cart::total_items`] and [`Cart::total_price`]
//! walk the lines on every call, so they cannot drift from the items.
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroU32;
//! use threadline_core::{Cart, Color, CurrencyCode, Price, Product, ProductId, PrintArea};
//!
//! let product = Product {
//!     id: ProductId::new("A"),
//!     handle: "a".into(),
//!     title: "A".into(),
//!     description: String::new(),
//!     price: Price::from_cents(1000, CurrencyCode::USD),
//!     sizes: vec!["M".into()],
//!     colors: vec![Color::new("Red", "#f00")],
//!     images: Vec::new(),
//!     print_area: PrintArea::default(),
//!     tags: Vec::new(),
//! };
//! let red = Color::new("Red", "#f00");
//!
//! let mut cart = Cart::new();
//! cart.add_to_cart(&product, "M", &red, NonZeroU32::MIN);
//! cart.add_to_cart(&product, "M", &red, NonZeroU32::new(2).unwrap());
//! assert_eq!(cart.items().len(), 1);
//! assert_eq!(cart.total_items(), 3);
//! assert_eq!(cart.total_price().display(), "$30.00");
//! ```

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::product::{Color, Product, ProductSnapshot};
use crate::types::{CurrencyCode, Price, ProductId};

/// Identity of a cart line: the same product in another size or colour is
/// a different line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineKey<'a> {
    pub product_id: &'a ProductId,
    pub size: &'a str,
    pub color_name: &'a str,
}

impl<'a> LineKey<'a> {
    /// Build a key from its parts.
    #[must_use]
    pub const fn new(product_id: &'a ProductId, size: &'a str, color_name: &'a str) -> Self {
        Self {
            product_id,
            size,
            color_name,
        }
    }
}

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: ProductSnapshot,
    quantity: u32,
    pub selected_size: String,
    pub selected_color: Color,
}

impl CartItem {
    /// Number of units on this line. Always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_price(&self) -> Price {
        self.product.price.times(self.quantity)
    }

    /// The identity key of this line.
    #[must_use]
    pub fn key(&self) -> LineKey<'_> {
        LineKey::new(
            &self.product.id,
            &self.selected_size,
            &self.selected_color.name,
        )
    }

    fn matches(&self, key: &LineKey<'_>) -> bool {
        self.key() == *key
    }
}

/// The cart of one shopping session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
    #[serde(default)]
    is_open: bool,
}

impl Cart {
    /// An empty, closed cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            is_open: false,
        }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add `quantity` units of a product variant.
    ///
    /// Merges into the line with the same (product id, size, colour name)
    /// if one exists, otherwise appends a new line. Opens the cart drawer
    /// either way.
    pub fn add_to_cart(&mut self, product: &Product, size: &str, color: &Color, quantity: NonZeroU32) {
        let key = LineKey::new(&product.id, size, &color.name);

        if let Some(item) = self.items.iter_mut().find(|item| item.matches(&key)) {
            item.quantity = item.quantity.saturating_add(quantity.get());
        } else {
            self.items.push(CartItem {
                product: product.snapshot(),
                quantity: quantity.get(),
                selected_size: size.to_owned(),
                selected_color: color.clone(),
            });
        }

        self.is_open = true;
    }

    /// Remove the line matching the key. Absent keys are ignored.
    pub fn remove_from_cart(&mut self, product_id: &ProductId, size: &str, color_name: &str) {
        let key = LineKey::new(product_id, size, color_name);
        self.items.retain(|item| !item.matches(&key));
    }

    /// Set the quantity of the line matching the key.
    ///
    /// A quantity of zero or less removes the line. Absent keys are ignored.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        size: &str,
        color_name: &str,
        quantity: i64,
    ) {
        if quantity <= 0 {
            self.remove_from_cart(product_id, size, color_name);
            return;
        }

        let key = LineKey::new(product_id, size, color_name);
        if let Some(item) = self.items.iter_mut().find(|item| item.matches(&key)) {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) {
        self.items.clear();
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of price × quantity across all lines.
    ///
    /// An empty cart totals zero in the default currency.
    #[must_use]
    pub fn total_price(&self) -> Price {
        let currency = self
            .items
            .first()
            .map_or_else(CurrencyCode::default, |item| item.product.price.currency_code);

        self.items
            .iter()
            .fold(Price::zero(currency), |total, item| total.plus(item.line_price()))
    }

    /// Whether the cart drawer is visible.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Show or hide the cart drawer.
    pub const fn set_is_open(&mut self, open: bool) {
        self.is_open = open;
    }
}
