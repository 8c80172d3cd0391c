//! Read-only product catalog.
//!
//! Products are loaded once at startup from `catalog.json` in the content
//! directory. The storefront treats the catalog as an external data source:
//! it validates what it loads and never writes back.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use threadline_core::{Color, Price, PriceError, PrintArea, Product, ProductId};

/// Errors raised while loading the catalog or resolving a variant.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid catalog: {0}")]
    Invalid(String),

    #[error("invalid price for {product}: {source}")]
    Price {
        product: String,
        #[source]
        source: PriceError,
    },

    #[error("unknown product: {0}")]
    UnknownProduct(String),

    #[error("{product} is not offered in size {size}")]
    UnknownSize { product: String, size: String },

    #[error("{product} is not offered in colour {color}")]
    UnknownColor { product: String, color: String },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Vec<Product>,
}

/// In-memory product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<Vec<Product>>,
}

/// A validated product variant selection.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub product: &'a Product,
    pub size: &'a str,
    pub color: &'a Color,
}

impl Catalog {
    /// Load the catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// products fail validation (see [`Catalog::from_products`]).
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&raw)?;
        tracing::info!(
            path = %path.display(),
            products = catalog.products.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse a catalog from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        Self::from_products(file.products)
    }

    /// Build a catalog from already-parsed products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` when ids or handles repeat, when a
    /// product has no sizes or colours, when a print area does not fit the
    /// mockup, or when products are priced in more than one currency.
    /// Returns `CatalogError::Price` for a negative price.
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut ids = HashSet::new();
        let mut handles = HashSet::new();
        let mut currencies = HashSet::new();

        for product in &products {
            if !ids.insert(product.id.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate product id {}",
                    product.id
                )));
            }
            if !handles.insert(product.handle.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate product handle {}",
                    product.handle
                )));
            }
            if product.sizes.is_empty() {
                return Err(CatalogError::Invalid(format!("{} has no sizes", product.id)));
            }
            if product.colors.is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "{} has no colours",
                    product.id
                )));
            }
            Price::try_new(product.price.amount, product.price.currency_code).map_err(
                |source| CatalogError::Price {
                    product: product.id.to_string(),
                    source,
                },
            )?;
            if !print_area_fits(&product.print_area) {
                return Err(CatalogError::Invalid(format!(
                    "{} has a print area outside the mockup",
                    product.id
                )));
            }
            currencies.insert(product.price.currency_code);
        }

        if currencies.len() > 1 {
            return Err(CatalogError::Invalid(
                "products must share one currency".to_string(),
            ));
        }

        Ok(Self {
            products: Arc::new(products),
        })
    }

    /// All products in catalog order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by its URL handle.
    #[must_use]
    pub fn by_handle(&self, handle: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.handle == handle)
    }

    /// Look up a product by id.
    #[must_use]
    pub fn by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// The first `n` products, used by the home page grid.
    #[must_use]
    pub fn featured(&self, n: usize) -> &[Product] {
        self.products
            .get(..n.min(self.products.len()))
            .unwrap_or_default()
    }

    /// Up to `n` other products, those sharing a tag with `product` first.
    #[must_use]
    pub fn related(&self, product: &Product, n: usize) -> Vec<&Product> {
        let shares_tag = |other: &Product| other.tags.iter().any(|t| product.tags.contains(t));

        let (mut related, others): (Vec<&Product>, Vec<&Product>) = self
            .products
            .iter()
            .filter(|other| other.id != product.id)
            .partition(|other| shares_tag(other));

        related.extend(others);
        related.truncate(n);
        related
    }

    /// Validate a requested variant of a product.
    ///
    /// # Errors
    ///
    /// Returns `UnknownProduct`, `UnknownSize` or `UnknownColor` for the
    /// first part of the selection the catalog does not offer.
    pub fn resolve_selection<'a>(
        &'a self,
        handle: &str,
        size: &str,
        color_name: &str,
    ) -> Result<Selection<'a>, CatalogError> {
        let product = self
            .by_handle(handle)
            .ok_or_else(|| CatalogError::UnknownProduct(handle.to_string()))?;

        let size = product
            .sizes
            .iter()
            .find(|s| *s == size)
            .ok_or_else(|| CatalogError::UnknownSize {
                product: product.handle.clone(),
                size: size.to_string(),
            })?;

        let color = product
            .color(color_name)
            .ok_or_else(|| CatalogError::UnknownColor {
                product: product.handle.clone(),
                color: color_name.to_string(),
            })?;

        Ok(Selection {
            product,
            size,
            color,
        })
    }
}

/// Whether a print area lies inside the 0-100% mockup box.
fn print_area_fits(area: &PrintArea) -> bool {
    let in_range = |v: f64| v.is_finite() && (0.0..=100.0).contains(&v);

    [area.left, area.top, area.width, area.height]
        .into_iter()
        .all(in_range)
        && area.width > 0.0
        && area.height > 0.0
        && area.left + area.width <= 100.0
        && area.top + area.height <= 100.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const CATALOG: &str = r##"{
        "products": [
            {
                "id": "tee",
                "handle": "classic-tee",
                "title": "Classic Tee",
                "price": { "amount": "24.00", "currency_code": "USD" },
                "sizes": ["S", "M", "L"],
                "colors": [{ "name": "Red", "value": "#b22222" }],
                "tags": ["tees"]
            },
            {
                "id": "hoodie",
                "handle": "zip-hoodie",
                "title": "Zip Hoodie",
                "price": { "amount": "58.00" },
                "sizes": ["M"],
                "colors": [{ "name": "Black", "value": "#111" }],
                "tags": ["outerwear"]
            },
            {
                "id": "ringer",
                "handle": "ringer-tee",
                "title": "Ringer Tee",
                "price": { "amount": "26.00" },
                "sizes": ["M"],
                "colors": [{ "name": "White", "value": "#fff" }],
                "tags": ["tees"]
            }
        ]
    }"##;

    #[test]
    fn test_from_json_and_lookups() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.all().len(), 3);
        assert_eq!(catalog.by_handle("zip-hoodie").unwrap().title, "Zip Hoodie");
        assert!(catalog.by_id(&ProductId::new("ringer")).is_some());
        assert!(catalog.by_handle("missing").is_none());
        assert_eq!(catalog.featured(2).len(), 2);
        assert_eq!(catalog.featured(10).len(), 3);
    }

    #[test]
    fn test_related_prefers_shared_tags() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let tee = catalog.by_handle("classic-tee").unwrap();
        let related = catalog.related(tee, 2);
        assert_eq!(related.len(), 2);
        assert_eq!(related[0].handle, "ringer-tee");
        assert_eq!(related[1].handle, "zip-hoodie");
    }

    #[test]
    fn test_resolve_selection() {
        let catalog = Catalog::from_json(CATALOG).unwrap();

        let selection = catalog.resolve_selection("classic-tee", "M", "Red").unwrap();
        assert_eq!(selection.product.id.as_str(), "tee");
        assert_eq!(selection.color.value, "#b22222");

        assert!(matches!(
            catalog.resolve_selection("nope", "M", "Red"),
            Err(CatalogError::UnknownProduct(_))
        ));
        assert!(matches!(
            catalog.resolve_selection("classic-tee", "XXL", "Red"),
            Err(CatalogError::UnknownSize { .. })
        ));
        assert!(matches!(
            catalog.resolve_selection("classic-tee", "M", "Teal"),
            Err(CatalogError::UnknownColor { .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let raw = CATALOG.replace("\"id\": \"hoodie\"", "\"id\": \"tee\"");
        let err = Catalog::from_json(&raw).unwrap_err();
        assert!(err.to_string().contains("duplicate product id"));
    }

    #[test]
    fn test_rejects_products_without_sizes() {
        let mut file: CatalogFile = serde_json::from_str(CATALOG).unwrap();
        file.products[1].sizes.clear();
        let err = Catalog::from_products(file.products).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)));
    }

    #[test]
    fn test_rejects_mixed_currencies() {
        let raw = CATALOG.replace("\"currency_code\": \"USD\"", "\"currency_code\": \"EUR\"");
        let err = Catalog::from_json(&raw).unwrap_err();
        assert!(err.to_string().contains("one currency"));
    }

    #[test]
    fn test_rejects_negative_price() {
        let raw = CATALOG.replace("\"58.00\"", "\"-58.00\"");
        let err = Catalog::from_json(&raw).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Price {
                source: PriceError::Negative(_),
                ..
            }
        ));
        assert!(err.to_string().contains("hoodie"));
    }

    #[test]
    fn test_rejects_print_area_outside_mockup() {
        let with_area = |area: &str| {
            CATALOG.replace(
                "\"tags\": [\"outerwear\"]",
                &format!("\"tags\": [\"outerwear\"], \"print_area\": {area}"),
            )
        };

        for area in [
            r#"{ "left": 10, "top": 10, "width": -10, "height": 40 }"#,
            r#"{ "left": 70, "top": 10, "width": 40, "height": 40 }"#,
            r#"{ "left": 10, "top": 80, "width": 40, "height": 30 }"#,
            r#"{ "left": 10, "top": 10, "width": 0, "height": 40 }"#,
        ] {
            let err = Catalog::from_json(&with_area(area)).unwrap_err();
            assert!(
                err.to_string().contains("print area outside the mockup"),
                "accepted {area}"
            );
        }

        let ok = with_area(r#"{ "left": 30, "top": 20, "width": 40, "height": 50 }"#);
        assert!(Catalog::from_json(&ok).is_ok());
    }
}
