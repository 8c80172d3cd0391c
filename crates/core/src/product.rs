//! Catalog product types.
//!
//! Products are supplied by the catalog data source; the storefront never
//! mutates them. Cart lines keep a [`ProductSnapshot`] rather than the full
//! product so a session carries only what it needs to render a line.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A garment colour option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Display name, also part of a cart line's identity (e.g. "Heather Red").
    pub name: String,
    /// CSS colour value (e.g. "#b22222").
    pub value: String,
}

impl Color {
    /// Create a new colour.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Which face of the garment a mockup image shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewSide {
    #[default]
    Front,
    Back,
}

impl ViewSide {
    /// Lowercase name used in URLs and templates.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
        }
    }
}

impl std::str::FromStr for ViewSide {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "front" => Ok(Self::Front),
            "back" => Ok(Self::Back),
            _ => Err(()),
        }
    }
}

/// A product photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub side: ViewSide,
}

/// Printable region of a mockup image, in percent of the image box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrintArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for PrintArea {
    /// Chest print on a standard tee mockup.
    fn default() -> Self {
        Self {
            left: 30.0,
            top: 22.0,
            width: 40.0,
            height: 48.0,
        }
    }
}

/// A product offered by the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// URL slug (e.g. "classic-tee").
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    pub sizes: Vec<String>,
    pub colors: Vec<Color>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub print_area: PrintArea,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Product {
    /// The first image for a side, falling back to any image.
    #[must_use]
    pub fn image_for(&self, side: ViewSide) -> Option<&ProductImage> {
        self.images
            .iter()
            .find(|image| image.side == side)
            .or_else(|| self.images.first())
    }

    /// Look up one of the product's colours by name.
    #[must_use]
    pub fn color(&self, name: &str) -> Option<&Color> {
        self.colors.iter().find(|color| color.name == name)
    }

    /// Whether the product is offered in `size`.
    #[must_use]
    pub fn has_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    /// The subset of fields a cart line keeps.
    #[must_use]
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id.clone(),
            handle: self.handle.clone(),
            title: self.title.clone(),
            price: self.price,
            image_url: self.image_for(ViewSide::Front).map(|img| img.url.clone()),
        }
    }
}

/// Product reference held by a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub handle: String,
    pub title: String,
    pub price: Price,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        product.snapshot()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::CurrencyCode;

    fn tee() -> Product {
        Product {
            id: ProductId::new("tee"),
            handle: "classic-tee".to_string(),
            title: "Classic Tee".to_string(),
            description: String::new(),
            price: Price::from_cents(2400, CurrencyCode::USD),
            sizes: vec!["S".to_string(), "M".to_string()],
            colors: vec![Color::new("Red", "#b22222"), Color::new("Navy", "#1b2a49")],
            images: vec![
                ProductImage {
                    url: "/static/img/tee-back.png".to_string(),
                    alt: String::new(),
                    side: ViewSide::Back,
                },
                ProductImage {
                    url: "/static/img/tee-front.png".to_string(),
                    alt: String::new(),
                    side: ViewSide::Front,
                },
            ],
            print_area: PrintArea::default(),
            tags: vec!["tees".to_string()],
        }
    }

    #[test]
    fn test_image_for_prefers_side() {
        let product = tee();
        assert_eq!(
            product.image_for(ViewSide::Front).unwrap().url,
            "/static/img/tee-front.png"
        );
        assert_eq!(
            product.image_for(ViewSide::Back).unwrap().url,
            "/static/img/tee-back.png"
        );
    }

    #[test]
    fn test_color_and_size_lookup() {
        let product = tee();
        assert_eq!(product.color("Navy").unwrap().value, "#1b2a49");
        assert!(product.color("navy").is_none());
        assert!(product.has_size("M"));
        assert!(!product.has_size("XL"));
    }

    #[test]
    fn test_snapshot_uses_front_image() {
        let snapshot = tee().snapshot();
        assert_eq!(snapshot.image_url.as_deref(), Some("/static/img/tee-front.png"));
        assert_eq!(snapshot.handle, "classic-tee");
    }

    #[test]
    fn test_view_side_parse() {
        assert_eq!("back".parse::<ViewSide>(), Ok(ViewSide::Back));
        assert!("side".parse::<ViewSide>().is_err());
    }
}
