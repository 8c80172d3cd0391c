//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;

use threadline_core::{Color, Product, ViewSide};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CspNonce, OptionalAuth};
use crate::models::CurrentCustomer;
use crate::state::AppState;

/// Number of related products shown under a product.
const RELATED_PRODUCTS: usize = 4;

/// Product card display data for grids.
#[derive(Clone)]
pub struct ProductCardView {
    pub handle: String,
    pub title: String,
    pub price: String,
    pub image: Option<ImageView>,
    pub swatches: Vec<Color>,
}

/// Image display data for templates.
#[derive(Clone)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
}

/// Product detail display data.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub price: String,
    pub front_image: Option<ImageView>,
    pub back_image: Option<ImageView>,
    pub sizes: Vec<String>,
    pub colors: Vec<Color>,
    pub tags: Vec<String>,
}

fn image_view(product: &Product, side: ViewSide) -> Option<ImageView> {
    product.image_for(side).map(|image| ImageView {
        url: image.url.clone(),
        alt: if image.alt.is_empty() {
            product.title.clone()
        } else {
            image.alt.clone()
        },
    })
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            handle: product.handle.clone(),
            title: product.title.clone(),
            price: product.price.to_string(),
            image: image_view(product, ViewSide::Front),
            swatches: product.colors.clone(),
        }
    }
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        // Only show a back image when the product really has one.
        let back_image = product
            .images
            .iter()
            .any(|image| image.side == ViewSide::Back)
            .then(|| image_view(product, ViewSide::Back))
            .flatten();

        Self {
            id: product.id.to_string(),
            handle: product.handle.clone(),
            title: product.title.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            front_image: image_view(product, ViewSide::Front),
            back_image,
            sizes: product.sizes.clone(),
            colors: product.colors.clone(),
            tags: product.tags.clone(),
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub nonce: String,
    pub customer: Option<CurrentCustomer>,
    pub products: Vec<ProductCardView>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub nonce: String,
    pub customer: Option<CurrentCustomer>,
    pub product: ProductView,
    pub related_products: Vec<ProductCardView>,
}

/// Display product listing page.
#[instrument(skip(state, nonce, customer))]
pub async fn index(
    State(state): State<AppState>,
    CspNonce(nonce): CspNonce,
    OptionalAuth(customer): OptionalAuth,
) -> impl IntoResponse {
    ProductsIndexTemplate {
        nonce,
        customer,
        products: state
            .catalog()
            .all()
            .iter()
            .map(ProductCardView::from)
            .collect(),
    }
}

/// Display product detail page.
#[instrument(skip(state, nonce, customer))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    CspNonce(nonce): CspNonce,
    OptionalAuth(customer): OptionalAuth,
) -> Result<impl IntoResponse> {
    let catalog = state.catalog();
    let product = catalog
        .by_handle(&handle)
        .ok_or_else(|| AppError::NotFound(format!("product {handle}")))?;

    Ok(ProductShowTemplate {
        nonce,
        customer,
        product: ProductView::from(product),
        related_products: catalog
            .related(product, RELATED_PRODUCTS)
            .into_iter()
            .map(ProductCardView::from)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use threadline_core::{CurrencyCode, Price, PrintArea, ProductId, ProductImage};

    use super::*;

    fn hoodie(images: Vec<ProductImage>) -> Product {
        Product {
            id: ProductId::new("hoodie"),
            handle: "heavy-hoodie".to_string(),
            title: "Heavy Hoodie".to_string(),
            description: String::new(),
            price: Price::from_cents(5800, CurrencyCode::USD),
            sizes: vec!["L".to_string()],
            colors: vec![Color::new("Black", "#111111")],
            images,
            print_area: PrintArea::default(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_views_use_front_image_and_price_display() {
        let product = hoodie(vec![ProductImage {
            url: "/static/img/hoodie-front.png".to_string(),
            alt: String::new(),
            side: ViewSide::Front,
        }]);

        let card = ProductCardView::from(&product);
        assert_eq!(card.price, "$58.00");
        let image = card.image.unwrap_or_else(|| panic!("card has no image"));
        assert_eq!(image.alt, "Heavy Hoodie");

        let view = ProductView::from(&product);
        assert!(view.back_image.is_none());
    }

    #[test]
    fn test_views_without_images() {
        let product = hoodie(Vec::new());
        assert!(ProductCardView::from(&product).image.is_none());
        assert!(ProductView::from(&product).front_image.is_none());
    }
}
