//! Realistic design preview.
//!
//! Renders the product photo for the requested side, tinted with the chosen
//! colour, with the customer's artwork or lettering placed inside the print
//! area. The form on the page re-submits with GET so every preview is a
//! shareable URL.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tracing::instrument;

use threadline_core::Color;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CspNonce, OptionalAuth};
use crate::models::CurrentCustomer;
use crate::preview::{self, DesignSource, MAX_TEXT_CHARS, PreviewParams};
use crate::routes::products::{ImageView, ProductView};
use crate::state::AppState;

/// Preview display data for templates.
#[derive(Clone)]
pub struct PreviewView {
    pub side: &'static str,
    pub color: Color,
    pub mockup: Option<ImageView>,
    pub print_area_style: String,
    pub overlay_style: String,
    pub design_image: Option<String>,
    pub design_text: Option<String>,
    /// Raw form values echoed back into the controls.
    pub design_url_input: String,
    pub text_input: String,
    pub scale: String,
    pub offset_x: String,
    pub offset_y: String,
    pub rotation: String,
    pub max_text_chars: usize,
}

/// Design preview page template.
#[derive(Template, WebTemplate)]
#[template(path = "design/preview.html")]
pub struct DesignPreviewTemplate {
    pub nonce: String,
    pub customer: Option<CurrentCustomer>,
    pub product: ProductView,
    pub preview: PreviewView,
}

/// Display the design preview for a product.
#[instrument(skip(state, nonce, customer))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Query(params): Query<PreviewParams>,
    CspNonce(nonce): CspNonce,
    OptionalAuth(customer): OptionalAuth,
) -> Result<impl IntoResponse> {
    let product = state
        .catalog()
        .by_handle(&handle)
        .ok_or_else(|| AppError::NotFound(format!("product {handle}")))?;

    let color = params
        .color
        .as_deref()
        .and_then(|name| product.color(name))
        .or_else(|| product.colors.first())
        .cloned()
        .ok_or_else(|| AppError::Internal(format!("product {handle} has no colours")))?;

    let side = params.view_side();
    let overlay = preview::layout(&product.print_area, &params);
    let (design_image, design_text) = match DesignSource::from_params(&params) {
        DesignSource::Image(url) => (Some(url), None),
        DesignSource::Text(text) => (None, Some(text)),
        DesignSource::Empty => (None, None),
    };

    let mockup = product.image_for(side).map(|image| ImageView {
        url: image.url.clone(),
        alt: format!("{} ({}), {} view", product.title, color.name, side.as_str()),
    });

    let view = PreviewView {
        side: side.as_str(),
        color,
        mockup,
        print_area_style: preview::print_area_style(&product.print_area),
        overlay_style: overlay.style(),
        design_image,
        design_text,
        design_url_input: params.design_url.clone().unwrap_or_default(),
        text_input: params.text.clone().unwrap_or_default(),
        scale: format!("{:.2}", params.scale()),
        offset_x: format!("{:.0}", params.offset_x()),
        offset_y: format!("{:.0}", params.offset_y()),
        rotation: format!("{:.0}", params.rotation()),
        max_text_chars: MAX_TEXT_CHARS,
    };

    tracing::debug!(
        product = %product.handle,
        side = side.as_str(),
        has_image = view.design_image.is_some(),
        has_text = view.design_text.is_some(),
        "Rendering design preview"
    );

    Ok(DesignPreviewTemplate {
        nonce,
        customer,
        product: ProductView::from(product),
        preview: view,
    })
}
