//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Each mutating handler resolves the session cart, applies exactly one cart
//! operation, writes the cart back and answers with a fragment plus an
//! `HX-Trigger: cart-updated` header. Plain form posts get a redirect to the
//! cart page instead of a fragment.

use std::num::NonZeroU32;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use threadline_core::{Cart, CartItem, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::htmx::{CART_UPDATED_EVENT, HX_TRIGGER_HEADER};
use crate::middleware::{CspNonce, HxRequest, OptionalAuth, RequireAuth, SessionCart};
use crate::models::CurrentCustomer;
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: String,
    pub handle: String,
    pub title: String,
    pub image_url: Option<String>,
    pub size: String,
    pub color_name: String,
    pub color_value: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total_items: u64,
    pub total_price: String,
    pub is_open: bool,
}

impl CartView {
    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product.id.to_string(),
            handle: item.product.handle.clone(),
            title: item.product.title.clone(),
            image_url: item.product.image_url.clone(),
            size: item.selected_size.clone(),
            color_name: item.selected_color.name.clone(),
            color_value: item.selected_color.value.clone(),
            quantity: item.quantity(),
            unit_price: item.product.price.to_string(),
            line_price: item.line_price().to_string(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartLineView::from).collect(),
            total_items: cart.total_items(),
            total_price: cart.total_price().to_string(),
            is_open: cart.is_open(),
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub handle: String,
    pub size: String,
    pub color: String,
    pub quantity: Option<u32>,
}

/// Identifies one cart line.
#[derive(Debug, Deserialize)]
pub struct LineForm {
    pub product_id: String,
    pub size: String,
    pub color: String,
}

/// Update cart form data.
///
/// `quantity` is signed: zero or less removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub size: String,
    pub color: String,
    pub quantity: i64,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub nonce: String,
    pub customer: Option<CurrentCustomer>,
    pub cart: CartView,
}

/// Cart drawer fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_drawer.html")]
pub struct CartDrawerTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Checkout summary page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub nonce: String,
    pub customer: Option<CurrentCustomer>,
    pub cart: CartView,
}

// =============================================================================
// Helpers
// =============================================================================

/// Persist the cart and answer with `fragment`, or redirect plain form posts.
async fn respond_updated(
    cart: &SessionCart,
    HxRequest(is_htmx): HxRequest,
    fragment: impl IntoResponse,
) -> Result<Response> {
    cart.save().await?;

    let trigger = AppendHeaders([(HX_TRIGGER_HEADER, CART_UPDATED_EVENT)]);
    if is_htmx {
        Ok((trigger, fragment).into_response())
    } else {
        Ok((trigger, Redirect::to("/cart")).into_response())
    }
}

fn items_fragment(cart: &SessionCart) -> CartItemsTemplate {
    CartItemsTemplate {
        cart: CartView::from(cart.cart()),
    }
}

fn drawer_fragment(cart: &SessionCart) -> CartDrawerTemplate {
    CartDrawerTemplate {
        cart: CartView::from(cart.cart()),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(cart, nonce, customer))]
pub async fn show(
    cart: SessionCart,
    CspNonce(nonce): CspNonce,
    OptionalAuth(customer): OptionalAuth,
) -> impl IntoResponse {
    CartShowTemplate {
        nonce,
        customer,
        cart: CartView::from(cart.cart()),
    }
}

/// Cart drawer fragment. Renders nothing visible while the drawer is closed.
#[instrument(skip(cart))]
pub async fn drawer(cart: SessionCart) -> impl IntoResponse {
    drawer_fragment(&cart)
}

/// Get cart count badge (HTMX).
#[instrument(skip(cart))]
pub async fn count(cart: SessionCart) -> impl IntoResponse {
    CartCountTemplate {
        count: cart.cart().total_items(),
    }
}

/// Add item to cart (HTMX).
///
/// Validates the variant against the catalog, merges into an existing line
/// with the same product, size and colour, and opens the drawer.
#[instrument(skip(state, cart, hx))]
pub async fn add(
    State(state): State<AppState>,
    mut cart: SessionCart,
    hx: HxRequest,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let quantity = NonZeroU32::new(form.quantity.unwrap_or(1))
        .ok_or_else(|| AppError::BadRequest("quantity must be at least 1".to_string()))?;

    let selection = state
        .catalog()
        .resolve_selection(&form.handle, &form.size, &form.color)?;

    cart.cart_mut()
        .add_to_cart(selection.product, selection.size, selection.color, quantity);

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[
            ("product", selection.product.handle.as_str()),
            ("size", selection.size),
            ("color", selection.color.name.as_str()),
        ]),
    );
    tracing::info!(
        product = %selection.product.handle,
        size = selection.size,
        color = %selection.color.name,
        quantity = quantity.get(),
        "Added to cart"
    );

    let fragment = drawer_fragment(&cart);
    respond_updated(&cart, hx, fragment).await
}

/// Update cart item quantity (HTMX).
#[instrument(skip(cart, hx))]
pub async fn update(
    mut cart: SessionCart,
    hx: HxRequest,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    cart.cart_mut().update_quantity(
        &ProductId::new(form.product_id),
        &form.size,
        &form.color,
        form.quantity,
    );

    let fragment = items_fragment(&cart);
    respond_updated(&cart, hx, fragment).await
}

/// Remove item from cart (HTMX).
#[instrument(skip(cart, hx))]
pub async fn remove(
    mut cart: SessionCart,
    hx: HxRequest,
    Form(form): Form<LineForm>,
) -> Result<Response> {
    cart.cart_mut()
        .remove_from_cart(&ProductId::new(form.product_id), &form.size, &form.color);

    let fragment = items_fragment(&cart);
    respond_updated(&cart, hx, fragment).await
}

/// Empty the cart (HTMX).
#[instrument(skip(cart, hx))]
pub async fn clear(mut cart: SessionCart, hx: HxRequest) -> Result<Response> {
    cart.cart_mut().clear_cart();
    add_breadcrumb("cart", "Cleared cart", None);

    let fragment = items_fragment(&cart);
    respond_updated(&cart, hx, fragment).await
}

/// Show the cart drawer (HTMX).
#[instrument(skip(cart, hx))]
pub async fn open(mut cart: SessionCart, hx: HxRequest) -> Result<Response> {
    cart.cart_mut().set_is_open(true);

    let fragment = drawer_fragment(&cart);
    respond_updated(&cart, hx, fragment).await
}

/// Hide the cart drawer (HTMX).
#[instrument(skip(cart, hx))]
pub async fn close(mut cart: SessionCart, hx: HxRequest) -> Result<Response> {
    cart.cart_mut().set_is_open(false);

    let fragment = drawer_fragment(&cart);
    respond_updated(&cart, hx, fragment).await
}

/// Checkout summary. Requires a logged-in customer.
///
/// Payment is out of scope; the page confirms the order contents only.
#[instrument(skip_all)]
pub async fn checkout(
    RequireAuth(customer): RequireAuth,
    cart: SessionCart,
    CspNonce(nonce): CspNonce,
) -> Response {
    if cart.cart().is_empty() {
        return Redirect::to("/cart").into_response();
    }

    CheckoutTemplate {
        nonce,
        customer: Some(customer),
        cart: CartView::from(cart.cart()),
    }
    .into_response()
}
