//! Session-scoped cart provider.
//!
//! Each browser session owns exactly one [`Cart`]. Handlers resolve it with
//! the [`SessionCart`] extractor, mutate it through the cart's own
//! operations, and call [`SessionCart::save`] before responding. There is no
//! other path to a cart.
//!
//! The session layer is the provider. A route reached without it cannot
//! resolve a cart and fails immediately with [`CartError::NoActiveSession`]
//! instead of handing out a throwaway empty cart.

use axum::{extract::FromRequestParts, http::request::Parts};
use thiserror::Error;
use tower_sessions::Session;

use threadline_core::Cart;

use crate::error::AppError;
use crate::models::session_keys;

/// Errors resolving or persisting the session cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// The request did not pass through the session layer.
    #[error("cart must be used within a session provider")]
    NoActiveSession,

    /// The session store failed to load or save the cart.
    #[error("failed to load or save cart: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// The cart of the current session.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(mut cart: SessionCart) -> Result<impl IntoResponse> {
///     cart.cart_mut().clear_cart();
///     cart.save().await?;
///     Ok(format!("{} items", cart.cart().total_items()))
/// }
/// ```
pub struct SessionCart {
    session: Session,
    cart: Cart,
}

impl SessionCart {
    /// Load the cart stored in `session`, starting an empty one on first use.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Session` if the session store fails.
    pub async fn load(session: Session) -> Result<Self, CartError> {
        let cart = session
            .get::<Cart>(session_keys::CART)
            .await?
            .unwrap_or_default();

        Ok(Self { session, cart })
    }

    /// Read access to the cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Mutable access to the cart. Call [`SessionCart::save`] afterwards.
    pub const fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Write the cart back to the session.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Session` if the session store fails.
    pub async fn save(&self) -> Result<(), CartError> {
        self.session.insert(session_keys::CART, &self.cart).await?;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for SessionCart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>().cloned() else {
            tracing::error!(
                path = %parts.uri.path(),
                "Cart requested on a route without the session layer"
            );
            return Err(CartError::NoActiveSession.into());
        };

        Ok(Self::load(session).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroU32;
    use std::sync::Arc;

    use axum::http::Request;
    use tower_sessions::MemoryStore;

    use threadline_core::{Color, CurrencyCode, Price, PrintArea, Product, ProductId};

    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::new("A"),
            handle: "a".to_string(),
            title: "A".to_string(),
            description: String::new(),
            price: Price::from_cents(1000, CurrencyCode::USD),
            sizes: vec!["M".to_string()],
            colors: vec![Color::new("Red", "#f00")],
            images: Vec::new(),
            print_area: PrintArea::default(),
            tags: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_missing_session_fails_fast() {
        let (mut parts, ()) = Request::builder()
            .uri("/cart")
            .body(())
            .unwrap()
            .into_parts();

        let Err(err) = SessionCart::from_request_parts(&mut parts, &()).await else {
            panic!("cart resolved without a session");
        };
        assert!(matches!(err, AppError::Cart(CartError::NoActiveSession)));
    }

    #[tokio::test]
    async fn test_cart_survives_save_and_reload() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);

        let mut cart = SessionCart::load(session.clone()).await.unwrap();
        assert!(cart.cart().is_empty());

        let product = product();
        cart.cart_mut()
            .add_to_cart(&product, "M", &Color::new("Red", "#f00"), NonZeroU32::MIN);
        cart.save().await.unwrap();

        let reloaded = SessionCart::load(session).await.unwrap();
        assert_eq!(reloaded.cart().total_items(), 1);
        assert!(reloaded.cart().is_open());
    }
}
