//! Session-related types.
//!
//! Types stored in the session for authentication and cart state.

use serde::{Deserialize, Serialize};

use threadline_core::Email;

/// Session-stored customer identity.
///
/// Minimal data stored in the session to identify the logged-in customer.
/// Its presence in the session is the storefront's "is authenticated" signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentCustomer {
    /// Customer's email address.
    pub email: Email,
    /// Name shown in the header; falls back to the email local part.
    pub display_name: String,
}

impl CurrentCustomer {
    /// Create a session identity, deriving a display name when none is given.
    #[must_use]
    pub fn new(email: Email, name: Option<&str>) -> Self {
        let display_name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map_or_else(|| email.local_part().to_string(), str::to_string);

        Self {
            email,
            display_name,
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in customer.
    pub const CURRENT_CUSTOMER: &str = "current_customer";

    /// Key for storing the shopping cart.
    pub const CART: &str = "cart";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback() {
        let email = Email::parse("casey@threadline.test").unwrap();
        assert_eq!(CurrentCustomer::new(email.clone(), None).display_name, "casey");
        assert_eq!(CurrentCustomer::new(email.clone(), Some("  ")).display_name, "casey");
        assert_eq!(
            CurrentCustomer::new(email, Some(" Casey Doe ")).display_name,
            "Casey Doe"
        );
    }
}
