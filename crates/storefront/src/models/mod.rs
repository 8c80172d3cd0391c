//! Domain models for storefront.
//!
//! Product and cart types live in `threadline-core`; this module holds the
//! types that only make sense inside a storefront session.

pub mod session;

pub use session::{CurrentCustomer, keys as session_keys};
