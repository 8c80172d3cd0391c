//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Customer accounts and password authentication

pub mod auth;
