//! Authentication service.
//!
//! Customer accounts are kept in an in-process directory with Argon2id
//! password hashes. The rest of the storefront only sees the outcome: a
//! [`CurrentCustomer`] stored in the session, or an [`AuthError`].

mod error;

pub use error::AuthError;

use std::collections::HashMap;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tokio::sync::RwLock;

use threadline_core::Email;

use crate::models::CurrentCustomer;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// A registered customer account.
#[derive(Debug, Clone)]
struct Account {
    customer: CurrentCustomer,
    password_hash: String,
}

/// In-memory customer directory.
#[derive(Debug, Default)]
pub struct CustomerDirectory {
    accounts: RwLock<HashMap<Email, Account>>,
}

impl CustomerDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered accounts.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// Whether no accounts are registered.
    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

/// Authentication service.
///
/// Handles customer registration and password login.
pub struct AuthService<'a> {
    directory: &'a CustomerDirectory,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(directory: &'a CustomerDirectory) -> Self {
        Self { directory }
    }

    /// Register a new customer with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::PasswordMismatch` if the confirmation differs.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register_with_password(
        &self,
        email: &str,
        password: &str,
        password_confirm: &str,
        name: Option<&str>,
    ) -> Result<CurrentCustomer, AuthError> {
        let email = Email::parse(email)?;

        if password != password_confirm {
            return Err(AuthError::PasswordMismatch);
        }
        validate_password(password)?;

        let password_hash = hash_password(password)?;
        let customer = CurrentCustomer::new(email.clone(), name);

        let mut accounts = self.directory.accounts.write().await;
        if accounts.contains_key(&email) {
            return Err(AuthError::UserAlreadyExists);
        }
        accounts.insert(
            email,
            Account {
                customer: customer.clone(),
                password_hash,
            },
        );

        tracing::info!(email = %customer.email, "Customer registered");
        Ok(customer)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CurrentCustomer, AuthError> {
        let email = Email::parse(email)?;

        let account = self
            .directory
            .accounts
            .read()
            .await
            .get(&email)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &account.password_hash)?;

        Ok(account.customer)
    }
}

/// Validate password strength.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PASSWORD: &str = "correct horse battery";

    #[tokio::test]
    async fn test_register_then_login() {
        let directory = CustomerDirectory::new();
        let auth = AuthService::new(&directory);

        let registered = auth
            .register_with_password("casey@threadline.test", PASSWORD, PASSWORD, Some("Casey"))
            .await
            .unwrap();
        assert_eq!(registered.display_name, "Casey");
        assert_eq!(directory.len().await, 1);

        let logged_in = auth
            .login_with_password("casey@THREADLINE.test", PASSWORD)
            .await
            .unwrap();
        assert_eq!(logged_in, registered);
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password_and_unknown_email() {
        let directory = CustomerDirectory::new();
        let auth = AuthService::new(&directory);
        auth.register_with_password("casey@threadline.test", PASSWORD, PASSWORD, None)
            .await
            .unwrap();

        assert!(matches!(
            auth.login_with_password("casey@threadline.test", "wrong password").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login_with_password("nobody@threadline.test", PASSWORD).await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_register_validation() {
        let directory = CustomerDirectory::new();
        let auth = AuthService::new(&directory);

        assert!(matches!(
            auth.register_with_password("not-an-email", PASSWORD, PASSWORD, None).await,
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(matches!(
            auth.register_with_password("a@b.c", "short", "short", None).await,
            Err(AuthError::WeakPassword(_))
        ));
        assert!(matches!(
            auth.register_with_password("a@b.c", PASSWORD, "different!", None).await,
            Err(AuthError::PasswordMismatch)
        ));
        assert!(directory.is_empty().await);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let directory = CustomerDirectory::new();
        let auth = AuthService::new(&directory);
        auth.register_with_password("a@b.c", PASSWORD, PASSWORD, None)
            .await
            .unwrap();

        assert!(matches!(
            auth.register_with_password("a@B.C", PASSWORD, PASSWORD, None).await,
            Err(AuthError::UserAlreadyExists)
        ));
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password(PASSWORD).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(PASSWORD, &hash).is_ok());
        assert!(verify_password("nope", &hash).is_err());
        assert!(verify_password(PASSWORD, "not a phc string").is_err());
    }
}
