//! Home page route handler.
//!
//! The home page is also where the route guard sends anonymous visitors:
//! a [`LoginIntent`] in the query string opens the login dialog and carries
//! the original destination into the login form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use tracing::instrument;

use crate::filters;
use crate::middleware::{CspNonce, LoginIntent, OptionalAuth};
use crate::models::CurrentCustomer;
use crate::routes::products::ProductCardView;
use crate::state::AppState;

// =============================================================================
// Marketing Sections (static content)
// =============================================================================

/// Hero banner at the top of the home page.
#[derive(Clone)]
pub struct HeroConfig {
    pub eyebrow: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub primary_text: &'static str,
    pub primary_url: &'static str,
    pub secondary_text: &'static str,
    pub secondary_url: &'static str,
    pub image_path: &'static str,
    pub image_alt: &'static str,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            eyebrow: "Custom apparel, printed to order",
            title: "Wear what you made",
            subtitle: "Upload your artwork or type a slogan, see it on the garment, and we print it on heavyweight cotton.",
            primary_text: "Start designing",
            primary_url: "/products",
            secondary_text: "How it works",
            secondary_url: "#how-it-works",
            image_path: "/static/images/hero.svg",
            image_alt: "Folded custom printed t-shirts",
        }
    }
}

/// One step of the "how it works" section.
#[derive(Clone)]
pub struct Step {
    pub number: u8,
    pub title: &'static str,
    pub body: &'static str,
}

fn how_it_works() -> Vec<Step> {
    vec![
        Step {
            number: 1,
            title: "Pick a blank",
            body: "Choose a tee, hoodie or tote in the size and colour you want.",
        },
        Step {
            number: 2,
            title: "Add your design",
            body: "Paste a link to your artwork or type a line of text, then scale, move and rotate it.",
        },
        Step {
            number: 3,
            title: "Preview it for real",
            body: "See the design on the actual garment photo, front or back, before you buy.",
        },
        Step {
            number: 4,
            title: "We print and ship",
            body: "Every piece is printed to order and ships within five working days.",
        },
    ]
}

/// Newsletter call-to-action band.
#[derive(Clone)]
pub struct NewsletterCta {
    pub title: &'static str,
    pub body: &'static str,
    pub button_text: &'static str,
    pub button_url: &'static str,
}

impl Default for NewsletterCta {
    fn default() -> Self {
        Self {
            title: "New blanks, first",
            body: "Create an account to hear about new garments and limited colours before anyone else.",
            button_text: "Join the list",
            button_url: "/auth/register",
        }
    }
}

/// Login dialog state derived from the guard's redirect.
#[derive(Clone)]
pub struct LoginDialog {
    /// Hidden `redirect_to` field of the login form.
    pub redirect_to: String,
}

impl LoginDialog {
    /// Open the dialog only when asked to and nobody is logged in.
    fn from_intent(intent: &LoginIntent, customer: Option<&CurrentCustomer>) -> Option<Self> {
        (intent.login && customer.is_none()).then(|| Self {
            redirect_to: intent.safe_target().to_string(),
        })
    }
}

/// Number of products in the featured grid.
const FEATURED_PRODUCTS: usize = 4;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nonce: String,
    pub customer: Option<CurrentCustomer>,
    pub hero: HeroConfig,
    pub featured_products: Vec<ProductCardView>,
    pub steps: Vec<Step>,
    pub newsletter: NewsletterCta,
    pub login_dialog: Option<LoginDialog>,
}

/// Display the home page.
#[instrument(skip(state, nonce, customer))]
pub async fn home(
    State(state): State<AppState>,
    CspNonce(nonce): CspNonce,
    OptionalAuth(customer): OptionalAuth,
    Query(intent): Query<LoginIntent>,
) -> impl IntoResponse {
    let login_dialog = LoginDialog::from_intent(&intent, customer.as_ref());

    HomeTemplate {
        nonce,
        customer,
        hero: HeroConfig::default(),
        featured_products: state
            .catalog()
            .featured(FEATURED_PRODUCTS)
            .iter()
            .map(ProductCardView::from)
            .collect(),
        steps: how_it_works(),
        newsletter: NewsletterCta::default(),
        login_dialog,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use threadline_core::Email;

    use super::*;

    #[test]
    fn test_login_dialog_from_intent() {
        let intent = LoginIntent {
            redirect_to: Some("/checkout".to_string()),
            login: true,
        };
        let dialog = LoginDialog::from_intent(&intent, None).unwrap();
        assert_eq!(dialog.redirect_to, "/checkout");

        let customer = CurrentCustomer::new(Email::parse("a@b.c").unwrap(), None);
        assert!(LoginDialog::from_intent(&intent, Some(&customer)).is_none());
        assert!(LoginDialog::from_intent(&LoginIntent::default(), None).is_none());
    }

    #[test]
    fn test_login_dialog_drops_foreign_target() {
        let intent = LoginIntent {
            redirect_to: Some("https://evil.test/".to_string()),
            login: true,
        };
        let dialog = LoginDialog::from_intent(&intent, None).unwrap();
        assert_eq!(dialog.redirect_to, "/account");
    }

    #[test]
    fn test_how_it_works_is_numbered() {
        let steps = how_it_works();
        assert!(steps.iter().zip(1u8..).all(|(step, n)| step.number == n));
    }
}
