//! Contracts the checkout flow consumes from page objects.
//!
//! Each trait covers one logical page of the storefront. Actions either
//! complete or return an error; queries report what the page currently shows.
//! Element-level waiting and retrying is the implementor's concern.

use crate::Result;
use crate::data::{Address, PaymentMethod, ShippingMethod, UserCredentials};
use async_trait::async_trait;
use std::path::PathBuf;

#[async_trait]
pub trait RegistrationPage: Send + Sync {
    async fn open(&self) -> Result<()>;

    /// Submit the registration form. `false` means the site refused it.
    async fn register(&self, credentials: &UserCredentials) -> Result<bool>;
}

#[async_trait]
pub trait LoginPage: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<()>;

    /// `false` when the site still shows an active session afterwards.
    async fn logout(&self) -> Result<bool>;

    async fn is_logged_in(&self) -> Result<bool>;
}

#[async_trait]
pub trait HomePage: Send + Sync {
    async fn search(&self, term: &str) -> Result<()>;

    async fn open_cart(&self) -> Result<()>;

    /// Return to the storefront landing page.
    async fn go_home(&self) -> Result<()>;
}

#[async_trait]
pub trait ProductPage: Send + Sync {
    async fn results_count(&self) -> Result<usize>;

    async fn add_from_listing(&self, index: usize) -> Result<()>;

    async fn close_notification(&self) -> Result<()>;
}

#[async_trait]
pub trait CartPage: Send + Sync {
    async fn items_count(&self) -> Result<usize>;

    async fn product_names(&self) -> Result<Vec<String>>;

    /// Displayed order total, `None` when no total could be read.
    async fn total(&self) -> Result<Option<String>>;

    /// Accept the terms of service and start checkout.
    async fn proceed_to_checkout(&self) -> Result<()>;
}

#[async_trait]
pub trait CheckoutPage: Send + Sync {
    async fn fill_billing_address(&self, address: &Address) -> Result<()>;

    async fn continue_billing(&self) -> Result<()>;

    async fn continue_shipping_address(&self) -> Result<()>;

    async fn select_shipping_method(&self, method: ShippingMethod) -> Result<()>;

    async fn continue_shipping_method(&self) -> Result<()>;

    async fn select_payment_method(&self, method: PaymentMethod) -> Result<()>;

    async fn continue_payment_method(&self) -> Result<()>;

    async fn continue_payment_info(&self) -> Result<()>;

    async fn confirm_order(&self) -> Result<()>;

    async fn is_order_completed(&self) -> Result<bool>;

    async fn order_success_message(&self) -> Result<String>;

    async fn order_number(&self) -> Result<Option<String>>;
}

/// Captures diagnostic artifacts (screenshots) of the current page.
#[async_trait]
pub trait Diagnostics: Send + Sync {
    async fn capture(&self, name: &str) -> Result<PathBuf>;
}

/// The page objects one run drives, all bound to the same browser session.
#[derive(Clone, Copy)]
pub struct Pages<'a> {
    pub registration: &'a dyn RegistrationPage,
    pub login: &'a dyn LoginPage,
    pub home: &'a dyn HomePage,
    pub product: &'a dyn ProductPage,
    pub cart: &'a dyn CartPage,
    pub checkout: &'a dyn CheckoutPage,
    pub diagnostics: &'a dyn Diagnostics,
}
