//! Page objects for the demo web shop, all sharing one [`Driver`].

mod account;
mod cart;
mod catalog;
mod checkout;

pub use account::{LoginForm, RegistrationForm};
pub use cart::{CartView, total_locators};
pub use catalog::{Header, SearchResults};
pub use checkout::{CheckoutWizard, payment_method_id, shipping_option_id};

use crate::driver::Driver;
use crate::screenshots::ScreenshotStore;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use storefront_core::pages::{Diagnostics, Pages};

/// Every page object of the storefront bound to one browser page.
pub struct Storefront {
    registration: RegistrationForm,
    login: LoginForm,
    header: Header,
    search: SearchResults,
    cart: CartView,
    checkout: CheckoutWizard,
    screenshots: ScreenshotStore,
    driver: Driver,
}

impl Storefront {
    pub fn new(driver: Driver, screenshots: ScreenshotStore, completion_wait: Duration) -> Self {
        Self {
            registration: RegistrationForm::new(driver.clone()),
            login: LoginForm::new(driver.clone()),
            header: Header::new(driver.clone()),
            search: SearchResults::new(driver.clone()),
            cart: CartView::new(driver.clone()),
            checkout: CheckoutWizard::new(driver.clone(), completion_wait),
            screenshots,
            driver,
        }
    }

    pub fn pages(&self) -> Pages<'_> {
        Pages {
            registration: &self.registration,
            login: &self.login,
            home: &self.header,
            product: &self.search,
            cart: &self.cart,
            checkout: &self.checkout,
            diagnostics: self,
        }
    }

    pub fn screenshots(&self) -> &ScreenshotStore {
        &self.screenshots
    }

    pub async fn capture_success(&self, name: &str) -> crate::Result<PathBuf> {
        self.screenshots.capture_success(&self.driver, name).await
    }
}

#[async_trait]
impl Diagnostics for Storefront {
    async fn capture(&self, name: &str) -> storefront_core::Result<PathBuf> {
        Ok(self.screenshots.capture(&self.driver, name).await?)
    }
}
