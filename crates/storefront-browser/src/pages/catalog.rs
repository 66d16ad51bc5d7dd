use crate::driver::Driver;
use crate::locator::Locator;
use async_trait::async_trait;
use storefront_core::pages::{HomePage, ProductPage};
use storefront_core::{Error, Result};

const SEARCH_BOX: &str = "small-searchterms";
const SEARCH_BUTTON: &str = ".button-1.search-box-button";
const LOGO: &str = ".header-logo a";
const CART_LINK: &str = "Shopping cart";

const RESULT_ITEMS: &str = ".product-item";
const ADD_TO_CART_BUTTONS: &str = ".button-2.product-box-add-to-cart-button";
const ADDED_NOTIFICATION: &str = ".bar-notification.success";
const NOTIFICATION_CLOSE: &str = ".bar-notification .close";

/// Search box, logo and cart link present on every storefront page.
pub struct Header {
    driver: Driver,
}

impl Header {
    pub fn new(driver: Driver) -> Self {
        Self { driver }
    }
}

#[async_trait]
impl HomePage for Header {
    async fn search(&self, term: &str) -> Result<()> {
        tracing::info!("Searching for: {}", term);
        self.driver.type_text(&Locator::id(SEARCH_BOX), term).await?;
        self.driver
            .click_and_wait(&Locator::css(SEARCH_BUTTON))
            .await?;
        Ok(())
    }

    async fn open_cart(&self) -> Result<()> {
        self.driver
            .click_and_wait(&Locator::link_text(CART_LINK))
            .await?;
        Ok(())
    }

    async fn go_home(&self) -> Result<()> {
        self.driver.click_and_wait(&Locator::css(LOGO)).await?;
        Ok(())
    }
}

pub struct SearchResults {
    driver: Driver,
}

impl SearchResults {
    pub fn new(driver: Driver) -> Self {
        Self { driver }
    }
}

#[async_trait]
impl ProductPage for SearchResults {
    async fn results_count(&self) -> Result<usize> {
        let count = self.driver.count(&Locator::css(RESULT_ITEMS)).await?;
        tracing::info!("Search returned {} products", count);
        Ok(count)
    }

    async fn add_from_listing(&self, index: usize) -> Result<()> {
        self.driver
            .click_nth(&Locator::css(ADD_TO_CART_BUTTONS), index)
            .await?;

        let added = self
            .driver
            .wait_visible(&Locator::css(ADDED_NOTIFICATION), self.driver.wait())
            .await?;
        if !added {
            return Err(Error::PostConditionFailed(
                "Add-to-cart confirmation was not shown".to_string(),
            ));
        }
        Ok(())
    }

    async fn close_notification(&self) -> Result<()> {
        let close = Locator::css(NOTIFICATION_CLOSE);
        if self.driver.is_visible(&close).await? {
            self.driver.click(&close).await?;
        }
        Ok(())
    }
}
