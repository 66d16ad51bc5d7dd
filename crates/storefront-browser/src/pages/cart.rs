use crate::driver::Driver;
use crate::locator::{Locator, LocatorChain};
use async_trait::async_trait;
use std::time::Duration;
use storefront_core::Result;
use storefront_core::pages::CartPage;

const ITEM_ROWS: &str = ".cart-item-row";
const PRODUCT_NAMES: &str = ".cart-item-row .product-name";
const TERMS_OF_SERVICE: &str = "termsofservice";
const CHECKOUT_BUTTON: &str = "checkout";

/// Per-entry wait while probing the total locators.
const TOTAL_PROBE_WAIT: Duration = Duration::from_secs(1);

/// Places the storefront theme has rendered the order total, most specific first.
pub fn total_locators() -> LocatorChain {
    LocatorChain::default()
        .then(Locator::css(".order-total .cart-total-right strong"))
        .then(Locator::css(".order-total strong"))
        .then(Locator::xpath("//div[@class='order-total']//strong"))
        .then(Locator::xpath("//*[contains(@class, 'order-total')]//strong"))
        .then(Locator::css(".cart-total strong"))
        .then(Locator::xpath("//span[@class='order-total']//strong"))
}

pub struct CartView {
    driver: Driver,
}

impl CartView {
    pub fn new(driver: Driver) -> Self {
        Self { driver }
    }
}

#[async_trait]
impl CartPage for CartView {
    async fn items_count(&self) -> Result<usize> {
        Ok(self.driver.count(&Locator::css(ITEM_ROWS)).await?)
    }

    async fn product_names(&self) -> Result<Vec<String>> {
        Ok(self.driver.texts(&Locator::css(PRODUCT_NAMES)).await?)
    }

    async fn total(&self) -> Result<Option<String>> {
        if let Some(total) = self
            .driver
            .first_text(&total_locators(), TOTAL_PROBE_WAIT)
            .await?
        {
            return Ok(Some(total));
        }

        // Last resort: any bold text carrying a currency sign.
        let total = self
            .driver
            .texts(&Locator::css("strong"))
            .await?
            .into_iter()
            .find(|t| t.contains('$'));
        if total.is_none() {
            tracing::warn!("No order total found in the cart");
        }
        Ok(total)
    }

    async fn proceed_to_checkout(&self) -> Result<()> {
        self.driver.click(&Locator::id(TERMS_OF_SERVICE)).await?;
        self.driver
            .click_and_wait(&Locator::id(CHECKOUT_BUTTON))
            .await?;
        Ok(())
    }
}
