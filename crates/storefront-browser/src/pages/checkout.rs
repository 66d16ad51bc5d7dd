use crate::driver::Driver;
use crate::locator::{Locator, LocatorChain};
use async_trait::async_trait;
use std::time::Duration;
use storefront_core::Result;
use storefront_core::data::{Address, PaymentMethod, ShippingMethod};
use storefront_core::pages::CheckoutPage;

const BILLING_FIRST_NAME: &str = "BillingNewAddress_FirstName";
const BILLING_LAST_NAME: &str = "BillingNewAddress_LastName";
const BILLING_EMAIL: &str = "BillingNewAddress_Email";
const BILLING_COMPANY: &str = "BillingNewAddress_Company";
const BILLING_COUNTRY: &str = "BillingNewAddress_CountryId";
const BILLING_CITY: &str = "BillingNewAddress_City";
const BILLING_ADDRESS1: &str = "BillingNewAddress_Address1";
const BILLING_ADDRESS2: &str = "BillingNewAddress_Address2";
const BILLING_ZIP: &str = "BillingNewAddress_ZipPostalCode";
const BILLING_PHONE: &str = "BillingNewAddress_PhoneNumber";

const BILLING_CONTINUE: &str = "#billing-buttons-container .button-1.new-address-next-step-button";
const SHIPPING_CONTINUE: &str = "#shipping-buttons-container .button-1.new-address-next-step-button";
const SHIPPING_METHOD_CONTINUE: &str =
    "#shipping-method-buttons-container .button-1.shipping-method-next-step-button";
const PAYMENT_METHOD_CONTINUE: &str =
    "#payment-method-buttons-container .button-1.payment-method-next-step-button";
const PAYMENT_INFO_CONTINUE: &str =
    "#payment-info-buttons-container .button-1.payment-info-next-step-button";
const CONFIRM_BUTTON: &str = "#confirm-order-buttons-container .button-1.confirm-order-next-step-button";

const ORDER_SUCCESS_MESSAGE: &str = ".section.order-completed .title strong";
const ORDER_NUMBER: &str = ".order-number";

const ORDER_NUMBER_WAIT: Duration = Duration::from_secs(3);

/// Radio button id of a shipping option in the wizard.
pub fn shipping_option_id(method: ShippingMethod) -> String {
    let index = match method {
        ShippingMethod::Ground => 0,
        ShippingMethod::NextDay => 1,
        ShippingMethod::SecondDay => 2,
    };
    format!("shippingoption_{}", index)
}

/// Radio button id of a payment method in the wizard.
pub fn payment_method_id(method: PaymentMethod) -> String {
    let index = match method {
        PaymentMethod::Cash => 0,
        PaymentMethod::Check => 1,
        PaymentMethod::CreditCard => 2,
        PaymentMethod::PurchaseOrder => 3,
    };
    format!("paymentmethod_{}", index)
}

/// The one-page checkout wizard.
pub struct CheckoutWizard {
    driver: Driver,
    completion_wait: Duration,
}

impl CheckoutWizard {
    pub fn new(driver: Driver, completion_wait: Duration) -> Self {
        Self {
            driver,
            completion_wait,
        }
    }

    async fn fill(&self, id: &str, value: &str) -> Result<()> {
        self.driver.type_text(&Locator::id(id), value).await?;
        Ok(())
    }
}

#[async_trait]
impl CheckoutPage for CheckoutWizard {
    async fn fill_billing_address(&self, address: &Address) -> Result<()> {
        tracing::info!("Filling billing address");

        self.fill(BILLING_FIRST_NAME, &address.first_name).await?;
        self.fill(BILLING_LAST_NAME, &address.last_name).await?;
        self.fill(BILLING_EMAIL, &address.email).await?;
        if let Some(company) = address.company() {
            self.fill(BILLING_COMPANY, company).await?;
        }
        self.driver
            .select_by_text(&Locator::id(BILLING_COUNTRY), &address.country)
            .await?;
        self.fill(BILLING_CITY, &address.city).await?;
        self.fill(BILLING_ADDRESS1, &address.address1).await?;
        if let Some(address2) = address.address2() {
            self.fill(BILLING_ADDRESS2, address2).await?;
        }
        self.fill(BILLING_ZIP, &address.zip_code).await?;
        self.fill(BILLING_PHONE, &address.phone).await?;
        Ok(())
    }

    async fn continue_billing(&self) -> Result<()> {
        self.driver.click(&Locator::css(BILLING_CONTINUE)).await?;
        Ok(())
    }

    async fn continue_shipping_address(&self) -> Result<()> {
        self.driver.click(&Locator::css(SHIPPING_CONTINUE)).await?;
        Ok(())
    }

    async fn select_shipping_method(&self, method: ShippingMethod) -> Result<()> {
        tracing::info!("Selecting shipping method: {}", method);
        self.driver
            .click(&Locator::id(&shipping_option_id(method)))
            .await?;
        Ok(())
    }

    async fn continue_shipping_method(&self) -> Result<()> {
        self.driver
            .click(&Locator::css(SHIPPING_METHOD_CONTINUE))
            .await?;
        Ok(())
    }

    async fn select_payment_method(&self, method: PaymentMethod) -> Result<()> {
        tracing::info!("Selecting payment method: {}", method);
        self.driver
            .click(&Locator::id(&payment_method_id(method)))
            .await?;
        Ok(())
    }

    async fn continue_payment_method(&self) -> Result<()> {
        self.driver
            .click(&Locator::css(PAYMENT_METHOD_CONTINUE))
            .await?;
        Ok(())
    }

    async fn continue_payment_info(&self) -> Result<()> {
        self.driver
            .click(&Locator::css(PAYMENT_INFO_CONTINUE))
            .await?;
        Ok(())
    }

    async fn confirm_order(&self) -> Result<()> {
        tracing::info!("Confirming order");
        self.driver.click(&Locator::css(CONFIRM_BUTTON)).await?;
        Ok(())
    }

    async fn is_order_completed(&self) -> Result<bool> {
        Ok(self
            .driver
            .wait_visible(&Locator::css(ORDER_SUCCESS_MESSAGE), self.completion_wait)
            .await?)
    }

    async fn order_success_message(&self) -> Result<String> {
        Ok(self
            .driver
            .text(&Locator::css(ORDER_SUCCESS_MESSAGE))
            .await?)
    }

    async fn order_number(&self) -> Result<Option<String>> {
        let chain = LocatorChain::new(vec![Locator::css(ORDER_NUMBER)]);
        Ok(self.driver.first_text(&chain, ORDER_NUMBER_WAIT).await?)
    }
}
