use crate::data::{Address, PaymentMethod, ShippingMethod, UserCredentials};
use std::time::Duration;

/// What the storefront showed in the cart when it was validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSnapshot {
    pub item_count: usize,
    pub product_names: Vec<String>,
    pub total: String,
}

/// State threaded through one checkout run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutContext {
    pub added_products: Vec<String>,
    pub cart: CartSnapshot,
    pub billing_address: Option<Address>,
    pub shipping_method: Option<ShippingMethod>,
    pub payment_method: Option<PaymentMethod>,
    pub success_message: Option<String>,
    pub order_number: Option<String>,
}

/// Inputs of a run taken from the test data provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutPlan {
    pub credentials: UserCredentials,
    pub billing_address: Address,
    pub products: Vec<String>,
}

/// Tunables of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowOptions {
    /// At most this many product terms are searched and added.
    pub max_products: usize,
    pub shipping_method: ShippingMethod,
    pub payment_method: PaymentMethod,
    /// Bound on post-condition waits such as the authenticated check.
    pub post_condition_timeout: Duration,
    /// Bound on the order completion wait after confirming.
    pub confirmation_timeout: Duration,
    /// Stop successfully once this stage has passed.
    pub stop_after: Option<super::Stage>,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            max_products: 3,
            shipping_method: ShippingMethod::Ground,
            payment_method: PaymentMethod::Cash,
            post_condition_timeout: Duration::from_secs(10),
            confirmation_timeout: Duration::from_secs(15),
            stop_after: None,
        }
    }
}

impl FlowOptions {
    pub fn from_config(config: &crate::data::TestConfig) -> Self {
        Self {
            max_products: config.max_products,
            shipping_method: config.shipping_method,
            payment_method: config.payment_method,
            post_condition_timeout: config.element_wait(),
            confirmation_timeout: config.confirmation_wait(),
            stop_after: None,
        }
    }
}
