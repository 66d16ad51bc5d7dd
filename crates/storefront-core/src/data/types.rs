use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Account used to register and then log in during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredentials {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Address entered on the billing step of the checkout wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default = "default_country")]
    pub country: String,
    pub city: String,
    pub address1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    pub zip_code: String,
    pub phone: String,
}

impl Address {
    pub fn company(&self) -> Option<&str> {
        self.company.as_deref().filter(|c| !c.is_empty())
    }

    pub fn address2(&self) -> Option<&str> {
        self.address2.as_deref().filter(|a| !a.is_empty())
    }
}

fn default_country() -> String {
    "United States".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    #[default]
    Ground,
    NextDay,
    SecondDay,
}

impl ShippingMethod {
    pub fn label(&self) -> &'static str {
        match self {
            ShippingMethod::Ground => "Ground",
            ShippingMethod::NextDay => "Next Day Air",
            ShippingMethod::SecondDay => "2nd Day Air",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingMethod::Ground => "ground",
            ShippingMethod::NextDay => "next_day",
            ShippingMethod::SecondDay => "second_day",
        }
    }
}

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ShippingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ground" => Ok(ShippingMethod::Ground),
            "next_day" | "next-day" => Ok(ShippingMethod::NextDay),
            "second_day" | "second-day" => Ok(ShippingMethod::SecondDay),
            other => Err(format!(
                "unknown shipping method '{}' (expected ground, next_day or second_day)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Check,
    CreditCard,
    PurchaseOrder,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash On Delivery",
            PaymentMethod::Check => "Check / Money Order",
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::PurchaseOrder => "Purchase Order",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Check => "check",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::PurchaseOrder => "purchase_order",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "check" => Ok(PaymentMethod::Check),
            "credit_card" | "credit-card" => Ok(PaymentMethod::CreditCard),
            "purchase_order" | "purchase-order" => Ok(PaymentMethod::PurchaseOrder),
            other => Err(format!(
                "unknown payment method '{}' (expected cash, check, credit_card or purchase_order)",
                other
            )),
        }
    }
}

/// Run configuration read from the `test_config` section of the fixture.
///
/// Every field has a default so a fixture may omit the section entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    pub base_url: String,
    pub headless: bool,
    /// Seconds an element lookup may wait before failing.
    pub implicit_wait: u64,
    /// Seconds the order confirmation may take to appear.
    pub confirmation_timeout: u64,
    pub window_width: u32,
    pub window_height: u32,
    pub max_products: usize,
    pub shipping_method: ShippingMethod,
    pub payment_method: PaymentMethod,
    pub report_name: String,
    pub reports_dir: PathBuf,
    pub screenshots_dir: PathBuf,
}

impl TestConfig {
    pub fn element_wait(&self) -> Duration {
        Duration::from_secs(self.implicit_wait)
    }

    pub fn confirmation_wait(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout)
    }
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            base_url: "https://demowebshop.tricentis.com/".to_string(),
            headless: false,
            implicit_wait: 10,
            confirmation_timeout: 15,
            window_width: 1920,
            window_height: 1080,
            max_products: 3,
            shipping_method: ShippingMethod::Ground,
            payment_method: PaymentMethod::Cash,
            report_name: "e2e_checkout_test".to_string(),
            reports_dir: PathBuf::from("reports"),
            screenshots_dir: PathBuf::from("screenshots"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_optional_fields_default_to_none() {
        let json = r#"{
            "first_name": "Jane",
            "last_name": "Doe",
            "email": "jane@example.com",
            "city": "NYC",
            "address1": "1 Main St",
            "zip_code": "10001",
            "phone": "5551234567"
        }"#;

        let address: Address = serde_json::from_str(json).unwrap();
        assert_eq!(address.country, "United States");
        assert!(address.company().is_none());
        assert!(address.address2().is_none());
    }

    #[test]
    fn test_empty_company_is_treated_as_absent() {
        let json = r#"{
            "first_name": "Jane",
            "last_name": "Doe",
            "email": "jane@example.com",
            "company": "",
            "country": "Canada",
            "city": "Toronto",
            "address1": "1 King St",
            "address2": "Suite 4",
            "zip_code": "M5H",
            "phone": "5551234567"
        }"#;

        let address: Address = serde_json::from_str(json).unwrap();
        assert!(address.company().is_none());
        assert_eq!(address.address2(), Some("Suite 4"));
    }

    #[test]
    fn test_methods_parse_from_fixture_names() {
        assert_eq!("ground".parse::<ShippingMethod>(), Ok(ShippingMethod::Ground));
        assert_eq!("NEXT_DAY".parse::<ShippingMethod>(), Ok(ShippingMethod::NextDay));
        assert_eq!("credit-card".parse::<PaymentMethod>(), Ok(PaymentMethod::CreditCard));
        assert!("teleport".parse::<ShippingMethod>().is_err());
        assert!("barter".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_config_fills_missing_fields_with_defaults() {
        let config: TestConfig =
            serde_json::from_str(r#"{"base_url": "http://localhost:8080/", "headless": true}"#)
                .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080/");
        assert!(config.headless);
        assert_eq!(config.max_products, 3);
        assert_eq!(config.element_wait(), Duration::from_secs(10));
        assert_eq!(config.payment_method, PaymentMethod::Cash);
    }
}
