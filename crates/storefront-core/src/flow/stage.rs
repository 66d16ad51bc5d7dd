use std::fmt;
use std::str::FromStr;

/// Stages of a checkout run, in the order the storefront enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Register,
    Logout,
    Login,
    PopulateCart,
    ValidateCart,
    EnterCheckout,
    Billing,
    ShippingAddress,
    ShippingMethod,
    PaymentMethod,
    PaymentInfo,
    Confirm,
    ValidateConfirmation,
}

impl Stage {
    pub const ALL: [Stage; 13] = [
        Stage::Register,
        Stage::Logout,
        Stage::Login,
        Stage::PopulateCart,
        Stage::ValidateCart,
        Stage::EnterCheckout,
        Stage::Billing,
        Stage::ShippingAddress,
        Stage::ShippingMethod,
        Stage::PaymentMethod,
        Stage::PaymentInfo,
        Stage::Confirm,
        Stage::ValidateConfirmation,
    ];

    /// Ordinal position, which is also the step index in the report.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human label written to the report.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Register => "User Registration",
            Stage::Logout => "Logout After Registration",
            Stage::Login => "Login with New Credentials",
            Stage::PopulateCart => "Add Products to Cart",
            Stage::ValidateCart => "Cart Validation",
            Stage::EnterCheckout => "Proceed to Checkout",
            Stage::Billing => "Fill Billing Address",
            Stage::ShippingAddress => "Confirm Shipping Address",
            Stage::ShippingMethod => "Select Shipping Method",
            Stage::PaymentMethod => "Select Payment Method",
            Stage::PaymentInfo => "Confirm Payment Information",
            Stage::Confirm => "Confirm Order",
            Stage::ValidateConfirmation => "Order Completion Validation",
        }
    }

    /// Stable identifier used on the command line and in artifact names.
    pub fn key(self) -> &'static str {
        match self {
            Stage::Register => "register",
            Stage::Logout => "logout",
            Stage::Login => "login",
            Stage::PopulateCart => "populate_cart",
            Stage::ValidateCart => "validate_cart",
            Stage::EnterCheckout => "enter_checkout",
            Stage::Billing => "billing",
            Stage::ShippingAddress => "shipping_address",
            Stage::ShippingMethod => "shipping_method",
            Stage::PaymentMethod => "payment_method",
            Stage::PaymentInfo => "payment_info",
            Stage::Confirm => "confirm",
            Stage::ValidateConfirmation => "validate_confirmation",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Stage::ALL
            .into_iter()
            .find(|stage| stage.key() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown stage '{}' (expected one of: {})",
                    s,
                    Stage::ALL.map(Stage::key).join(", ")
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_follow_declaration_order() {
        for (position, stage) in Stage::ALL.iter().enumerate() {
            assert_eq!(stage.index(), position);
        }
        assert_eq!(Stage::ValidateConfirmation.index(), 12);
    }

    #[test]
    fn test_stage_keys_round_trip() {
        for stage in Stage::ALL {
            assert_eq!(stage.key().parse::<Stage>(), Ok(stage));
        }
        assert_eq!("Shipping-Method".parse::<Stage>(), Ok(Stage::ShippingMethod));
    }

    #[test]
    fn test_unknown_stage_lists_choices() {
        let err = "teleport".parse::<Stage>().unwrap_err();
        assert!(err.contains("billing"));
        assert!(err.contains("validate_confirmation"));
    }
}
