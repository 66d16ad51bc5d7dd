//! Checkout orchestration.
//!
//! [`CheckoutFlow`] drives the page objects through the fixed sequence of
//! [`Stage`]s, records one [`CheckoutStep`] per stage and stops at the first
//! stage that fails. Failures are returned as values inside [`RunOutcome`].

mod context;
mod stage;

pub use context::{CartSnapshot, CheckoutContext, CheckoutPlan, FlowOptions};
pub use stage::Stage;

use crate::pages::Pages;
use crate::report::{CheckoutStep, FinalReport, StepReport};
use crate::{Error, Result};
use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{Instrument, Span};

/// Shown in the cart snapshot when no total could be read.
pub const TOTAL_PLACEHOLDER: &str = "Total not displayed";

const CONFIRMATION_KEYWORDS: [&str; 2] = ["successfully", "processed"];
const MESSAGE_PREVIEW_CHARS: usize = 50;

/// Result of executing a single stage: success details or the cause.
pub type StageOutcome = Result<String>;

/// The stage that halted a run and why.
#[derive(Debug)]
pub struct StageFailure {
    pub stage: Stage,
    pub error: Error,
}

/// Everything a run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub report: FinalReport,
    pub context: CheckoutContext,
    pub failure: Option<StageFailure>,
    /// Screenshot captured for the failing stage, when one could be taken.
    pub diagnostic: Option<PathBuf>,
}

impl RunOutcome {
    pub fn passed(&self) -> bool {
        self.failure.is_none() && self.report.passed()
    }
}

pub struct CheckoutFlow<'a> {
    pages: Pages<'a>,
    plan: &'a CheckoutPlan,
    options: FlowOptions,
    span: Span,
}

impl<'a> CheckoutFlow<'a> {
    pub fn new(pages: Pages<'a>, plan: &'a CheckoutPlan, options: FlowOptions) -> Self {
        let span = tracing::info_span!("checkout", user = %plan.credentials.email);
        Self {
            pages,
            plan,
            options,
            span,
        }
    }

    /// Emit all run events inside the given span instead of a fresh one.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub async fn run(self) -> RunOutcome {
        let span = self.span.clone();
        self.run_stages().instrument(span).await
    }

    async fn run_stages(self) -> RunOutcome {
        let mut report = StepReport::new();
        let mut context = CheckoutContext::default();
        let mut failure = None;
        let mut diagnostic = None;

        tracing::info!("Starting checkout run with {} product terms", self.plan.products.len());

        for stage in Stage::ALL {
            let step = CheckoutStep::pending(report.next_index(), stage.label());
            tracing::info!("STEP {}: {}", stage.index(), stage.label());

            let started = Instant::now();
            let outcome = self
                .execute(stage, &mut context)
                .instrument(tracing::info_span!("stage", name = stage.key()))
                .await;
            let elapsed = started.elapsed();

            let step = match &outcome {
                Ok(details) => {
                    tracing::info!("{} completed in {:.2}s: {}", stage.label(), elapsed.as_secs_f64(), details);
                    step.succeed(elapsed, details.clone())
                }
                Err(e) => {
                    tracing::error!("{} failed after {:.2}s: {}", stage.label(), elapsed.as_secs_f64(), e);
                    step.fail(elapsed, self.failure_details(stage, &context), e.to_string())
                }
            };

            if let Err(e) = report.record(step) {
                tracing::error!("Could not record {}: {}", stage.label(), e);
                failure = Some(StageFailure { stage, error: e });
                break;
            }

            if let Err(error) = outcome {
                diagnostic = self.capture_failure(stage).await;
                failure = Some(StageFailure { stage, error });
                break;
            }

            if self.options.stop_after == Some(stage) {
                tracing::info!("Stopping after {} as requested", stage.key());
                break;
            }
        }

        let report = report.finalize();
        if failure.is_none() {
            tracing::info!("Checkout run passed");
        }

        RunOutcome {
            report,
            context,
            failure,
            diagnostic,
        }
    }

    async fn execute(&self, stage: Stage, context: &mut CheckoutContext) -> StageOutcome {
        match stage {
            Stage::Register => self.register().await,
            Stage::Logout => self.logout().await,
            Stage::Login => self.login().await,
            Stage::PopulateCart => self.populate_cart(context).await,
            Stage::ValidateCart => self.validate_cart(context).await,
            Stage::EnterCheckout => {
                self.pages.cart.proceed_to_checkout().await?;
                Ok("Navigated to checkout".to_string())
            }
            Stage::Billing => self.billing(context).await,
            Stage::ShippingAddress => {
                self.pages.checkout.continue_shipping_address().await?;
                Ok("Shipping to billing address".to_string())
            }
            Stage::ShippingMethod => {
                let method = self.options.shipping_method;
                self.pages.checkout.select_shipping_method(method).await?;
                self.pages.checkout.continue_shipping_method().await?;
                context.shipping_method = Some(method);
                Ok(format!("Shipping: {}", method))
            }
            Stage::PaymentMethod => {
                let method = self.options.payment_method;
                self.pages.checkout.select_payment_method(method).await?;
                self.pages.checkout.continue_payment_method().await?;
                context.payment_method = Some(method);
                Ok(format!("Payment: {}", method))
            }
            Stage::PaymentInfo => {
                self.pages.checkout.continue_payment_info().await?;
                Ok("Payment information accepted".to_string())
            }
            Stage::Confirm => self.confirm().await,
            Stage::ValidateConfirmation => self.validate_confirmation(context).await,
        }
    }

    async fn register(&self) -> StageOutcome {
        let credentials = &self.plan.credentials;
        self.pages.registration.open().await?;

        if !self.pages.registration.register(credentials).await? {
            return Err(Error::PostConditionFailed("Registration was not accepted".to_string()));
        }
        Ok(format!("Registered user: {}", credentials.email))
    }

    async fn logout(&self) -> StageOutcome {
        if !self.pages.login.is_logged_in().await? {
            tracing::warn!("No active session after registration, nothing to log out");
            return Ok("No active session after registration".to_string());
        }

        if !self.pages.login.logout().await? {
            return Err(Error::PostConditionFailed("Session still active after logout".to_string()));
        }
        Ok("User logged out after registration".to_string())
    }

    async fn login(&self) -> StageOutcome {
        let credentials = &self.plan.credentials;
        self.pages
            .login
            .login(&credentials.email, &credentials.password)
            .await?;

        let logged_in = self
            .bounded(
                "authenticated session",
                self.options.post_condition_timeout,
                self.pages.login.is_logged_in(),
            )
            .await?;
        if !logged_in {
            return Err(Error::PostConditionFailed("Not logged in after submitting credentials".to_string()));
        }
        Ok(format!("Logged in with new credentials: {}", credentials.email))
    }

    async fn populate_cart(&self, context: &mut CheckoutContext) -> StageOutcome {
        let terms = self.plan.products.iter().take(self.options.max_products);

        for (position, term) in terms.enumerate() {
            tracing::info!("Adding product {}: {}", position + 1, term);
            match self.add_product(term).await {
                Ok(true) => {
                    tracing::info!("Added '{}' to cart", term);
                    context.added_products.push(term.clone());
                }
                Ok(false) => tracing::warn!("No search results for '{}'", term),
                Err(e) => tracing::warn!("Could not add '{}': {}", term, e),
            }
        }

        if context.added_products.is_empty() {
            return Err(Error::PostConditionFailed("No products could be added to the cart".to_string()));
        }
        Ok(format!("Added {} products to cart", context.added_products.len()))
    }

    /// Search for a term and add the first listed result.
    ///
    /// Returns `false` when the search had no results. Once the add has
    /// happened, closing the notification and returning home are best-effort.
    async fn add_product(&self, term: &str) -> Result<bool> {
        self.pages.home.search(term).await?;
        if self.pages.product.results_count().await? == 0 {
            return Ok(false);
        }
        self.pages.product.add_from_listing(0).await?;

        if let Err(e) = self.pages.product.close_notification().await {
            tracing::debug!("Notification not closed: {}", e);
        }
        if let Err(e) = self.pages.home.go_home().await {
            tracing::warn!("Could not return to the home page: {}", e);
        }
        Ok(true)
    }

    async fn validate_cart(&self, context: &mut CheckoutContext) -> StageOutcome {
        self.pages.home.open_cart().await?;

        let item_count = self.pages.cart.items_count().await?;
        if item_count == 0 {
            return Err(Error::PostConditionFailed("Cart is empty".to_string()));
        }

        let product_names = self.pages.cart.product_names().await.unwrap_or_else(|e| {
            tracing::warn!("Could not read cart product names: {}", e);
            Vec::new()
        });

        let total = match self.pages.cart.total().await {
            Ok(Some(total)) if !total.trim().is_empty() => total.trim().to_string(),
            Ok(_) => {
                tracing::warn!("Cart total not displayed");
                TOTAL_PLACEHOLDER.to_string()
            }
            Err(e) => {
                tracing::warn!("Could not read cart total: {}", e);
                TOTAL_PLACEHOLDER.to_string()
            }
        };
        if total != TOTAL_PLACEHOLDER && !total.contains('$') {
            tracing::warn!("Cart total '{}' carries no currency sign", total);
        }

        tracing::info!("Cart contains {} items: {:?}", item_count, product_names);
        context.cart = CartSnapshot {
            item_count,
            product_names,
            total,
        };
        Ok(format!("Cart items: {}, Total: {}", item_count, context.cart.total))
    }

    async fn billing(&self, context: &mut CheckoutContext) -> StageOutcome {
        let address = &self.plan.billing_address;
        self.pages.checkout.fill_billing_address(address).await?;
        self.pages.checkout.continue_billing().await?;

        context.billing_address = Some(address.clone());
        Ok(format!("Billing address: {}, {}", address.city, address.country))
    }

    async fn confirm(&self) -> StageOutcome {
        self.pages.checkout.confirm_order().await?;

        let completed = self
            .bounded(
                "order completion",
                self.options.confirmation_timeout,
                self.pages.checkout.is_order_completed(),
            )
            .await?;
        if !completed {
            return Err(Error::PostConditionFailed("Order completion was not displayed".to_string()));
        }
        Ok("Order submitted".to_string())
    }

    async fn validate_confirmation(&self, context: &mut CheckoutContext) -> StageOutcome {
        let message = self.pages.checkout.order_success_message().await?;
        let lowered = message.to_lowercase();
        if !CONFIRMATION_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            return Err(Error::PostConditionFailed(format!("Unexpected confirmation message: {}", message)));
        }

        let order_number = self.pages.checkout.order_number().await.unwrap_or_else(|e| {
            tracing::warn!("Could not read order number: {}", e);
            None
        });
        match self.pages.diagnostics.capture("order_confirmation_final").await {
            Ok(path) => tracing::info!("Confirmation screenshot: {}", path.display()),
            Err(e) => tracing::warn!("Could not capture confirmation screenshot: {}", e),
        }

        let preview: String = message.chars().take(MESSAGE_PREVIEW_CHARS).collect();
        let number = order_number.clone().unwrap_or_else(|| "no order number".to_string());
        context.success_message = Some(message);
        context.order_number = order_number;
        Ok(format!("Order confirmed ({}). Message: {}", number, preview))
    }

    /// Wait for a post-condition query, failing with a timeout past `limit`.
    async fn bounded<T>(
        &self,
        what: &str,
        limit: Duration,
        check: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(limit, check).await {
            Ok(result) => result,
            Err(_) => Err(Error::timeout(what, limit)),
        }
    }

    fn failure_details(&self, stage: Stage, context: &CheckoutContext) -> String {
        let email = &self.plan.credentials.email;
        match stage {
            Stage::Register => format!("Failed to register user: {}", email),
            Stage::Logout => "Failed to logout after registration".to_string(),
            Stage::Login => format!("Failed to login with new credentials: {}", email),
            Stage::PopulateCart => format!("Only added {} products", context.added_products.len()),
            Stage::ValidateCart => "Cart validation failed".to_string(),
            Stage::EnterCheckout => "Failed to proceed to checkout".to_string(),
            Stage::Billing => "Failed to fill billing address".to_string(),
            Stage::ShippingAddress => "Failed to confirm shipping address".to_string(),
            Stage::ShippingMethod => {
                format!("Failed to select shipping method: {}", self.options.shipping_method)
            }
            Stage::PaymentMethod => {
                format!("Failed to select payment method: {}", self.options.payment_method)
            }
            Stage::PaymentInfo => "Failed to confirm payment information".to_string(),
            Stage::Confirm => "Failed to confirm order".to_string(),
            Stage::ValidateConfirmation => "Order completion validation failed".to_string(),
        }
    }

    async fn capture_failure(&self, stage: Stage) -> Option<PathBuf> {
        let name = format!("FAIL_{}", stage.key());
        match self.pages.diagnostics.capture(&name).await {
            Ok(path) => {
                tracing::info!("Failure screenshot: {}", path.display());
                Some(path)
            }
            Err(e) => {
                tracing::warn!("Could not capture failure screenshot: {}", e);
                None
            }
        }
    }
}
