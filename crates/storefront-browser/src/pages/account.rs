use crate::driver::Driver;
use crate::locator::Locator;
use async_trait::async_trait;
use std::time::Duration;
use storefront_core::Result;
use storefront_core::data::UserCredentials;
use storefront_core::pages::{LoginPage, RegistrationPage};

const REGISTER_LINK: &str = "Register";
const GENDER_MALE: &str = "gender-male";
const FIRST_NAME: &str = "FirstName";
const LAST_NAME: &str = "LastName";
const EMAIL: &str = "Email";
const PASSWORD: &str = "Password";
const CONFIRM_PASSWORD: &str = "ConfirmPassword";
const REGISTER_BUTTON: &str = "register-button";
const REGISTRATION_RESULT: &str = ".result";
const REGISTRATION_CONTINUE: &str = ".button-1.register-continue-button";
const VALIDATION_ERROR: &str = ".field-validation-error";

const LOGIN_LINK: &str = "Log in";
const LOGIN_BUTTON: &str = ".button-1.login-button";
const LOGOUT_LINK: &str = "Log out";

const RESULT_WAIT: Duration = Duration::from_secs(10);
const SESSION_WAIT: Duration = Duration::from_secs(5);

pub struct RegistrationForm {
    driver: Driver,
}

impl RegistrationForm {
    pub fn new(driver: Driver) -> Self {
        Self { driver }
    }
}

#[async_trait]
impl RegistrationPage for RegistrationForm {
    async fn open(&self) -> Result<()> {
        self.driver
            .click_and_wait(&Locator::link_text(REGISTER_LINK))
            .await?;
        Ok(())
    }

    async fn register(&self, credentials: &UserCredentials) -> Result<bool> {
        let d = &self.driver;
        tracing::info!("Registering new user: {}", credentials.email);

        d.click(&Locator::id(GENDER_MALE)).await?;
        d.type_text(&Locator::id(FIRST_NAME), &credentials.first_name).await?;
        d.type_text(&Locator::id(LAST_NAME), &credentials.last_name).await?;
        d.type_text(&Locator::id(EMAIL), &credentials.email).await?;
        d.type_text(&Locator::id(PASSWORD), &credentials.password).await?;
        d.type_text(&Locator::id(CONFIRM_PASSWORD), &credentials.password).await?;
        d.click_and_wait(&Locator::id(REGISTER_BUTTON)).await?;

        let result = Locator::css(REGISTRATION_RESULT);
        if !d.wait_visible(&result, RESULT_WAIT).await? {
            let errors = d.texts(&Locator::css(VALIDATION_ERROR)).await?;
            tracing::warn!("Registration rejected: {}", errors.join("; "));
            return Ok(false);
        }

        let message = d.text(&result).await?;
        tracing::info!("Registration result: {}", message);
        if let Err(e) = d.click_and_wait(&Locator::css(REGISTRATION_CONTINUE)).await {
            tracing::debug!("Continue after registration not clicked: {}", e);
        }
        Ok(message.to_lowercase().contains("registration completed"))
    }
}

pub struct LoginForm {
    driver: Driver,
}

impl LoginForm {
    pub fn new(driver: Driver) -> Self {
        Self { driver }
    }
}

#[async_trait]
impl LoginPage for LoginForm {
    async fn login(&self, email: &str, password: &str) -> Result<()> {
        let d = &self.driver;
        tracing::info!("Logging in as {}", email);

        d.click_and_wait(&Locator::link_text(LOGIN_LINK)).await?;
        d.type_text(&Locator::id(EMAIL), email).await?;
        d.type_text(&Locator::id(PASSWORD), password).await?;
        d.click_and_wait(&Locator::css(LOGIN_BUTTON)).await?;
        Ok(())
    }

    async fn logout(&self) -> Result<bool> {
        self.driver
            .click_and_wait(&Locator::link_text(LOGOUT_LINK))
            .await?;
        let logged_out = self
            .driver
            .wait_visible(&Locator::link_text(LOGIN_LINK), SESSION_WAIT)
            .await?;
        Ok(logged_out)
    }

    async fn is_logged_in(&self) -> Result<bool> {
        let logged_in = self
            .driver
            .wait_visible(&Locator::link_text(LOGOUT_LINK), SESSION_WAIT)
            .await?;
        tracing::debug!("Logged in: {}", logged_in);
        Ok(logged_in)
    }
}
