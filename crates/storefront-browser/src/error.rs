use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error("No element matched {locator} within {waited:?}")]
    ElementNotFound { locator: String, waited: Duration },

    #[error("No option '{option}' in {locator}")]
    OptionNotFound { locator: String, option: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

impl From<Error> for storefront_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::ElementNotFound { .. } | Error::OptionNotFound { .. } => {
                storefront_core::Error::ElementNotFound(err.to_string())
            }
            Error::Io(e) => storefront_core::Error::Io(e),
            Error::Browser(_) | Error::Cdp(_) => storefront_core::Error::Browser(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
