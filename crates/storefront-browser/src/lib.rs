//! Chrome automation for the storefront checkout suite.
//!
//! Launches Chrome, attaches over the DevTools protocol and exposes the
//! storefront page objects behind the contracts in `storefront_core::pages`.

mod chrome_finder;
mod driver;
mod error;
mod launcher;
mod locator;
pub mod pages;
mod profile;
mod screenshots;
mod session;

pub use chrome_finder::ChromeFinder;
pub use driver::Driver;
pub use error::{Error, Result};
pub use launcher::{ChromeLauncher, DEFAULT_DEBUGGING_PORT};
pub use locator::{Locator, LocatorChain, xpath_literal};
pub use pages::Storefront;
pub use profile::BrowserProfile;
pub use screenshots::ScreenshotStore;
pub use session::{BrowserOptions, BrowserSession};
