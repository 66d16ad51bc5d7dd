//! Storefront checkout e2e core: test data, page-object contracts, the
//! checkout orchestrator and step reporting.

pub mod data;
pub mod error;
pub mod flow;
pub mod pages;
pub mod report;

pub use error::{Error, Result};
