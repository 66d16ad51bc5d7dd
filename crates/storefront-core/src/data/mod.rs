mod reader;
mod types;

pub use reader::{TestData, unique_email};
pub use types::*;
