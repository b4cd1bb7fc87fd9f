#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

pub mod error;
pub mod funding;
pub mod invoker;
pub mod models;
pub mod registry;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod traits;

pub use error::{ClientError, HarnessError};
pub use models::Amount;
