pub mod arena;
pub mod codec;
pub mod convert;
pub mod error;
pub mod registry;
pub mod schema;
pub mod value;

pub use crate::error::{Error, Result};

#[cfg(test)]
mod tests;
