//! Core types, payload parsing, and validation for the scan log service.

pub mod error;
pub mod limits;
pub mod record;

pub use error::{Error, Result};
pub use record::*;
