//! HTTP handlers for the person and address resources.

pub mod address;
pub mod person;
pub use address::*;
pub use person::*;
