//! Process configuration read from the environment (and an optional `.env` file).

pub mod env;

pub use env::{DbConfig, ServerConfig};
