//! Request-level rules applied before anything reaches the store.

mod validation;
pub use validation::{is_email_valid, RequestValidator};
