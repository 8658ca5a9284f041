//! Request extractors shared by the resource handlers.

mod body;

pub use body::JsonBody;
