//! Router assembly.

mod common;
mod entity;

pub use common::common_routes;
pub use entity::{address_routes, person_routes};

use crate::state::AppState;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Full application: resource routes, common routes, request tracing and a body size limit.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(person_routes(state.clone()))
        .merge(address_routes(state.clone()))
        .merge(common_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES)),
        )
}
