//! Resource routes: /person and /address, each with a collection and an `:id` path.

use crate::handlers::{
    create_address, create_person, delete_address, delete_person, get_address, get_person,
    list_addresses, list_persons, update_address, update_person,
};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn person_routes(state: AppState) -> Router {
    Router::new()
        .route("/person", get(list_persons).post(create_person))
        .route(
            "/person/:id",
            get(get_person).put(update_person).delete(delete_person),
        )
        .with_state(state)
}

pub fn address_routes(state: AppState) -> Router {
    Router::new()
        .route("/address", get(list_addresses).post(create_address))
        .route(
            "/address/:id",
            get(get_address).put(update_address).delete(delete_address),
        )
        .with_state(state)
}
