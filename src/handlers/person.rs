//! Person handlers: list, read (with addresses), create, update, delete with address cascade.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::model::{parse_id, NewPerson, Person, PersonChanges};
use crate::response::{created, deleted, Created, Deleted};
use crate::service::RequestValidator;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

pub async fn list_persons(State(state): State<AppState>) -> Result<Json<Vec<Person>>, AppError> {
    let people = state.store.list_persons().await?;
    Ok(Json(people))
}

pub async fn get_person(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<Person>, AppError> {
    let id = parse_id(&id_str).ok_or_else(AppError::person_not_found)?;
    let mut person = state
        .store
        .get_person(id)
        .await?
        .ok_or_else(AppError::person_not_found)?;
    person.addresses = state.store.addresses_for_person(person.id).await?;
    Ok(Json(person))
}

pub async fn create_person(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewPerson>,
) -> Result<Json<Created<Person>>, AppError> {
    RequestValidator::new_person(&body)?;
    let person = state.store.create_person(&body).await?;
    tracing::info!(id = person.id, addresses = person.addresses.len(), "person created");
    Ok(Json(created(person)))
}

pub async fn update_person(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    JsonBody(changes): JsonBody<PersonChanges>,
) -> Result<Json<Person>, AppError> {
    let id = parse_id(&id_str).ok_or_else(AppError::person_not_found)?;
    if state.store.get_person(id).await?.is_none() {
        return Err(AppError::person_not_found());
    }
    RequestValidator::person_changes(&changes)?;
    // The row can vanish between the lookup and the write.
    let person = state
        .store
        .update_person(id, &changes)
        .await?
        .ok_or_else(AppError::person_not_found)?;
    Ok(Json(person))
}

/// Soft-deletes the person's addresses, then the person. Answers with the path id even when nothing matched.
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    if let Some(id) = parse_id(&id_str) {
        match state.store.delete_addresses_for_person(id).await {
            Ok(n) => tracing::debug!(person_id = id, addresses = n, "addresses deleted"),
            Err(e) => tracing::warn!(person_id = id, error = %e, "address cascade failed"),
        }
        let n = state.store.delete_person(id).await?;
        tracing::info!(id, deleted = n, "person delete");
    }
    Ok(Json(deleted(id_str)))
}
