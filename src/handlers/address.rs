//! Address handlers: list, read, create, update, delete.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::model::{parse_id, Address, AddressChanges, NewAddress};
use crate::response::{deleted, Deleted};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

pub async fn list_addresses(State(state): State<AppState>) -> Result<Json<Vec<Address>>, AppError> {
    let addresses = state.store.list_addresses().await?;
    Ok(Json(addresses))
}

pub async fn get_address(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<Address>, AppError> {
    let id = parse_id(&id_str).ok_or_else(AppError::address_not_found)?;
    let address = state
        .store
        .get_address(id)
        .await?
        .ok_or_else(AppError::address_not_found)?;
    Ok(Json(address))
}

pub async fn create_address(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewAddress>,
) -> Result<Json<Address>, AppError> {
    let address = state.store.create_address(&body).await?;
    tracing::info!(id = address.id, person_id = address.person_id, "address created");
    Ok(Json(address))
}

pub async fn update_address(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    JsonBody(changes): JsonBody<AddressChanges>,
) -> Result<Json<Address>, AppError> {
    let id = parse_id(&id_str).ok_or_else(AppError::address_not_found)?;
    if state.store.get_address(id).await?.is_none() {
        return Err(AppError::address_not_found());
    }
    let address = state
        .store
        .update_address(id, &changes)
        .await?
        .ok_or_else(AppError::address_not_found)?;
    Ok(Json(address))
}

pub async fn delete_address(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    if let Some(id) = parse_id(&id_str) {
        let n = state.store.delete_address(id).await?;
        tracing::info!(id, deleted = n, "address delete");
    }
    Ok(Json(deleted(id_str)))
}
