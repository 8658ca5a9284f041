//! Response bodies shared by the resource handlers.

use serde::Serialize;

/// Result wrapper returned by POST /person: the inserted row, an error slot, and the affected-row count.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Created<T> {
    pub value: T,
    pub error: Option<String>,
    pub rows_affected: u64,
}

pub fn created<T: Serialize>(value: T) -> Created<T> {
    Created {
        value,
        error: None,
        rows_affected: 1,
    }
}

/// Body of every DELETE: the id exactly as it appeared in the path.
#[derive(Serialize)]
pub struct Deleted {
    #[serde(rename = "ID")]
    pub id: String,
}

pub fn deleted(id: String) -> Deleted {
    Deleted { id }
}
