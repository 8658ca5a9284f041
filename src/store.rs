//! Persistence seam used by the handlers. `PgStore` is the PostgreSQL implementation.
//!
//! Every read ignores soft-deleted rows. Deletes are soft: they stamp `deleted_at`.

mod postgres;

pub use postgres::PgStore;

use crate::error::AppError;
use crate::model::{Address, AddressChanges, NewAddress, NewPerson, Person, PersonChanges};
use async_trait::async_trait;

#[async_trait]
pub trait Store: Send + Sync {
    /// Round-trip to the backend; used by `/ready`.
    async fn ping(&self) -> Result<(), AppError>;

    async fn list_persons(&self) -> Result<Vec<Person>, AppError>;

    async fn get_person(&self, id: i64) -> Result<Option<Person>, AppError>;

    /// Inserts the person and any nested addresses atomically. Returned person carries the inserted addresses.
    async fn create_person(&self, person: &NewPerson) -> Result<Person, AppError>;

    /// Returns `None` when no live row has this id.
    async fn update_person(&self, id: i64, changes: &PersonChanges) -> Result<Option<Person>, AppError>;

    /// Returns the number of rows soft-deleted (0 or 1).
    async fn delete_person(&self, id: i64) -> Result<u64, AppError>;

    async fn list_addresses(&self) -> Result<Vec<Address>, AppError>;

    async fn addresses_for_person(&self, person_id: i64) -> Result<Vec<Address>, AppError>;

    async fn get_address(&self, id: i64) -> Result<Option<Address>, AppError>;

    async fn create_address(&self, address: &NewAddress) -> Result<Address, AppError>;

    async fn update_address(&self, id: i64, changes: &AddressChanges) -> Result<Option<Address>, AppError>;

    async fn delete_address(&self, id: i64) -> Result<u64, AppError>;

    async fn delete_addresses_for_person(&self, person_id: i64) -> Result<u64, AppError>;
}
