//! people-api: CRUD REST service for people and their addresses on PostgreSQL.

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::{DbConfig, ServerConfig};
pub use db::connect;
pub use error::{AppError, ConfigError};
pub use migration::{auto_migrate, MigrationReport};
pub use model::{Address, AddressChanges, NewAddress, NewPerson, NewPersonAddress, Person, PersonChanges};
pub use routes::app;
pub use state::AppState;
pub use store::{PgStore, Store};
