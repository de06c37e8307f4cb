//! CRM service: account, account type, contact and customer REST backend on PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod field;
pub mod handlers;
pub mod model;
pub mod openapi;
pub mod pagination;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;
pub mod telemetry;

pub use config::Settings;
pub use error::{AppError, ConfigError, StoreError};
pub use field::Field;
pub use pagination::{PageParams, PageRequest, Pagination};
pub use response::{Envelope, ResponseStatus};
pub use routes::{app, common_routes, resource_routes};
pub use service::{ContactManager, ContactResolver, NameLookup, ResourceManager};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables, PgStore, Resource, Store, UnitOfWork};
