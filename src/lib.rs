#![doc = "The `task_manager` library crate."]
#![doc = ""]
#![doc = "A JSON-over-HTTP service managing users, their tasks and their projects. The crate holds"]
#![doc = "the domain models, the storage layer (Postgres and in-memory), request handlers, error"]
#![doc = "mapping and server startup. The binary (`main.rs`) only wires configuration to `startup::run`."]

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod startup;
pub mod storage;

pub use crate::error::AppError;
pub use crate::storage::{Storage, StorageError};
