#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "Per-user task lists behind JWT authentication: stores, services, the actix-web"]
#![doc = "routes and app factory used by the binary (`main.rs`), and a typed HTTP client."]

pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
pub mod tasks;
pub mod users;

pub use app::{build_app, AppServices};
pub use error::AppError;
