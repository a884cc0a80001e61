//! User registry service: users keyed by Israeli identity number, validated
//! on the way in and stored in SQLite, served over a small JSON API.

pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use routes::app;
pub use state::AppState;
