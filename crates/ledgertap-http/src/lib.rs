//! # ledgertap-http
//!
//! The HTTP submission surface: accepts externally submitted JSON documents
//! and commits them to the ledger inside a transaction, plus an endpoint
//! exposing the ledger digest for out-of-band verification.
//!
//! Client-visible errors are always a structured `{message}` body; internal
//! causes are logged, never returned.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use routes::{router, AppState};
pub use server::{run_server, start_background_server};
