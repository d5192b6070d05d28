//! REST client for the QR-code backend: typed models, error taxonomy, the
//! `reqwest`-based client, and the manager that runs requests off the event
//! loop.

pub mod client;
pub mod error;
pub mod manager;
pub mod models;

pub use client::ApiClient;
pub use error::ApiError;
pub use manager::ApiManager;
