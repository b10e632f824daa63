// subsman-api: Async Rust client for the SubsManager node-tester REST API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod logs;
mod nodes;
mod settings;
mod status;
mod subscriptions;

pub use client::ApiClient;
pub use error::Error;
pub use transport::TransportConfig;
