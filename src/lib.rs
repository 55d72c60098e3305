pub mod aggregate;
pub mod config;
pub mod enrich;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod relay;
pub mod server;
pub mod services;
