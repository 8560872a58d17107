//! Raffle backend API
//!
//! - client.rs:    transport, header injection, failure logging
//! - endpoints.rs: one typed method per backend route

pub mod client;
pub mod endpoints;

pub use client::{ApiClient, InitDataProvider, StaticInitData, INIT_DATA_HEADER};
pub use endpoints::DEFAULT_HISTORY_LIMIT;
