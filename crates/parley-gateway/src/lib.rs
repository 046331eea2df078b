#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod port;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::{DefaultGatewayClient, GatewayClient};

// Configuration
pub use config::{DEFAULT_BASE_URL, GatewayConfig};

// Errors
pub use error::GatewayError;
