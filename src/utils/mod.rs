//! Utility modules for common functionality.
//!
//! This module provides various utility functions and types that are used across
//! the application. Currently includes:
//!
//! - constants: Defaults of the application
//! - http: Retryable HTTP client construction
//! - logging: Logging utilities
//! - text: Display string cleaning, link exposure and decimals coercion

pub mod constants;
pub mod http;
pub mod logging;
pub mod text;

pub use constants::*;
pub use http::{create_base_http_client, create_retryable_http_client, HttpRetryConfig};
pub use text::*;
