//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - Alloy-based Ethereum provider and the contract binding
//! - Tokio runtime bridge for async operations
//! - File logging setup

pub mod ethereum;
pub mod logging;
pub mod runtime;
