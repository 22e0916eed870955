//! Runtime infrastructure - Tokio runtime bridge for async operations

mod bridge;
mod worker;

pub use bridge::{ErrorSource, RuntimeBridge, RuntimeCommand, RuntimeEvent, WorkerConfig};
pub use worker::run_async_worker;
