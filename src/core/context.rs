//! Shared context passed to modules

use alloy_primitives::Address;

use super::state::{Phase, SessionState};

/// Read-only view of the coordinator state handed to every module
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Snapshot of the reducer state
    pub session: SessionState,

    /// Accounts offered by the connected wallet
    pub accounts: Vec<Address>,

    /// Display names of the configured endpoints
    pub endpoints: Vec<String>,

    /// Endpoint used by the next connect
    pub endpoint_index: usize,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn selected_endpoint(&self) -> Option<&str> {
        self.endpoints.get(self.endpoint_index).map(String::as_str)
    }
}
