//! Session state record and its reducer
//!
//! The root coordinator never assigns fields directly: every change goes
//! through [`reduce`] with a [`SessionEvent`], so the transition table is a
//! plain function of `(state, event)`.

use alloy_primitives::Address;

/// Opaque reference to a live provider session on the runtime worker
///
/// The provider itself stays on the worker thread; the UI only needs to know
/// which session it is talking about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderHandle {
    /// Monotonic id, bumped on every successful connect
    pub session: u64,
    pub endpoint: String,
    pub chain_id: u64,
    pub contract: Address,
}

/// Identifies one message chain fetch
///
/// `seq` grows with every request the chain view issues, so an answer is
/// current only when both fields match the newest request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainRequest {
    pub session: u64,
    pub seq: u64,
}

/// Which layout branch the root renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Only the wallet connector is shown
    Disconnected,
    /// Connector, reader, writer and message chain are shown
    Connected,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub provider: Option<ProviderHandle>,
    pub account: Option<Address>,
    pub last_phrase: Option<String>,
    pub added_phrase: Option<String>,
    /// Flipped on every successful write; carries no data
    pub refresh: bool,
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        if self.provider.is_some() && self.account.is_some() {
            Phase::Connected
        } else {
            Phase::Disconnected
        }
    }

    pub fn is_connected(&self) -> bool {
        self.phase() == Phase::Connected
    }
}

/// Discrete events reported by the child widgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ProviderUpdated(Option<ProviderHandle>),
    AccountUpdated(Option<Address>),
    LastPhraseFetched(String),
    PhraseAdded { phrase: String, new_keyword: String },
}

impl SessionEvent {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            SessionEvent::ProviderUpdated(_) => "provider_updated",
            SessionEvent::AccountUpdated(_) => "account_updated",
            SessionEvent::LastPhraseFetched(_) => "last_phrase_fetched",
            SessionEvent::PhraseAdded { .. } => "phrase_added",
        }
    }
}

#[must_use]
pub fn reduce(state: SessionState, event: SessionEvent) -> SessionState {
    match event {
        SessionEvent::ProviderUpdated(provider) => SessionState { provider, ..state },
        SessionEvent::AccountUpdated(account) => SessionState { account, ..state },
        SessionEvent::LastPhraseFetched(phrase) => SessionState {
            last_phrase: Some(phrase),
            ..state
        },
        SessionEvent::PhraseAdded {
            phrase,
            new_keyword,
        } => SessionState {
            added_phrase: Some(phrase),
            last_phrase: Some(new_keyword),
            refresh: !state.refresh,
            ..state
        },
    }
}
