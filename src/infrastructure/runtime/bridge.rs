//! Runtime bridge - connects sync TUI thread with async Tokio runtime
//!
//! This module provides a bridge between the synchronous TUI (ratatui) thread
//! and the asynchronous Tokio runtime that handles RPC operations.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use alloy::primitives::{Address, B256};
use anyhow::Context;
use tokio::runtime::Runtime;

use crate::core::{ChainRequest, ProviderHandle};
use crate::infrastructure::ethereum::{ChainEntry, ProviderConfig};
use crate::infrastructure::runtime::worker::run_async_worker;

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCommand {
    /// Open a provider session on the given endpoint
    Connect { endpoint_index: usize },
    /// Drop the current session
    Disconnect,
    /// Use another account of the current session
    SelectAccount { account: Address },
    /// Read `getLastPhrase()`
    FetchLastPhrase,
    /// Send `addPhrase(phrase)` from the active account
    AddPhrase { phrase: String },
    /// Read `getMessageChain()` for the session named in the request
    FetchMessageChain(ChainRequest),
    /// Shutdown the worker
    Shutdown,
}

/// Widget responsible for a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSource {
    Wallet,
    Reader,
    Writer,
    Chain,
}

impl ErrorSource {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorSource::Wallet => "wallet",
            ErrorSource::Reader => "read",
            ErrorSource::Writer => "write",
            ErrorSource::Chain => "chain",
        }
    }
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// Provider session opened (`Some`) or dropped (`None`)
    ProviderUpdated(Option<ProviderHandle>),
    /// Active account changed
    AccountUpdated(Option<Address>),
    /// Accounts the session can send from
    AccountsAvailable(Vec<Address>),
    /// `getLastPhrase()` result
    LastPhraseFetched { phrase: String },
    /// `addPhrase` mined
    PhraseAdded {
        phrase: String,
        new_keyword: String,
        tx_hash: B256,
    },
    /// `getMessageChain()` result, tagged with the request it answers
    MessageChainLoaded {
        request: ChainRequest,
        entries: Vec<ChainEntry>,
    },
    /// Error occurred
    Error { source: ErrorSource, message: String },
}

/// Everything the worker needs to open sessions
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub endpoints: Vec<ProviderConfig>,
    pub contract: Option<Address>,
    pub private_key: Option<String>,
    pub health_interval: Duration,
}

/// Bridge between sync TUI thread and async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: Sender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    /// Create a new runtime bridge with the given worker configuration
    pub fn new(config: WorkerConfig) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        let rt = Runtime::new().context("Failed to create Tokio runtime")?;

        // The worker thread owns the runtime
        thread::Builder::new()
            .name("rpc-worker".to_string())
            .spawn(move || {
                rt.block_on(async {
                    if let Err(err) = run_async_worker(config, cmd_rx, evt_tx.clone()).await {
                        tracing::error!(error = %format!("{err:#}"), "worker exited");
                        let _ = evt_tx.send(RuntimeEvent::Error {
                            source: ErrorSource::Wallet,
                            message: format!("Worker exited: {:#}", err),
                        });
                    }
                });
            })
            .context("Failed to spawn worker thread")?;

        Ok(Self { cmd_tx, evt_rx })
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: RuntimeCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        // Try to send shutdown command
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
