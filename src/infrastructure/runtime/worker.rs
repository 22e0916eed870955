//! Async worker - runs in Tokio runtime and handles RPC operations

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy::primitives::Address;
use anyhow::{Context, Result};

use crate::core::ProviderHandle;
use crate::infrastructure::ethereum::{create_provider, EthereumProvider, KeywordChainClient};
use crate::infrastructure::runtime::bridge::{
    ErrorSource, RuntimeCommand, RuntimeEvent, WorkerConfig,
};

/// A live provider session
struct Session {
    id: u64,
    chain_id: u64,
    provider: Arc<dyn EthereumProvider>,
    client: KeywordChainClient,
    accounts: Vec<Address>,
    account: Address,
}

/// Run the async worker loop
pub async fn run_async_worker(
    config: WorkerConfig,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) -> Result<()> {
    if config.endpoints.is_empty() {
        anyhow::bail!("No endpoints configured");
    }

    let mut session: Option<Session> = None;
    let mut last_session_id = 0u64;
    let mut last_health_check = Instant::now();

    loop {
        // Process commands (non-blocking)
        while let Ok(cmd) = cmd_rx.try_recv() {
            match cmd {
                RuntimeCommand::Shutdown => return Ok(()),

                RuntimeCommand::Connect { endpoint_index } => {
                    match connect(&config, endpoint_index, last_session_id + 1).await {
                        Ok(new_session) => {
                            last_session_id = new_session.id;
                            let handle = ProviderHandle {
                                session: new_session.id,
                                endpoint: new_session.provider.endpoint_name(),
                                chain_id: new_session.chain_id,
                                contract: new_session.client.contract(),
                            };
                            tracing::info!(
                                session = handle.session,
                                endpoint = %handle.endpoint,
                                chain_id = handle.chain_id,
                                account = %new_session.account,
                                "wallet connected"
                            );
                            let _ = evt_tx.send(RuntimeEvent::ProviderUpdated(Some(handle)));
                            let _ = evt_tx.send(RuntimeEvent::AccountsAvailable(
                                new_session.accounts.clone(),
                            ));
                            let _ = evt_tx
                                .send(RuntimeEvent::AccountUpdated(Some(new_session.account)));
                            session = Some(new_session);
                            last_health_check = Instant::now();
                        }
                        Err(err) => {
                            tracing::error!(
                                endpoint_index,
                                error = %format!("{err:#}"),
                                "connect failed"
                            );
                            send_error(
                                &evt_tx,
                                ErrorSource::Wallet,
                                format!("Connection failed: {:#}", err),
                            );
                        }
                    }
                }

                RuntimeCommand::Disconnect => {
                    if let Some(old) = session.take() {
                        tracing::info!(session = old.id, "wallet disconnected");
                    }
                    let _ = evt_tx.send(RuntimeEvent::ProviderUpdated(None));
                    let _ = evt_tx.send(RuntimeEvent::AccountUpdated(None));
                }

                RuntimeCommand::SelectAccount { account } => {
                    let Some(current) = session.as_mut() else {
                        send_error(&evt_tx, ErrorSource::Wallet, "Wallet not connected");
                        continue;
                    };
                    if current.accounts.contains(&account) {
                        current.account = account;
                        tracing::info!(%account, "account switched");
                        let _ = evt_tx.send(RuntimeEvent::AccountUpdated(Some(account)));
                    } else {
                        send_error(
                            &evt_tx,
                            ErrorSource::Wallet,
                            format!("Account {account} is not available"),
                        );
                    }
                }

                RuntimeCommand::FetchLastPhrase => {
                    let Some(current) = session.as_ref() else {
                        send_error(&evt_tx, ErrorSource::Reader, "Wallet not connected");
                        continue;
                    };
                    let client = current.client.clone();
                    let evt_tx = evt_tx.clone();
                    tokio::spawn(async move {
                        match client.last_phrase().await {
                            Ok(phrase) => {
                                tracing::info!(%phrase, "last phrase fetched");
                                let _ = evt_tx.send(RuntimeEvent::LastPhraseFetched { phrase });
                            }
                            Err(err) => {
                                tracing::error!(error = %format!("{err:#}"), "read failed");
                                send_error(
                                    &evt_tx,
                                    ErrorSource::Reader,
                                    format!("Read failed: {:#}", err),
                                );
                            }
                        }
                    });
                }

                RuntimeCommand::AddPhrase { phrase } => {
                    let Some(current) = session.as_ref() else {
                        send_error(&evt_tx, ErrorSource::Writer, "Wallet not connected");
                        continue;
                    };
                    let client = current.client.clone();
                    let from = current.account;
                    let evt_tx = evt_tx.clone();
                    tokio::spawn(async move {
                        match client.add_phrase(from, &phrase).await {
                            Ok(receipt) => {
                                tracing::info!(
                                    tx = %receipt.tx_hash,
                                    %phrase,
                                    new_keyword = %receipt.new_keyword,
                                    "phrase added"
                                );
                                let _ = evt_tx.send(RuntimeEvent::PhraseAdded {
                                    phrase,
                                    new_keyword: receipt.new_keyword,
                                    tx_hash: receipt.tx_hash,
                                });
                            }
                            Err(err) => {
                                tracing::error!(error = %format!("{err:#}"), "write failed");
                                send_error(
                                    &evt_tx,
                                    ErrorSource::Writer,
                                    format!("Add phrase failed: {:#}", err),
                                );
                            }
                        }
                    });
                }

                RuntimeCommand::FetchMessageChain(request) => {
                    // A fetch for an older session is dropped silently
                    let Some(current) = session.as_ref().filter(|s| s.id == request.session)
                    else {
                        tracing::debug!(
                            session = request.session,
                            "skipping chain fetch for stale session"
                        );
                        continue;
                    };
                    let client = current.client.clone();
                    let evt_tx = evt_tx.clone();
                    tokio::spawn(async move {
                        match client.message_chain().await {
                            Ok(entries) => {
                                tracing::info!(
                                    session = request.session,
                                    seq = request.seq,
                                    entries = entries.len(),
                                    "message chain loaded"
                                );
                                let _ = evt_tx
                                    .send(RuntimeEvent::MessageChainLoaded { request, entries });
                            }
                            Err(err) => {
                                tracing::error!(
                                    error = %format!("{err:#}"),
                                    "chain fetch failed"
                                );
                                send_error(
                                    &evt_tx,
                                    ErrorSource::Chain,
                                    format!("Message chain failed: {:#}", err),
                                );
                            }
                        }
                    });
                }
            }
        }

        // Periodic health check; a dead endpoint drops the provider but keeps the account
        if last_health_check.elapsed() >= config.health_interval {
            last_health_check = Instant::now();
            if let Some(current) = session.as_ref() {
                if let Err(err) = current.provider.block_number().await {
                    tracing::warn!(
                        session = current.id,
                        error = %format!("{err:#}"),
                        "connection lost"
                    );
                    send_error(
                        &evt_tx,
                        ErrorSource::Wallet,
                        format!("Connection lost: {:#}", err),
                    );
                    let _ = evt_tx.send(RuntimeEvent::ProviderUpdated(None));
                    session = None;
                }
            }
        }

        // Small yield to prevent busy loop
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

fn send_error(evt_tx: &Sender<RuntimeEvent>, source: ErrorSource, message: impl Into<String>) {
    let _ = evt_tx.send(RuntimeEvent::Error {
        source,
        message: message.into(),
    });
}

/// Open a provider session and pick the first account
async fn connect(config: &WorkerConfig, endpoint_index: usize, id: u64) -> Result<Session> {
    let endpoint = config.endpoints.get(endpoint_index).with_context(|| {
        format!(
            "Invalid endpoint index {} ({} total)",
            endpoint_index,
            config.endpoints.len()
        )
    })?;
    let contract = config
        .contract
        .context("No contract address configured (use --contract or `contract` in config)")?;

    let provider: Arc<dyn EthereumProvider> =
        Arc::from(create_provider(endpoint.clone(), config.private_key.as_deref()).await?);

    let accounts = async {
        match provider.signer() {
            Some(signer) => Ok(vec![signer]),
            None => provider.accounts().await,
        }
    };
    let (chain_id, accounts) = futures::future::try_join(provider.chain_id(), accounts)
        .await
        .with_context(|| format!("Endpoint {} not reachable", endpoint.display()))?;

    let account = *accounts
        .first()
        .context("Wallet exposes no accounts (set KEYWORDCHAIN_PRIVATE_KEY)")?;

    Ok(Session {
        id,
        chain_id,
        client: KeywordChainClient::new(Arc::clone(&provider), contract),
        provider,
        accounts,
        account,
    })
}
