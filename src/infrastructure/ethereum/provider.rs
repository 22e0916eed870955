//! Ethereum provider abstraction and Alloy implementation
//!
//! The worker only needs a handful of JSON-RPC calls, so the trait is kept
//! narrow and transport agnostic. Receipts are flattened into [`SubmittedTx`]
//! so callers never depend on the receipt envelope of a particular network.

use std::path::PathBuf;

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, Bytes, Log, B256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderConfig {
    /// HTTP JSON-RPC endpoint
    Http(String),
    /// WebSocket endpoint
    WebSocket(String),
    /// IPC socket path (Unix only)
    #[cfg(unix)]
    Ipc(PathBuf),
}

impl ProviderConfig {
    /// Get display name for this endpoint
    pub fn display(&self) -> String {
        match self {
            ProviderConfig::Http(url) => url.clone(),
            ProviderConfig::WebSocket(url) => url.clone(),
            #[cfg(unix)]
            ProviderConfig::Ipc(path) => path.display().to_string(),
        }
    }
}

/// A mined transaction, reduced to what the client inspects
#[derive(Debug, Clone)]
pub struct SubmittedTx {
    pub hash: B256,
    pub success: bool,
    pub logs: Vec<Log>,
}

/// Abstract Ethereum provider trait
///
/// Implemented by [`AlloyProvider`] for real endpoints and by in-memory fakes
/// in tests.
#[async_trait::async_trait]
pub trait EthereumProvider: Send + Sync + 'static {
    /// Chain id of the connected network
    async fn chain_id(&self) -> Result<u64>;

    /// Get the current block number
    async fn block_number(&self) -> Result<u64>;

    /// Accounts unlocked on the node (dev nodes)
    async fn accounts(&self) -> Result<Vec<Address>>;

    /// Execute a call (eth_call)
    async fn call(&self, request: TransactionRequest) -> Result<Bytes>;

    /// Send a transaction and wait for its receipt
    async fn send_transaction(&self, request: TransactionRequest) -> Result<SubmittedTx>;

    /// Address of the local signer, if the provider carries one
    fn signer(&self) -> Option<Address>;

    /// Get endpoint display name
    fn endpoint_name(&self) -> String;
}

/// Alloy-backed provider, type-erased over transport and wallet filler
pub struct AlloyProvider {
    provider: DynProvider,
    endpoint: String,
    signer: Option<Address>,
}

/// Create a provider from configuration, with an optional hex private key
pub async fn create_provider(
    config: ProviderConfig,
    private_key: Option<&str>,
) -> Result<Box<dyn EthereumProvider>> {
    let signer = private_key
        .map(|key| key.parse::<PrivateKeySigner>())
        .transpose()
        .context("Invalid private key")?;
    let signer_address = signer.as_ref().map(|s| s.address());
    let wallet = signer.map(EthereumWallet::from);
    let endpoint = config.display();

    let provider = match config {
        ProviderConfig::Http(url) => {
            let rpc_url = url.parse().context("Invalid HTTP URL")?;
            match wallet {
                Some(wallet) => ProviderBuilder::new()
                    .wallet(wallet)
                    .connect_http(rpc_url)
                    .erased(),
                None => ProviderBuilder::new().connect_http(rpc_url).erased(),
            }
        }
        ProviderConfig::WebSocket(url) => match wallet {
            Some(wallet) => ProviderBuilder::new()
                .wallet(wallet)
                .connect(&url)
                .await
                .context("Failed to create WebSocket provider")?
                .erased(),
            None => ProviderBuilder::new()
                .connect(&url)
                .await
                .context("Failed to create WebSocket provider")?
                .erased(),
        },
        #[cfg(unix)]
        ProviderConfig::Ipc(path) => {
            use alloy::providers::IpcConnect;
            let ipc = IpcConnect::new(path.to_string_lossy().to_string());
            match wallet {
                Some(wallet) => ProviderBuilder::new()
                    .wallet(wallet)
                    .connect_ipc(ipc)
                    .await
                    .context("Failed to create IPC provider")?
                    .erased(),
                None => ProviderBuilder::new()
                    .connect_ipc(ipc)
                    .await
                    .context("Failed to create IPC provider")?
                    .erased(),
            }
        }
    };

    Ok(Box::new(AlloyProvider {
        provider,
        endpoint,
        signer: signer_address,
    }))
}

#[async_trait::async_trait]
impl EthereumProvider for AlloyProvider {
    async fn chain_id(&self) -> Result<u64> {
        Ok(self.provider.get_chain_id().await?)
    }

    async fn block_number(&self) -> Result<u64> {
        Ok(self.provider.get_block_number().await?)
    }

    async fn accounts(&self) -> Result<Vec<Address>> {
        Ok(self.provider.get_accounts().await?)
    }

    async fn call(&self, request: TransactionRequest) -> Result<Bytes> {
        Ok(self.provider.call(request).await?)
    }

    async fn send_transaction(&self, request: TransactionRequest) -> Result<SubmittedTx> {
        let pending = self
            .provider
            .send_transaction(request)
            .await
            .context("Failed to submit transaction")?;
        let receipt = pending
            .get_receipt()
            .await
            .context("Failed to fetch receipt")?;

        Ok(SubmittedTx {
            hash: receipt.transaction_hash,
            success: receipt.status(),
            logs: receipt
                .inner
                .logs()
                .iter()
                .map(|log| log.inner.clone())
                .collect(),
        })
    }

    fn signer(&self) -> Option<Address> {
        self.signer
    }

    fn endpoint_name(&self) -> String {
        self.endpoint.clone()
    }
}
