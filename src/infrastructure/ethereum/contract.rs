//! KeywordChain contract binding
//!
//! Calldata is built with `alloy-sol-types` and sent through the narrow
//! [`EthereumProvider`] trait, so the same client runs against a live node
//! or an in-memory fake.

use std::sync::Arc;

use alloy::primitives::{Address, B256};
use alloy::rpc::types::TransactionRequest;
use alloy_sol_types::{sol, SolCall, SolEvent};
use anyhow::{bail, Context, Result};

use super::provider::EthereumProvider;

sol! {
    interface IKeywordChain {
        struct Message {
            address sender;
            string phrase;
            string keyword;
            uint256 timestamp;
        }

        function getLastPhrase() external view returns (string memory);
        function addPhrase(string calldata phrase) external;
        function getMessageChain() external view returns (Message[] memory);

        event PhraseAdded(address indexed sender, string phrase, string newKeyword);
    }
}

/// One entry of the on-chain message chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEntry {
    /// Position in the chain, oldest first
    pub index: usize,
    pub sender: Address,
    pub phrase: String,
    pub keyword: String,
    /// Unix seconds
    pub timestamp: u64,
}

/// Result of a successful `addPhrase`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseReceipt {
    pub tx_hash: B256,
    pub new_keyword: String,
}

#[derive(Clone)]
pub struct KeywordChainClient {
    provider: Arc<dyn EthereumProvider>,
    contract: Address,
}

impl KeywordChainClient {
    pub fn new(provider: Arc<dyn EthereumProvider>, contract: Address) -> Self {
        Self { provider, contract }
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    pub async fn last_phrase(&self) -> Result<String> {
        let data = self
            .call(IKeywordChain::getLastPhraseCall {}.abi_encode())
            .await
            .context("getLastPhrase failed")?;
        IKeywordChain::getLastPhraseCall::abi_decode_returns(&data)
            .context("Failed to decode getLastPhrase result")
    }

    pub async fn message_chain(&self) -> Result<Vec<ChainEntry>> {
        let data = self
            .call(IKeywordChain::getMessageChainCall {}.abi_encode())
            .await
            .context("getMessageChain failed")?;
        let messages = IKeywordChain::getMessageChainCall::abi_decode_returns(&data)
            .context("Failed to decode getMessageChain result")?;

        Ok(messages
            .into_iter()
            .enumerate()
            .map(|(index, message)| ChainEntry {
                index,
                sender: message.sender,
                phrase: message.phrase,
                keyword: message.keyword,
                timestamp: message.timestamp.saturating_to::<u64>(),
            })
            .collect())
    }

    /// Submit `addPhrase` from `from` and derive the new keyword
    ///
    /// The keyword comes from the contract's `PhraseAdded` log; receipts
    /// without one fall back to reading the current phrase.
    pub async fn add_phrase(&self, from: Address, phrase: &str) -> Result<PhraseReceipt> {
        let calldata = IKeywordChain::addPhraseCall {
            phrase: phrase.to_string(),
        }
        .abi_encode();
        let request = TransactionRequest::default()
            .from(from)
            .to(self.contract)
            .input(calldata.into());

        let tx = self.provider.send_transaction(request).await?;
        if !tx.success {
            bail!("addPhrase reverted (tx {})", tx.hash);
        }

        let logged = tx
            .logs
            .iter()
            .filter(|log| log.address == self.contract)
            .filter(|log| log.topics().first() == Some(&IKeywordChain::PhraseAdded::SIGNATURE_HASH))
            .find_map(|log| IKeywordChain::PhraseAdded::decode_log_data(&log.data).ok());

        let new_keyword = match logged {
            Some(event) => event.newKeyword,
            None => {
                tracing::debug!(tx = %tx.hash, "no PhraseAdded log, reading current phrase");
                self.last_phrase().await?
            }
        };

        Ok(PhraseReceipt {
            tx_hash: tx.hash,
            new_keyword,
        })
    }

    async fn call(&self, calldata: Vec<u8>) -> Result<alloy::primitives::Bytes> {
        let request = TransactionRequest::default()
            .to(self.contract)
            .input(calldata.into());
        self.provider.call(request).await
    }
}
