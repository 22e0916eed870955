//! Ethereum infrastructure - Alloy provider and the KeywordChain binding

mod contract;
mod provider;

pub use contract::{ChainEntry, IKeywordChain, KeywordChainClient, PhraseReceipt};
pub use provider::{create_provider, AlloyProvider, EthereumProvider, ProviderConfig, SubmittedTx};
