//! UI Modules
//!
//! Each widget implements the Module trait and handles its own key input
//! and rendering:
//! - wallet: connect, disconnect, account switching
//! - reader: latest phrase
//! - writer: phrase prompt and submission
//! - chain: message chain history
//! - backdrop: decorative particle layer
//! - export: CSV and JSON export of the message chain

pub mod backdrop;
pub mod chain;
pub mod export;
pub mod reader;
pub mod wallet;
pub mod writer;

pub use backdrop::{Backdrop, BackdropLoader};
pub use chain::MessageChain;
pub use reader::PhraseReader;
pub use wallet::WalletButton;
pub use writer::PhraseWriter;
