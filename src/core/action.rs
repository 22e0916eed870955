//! Actions that modules return to communicate with the app

use alloy_primitives::Address;

/// Actions returned by modules to communicate state changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action needed
    None,

    /// Connect the wallet, optionally to a specific endpoint index
    Connect(Option<usize>),

    /// Drop the provider and account
    Disconnect,

    /// Switch the active account
    SelectAccount(AccountSelector),

    /// Read the latest phrase from the contract
    FetchLastPhrase,

    /// Open the phrase prompt
    OpenPrompt,

    /// Submit a new phrase transaction
    SubmitPhrase(String),

    /// Re-fetch the message chain regardless of the refresh signal
    RefreshChain,

    /// Export the message chain
    Export(ExportFormat),

    /// Copy text to the clipboard
    Copy(String),

    /// Show notification in status bar
    Notify(String, NotifyLevel),

    /// Open command bar with optional prefix
    OpenCommand(Option<String>),

    /// Toggle the help popup
    ToggleHelp,

    /// Request quit
    Quit,
}

/// Which account to switch to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountSelector {
    Next,
    Index(usize),
    Address(Address),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}
