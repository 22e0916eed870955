pub mod action;
pub mod command;
pub mod context;
pub mod module;
pub mod state;

pub use action::{AccountSelector, Action, ExportFormat, NotifyLevel};
pub use command::{parse_command, Command};
pub use context::Context;
pub use module::Module;
pub use state::{reduce, ChainRequest, Phase, ProviderHandle, SessionEvent, SessionState};
