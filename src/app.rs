//! Root coordinator
//!
//! Owns the session record and the child widgets. Session changes only go
//! through [`crate::core::reduce`]; everything else here is view state
//! (pending flags, status line, input mode, backdrop).

use std::path::PathBuf;
use std::time::{Duration, Instant};

use alloy_primitives::Address;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::{
    parse_command, reduce, AccountSelector, Action, Command, Context, ExportFormat, Module,
    NotifyLevel, Phase, SessionEvent, SessionState,
};
use crate::domain::ParticleField;
use crate::infrastructure::runtime::{ErrorSource, RuntimeCommand, RuntimeEvent};
use crate::modules::export;
use crate::modules::writer::validate_phrase;
use crate::modules::{Backdrop, MessageChain, PhraseReader, PhraseWriter, WalletButton};

const STATUS_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

impl From<NotifyLevel> for StatusLevel {
    fn from(level: NotifyLevel) -> Self {
        match level {
            NotifyLevel::Info => StatusLevel::Info,
            NotifyLevel::Warn => StatusLevel::Warn,
            NotifyLevel::Error => StatusLevel::Error,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct CommandBar {
    pub input: String,
    pub last: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

pub struct App {
    /// Reducer-owned session record
    session: SessionState,
    /// Snapshot handed to widgets
    pub ctx: Context,
    pub wallet: WalletButton,
    pub reader: PhraseReader,
    pub writer: PhraseWriter,
    pub chain: MessageChain,
    pub backdrop: Backdrop,
    pub input_mode: InputMode,
    pub command: CommandBar,
    pub status: Option<StatusMessage>,
    pub help_open: bool,
    pub should_quit: bool,
    export_dir: PathBuf,
    pending_commands: Vec<RuntimeCommand>,
    last_tick: Instant,
    /// Time not yet fed to the backdrop simulation
    backdrop_lag: Duration,
}

impl App {
    pub fn new(endpoints: Vec<String>, max_entries: usize, export_dir: PathBuf) -> Self {
        let mut ctx = Context::new();
        ctx.endpoints = endpoints;
        Self {
            session: SessionState::default(),
            ctx,
            wallet: WalletButton::new(),
            reader: PhraseReader::new(),
            writer: PhraseWriter::new(),
            chain: MessageChain::new(max_entries),
            backdrop: Backdrop::Pending,
            input_mode: InputMode::Normal,
            command: CommandBar::default(),
            status: None,
            help_open: false,
            should_quit: false,
            export_dir,
            pending_commands: Vec::new(),
            last_tick: Instant::now(),
            backdrop_lag: Duration::ZERO,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// Feed one event through the reducer
    pub fn dispatch(&mut self, event: SessionEvent) {
        let before = self.session.phase();
        let kind = event.kind();
        self.session = reduce(std::mem::take(&mut self.session), event);
        tracing::debug!(event = kind, "session event");

        let after = self.session.phase();
        if before != after {
            match after {
                Phase::Connected => tracing::info!("account and provider synchronized"),
                Phase::Disconnected => {
                    tracing::info!("provider or account missing, showing onboarding")
                }
            }
        }
        self.sync_context();
    }

    /// Copy session state into the widget context and queue chain fetches
    pub fn sync_context(&mut self) {
        self.ctx.session = self.session.clone();
        if let Some(request) = self.chain.pending_fetch(&self.session) {
            self.pending_commands
                .push(RuntimeCommand::FetchMessageChain(request));
        }
    }

    /// Commands queued for the runtime worker since the last call
    pub fn take_runtime_commands(&mut self) -> Vec<RuntimeCommand> {
        std::mem::take(&mut self.pending_commands)
    }

    pub fn apply_runtime_event(&mut self, event: RuntimeEvent) {
        match event {
            RuntimeEvent::ProviderUpdated(provider) => {
                if let Some(handle) = provider.as_ref() {
                    self.wallet.set_connecting(false);
                    self.set_status(
                        format!("Connected to {} (chain {})", handle.endpoint, handle.chain_id),
                        StatusLevel::Info,
                    );
                } else {
                    // In-flight requests belonged to the dropped session
                    self.reader.set_pending(false);
                    self.writer.set_pending(false);
                    self.chain.fail();
                }
                self.dispatch(SessionEvent::ProviderUpdated(provider));
            }
            RuntimeEvent::AccountUpdated(account) => {
                if account.is_none() {
                    self.ctx.accounts.clear();
                }
                self.dispatch(SessionEvent::AccountUpdated(account));
            }
            RuntimeEvent::AccountsAvailable(accounts) => {
                self.ctx.accounts = accounts;
            }
            RuntimeEvent::LastPhraseFetched { phrase } => {
                self.reader.set_pending(false);
                self.dispatch(SessionEvent::LastPhraseFetched(phrase));
            }
            RuntimeEvent::PhraseAdded {
                phrase,
                new_keyword,
                tx_hash,
            } => {
                self.writer.set_pending(false);
                self.set_status(
                    format!("Phrase added in {tx_hash}, new keyword: {new_keyword}"),
                    StatusLevel::Info,
                );
                self.dispatch(SessionEvent::PhraseAdded {
                    phrase,
                    new_keyword,
                });
            }
            RuntimeEvent::MessageChainLoaded { request, entries } => {
                self.chain.apply_loaded(request, entries);
            }
            RuntimeEvent::Error { source, message } => {
                tracing::warn!(source = source.label(), %message, "request failed");
                match source {
                    ErrorSource::Wallet => self.wallet.set_connecting(false),
                    ErrorSource::Reader => self.reader.set_pending(false),
                    ErrorSource::Writer => self.writer.set_pending(false),
                    ErrorSource::Chain => self.chain.fail(),
                }
                self.set_status(message, StatusLevel::Error);
            }
        }
    }

    /// Store the backdrop loader outcome
    pub fn apply_backdrop(&mut self, outcome: Result<ParticleField, String>) {
        match outcome {
            Ok(field) => {
                tracing::info!(particles = field.particles().len(), "backdrop ready");
                self.backdrop = Backdrop::Ready(field);
            }
            Err(err) => {
                tracing::error!(error = %err, "backdrop failed to load");
                self.backdrop = Backdrop::Failed(err);
            }
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.backdrop.resize(cols, rows);
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            if status.since.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
        let elapsed = self.last_tick.elapsed();
        self.last_tick = Instant::now();
        self.advance_backdrop(elapsed);
    }

    /// Step the backdrop at most once per frame interval of its fps limit
    fn advance_backdrop(&mut self, elapsed: Duration) {
        let Some(interval) = self.backdrop.field().map(ParticleField::frame_interval) else {
            self.backdrop_lag = Duration::ZERO;
            return;
        };
        self.backdrop_lag += elapsed;
        if self.backdrop_lag >= interval {
            self.backdrop.step(std::mem::take(&mut self.backdrop_lag));
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.help_open {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                self.help_open = false;
            }
            return;
        }

        if self.input_mode == InputMode::Command {
            self.handle_command_key(key);
            return;
        }

        if self.writer.is_editing() {
            let action = self.writer.handle_key(key, &self.ctx);
            self.apply_action(action);
            return;
        }

        let action = match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('?') => Action::ToggleHelp,
            KeyCode::Char(':') => Action::OpenCommand(None),
            KeyCode::Char('c' | 'd' | 'n' | 'y') => {
                let action = self.wallet.handle_key(key, &self.ctx);
                tracing::debug!(module = self.wallet.id(), ?action, "key handled");
                action
            }
            _ if self.ctx.phase() == Phase::Connected => {
                let modules: [&mut dyn Module; 3] =
                    [&mut self.reader, &mut self.writer, &mut self.chain];
                let mut action = Action::None;
                for module in modules {
                    action = module.handle_key(key, &self.ctx);
                    if action != Action::None {
                        tracing::debug!(module = module.id(), ?action, "key handled");
                        break;
                    }
                }
                action
            }
            _ => Action::None,
        };
        self.apply_action(action);
    }

    fn handle_command_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.exit_command(),
            KeyCode::Enter => self.apply_command(),
            KeyCode::Backspace => {
                self.command.input.pop();
            }
            KeyCode::Char(ch) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return;
                }
                self.command.input.push(ch);
            }
            _ => {}
        }
    }

    pub fn enter_command(&mut self, prefix: Option<String>) {
        self.input_mode = InputMode::Command;
        self.command.input = prefix.unwrap_or_default();
    }

    pub fn exit_command(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command.input.clear();
    }

    pub fn apply_command(&mut self) {
        let input = self.command.input.trim().to_string();
        self.exit_command();
        if input.is_empty() {
            return;
        }

        let cmd = parse_command(&input);
        tracing::debug!(?cmd, "command");
        let action = self.execute_command(&cmd);
        self.command.last = Some(input);
        self.apply_action(action);
    }

    pub fn execute_command(&self, cmd: &Command) -> Action {
        match cmd {
            Command::Connect(index) => Action::Connect(*index),
            Command::Disconnect => Action::Disconnect,
            Command::Account(None) => Action::SelectAccount(AccountSelector::Next),
            Command::Account(Some(arg)) => {
                if let Ok(index) = arg.parse::<usize>() {
                    Action::SelectAccount(AccountSelector::Index(index))
                } else if let Ok(address) = arg.parse::<Address>() {
                    Action::SelectAccount(AccountSelector::Address(address))
                } else {
                    Action::Notify(
                        format!("Invalid account: {arg}"),
                        NotifyLevel::Warn,
                    )
                }
            }
            Command::Read => Action::FetchLastPhrase,
            Command::Add(None) => Action::OpenPrompt,
            Command::Add(Some(phrase)) => validate_phrase(phrase.clone()),
            Command::Refresh => Action::RefreshChain,
            Command::Export(format) => {
                match format.as_deref().map(str::to_lowercase).as_deref() {
                    None | Some("csv") => Action::Export(ExportFormat::Csv),
                    Some("json") => Action::Export(ExportFormat::Json),
                    Some(other) => Action::Notify(
                        format!("Unknown export format: {other} (csv|json)"),
                        NotifyLevel::Warn,
                    ),
                }
            }
            Command::Copy(Some(text)) => Action::Copy(text.clone()),
            Command::Copy(None) => match self.session.account {
                Some(account) => Action::Copy(account.to_string()),
                None => Action::Notify("Nothing to copy".to_string(), NotifyLevel::Warn),
            },
            Command::Help => Action::ToggleHelp,
            Command::Quit => Action::Quit,
            Command::Unknown(input) => {
                Action::Notify(format!("Unknown command: {input}"), NotifyLevel::Warn)
            }
        }
    }

    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Connect(index) => {
                let endpoint_index = index.unwrap_or(self.ctx.endpoint_index);
                let Some(endpoint) = self.ctx.endpoints.get(endpoint_index).cloned() else {
                    self.set_status(
                        format!(
                            "No endpoint #{endpoint_index} ({} configured)",
                            self.ctx.endpoints.len()
                        ),
                        StatusLevel::Error,
                    );
                    return;
                };
                self.ctx.endpoint_index = endpoint_index;
                self.wallet.set_connecting(true);
                self.set_status(format!("Connecting to {endpoint}…"), StatusLevel::Info);
                self.pending_commands
                    .push(RuntimeCommand::Connect { endpoint_index });
            }
            Action::Disconnect => {
                self.wallet.set_connecting(false);
                self.pending_commands.push(RuntimeCommand::Disconnect);
                self.set_status("Disconnected", StatusLevel::Info);
            }
            Action::SelectAccount(selector) => match self.resolve_account(&selector) {
                Some(account) => {
                    self.pending_commands
                        .push(RuntimeCommand::SelectAccount { account });
                }
                None => self.set_status("No such account", StatusLevel::Warn),
            },
            Action::FetchLastPhrase => {
                if self.require_connected() {
                    self.reader.set_pending(true);
                    self.pending_commands.push(RuntimeCommand::FetchLastPhrase);
                }
            }
            Action::OpenPrompt => {
                if self.require_connected() {
                    self.writer.open_prompt();
                }
            }
            Action::SubmitPhrase(phrase) => {
                if self.require_connected() {
                    self.writer.set_pending(true);
                    self.set_status(format!("Sending \"{phrase}\"…"), StatusLevel::Info);
                    self.pending_commands
                        .push(RuntimeCommand::AddPhrase { phrase });
                }
            }
            Action::RefreshChain => {
                if self.require_connected() {
                    self.chain.invalidate();
                    self.sync_context();
                }
            }
            Action::Export(format) => {
                let action = export::export_chain(&self.export_dir, self.chain.entries(), format);
                self.apply_action(action);
            }
            Action::Copy(text) => self.copy_to_clipboard(text),
            Action::Notify(msg, level) => self.set_status(msg, level.into()),
            Action::OpenCommand(prefix) => self.enter_command(prefix),
            Action::ToggleHelp => self.help_open = !self.help_open,
            Action::Quit => self.should_quit = true,
        }
    }

    fn require_connected(&mut self) -> bool {
        if self.session.is_connected() {
            true
        } else {
            self.set_status("Connect a wallet first", StatusLevel::Warn);
            false
        }
    }

    fn resolve_account(&self, selector: &AccountSelector) -> Option<Address> {
        let accounts = &self.ctx.accounts;
        match selector {
            AccountSelector::Next => {
                if accounts.is_empty() {
                    return None;
                }
                let current = self
                    .session
                    .account
                    .and_then(|account| accounts.iter().position(|a| *a == account));
                let next = current.map(|i| (i + 1) % accounts.len()).unwrap_or(0);
                accounts.get(next).copied()
            }
            AccountSelector::Index(index) => accounts.get(*index).copied(),
            AccountSelector::Address(address) => {
                accounts.iter().find(|a| *a == address).copied()
            }
        }
    }

    fn copy_to_clipboard(&mut self, text: String) {
        use arboard::Clipboard;

        match Clipboard::new() {
            Ok(mut clipboard) => {
                if clipboard.set_text(&text).is_ok() {
                    let shown = if text.chars().count() > 20 {
                        format!("{}...", text.chars().take(20).collect::<String>())
                    } else {
                        text
                    };
                    self.set_status(format!("Copied: {shown}"), StatusLevel::Info);
                } else {
                    self.set_status("Failed to copy to clipboard", StatusLevel::Error);
                }
            }
            Err(_) => {
                self.set_status("Clipboard not available", StatusLevel::Error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;

    use super::*;
    use crate::core::{ChainRequest, ProviderHandle};
    use crate::infrastructure::ethereum::ChainEntry;

    fn app() -> App {
        App::new(
            vec!["http://localhost:8545".to_string()],
            50,
            std::env::temp_dir().join("keywordchain-app-tests"),
        )
    }

    fn handle(session: u64) -> ProviderHandle {
        ProviderHandle {
            session,
            endpoint: "http://localhost:8545".to_string(),
            chain_id: 31337,
            contract: Address::repeat_byte(0x11),
        }
    }

    fn connect(app: &mut App, session: u64) {
        app.apply_runtime_event(RuntimeEvent::ProviderUpdated(Some(handle(session))));
        app.apply_runtime_event(RuntimeEvent::AccountsAvailable(vec![
            Address::repeat_byte(0xaa),
            Address::repeat_byte(0xbb),
        ]));
        app.apply_runtime_event(RuntimeEvent::AccountUpdated(Some(Address::repeat_byte(
            0xaa,
        ))));
    }

    fn fetch(session: u64, seq: u64) -> RuntimeCommand {
        RuntimeCommand::FetchMessageChain(ChainRequest { session, seq })
    }

    fn key(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE)
    }

    #[test]
    fn test_connect_key_queues_command() {
        let mut app = app();
        app.handle_key(key('c'));
        assert!(app.wallet.is_connecting());
        assert_eq!(
            app.take_runtime_commands(),
            vec![RuntimeCommand::Connect { endpoint_index: 0 }]
        );
    }

    #[test]
    fn test_connect_queues_chain_fetch() {
        let mut app = app();
        connect(&mut app, 1);
        assert_eq!(app.phase(), Phase::Connected);
        assert!(!app.wallet.is_connecting());
        assert_eq!(app.take_runtime_commands(), vec![fetch(1, 1)]);
    }

    #[test]
    fn test_phrase_added_flips_refresh_and_refetches() {
        let mut app = app();
        connect(&mut app, 1);
        app.take_runtime_commands();

        app.apply_runtime_event(RuntimeEvent::PhraseAdded {
            phrase: "banana".to_string(),
            new_keyword: "banana-key".to_string(),
            tx_hash: B256::repeat_byte(0x01),
        });
        assert_eq!(app.session().added_phrase.as_deref(), Some("banana"));
        assert_eq!(app.session().last_phrase.as_deref(), Some("banana-key"));
        assert_eq!(app.take_runtime_commands(), vec![fetch(1, 2)]);
    }

    #[test]
    fn test_errors_never_reach_session() {
        let mut app = app();
        connect(&mut app, 1);
        let before = app.session().clone();
        app.reader.set_pending(true);

        app.apply_runtime_event(RuntimeEvent::Error {
            source: ErrorSource::Reader,
            message: "Read failed: boom".to_string(),
        });
        assert_eq!(app.session(), &before);
        assert!(!app.reader.is_pending());
        assert_eq!(
            app.status_text(),
            Some(("Read failed: boom", StatusLevel::Error))
        );
    }

    #[test]
    fn test_provider_loss_shows_onboarding() {
        let mut app = app();
        connect(&mut app, 1);
        app.apply_runtime_event(RuntimeEvent::ProviderUpdated(None));
        assert_eq!(app.phase(), Phase::Disconnected);
        assert!(app.session().account.is_some());
    }

    #[test]
    fn test_read_requires_connection() {
        let mut app = app();
        app.apply_action(Action::FetchLastPhrase);
        assert!(app.take_runtime_commands().is_empty());
        assert!(matches!(app.status_text(), Some((_, StatusLevel::Warn))));
    }

    #[test]
    fn test_widget_keys_ignored_while_disconnected() {
        let mut app = app();
        app.handle_key(key('r'));
        app.handle_key(key('a'));
        assert!(app.take_runtime_commands().is_empty());
        assert!(!app.writer.is_editing());
    }

    #[test]
    fn test_prompt_flow_submits_phrase() {
        let mut app = app();
        connect(&mut app, 1);
        app.take_runtime_commands();

        app.handle_key(key('a'));
        assert!(app.writer.is_editing());
        for ch in "kiwi".chars() {
            app.handle_key(key(ch));
        }
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert!(app.writer.is_pending());
        assert_eq!(
            app.take_runtime_commands(),
            vec![RuntimeCommand::AddPhrase {
                phrase: "kiwi".to_string()
            }]
        );
    }

    #[test]
    fn test_command_bar_read_and_unknown() {
        let mut app = app();
        connect(&mut app, 1);
        app.take_runtime_commands();

        app.handle_key(key(':'));
        assert_eq!(app.input_mode, InputMode::Command);
        for ch in "read".chars() {
            app.handle_key(key(ch));
        }
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(
            app.take_runtime_commands(),
            vec![RuntimeCommand::FetchLastPhrase]
        );

        app.enter_command(Some("frobnicate".to_string()));
        app.apply_command();
        assert!(matches!(app.status_text(), Some((_, StatusLevel::Warn))));
    }

    #[test]
    fn test_next_account_wraps() {
        let mut app = app();
        connect(&mut app, 1);
        app.take_runtime_commands();

        app.handle_key(key('n'));
        assert_eq!(
            app.take_runtime_commands(),
            vec![RuntimeCommand::SelectAccount {
                account: Address::repeat_byte(0xbb)
            }]
        );

        app.apply_runtime_event(RuntimeEvent::AccountUpdated(Some(Address::repeat_byte(
            0xbb,
        ))));
        app.apply_action(Action::SelectAccount(AccountSelector::Next));
        assert_eq!(
            app.take_runtime_commands(),
            vec![RuntimeCommand::SelectAccount {
                account: Address::repeat_byte(0xaa)
            }]
        );
    }

    #[test]
    fn test_refresh_key_refetches_same_session() {
        let mut app = app();
        connect(&mut app, 1);
        app.take_runtime_commands();
        app.apply_runtime_event(RuntimeEvent::MessageChainLoaded {
            request: ChainRequest { session: 1, seq: 1 },
            entries: vec![ChainEntry {
                index: 0,
                sender: Address::repeat_byte(0x01),
                phrase: "hello world".to_string(),
                keyword: "world".to_string(),
                timestamp: 1_700_000_000,
            }],
        });
        assert_eq!(app.chain.entries().len(), 1);

        app.handle_key(key('R'));
        assert_eq!(app.take_runtime_commands(), vec![fetch(1, 2)]);
    }

    #[test]
    fn test_backdrop_failure_recorded() {
        let mut app = app();
        app.apply_backdrop(Err("invalid color".to_string()));
        assert!(matches!(app.backdrop, Backdrop::Failed(_)));
        app.on_tick();
        assert!(app.backdrop.field().is_none());
    }

    #[test]
    fn test_late_chain_result_of_same_session_ignored() {
        let mut app = app();
        connect(&mut app, 1);
        app.take_runtime_commands();

        for (phrase, keyword) in [("one two", "two"), ("two three", "three")] {
            app.apply_runtime_event(RuntimeEvent::PhraseAdded {
                phrase: phrase.to_string(),
                new_keyword: keyword.to_string(),
                tx_hash: B256::repeat_byte(0x01),
            });
        }
        assert_eq!(app.take_runtime_commands(), vec![fetch(1, 2), fetch(1, 3)]);

        let entry = |index: usize| ChainEntry {
            index,
            sender: Address::repeat_byte(0x01),
            phrase: format!("phrase {index}"),
            keyword: format!("kw{index}"),
            timestamp: 1_700_000_000,
        };
        app.apply_runtime_event(RuntimeEvent::MessageChainLoaded {
            request: ChainRequest { session: 1, seq: 3 },
            entries: vec![entry(0), entry(1), entry(2)],
        });
        // The earlier write's fetch answers last
        app.apply_runtime_event(RuntimeEvent::MessageChainLoaded {
            request: ChainRequest { session: 1, seq: 2 },
            entries: vec![entry(0), entry(1)],
        });
        assert_eq!(app.chain.entries().len(), 3);
        assert!(!app.chain.is_loading());
    }

    #[test]
    fn test_backdrop_steps_at_fps_limit() {
        use crate::domain::{FieldBounds, ParticleOptions};

        let options = ParticleOptions {
            fps_limit: 2,
            number: 10,
            density_area: None,
            ..ParticleOptions::default()
        };
        let field = ParticleField::load(options, FieldBounds::from_cells(80, 24)).unwrap();
        assert_eq!(field.frame_interval(), Duration::from_millis(500));

        let mut app = app();
        app.apply_backdrop(Ok(field));
        let positions = |app: &App| -> Vec<(f64, f64)> {
            let field = app.backdrop.field().unwrap();
            field.particles().iter().map(|p| (p.x, p.y)).collect()
        };
        let start = positions(&app);

        app.advance_backdrop(Duration::from_millis(100));
        assert_eq!(positions(&app), start);

        app.advance_backdrop(Duration::from_millis(450));
        assert_ne!(positions(&app), start);
        assert_eq!(app.backdrop_lag, Duration::ZERO);
    }

    #[test]
    fn test_widget_ids_are_distinct() {
        let app = app();
        let ids = [app.wallet.id(), app.reader.id(), app.writer.id(), app.chain.id()];
        let unique: std::collections::BTreeSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }
}
