//! Message chain view
//!
//! Refetches `getMessageChain()` whenever the `(session, refresh)` key moves
//! away from the key of its last fetch. Only the answer to the newest request
//! is stored; late answers for older sessions or earlier writes are dropped.

use chrono::{Local, TimeZone};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use crate::config::short_addr;
use crate::core::{Action, ChainRequest, Context, ExportFormat, Module, SessionState};
use crate::infrastructure::ethereum::ChainEntry;

/// `(provider session, refresh signal)`
type FetchKey = (u64, bool);

#[derive(Debug)]
pub struct MessageChain {
    entries: Vec<ChainEntry>,
    last_key: Option<FetchKey>,
    /// Newest request issued; answers to any other request are stale
    latest: Option<ChainRequest>,
    next_seq: u64,
    loading: bool,
    scroll: usize,
    max_entries: usize,
}

impl MessageChain {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            last_key: None,
            latest: None,
            next_seq: 0,
            loading: false,
            scroll: 0,
            max_entries: max_entries.max(1),
        }
    }

    /// Request to issue, if the fetch key changed since the last request
    pub fn pending_fetch(&mut self, session: &SessionState) -> Option<ChainRequest> {
        if !session.is_connected() {
            return None;
        }
        let provider = session.provider.as_ref()?;
        let key = (provider.session, session.refresh);
        if self.last_key == Some(key) {
            return None;
        }
        self.last_key = Some(key);
        self.next_seq += 1;
        let request = ChainRequest {
            session: provider.session,
            seq: self.next_seq,
        };
        self.latest = Some(request);
        self.loading = true;
        Some(request)
    }

    /// Forget the last key so the next sync fetches again
    pub fn invalidate(&mut self) {
        self.last_key = None;
    }

    /// Store a fetch result; returns false when it answers a superseded request
    pub fn apply_loaded(&mut self, request: ChainRequest, entries: Vec<ChainEntry>) -> bool {
        if self.latest != Some(request) {
            tracing::debug!(
                session = request.session,
                seq = request.seq,
                "dropping stale message chain"
            );
            return false;
        }
        self.entries = entries;
        self.loading = false;
        self.scroll = self.scroll.min(self.visible_len().saturating_sub(1));
        true
    }

    pub fn fail(&mut self) {
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// All loaded entries, oldest first
    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    /// Newest first, capped at `max_entries`
    pub fn visible(&self) -> impl Iterator<Item = &ChainEntry> {
        self.entries.iter().rev().take(self.max_entries)
    }

    fn visible_len(&self) -> usize {
        self.entries.len().min(self.max_entries)
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    fn scroll_down(&mut self) {
        if self.scroll + 1 < self.visible_len() {
            self.scroll += 1;
        }
    }

    fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

fn format_time(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| Local.timestamp_opt(secs, 0).single())
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "--".to_string())
}

impl Module for MessageChain {
    fn id(&self) -> &'static str {
        "chain"
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &Context) -> Action {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_down();
                Action::None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_up();
                Action::None
            }
            KeyCode::Char('R') => Action::RefreshChain,
            KeyCode::Char('e') => Action::Export(ExportFormat::Csv),
            KeyCode::Char('E') => Action::Export(ExportFormat::Json),
            _ => Action::None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _ctx: &Context) {
        let title = if self.loading {
            " Message Chain (loading…) ".to_string()
        } else {
            format!(" Message Chain ({}) ", self.entries.len())
        };

        let header = Row::new(["#", "sender", "phrase", "keyword", "time"])
            .style(Style::default().fg(Color::DarkGray));

        let rows: Vec<Row> = self
            .visible()
            .skip(self.scroll)
            .map(|entry| {
                Row::new(vec![
                    Cell::from(entry.index.to_string()),
                    Cell::from(short_addr(&entry.sender.to_string())),
                    Cell::from(entry.phrase.clone()),
                    Cell::from(Span::styled(
                        entry.keyword.clone(),
                        Style::default()
                            .fg(Color::LightYellow)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Cell::from(format_time(entry.timestamp)),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Length(14),
                Constraint::Min(12),
                Constraint::Length(14),
                Constraint::Length(16),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .title(title)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

        frame.render_widget(table, area);
    }
}
