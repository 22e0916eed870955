//! Phrase reader - fetches the latest phrase from the contract

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::core::{Action, Context, Module, NotifyLevel};

#[derive(Debug, Default)]
pub struct PhraseReader {
    pending: bool,
}

impl PhraseReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }
}

impl Module for PhraseReader {
    fn id(&self) -> &'static str {
        "reader"
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &Context) -> Action {
        match key.code {
            KeyCode::Char('r') if self.pending => {
                Action::Notify("Read already in flight".to_string(), NotifyLevel::Warn)
            }
            KeyCode::Char('r') => Action::FetchLastPhrase,
            _ => Action::None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &Context) {
        let value = match (&ctx.session.last_phrase, self.pending) {
            (_, true) => Span::styled("reading…", Style::default().fg(Color::DarkGray)),
            (Some(phrase), false) => Span::styled(
                phrase.clone(),
                Style::default()
                    .fg(Color::LightYellow)
                    .add_modifier(Modifier::BOLD),
            ),
            (None, false) => Span::styled("--", Style::default().fg(Color::DarkGray)),
        };

        let lines = vec![
            Line::from(vec![
                Span::styled("Last Keyword: ", Style::default().fg(Color::Gray)),
                value,
            ]),
            Line::from(Span::styled(
                "r read latest phrase",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }
}
