//! Phrase writer - prompts for a phrase and submits `addPhrase`

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::core::{Action, Context, Module, NotifyLevel};

#[derive(Debug, Default)]
pub struct PhraseWriter {
    editing: bool,
    input: String,
    pending: bool,
}

impl PhraseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the prompt currently captures keys
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn open_prompt(&mut self) {
        self.editing = true;
        self.input.clear();
    }

    pub fn close_prompt(&mut self) {
        self.editing = false;
        self.input.clear();
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => {
                self.close_prompt();
                Action::None
            }
            KeyCode::Enter => {
                let phrase = self.input.trim().to_string();
                self.close_prompt();
                validate_phrase(phrase)
            }
            KeyCode::Backspace => {
                self.input.pop();
                Action::None
            }
            KeyCode::Char(ch) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL) {
                    self.input.push(ch);
                }
                Action::None
            }
            _ => Action::None,
        }
    }
}

/// Reject blank phrases before they reach the chain
pub fn validate_phrase(phrase: String) -> Action {
    let phrase = phrase.trim();
    if phrase.is_empty() {
        Action::Notify("Phrase must not be empty".to_string(), NotifyLevel::Warn)
    } else {
        Action::SubmitPhrase(phrase.to_string())
    }
}

impl Module for PhraseWriter {
    fn id(&self) -> &'static str {
        "writer"
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &Context) -> Action {
        if self.editing {
            return self.handle_prompt_key(key);
        }
        match key.code {
            KeyCode::Char('a') if self.pending => Action::Notify(
                "Waiting for the previous phrase to be mined".to_string(),
                NotifyLevel::Warn,
            ),
            KeyCode::Char('a') => Action::OpenPrompt,
            _ => Action::None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &Context) {
        let dim = Style::default().fg(Color::DarkGray);
        let added = match &ctx.session.added_phrase {
            Some(phrase) => Span::styled(phrase.clone(), Style::default().fg(Color::LightGreen)),
            None => Span::styled("--", dim),
        };

        let mut lines = vec![Line::from(vec![
            Span::styled("Added Phrase: ", Style::default().fg(Color::Gray)),
            added,
        ])];

        if self.editing {
            lines.push(Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::LightCyan)),
                Span::raw(self.input.clone()),
                Span::styled("█", Style::default().fg(Color::LightCyan)),
            ]));
        } else if self.pending {
            lines.push(Line::from(Span::styled("sending transaction…", dim)));
        } else {
            lines.push(Line::from(Span::styled("a add a phrase", dim)));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(writer: &mut PhraseWriter, text: &str) {
        for ch in text.chars() {
            writer.handle_key(key(KeyCode::Char(ch)), &Context::new());
        }
    }

    #[test]
    fn test_prompt_submits_trimmed_phrase() {
        let mut writer = PhraseWriter::new();
        assert_eq!(
            writer.handle_key(key(KeyCode::Char('a')), &Context::new()),
            Action::OpenPrompt
        );
        writer.open_prompt();
        type_text(&mut writer, "  banana ");
        writer.handle_key(key(KeyCode::Backspace), &Context::new());
        assert_eq!(writer.input(), "  banana");

        let action = writer.handle_key(key(KeyCode::Enter), &Context::new());
        assert_eq!(action, Action::SubmitPhrase("banana".to_string()));
        assert!(!writer.is_editing());
    }

    #[test]
    fn test_blank_phrase_rejected() {
        let mut writer = PhraseWriter::new();
        writer.open_prompt();
        type_text(&mut writer, "   ");
        let action = writer.handle_key(key(KeyCode::Enter), &Context::new());
        assert!(matches!(action, Action::Notify(_, NotifyLevel::Warn)));
    }

    #[test]
    fn test_escape_cancels() {
        let mut writer = PhraseWriter::new();
        writer.open_prompt();
        type_text(&mut writer, "abc");
        assert_eq!(
            writer.handle_key(key(KeyCode::Esc), &Context::new()),
            Action::None
        );
        assert!(!writer.is_editing());
        assert_eq!(writer.input(), "");
    }

    #[test]
    fn test_prompt_captures_command_keys() {
        let mut writer = PhraseWriter::new();
        writer.open_prompt();
        // 'a' is text while editing, not a new prompt
        assert_eq!(
            writer.handle_key(key(KeyCode::Char('a')), &Context::new()),
            Action::None
        );
        assert_eq!(writer.input(), "a");
    }
}
