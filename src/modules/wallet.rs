//! Wallet connector - connect, disconnect and switch accounts

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::config::short_addr;
use crate::core::{AccountSelector, Action, Context, Module, NotifyLevel, Phase};

#[derive(Debug, Default)]
pub struct WalletButton {
    connecting: bool,
}

impl WalletButton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connecting(&self) -> bool {
        self.connecting
    }

    pub fn set_connecting(&mut self, connecting: bool) {
        self.connecting = connecting;
    }
}

impl Module for WalletButton {
    fn id(&self) -> &'static str {
        "wallet"
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &Context) -> Action {
        match key.code {
            KeyCode::Char('c') => {
                if self.connecting {
                    Action::Notify("Already connecting".to_string(), NotifyLevel::Warn)
                } else if ctx.phase() == Phase::Connected {
                    Action::Notify("Wallet already connected".to_string(), NotifyLevel::Info)
                } else {
                    Action::Connect(None)
                }
            }
            KeyCode::Char('d') => {
                if ctx.session.provider.is_none() && ctx.session.account.is_none() {
                    Action::Notify("Wallet not connected".to_string(), NotifyLevel::Warn)
                } else {
                    Action::Disconnect
                }
            }
            KeyCode::Char('n') => {
                if ctx.accounts.len() < 2 {
                    Action::Notify("No other account available".to_string(), NotifyLevel::Warn)
                } else {
                    Action::SelectAccount(AccountSelector::Next)
                }
            }
            KeyCode::Char('y') => match ctx.session.account {
                Some(account) => Action::Copy(account.to_string()),
                None => Action::Notify("Nothing to copy".to_string(), NotifyLevel::Warn),
            },
            _ => Action::None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &Context) {
        let dim = Style::default().fg(Color::DarkGray);
        let accent = Style::default()
            .fg(Color::LightCyan)
            .add_modifier(Modifier::BOLD);

        let mut lines = Vec::new();
        match (&ctx.session.provider, ctx.session.account) {
            (Some(provider), Some(account)) => {
                lines.push(Line::from(vec![
                    Span::styled("● ", Style::default().fg(Color::LightGreen)),
                    Span::styled(short_addr(&account.to_string()), accent),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("chain ", dim),
                    Span::raw(provider.chain_id.to_string()),
                    Span::styled("  via ", dim),
                    Span::raw(provider.endpoint.clone()),
                ]));
                if ctx.accounts.len() > 1 {
                    lines.push(Line::from(Span::styled(
                        format!("{} accounts, n to switch", ctx.accounts.len()),
                        dim,
                    )));
                }
            }
            _ => {
                let label = if self.connecting {
                    "[ Connecting… ]"
                } else {
                    "[ Connect Wallet ]"
                };
                lines.push(Line::from(Span::styled(label, accent)));
                if let Some(endpoint) = ctx.selected_endpoint() {
                    lines.push(Line::from(vec![
                        Span::styled("endpoint ", dim),
                        Span::raw(endpoint.to_string()),
                    ]));
                }
                lines.push(Line::from(Span::styled("press c to connect", dim)));
            }
        }

        let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Address;
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::core::ProviderHandle;

    fn key(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE)
    }

    fn connected() -> Context {
        let mut ctx = Context::new();
        ctx.session.provider = Some(ProviderHandle {
            session: 1,
            endpoint: "http://localhost:8545".to_string(),
            chain_id: 31337,
            contract: Address::repeat_byte(0x11),
        });
        ctx.session.account = Some(Address::repeat_byte(0xaa));
        ctx.accounts = vec![Address::repeat_byte(0xaa), Address::repeat_byte(0xbb)];
        ctx
    }

    #[test]
    fn test_connect_only_when_disconnected() {
        let mut wallet = WalletButton::new();
        assert_eq!(wallet.handle_key(key('c'), &Context::new()), Action::Connect(None));
        assert!(matches!(
            wallet.handle_key(key('c'), &connected()),
            Action::Notify(_, NotifyLevel::Info)
        ));

        wallet.set_connecting(true);
        assert!(matches!(
            wallet.handle_key(key('c'), &Context::new()),
            Action::Notify(_, NotifyLevel::Warn)
        ));
    }

    #[test]
    fn test_next_account_and_copy() {
        let mut wallet = WalletButton::new();
        let ctx = connected();
        assert_eq!(
            wallet.handle_key(key('n'), &ctx),
            Action::SelectAccount(AccountSelector::Next)
        );
        assert_eq!(
            wallet.handle_key(key('y'), &ctx),
            Action::Copy(Address::repeat_byte(0xaa).to_string())
        );
        assert_eq!(wallet.handle_key(key('d'), &ctx), Action::Disconnect);
    }

    #[test]
    fn test_disconnect_after_provider_loss() {
        let mut wallet = WalletButton::new();
        let mut ctx = connected();
        ctx.session.provider = None;
        assert_eq!(wallet.handle_key(key('d'), &ctx), Action::Disconnect);
    }
}
