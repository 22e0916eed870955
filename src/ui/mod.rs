use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub mod layout;
pub mod widgets;

use crate::app::{App, InputMode, StatusLevel};
use crate::core::{Module, Phase};
use widgets::ParticleCanvas;

const CARD_BG: Color = Color::Rgb(22, 27, 34);
const FOOTER: &str = "© 2025 KeywordChain";

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.size();
    let phase = app.ctx.phase();
    let areas = layout::areas(size, phase);

    // Absent until the loader succeeds
    if let Some(field) = app.backdrop.field() {
        f.render_widget(ParticleCanvas::new(field), areas.main);
    }

    match phase {
        Phase::Disconnected => draw_onboarding(f, areas.card, app),
        Phase::Connected => draw_main_card(f, areas.card, app),
    }

    draw_status_line(f, areas.status_line, app);
    draw_command_line(f, areas.command_line, app);

    if app.help_open {
        draw_help_popup(f, areas.size, app);
    }
}

fn card_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::LightCyan))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(CARD_BG))
}

fn draw_onboarding(f: &mut Frame, area: Rect, app: &App) {
    f.render_widget(Clear, area);
    let block = card_block("Welcome to KeywordChain");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.height < 2 {
        return;
    }
    let intro = Paragraph::new(Text::from(vec![
        Line::from(""),
        Line::from("Connect your wallet to read and extend the keyword chain."),
        Line::from(""),
    ]))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    let intro_height = 3.min(inner.height);
    let intro_area = Rect {
        height: intro_height,
        ..inner
    };
    let wallet_area = Rect {
        y: inner.y + intro_height,
        height: inner.height - intro_height,
        ..inner
    };
    f.render_widget(intro, intro_area);
    app.wallet.render(f, wallet_area, &app.ctx);
}

fn draw_main_card(f: &mut Frame, area: Rect, app: &App) {
    f.render_widget(Clear, area);
    let block = card_block("KeywordChain");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = layout::card_areas(inner);
    app.wallet.render(f, rows.wallet, &app.ctx);
    app.reader.render(f, rows.reader, &app.ctx);
    app.writer.render(f, rows.writer, &app.ctx);
    app.chain.render(f, rows.chain, &app.ctx);

    let footer = Paragraph::new(Span::styled(FOOTER, Style::default().fg(Color::DarkGray)))
        .alignment(Alignment::Center);
    f.render_widget(footer, rows.footer);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![Span::styled("Wallet ", dim)];
    match (&app.ctx.session.provider, app.ctx.session.account) {
        (Some(provider), Some(_)) => {
            spans.push(Span::styled("connected", Style::default().fg(Color::LightGreen)));
            spans.push(Span::styled("  Chain ", dim));
            spans.push(Span::raw(provider.chain_id.to_string()));
            spans.push(Span::styled("  Contract ", dim));
            spans.push(Span::raw(crate::config::short_addr(
                &provider.contract.to_string(),
            )));
        }
        _ if app.wallet.is_connecting() => {
            spans.push(Span::styled("connecting", Style::default().fg(Color::LightYellow)));
        }
        _ => spans.push(Span::styled("disconnected", Style::default().fg(Color::Gray))),
    }
    if let Some(endpoint) = app.ctx.selected_endpoint() {
        spans.push(Span::styled("  Endpoint ", dim));
        spans.push(Span::raw(endpoint.to_string()));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left);
    f.render_widget(paragraph, area);
}

fn command_hint(input: &str) -> Option<&'static str> {
    let cmd = input.split_whitespace().next()?.to_lowercase();
    let hint = match cmd.as_str() {
        "connect" | "conn" => "connect [endpoint index]",
        "disconnect" | "dc" => "drop provider and account",
        "account" | "acct" => "account <index|address>",
        "read" | "last" => "read the latest phrase",
        "add" | "phrase" => "add <phrase>",
        "refresh" | "reload" => "refetch the message chain",
        "export" | "exp" => "export [csv|json]",
        "copy" | "yank" => "copy [text], defaults to the account",
        "help" | "?" => "toggle help",
        "quit" | "q" | "exit" => "quit",
        _ => return None,
    };
    Some(hint)
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App) {
    let dim = Style::default().fg(Color::DarkGray);
    let content = if app.input_mode == InputMode::Command {
        let hint = command_hint(&app.command.input)
            .unwrap_or("connect | read | add | refresh | export | help | quit");
        Line::from(vec![
            Span::styled(": ", Style::default().fg(Color::Yellow)),
            Span::raw(app.command.input.as_str()),
            Span::styled(format!("  {}", hint), dim),
        ])
    } else if app.writer.is_editing() {
        Line::from(vec![
            Span::styled("> phrase ", Style::default().fg(Color::LightCyan)),
            Span::raw(app.writer.input()),
            Span::styled("  (Enter=send Esc=cancel)", dim),
        ])
    } else if let Some((text, level)) = app.status_text() {
        let color = match level {
            StatusLevel::Info => Color::LightGreen,
            StatusLevel::Warn => Color::LightYellow,
            StatusLevel::Error => Color::LightRed,
        };
        Line::from(vec![
            Span::styled("msg: ", dim),
            Span::styled(text, Style::default().fg(color)),
        ])
    } else {
        action_hints(app)
    };

    let paragraph = Paragraph::new(content).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}

fn action_hints(app: &App) -> Line<'static> {
    let hints: &[(&str, &str)] = match app.ctx.phase() {
        Phase::Disconnected => &[("c", "connect"), (":", "command"), ("?", "help"), ("q", "quit")],
        Phase::Connected => &[
            ("r", "read"),
            ("a", "add"),
            ("j/k", "scroll"),
            ("R", "refresh"),
            ("e/E", "export"),
            ("n", "account"),
            ("d", "disconnect"),
            ("?", "help"),
        ],
    };

    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(
            key.to_string(),
            Style::default().fg(Color::LightCyan),
        ));
        spans.push(Span::styled(
            format!(" {label}  "),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn draw_help_popup(f: &mut Frame, area: Rect, app: &App) {
    let popup_area = layout::centered_rect(64, 70, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from("Wallet"),
        Line::from("  c          Connect"),
        Line::from("  d          Disconnect"),
        Line::from("  n          Next account"),
        Line::from("  y          Copy account"),
        Line::from(""),
        Line::from("Phrases"),
        Line::from("  r          Read latest phrase"),
        Line::from("  a          Add a phrase (Enter=send Esc=cancel)"),
        Line::from(""),
        Line::from("Message chain"),
        Line::from("  j / k      Scroll"),
        Line::from("  R          Refetch"),
        Line::from("  e / E      Export CSV / JSON"),
        Line::from(""),
        Line::from("  :          Command bar"),
        Line::from("  ?          Toggle help"),
        Line::from("  q          Quit"),
        Line::from(""),
        Line::from(format!(
            "Endpoint: {}",
            app.ctx.selected_endpoint().unwrap_or("--")
        )),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Address;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::core::ProviderHandle;
    use crate::domain::{FieldBounds, ParticleField, ParticleOptions};
    use crate::infrastructure::runtime::RuntimeEvent;
    use crate::modules::Backdrop;

    fn app() -> App {
        App::new(
            vec!["http://localhost:8545".to_string()],
            50,
            std::env::temp_dir().join("keywordchain-ui-tests"),
        )
    }

    fn connect(app: &mut App) {
        app.apply_runtime_event(RuntimeEvent::ProviderUpdated(Some(ProviderHandle {
            session: 1,
            endpoint: "http://localhost:8545".to_string(),
            chain_id: 31337,
            contract: Address::repeat_byte(0x11),
        })));
        app.apply_runtime_event(RuntimeEvent::AccountsAvailable(vec![Address::repeat_byte(
            0xaa,
        )]));
        app.apply_runtime_event(RuntimeEvent::AccountUpdated(Some(Address::repeat_byte(
            0xaa,
        ))));
    }

    fn render(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }

    fn ready_backdrop() -> Backdrop {
        let field =
            ParticleField::load(ParticleOptions::default(), FieldBounds::from_cells(100, 28))
                .unwrap();
        Backdrop::Ready(field)
    }

    #[test]
    fn test_onboarding_when_disconnected() {
        let screen = render(&app());
        assert!(screen.contains("Welcome to KeywordChain"));
        assert!(screen.contains("Connect Wallet"));
        assert!(!screen.contains("Last Keyword"));
    }

    #[test]
    fn test_main_card_when_connected() {
        let mut app = app();
        connect(&mut app);
        app.apply_runtime_event(RuntimeEvent::LastPhraseFetched {
            phrase: "hello".to_string(),
        });
        let screen = render(&app);
        assert!(!screen.contains("Welcome to KeywordChain"));
        assert!(screen.contains("Last Keyword: hello"));
        assert!(screen.contains("Added Phrase:"));
        assert!(screen.contains("Message Chain"));
        assert!(screen.contains("© 2025 KeywordChain"));
    }

    #[test]
    fn test_provider_loss_returns_to_onboarding() {
        let mut app = app();
        connect(&mut app);
        app.apply_runtime_event(RuntimeEvent::ProviderUpdated(None));
        let screen = render(&app);
        assert!(screen.contains("Welcome to KeywordChain"));
        assert!(!screen.contains("Last Keyword"));
    }

    #[test]
    fn test_backdrop_states_do_not_block_cards() {
        for backdrop in [
            Backdrop::Pending,
            Backdrop::Failed("invalid color".to_string()),
            ready_backdrop(),
        ] {
            let mut disconnected = app();
            disconnected.backdrop = backdrop.clone();
            assert!(render(&disconnected).contains("Welcome to KeywordChain"));

            let mut connected = app();
            connect(&mut connected);
            connected.backdrop = backdrop;
            assert!(render(&connected).contains("Last Keyword"));
        }
    }

    #[test]
    fn test_help_popup() {
        let mut app = app();
        app.help_open = true;
        assert!(render(&app).contains("Read latest phrase"));
    }
}
