use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::core::Phase;

#[derive(Debug, Clone, Copy)]
pub struct UiAreas {
    pub size: Rect,
    pub main: Rect,
    pub card: Rect,
    pub status_line: Rect,
    pub command_line: Rect,
}

/// Rows inside the connected card
#[derive(Debug, Clone, Copy)]
pub struct CardAreas {
    pub wallet: Rect,
    pub reader: Rect,
    pub writer: Rect,
    pub chain: Rect,
    pub footer: Rect,
}

const ONBOARDING_WIDTH: u16 = 64;
const ONBOARDING_HEIGHT: u16 = 10;
const CARD_MAX_WIDTH: u16 = 110;

pub fn areas(size: Rect, phase: Phase) -> UiAreas {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(size);

    let main = vertical[0];
    let card = match phase {
        Phase::Disconnected => fixed_center(ONBOARDING_WIDTH, ONBOARDING_HEIGHT, main),
        Phase::Connected => {
            let width = main.width.saturating_sub(4).min(CARD_MAX_WIDTH);
            let height = main.height.saturating_sub(2);
            fixed_center(width, height, main)
        }
    };

    UiAreas {
        size,
        main,
        card,
        status_line: vertical[1],
        command_line: vertical[2],
    }
}

/// Split the inner area of the connected card
pub fn card_areas(inner: Rect) -> CardAreas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);

    CardAreas {
        wallet: rows[0],
        reader: rows[2],
        writer: rows[4],
        chain: rows[5],
        footer: rows[6],
    }
}

/// Center a `width` x `height` box inside `r`, shrinking to fit
pub fn fixed_center(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
