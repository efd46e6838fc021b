//! Palette and semantic styles.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks and page headers.
pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Border of a field whose last validation failed.
pub fn border_error() -> Style {
    Style::default().fg(ERROR_RED)
}

pub fn error_text() -> Style {
    Style::default().fg(ERROR_RED)
}

pub fn body_text() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn input_text() -> Style {
    Style::default().fg(NEON_CYAN)
}

pub fn placeholder_text() -> Style {
    Style::default().fg(BORDER_GRAY).add_modifier(Modifier::ITALIC)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(NEON_CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// A button or link with focus.
pub fn button_focused() -> Style {
    Style::default()
        .fg(BG_DARK)
        .bg(ELECTRIC_PURPLE)
        .add_modifier(Modifier::BOLD)
}

pub fn button_default() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

pub fn toggle_on() -> Style {
    Style::default().fg(SUCCESS_GREEN)
}

pub fn toggle_off() -> Style {
    Style::default().fg(CORAL)
}

/// Key hint text (e.g., "Tab next  Ctrl+Q quit").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}
