//! Text inputs, checkboxes, and buttons, stacked into simple forms.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use lanportal_core::{Button, Checkbox, Component, InputKind, Registry, TextInput};

use super::Focus;
use crate::theme;

/// Rows taken by a bordered text input.
pub const INPUT_HEIGHT: u16 = 3;

/// A bordered single-line input. The placeholder doubles as the label and
/// the last validation error sits on the bottom border.
pub fn render_input(frame: &mut Frame, area: Rect, input: &TextInput, active: bool) {
    let value = input.value();
    let display = if input.kind() == InputKind::Password {
        "\u{25CF}".repeat(value.chars().count())
    } else {
        value
    };

    let error = input.error();
    let border = match (&error, active) {
        (Some(_), _) => theme::border_error(),
        (None, true) => theme::border_focused(),
        (None, false) => theme::border_default(),
    };
    let label_style = if active {
        theme::title_style()
    } else {
        theme::body_text()
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .title(Span::styled(format!(" {} ", input.placeholder()), label_style));
    if let Some(error) = error {
        block = block.title_bottom(Span::styled(format!(" {error} "), theme::error_text()));
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = if active {
        Line::from(vec![
            Span::styled(display, theme::input_text()),
            Span::styled("\u{2588}", theme::input_text()),
        ])
    } else if display.is_empty() {
        Line::from(Span::styled(
            input.placeholder().to_owned(),
            theme::placeholder_text(),
        ))
    } else {
        Line::from(Span::styled(display, theme::input_text()))
    };
    frame.render_widget(Paragraph::new(line), inner);
}

pub fn render_checkbox(frame: &mut Frame, area: Rect, checkbox: &Checkbox, active: bool) {
    let mark = if checkbox.checked() { "[x]" } else { "[ ]" };
    let mark_style = if checkbox.has_error() {
        theme::error_text()
    } else if checkbox.disabled() {
        theme::placeholder_text()
    } else if active {
        theme::button_focused()
    } else {
        theme::button_default()
    };
    let label_style = if checkbox.has_error() {
        theme::error_text()
    } else {
        theme::body_text()
    };

    let line = Line::from(vec![
        Span::styled(mark, mark_style),
        Span::raw(" "),
        Span::styled(checkbox.label().to_owned(), label_style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Buttons and router links alike.
pub fn render_button(frame: &mut Frame, area: Rect, button: &Button, active: bool) {
    let style = if active {
        theme::button_focused()
    } else {
        theme::button_default()
    };
    let line = Line::from(Span::styled(format!("[ {} ]", button.label()), style));
    frame.render_widget(Paragraph::new(line), area);
}

fn height(component: &Component) -> Constraint {
    match component {
        Component::TextInput(_) => Constraint::Length(INPUT_HEIGHT),
        Component::Table(_) => Constraint::Fill(1),
        Component::Checkbox(_) | Component::Button(_) => Constraint::Length(1),
    }
}

/// Lay out the widgets bound to `ids` top to bottom. Unbound ids are
/// skipped.
pub fn render_stack(
    frame: &mut Frame,
    area: Rect,
    registry: &Registry<Component>,
    ids: &[&str],
    focus: Focus<'_>,
) {
    let bound: Vec<(&str, Component)> = ids
        .iter()
        .filter_map(|id| registry.get(id).map(|c| (*id, c)))
        .collect();

    let areas = Layout::vertical(bound.iter().map(|(_, c)| height(c))).split(area);

    for ((id, component), rect) in bound.iter().zip(areas.iter()) {
        let active = focus.is(id);
        match component {
            Component::TextInput(input) => render_input(frame, *rect, input, active),
            Component::Checkbox(checkbox) => render_checkbox(frame, *rect, checkbox, active),
            Component::Button(button) => render_button(frame, *rect, button, active),
            Component::Table(table) => {
                super::table::render_table(frame, *rect, table, focus.row, active);
            }
        }
    }
}
