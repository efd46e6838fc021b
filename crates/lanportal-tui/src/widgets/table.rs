//! Data table with its search box.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::Span,
    widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState},
};

use lanportal_core::DataTable;

use super::form::{INPUT_HEIGHT, render_input};
use crate::theme;

fn cell(cell: lanportal_core::Cell) -> Cell<'static> {
    match cell {
        lanportal_core::Cell::Text(text) => Cell::from(text),
        lanportal_core::Cell::Toggle { checked, disabled } => {
            let (mark, style) = if checked {
                ("\u{25CF} oui", theme::toggle_on())
            } else {
                ("\u{25CB} non", theme::toggle_off())
            };
            let style = if disabled { theme::body_text() } else { style };
            Cell::from(Span::styled(mark, style))
        }
    }
}

/// Search box on top, shown rows below. `row` is highlighted while the
/// table has focus.
pub fn render_table(frame: &mut Frame, area: Rect, table: &DataTable, row: usize, active: bool) {
    let [search_area, table_area] =
        Layout::vertical([Constraint::Length(INPUT_HEIGHT), Constraint::Fill(1)]).areas(area);

    render_input(frame, search_area, &table.search_input(), active);

    let headers = table.headers();
    let widths = vec![Constraint::Fill(1); headers.len()];
    let header = Row::new(headers.into_iter().map(Cell::from)).style(theme::table_header());

    let cells = table.cells();
    let shown = cells.len();
    let rows: Vec<Row> = cells
        .into_iter()
        .map(|cells| Row::new(cells.into_iter().map(cell)).style(theme::table_row()))
        .collect();

    let title = format!(" {} ({shown}/{}) ", table.title(), table.rows().len());
    let block = Block::default()
        .title(Span::styled(title, theme::title_style()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if active {
            theme::border_focused()
        } else {
            theme::border_default()
        });

    let widget = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(theme::table_selected());

    let selected = (active && shown > 0).then(|| row.min(shown - 1));
    let mut state = TableState::default().with_selected(selected);
    frame.render_stateful_widget(widget, table_area, &mut state);
}
