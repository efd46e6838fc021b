//! Ratatui renderings of the headless core widgets.

pub mod form;
pub mod table;

/// What has keyboard focus on the current page.
#[derive(Debug, Clone, Copy, Default)]
pub struct Focus<'a> {
    /// Registry id of the focused widget.
    pub id: Option<&'a str>,
    /// Selected row when the focused widget is a table.
    pub row: usize,
}

impl Focus<'_> {
    pub fn is(&self, id: &str) -> bool {
        self.id == Some(id)
    }
}
