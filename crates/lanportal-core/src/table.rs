//! Generic data table: column metadata, substring search, merge-back edits.
//!
//! The table keeps two row sets. The canonical rows are the data the owner
//! handed over; the rendered rows are what is currently shown, which is the
//! canonical set narrowed by the active search query. Filtering never
//! discards canonical data.
//!
//! Editable toggle columns call back into the owner when activated. The
//! owner talks to the backend and, once the change is confirmed, merges the
//! new values back with [`DataTable::update_row`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::registry::Registry;
use crate::widget::{Component, InputKind, TextInput};

/// An opaque record; column keys index into it.
pub type Row = serde_json::Map<String, Value>;

type EditHandler = Rc<dyn Fn(&Row)>;

const SEARCH_PLACEHOLDER: &str = "Recherche";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// The value is shown as text.
    Text,
    /// The value is a boolean shown as a checkbox.
    Toggle,
}

/// Display and behavior of one column.
#[derive(Clone)]
pub struct Column {
    pub label: String,
    pub editable: bool,
    pub searchable: bool,
    pub kind: ColumnKind,
    on_edit: Option<EditHandler>,
}

impl Column {
    /// A searchable, read-only text column.
    pub fn text(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            editable: false,
            searchable: true,
            kind: ColumnKind::Text,
            on_edit: None,
        }
    }

    /// A read-only toggle column, excluded from search.
    pub fn toggle(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            editable: false,
            searchable: false,
            kind: ColumnKind::Toggle,
            on_edit: None,
        }
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Make the column editable; `handler` receives the activated row.
    pub fn on_edit(mut self, handler: impl Fn(&Row) + 'static) -> Self {
        self.editable = true;
        self.on_edit = Some(Rc::new(handler));
        self
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("label", &self.label)
            .field("editable", &self.editable)
            .field("searchable", &self.searchable)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// A rendered cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Toggle { checked: bool, disabled: bool },
}

// ── Table ───────────────────────────────────────────────────────────

pub struct DataTable {
    title: String,
    search: Rc<TextInput>,
    columns: RefCell<IndexMap<String, Column>>,
    rows: RefCell<Vec<Row>>,
    rendered: RefCell<Vec<Row>>,
    query: RefCell<String>,
}

impl DataTable {
    /// Create a table whose search box filters it as the user types.
    pub fn new(title: impl Into<String>) -> Rc<Self> {
        let title = title.into();
        Rc::new_cyclic(|weak: &std::rc::Weak<Self>| {
            let search = Rc::new(TextInput::new(InputKind::Text, SEARCH_PLACEHOLDER));
            let table = weak.clone();
            search.set_on_input(move |query| {
                if let Some(table) = table.upgrade() {
                    table.search(query);
                }
            });
            Self {
                title,
                search,
                columns: RefCell::new(IndexMap::new()),
                rows: RefCell::new(Vec::new()),
                rendered: RefCell::new(Vec::new()),
                query: RefCell::new(String::new()),
            }
        })
    }

    /// Register this table under `id`.
    pub fn mount(self: &Rc<Self>, registry: &Registry<Component>, id: &str) {
        registry.register(id, Component::Table(Rc::clone(self)));
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn search_input(&self) -> Rc<TextInput> {
        Rc::clone(&self.search)
    }

    /// Replace the column set. Insertion order is display order.
    pub fn set_columns<K: Into<String>>(&self, columns: impl IntoIterator<Item = (K, Column)>) {
        let columns: IndexMap<String, Column> =
            columns.into_iter().map(|(k, c)| (k.into(), c)).collect();
        *self.columns.borrow_mut() = columns;
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns
            .borrow()
            .values()
            .map(|c| c.label.clone())
            .collect()
    }

    pub fn keys(&self) -> Vec<String> {
        self.columns.borrow().keys().cloned().collect()
    }

    /// Show `rows`. With `replace_canonical` they become the table's data
    /// and are shown through the active query; otherwise exactly `rows` are
    /// shown and the data is left alone.
    pub fn set_rows(&self, rows: Vec<Row>, replace_canonical: bool) {
        if replace_canonical {
            debug!(table = %self.title, rows = rows.len(), "table data replaced");
            *self.rows.borrow_mut() = rows;
            self.refilter();
        } else {
            *self.rendered.borrow_mut() = rows;
        }
    }

    /// Merge `patched` into the first canonical row whose `key` value equals
    /// `patched[key]`. Returns `false` when no row matches.
    ///
    /// The active query is applied again afterwards, so an edited row shows
    /// up or drops out of a filtered view right away.
    pub fn update_row(&self, key: &str, patched: &Row) -> bool {
        let Some(wanted) = patched.get(key) else {
            return false;
        };
        let updated = {
            let mut rows = self.rows.borrow_mut();
            match rows.iter_mut().find(|row| row.get(key) == Some(wanted)) {
                Some(row) => {
                    for (field, value) in patched {
                        row.insert(field.clone(), value.clone());
                    }
                    true
                }
                None => false,
            }
        };
        if updated {
            self.refilter();
        }
        updated
    }

    /// Narrow the shown rows to those where any searchable column contains
    /// `query`, ignoring case. An empty query shows every row.
    pub fn search(&self, query: &str) {
        query.clone_into(&mut self.query.borrow_mut());
        self.refilter();
    }

    fn refilter(&self) {
        let query = self.query.borrow().to_lowercase();
        let rows = self.rows.borrow();
        let shown: Vec<Row> = if query.is_empty() {
            rows.clone()
        } else {
            let columns = self.columns.borrow();
            let searchable: Vec<&str> = columns
                .iter()
                .filter(|(_, c)| c.searchable)
                .map(|(k, _)| k.as_str())
                .collect();
            rows.iter()
                .filter(|row| {
                    searchable
                        .iter()
                        .any(|key| text(row.get(*key)).to_lowercase().contains(&query))
                })
                .cloned()
                .collect()
        };
        *self.rendered.borrow_mut() = shown;
    }

    pub fn query(&self) -> String {
        self.query.borrow().clone()
    }

    /// The canonical rows.
    pub fn rows(&self) -> Vec<Row> {
        self.rows.borrow().clone()
    }

    /// The rows currently shown.
    pub fn rendered_rows(&self) -> Vec<Row> {
        self.rendered.borrow().clone()
    }

    /// Shown rows × columns, in display order.
    pub fn cells(&self) -> Vec<Vec<Cell>> {
        let columns = self.columns.borrow();
        self.rendered
            .borrow()
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|(key, column)| match column.kind {
                        ColumnKind::Text => Cell::Text(text(row.get(key))),
                        ColumnKind::Toggle => Cell::Toggle {
                            checked: row.get(key).and_then(Value::as_bool).unwrap_or(false),
                            disabled: !column.editable,
                        },
                    })
                    .collect()
            })
            .collect()
    }

    /// Activate the cell at shown row `row` and column `key`.
    ///
    /// Only editable toggles react; their handler gets a copy of the row.
    /// Returns whether a handler ran.
    pub fn activate(&self, row: usize, key: &str) -> bool {
        let handler = {
            let columns = self.columns.borrow();
            match columns.get(key) {
                Some(c) if c.kind == ColumnKind::Toggle && c.editable => c.on_edit.clone(),
                _ => None,
            }
        };
        let Some(handler) = handler else {
            return false;
        };
        let Some(row) = self.rendered.borrow().get(row).cloned() else {
            return false;
        };
        handler(&row);
        true
    }
}

impl fmt::Debug for DataTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable")
            .field("title", &self.title)
            .field("columns", &self.columns.borrow().len())
            .field("rows", &self.rows.borrow().len())
            .field("rendered", &self.rendered.borrow().len())
            .field("query", &self.query.borrow())
            .finish()
    }
}

/// Text shown for a cell value. Strings are shown bare, missing values as
/// nothing.
fn text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell as StdCell;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::validation::NoFields;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn people() -> Rc<DataTable> {
        let table = DataTable::new("Utilisateurs");
        table.set_columns([
            ("id", Column::text("Id").searchable(false)),
            ("name", Column::text("Nom")),
        ]);
        table.set_rows(
            vec![
                row(json!({"id": "1", "name": "Ana"})),
                row(json!({"id": "2", "name": "Bob"})),
            ],
            true,
        );
        table
    }

    #[test]
    fn search_narrows_and_empty_query_restores() {
        let table = people();

        table.search("an");
        assert_eq!(table.rendered_rows(), vec![row(json!({"id": "1", "name": "Ana"}))]);

        table.search("");
        assert_eq!(table.rendered_rows(), table.rows());
        assert_eq!(table.rendered_rows().len(), 2);
        assert_eq!(table.rendered_rows()[1]["name"], "Bob");
    }

    #[test]
    fn search_is_case_insensitive_and_skips_unsearchable_columns() {
        let table = people();

        table.search("ANA");
        assert_eq!(table.rendered_rows().len(), 1);

        // "2" only appears in the unsearchable id column.
        table.search("2");
        assert!(table.rendered_rows().is_empty());
        assert_eq!(table.rows().len(), 2);
    }

    #[test]
    fn search_folds_non_ascii_case() {
        let table = DataTable::new("t");
        table.set_columns([("name", Column::text("Nom"))]);
        table.set_rows(vec![row(json!({"name": "ÉLODIE"}))], true);

        table.search("élo");
        assert_eq!(table.rendered_rows().len(), 1);
    }

    #[test]
    fn typing_in_search_box_filters() {
        let table = people();
        let input = table.search_input();
        assert_eq!(input.placeholder(), "Recherche");

        input.push_char('b', &NoFields);
        assert_eq!(table.query(), "b");
        assert_eq!(table.rendered_rows().len(), 1);

        input.pop_char(&NoFields);
        assert_eq!(table.rendered_rows().len(), 2);
    }

    #[test]
    fn update_row_touches_only_the_matching_row() {
        let table = DataTable::new("t");
        table.set_columns([("id", Column::text("Id")), ("is_allowed", Column::toggle("Internet ?"))]);
        table.set_rows(
            vec![
                row(json!({"id": "41", "is_allowed": false, "name": "a"})),
                row(json!({"id": "42", "is_allowed": false, "name": "b"})),
                row(json!({"id": "43", "is_allowed": false, "name": "c"})),
            ],
            true,
        );
        let before = table.rows();

        assert!(table.update_row("id", &row(json!({"id": "42", "is_allowed": true}))));

        let after = table.rows();
        assert_eq!(after[0], before[0]);
        assert_eq!(after[2], before[2]);
        assert_eq!(after[1], row(json!({"id": "42", "is_allowed": true, "name": "b"})));
    }

    #[test]
    fn update_row_without_match_is_noop() {
        let table = people();
        let before = table.rows();
        assert!(!table.update_row("id", &row(json!({"id": "9", "name": "Zoé"}))));
        assert!(!table.update_row("id", &row(json!({"name": "no key"}))));
        assert_eq!(table.rows(), before);
    }

    #[test]
    fn update_row_reapplies_active_query() {
        let table = people();
        table.search("bob");
        assert_eq!(table.rendered_rows().len(), 1);

        table.update_row("id", &row(json!({"id": "2", "name": "Carl"})));
        assert!(table.rendered_rows().is_empty());

        table.update_row("id", &row(json!({"id": "1", "name": "Bobby"})));
        assert_eq!(table.rendered_rows()[0]["id"], "1");
    }

    #[test]
    fn set_rows_without_replace_keeps_canonical() {
        let table = people();
        table.set_rows(vec![row(json!({"id": "3", "name": "Eve"}))], false);
        assert_eq!(table.rendered_rows().len(), 1);
        assert_eq!(table.rows().len(), 2);
    }

    #[test]
    fn cells_follow_column_kinds() {
        let table = DataTable::new("t");
        table.set_columns([
            ("name", Column::text("Nom")),
            ("n", Column::text("N")),
            ("ro", Column::toggle("RO")),
            ("rw", Column::toggle("RW").on_edit(|_| {})),
        ]);
        table.set_rows(vec![row(json!({"name": "Ana", "n": 3, "ro": true, "rw": false}))], true);

        assert_eq!(table.headers(), vec!["Nom", "N", "RO", "RW"]);
        assert_eq!(
            table.cells(),
            vec![vec![
                Cell::Text("Ana".into()),
                Cell::Text("3".into()),
                Cell::Toggle { checked: true, disabled: true },
                Cell::Toggle { checked: false, disabled: false },
            ]]
        );
    }

    #[test]
    fn activate_runs_edit_handler_for_editable_toggles_only() {
        let edited = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&edited);
        let table = DataTable::new("t");
        table.set_columns([
            ("id", Column::text("Id")),
            ("ro", Column::toggle("RO")),
            (
                "rw",
                Column::toggle("RW").on_edit(move |r: &Row| sink.borrow_mut().push(r["id"].clone())),
            ),
        ]);
        table.set_rows(
            vec![
                row(json!({"id": "1", "ro": true, "rw": false})),
                row(json!({"id": "2", "ro": true, "rw": true})),
            ],
            true,
        );

        assert!(table.activate(1, "rw"));
        assert!(!table.activate(1, "ro"));
        assert!(!table.activate(0, "id"));
        assert!(!table.activate(5, "rw"));
        assert_eq!(*edited.borrow(), vec![json!("2")]);
    }

    #[test]
    fn edit_handler_may_update_the_table() {
        let table = DataTable::new("t");
        let calls = Rc::new(StdCell::new(0));
        let weak = Rc::downgrade(&table);
        let seen = Rc::clone(&calls);
        table.set_columns([(
            "on",
            Column::toggle("On").on_edit(move |r: &Row| {
                seen.set(seen.get() + 1);
                let mut patched = r.clone();
                patched.insert("on".into(), json!(!r["on"].as_bool().unwrap()));
                weak.upgrade().unwrap().update_row("id", &patched);
            }),
        )]);
        table.set_rows(vec![row(json!({"id": 7, "on": false}))], true);

        table.activate(0, "on");

        assert_eq!(calls.get(), 1);
        assert_eq!(table.rows()[0]["on"], true);
    }

    #[test]
    fn mount_registers_table() {
        let registry = Registry::new();
        let table = people();
        table.mount(&registry, "users-table");
        let mounted = registry.get("users-table").unwrap().as_table().unwrap();
        assert!(Rc::ptr_eq(&mounted, &table));
    }
}
