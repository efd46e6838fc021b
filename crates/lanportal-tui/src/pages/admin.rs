//! User administration: every account in a searchable table, with internet
//! access toggled per row.

use std::rc::Rc;

use ratatui::{Frame, layout::Rect};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use lanportal_core::{Button, Column, CoreError, DataTable, Row, UserView};

use super::Page;
use crate::action::Action;
use crate::context::Context;
use crate::widgets::{Focus, form};

pub const TABLE: &str = "users-table";
pub const TO_HOME: &str = "admin-to-home";

const KEY: &str = "id";
const ALLOWED: &str = "is_allowed";

const FOCUS: [&str; 2] = [TABLE, TO_HOME];

pub fn controller(ctx: &Context) {
    ctx.bind_button(TO_HOME, &Action::navigate("/"));

    let dispatcher = ctx.dispatcher();
    ctx.registry.subscribe(TABLE, move |component| {
        let Some(table) = component.as_table() else {
            return;
        };
        let on_toggle = dispatcher.clone();
        table.set_columns([
            (KEY, Column::text("Id")),
            ("username", Column::text("Nom d'utilisateur")),
            ("firstname", Column::text("Prénom")),
            ("lastname", Column::text("Nom")),
            ("email", Column::text("Email")),
            ("phone", Column::text("Téléphone")),
            ("role", Column::text("Role")),
            (
                ALLOWED,
                Column::toggle("Internet ?")
                    .on_edit(move |row| on_toggle.send(Action::ToggleAllowed(row.clone()))),
            ),
        ]);
        dispatcher.send(Action::LoadUsers);
    });
}

#[derive(Debug)]
pub struct AdminPage;

impl AdminPage {
    pub fn build(ctx: &Context) -> Rc<Self> {
        DataTable::new("Utilisateurs").mount(&ctx.registry, TABLE);
        ctx.mount_button(TO_HOME, Button::new("Retour à l'accueil"));
        Rc::new(Self)
    }
}

impl Page for AdminPage {
    fn focus_order(&self, _ctx: &Context) -> Vec<&'static str> {
        FOCUS.to_vec()
    }

    fn render(&self, ctx: &Context, frame: &mut Frame, area: Rect, focus: Focus<'_>) {
        form::render_stack(frame, area, &ctx.registry, &FOCUS, focus);
    }
}

fn to_row(user: &UserView) -> Option<Row> {
    match serde_json::to_value(user) {
        Ok(Value::Object(row)) => Some(row),
        Ok(_) => None,
        Err(e) => {
            warn!(error = %e, "cannot tabulate user");
            None
        }
    }
}

/// Replace the table's data with the current user list.
pub async fn load_users(ctx: &Context) -> Result<(), CoreError> {
    let users = ctx.portal.get_users().await?;
    if let Some(table) = ctx.table(TABLE) {
        table.set_rows(users.iter().filter_map(to_row).collect(), true);
    }
    Ok(())
}

/// Flip internet access for the user in `row` and, once the backend
/// agrees, merge the new flag back into the table.
pub async fn toggle_allowed(ctx: &Context, row: &Row) -> Result<(), CoreError> {
    let Some(key) = row.get(KEY) else {
        return Ok(());
    };
    let Some(id) = key.as_str().and_then(|s| Uuid::parse_str(s).ok()) else {
        warn!(id = %key, "row without a usable user id");
        return Ok(());
    };
    let allowed = !row.get(ALLOWED).and_then(Value::as_bool).unwrap_or(false);

    ctx.portal.set_allowed(id, allowed).await?;
    info!(%id, allowed, "internet access updated");

    if let Some(table) = ctx.table(TABLE) {
        let mut patched = Row::new();
        patched.insert(KEY.to_owned(), key.clone());
        patched.insert(ALLOWED.to_owned(), Value::Bool(allowed));
        table.update_row(KEY, &patched);
    }
    Ok(())
}
