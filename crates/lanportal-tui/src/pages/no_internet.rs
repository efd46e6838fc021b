//! Shown to a logged-in user who is not online yet.

use std::cell::RefCell;
use std::rc::Rc;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use tracing::info;

use lanportal_core::{Button, CoreError};

use super::{Page, centered};
use crate::action::Action;
use crate::context::Context;
use crate::theme;
use crate::widgets::{Focus, form};

pub const REFRESH: &str = "ni-refresh";
pub const LOGOUT: &str = "ni-logout";

const FOCUS: [&str; 2] = [REFRESH, LOGOUT];

const NOT_ALLOWED: &str = "Votre compte n'a pas encore été autorisé par un administrateur.";
const ENROLLED: &str = "Appareil enregistré, réessayez dans un instant.";

pub fn controller(ctx: &Context) {
    ctx.bind_button(REFRESH, &Action::RetryInternet);
    ctx.bind_button(LOGOUT, &Action::Logout);
}

#[derive(Debug, Default)]
pub struct NoInternetPage {
    notice: RefCell<Option<&'static str>>,
}

impl NoInternetPage {
    pub fn build(ctx: &Context) -> Rc<Self> {
        ctx.mount_button(REFRESH, Button::new("Réessayer"));
        ctx.mount_button(LOGOUT, Button::new("Se déconnecter"));
        Rc::new(Self::default())
    }

    pub fn notice(&self) -> Option<&'static str> {
        *self.notice.borrow()
    }

    /// Enroll this machine when the user is allowed but some device is
    /// still offline, or go home when every device is online.
    pub async fn retry(&self, ctx: &Context) -> Result<(), CoreError> {
        let Some(creds) = ctx.portal.credentials() else {
            ctx.send(Action::navigate("/login"));
            return Ok(());
        };

        let user = ctx.portal.get_user(creds.user_id).await?;
        if !user.is_allowed {
            *self.notice.borrow_mut() = Some(NOT_ALLOWED);
            return Ok(());
        }

        let devices = ctx.portal.get_user_devices(creds.user_id).await?;
        if devices.is_empty() || devices.iter().any(|d| !d.internet) {
            ctx.portal.add_device().await?;
            info!(user_id = %creds.user_id, "device enrolled from retry");
            *self.notice.borrow_mut() = Some(ENROLLED);
        } else {
            ctx.send(Action::navigate("/"));
        }
        Ok(())
    }
}

impl Page for NoInternetPage {
    fn focus_order(&self, _ctx: &Context) -> Vec<&'static str> {
        FOCUS.to_vec()
    }

    fn render(&self, ctx: &Context, frame: &mut Frame, area: Rect, focus: Focus<'_>) {
        let area = centered(area, 56);
        let [text_area, buttons_area] =
            Layout::vertical([Constraint::Length(5), Constraint::Fill(1)]).areas(area);

        let mut lines = vec![
            Line::from(Span::styled(
                "Vous n'avez pas encore accès à internet.",
                theme::title_style(),
            )),
            Line::from(""),
        ];
        if let Some(notice) = self.notice() {
            lines.push(Line::from(Span::styled(notice, theme::body_text())));
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), text_area);

        form::render_stack(frame, buttons_area, &ctx.registry, &FOCUS, focus);
    }
}
