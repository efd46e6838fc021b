//! Landing page: works out whether the user is online and either welcomes
//! them or sends them where they need to go.

use std::cell::RefCell;
use std::rc::Rc;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use lanportal_core::{Button, CoreError};

use super::{Page, centered};
use crate::action::Action;
use crate::context::Context;
use crate::theme;
use crate::widgets::{Focus, form};

pub const LOGOUT: &str = "home-logout";
pub const TO_ADMIN: &str = "home-to-admin";

pub fn controller(ctx: &Context) {
    ctx.bind_button(LOGOUT, &Action::Logout);
    ctx.bind_button(TO_ADMIN, &Action::navigate("/admin"));
}

#[derive(Debug, Default)]
pub struct HomePage {
    /// First name of the user, once confirmed online.
    firstname: RefCell<Option<String>>,
}

impl HomePage {
    pub fn build(ctx: &Context) -> Rc<Self> {
        ctx.mount_button(LOGOUT, Button::new("Se déconnecter"));
        ctx.mount_button(TO_ADMIN, Button::new("Administration"));
        ctx.send(Action::CheckInternet);
        Rc::new(Self::default())
    }

    pub fn firstname(&self) -> Option<String> {
        self.firstname.borrow().clone()
    }

    /// Logged-out visitors go to the login page and the built-in
    /// administrator to the admin page. A user who is allowed and has a
    /// device with internet stays here; anyone else goes to `/no-internet`.
    pub async fn check(&self, ctx: &Context) -> Result<(), CoreError> {
        let Some(creds) = ctx.portal.credentials() else {
            ctx.send(Action::navigate("/login"));
            return Ok(());
        };
        if creds.is_builtin_admin() {
            ctx.send(Action::navigate("/admin"));
            return Ok(());
        }

        let user = ctx.portal.get_user(creds.user_id).await?;
        if user.is_allowed {
            let devices = ctx.portal.get_user_devices(creds.user_id).await?;
            if devices.iter().any(|d| d.internet) {
                *self.firstname.borrow_mut() = Some(user.firstname);
                return Ok(());
            }
        }
        ctx.send(Action::navigate("/no-internet"));
        Ok(())
    }
}

impl Page for HomePage {
    fn focus_order(&self, ctx: &Context) -> Vec<&'static str> {
        if ctx.portal.is_admin() {
            vec![LOGOUT, TO_ADMIN]
        } else {
            vec![LOGOUT]
        }
    }

    fn render(&self, ctx: &Context, frame: &mut Frame, area: Rect, focus: Focus<'_>) {
        let area = centered(area, 48);
        let [text_area, buttons_area] =
            Layout::vertical([Constraint::Length(4), Constraint::Fill(1)]).areas(area);

        let lines = match self.firstname() {
            Some(firstname) => vec![
                Line::from(Span::styled(format!("Bienvenue {firstname} !"), theme::title_style())),
                Line::from(""),
                Line::from(Span::styled("Vous avez accès à internet.", theme::body_text())),
            ],
            None => vec![Line::from(Span::styled(
                "Vérification de votre accès…",
                theme::body_text(),
            ))],
        };
        frame.render_widget(Paragraph::new(lines), text_area);

        let ids = self.focus_order(ctx);
        form::render_stack(frame, buttons_area, &ctx.registry, &ids, focus);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use uuid::Uuid;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::context::testing::{button, context, context_with_store, drain};
    use crate::pages::fixtures::{device_json, logged_in_store, user_json};

    async fn mock_user(server: &MockServer, id: Uuid, is_allowed: bool) {
        Mock::given(method("GET"))
            .and(path(format!("/api/users/{id}")))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json(id, "ana", is_allowed)))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn logged_out_visitor_goes_to_login() {
        let server = MockServer::start().await;
        let (ctx, mut rx) = context(&server.uri());
        controller(&ctx);
        let page = HomePage::build(&ctx);

        assert_eq!(drain(&mut rx), vec![Action::CheckInternet]);
        page.check(&ctx).await.unwrap();
        assert_eq!(drain(&mut rx), vec![Action::navigate("/login")]);
    }

    #[tokio::test]
    async fn online_user_is_welcomed() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        mock_user(&server, id, true).await;
        Mock::given(method("GET"))
            .and(path(format!("/api/devices/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![
                device_json(id, false),
                device_json(id, true),
            ]))
            .mount(&server)
            .await;

        let (ctx, mut rx) = context_with_store(&server.uri(), Rc::new(logged_in_store(id, "user")));
        let page = HomePage::build(&ctx);
        drain(&mut rx);

        page.check(&ctx).await.unwrap();

        assert_eq!(page.firstname().as_deref(), Some("Ana"));
        assert!(drain(&mut rx).is_empty());
        assert_eq!(page.focus_order(&ctx), vec![LOGOUT]);
    }

    #[tokio::test]
    async fn allowed_user_without_online_device_goes_to_no_internet() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        mock_user(&server, id, true).await;
        Mock::given(method("GET"))
            .and(path(format!("/api/devices/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![device_json(id, false)]))
            .mount(&server)
            .await;

        let (ctx, mut rx) = context_with_store(&server.uri(), Rc::new(logged_in_store(id, "user")));
        let page = HomePage::build(&ctx);
        drain(&mut rx);

        page.check(&ctx).await.unwrap();

        assert_eq!(page.firstname(), None);
        assert_eq!(drain(&mut rx), vec![Action::navigate("/no-internet")]);
    }

    #[tokio::test]
    async fn disallowed_user_skips_device_lookup() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        mock_user(&server, id, false).await;
        Mock::given(method("GET"))
            .and(path(format!("/api/devices/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<()>::new()))
            .expect(0)
            .mount(&server)
            .await;

        let (ctx, mut rx) = context_with_store(&server.uri(), Rc::new(logged_in_store(id, "user")));
        let page = HomePage::build(&ctx);
        drain(&mut rx);

        page.check(&ctx).await.unwrap();
        assert_eq!(drain(&mut rx), vec![Action::navigate("/no-internet")]);
    }

    #[tokio::test]
    async fn builtin_admin_goes_to_admin_page() {
        let server = MockServer::start().await;
        let (ctx, mut rx) =
            context_with_store(&server.uri(), Rc::new(logged_in_store(Uuid::nil(), "admin")));
        controller(&ctx);
        let page = HomePage::build(&ctx);
        drain(&mut rx);

        page.check(&ctx).await.unwrap();

        assert_eq!(drain(&mut rx), vec![Action::navigate("/admin")]);
        assert_eq!(page.focus_order(&ctx), vec![LOGOUT, TO_ADMIN]);

        button(&ctx, TO_ADMIN).click();
        button(&ctx, LOGOUT).click();
        assert_eq!(
            drain(&mut rx),
            vec![Action::navigate("/admin"), Action::Logout]
        );
    }
}
