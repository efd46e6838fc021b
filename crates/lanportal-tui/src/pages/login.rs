//! Login page.

use std::rc::Rc;

use ratatui::{Frame, layout::Rect};
use tracing::debug;

use lanportal_core::{Button, CoreError, InputKind, Login, TextInput, Validator};

use super::{Page, centered};
use crate::action::Action;
use crate::context::Context;
use crate::widgets::{Focus, form};

pub const USERNAME: &str = "login-username";
pub const PASSWORD: &str = "login-password";
pub const BUTTON: &str = "login-button";
pub const TO_REGISTER: &str = "login-to-register";

const FOCUS: [&str; 4] = [USERNAME, PASSWORD, BUTTON, TO_REGISTER];

pub fn controller(ctx: &Context) {
    ctx.bind_input(USERNAME, &Validator::username(), &Action::Login);
    ctx.bind_input(PASSWORD, &Validator::valid_string(), &Action::Login);
    ctx.bind_button(BUTTON, &Action::Login);
    ctx.bind_button(TO_REGISTER, &Action::navigate("/register"));
}

#[derive(Debug)]
pub struct LoginPage;

impl LoginPage {
    pub fn build(ctx: &Context) -> Rc<Self> {
        if ctx.portal.is_authenticated() {
            ctx.send(Action::navigate("/"));
        }
        ctx.mount_input(USERNAME, TextInput::new(InputKind::Text, "Nom d'utilisateur"));
        ctx.mount_input(PASSWORD, TextInput::new(InputKind::Password, "Mot de passe"));
        ctx.mount_button(BUTTON, Button::new("Se connecter"));
        ctx.mount_button(TO_REGISTER, Button::new("Pas de compte ? S'inscrire"));
        Rc::new(Self)
    }
}

impl Page for LoginPage {
    fn focus_order(&self, _ctx: &Context) -> Vec<&'static str> {
        FOCUS.to_vec()
    }

    fn render(&self, ctx: &Context, frame: &mut Frame, area: Rect, focus: Focus<'_>) {
        form::render_stack(frame, centered(area, 48), &ctx.registry, &FOCUS, focus);
    }
}

/// Log in with the form's values, enroll this machine unless the account is
/// the built-in administrator, and go home.
///
/// A form with validation errors is left as is, errors showing.
pub async fn submit(ctx: &Context) -> Result<(), CoreError> {
    let (Some(username), Some(password)) = (ctx.input(USERNAME), ctx.input(PASSWORD)) else {
        return Ok(());
    };
    let username = username.validate(&ctx.registry);
    let password = password.validate(&ctx.registry);
    let (Ok(username), Ok(password)) = (username, password) else {
        debug!("login form has errors");
        return Ok(());
    };

    let creds = ctx.portal.login(&Login::new(username, password)).await?;
    if !creds.is_builtin_admin() {
        ctx.portal.add_device().await?;
    }
    ctx.send(Action::navigate("/"));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::rc::Rc;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use uuid::Uuid;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::context::testing::{button, context, context_with_store, drain, type_into};
    use crate::pages::fixtures::logged_in_store;

    fn setup(ctx: &Context) {
        controller(ctx);
        LoginPage::build(ctx);
    }

    #[tokio::test]
    async fn typing_validates_and_enter_submits() {
        let server = MockServer::start().await;
        let (ctx, mut rx) = context(&server.uri());
        setup(&ctx);

        type_into(&ctx, USERNAME, "ana lopez");
        let username = ctx.input(USERNAME).unwrap();
        assert_eq!(
            username.error().as_deref(),
            Some("le nom d'utilisateur contient des espaces")
        );

        username.enter();
        button(&ctx, TO_REGISTER).click();
        assert_eq!(
            drain(&mut rx),
            vec![Action::Login, Action::navigate("/register")]
        );
    }

    #[tokio::test]
    async fn submit_logs_in_enrolls_and_goes_home() {
        let server = MockServer::start().await;
        let user_id = Uuid::new_v4();
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .and(body_json(json!({ "username": "ana", "password": "hunter22" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "biscuit": "tok",
                "role": "user",
                "user_id": user_id
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/devices"))
            .and(header("authorization", "Bearer tok"))
            .and(body_json(json!({ "user_id": user_id })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let (ctx, mut rx) = context(&server.uri());
        setup(&ctx);
        type_into(&ctx, USERNAME, "ana");
        type_into(&ctx, PASSWORD, "hunter22");

        submit(&ctx).await.unwrap();

        assert!(ctx.portal.is_authenticated());
        assert_eq!(drain(&mut rx), vec![Action::navigate("/")]);
    }

    #[tokio::test]
    async fn builtin_admin_skips_device_enrollment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "biscuit": "tok",
                "role": "admin",
                "user_id": Uuid::nil()
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/devices"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let (ctx, _rx) = context(&server.uri());
        setup(&ctx);
        type_into(&ctx, USERNAME, "admin");
        type_into(&ctx, PASSWORD, "admin");

        submit(&ctx).await.unwrap();
        assert!(ctx.portal.is_admin());
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (ctx, mut rx) = context(&server.uri());
        setup(&ctx);
        type_into(&ctx, USERNAME, "ana");

        submit(&ctx).await.unwrap();

        assert_eq!(
            ctx.input(PASSWORD).unwrap().error().as_deref(),
            Some("texte vide")
        );
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn rejected_login_surfaces_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(ResponseTemplate::new(403).set_body_string("mot de passe incorrect"))
            .mount(&server)
            .await;

        let (ctx, _rx) = context(&server.uri());
        setup(&ctx);
        type_into(&ctx, USERNAME, "ana");
        type_into(&ctx, PASSWORD, "nope");

        let err = submit(&ctx).await.unwrap_err();
        assert_eq!(err.to_string(), "mot de passe incorrect");
        assert!(!ctx.portal.is_authenticated());
    }

    #[tokio::test]
    async fn authenticated_visitor_is_sent_home() {
        let server = MockServer::start().await;
        let store = Rc::new(logged_in_store(Uuid::new_v4(), "user"));
        let (ctx, mut rx) = context_with_store(&server.uri(), store);

        setup(&ctx);

        assert_eq!(drain(&mut rx), vec![Action::navigate("/")]);
    }
}
