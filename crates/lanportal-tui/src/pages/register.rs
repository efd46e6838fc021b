//! Account creation page.

use std::rc::Rc;

use ratatui::{Frame, layout::Rect};
use tracing::debug;

use lanportal_core::{Button, Checkbox, CoreError, InputKind, TextInput, UserInput, Validator};

use super::{Page, centered};
use crate::action::Action;
use crate::context::Context;
use crate::widgets::{Focus, form};

pub const USERNAME: &str = "register-username";
pub const FIRSTNAME: &str = "register-firstname";
pub const LASTNAME: &str = "register-lastname";
pub const EMAIL: &str = "register-email";
pub const PHONE: &str = "register-phone";
pub const PASSWORD: &str = "register-password";
pub const CONFIRM_PASSWORD: &str = "register-confirm-password";
pub const AGREE: &str = "register-agree";
pub const BUTTON: &str = "register-button";
pub const TO_LOGIN: &str = "register-to-login";

const INPUTS: [&str; 7] = [
    USERNAME,
    FIRSTNAME,
    LASTNAME,
    EMAIL,
    PHONE,
    PASSWORD,
    CONFIRM_PASSWORD,
];

const FOCUS: [&str; 10] = [
    USERNAME,
    FIRSTNAME,
    LASTNAME,
    EMAIL,
    PHONE,
    PASSWORD,
    CONFIRM_PASSWORD,
    AGREE,
    BUTTON,
    TO_LOGIN,
];

const NOT_AGREED: &str = "règlement non accepté";
const PASSWORD_MISMATCH: &str = "mots de passe différents";

pub fn controller(ctx: &Context) {
    let submit = Action::Register;
    ctx.bind_input(USERNAME, &Validator::username(), &submit);
    ctx.bind_input(FIRSTNAME, &Validator::valid_string(), &submit);
    ctx.bind_input(LASTNAME, &Validator::valid_string(), &submit);
    ctx.bind_input(EMAIL, &Validator::email(), &submit);
    ctx.bind_input(PHONE, &Validator::phone(), &submit);
    ctx.bind_input(PASSWORD, &Validator::valid_string(), &submit);
    ctx.bind_input(CONFIRM_PASSWORD, &Validator::confirmation(PASSWORD), &submit);
    ctx.bind_button(BUTTON, &submit);
    ctx.bind_button(TO_LOGIN, &Action::navigate("/login"));
}

#[derive(Debug)]
pub struct RegisterPage;

impl RegisterPage {
    pub fn build(ctx: &Context) -> Rc<Self> {
        if ctx.portal.is_authenticated() {
            ctx.send(Action::navigate("/"));
        }
        ctx.mount_input(USERNAME, TextInput::new(InputKind::Text, "Nom d'utilisateur"));
        ctx.mount_input(FIRSTNAME, TextInput::new(InputKind::Text, "Prénom"));
        ctx.mount_input(LASTNAME, TextInput::new(InputKind::Text, "Nom"));
        ctx.mount_input(EMAIL, TextInput::new(InputKind::Email, "Email"));
        ctx.mount_input(PHONE, TextInput::new(InputKind::Tel, "Téléphone"));
        ctx.mount_input(PASSWORD, TextInput::new(InputKind::Password, "Mot de passe"));
        ctx.mount_input(
            CONFIRM_PASSWORD,
            TextInput::new(InputKind::Password, "Confirmer le mot de passe"),
        );
        ctx.mount_checkbox(AGREE, Checkbox::new("J'accepte le règlement"));
        ctx.mount_button(BUTTON, Button::new("S'inscrire"));
        ctx.mount_button(TO_LOGIN, Button::new("Déjà un compte ? Se connecter"));
        Rc::new(Self)
    }
}

impl Page for RegisterPage {
    fn focus_order(&self, _ctx: &Context) -> Vec<&'static str> {
        FOCUS.to_vec()
    }

    fn render(&self, ctx: &Context, frame: &mut Frame, area: Rect, focus: Focus<'_>) {
        form::render_stack(frame, centered(area, 56), &ctx.registry, &FOCUS, focus);
    }
}

fn refused(message: &str) -> CoreError {
    CoreError::Validation {
        message: message.to_owned(),
    }
}

/// Validate every field, create the account, log in, enroll this machine,
/// and go home.
///
/// An unchecked agreement or mismatched passwords is an error for the
/// caller to show. Other field errors stay inline and stop the submission.
pub async fn submit(ctx: &Context) -> Result<(), CoreError> {
    let results = INPUTS.map(|id| {
        ctx.input(id)
            .map_or_else(|| Err(String::new()), |input| input.validate(&ctx.registry))
    });

    let agree = ctx.checkbox(AGREE);
    let agreed = agree.as_ref().is_some_and(|a| a.checked());
    if let Some(agree) = &agree {
        agree.set_error(!agreed);
    }
    if !agreed {
        return Err(refused(NOT_AGREED));
    }

    let password = ctx.input(PASSWORD).map(|i| i.value());
    let confirmation = ctx.input(CONFIRM_PASSWORD).map(|i| i.value());
    if password != confirmation {
        return Err(refused(PASSWORD_MISMATCH));
    }

    let [
        Ok(username),
        Ok(firstname),
        Ok(lastname),
        Ok(email),
        Ok(phone),
        Ok(password),
        Ok(_),
    ] = results
    else {
        debug!("registration form has errors");
        return Ok(());
    };

    let user = UserInput {
        username,
        firstname,
        lastname,
        email,
        password: password.into(),
        phone,
    };
    ctx.portal.register(&user).await?;
    ctx.portal.add_device().await?;
    ctx.send(Action::navigate("/"));
    Ok(())
}
