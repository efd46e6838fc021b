//! Routes, views, and page controllers.
//!
//! Each page splits into two halves that only meet through the registry:
//! a controller that subscribes to widget ids once per session, and a view
//! that builds and registers fresh widgets every time its route is entered.

pub mod admin;
pub mod home;
pub mod login;
pub mod no_internet;
pub mod register;

use std::rc::Rc;

use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
};

use lanportal_core::Route;

use crate::context::Context;
use crate::widgets::Focus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    Home,
    Login,
    Register,
    NoInternet,
    Admin,
}

pub fn routes() -> Vec<Route<ViewId>> {
    vec![
        Route::new("/", "LAN Portal", ViewId::Home),
        Route::new("/login", "Connexion", ViewId::Login),
        Route::new("/register", "Inscription", ViewId::Register),
        Route::new("/no-internet", "Pas d'internet :/", ViewId::NoInternet),
        Route::new("/admin", "Admin", ViewId::Admin),
    ]
}

/// Wire every page controller into the session's registry.
pub fn install_controllers(ctx: &Context) {
    login::controller(ctx);
    register::controller(ctx);
    home::controller(ctx);
    no_internet::controller(ctx);
    admin::controller(ctx);
}

/// What a view exposes to the app loop.
pub trait Page {
    /// Focusable widget ids, in Tab order.
    fn focus_order(&self, ctx: &Context) -> Vec<&'static str>;

    fn render(&self, ctx: &Context, frame: &mut Frame, area: Rect, focus: Focus<'_>);
}

/// The live view for the current route.
#[derive(Debug, Clone)]
pub enum View {
    Home(Rc<home::HomePage>),
    Login(Rc<login::LoginPage>),
    Register(Rc<register::RegisterPage>),
    NoInternet(Rc<no_internet::NoInternetPage>),
    Admin(Rc<admin::AdminPage>),
}

impl View {
    pub fn build(id: ViewId, ctx: &Context) -> Self {
        match id {
            ViewId::Home => Self::Home(home::HomePage::build(ctx)),
            ViewId::Login => Self::Login(login::LoginPage::build(ctx)),
            ViewId::Register => Self::Register(register::RegisterPage::build(ctx)),
            ViewId::NoInternet => Self::NoInternet(no_internet::NoInternetPage::build(ctx)),
            ViewId::Admin => Self::Admin(admin::AdminPage::build(ctx)),
        }
    }

    pub fn page(&self) -> &dyn Page {
        match self {
            Self::Home(page) => page.as_ref(),
            Self::Login(page) => page.as_ref(),
            Self::Register(page) => page.as_ref(),
            Self::NoInternet(page) => page.as_ref(),
            Self::Admin(page) => page.as_ref(),
        }
    }
}

/// A `width`-column strip centered horizontally in `area`.
fn centered(area: Rect, width: u16) -> Rect {
    let [column] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    column
}
