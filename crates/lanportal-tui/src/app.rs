//! Application core: event loop, focus, action dispatch.

use std::rc::Rc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info, warn};

use lanportal_api::Client;
use lanportal_core::{Component, CoreError, History, REDIRECT_KEY, Router, SessionStore};

use crate::action::{Action, Dispatcher};
use crate::context::Context;
use crate::event::{Event, EventReader};
use crate::pages::{self, View, ViewId, admin, login, register};
use crate::theme;
use crate::tui::Tui;
use crate::widgets::Focus;

pub struct App {
    ctx: Rc<Context>,
    router: Router<ViewId, View>,
    running: bool,
    /// Index into the current page's focus order.
    focus: usize,
    /// Selected row of a focused table.
    row: usize,
    /// A backend call is in flight.
    busy: bool,
    alert: Option<String>,
    action_rx: UnboundedReceiver<Action>,
}

impl App {
    /// Set up the session: re-check stored credentials, wire the page
    /// controllers, and start the router on the restored or default path.
    pub async fn new(client: Client, store: Rc<dyn SessionStore>) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let ctx = Rc::new(Context::new(client, store, Dispatcher::new(action_tx)));

        ctx.portal.refresh_auth_state().await;
        pages::install_controllers(&ctx);
        let router = build_router(&ctx)?;

        Ok(Self {
            ctx,
            router,
            running: true,
            focus: 0,
            row: 0,
            busy: false,
            alert: None,
            action_rx,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let mut events = EventReader::new(Duration::from_millis(33));
        info!(path = self.router.path(), "event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => self.handle_key_event(key),
                Event::Resize(w, h) => self.ctx.send(Action::Resize(w, h)),
                Event::Render => self.ctx.send(Action::Render),
            }

            while let Ok(action) = self.action_rx.try_recv() {
                if action.is_request() {
                    self.busy = true;
                    tui.draw(|frame| self.render(frame))?;
                }
                let render = action == Action::Render;
                self.process_action(action).await;
                self.busy = false;

                if render {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        info!("event loop ended");
        Ok(())
    }

    // ── Input ───────────────────────────────────────────────────────

    fn focus_order(&self) -> Vec<&'static str> {
        self.router.view().page().focus_order(&self.ctx)
    }

    fn focused_id(&self) -> Option<&'static str> {
        self.focus_order().get(self.focus).copied()
    }

    fn cycle_focus(&mut self, forward: bool) {
        let len = self.focus_order().len();
        if len == 0 {
            return;
        }
        self.focus = if forward {
            (self.focus + 1) % len
        } else {
            (self.focus + len - 1) % len
        };
        self.row = 0;
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c' | 'q'))
        {
            self.ctx.send(Action::Quit);
            return;
        }

        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.ctx.send(Action::DismissAlert);
            }
            return;
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::ALT, KeyCode::Left) => self.ctx.send(Action::Back),
            (KeyModifiers::ALT, KeyCode::Right) => self.ctx.send(Action::Forward),
            (_, KeyCode::Tab) => self.cycle_focus(true),
            (_, KeyCode::BackTab) => self.cycle_focus(false),
            _ => self.handle_widget_key(key),
        }
    }

    /// Keys for the focused widget. Widget callbacks turn these into actions.
    fn handle_widget_key(&mut self, key: KeyEvent) {
        let Some(component) = self.focused_id().and_then(|id| self.ctx.registry.get(id)) else {
            return;
        };
        let typed = match key.code {
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                Some(c)
            }
            _ => None,
        };
        let activate = matches!(key.code, KeyCode::Enter | KeyCode::Char(' '));
        let fields = &self.ctx.registry;

        match component {
            Component::TextInput(input) => match (typed, key.code) {
                (Some(c), _) => input.push_char(c, fields),
                (None, KeyCode::Backspace) => input.pop_char(fields),
                (None, KeyCode::Enter) => input.enter(),
                _ => {}
            },
            Component::Checkbox(checkbox) if activate => checkbox.click(),
            Component::Button(button) if activate => button.click(),
            Component::Table(table) => match (typed, key.code) {
                (Some(c), _) => {
                    table.search_input().push_char(c, fields);
                    self.row = 0;
                }
                (None, KeyCode::Backspace) => {
                    table.search_input().pop_char(fields);
                    self.row = 0;
                }
                (None, KeyCode::Up) => self.row = self.row.saturating_sub(1),
                (None, KeyCode::Down) => {
                    let last = table.rendered_rows().len().saturating_sub(1);
                    self.row = (self.row + 1).min(last);
                }
                (None, KeyCode::Enter) => {
                    let row = self.row;
                    if !table.keys().iter().any(|key| table.activate(row, key)) {
                        debug!(row, "nothing to toggle");
                    }
                }
                _ => {}
            },
            Component::Checkbox(_) | Component::Button(_) => {}
        }
    }

    // ── Actions ─────────────────────────────────────────────────────

    async fn process_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                // Reopen here next launch.
                self.ctx.store.set(REDIRECT_KEY, self.router.path());
                self.running = false;
            }
            Action::Resize(..) | Action::Render => {}

            Action::Navigate(path) => {
                let result = self.router.navigate_to(&path);
                self.settle(result);
            }
            Action::Back => {
                let router = &self.router;
                if let Some(result) = self.ctx.history.back(|path| router.restore(path)) {
                    self.settle(result);
                }
            }
            Action::Forward => {
                let router = &self.router;
                if let Some(result) = self.ctx.history.forward(|path| router.restore(path)) {
                    self.settle(result);
                }
            }
            Action::ViewChanged => {
                self.focus = 0;
                self.row = 0;
            }

            Action::Login => {
                let result = login::submit(&self.ctx).await;
                self.settle(result);
            }
            Action::Register => {
                let result = register::submit(&self.ctx).await;
                self.settle(result);
            }
            Action::CheckInternet => {
                // Stale once the home page is gone.
                if let View::Home(page) = self.router.view() {
                    let result = page.check(&self.ctx).await;
                    self.settle(result);
                }
            }
            Action::RetryInternet => {
                if let View::NoInternet(page) = self.router.view() {
                    let result = page.retry(&self.ctx).await;
                    self.settle(result);
                }
            }
            Action::LoadUsers => {
                let result = admin::load_users(&self.ctx).await;
                self.settle(result);
            }
            Action::ToggleAllowed(row) => {
                let result = admin::toggle_allowed(&self.ctx, &row).await;
                self.settle(result);
            }
            Action::Logout => {
                self.ctx.portal.logout();
                self.ctx.send(Action::navigate("/login"));
            }

            Action::Alert(message) => self.alert = Some(message),
            Action::DismissAlert => self.alert = None,
        }
    }

    /// Show a failed operation to the user. An expired session is ended and
    /// the user sent back to the login page.
    fn settle(&mut self, result: Result<(), CoreError>) {
        let Err(e) = result else {
            return;
        };
        warn!(error = %e, path = self.router.path(), "operation failed");

        let expired = matches!(&e, CoreError::Service(api) if api.is_unauthorized());
        if expired && self.ctx.portal.is_authenticated() {
            self.ctx.portal.logout();
            self.ctx.send(Action::navigate("/login"));
        } else if matches!(e, CoreError::NotAuthenticated) {
            self.ctx.send(Action::navigate("/login"));
        }
        self.ctx.send(Action::Alert(e.to_string()));
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [header_area, content_area, status_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let header = Line::from(vec![
            Span::styled(format!(" {} ", self.router.name()), theme::title_style()),
            Span::styled(self.router.path().to_owned(), theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(header), header_area);

        let focus = Focus {
            id: self.focused_id(),
            row: self.row,
        };
        self.router
            .view()
            .page()
            .render(&self.ctx, frame, content_area, focus);

        self.render_status_bar(frame, status_area);

        if let Some(message) = &self.alert {
            render_alert(frame, area, message);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let session = if self.busy {
            Span::styled("\u{25D0} requête en cours", Style::default().fg(theme::CORAL))
        } else {
            match self.ctx.portal.credentials() {
                Some(creds) => Span::styled(
                    format!("\u{25CF} connecté ({})", creds.role),
                    Style::default().fg(theme::SUCCESS_GREEN),
                ),
                None => Span::styled(
                    "\u{25CB} déconnecté",
                    Style::default().fg(theme::ERROR_RED),
                ),
            }
        };

        let mut spans = vec![Span::raw(" "), session, Span::styled(" \u{2502} ", theme::key_hint())];
        for (key, what) in [
            ("Tab", "suivant"),
            ("Entrée", "valider"),
            ("Alt+\u{2190}/\u{2192}", "historique"),
            ("Ctrl+Q", "quitter"),
        ] {
            spans.push(Span::styled(key, theme::key_hint_key()));
            spans.push(Span::styled(format!(" {what}  "), theme::key_hint()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn build_router(ctx: &Rc<Context>) -> Result<Router<ViewId, View>, CoreError> {
    let history: Rc<dyn History> = ctx.history.clone();
    let factory_ctx = Rc::clone(ctx);
    let router = Router::new(pages::routes(), history, ctx.store.as_ref(), move |id: &ViewId| {
        View::build(*id, &factory_ctx)
    })?;

    let dispatcher = ctx.dispatcher();
    router.add_listener(move |router| {
        debug!(path = router.path(), name = router.name(), "view changed");
        dispatcher.send(Action::ViewChanged);
    });
    Ok(router)
}

/// Centered error popup over whatever is on screen.
fn render_alert(frame: &mut Frame, area: Rect, message: &str) {
    let width = 60u16.min(area.width.saturating_sub(4));
    let height = 7u16.min(area.height.saturating_sub(2));
    let popup = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .title(Span::styled(" Erreur ", theme::error_text()))
        .title_bottom(Span::styled(" Entrée pour fermer ", theme::key_hint()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_error())
        .style(Style::default().bg(theme::BG_DARK));
    let text = Paragraph::new(Span::styled(message.to_owned(), theme::body_text()))
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(text, popup);
}
