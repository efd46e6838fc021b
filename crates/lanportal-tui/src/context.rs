//! Per-session state shared by the app loop, page controllers, and views.

use std::rc::Rc;

use lanportal_api::Client;
use lanportal_core::{
    Button, Checkbox, Component, DataTable, MemoryHistory, Portal, Registry, SessionStore,
    TextInput, Validator,
};

use crate::action::{Action, Dispatcher};

/// Origin of the in-process history. Paths may be given with or without it.
pub const ORIGIN: &str = "lanportal://portal";

pub struct Context {
    pub registry: Registry<Component>,
    pub portal: Portal,
    pub history: Rc<MemoryHistory>,
    pub store: Rc<dyn SessionStore>,
    dispatcher: Dispatcher,
}

impl Context {
    pub fn new(client: Client, store: Rc<dyn SessionStore>, dispatcher: Dispatcher) -> Self {
        Self {
            registry: Registry::new(),
            portal: Portal::new(client, Rc::clone(&store)),
            history: Rc::new(MemoryHistory::new(ORIGIN)),
            store,
            dispatcher,
        }
    }

    pub fn send(&self, action: Action) {
        self.dispatcher.send(action);
    }

    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher.clone()
    }

    // ── Registry lookups ──

    pub fn input(&self, id: &str) -> Option<Rc<TextInput>> {
        self.registry.get(id)?.as_text_input()
    }

    pub fn checkbox(&self, id: &str) -> Option<Rc<Checkbox>> {
        self.registry.get(id)?.as_checkbox()
    }

    pub fn table(&self, id: &str) -> Option<Rc<DataTable>> {
        self.registry.get(id)?.as_table()
    }

    // ── Controller wiring ──

    /// Whenever a text input is bound to `id`, give it `validator` and make
    /// Enter send `on_enter`.
    pub fn bind_input(&self, id: &str, validator: &Validator, on_enter: &Action) {
        let dispatcher = self.dispatcher();
        let validator = validator.clone();
        let on_enter = on_enter.clone();
        self.registry.subscribe(id, move |component: &Component| {
            let Some(input) = component.as_text_input() else {
                return;
            };
            input.set_validator(validator.clone());
            let dispatcher = dispatcher.clone();
            let action = on_enter.clone();
            input.set_on_enter(move || dispatcher.send(action.clone()));
        });
    }

    /// Whenever a button is bound to `id`, make clicking it send `on_click`.
    pub fn bind_button(&self, id: &str, on_click: &Action) {
        let dispatcher = self.dispatcher();
        let on_click = on_click.clone();
        self.registry.subscribe(id, move |component: &Component| {
            if let Some(button) = component.as_button() {
                let dispatcher = dispatcher.clone();
                let action = on_click.clone();
                button.set_on_click(move || dispatcher.send(action.clone()));
            }
        });
    }

    // ── Widget construction ──

    pub fn mount_input(&self, id: &str, input: TextInput) -> Rc<TextInput> {
        let input = Rc::new(input);
        self.registry
            .register(id, Component::TextInput(Rc::clone(&input)));
        input
    }

    pub fn mount_checkbox(&self, id: &str, checkbox: Checkbox) -> Rc<Checkbox> {
        let checkbox = Rc::new(checkbox);
        self.registry
            .register(id, Component::Checkbox(Rc::clone(&checkbox)));
        checkbox
    }

    pub fn mount_button(&self, id: &str, button: Button) -> Rc<Button> {
        let button = Rc::new(button);
        self.registry
            .register(id, Component::Button(Rc::clone(&button)));
        button
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("registry", &self.registry)
            .field("portal", &self.portal)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod testing {
    use lanportal_core::MemoryStore;
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use url::Url;

    use super::*;

    /// A context talking to `server_uri` with an in-memory session.
    pub fn context(server_uri: &str) -> (Rc<Context>, UnboundedReceiver<Action>) {
        context_with_store(server_uri, Rc::new(MemoryStore::new()))
    }

    pub fn context_with_store(
        server_uri: &str,
        store: Rc<dyn SessionStore>,
    ) -> (Rc<Context>, UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let base = Url::parse(&format!("{server_uri}/api")).unwrap();
        let client = Client::with_client(reqwest::Client::new(), base);
        let ctx = Context::new(client, store, Dispatcher::new(tx));
        (Rc::new(ctx), rx)
    }

    /// Everything queued so far.
    pub fn drain(rx: &mut UnboundedReceiver<Action>) -> Vec<Action> {
        let mut actions = Vec::new();
        while let Ok(action) = rx.try_recv() {
            actions.push(action);
        }
        actions
    }

    /// The button bound to `id`.
    pub fn button(ctx: &Context, id: &str) -> Rc<Button> {
        ctx.registry.get(id).unwrap().as_button().unwrap()
    }

    /// Type `text` into the input bound to `id`, as the key handler does.
    pub fn type_into(ctx: &Context, id: &str, text: &str) {
        let input = ctx.input(id).unwrap();
        for c in text.chars() {
            input.push_char(c, &ctx.registry);
        }
    }
}
