//! Headless leaf widgets.
//!
//! These hold the state a front end renders and the callbacks page
//! controllers attach. They never draw anything themselves. Every widget is
//! shared as `Rc<_>` and mutated through `&self`, so a widget can be held by
//! the registry, a controller, and the renderer at once.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::registry::Registry;
use crate::table::DataTable;
use crate::validation::{Fields, Validator};

type Handler = Rc<dyn Fn()>;
type InputHandler = Rc<dyn Fn(&str)>;

/// What kind of text a [`TextInput`] holds. Password inputs are masked when
/// rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputKind {
    #[default]
    Text,
    Password,
    Email,
    Tel,
}

// ── Text input ──────────────────────────────────────────────────────

/// A single-line text field with an optional validator.
///
/// Edits made through [`push_char`](Self::push_char) and
/// [`pop_char`](Self::pop_char) fire the on-input callback and then
/// revalidate, so the error shown always matches the current value.
pub struct TextInput {
    kind: InputKind,
    placeholder: String,
    value: RefCell<String>,
    error: RefCell<Option<String>>,
    validator: RefCell<Option<Validator>>,
    on_input: RefCell<Option<InputHandler>>,
    on_enter: RefCell<Option<Handler>>,
}

impl TextInput {
    pub fn new(kind: InputKind, placeholder: impl Into<String>) -> Self {
        Self {
            kind,
            placeholder: placeholder.into(),
            value: RefCell::new(String::new()),
            error: RefCell::new(None),
            validator: RefCell::new(None),
            on_input: RefCell::new(None),
            on_enter: RefCell::new(None),
        }
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn value(&self) -> String {
        self.value.borrow().clone()
    }

    /// Replace the value without firing callbacks.
    pub fn set_value(&self, value: impl Into<String>) {
        *self.value.borrow_mut() = value.into();
    }

    pub fn push_char(&self, c: char, fields: &dyn Fields) {
        self.value.borrow_mut().push(c);
        self.edited(fields);
    }

    pub fn pop_char(&self, fields: &dyn Fields) {
        let removed = self.value.borrow_mut().pop();
        if removed.is_some() {
            self.edited(fields);
        }
    }

    fn edited(&self, fields: &dyn Fields) {
        let value = self.value();
        let handler = self.on_input.borrow().clone();
        if let Some(handler) = handler {
            handler(&value);
        }
        if self.validator.borrow().is_some() {
            let _ = self.validate(fields);
        }
    }

    pub fn set_validator(&self, validator: Validator) {
        *self.validator.borrow_mut() = Some(validator);
    }

    /// Check the current value and remember the failure message for display.
    ///
    /// Without a validator the value always passes.
    pub fn validate(&self, fields: &dyn Fields) -> Result<String, String> {
        let value = self.value();
        let validator = self.validator.borrow().clone();
        let result = match validator {
            Some(v) => v.validate_with(&value, fields),
            None => Ok(value),
        };
        *self.error.borrow_mut() = result.as_ref().err().cloned();
        result
    }

    /// The message from the last failed validation, if still failing.
    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn set_on_input(&self, handler: impl Fn(&str) + 'static) {
        *self.on_input.borrow_mut() = Some(Rc::new(handler));
    }

    pub fn set_on_enter(&self, handler: impl Fn() + 'static) {
        *self.on_enter.borrow_mut() = Some(Rc::new(handler));
    }

    /// The Enter key was pressed in this field.
    pub fn enter(&self) {
        let handler = self.on_enter.borrow().clone();
        if let Some(handler) = handler {
            handler();
        }
    }
}

impl fmt::Debug for TextInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextInput")
            .field("kind", &self.kind)
            .field("placeholder", &self.placeholder)
            .field("error", &self.error.borrow())
            .finish_non_exhaustive()
    }
}

// ── Checkbox ────────────────────────────────────────────────────────

pub struct Checkbox {
    label: String,
    checked: Cell<bool>,
    disabled: Cell<bool>,
    error: Cell<bool>,
    on_click: RefCell<Option<Handler>>,
}

impl Checkbox {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            checked: Cell::new(false),
            disabled: Cell::new(false),
            error: Cell::new(false),
            on_click: RefCell::new(None),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn checked(&self) -> bool {
        self.checked.get()
    }

    pub fn disabled(&self) -> bool {
        self.disabled.get()
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    /// Toggle and fire the on-click callback. Clicking clears the error
    /// highlight. Disabled checkboxes ignore clicks.
    pub fn click(&self) {
        if self.disabled.get() {
            return;
        }
        self.error.set(false);
        self.checked.set(!self.checked.get());
        let handler = self.on_click.borrow().clone();
        if let Some(handler) = handler {
            handler();
        }
    }

    pub fn set_error(&self, error: bool) {
        self.error.set(error);
    }

    pub fn has_error(&self) -> bool {
        self.error.get()
    }

    pub fn set_on_click(&self, handler: impl Fn() + 'static) {
        *self.on_click.borrow_mut() = Some(Rc::new(handler));
    }
}

impl fmt::Debug for Checkbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checkbox")
            .field("label", &self.label)
            .field("checked", &self.checked.get())
            .field("disabled", &self.disabled.get())
            .finish_non_exhaustive()
    }
}

// ── Button ──────────────────────────────────────────────────────────

pub struct Button {
    label: String,
    on_click: RefCell<Option<Handler>>,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            on_click: RefCell::new(None),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_on_click(&self, handler: impl Fn() + 'static) {
        *self.on_click.borrow_mut() = Some(Rc::new(handler));
    }

    pub fn click(&self) {
        let handler = self.on_click.borrow().clone();
        if let Some(handler) = handler {
            handler();
        }
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

// ── Registry payload ────────────────────────────────────────────────

/// Anything a page can register under an id.
#[derive(Debug, Clone)]
pub enum Component {
    TextInput(Rc<TextInput>),
    Checkbox(Rc<Checkbox>),
    Button(Rc<Button>),
    Table(Rc<DataTable>),
}

impl Component {
    pub fn as_text_input(&self) -> Option<Rc<TextInput>> {
        match self {
            Self::TextInput(w) => Some(Rc::clone(w)),
            _ => None,
        }
    }

    pub fn as_checkbox(&self) -> Option<Rc<Checkbox>> {
        match self {
            Self::Checkbox(w) => Some(Rc::clone(w)),
            _ => None,
        }
    }

    pub fn as_button(&self) -> Option<Rc<Button>> {
        match self {
            Self::Button(w) => Some(Rc::clone(w)),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<Rc<DataTable>> {
        match self {
            Self::Table(w) => Some(Rc::clone(w)),
            _ => None,
        }
    }
}

/// Text inputs answer cross-field lookups with their current value.
impl Fields for Registry<Component> {
    fn field(&self, id: &str) -> Option<String> {
        self.get(id)?.as_text_input().map(|input| input.value())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::validation::NoFields;

    #[test]
    fn typing_fires_on_input_then_validates() {
        let input = TextInput::new(InputKind::Text, "Nom d'utilisateur");
        input.set_validator(Validator::username());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        input.set_on_input(move |v| sink.borrow_mut().push(v.to_owned()));

        input.push_char('a', &NoFields);
        input.push_char(' ', &NoFields);
        assert_eq!(
            input.error().as_deref(),
            Some("le nom d'utilisateur contient des espaces")
        );

        input.pop_char(&NoFields);
        assert_eq!(input.error(), None);
        assert_eq!(*seen.borrow(), vec!["a", "a ", "a"]);
    }

    #[test]
    fn pop_on_empty_is_silent() {
        let input = TextInput::new(InputKind::Password, "");
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        input.set_on_input(move |_| seen.set(seen.get() + 1));
        input.pop_char(&NoFields);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn set_value_does_not_fire_callbacks() {
        let input = TextInput::new(InputKind::Text, "");
        input.set_on_input(|_| panic!("on_input fired"));
        input.set_value("ana");
        assert_eq!(input.value(), "ana");
        assert_eq!(input.validate(&NoFields), Ok("ana".to_owned()));
    }

    #[test]
    fn validate_uses_registry_lookup() {
        let registry = Registry::new();
        let password = Rc::new(TextInput::new(InputKind::Password, ""));
        let confirm = Rc::new(TextInput::new(InputKind::Password, ""));
        password.set_value("hunter22");
        confirm.set_validator(Validator::confirmation("register-password"));
        registry.register("register-password", Component::TextInput(Rc::clone(&password)));

        for c in "hunter2".chars() {
            confirm.push_char(c, &registry);
        }
        assert_eq!(confirm.error().as_deref(), Some("mot de passe différent"));

        confirm.push_char('2', &registry);
        assert_eq!(confirm.error(), None);
    }

    #[test]
    fn checkbox_click_rules() {
        let checkbox = Checkbox::new("J'accepte le règlement");
        let clicks = Rc::new(Cell::new(0));
        let seen = Rc::clone(&clicks);
        checkbox.set_on_click(move || seen.set(seen.get() + 1));
        checkbox.set_error(true);

        checkbox.click();
        assert!(checkbox.checked());
        assert!(!checkbox.has_error());
        assert_eq!(clicks.get(), 1);

        checkbox.set_disabled(true);
        checkbox.click();
        assert!(checkbox.checked());
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn enter_and_button_callbacks() {
        let hits = Rc::new(Cell::new(0));

        let input = TextInput::new(InputKind::Text, "");
        input.enter();
        let seen = Rc::clone(&hits);
        input.set_on_enter(move || seen.set(seen.get() + 1));
        input.enter();

        let button = Button::new("Connexion");
        let seen = Rc::clone(&hits);
        button.set_on_click(move || seen.set(seen.get() + 10));
        button.click();

        assert_eq!(hits.get(), 11);
    }
}
