//! Short-circuiting rule chains over form input.
//!
//! A [`Validator`] is an ordered list of [`Rule`]s. Each rule looks at the
//! input string (and, for cross-field rules, at the other fields through a
//! [`Fields`] lookup) and either passes or returns a user-facing message.
//! The first failing rule wins; later rules are never consulted.

use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

const EMPTY: &str = "texte vide";
const MALFORMED: &str = "texte malformé";
const TOO_LONG: &str = "texte trop long";
const HAS_SPACES: &str = "le nom d'utilisateur contient des espaces";
const BAD_EMAIL: &str = "email invalide";
const BAD_PHONE: &str = "numéro de téléphone invalide";
const MISMATCH: &str = "mot de passe différent";

const MAX_LEN: usize = 128;

#[allow(clippy::unwrap_used)]
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?i)^(?:[a-z0-9!#$%&'*+/=?^_`\{|\}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`\{|\}~-]+)*"#,
        r#"|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")"#,
        r"@(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?",
        r"|\[(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}",
        r"(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?",
        r"|[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\])$",
    ))
    .unwrap()
});

// 06/07 or +33 6/+33 7, then four digit pairs, each optionally preceded by a
// space or a dot.
#[allow(clippy::unwrap_used)]
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:0[67]|\+33[\s.]?[67])[\s.]?[0-9]{2}[\s.]?[0-9]{2}[\s.]?[0-9]{2}[\s.]?[0-9]{2}$",
    )
    .unwrap()
});

// ── Field lookup ────────────────────────────────────────────────────

/// Read access to sibling form fields at validation time.
pub trait Fields {
    /// Current value of the field bound to `id`, if any.
    fn field(&self, id: &str) -> Option<String>;
}

/// A lookup with no fields at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFields;

impl Fields for NoFields {
    fn field(&self, _id: &str) -> Option<String> {
        None
    }
}

// ── Rules ───────────────────────────────────────────────────────────

type RuleFn = dyn Fn(&str, &dyn Fields) -> Result<(), String> + Send + Sync;

/// One check in a validator chain.
#[derive(Clone)]
pub struct Rule(Arc<RuleFn>);

impl Rule {
    /// A rule that only looks at the input.
    pub fn new(check: impl Fn(&str) -> Result<(), String> + Send + Sync + 'static) -> Self {
        Self(Arc::new(move |input, _| check(input)))
    }

    /// A rule that may read other fields.
    pub fn with_fields(
        check: impl Fn(&str, &dyn Fields) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(check))
    }

    /// Passes when the input equals the current value of field `id`.
    ///
    /// A missing field compares as the empty string.
    pub fn equals_field(id: impl Into<String>, message: impl Into<String>) -> Self {
        let id = id.into();
        let message = message.into();
        Self::with_fields(move |input, fields| {
            if fields.field(&id).unwrap_or_default() == input {
                Ok(())
            } else {
                Err(message.clone())
            }
        })
    }

    pub fn check(&self, input: &str, fields: &dyn Fields) -> Result<(), String> {
        (self.0)(input, fields)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Rule(..)")
    }
}

pub fn not_empty(input: &str) -> Result<(), String> {
    if input.is_empty() {
        Err(EMPTY.into())
    } else {
        Ok(())
    }
}

pub fn no_leading_space(input: &str) -> Result<(), String> {
    if input.starts_with(' ') {
        Err(MALFORMED.into())
    } else {
        Ok(())
    }
}

/// Fails past 128 characters (Unicode scalar values, not bytes).
pub fn max_length_128(input: &str) -> Result<(), String> {
    if input.chars().count() > MAX_LEN {
        Err(TOO_LONG.into())
    } else {
        Ok(())
    }
}

pub fn no_spaces(input: &str) -> Result<(), String> {
    if input.contains(' ') {
        Err(HAS_SPACES.into())
    } else {
        Ok(())
    }
}

fn pattern_rule(re: &'static LazyLock<Regex>, message: &'static str) -> Rule {
    Rule::new(move |input| {
        if re.is_match(input) {
            Ok(())
        } else {
            Err(message.into())
        }
    })
}

// ── Validator ───────────────────────────────────────────────────────

/// An ordered, short-circuiting chain of rules.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: Vec<Rule>,
}

impl Validator {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Validate without access to other fields.
    pub fn validate(&self, input: &str) -> Result<String, String> {
        self.validate_with(input, &NoFields)
    }

    /// Run the rules in order and return the first failure, or the input
    /// unchanged when every rule passes.
    pub fn validate_with(&self, input: &str, fields: &dyn Fields) -> Result<String, String> {
        for rule in &self.rules {
            rule.check(input, fields)?;
        }
        Ok(input.to_owned())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Non-empty, no leading space, at most 128 characters.
    pub fn valid_string() -> Self {
        Self::new(vec![
            Rule::new(not_empty),
            Rule::new(no_leading_space),
            Rule::new(max_length_128),
        ])
    }

    /// A valid string without any space.
    pub fn username() -> Self {
        let mut v = Self::valid_string();
        v.rules.push(Rule::new(no_spaces));
        v
    }

    pub fn email() -> Self {
        Self::new(vec![pattern_rule(&EMAIL_RE, BAD_EMAIL)])
    }

    /// French mobile numbers, national or `+33` form.
    pub fn phone() -> Self {
        Self::new(vec![pattern_rule(&PHONE_RE, BAD_PHONE)])
    }

    /// Non-empty and equal to the field bound to `field_id`.
    pub fn confirmation(field_id: impl Into<String>) -> Self {
        Self::new(vec![
            Rule::new(not_empty),
            Rule::equals_field(field_id, MISMATCH),
        ])
    }
}
