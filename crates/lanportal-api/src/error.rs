use thiserror::Error;

/// Top-level error type for the `lanportal-api` crate.
///
/// The backend reports failures as a plain-text body next to a non-2xx
/// status. That body is the message shown to the user, so `Api` keeps it
/// verbatim. `lanportal-core` wraps these into its service failures.
#[derive(Debug, Error)]
pub enum Error {
    // ── Backend ─────────────────────────────────────────────────────
    /// Non-success response; `body` is the raw response text.
    #[error("{body}")]
    Api { status: u16, body: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the backend rejected the caller's token or role.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_raw_body() {
        let err = Error::Api {
            status: 400,
            body: "utilisateur inconnu".into(),
        };
        assert_eq!(err.to_string(), "utilisateur inconnu");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn rejected_token_or_role_is_unauthorized() {
        let forbidden = Error::Api {
            status: 403,
            body: String::new(),
        };
        let expired = Error::Api {
            status: 401,
            body: String::new(),
        };
        let missing = Error::Api {
            status: 404,
            body: String::new(),
        };
        assert!(forbidden.is_unauthorized());
        assert!(expired.is_unauthorized());
        assert!(!missing.is_unauthorized());
    }
}
