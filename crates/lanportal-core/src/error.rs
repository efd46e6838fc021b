// ── Core error types ──
//
// Failures surfaced by the UI runtime. Validation failures are normally
// shown inline and never leave the widget; the variant exists so page
// controllers can abort a submit with the same message. Backend failures
// keep the raw response text so the alert shows what the server said.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Validation ───────────────────────────────────────────────────
    #[error("{message}")]
    Validation { message: String },

    // ── Navigation ───────────────────────────────────────────────────
    #[error("No route configured for {path}")]
    RouteNotFound { path: String },

    #[error("Route {path} is configured twice")]
    DuplicateRoute { path: String },

    // ── Authorization ────────────────────────────────────────────────
    #[error("pas connecté")]
    NotAuthenticated,

    #[error("déjà connecté")]
    AlreadyAuthenticated,

    #[error("non autorisé")]
    Forbidden,

    // ── Backend ──────────────────────────────────────────────────────
    #[error(transparent)]
    Service(#[from] lanportal_api::Error),
}

impl CoreError {
    /// Whether the caller lacked the identity or role for the operation,
    /// either by the client-side check or by the backend's answer.
    pub fn is_authorization(&self) -> bool {
        match self {
            Self::NotAuthenticated | Self::AlreadyAuthenticated | Self::Forbidden => true,
            Self::Service(e) => e.is_unauthorized(),
            _ => false,
        }
    }

    /// Whether this failure came from (or stands in for) a backend call.
    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service(_)) || self.is_authorization()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_shows_backend_body() {
        let err = CoreError::from(lanportal_api::Error::Api {
            status: 409,
            body: "nom d'utilisateur déjà pris".into(),
        });
        assert_eq!(err.to_string(), "nom d'utilisateur déjà pris");
        assert!(err.is_service());
        assert!(!err.is_authorization());
    }

    #[test]
    fn backend_rejection_counts_as_authorization() {
        let err = CoreError::from(lanportal_api::Error::Api {
            status: 403,
            body: "forbidden".into(),
        });
        assert!(err.is_authorization());
        assert!(CoreError::Forbidden.is_service());
    }

    #[test]
    fn navigation_errors_are_not_service_errors() {
        let err = CoreError::RouteNotFound {
            path: "/nope".into(),
        };
        assert!(!err.is_service());
        assert_eq!(err.to_string(), "No route configured for /nope");
    }
}
