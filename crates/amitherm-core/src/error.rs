// ── Core error types ──
//
// User-facing errors from amitherm-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<amitherm_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.
//
// `CoreError` is `Clone` on purpose: a coalesced refresh broadcasts one
// outcome to every waiter, so the error must be shareable by value.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Connectivity errors ──────────────────────────────────────────
    #[error("Cannot connect to PLC at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("PLC connection timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Command errors ───────────────────────────────────────────────
    /// Rejected locally, before any network call.
    #[error("Unsupported value for {field}: {reason}")]
    UnsupportedValue { field: &'static str, reason: String },

    // ── Data errors ──────────────────────────────────────────────────
    /// A projection was requested before any successful refresh.
    #[error("No data has been fetched from the PLC yet")]
    NotYetFetched,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("PLC API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for failures the periodic loop treats as
    /// transient: the cache is kept and the next tick retries.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. } | Self::Timeout { .. } | Self::AuthenticationFailed { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<amitherm_api::Error> for CoreError {
    fn from(err: amitherm_api::Error) -> Self {
        match err {
            amitherm_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            amitherm_api::Error::Transport(ref e) => {
                if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            amitherm_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid PLC URL: {e}"),
            },
            amitherm_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            amitherm_api::Error::Api { message, status } => CoreError::Api {
                message,
                status: Some(status),
            },
            amitherm_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
