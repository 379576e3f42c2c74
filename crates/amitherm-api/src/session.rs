// ── Connection-scoped PLC session ──
//
// The PLC firmware tracks sessions server-side and only allows a few
// at a time, so a `Session` lives for exactly one operation: open
// (login), one request/response exchange, close (logout). Nothing is
// pooled or kept alive between calls.

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::error::Error;

/// An authenticated session against the PLC web service.
///
/// Obtained from [`Session::open`], which performs the login exchange.
/// The session cookie lives in the client's jar; [`Session::close`]
/// releases the server-side slot (best effort -- the PLC also expires
/// idle sessions on its own).
pub struct Session {
    http: reqwest::Client,
    base: Url,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

impl Session {
    /// Open a session: build a cookie-carrying client and log in.
    pub async fn open(config: &ApiConfig) -> Result<Self, Error> {
        let base = config.base_url()?;
        let timeout_secs = config.timeout.as_secs();
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;

        let session = Self {
            http,
            base,
            timeout_secs,
        };

        let login = LoginRequest {
            username: &config.username,
            password: config.password.expose_secret(),
        };
        let response = session
            .http
            .post(session.url("api/login"))
            .json(&login)
            .send()
            .await
            .map_err(|e| session.map_transport(e))?;

        match response.status() {
            s if s.is_success() => {
                debug!(host = %session.base, "PLC session opened");
                Ok(session)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Authentication {
                message: format!("login rejected with HTTP {}", response.status().as_u16()),
            }),
            status => Err(Error::Api {
                message: response.text().await.unwrap_or_default(),
                status: status.as_u16(),
            }),
        }
    }

    /// GET a JSON payload from a service path.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        trace!(path, "session GET");
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_transport(e))?;

        if !status.is_success() {
            return Err(status_error(status, body));
        }
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// POST a JSON body to a service path, expecting an empty reply.
    pub async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), Error> {
        trace!(path, "session POST");
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }
        Ok(())
    }

    /// Release the session slot on the PLC. Failures are logged and
    /// swallowed; the firmware reaps idle sessions regardless.
    pub async fn close(self) {
        let result = self.http.post(self.url("api/logout")).send().await;
        match result {
            Ok(_) => debug!("PLC session closed"),
            Err(e) => warn!(error = %e, "logout failed (non-fatal)"),
        }
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn url(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        url.set_path(path);
        url
    }

    /// Fold reqwest timeouts into the explicit `Timeout` variant so the
    /// caller sees the configured budget, not an opaque transport error.
    fn map_transport(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(e)
        }
    }
}

fn status_error(status: StatusCode, body: String) -> Error {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Authentication {
            message: "session expired or rejected".into(),
        },
        _ => Error::Api {
            message: body,
            status: status.as_u16(),
        },
    }
}
