//! Authenticated session against the remote cache service

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{NopeusError, NopeusResult};

/// Upper bound for a single remote call
pub const REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

const ACTIVE_STATUS: &str = "active";

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    #[serde(default)]
    status: String,
}

/// A verified bearer token plus the client that carries it
#[derive(Clone)]
pub struct RemoteSession {
    client: Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for RemoteSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSession")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl RemoteSession {
    /// Verify `token` once; only an `active` license yields a session
    pub fn authenticate(base_url: &str, token: &str) -> NopeusResult<Self> {
        let client = Client::builder().timeout(REMOTE_TIMEOUT).build()?;
        let session = Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        };

        let url = session.url("/licenses/v1/verify");
        debug!(url = %url, "verifying remote token");
        let response = session
            .client
            .post(&url)
            .json(&json!({ "token": token }))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(NopeusError::RemoteAuth {
                message: format!("verification returned HTTP {}", status.as_u16()),
            });
        }

        let body: VerifyResponse = response.json().map_err(|e| NopeusError::RemoteAuth {
            message: format!("unreadable verification response: {e}"),
        })?;
        if body.status != ACTIVE_STATUS {
            return Err(NopeusError::RemoteAuth {
                message: format!("token status is '{}'", body.status),
            });
        }

        Ok(session)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn get(&self, url: &str) -> RequestBuilder {
        self.authorize(self.client.get(url))
    }

    pub(crate) fn post(&self, url: &str) -> RequestBuilder {
        self.authorize(self.client.post(url))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(header::AUTHORIZATION, format!("Bearer {}", self.token))
    }
}
