//! HTTP remote cache
//!
//! `POST /artifacts/v1/state` uploads a snapshot, `GET /artifacts/v1/state/<key>`
//! downloads one. A 404 on download means nothing was cached yet.

use reqwest::StatusCode;
use tracing::debug;

use super::RemoteSession;
use crate::domain::entities::DeploymentSnapshot;
use crate::domain::ports::RemoteCache;
use crate::error::{NopeusError, NopeusResult};

const STATE_PATH: &str = "/artifacts/v1/state";

#[derive(Debug, Clone)]
pub struct HttpRemoteCache {
    session: RemoteSession,
}

impl HttpRemoteCache {
    pub fn new(session: RemoteSession) -> Self {
        Self { session }
    }
}

impl RemoteCache for HttpRemoteCache {
    fn push(&self, snapshot: &DeploymentSnapshot) -> NopeusResult<()> {
        let url = self.session.url(STATE_PATH);
        debug!(url = %url, key = %snapshot.name, "pushing snapshot");

        let response = self.session.post(&url).json(snapshot).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(NopeusError::RemoteStatus {
                status: status.as_u16(),
                url,
            });
        }
        Ok(())
    }

    fn pull(&self, key: &str) -> NopeusResult<Option<DeploymentSnapshot>> {
        let url = self.session.url(&format!("{STATE_PATH}/{key}"));
        debug!(url = %url, "pulling snapshot");

        let response = self.session.get(&url).send()?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(NopeusError::RemoteStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text()?;
        DeploymentSnapshot::from_json(&body)
            .map(Some)
            .map_err(|e| NopeusError::StateCorrupted {
                path: url.into(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};

    fn cache(server: &mut ServerGuard) -> HttpRemoteCache {
        server
            .mock("POST", "/licenses/v1/verify")
            .with_status(200)
            .with_body(r#"{"status":"active"}"#)
            .create();
        HttpRemoteCache::new(RemoteSession::authenticate(&server.url(), "tok").unwrap())
    }

    fn snapshot() -> DeploymentSnapshot {
        DeploymentSnapshot {
            name: "shop-prod".to_string(),
            environment: "prod".to_string(),
            cloud_vendor: "aws".to_string(),
            terraform_state: "{}".to_string(),
            deployed_services: vec!["api".to_string()],
            created_at: None,
        }
    }

    #[test]
    fn push_sends_snapshot_with_bearer_token() {
        let mut server = Server::new();
        let cache = cache(&mut server);
        let mock = server
            .mock("POST", "/artifacts/v1/state")
            .match_header("authorization", "Bearer tok")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "name": "shop-prod",
                "environment": "prod",
                "deployed_services": ["api"]
            })))
            .with_status(200)
            .create();

        cache.push(&snapshot()).unwrap();
        mock.assert();
    }

    #[test]
    fn push_rejects_server_error() {
        let mut server = Server::new();
        let cache = cache(&mut server);
        server
            .mock("POST", "/artifacts/v1/state")
            .with_status(500)
            .create();

        assert!(matches!(
            cache.push(&snapshot()),
            Err(NopeusError::RemoteStatus { status: 500, .. })
        ));
    }

    #[test]
    fn pull_returns_snapshot() {
        let mut server = Server::new();
        let cache = cache(&mut server);
        let body = snapshot().to_json().unwrap();
        server
            .mock("GET", "/artifacts/v1/state/shop-prod")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_body(body)
            .create();

        assert_eq!(cache.pull("shop-prod").unwrap(), Some(snapshot()));
    }

    #[test]
    fn pull_not_found_is_absent() {
        let mut server = Server::new();
        let cache = cache(&mut server);
        server
            .mock("GET", "/artifacts/v1/state/shop-prod")
            .with_status(404)
            .create();

        assert_eq!(cache.pull("shop-prod").unwrap(), None);
    }

    #[test]
    fn pull_other_failure_is_error() {
        let mut server = Server::new();
        let cache = cache(&mut server);
        server
            .mock("GET", "/artifacts/v1/state/shop-prod")
            .with_status(503)
            .create();

        assert!(matches!(
            cache.pull("shop-prod"),
            Err(NopeusError::RemoteStatus { status: 503, .. })
        ));
    }

    #[test]
    fn lock_and_unlock_are_no_ops() {
        let mut server = Server::new();
        let cache = cache(&mut server);
        cache.lock("shop-prod").unwrap();
        cache.unlock("shop-prod").unwrap();
    }
}
