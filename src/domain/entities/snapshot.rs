//! Deployment snapshot entity
//!
//! What survives a run: the infrastructure tool's state blob and the list of
//! deployed services, keyed by `<stack>-<env>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSnapshot {
    /// Cache key, `<stack>-<env>`
    #[serde(default)]
    pub name: String,
    pub environment: String,
    pub cloud_vendor: String,
    /// Raw terraform state; empty when none existed yet
    #[serde(default)]
    pub terraform_state: String,
    #[serde(default)]
    pub deployed_services: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl DeploymentSnapshot {
    pub fn cache_key(stack: &str, environment: &str) -> String {
        format!("{stack}-{environment}")
    }

    pub fn has_terraform_state(&self) -> bool {
        !self.terraform_state.trim().is_empty()
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_files_without_optional_fields() {
        let raw = r#"{
            "environment": "prod",
            "cloud_vendor": "aws",
            "terraform_state": "{}",
            "deployed_services": ["api", "web"]
        }"#;
        let snapshot = DeploymentSnapshot::from_json(raw).unwrap();
        assert_eq!(snapshot.name, "");
        assert_eq!(snapshot.deployed_services, vec!["api", "web"]);
        assert!(snapshot.created_at.is_none());
        assert!(snapshot.has_terraform_state());
    }

    #[test]
    fn blank_state_is_not_state() {
        let snapshot = DeploymentSnapshot {
            name: "shop-dev".to_string(),
            environment: "dev".to_string(),
            cloud_vendor: "aws".to_string(),
            terraform_state: "  \n".to_string(),
            deployed_services: vec![],
            created_at: None,
        };
        assert!(!snapshot.has_terraform_state());
    }

    #[test]
    fn cache_key_joins_stack_and_environment() {
        assert_eq!(DeploymentSnapshot::cache_key("shop", "prod"), "shop-prod");
    }
}
