//! Private container registry credentials.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Name of the image pull secret every service references
pub const REGISTRY_SECRET_NAME: &str = "dockerconfig";

/// Credentials for the `kubernetes.io/dockerconfigjson` pull secret
#[derive(Clone, PartialEq, Eq)]
pub struct RegistryCredentials {
    pub server: String,
    pub username: String,
    pub password: String,
    pub email: String,
}

impl RegistryCredentials {
    pub const SERVER_VAR: &'static str = "NOPEUS_DOCKER_SERVER";
    pub const USERNAME_VAR: &'static str = "NOPEUS_DOCKER_USERNAME";
    pub const PASSWORD_VAR: &'static str = "NOPEUS_DOCKER_PASSWORD";
    pub const EMAIL_VAR: &'static str = "NOPEUS_DOCKER_EMAIL";

    /// Read the four registry variables; `None` unless all are set and non-empty.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Some(Self {
            server: get(Self::SERVER_VAR)?,
            username: get(Self::USERNAME_VAR)?,
            password: get(Self::PASSWORD_VAR)?,
            email: get(Self::EMAIL_VAR)?,
        })
    }

    /// Body of the `.dockerconfigjson` key
    pub fn docker_config_json(&self) -> String {
        let auth = STANDARD.encode(format!("{}:{}", self.username, self.password));
        let entry = serde_json::json!({
            "username": self.username,
            "password": self.password,
            "email": self.email,
            "auth": auth,
        });
        let mut auths = serde_json::Map::new();
        auths.insert(self.server.clone(), entry);
        serde_json::json!({ "auths": auths }).to_string()
    }
}

impl std::fmt::Debug for RegistryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryCredentials")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup<'a>(vars: &'a HashMap<&'a str, &'a str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| vars.get(key).map(|v| v.to_string())
    }

    #[test]
    fn all_variables_required() {
        let mut vars = HashMap::new();
        vars.insert(RegistryCredentials::SERVER_VAR, "ghcr.io");
        vars.insert(RegistryCredentials::USERNAME_VAR, "bot");
        vars.insert(RegistryCredentials::PASSWORD_VAR, "secret");
        assert!(RegistryCredentials::from_lookup(lookup(&vars)).is_none());

        vars.insert(RegistryCredentials::EMAIL_VAR, "bot@example.com");
        let creds = RegistryCredentials::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(creds.server, "ghcr.io");
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let mut vars = HashMap::new();
        vars.insert(RegistryCredentials::SERVER_VAR, "ghcr.io");
        vars.insert(RegistryCredentials::USERNAME_VAR, "");
        vars.insert(RegistryCredentials::PASSWORD_VAR, "secret");
        vars.insert(RegistryCredentials::EMAIL_VAR, "bot@example.com");
        assert!(RegistryCredentials::from_lookup(lookup(&vars)).is_none());
    }

    #[test]
    fn docker_config_contains_basic_auth() {
        let creds = RegistryCredentials {
            server: "ghcr.io".to_string(),
            username: "bot".to_string(),
            password: "secret".to_string(),
            email: "bot@example.com".to_string(),
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&creds.docker_config_json()).unwrap();
        assert_eq!(parsed["auths"]["ghcr.io"]["auth"], "Ym90OnNlY3JldA==");
        assert_eq!(parsed["auths"]["ghcr.io"]["email"], "bot@example.com");
    }

    #[test]
    fn debug_redacts_password() {
        let creds = RegistryCredentials {
            server: "s".to_string(),
            username: "u".to_string(),
            password: "hunter2".to_string(),
            email: "e".to_string(),
        };
        assert!(!format!("{creds:?}").contains("hunter2"));
    }
}
