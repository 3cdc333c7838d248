//! Kubeconfig location shared by helm, kubectl and the cluster connector.

use std::path::PathBuf;

/// `$KUBECONFIG` if set, else `~/.kube/config`
pub fn kubeconfig_path() -> Option<PathBuf> {
    match std::env::var_os("KUBECONFIG") {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => dirs::home_dir().map(|home| home.join(".kube").join("config")),
    }
}
