//! Per-environment working directory layout.

use std::path::{Path, PathBuf};

/// Working directory of one environment: `<session>/<vendor>/<env>`
///
/// Infrastructure files and rendered values live in disjoint subtrees so the
/// two generation tasks never write to the same place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub const TERRAFORM_STATE_FILE: &'static str = "terraform.tfstate";

    pub fn new(session_dir: &Path, vendor: &str, environment: &str) -> Self {
        Self {
            root: session_dir.join(vendor).join(environment),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory the infrastructure tool runs in
    pub fn infra_dir(&self) -> PathBuf {
        self.root.join("infra")
    }

    pub fn values_dir(&self) -> PathBuf {
        self.root.join("values")
    }

    pub fn values_file(&self, unit_name: &str) -> PathBuf {
        self.values_dir().join(format!("{unit_name}.values.yaml"))
    }

    pub fn terraform_state(&self) -> PathBuf {
        self.infra_dir().join(Self::TERRAFORM_STATE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_keyed_by_vendor_and_environment() {
        let ws = Workspace::new(Path::new("/tmp/session"), "aws", "prod");
        assert_eq!(ws.root(), Path::new("/tmp/session/aws/prod"));
        assert_eq!(
            ws.terraform_state(),
            PathBuf::from("/tmp/session/aws/prod/infra/terraform.tfstate")
        );
        assert_eq!(
            ws.values_file("api"),
            PathBuf::from("/tmp/session/aws/prod/values/api.values.yaml")
        );
    }
}
