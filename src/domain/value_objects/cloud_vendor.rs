//! Cloud vendor the infrastructure is provisioned on.

use std::fmt;

/// Cloud vendor named by the `vendor` configuration key
///
/// Only AWS has infrastructure templates and a cluster connector. Other values
/// are kept verbatim so they can be reported when a vendor-specific step runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CloudVendor {
    Aws,
    Other(String),
}

impl CloudVendor {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "aws" => Self::Aws,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Aws => "aws",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for CloudVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
