//! Domain Value Objects
//!
//! Immutable value types shared across the deploy pipeline.

mod cloud_vendor;
mod hash;
mod registry;
mod workspace;

pub use cloud_vendor::CloudVendor;
pub use hash::ContentHash;
pub use registry::{RegistryCredentials, REGISTRY_SECRET_NAME};
pub use workspace::Workspace;
