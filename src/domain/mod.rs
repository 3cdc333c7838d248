//! Domain Layer
//!
//! Pure deployment logic without I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Environment, DeployableUnit, UnitList, DeploymentSnapshot
//! - `value_objects/` - ContentHash, CloudVendor, Workspace, RegistryCredentials
//! - `services/` - checksum gate and placeholder rendering
//! - `ports/` - traits implemented by the infrastructure layer

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
