//! Domain Services
//!
//! Stateless rules shared by the application layer.

mod checksum;
mod template;

pub use checksum::{build_checksum_map, checksum_map_from_values, should_skip, SkipReason};
pub use template::render_placeholders;
