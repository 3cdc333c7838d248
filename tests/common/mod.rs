//! Common test utilities for Nopeus CLI and integration tests.
//!
//! This module provides:
//! - `TestEnv`: isolated project directory plus helpers to run the binary
//! - Fixtures: reusable `nopeus.yaml` content

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

#[allow(unused_imports)]
pub use env::*;
#[allow(unused_imports)]
pub use fixtures::*;
