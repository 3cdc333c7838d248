//! Command handlers for the `nopeus` binary

pub mod liftoff;
