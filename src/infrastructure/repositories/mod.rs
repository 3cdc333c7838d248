//! Repository implementations

mod state;

pub use state::JsonStateRepository;
