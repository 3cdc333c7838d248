//! Event Sink Implementations
//!
//! Concrete implementations of DeployEventSink:
//! - JsonEventSink: NDJSON output for CI/automation
//! - ConsoleEventSink: Human-readable progress lines

mod console;
mod json;

pub use console::ConsoleEventSink;
pub use json::JsonEventSink;
