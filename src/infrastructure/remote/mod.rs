//! Remote snapshot cache over HTTP

mod cache;
mod session;

pub use cache::HttpRemoteCache;
pub use session::{RemoteSession, REMOTE_TIMEOUT};
