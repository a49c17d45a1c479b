//! Secure media delivery.
//!
//! A loopback authenticating gateway proxies every manifest and segment
//! fetch to the backend with the learner's bearer credential, plus a
//! session manager that owns the one live playback mount. Casual-extraction
//! deterrence lives in the UI layer; the per-request token check here (and
//! server-side) is the actual protection boundary.

mod gateway;
mod manifest;
mod session;

pub use gateway::MediaGateway;
pub use session::{MediaSessionManager, PlaybackSession};
