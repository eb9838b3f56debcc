//! Session models, redacted secrets, and the session event contract.

pub mod event;
pub mod secret;
pub mod session;

pub use event::*;
pub use secret::*;
pub use session::*;
