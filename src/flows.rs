//! Session flows layered on top of the client instances.

pub mod refresh;

pub use refresh::*;
