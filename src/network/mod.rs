//! Network layer - enhancement uploads and image downloads
//!
//! The Network actor receives commands and sends back responses.

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
