//! App layer - central state management and command processing
//!
//! The App actor receives UI events, network responses and timer events,
//! updates state, and emits network commands and render state.

pub mod state;
pub mod actor;
pub mod commands;
pub mod options;
pub mod toast;

pub use state::AppState;
pub use actor::AppActor;
pub use options::{FormPhase, OptionsForm};
pub use toast::{Notify, ToastState};
