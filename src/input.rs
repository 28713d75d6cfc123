//! Input subsystem: raw terminal event collection and key binding state machine.

pub mod raw;
pub mod service;

// Public re-exports for convenience. Modules outside this crate should prefer importing
// from `crate::input` rather than reaching into submodules.
pub use service::{spawn_input_thread, InputAction, InputService, InputState, InputStateMachine};
