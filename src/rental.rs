//! Rental core: the simulated rent/return state machine and its observable snapshot.

pub mod clock;
pub mod machine;
pub mod phases;
pub mod publisher;
pub mod state;

pub use clock::Clock;
pub use machine::{RentalStateMachine, TICK_INTERVAL};
pub use phases::{Phase, Workflow, PHASE_COUNT};
pub use publisher::SnapshotPublisher;
pub use state::{RentalState, SessionSnapshot, DEFAULT_STEP_DELAY_MS};
