//! # stroller-rental - Simulated Stroller Rental Terminal Demo
//!
//! A terminal front end over a small state machine that simulates renting and returning a
//! stroller through timed hardware phases, with forced failures for exercising error paths.
//!
//! ## Features
//!
//! - **Timed Workflows**: Rent and return each run four delayed phases with progress
//! - **Failure Injection**: Force-fail mode makes every workflow fail at its first checkpoint
//! - **Usage Timer**: Elapsed rental time recomputed every second from the start timestamp
//! - **Observable State**: Latest-value and ordered snapshot subscriptions
//! - **Terminal UI**: Screen-per-state navigation with error and info dialogs
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`rental`] - Session snapshot, phase tables and the state machine
//! - [`config`] - Layered demo configuration
//! - [`demo_log`] - Screen, click and flow event logging
//! - [`input`] - Keyboard collection and key binding
//! - [`render`] - Screen navigation and terminal rendering
//! - [`app`] - Application core and component coordination

// Core modules
pub mod error;
pub mod rental;

// Ambient support
pub mod config;
pub mod demo_log;

// Front end
pub mod input;
pub mod render;

pub mod app;

// Re-export commonly used types for convenience
pub use error::{RentalError, Result};

pub use app::Application;
pub use config::DemoConfig;
pub use rental::{RentalState, RentalStateMachine, SessionSnapshot};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
