//! Flow logging for the demo.
//!
//! Every record goes to the `stroller_demo` target so it can be filtered with
//! `RUST_LOG=stroller_demo=debug` without enabling the rest of the crate.

use log::{debug, warn};

pub const TARGET: &str = "stroller_demo";

pub fn screen_view(screen: &str) {
    debug!(target: TARGET, "ScreenView: {}", screen);
}

pub fn click(button: &str) {
    debug!(target: TARGET, "Click: {}", button);
}

pub fn flow(step: u8, screen: &str) {
    debug!(target: TARGET, "Flow: step={}, screen={}", step, screen);
}

/// Logged at warn so the default `env_logger` filter keeps it off the TUI.
pub fn flow_error(code: &str, at_step: u8) {
    warn!(target: TARGET, "FlowError: code={}, at_step={}", code, at_step);
}
