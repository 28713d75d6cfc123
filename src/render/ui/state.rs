//! UI state management structures
//!
//! The view state mirrors the latest session snapshot plus the purely presentational
//! state (current screen, open dialog, status line) that the state machine never sees.

use crate::rental::{RentalState, SessionSnapshot};

/// Screens of the demo, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Splash,
    Home,
    Settings,
    Renting,
    Rented,
    Returning,
    Returned,
}

impl Screen {
    pub fn name(self) -> &'static str {
        match self {
            Screen::Splash => "splash",
            Screen::Home => "home",
            Screen::Settings => "settings",
            Screen::Renting => "renting",
            Screen::Rented => "rented",
            Screen::Returning => "returning",
            Screen::Returned => "returned",
        }
    }

    /// Screen to show for a session state, given the screen currently shown.
    ///
    /// Idle keeps the splash and settings screens; errors keep the current screen and are
    /// shown as a dialog on top of it.
    pub fn for_state(state: RentalState, current: Screen) -> Screen {
        match state {
            RentalState::Idle => match current {
                Screen::Splash | Screen::Settings => current,
                _ => Screen::Home,
            },
            RentalState::Renting => Screen::Renting,
            RentalState::Rented => Screen::Rented,
            RentalState::Returning => Screen::Returning,
            RentalState::Returned => Screen::Returned,
            RentalState::Error => current,
        }
    }
}

/// Modal dialogs drawn over the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Error { message: String },
    Info { title: String, body: String },
}

/// Everything the renderer needs to draw one frame
#[derive(Debug)]
pub struct ViewState {
    pub screen: Screen,
    pub dialog: Option<Dialog>,
    /// Latest snapshot received from the state machine
    pub snapshot: SessionSnapshot,
    pub status_line: StatusLine,

    /// Viewport dimensions
    pub viewport_width: u16,
    pub viewport_height: u16,
}

impl ViewState {
    /// Create the initial view state, starting on the splash screen
    pub fn new(snapshot: SessionSnapshot, viewport_width: u16, viewport_height: u16) -> Self {
        Self {
            screen: Screen::Splash,
            dialog: None,
            snapshot,
            status_line: StatusLine::new(),
            viewport_width,
            viewport_height,
        }
    }

    /// Update terminal dimensions. Returns true if dimensions actually changed
    pub fn update_terminal_size(&mut self, width: u16, height: u16) -> bool {
        let changed = self.viewport_width != width || self.viewport_height != height;
        if changed {
            self.viewport_width = width;
            self.viewport_height = height;
        }
        changed
    }

    pub fn format_status_line(&self) -> String {
        self.status_line.format_status_line(&self.snapshot)
    }
}

/// Status line information
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    pub message: Option<String>,
    /// Buffer of the step delay editor while it is open
    pub delay_prompt: Option<String>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a temporary message
    pub fn set_message(&mut self, message: String) {
        self.message = Some(message);
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn set_delay_prompt(&mut self) {
        self.delay_prompt = Some(String::new());
    }

    pub fn update_delay_prompt(&mut self, buffer: String) {
        self.delay_prompt = Some(buffer);
    }

    pub fn clear_delay_prompt(&mut self) {
        self.delay_prompt = None;
    }

    /// Format the status line for display
    pub fn format_status_line(&self, snapshot: &SessionSnapshot) -> String {
        if let Some(buffer) = &self.delay_prompt {
            return format!("Step delay (ms): {}", buffer);
        }

        let force_fail = if snapshot.force_fail { "on" } else { "off" };
        let settings = format!(
            "delay {}ms | force-fail {}",
            snapshot.step_delay_ms, force_fail
        );
        match self.message {
            Some(ref message) => format!("{} | {}", settings, message),
            None => settings,
        }
    }
}

/// Format a usage duration as `1h 2m 3s`, `2m 3s` or `3s`.
pub fn format_usage_time(elapsed_sec: u64) -> String {
    let hours = elapsed_sec / 3600;
    let minutes = (elapsed_sec % 3600) / 60;
    let seconds = elapsed_sec % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_state_creation() {
        let state = ViewState::new(SessionSnapshot::default(), 80, 24);
        assert_eq!(state.screen, Screen::Splash);
        assert!(state.dialog.is_none());
        assert_eq!(state.viewport_width, 80);
        assert_eq!(state.viewport_height, 24);
    }

    #[test]
    fn test_screen_for_state() {
        assert_eq!(
            Screen::for_state(RentalState::Idle, Screen::Splash),
            Screen::Splash
        );
        assert_eq!(
            Screen::for_state(RentalState::Idle, Screen::Settings),
            Screen::Settings
        );
        assert_eq!(
            Screen::for_state(RentalState::Idle, Screen::Returned),
            Screen::Home
        );
        assert_eq!(
            Screen::for_state(RentalState::Renting, Screen::Home),
            Screen::Renting
        );
        assert_eq!(
            Screen::for_state(RentalState::Error, Screen::Returning),
            Screen::Returning
        );
    }

    #[test]
    fn test_status_line_format() {
        let mut status = StatusLine::new();
        let mut snapshot = SessionSnapshot::with_config(1500, false);

        assert_eq!(
            status.format_status_line(&snapshot),
            "delay 1500ms | force-fail off"
        );

        snapshot.force_fail = true;
        status.set_message("Log export is not available".to_string());
        assert_eq!(
            status.format_status_line(&snapshot),
            "delay 1500ms | force-fail on | Log export is not available"
        );

        status.set_delay_prompt();
        assert_eq!(status.format_status_line(&snapshot), "Step delay (ms): ");
        status.update_delay_prompt("30".to_string());
        assert_eq!(status.format_status_line(&snapshot), "Step delay (ms): 30");

        status.clear_delay_prompt();
        status.clear_message();
        assert_eq!(
            status.format_status_line(&snapshot),
            "delay 1500ms | force-fail on"
        );
    }

    #[test]
    fn test_usage_time_format() {
        assert_eq!(format_usage_time(0), "0s");
        assert_eq!(format_usage_time(59), "59s");
        assert_eq!(format_usage_time(61), "1m 1s");
        assert_eq!(format_usage_time(3600), "1h 0m 0s");
        assert_eq!(format_usage_time(3725), "1h 2m 5s");
    }

    #[test]
    fn test_terminal_resize() {
        let mut state = ViewState::new(SessionSnapshot::default(), 80, 24);
        assert!(!state.update_terminal_size(80, 24));
        assert!(state.update_terminal_size(120, 30));
        assert_eq!(state.viewport_width, 120);
        assert_eq!(state.viewport_height, 30);
    }
}
