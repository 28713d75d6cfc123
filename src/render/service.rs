//! Render coordination.
//!
//! Mediates between input actions, the rental state machine, and the view state: actions
//! are turned into state machine operations, and published snapshots are turned into
//! screen navigation and dialogs.

use crate::demo_log;
use crate::input::InputAction;
use crate::render::ui::{Dialog, Screen, ViewState};
use crate::rental::{RentalState, RentalStateMachine, SessionSnapshot};
use std::time::Duration;
use tokio::time::Instant;

const TERMS_TEXT: &str = "Terms of service are not part of this demo build.";
const PRIVACY_TEXT: &str = "This demo collects no personal data.";

/// Tracks render-related state that must persist across input actions and snapshots.
pub struct RenderLoopState {
    returned_reset: Duration,
    returned_deadline: Option<Instant>,
}

impl RenderLoopState {
    pub fn new(returned_reset: Duration) -> Self {
        Self {
            returned_reset,
            returned_deadline: None,
        }
    }

    /// When the returned screen should fall back to home, if it is showing.
    pub fn returned_deadline(&self) -> Option<Instant> {
        self.returned_deadline
    }

    /// Apply an input action. Returns false when the application should quit.
    pub fn process_action(
        &mut self,
        action: InputAction,
        view_state: &mut ViewState,
        machine: &RentalStateMachine,
    ) -> bool {
        match action {
            InputAction::Quit => return false,
            InputAction::Resize { width, height } => {
                view_state.update_terminal_size(width, height);
                return true;
            }
            InputAction::StartDelayEdit => {
                view_state.status_line.set_delay_prompt();
                return true;
            }
            InputAction::UpdateDelayBuffer(buffer) => {
                view_state.status_line.update_delay_prompt(buffer);
                return true;
            }
            InputAction::CancelDelayEdit => {
                view_state.status_line.clear_delay_prompt();
                return true;
            }
            InputAction::ToggleForceFail => {
                demo_log::click("force_fail");
                machine.toggle_force_fail();
                self.sync(machine, view_state);
                return true;
            }
            InputAction::SubmitDelay(input) => {
                view_state.status_line.clear_delay_prompt();
                // Non-numeric and non-positive input is dropped without feedback.
                if let Ok(ms) = input.trim().parse::<i64>() {
                    machine.update_step_delay(ms);
                }
                self.sync(machine, view_state);
                return true;
            }
            _ => {}
        }

        if view_state.dialog.is_some() {
            self.process_dialog_action(action, view_state, machine);
            return true;
        }

        match (view_state.screen, action) {
            (Screen::Splash, InputAction::Confirm) => {
                demo_log::click("start");
                self.navigate(view_state, Screen::Home);
            }
            (Screen::Home, InputAction::Confirm) => {
                demo_log::click("rent");
                view_state.status_line.clear_message();
                machine.start_renting();
                self.sync(machine, view_state);
            }
            (Screen::Home, InputAction::OpenSettings) => {
                demo_log::click("settings");
                self.navigate(view_state, Screen::Settings);
            }
            (Screen::Home, InputAction::Help) => {
                demo_log::click("help");
                view_state
                    .status_line
                    .set_message("Help: press Enter to start renting".to_string());
            }
            (Screen::Settings, InputAction::Back) => {
                self.navigate(view_state, Screen::Home);
            }
            (Screen::Settings, InputAction::ExportLogs) => {
                demo_log::click("export_logs");
                view_state
                    .status_line
                    .set_message("Log export is not available in the demo".to_string());
            }
            (Screen::Settings, InputAction::ShowTerms) => {
                demo_log::click("terms");
                view_state.dialog = Some(Dialog::Info {
                    title: "Terms of Service".to_string(),
                    body: TERMS_TEXT.to_string(),
                });
            }
            (Screen::Settings, InputAction::ShowPrivacy) => {
                demo_log::click("privacy");
                view_state.dialog = Some(Dialog::Info {
                    title: "Privacy Policy".to_string(),
                    body: PRIVACY_TEXT.to_string(),
                });
            }
            (Screen::Rented, InputAction::Confirm) => {
                demo_log::click("return");
                machine.start_returning();
                self.sync(machine, view_state);
            }
            (Screen::Returned, InputAction::Confirm) => {
                demo_log::click("home");
                self.go_home(view_state, machine);
            }
            _ => {}
        }
        true
    }

    fn process_dialog_action(
        &mut self,
        action: InputAction,
        view_state: &mut ViewState,
        machine: &RentalStateMachine,
    ) {
        let showing_error = match view_state.dialog {
            Some(Dialog::Error { .. }) => true,
            Some(Dialog::Info { .. }) => false,
            None => return,
        };

        match (showing_error, action) {
            (true, InputAction::Confirm) => {
                demo_log::click("retry");
                // A held stroller means the return attempt failed.
                let was_returning = machine.snapshot().has_stroller();
                machine.retry_after_error();
                if was_returning {
                    machine.start_returning();
                } else {
                    machine.start_renting();
                }
                self.sync(machine, view_state);
            }
            (true, InputAction::Back) => {
                demo_log::click("cancel");
                machine.retry_after_error();
                self.sync(machine, view_state);
            }
            (false, InputAction::Confirm | InputAction::Back) => {
                view_state.dialog = None;
            }
            _ => {}
        }
    }

    /// Apply a snapshot published by the state machine.
    pub fn handle_snapshot(&mut self, snapshot: SessionSnapshot, view_state: &mut ViewState) {
        let target = Screen::for_state(snapshot.state, view_state.screen);

        match (&snapshot.error_message, snapshot.state) {
            (Some(message), RentalState::Error) => {
                view_state.dialog = Some(Dialog::Error {
                    message: message.clone(),
                });
            }
            _ => {
                if matches!(view_state.dialog, Some(Dialog::Error { .. })) {
                    view_state.dialog = None;
                }
            }
        }

        if snapshot.state == RentalState::Returned {
            if self.returned_deadline.is_none() {
                self.returned_deadline = Some(Instant::now() + self.returned_reset);
            }
        } else {
            self.returned_deadline = None;
        }

        view_state.snapshot = snapshot;
        self.navigate(view_state, target);
    }

    /// The returned screen timed out; go back home.
    pub fn handle_returned_timeout(
        &mut self,
        view_state: &mut ViewState,
        machine: &RentalStateMachine,
    ) {
        self.returned_deadline = None;
        if machine.snapshot().state == RentalState::Returned {
            self.go_home(view_state, machine);
        }
    }

    fn go_home(&mut self, view_state: &mut ViewState, machine: &RentalStateMachine) {
        self.returned_deadline = None;
        machine.reset();
        self.sync(machine, view_state);
    }

    /// Pull the current snapshot so the view reflects an operation immediately.
    fn sync(&mut self, machine: &RentalStateMachine, view_state: &mut ViewState) {
        self.handle_snapshot(machine.snapshot(), view_state);
    }

    fn navigate(&self, view_state: &mut ViewState, target: Screen) {
        if view_state.screen != target {
            view_state.screen = target;
            demo_log::screen_view(target.name());
        }
    }
}
