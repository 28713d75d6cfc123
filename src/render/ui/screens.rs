//! Text content of each screen and dialog, independent of terminal styling.

use crate::rental::{Workflow, PHASE_COUNT};
use crate::render::ui::state::{format_usage_time, Dialog, Screen, ViewState};

/// Unstyled content of one screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenContent {
    pub title: String,
    pub body: Vec<String>,
    /// Index into `body` of the line describing the running phase, if any
    pub progress_line: Option<usize>,
    pub hint: String,
}

impl ScreenContent {
    fn new(title: &str, body: Vec<String>, hint: &str) -> Self {
        Self {
            title: title.to_string(),
            body,
            progress_line: None,
            hint: hint.to_string(),
        }
    }
}

pub fn screen_content(view_state: &ViewState) -> ScreenContent {
    let snapshot = &view_state.snapshot;
    let stroller = snapshot.stroller_id.as_deref().unwrap_or("unknown");

    match view_state.screen {
        Screen::Splash => ScreenContent::new(
            "Electric Stroller Rental",
            vec!["Demo mode: runs without any permissions".to_string()],
            "Enter: start   q: quit",
        ),
        Screen::Home => ScreenContent::new(
            "Electric Stroller Rental",
            vec![
                "Press Enter to rent a stroller.".to_string(),
                String::new(),
                "Debug controls".to_string(),
                format!("  Step delay: {} ms", snapshot.step_delay_ms),
                format!(
                    "  Force fail: {}",
                    if snapshot.force_fail { "on" } else { "off" }
                ),
            ],
            "Enter: rent   d: edit delay   f: toggle force fail   s: settings   ?: help   q: quit",
        ),
        Screen::Settings => ScreenContent::new(
            "Settings",
            vec![
                "Demo mode: no real Bluetooth communication takes place.".to_string(),
                "e  Export logs / diagnostics".to_string(),
                "t  Terms of service".to_string(),
                "p  Privacy policy".to_string(),
            ],
            "Esc: back",
        ),
        Screen::Renting => progress_content("Renting", Workflow::Rent, snapshot.current_step),
        Screen::Returning => {
            progress_content("Returning", Workflow::Return, snapshot.current_step)
        }
        Screen::Rented => ScreenContent::new(
            "Rental Complete",
            vec![
                "The stroller is in use.".to_string(),
                format!("Stroller ID: {}", stroller),
                format!("Usage time: {}", format_usage_time(snapshot.elapsed_sec)),
            ],
            "Enter: start return",
        ),
        Screen::Returned => ScreenContent::new(
            "Return Complete",
            vec![
                format!("Stroller ID: {}", stroller),
                format!("Usage time: {}", format_usage_time(snapshot.elapsed_sec)),
            ],
            "Enter: home (returns automatically)",
        ),
    }
}

fn progress_content(title: &str, workflow: Workflow, step: u8) -> ScreenContent {
    let mut content = ScreenContent::new(
        title,
        vec![
            workflow.label(step).to_string(),
            format!("Step {} / {}", usize::from(step) + 1, PHASE_COUNT),
        ],
        "Please wait...",
    );
    content.progress_line = Some(0);
    content
}

/// Title, body and key hint of a dialog.
pub fn dialog_content(dialog: &Dialog) -> (String, String, String) {
    match dialog {
        Dialog::Error { message } => (
            "Error".to_string(),
            message.clone(),
            "Enter: retry   Esc: cancel".to_string(),
        ),
        Dialog::Info { title, body } => (title.clone(), body.clone(), "Esc: close".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rental::{RentalState, SessionSnapshot};

    fn view(screen: Screen, snapshot: SessionSnapshot) -> ViewState {
        let mut state = ViewState::new(snapshot, 80, 24);
        state.screen = screen;
        state
    }

    #[test]
    fn renting_shows_phase_label_and_step() {
        let snapshot = SessionSnapshot {
            state: RentalState::Renting,
            current_step: 2,
            ..SessionSnapshot::default()
        };
        let content = screen_content(&view(Screen::Renting, snapshot));

        assert_eq!(content.title, "Renting");
        assert_eq!(content.body[0], "Releasing lock...");
        assert_eq!(content.body[1], "Step 3 / 4");
        assert_eq!(content.progress_line, Some(0));
    }

    #[test]
    fn returned_shows_stroller_and_usage() {
        let snapshot = SessionSnapshot {
            state: RentalState::Returned,
            stroller_id: Some("STR-1234".to_string()),
            start_at: Some(0),
            elapsed_sec: 125,
            ..SessionSnapshot::default()
        };
        let content = screen_content(&view(Screen::Returned, snapshot));

        assert_eq!(
            content.body,
            vec!["Stroller ID: STR-1234", "Usage time: 2m 5s"]
        );
    }

    #[test]
    fn home_lists_debug_controls() {
        let content = screen_content(&view(Screen::Home, SessionSnapshot::with_config(750, true)));
        assert!(content.body.contains(&"  Step delay: 750 ms".to_string()));
        assert!(content.body.contains(&"  Force fail: on".to_string()));
    }

    #[test]
    fn error_dialog_offers_retry() {
        let (title, body, hint) = dialog_content(&Dialog::Error {
            message: "unlock failed".to_string(),
        });
        assert_eq!(title, "Error");
        assert_eq!(body, "unlock failed");
        assert!(hint.contains("retry"));
    }
}
