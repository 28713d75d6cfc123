//! High-level input service.
//!
//! Consumes raw terminal events, runs the input state machine (key bindings plus the step
//! delay editor), and yields domain-level `InputAction`s that the render coordinator
//! consumes.

use crate::error::Result;
use crate::input::raw::{RawInputCollector, RawInputEvent};
use log::error;
use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Current input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Navigation,
    DelayInput,
}

/// High-level input actions emitted by the state machine/service.
#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    /// Primary button of the current screen or dialog (Enter).
    Confirm,
    /// Dismiss a dialog or leave a secondary screen (Esc).
    Back,
    ToggleForceFail,
    StartDelayEdit,
    UpdateDelayBuffer(String),
    /// Raw text typed into the delay editor; parsed by the consumer.
    SubmitDelay(String),
    CancelDelayEdit,
    OpenSettings,
    ExportLogs,
    ShowTerms,
    ShowPrivacy,
    Help,
    Quit,
    Resize {
        width: u16,
        height: u16,
    },
    NoAction,
    InvalidInput,
}

/// Key binding state machine.
pub struct InputStateMachine {
    state: InputState,
    delay_buffer: String,
}

impl InputStateMachine {
    pub fn new() -> Self {
        Self {
            state: InputState::Navigation,
            delay_buffer: String::new(),
        }
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> InputAction {
        if key_event.kind != KeyEventKind::Press {
            return InputAction::NoAction;
        }

        let plain = !key_event
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

        match (self.state, key_event.code) {
            (_, KeyCode::Char('c')) if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.state == InputState::DelayInput {
                    self.leave_delay_input();
                    InputAction::CancelDelayEdit
                } else {
                    InputAction::Quit
                }
            }
            (InputState::Navigation, KeyCode::Enter) => InputAction::Confirm,
            (InputState::Navigation, KeyCode::Esc) => InputAction::Back,
            (InputState::Navigation, KeyCode::Char(ch)) if plain => match ch {
                'f' => InputAction::ToggleForceFail,
                'd' => {
                    self.state = InputState::DelayInput;
                    self.delay_buffer.clear();
                    InputAction::StartDelayEdit
                }
                's' => InputAction::OpenSettings,
                'e' => InputAction::ExportLogs,
                't' => InputAction::ShowTerms,
                'p' => InputAction::ShowPrivacy,
                '?' | 'h' => InputAction::Help,
                'q' => InputAction::Quit,
                _ => InputAction::InvalidInput,
            },
            (InputState::DelayInput, KeyCode::Char(ch)) if plain && ch.is_ascii_graphic() => {
                self.delay_buffer.push(ch);
                InputAction::UpdateDelayBuffer(self.delay_buffer.clone())
            }
            (InputState::DelayInput, KeyCode::Backspace) => {
                self.delay_buffer.pop();
                InputAction::UpdateDelayBuffer(self.delay_buffer.clone())
            }
            (InputState::DelayInput, KeyCode::Enter) => {
                let input = std::mem::take(&mut self.delay_buffer);
                self.state = InputState::Navigation;
                InputAction::SubmitDelay(input)
            }
            (InputState::DelayInput, KeyCode::Esc) => {
                self.leave_delay_input();
                InputAction::CancelDelayEdit
            }
            _ => InputAction::InvalidInput,
        }
    }

    fn leave_delay_input(&mut self) {
        self.state = InputState::Navigation;
        self.delay_buffer.clear();
    }

    pub fn get_delay_buffer(&self) -> &str {
        &self.delay_buffer
    }

    pub fn get_state(&self) -> InputState {
        self.state
    }
}

impl Default for InputStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Service responsible for producing high-level `InputAction`s from terminal events.
pub struct InputService {
    state_machine: InputStateMachine,
    raw_input: RawInputCollector,
}

impl InputService {
    pub fn new() -> Self {
        Self {
            state_machine: InputStateMachine::new(),
            raw_input: RawInputCollector::new(),
        }
    }

    pub fn poll_actions(&mut self, timeout: Option<Duration>) -> Result<Vec<InputAction>> {
        let mut actions = Vec::new();

        if let Some(raw_event) = self.raw_input.poll_event(timeout)? {
            actions.extend(self.process_raw_event(raw_event));

            while let Some(extra_event) = self.raw_input.pop_pending() {
                actions.extend(self.process_raw_event(extra_event));
            }
        }

        Ok(actions)
    }

    pub fn process_event(&mut self, event: Event) -> Vec<InputAction> {
        self.raw_input.process_event(event);
        let mut actions = Vec::new();
        while let Some(raw_event) = self.raw_input.pop_pending() {
            actions.extend(self.process_raw_event(raw_event));
        }
        actions
    }

    fn process_raw_event(&mut self, event: RawInputEvent) -> Option<InputAction> {
        let action = match event {
            RawInputEvent::Key(key_event) => self.state_machine.handle_key_event(key_event),
            RawInputEvent::Resize { width, height } => InputAction::Resize { width, height },
        };

        match action {
            InputAction::NoAction | InputAction::InvalidInput => None,
            _ => Some(action),
        }
    }
}

impl Default for InputService {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn a blocking thread that polls for terminal events and forwards actions to the render loop.
pub fn spawn_input_thread(
    tx: UnboundedSender<InputAction>,
    shutdown: Arc<AtomicBool>,
    poll_interval: Duration,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut service = InputService::new();
        while !shutdown.load(Ordering::SeqCst) {
            match service.poll_actions(Some(poll_interval)) {
                Ok(actions) => {
                    for action in actions {
                        if tx.send(action).is_err() {
                            return;
                        }
                    }
                }
                Err(err) => {
                    error!("Input thread error: {}", err);
                    break;
                }
            }
        }
    })
}
