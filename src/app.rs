//! Application orchestration layer
//!
//! Wires the input thread, the rental state machine and the renderer together. The loop
//! owns the view state; the state machine owns the session.

pub mod headless;

use crate::config::DemoConfig;
use crate::error::Result;
use crate::input::spawn_input_thread;
use crate::render::ui::{UIRenderer, ViewState};
use crate::render::RenderLoopState;
use crate::rental::RentalStateMachine;
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// How long the input thread blocks on the terminal before checking for shutdown
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Application orchestrator
pub struct Application {
    machine: RentalStateMachine,
    ui_renderer: Box<dyn UIRenderer>,
    config: DemoConfig,
}

impl Application {
    /// Create the state machine from the config. Must be called inside a tokio runtime.
    pub fn new(config: DemoConfig, ui_renderer: Box<dyn UIRenderer>) -> Result<Self> {
        config.validate()?;
        let machine = RentalStateMachine::with_settings(config.step_delay_ms, config.force_fail)?;
        Ok(Self {
            machine,
            ui_renderer,
            config,
        })
    }

    pub fn machine(&self) -> &RentalStateMachine {
        &self.machine
    }

    /// Run the interactive loop until the user quits
    pub async fn run(&mut self) -> Result<()> {
        self.ui_renderer.initialize()?;

        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let shutdown = Arc::new(AtomicBool::new(false));
        let input_thread =
            spawn_input_thread(input_tx, Arc::clone(&shutdown), INPUT_POLL_INTERVAL);

        let result = self.event_loop(input_rx).await;

        shutdown.store(true, Ordering::SeqCst);
        if input_thread.join().is_err() {
            debug!("input thread panicked during shutdown");
        }
        self.ui_renderer.cleanup()?;
        result
    }

    /// Render loop fed by input actions, published snapshots and the returned-screen timer
    pub async fn event_loop(
        &mut self,
        mut input_rx: mpsc::UnboundedReceiver<crate::input::InputAction>,
    ) -> Result<()> {
        let (width, height) = self.ui_renderer.get_terminal_size()?;
        let mut snapshots = self.machine.subscribe();
        let mut view_state = ViewState::new(snapshots.borrow_and_update().clone(), width, height);
        let mut render_state = RenderLoopState::new(self.config.returned_reset_delay());

        self.ui_renderer.render(&view_state)?;

        loop {
            tokio::select! {
                action = input_rx.recv() => {
                    let Some(action) = action else { break };
                    if !render_state.process_action(action, &mut view_state, &self.machine) {
                        break;
                    }
                }
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = snapshots.borrow_and_update().clone();
                    render_state.handle_snapshot(snapshot, &mut view_state);
                }
                _ = wait_until(render_state.returned_deadline()) => {
                    render_state.handle_returned_timeout(&mut view_state, &self.machine);
                }
            }

            self.ui_renderer.render(&view_state)?;
        }

        Ok(())
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputAction;
    use crate::render::ui::{MockUIRenderer, Screen};
    use crate::rental::RentalState;

    /// Renderer that shares its recorded frames with the test.
    struct SharedRenderer(Arc<parking_lot::Mutex<MockUIRenderer>>);

    impl UIRenderer for SharedRenderer {
        fn render(&mut self, view_state: &ViewState) -> Result<()> {
            self.0.lock().render(view_state)
        }

        fn initialize(&mut self) -> Result<()> {
            self.0.lock().initialize()
        }

        fn cleanup(&mut self) -> Result<()> {
            self.0.lock().cleanup()
        }

        fn get_terminal_size(&self) -> Result<(u16, u16)> {
            self.0.lock().get_terminal_size()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn event_loop_drives_full_flow() {
        let mock = Arc::new(parking_lot::Mutex::new(MockUIRenderer::new()));
        let config = DemoConfig {
            step_delay_ms: 100,
            ..DemoConfig::default()
        };
        let mut app =
            Application::new(config, Box::new(SharedRenderer(Arc::clone(&mock)))).unwrap();
        let machine = app.machine().clone();

        let (tx, rx) = mpsc::unbounded_channel();
        let driver = async move {
            tx.send(InputAction::Confirm).unwrap(); // splash -> home
            tx.send(InputAction::Confirm).unwrap(); // rent
            tokio::time::sleep(Duration::from_millis(450)).await;
            assert_eq!(machine.snapshot().state, RentalState::Rented);

            tx.send(InputAction::Confirm).unwrap(); // return
            tokio::time::sleep(Duration::from_millis(450)).await;
            assert_eq!(machine.snapshot().state, RentalState::Returned);

            // Returned screen resets on its own
            tokio::time::sleep(Duration::from_millis(2_100)).await;
            assert_eq!(machine.snapshot().state, RentalState::Idle);

            tx.send(InputAction::Quit).unwrap();
        };

        let (result, ()) = tokio::join!(app.event_loop(rx), driver);
        result.unwrap();

        let mut visited = mock.lock().rendered_screens.clone();
        visited.dedup();
        assert_eq!(
            visited,
            vec![
                Screen::Splash,
                Screen::Home,
                Screen::Renting,
                Screen::Rented,
                Screen::Returning,
                Screen::Returned,
                Screen::Home,
            ]
        );
    }

    #[tokio::test]
    async fn rejects_invalid_config() {
        let config = DemoConfig {
            step_delay_ms: 0,
            ..DemoConfig::default()
        };
        assert!(Application::new(config, Box::new(MockUIRenderer::new())).is_err());
    }
}
