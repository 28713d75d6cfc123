//! The rental/return state machine.
//!
//! Operations never block: timed workflows and the elapsed-time ticker run as tokio tasks
//! that share the session behind a mutex. Each task kind owns a generation counter; a task
//! only mutates the session while its generation is still current, so a superseded
//! sequence or ticker can never overwrite newer state.

use crate::demo_log;
use crate::error::{RentalError, Result};
use crate::rental::clock::Clock;
use crate::rental::phases::{Phase, Workflow};
use crate::rental::publisher::SnapshotPublisher;
use crate::rental::state::{RentalState, SessionSnapshot, DEFAULT_STEP_DELAY_MS};
use log::debug;
use parking_lot::Mutex;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_stream::wrappers::WatchStream;

/// Interval between elapsed-time recomputations while rented.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Handle to the rental session. Clones share the same session.
#[derive(Debug, Clone)]
pub struct RentalStateMachine {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    session: Mutex<Session>,
    publisher: SnapshotPublisher,
    clock: Clock,
    runtime: Handle,
}

#[derive(Debug)]
struct Session {
    snapshot: SessionSnapshot,
    sequence: TaskSlot,
    ticker: TaskSlot,
}

/// Generation-guarded slot for one kind of background task.
#[derive(Debug, Default)]
struct TaskSlot {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl TaskSlot {
    /// Invalidate the running task (if any) and return the new generation.
    fn supersede(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

/// What a sequence task does after applying one phase.
enum PhaseOutcome {
    Continue,
    Finished,
}

impl RentalStateMachine {
    /// Create a machine with the default step delay. Must be called inside a tokio runtime.
    pub fn new() -> Result<Self> {
        Self::with_settings(DEFAULT_STEP_DELAY_MS, false)
    }

    pub fn with_settings(step_delay_ms: u64, force_fail: bool) -> Result<Self> {
        Self::with_clock(step_delay_ms, force_fail, Clock::system())
    }

    pub fn with_clock(step_delay_ms: u64, force_fail: bool, clock: Clock) -> Result<Self> {
        if step_delay_ms == 0 {
            return Err(RentalError::invalid_argument(
                "step delay must be a positive number of milliseconds",
            ));
        }
        let runtime = Handle::try_current().map_err(|err| RentalError::RuntimeUnavailable {
            message: err.to_string(),
        })?;

        let snapshot = SessionSnapshot::with_config(step_delay_ms, force_fail);
        Ok(Self {
            shared: Arc::new(Shared {
                publisher: SnapshotPublisher::new(snapshot.clone()),
                session: Mutex::new(Session {
                    snapshot,
                    sequence: TaskSlot::default(),
                    ticker: TaskSlot::default(),
                }),
                clock,
                runtime,
            }),
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.publisher.current()
    }

    /// Latest-value subscription; the current snapshot is available immediately.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.publisher.subscribe()
    }

    /// Every snapshot published from now on, in mutation order.
    pub fn updates(&self) -> broadcast::Receiver<SessionSnapshot> {
        self.shared.publisher.updates()
    }

    pub fn snapshot_stream(&self) -> WatchStream<SessionSnapshot> {
        self.shared.publisher.stream()
    }

    pub fn start_renting(&self) {
        self.shared.start_workflow(Workflow::Rent);
    }

    pub fn start_returning(&self) {
        self.shared.start_workflow(Workflow::Return);
    }

    /// Leave the error state without re-running the failed workflow.
    ///
    /// Returns to `Rented` (resuming the elapsed timer from the original start) when a
    /// stroller is held, otherwise back to `Idle`. No-op outside of `Error`.
    pub fn retry_after_error(&self) {
        let shared = &self.shared;
        let mut session = shared.session.lock();
        if session.snapshot.state != RentalState::Error {
            debug!("retry ignored in state {}", session.snapshot.state.as_str());
            return;
        }

        match session.snapshot.start_at.filter(|_| session.snapshot.has_stroller()) {
            Some(start_at) => {
                let snapshot = &mut session.snapshot;
                snapshot.state = RentalState::Rented;
                snapshot.current_step = 0;
                snapshot.error_message = None;
                snapshot.elapsed_sec = snapshot
                    .elapsed_sec
                    .max(shared.clock.elapsed_secs_since(start_at));
                shared.publisher.publish(snapshot.clone());
                shared.start_ticker(&mut session);
            }
            None => {
                session.snapshot = session.snapshot.cleared();
                shared.publisher.publish(session.snapshot.clone());
            }
        }
    }

    pub fn reset(&self) {
        let mut session = self.shared.session.lock();
        session.sequence.supersede();
        session.ticker.supersede();
        session.snapshot = session.snapshot.cleared();
        self.shared.publisher.publish(session.snapshot.clone());
    }

    /// Set the per-phase delay. Non-positive values are ignored.
    pub fn update_step_delay(&self, ms: i64) {
        if ms <= 0 {
            debug!("ignoring non-positive step delay {}", ms);
            return;
        }
        let mut session = self.shared.session.lock();
        session.snapshot.step_delay_ms = ms as u64;
        self.shared.publisher.publish(session.snapshot.clone());
    }

    pub fn toggle_force_fail(&self) {
        let mut session = self.shared.session.lock();
        session.snapshot.force_fail = !session.snapshot.force_fail;
        self.shared.publisher.publish(session.snapshot.clone());
    }
}

impl Shared {
    fn start_workflow(self: &Arc<Self>, workflow: Workflow) {
        let mut session = self.session.lock();
        // Elapsed time only advances while rented.
        session.ticker.supersede();
        let generation = session.sequence.supersede();

        let snapshot = &mut session.snapshot;
        let delay = Duration::from_millis(snapshot.step_delay_ms);
        let force_fail = snapshot.force_fail;
        snapshot.state = match workflow {
            Workflow::Rent => RentalState::Renting,
            Workflow::Return => RentalState::Returning,
        };
        snapshot.current_step = 0;
        snapshot.error_message = None;
        self.publisher.publish(snapshot.clone());
        demo_log::flow(0, workflow.name());

        let task = run_sequence(Arc::clone(self), workflow, generation, delay, force_fail);
        session.sequence.handle = Some(self.runtime.spawn(task));
    }

    fn apply_phase(
        self: &Arc<Self>,
        workflow: Workflow,
        generation: u64,
        index: usize,
        phase: &Phase,
        force_fail: bool,
    ) -> PhaseOutcome {
        let mut session = self.session.lock();
        if !session.sequence.is_current(generation) {
            debug!("discarding superseded {} sequence", workflow.name());
            return PhaseOutcome::Finished;
        }

        if let Err(err) = phase.check(force_fail) {
            let message = err.to_string();
            demo_log::flow_error(&message, index as u8);
            session.sequence.handle = None;
            let snapshot = &mut session.snapshot;
            snapshot.state = RentalState::Error;
            snapshot.current_step = 0;
            snapshot.error_message = Some(message);
            self.publisher.publish(snapshot.clone());
            return PhaseOutcome::Finished;
        }

        if let Some(step) = phase.advance_to {
            session.snapshot.current_step = step;
            self.publisher.publish(session.snapshot.clone());
            demo_log::flow(step, workflow.name());
            return PhaseOutcome::Continue;
        }

        session.sequence.handle = None;
        match workflow {
            Workflow::Rent => {
                let snapshot = &mut session.snapshot;
                snapshot.stroller_id = Some(generate_stroller_id());
                snapshot.start_at = Some(self.clock.now_ms());
                snapshot.elapsed_sec = 0;
                snapshot.state = RentalState::Rented;
                snapshot.current_step = 0;
                self.publisher.publish(snapshot.clone());
                self.start_ticker(&mut session);
            }
            Workflow::Return => {
                session.snapshot.state = RentalState::Returned;
                session.snapshot.current_step = 0;
                self.publisher.publish(session.snapshot.clone());
            }
        }
        demo_log::flow(0, session.snapshot.state.as_str());
        PhaseOutcome::Finished
    }

    /// Start (or restart) the elapsed ticker. The caller holds the session lock.
    ///
    /// Ticks land on whole seconds counted from `start_at`.
    fn start_ticker(self: &Arc<Self>, session: &mut Session) {
        let generation = session.ticker.supersede();
        let first_tick = match session.snapshot.start_at {
            Some(start_at) => self.clock.until_next_second(start_at),
            None => TICK_INTERVAL,
        };
        let task = run_ticker(Arc::clone(self), generation, first_tick);
        session.ticker.handle = Some(self.runtime.spawn(task));
    }

    /// Returns false once the ticker has been superseded.
    fn tick(&self, generation: u64) -> bool {
        let mut session = self.session.lock();
        if !session.ticker.is_current(generation) {
            return false;
        }
        let Some(start_at) = session.snapshot.start_at else {
            return false;
        };

        let snapshot = &mut session.snapshot;
        snapshot.elapsed_sec = snapshot
            .elapsed_sec
            .max(self.clock.elapsed_secs_since(start_at));
        self.publisher.publish(snapshot.clone());
        true
    }
}

async fn run_sequence(
    shared: Arc<Shared>,
    workflow: Workflow,
    generation: u64,
    delay: Duration,
    force_fail: bool,
) {
    for (index, phase) in workflow.phases().iter().enumerate() {
        tokio::time::sleep(delay).await;
        match shared.apply_phase(workflow, generation, index, phase, force_fail) {
            PhaseOutcome::Continue => {}
            PhaseOutcome::Finished => return,
        }
    }
}

async fn run_ticker(shared: Arc<Shared>, generation: u64, first_tick: Duration) {
    let mut ticks = tokio::time::interval_at(Instant::now() + first_tick, TICK_INTERVAL);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticks.tick().await;
        if !shared.tick(generation) {
            return;
        }
    }
}

fn generate_stroller_id() -> String {
    let number: u32 = rand::thread_rng().gen_range(1000..10_000);
    format!("STR-{}", number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_zero_step_delay() {
        let err = RentalStateMachine::with_settings(0, false).unwrap_err();
        assert!(matches!(err, RentalError::InvalidArgument { .. }));
    }

    #[test]
    fn requires_runtime() {
        let err = RentalStateMachine::new().unwrap_err();
        assert!(matches!(err, RentalError::RuntimeUnavailable { .. }));
    }

    #[test]
    fn stroller_ids_use_prefix() {
        let id = generate_stroller_id();
        assert!(id.starts_with("STR-"));
        assert_eq!(id.len(), 8);
    }

    #[test]
    fn task_slot_generations_advance() {
        let mut slot = TaskSlot::default();
        let first = slot.supersede();
        let second = slot.supersede();
        assert!(!slot.is_current(first));
        assert!(slot.is_current(second));
    }

    #[tokio::test(start_paused = true)]
    async fn retry_outside_error_is_noop() {
        let machine = RentalStateMachine::with_settings(100, false).unwrap();
        machine.retry_after_error();
        assert_eq!(machine.snapshot(), SessionSnapshot::with_config(100, false));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_inflight_sequence() {
        let machine = RentalStateMachine::with_settings(100, false).unwrap();
        machine.start_renting();
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(machine.snapshot().current_step, 1);

        machine.reset();
        tokio::time::sleep(Duration::from_millis(1_000)).await;

        let snapshot = machine.snapshot();
        assert_eq!(snapshot.state, RentalState::Idle);
        assert_eq!(snapshot.current_step, 0);
        assert!(snapshot.stroller_id.is_none());
    }
}
