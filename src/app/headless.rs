//! Headless demo run: drives one rent/return cycle and prints every transition.

use crate::config::DemoConfig;
use crate::error::{RentalError, Result};
use crate::rental::{RentalState, RentalStateMachine, SessionSnapshot, Workflow};
use log::debug;
use std::io::Write;
use tokio::sync::broadcast::error::RecvError;

/// One line describing a snapshot, e.g. `rented stroller=STR-1234 elapsed=3s`.
pub fn describe(snapshot: &SessionSnapshot) -> String {
    let mut line = snapshot.state.as_str().to_string();
    if snapshot.state.is_in_progress() {
        let workflow = match snapshot.state {
            RentalState::Renting => Workflow::Rent,
            _ => Workflow::Return,
        };
        line.push_str(&format!(
            " step={} {}",
            snapshot.current_step,
            workflow.label(snapshot.current_step)
        ));
    }
    if let Some(stroller) = &snapshot.stroller_id {
        line.push_str(&format!(" stroller={} elapsed={}s", stroller, snapshot.elapsed_sec));
    }
    if let Some(message) = &snapshot.error_message {
        line.push_str(&format!(" error=\"{}\"", message));
    }
    line
}

/// Run renting then returning, writing one line per state change to `out`.
///
/// A forced failure stops the run with `OperationFailed` after leaving the error state.
pub async fn run_headless<W: Write>(config: &DemoConfig, out: &mut W) -> Result<()> {
    config.validate()?;
    let machine = RentalStateMachine::with_settings(config.step_delay_ms, config.force_fail)?;
    let mut updates = machine.updates();

    writeln!(out, "{}", describe(&machine.snapshot()))?;

    for workflow in [Workflow::Rent, Workflow::Return] {
        match workflow {
            Workflow::Rent => machine.start_renting(),
            Workflow::Return => machine.start_returning(),
        }

        let target = match workflow {
            Workflow::Rent => RentalState::Rented,
            Workflow::Return => RentalState::Returned,
        };
        let last = follow_until_settled(&mut updates, out, target).await?;

        if let Some(message) = last.error_message {
            machine.retry_after_error();
            writeln!(out, "{}", describe(&machine.snapshot()))?;
            return Err(RentalError::operation_failed(message));
        }
    }

    machine.reset();
    writeln!(out, "{}", describe(&machine.snapshot()))?;
    Ok(())
}

/// Print snapshots until the workflow reaches `target` or fails.
async fn follow_until_settled<W: Write>(
    updates: &mut tokio::sync::broadcast::Receiver<SessionSnapshot>,
    out: &mut W,
    target: RentalState,
) -> Result<SessionSnapshot> {
    let mut last_line = String::new();
    loop {
        let snapshot = match updates.recv().await {
            Ok(snapshot) => snapshot,
            Err(RecvError::Lagged(skipped)) => {
                debug!("headless output skipped {} snapshots", skipped);
                continue;
            }
            Err(RecvError::Closed) => {
                return Err(RentalError::ui("state machine stopped publishing"));
            }
        };

        // Elapsed ticks would repeat identical lines; only print changes.
        let line = describe(&snapshot);
        if line != last_line {
            writeln!(out, "{}", line)?;
            last_line = line;
        }

        if snapshot.state == target || snapshot.state == RentalState::Error {
            return Ok(snapshot);
        }
    }
}
