//! Phase tables for the simulated rent and return workflows.
//!
//! Both workflows share one shape: four timed phases, the first three of which are
//! failure checkpoints. The final phase completes the workflow.

use crate::error::{RentalError, Result};

/// Number of timed phases in every workflow.
pub const PHASE_COUNT: usize = 4;

/// One timed step of a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    /// Step index published after this phase succeeds, `None` for the completing phase.
    pub advance_to: Option<u8>,
    /// Message reported when a forced failure hits this phase.
    pub failure: Option<&'static str>,
    /// Progress text shown while this phase is running.
    pub label: &'static str,
}

impl Phase {
    /// Evaluate the failure checkpoint of this phase.
    pub fn check(&self, force_fail: bool) -> Result<()> {
        match self.failure {
            Some(message) if force_fail => Err(RentalError::operation_failed(message)),
            _ => Ok(()),
        }
    }
}

const RENT_PHASES: [Phase; PHASE_COUNT] = [
    Phase {
        advance_to: Some(1),
        failure: Some("connection failed"),
        label: "Connecting to stroller...",
    },
    Phase {
        advance_to: Some(2),
        failure: Some("authentication failed"),
        label: "Authenticating user...",
    },
    Phase {
        advance_to: Some(3),
        failure: Some("unlock failed"),
        label: "Releasing lock...",
    },
    Phase {
        advance_to: None,
        failure: None,
        label: "Rental complete!",
    },
];

const RETURN_PHASES: [Phase; PHASE_COUNT] = [
    Phase {
        advance_to: Some(1),
        failure: Some("connection failed"),
        label: "Connecting to stroller...",
    },
    Phase {
        advance_to: Some(2),
        failure: Some("status check failed"),
        label: "Checking stroller status...",
    },
    Phase {
        advance_to: Some(3),
        failure: Some("lock failed"),
        label: "Locking stroller...",
    },
    Phase {
        advance_to: None,
        failure: None,
        label: "Return complete!",
    },
];

/// The two timed workflows driven by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    Rent,
    Return,
}

impl Workflow {
    pub fn phases(self) -> &'static [Phase; PHASE_COUNT] {
        match self {
            Workflow::Rent => &RENT_PHASES,
            Workflow::Return => &RETURN_PHASES,
        }
    }

    /// Progress text for the phase at `step`, empty when out of range.
    pub fn label(self, step: u8) -> &'static str {
        self.phases()
            .get(usize::from(step))
            .map_or("", |phase| phase.label)
    }

    pub fn name(self) -> &'static str {
        match self {
            Workflow::Rent => "renting",
            Workflow::Return => "returning",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_final_phase_completes() {
        for workflow in [Workflow::Rent, Workflow::Return] {
            let phases = workflow.phases();
            assert!(phases[..PHASE_COUNT - 1].iter().all(|p| p.advance_to.is_some()));
            assert!(phases[PHASE_COUNT - 1].advance_to.is_none());
            assert!(phases[PHASE_COUNT - 1].check(true).is_ok());
        }
    }

    #[test]
    fn steps_advance_in_order() {
        let steps: Vec<Option<u8>> = Workflow::Rent.phases().iter().map(|p| p.advance_to).collect();
        assert_eq!(steps, vec![Some(1), Some(2), Some(3), None]);
    }

    #[test]
    fn forced_failure_reports_phase_message() {
        let messages: Vec<String> = Workflow::Return
            .phases()
            .iter()
            .filter_map(|phase| phase.check(true).err())
            .map(|err| err.to_string())
            .collect();
        assert_eq!(
            messages,
            vec!["connection failed", "status check failed", "lock failed"]
        );

        assert!(Workflow::Rent.phases()[1].check(false).is_ok());
        assert_eq!(
            Workflow::Rent.phases()[1].check(true).unwrap_err().to_string(),
            "authentication failed"
        );
    }

    #[test]
    fn labels_fall_back_to_empty() {
        assert_eq!(Workflow::Rent.label(0), "Connecting to stroller...");
        assert_eq!(Workflow::Return.label(3), "Return complete!");
        assert_eq!(Workflow::Rent.label(9), "");
    }
}
