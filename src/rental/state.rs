//! Session data model published by the rental state machine.

/// Default delay applied to every simulated hardware phase.
pub const DEFAULT_STEP_DELAY_MS: u64 = 10_000;

/// Lifecycle of a single rental session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RentalState {
    #[default]
    Idle,
    Renting,
    Rented,
    Returning,
    Returned,
    Error,
}

impl RentalState {
    /// True while a timed rent or return sequence is running.
    pub fn is_in_progress(self) -> bool {
        matches!(self, Self::Renting | Self::Returning)
    }

    /// Short lowercase name used in logs and headless output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Renting => "renting",
            Self::Rented => "rented",
            Self::Returning => "returning",
            Self::Returned => "returned",
            Self::Error => "error",
        }
    }
}

/// Immutable view of the full session, republished on every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: RentalState,
    /// Phase index (0..=3) while renting or returning, 0 otherwise.
    pub current_step: u8,
    pub step_delay_ms: u64,
    pub force_fail: bool,
    pub stroller_id: Option<String>,
    /// Rental start as milliseconds since the Unix epoch.
    pub start_at: Option<u64>,
    pub elapsed_sec: u64,
    pub error_message: Option<String>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::with_config(DEFAULT_STEP_DELAY_MS, false)
    }
}

impl SessionSnapshot {
    /// Fresh idle session carrying the given configuration.
    pub fn with_config(step_delay_ms: u64, force_fail: bool) -> Self {
        Self {
            state: RentalState::Idle,
            current_step: 0,
            step_delay_ms,
            force_fail,
            stroller_id: None,
            start_at: None,
            elapsed_sec: 0,
            error_message: None,
        }
    }

    /// Clear the session while keeping `step_delay_ms` and `force_fail`.
    pub fn cleared(&self) -> Self {
        Self::with_config(self.step_delay_ms, self.force_fail)
    }

    pub fn has_stroller(&self) -> bool {
        self.stroller_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_is_idle() {
        let snapshot = SessionSnapshot::default();
        assert_eq!(snapshot.state, RentalState::Idle);
        assert_eq!(snapshot.step_delay_ms, DEFAULT_STEP_DELAY_MS);
        assert!(!snapshot.force_fail);
        assert!(snapshot.stroller_id.is_none());
        assert!(snapshot.error_message.is_none());
    }

    #[test]
    fn cleared_keeps_configuration_only() {
        let snapshot = SessionSnapshot {
            state: RentalState::Rented,
            current_step: 2,
            step_delay_ms: 250,
            force_fail: true,
            stroller_id: Some("STR-0042".to_string()),
            start_at: Some(1_000),
            elapsed_sec: 12,
            error_message: None,
        };

        let cleared = snapshot.cleared();
        assert_eq!(cleared, SessionSnapshot::with_config(250, true));
    }

    #[test]
    fn in_progress_states() {
        assert!(RentalState::Renting.is_in_progress());
        assert!(RentalState::Returning.is_in_progress());
        assert!(!RentalState::Rented.is_in_progress());
        assert!(!RentalState::Error.is_in_progress());
    }
}
