//! Observable snapshot holder shared by the state machine and its subscribers.
//!
//! A `watch` channel keeps the latest snapshot for late subscribers, while a `broadcast`
//! channel delivers every snapshot in publication order to subscribers that need the full
//! history of transitions.

use crate::rental::state::SessionSnapshot;
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::WatchStream;

/// Buffered snapshots per ordered subscriber before it starts lagging.
const UPDATE_BUFFER: usize = 64;

#[derive(Debug)]
pub struct SnapshotPublisher {
    latest: watch::Sender<SessionSnapshot>,
    updates: broadcast::Sender<SessionSnapshot>,
}

impl SnapshotPublisher {
    pub fn new(initial: SessionSnapshot) -> Self {
        let (latest, _) = watch::channel(initial);
        let (updates, _) = broadcast::channel(UPDATE_BUFFER);
        Self { latest, updates }
    }

    /// Publish a new snapshot to every subscriber.
    pub fn publish(&self, snapshot: SessionSnapshot) {
        // No ordered subscribers is not an error.
        let _ = self.updates.send(snapshot.clone());
        self.latest.send_replace(snapshot);
    }

    pub fn current(&self) -> SessionSnapshot {
        self.latest.borrow().clone()
    }

    /// Latest-value receiver; replays the current snapshot immediately.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.latest.subscribe()
    }

    /// Ordered receiver for snapshots published after this call.
    pub fn updates(&self) -> broadcast::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    pub fn stream(&self) -> WatchStream<SessionSnapshot> {
        WatchStream::new(self.latest.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rental::state::RentalState;
    use tokio_stream::StreamExt;

    fn with_state(state: RentalState) -> SessionSnapshot {
        SessionSnapshot {
            state,
            ..SessionSnapshot::default()
        }
    }

    #[tokio::test]
    async fn late_subscriber_sees_latest_value() {
        let publisher = SnapshotPublisher::new(SessionSnapshot::default());
        publisher.publish(with_state(RentalState::Renting));
        publisher.publish(with_state(RentalState::Rented));

        let rx = publisher.subscribe();
        assert_eq!(rx.borrow().state, RentalState::Rented);
        assert_eq!(publisher.current().state, RentalState::Rented);
    }

    #[tokio::test]
    async fn ordered_updates_preserve_publication_order() {
        let publisher = SnapshotPublisher::new(SessionSnapshot::default());
        let mut updates = publisher.updates();

        for state in [
            RentalState::Renting,
            RentalState::Error,
            RentalState::Idle,
        ] {
            publisher.publish(with_state(state));
        }

        let mut seen = Vec::new();
        while let Ok(snapshot) = updates.try_recv() {
            seen.push(snapshot.state);
        }
        assert_eq!(
            seen,
            vec![RentalState::Renting, RentalState::Error, RentalState::Idle]
        );
    }

    #[tokio::test]
    async fn stream_starts_with_current_snapshot() {
        let publisher = SnapshotPublisher::new(with_state(RentalState::Rented));
        let mut stream = publisher.stream();

        let first = stream.next().await.expect("stream yields current value");
        assert_eq!(first.state, RentalState::Rented);
    }
}
