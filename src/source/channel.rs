//! Channel-based data source.
//!
//! Receives health snapshots via a tokio watch channel. This is the entry
//! point for embedding the TUI next to an in-process telemetry collector
//! that pushes snapshots rather than writing files.

use tokio::sync::watch;

use super::{DataSource, HealthSnapshot};

/// A data source that receives health snapshots via a channel.
///
/// The producer (e.g. a telemetry subscriber) sends snapshots through the
/// channel and this source provides them to the TUI.
///
/// # Example
///
/// ```
/// use unitwatch::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("collector");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<HealthSnapshot>,
    description: String,
    /// Track if we've returned the initial value yet
    initial_returned: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// `source_description` names where snapshots come from, for the
    /// status bar (e.g. "collector", "nats://broker:4222").
    pub fn new(receiver: watch::Receiver<HealthSnapshot>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            initial_returned: false,
        }
    }

    /// Create a channel pair for sending snapshots to a ChannelSource.
    ///
    /// Returns (sender, source); push snapshots through the sender and
    /// hand the source to the TUI.
    pub fn create(source_description: &str) -> (watch::Sender<HealthSnapshot>, Self) {
        let (tx, rx) = watch::channel(HealthSnapshot::default());
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<HealthSnapshot> {
        // Return the initial value on first poll
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        if self.receiver.has_changed().unwrap_or(false) {
            let snapshot = self.receiver.borrow_and_update().clone();
            Some(snapshot)
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        // Connection errors belong to the producing layer
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SerializedUnitState;
    use std::collections::BTreeMap;

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");

        // Initially returns the default (empty) snapshot
        let snapshot = source.poll();
        assert!(snapshot.is_some());
        assert!(snapshot.unwrap().is_empty());

        // No change, so poll returns None
        assert!(source.poll().is_none());

        // Send a new snapshot
        let mut new_snapshot = HealthSnapshot::new();
        new_snapshot.insert(
            "unit-01".to_string(),
            SerializedUnitState {
                name: None,
                indicators: BTreeMap::new(),
            },
        );
        tx.send(new_snapshot).unwrap();

        let snapshot = source.poll();
        assert!(snapshot.is_some());
        assert_eq!(snapshot.unwrap().len(), 1);
    }
}
