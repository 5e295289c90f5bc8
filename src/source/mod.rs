//! Data source abstraction for receiving health snapshots.
//!
//! This module provides a trait-based abstraction for receiving fleet
//! health data from various backends (files, network streams, in-process
//! channels, or the built-in simulator).

mod channel;
mod file;
mod sim;
mod snapshot;
mod stream;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use sim::SimSource;
pub use snapshot::{HealthSnapshot, SerializedUnitState};
pub use stream::StreamSource;

use std::fmt::Debug;

/// Trait for receiving health snapshots from various sources.
///
/// Implementations provide fleet snapshots from different backends - file
/// polling, TCP streams, in-memory channels, or simulation.
///
/// # Example
///
/// ```
/// use unitwatch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("health.json");
/// if let Some(snapshot) = source.poll() {
///     println!("Got {} units", snapshot.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<HealthSnapshot>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Check if the source has encountered an error.
    ///
    /// Returns the error message if an error occurred during the last poll.
    fn error(&self) -> Option<&str>;
}
