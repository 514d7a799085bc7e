//! Data source abstraction for receiving config and log text.
//!
//! A source hands over the complete text of a file each time it changes.
//! The application parses the text and replaces the matching collection as
//! a whole; sources never deliver partial content.

mod channel;
mod file;
mod stream;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use stream::StreamSource;

use std::fmt::Debug;

/// Trait for receiving raw config or log text from various sources.
///
/// # Example
///
/// ```
/// use trailwatch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("samples.log");
/// if let Some(text) = source.poll() {
///     println!("Got {} bytes", text.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for new content.
    ///
    /// Returns `Some(text)` when new content is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<String>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Check if the source has encountered an error.
    ///
    /// Returns the error message if an error occurred during the last poll.
    fn error(&self) -> Option<&str>;
}
