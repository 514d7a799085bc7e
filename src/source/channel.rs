//! Channel-based data source.
//!
//! Receives whole config or log texts via a tokio watch channel. This is
//! how an embedding program pushes content into the dashboard, and how the
//! built-in demo data is served.

use tokio::sync::watch;

use super::DataSource;

/// A data source that receives text via a channel.
///
/// The producer sends complete texts through the channel; each send
/// replaces what the dashboard shows.
///
/// # Example
///
/// ```
/// use trailwatch::{ChannelSource, DataSource};
///
/// let (tx, mut source) = ChannelSource::create("demo");
/// tx.send("1,8,8370,1.008798,4\n".to_string()).unwrap();
/// assert!(source.poll().is_some());
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<String>,
    description: String,
    /// Track if we've returned the initial value yet
    initial_returned: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of a watch channel
    /// * `source_description` - Where the texts come from, for the status bar
    pub fn new(receiver: watch::Receiver<String>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            initial_returned: false,
        }
    }

    /// Create a channel pair for sending texts to a ChannelSource.
    ///
    /// The channel starts out holding an empty text.
    pub fn create(source_description: &str) -> (watch::Sender<String>, Self) {
        let (tx, rx) = watch::channel(String::new());
        let source = Self::new(rx, source_description);
        (tx, source)
    }

    /// A source that delivers `text` once and then nothing.
    pub fn from_text(text: impl Into<String>, source_description: &str) -> Self {
        let (_tx, rx) = watch::channel(text.into());
        Self::new(rx, source_description)
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<String> {
        // Return the initial value on first poll, even if the sender is gone
        if !self.initial_returned {
            self.initial_returned = true;
            return Some(self.receiver.borrow_and_update().clone());
        }

        // A closed channel reports an error here; treat it as "no change"
        if self.receiver.has_changed().unwrap_or(false) {
            Some(self.receiver.borrow_and_update().clone())
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");

        // Initially returns the default (empty) text
        assert_eq!(source.poll().as_deref(), Some(""));

        // No change, so poll returns None
        assert!(source.poll().is_none());

        tx.send("0,1,13208,65.0,1\n".to_string()).unwrap();
        assert_eq!(source.poll().as_deref(), Some("0,1,13208,65.0,1\n"));
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_from_text_delivers_once() {
        let mut source = ChannelSource::from_text("0,0,1,95,2\n", "demo");
        assert_eq!(source.description(), "channel: demo");
        assert_eq!(source.poll().as_deref(), Some("0,0,1,95,2\n"));
        assert!(source.poll().is_none());
        assert!(source.error().is_none());
    }
}
