//! Stream-based data source.
//!
//! Reads a whole sample log from an async byte stream, such as a TCP
//! connection to a device bridge, and delivers it once the peer closes.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::oneshot;
use tracing::{info, warn};

use super::DataSource;

/// A data source that receives one complete text from an async stream.
///
/// A background task reads until EOF and hands the text over exactly once.
/// Nothing is delivered for a stream that fails midway; the error is
/// reported through [`DataSource::error`] instead.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use trailwatch::StreamSource;
///
/// # tokio_test::block_on(async {
/// let data = b"1,8,8370,1.008798,4\n";
/// let source = StreamSource::spawn(Cursor::new(data.to_vec()), "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamSource {
    receiver: Option<oneshot::Receiver<Result<String, String>>>,
    description: String,
    last_error: Option<String>,
}

impl StreamSource {
    /// Spawn a background task that reads `reader` to the end.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let desc = description.to_string();

        tokio::spawn(async move {
            let mut reader = reader;
            let mut text = String::new();
            let result = match reader.read_to_string(&mut text).await {
                Ok(bytes) => {
                    info!(source = %desc, bytes, "Stream closed, delivering text");
                    Ok(text)
                }
                Err(e) => {
                    warn!(source = %desc, error = %e, "Stream read failed");
                    Err(format!("Read error: {}", e))
                }
            };
            // Receiver dropped means nobody is interested any more
            let _ = tx.send(result);
        });

        Self {
            receiver: Some(rx),
            description: format!("stream: {}", description),
            last_error: None,
        }
    }

    /// True once the stream has delivered its text or failed.
    pub fn is_finished(&self) -> bool {
        self.receiver.is_none()
    }
}

impl DataSource for StreamSource {
    fn poll(&mut self) -> Option<String> {
        let receiver = self.receiver.as_mut()?;
        match receiver.try_recv() {
            Ok(Ok(text)) => {
                self.receiver = None;
                self.last_error = None;
                Some(text)
            }
            Ok(Err(e)) => {
                self.receiver = None;
                self.last_error = Some(e);
                None
            }
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.receiver = None;
                self.last_error = Some("Stream task ended without data".to_string());
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE_LOG: &str = "1,8,8370,1.008798,4\n1,8,8381,1.003714,4\n";

    #[tokio::test]
    async fn test_stream_source_delivers_whole_text() {
        let mut source = StreamSource::spawn(Cursor::new(SAMPLE_LOG), "test");

        // Give the background task time to process
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        assert_eq!(source.poll().as_deref(), Some(SAMPLE_LOG));
        assert!(source.is_finished());

        // Delivered exactly once
        assert!(source.poll().is_none());
        assert!(source.error().is_none());
    }

    #[tokio::test]
    async fn test_stream_source_description() {
        let source = StreamSource::spawn(Cursor::new(""), "tcp://localhost:9090");
        assert_eq!(source.description(), "stream: tcp://localhost:9090");
    }

    #[tokio::test]
    async fn test_stream_source_empty_stream() {
        let mut source = StreamSource::spawn(Cursor::new(""), "test");

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        // An empty log is still a delivery
        assert_eq!(source.poll().as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_stream_source_invalid_utf8() {
        let mut source = StreamSource::spawn(Cursor::new(vec![0xff, 0xfe, b'\n']), "test");

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Read error"));
        assert!(source.is_finished());
    }
}
