//! Capture of `tracing` output for assertions.
//!
//! # Examples
//!
//! ```
//! use cliutil_test_helpers::logs::capture_logs;
//!
//! let (value, logs) = capture_logs(|| {
//!     tracing::info!(answer = 42, "computed");
//!     42
//! });
//! assert_eq!(value, 42);
//! assert!(logs.contains("answer=42"));
//! ```

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing_subscriber::fmt::MakeWriter;

/// Shared in-memory sink handed to the formatter.
#[derive(Clone, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Buffer {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` with a thread-local subscriber recording every event at `TRACE`
/// and above, returning `f`'s result and the formatted output.
#[must_use]
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = Buffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .without_time()
        .finish();
    let value = tracing::subscriber::with_default(subscriber, f);
    let text = String::from_utf8_lossy(&buffer.0.lock()).into_owned();
    (value, text)
}
