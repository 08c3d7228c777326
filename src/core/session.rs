use crate::core::event::{DataEvent, ErrorEvent, OpOutcome, SessionEvent};
use crate::core::framing::LineFramer;
use serialport::SerialPort;
use std::io::Read;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Fixed operation messages, part of the host contract.
pub const MSG_CONNECTED: &str = "serial port connected";
pub const MSG_CLOSED: &str = "serial port closed";
pub const MSG_NOT_OPEN: &str = "serial port not open";
pub const MSG_SENT: &str = "data sent";
pub const MSG_NOT_CONNECTED: &str = "serial port not connected";

const READ_TIMEOUT: Duration = Duration::from_millis(100);
const POLL_INTERVAL: Duration = Duration::from_millis(10);
const READ_BUFFER_SIZE: usize = 1024;

struct OpenPort {
    path: String,
    baud_rate: u32,
    writer: Box<dyn SerialPort>,
    reader_task: JoinHandle<()>,
}

/// Single-owner serial session state machine.
///
/// Holds at most one open port handle. Opening while already open closes the
/// existing handle first (replace-on-open); close is idempotent. Incoming
/// lines and asynchronous transport errors are pushed as [`SessionEvent`]s on
/// the bounded channel handed out by [`SerialSession::new`] — the reader task
/// awaits channel capacity, so a slow consumer backpressures into the OS
/// serial buffer rather than growing memory.
///
/// Operations take `&mut self`, so open/close/write are serialized per
/// session by the exclusive borrow; there is no window for a second open to
/// race an in-flight one.
pub struct SerialSession {
    open: Option<OpenPort>,
    events_tx: mpsc::Sender<SessionEvent>,
    timestamp_format: String,
}

impl SerialSession {
    /// Create a closed session and the receiving end of its event channel.
    pub fn new(
        event_buffer: usize,
        timestamp_format: impl Into<String>,
    ) -> (Self, mpsc::Receiver<SessionEvent>) {
        let (events_tx, events_rx) = mpsc::channel(event_buffer);

        let session = Self {
            open: None,
            events_tx,
            timestamp_format: timestamp_format.into(),
        };

        (session, events_rx)
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Path and baud rate of the current connection, if any.
    pub fn current_port(&self) -> Option<(&str, u32)> {
        self.open
            .as_ref()
            .map(|open| (open.path.as_str(), open.baud_rate))
    }

    /// Open `path` at `baud_rate`, replacing any existing connection.
    ///
    /// A failure from closing the stale handle is ignored; the open proceeds
    /// regardless. One attempt, no retry: on failure the session is Closed
    /// and the underlying error message is returned in the outcome.
    pub async fn open(&mut self, path: &str, baud_rate: u32) -> OpOutcome {
        if self.open.is_some() {
            let _ = self.close().await;
        }

        let writer = match serialport::new(path, baud_rate)
            .timeout(READ_TIMEOUT)
            .open()
        {
            Ok(writer) => writer,
            Err(e) => {
                warn!("Failed to open serial port {}: {}", path, e);
                return OpOutcome::err(e.to_string());
            }
        };

        // The reader task needs its own handle on the same fd
        let reader = match writer.try_clone() {
            Ok(reader) => reader,
            Err(e) => {
                warn!("Failed to clone handle for {}: {}", path, e);
                return OpOutcome::err(e.to_string());
            }
        };

        let reader_task = spawn_reader(
            reader,
            self.events_tx.clone(),
            self.timestamp_format.clone(),
        );

        self.open = Some(OpenPort {
            path: path.to_string(),
            baud_rate,
            writer,
            reader_task,
        });

        info!("Opened serial port {} at {} baud", path, baud_rate);
        OpOutcome::ok(MSG_CONNECTED)
    }

    /// Release the port handle and stop event emission.
    ///
    /// Never fails: closing an already-closed session reports success with a
    /// distinct message.
    pub async fn close(&mut self) -> OpOutcome {
        match self.open.take() {
            Some(open) => {
                open.reader_task.abort();
                // Dropping the writer releases the OS handle
                info!("Closed serial port {}", open.path);
                OpOutcome::ok(MSG_CLOSED)
            }
            None => OpOutcome::ok(MSG_NOT_OPEN),
        }
    }

    /// Write `payload` plus a `\n` terminator to the open port.
    ///
    /// Fire-and-forget: no acknowledgement is awaited. While Closed this
    /// fails without attempting an implicit open.
    pub async fn write(&mut self, payload: &str) -> OpOutcome {
        let Some(open) = self.open.as_mut() else {
            return OpOutcome::err(MSG_NOT_CONNECTED);
        };

        let mut bytes = Vec::with_capacity(payload.len() + 1);
        bytes.extend_from_slice(payload.as_bytes());
        bytes.push(b'\n');

        match open.writer.write_all(&bytes) {
            Ok(()) => {
                debug!("Wrote {} bytes to {}", bytes.len(), open.path);
                OpOutcome::ok(MSG_SENT)
            }
            Err(e) => {
                warn!("Failed to write to {}: {}", open.path, e);
                OpOutcome::err(e.to_string())
            }
        }
    }
}

impl Drop for SerialSession {
    fn drop(&mut self) {
        // Forced close on host shutdown: stop the reader and release the fd
        if let Some(open) = self.open.take() {
            open.reader_task.abort();
            debug!("Serial session dropped while {} was open", open.path);
        }
    }
}

/// Background reader: frames lines off the byte stream and pushes events.
///
/// One Data event per completed line, stamped when the line is framed. A
/// read timeout just means no data yet; any other error is surfaced as a
/// single Error event after which the task stops reading — the session stays
/// nominally open until the host closes or reopens it. A zero-length read
/// means the stream ended (device gone) and the task exits quietly.
fn spawn_reader<R>(
    mut reader: R,
    events: mpsc::Sender<SessionEvent>,
    timestamp_format: String,
) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    tokio::spawn(async move {
        let mut framer = LineFramer::new();
        let mut buffer = vec![0u8; READ_BUFFER_SIZE];

        loop {
            tokio::time::sleep(POLL_INTERVAL).await;

            match reader.read(&mut buffer) {
                Ok(0) => {
                    debug!("Serial stream ended");
                    break;
                }
                Ok(n) => {
                    for line in framer.push(&buffer[..n]) {
                        let event =
                            SessionEvent::Data(DataEvent::now(line, &timestamp_format));
                        if events.send(event).await.is_err() {
                            // Host dropped the receiver; nothing left to do
                            return;
                        }
                    }
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
                Err(e) => {
                    warn!("Serial read failed: {}", e);
                    let _ = events
                        .send(SessionEvent::Error(ErrorEvent {
                            message: e.to_string(),
                        }))
                        .await;
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    #[tokio::test]
    async fn test_new_session_is_closed() {
        let (session, _events) = SerialSession::new(16, TS_FORMAT);
        assert!(!session.is_open());
        assert!(session.current_port().is_none());
    }

    #[tokio::test]
    async fn test_open_invalid_path_fails_and_stays_closed() {
        let (mut session, _events) = SerialSession::new(16, TS_FORMAT);

        let outcome = session.open("/dev/linescope-does-not-exist", 9600).await;
        assert!(!outcome.success);
        assert!(!outcome.message.is_empty());
        assert!(!session.is_open());
    }

    #[tokio::test]
    async fn test_double_close_both_succeed_with_distinct_messages() {
        let (mut session, _events) = SerialSession::new(16, TS_FORMAT);

        // Closed from the start, so the first close already reports not-open
        let first = session.close().await;
        assert!(first.success);
        assert_eq!(first.message, MSG_NOT_OPEN);

        let second = session.close().await;
        assert!(second.success);
        assert_eq!(second.message, MSG_NOT_OPEN);
    }

    #[tokio::test]
    async fn test_write_while_closed_fails_with_not_connected() {
        let (mut session, _events) = SerialSession::new(16, TS_FORMAT);

        let outcome = session.write("hello").await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, MSG_NOT_CONNECTED);
    }

    #[tokio::test]
    async fn test_reader_emits_one_data_event_per_line_in_order() {
        let (events_tx, mut events_rx) = mpsc::channel(16);
        let handle = spawn_reader(
            Cursor::new(b"abc\ndef\n".to_vec()),
            events_tx,
            TS_FORMAT.to_string(),
        );

        let first = events_rx.recv().await.expect("first event");
        let second = events_rx.recv().await.expect("second event");

        match (first, second) {
            (SessionEvent::Data(a), SessionEvent::Data(b)) => {
                assert_eq!(a.data, "abc");
                assert_eq!(b.data, "def");
                assert!(!a.timestamp.is_empty());
                assert!(!b.timestamp.is_empty());
            }
            other => panic!("expected two data events, got {:?}", other),
        }

        // Stream end: task exits, channel closes, no further events
        assert!(events_rx.recv().await.is_none());
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_reader_buffers_partial_lines_across_reads() {
        struct ChunkedReader {
            chunks: Vec<Vec<u8>>,
        }

        impl Read for ChunkedReader {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if self.chunks.is_empty() {
                    return Ok(0);
                }
                let chunk = self.chunks.remove(0);
                buf[..chunk.len()].copy_from_slice(&chunk);
                Ok(chunk.len())
            }
        }

        let (events_tx, mut events_rx) = mpsc::channel(16);
        let reader = ChunkedReader {
            chunks: vec![b"hel".to_vec(), b"lo\nwor".to_vec(), b"ld\n".to_vec()],
        };
        spawn_reader(reader, events_tx, TS_FORMAT.to_string());

        match events_rx.recv().await.expect("first event") {
            SessionEvent::Data(event) => assert_eq!(event.data, "hello"),
            other => panic!("expected data event, got {:?}", other),
        }
        match events_rx.recv().await.expect("second event") {
            SessionEvent::Data(event) => assert_eq!(event.data, "world"),
            other => panic!("expected data event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reader_surfaces_transport_error_then_stops() {
        struct FailingReader {
            sent_data: bool,
        }

        impl Read for FailingReader {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if !self.sent_data {
                    self.sent_data = true;
                    buf[..4].copy_from_slice(b"ok\n!");
                    return Ok(4);
                }
                Err(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "device unplugged",
                ))
            }
        }

        let (events_tx, mut events_rx) = mpsc::channel(16);
        spawn_reader(
            FailingReader { sent_data: false },
            events_tx,
            TS_FORMAT.to_string(),
        );

        match events_rx.recv().await.expect("data event") {
            SessionEvent::Data(event) => assert_eq!(event.data, "ok"),
            other => panic!("expected data event, got {:?}", other),
        }

        match events_rx.recv().await.expect("error event") {
            SessionEvent::Error(event) => {
                assert!(event.message.contains("device unplugged"));
            }
            other => panic!("expected error event, got {:?}", other),
        }

        // Exactly one error event, then the task is done
        assert!(events_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_reader_skips_timeouts() {
        struct TimeoutThenData {
            timeouts_left: u8,
        }

        impl Read for TimeoutThenData {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if self.timeouts_left > 0 {
                    self.timeouts_left -= 1;
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        "no data",
                    ));
                }
                buf[..5].copy_from_slice(b"late\n");
                Ok(5)
            }
        }

        let (events_tx, mut events_rx) = mpsc::channel(16);
        spawn_reader(
            TimeoutThenData { timeouts_left: 3 },
            events_tx,
            TS_FORMAT.to_string(),
        );

        match events_rx.recv().await.expect("data event") {
            SessionEvent::Data(event) => assert_eq!(event.data, "late"),
            other => panic!("expected data event, got {:?}", other),
        }
    }
}
