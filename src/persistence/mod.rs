//! Session persistence seam
//!
//! The simulation never touches storage. Hosts hand the session summary to
//! a `SessionSink`: the in-memory history, a JSON-lines stream, or their own
//! backend.

use std::io::Write;

use crate::error::SinkError;
use crate::history::SessionHistory;
use crate::sim::metrics::SessionSummary;

/// Destination for completed session summaries
pub trait SessionSink {
    fn record(&mut self, summary: &SessionSummary) -> Result<(), SinkError>;
}

impl SessionSink for SessionHistory {
    fn record(&mut self, summary: &SessionSummary) -> Result<(), SinkError> {
        let session = self.push(summary.clone());
        log::info!("Session {} added to history", session);
        Ok(())
    }
}

/// Writes one JSON object per line
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SessionSink for JsonLinesSink<W> {
    fn record(&mut self, summary: &SessionSummary) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, summary)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> SessionSummary {
        SessionSummary {
            timestamp_ms: 1_700_000_000_000.0,
            final_level: 10,
            average_speed: 1.5,
            error_count: 3,
            zone_count: 55,
            recovery_indicator: 0.8,
        }
    }

    #[test]
    fn test_history_sink_numbers_sessions() {
        let mut history = SessionHistory::new();
        history.record(&summary()).unwrap();
        history.record(&summary()).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().map(|r| r.session), Some(2));
    }

    #[test]
    fn test_json_lines_sink() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.record(&summary()).unwrap();
        sink.record(&summary()).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: SessionSummary = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed, summary());
        assert!(lines[0].contains("\"recovery_indicator\""));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_reported() {
        let mut sink = JsonLinesSink::new(FailingWriter);
        assert!(sink.record(&summary()).is_err());
    }
}
