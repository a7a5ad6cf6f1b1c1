use std::io::{self, Write};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunLogEventKind {
    TickApplied,
    TradeAccepted,
    TradeRejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunLogEvent {
    pub tick: u64,
    pub kind: RunLogEventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RunLogEvent {
    pub fn new(tick: u64, kind: RunLogEventKind, detail: Option<String>) -> Self {
        Self { tick, kind, detail }
    }
}

pub trait RunLogWriter {
    fn write(&mut self, event: RunLogEvent);
}

#[derive(Debug, Default)]
pub struct InMemoryRunLogWriter {
    events: Vec<RunLogEvent>,
}

impl InMemoryRunLogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[RunLogEvent] {
        &self.events
    }
}

impl RunLogWriter for InMemoryRunLogWriter {
    fn write(&mut self, event: RunLogEvent) {
        self.events.push(event);
    }
}

/// One JSON object per line. Serialization or write failures drop the row;
/// the run log is best-effort and must never take the simulator down.
pub struct JsonLinesRunLogWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesRunLogWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn try_write(&mut self, event: &RunLogEvent) -> io::Result<()> {
        let row = serde_json::to_string(event)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        writeln!(self.writer, "{row}")
    }
}

impl<W: Write> RunLogWriter for JsonLinesRunLogWriter<W> {
    fn write(&mut self, event: RunLogEvent) {
        let _ = self.try_write(&event);
    }
}
