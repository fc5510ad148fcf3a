//! JSON lines sink for structured output

use super::logger::ActivitySink;
use crate::core::{ActivityError, ActivityLevel, Context, LevelThreshold, Result};
use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Serialize)]
struct JsonLine<'a> {
    timestamp: String,
    level: ActivityLevel,
    message: &'a str,
    #[serde(flatten)]
    context: &'a Context,
}

/// Writes each activity as a single-line JSON object (JSONL)
///
/// The rendered `context` object sits next to `timestamp`, `level` and
/// `message`, so the line reads
/// `{"timestamp":..,"level":"INFO","message":..,"context":{"identifier":..}}`.
pub struct JsonSink<W: Write + Send> {
    writer: Mutex<W>,
    threshold: LevelThreshold,
}

impl JsonSink<BufWriter<File>> {
    /// Append to the file at `path`, creating it if needed
    pub fn file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write + Send> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            threshold: LevelThreshold::default(),
        }
    }

    #[must_use]
    pub fn with_min_level(self, level: ActivityLevel) -> Self {
        self.threshold.set_min_level(level);
        self
    }

    pub fn set_min_level(&self, level: ActivityLevel) {
        self.threshold.set_min_level(level);
    }

    pub fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }
}

impl<W: Write + Send> ActivitySink for JsonSink<W> {
    fn is_level_enabled(&self, level: ActivityLevel) -> bool {
        self.threshold.enables(level)
    }

    fn emit(&self, level: ActivityLevel, message: &str, context: &Context) -> Result<()> {
        let line = JsonLine {
            timestamp: Utc::now().to_rfc3339(),
            level,
            message,
            context,
        };
        let json = serde_json::to_string(&line)?;

        let mut writer = self.writer.lock();
        writeln!(writer, "{}", json).map_err(|e| ActivityError::sink("json", e.to_string()))
    }
}

impl<W: Write + Send> Drop for JsonSink<W> {
    fn drop(&mut self) {
        if let Err(e) = self.writer.get_mut().flush() {
            eprintln!("[ACTIVITY FEED ERROR] Failed to flush JSON sink: {}", e);
        }
    }
}
