//! In-memory sink that keeps every emission

use super::logger::ActivitySink;
use crate::core::{ActivityLevel, Context, LevelThreshold, Result};
use parking_lot::Mutex;

/// One call to [`ActivitySink::emit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    pub level: ActivityLevel,
    pub message: String,
    pub context: Context,
}

/// Sink capturing emissions for inspection
///
/// Enables every level unless built with [`MemorySink::with_min_level`].
#[derive(Debug)]
pub struct MemorySink {
    threshold: LevelThreshold,
    emissions: Mutex<Vec<Emission>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::with_min_level(ActivityLevel::Trace)
    }

    pub fn with_min_level(level: ActivityLevel) -> Self {
        Self {
            threshold: LevelThreshold::new(level),
            emissions: Mutex::new(Vec::new()),
        }
    }

    pub fn set_min_level(&self, level: ActivityLevel) {
        self.threshold.set_min_level(level);
    }

    pub fn min_level(&self) -> ActivityLevel {
        self.threshold.min_level()
    }

    /// Snapshot of everything emitted so far
    pub fn emissions(&self) -> Vec<Emission> {
        self.emissions.lock().clone()
    }

    /// Drain everything emitted so far
    pub fn take(&self) -> Vec<Emission> {
        std::mem::take(&mut *self.emissions.lock())
    }

    pub fn len(&self) -> usize {
        self.emissions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.emissions.lock().is_empty()
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivitySink for MemorySink {
    fn is_level_enabled(&self, level: ActivityLevel) -> bool {
        self.threshold.enables(level)
    }

    fn emit(&self, level: ActivityLevel, message: &str, context: &Context) -> Result<()> {
        self.emissions.lock().push(Emission {
            level,
            message: message.to_string(),
            context: context.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_can_change() {
        let sink = MemorySink::with_min_level(ActivityLevel::Error);
        assert!(!sink.is_level_enabled(ActivityLevel::Warn));

        sink.set_min_level(ActivityLevel::Debug);

        assert_eq!(sink.min_level(), ActivityLevel::Debug);
        assert!(sink.is_level_enabled(ActivityLevel::Warn));
        assert!(!sink.is_level_enabled(ActivityLevel::Trace));
    }

    #[test]
    fn test_take_drains() {
        let sink = MemorySink::new();
        sink.emit(ActivityLevel::Info, "first", &Context::new()).unwrap();
        sink.emit(ActivityLevel::Info, "second", &Context::new()).unwrap();

        let taken = sink.take();

        assert_eq!(taken.len(), 2);
        assert_eq!(taken[1].message, "second");
        assert!(sink.is_empty());
    }
}
