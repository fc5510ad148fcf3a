//! Level-gated recorder over a leveled sink

use crate::core::{Activity, ActivityLevel, ActivityRecorder, Context, Result};
use std::sync::Arc;

/// A leveled output facility
///
/// `is_level_enabled` is checked before anything is rendered, so it should
/// be a cheap comparison.
pub trait ActivitySink: Send + Sync {
    fn is_level_enabled(&self, level: ActivityLevel) -> bool;
    fn emit(&self, level: ActivityLevel, message: &str, context: &Context) -> Result<()>;
}

impl<S: ActivitySink + ?Sized> ActivitySink for Arc<S> {
    fn is_level_enabled(&self, level: ActivityLevel) -> bool {
        (**self).is_level_enabled(level)
    }

    fn emit(&self, level: ActivityLevel, message: &str, context: &Context) -> Result<()> {
        (**self).emit(level, message, context)
    }
}

/// Recorder that renders an activity's context only when its sink wants it
#[derive(Debug)]
pub struct ActivityLogger<S> {
    sink: S,
}

impl<S: ActivitySink> ActivityLogger<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: ActivitySink> ActivityRecorder for ActivityLogger<S> {
    fn record(&self, activity: &Activity) -> Result<()> {
        if !self.sink.is_level_enabled(activity.level()) {
            return Ok(());
        }
        self.sink
            .emit(activity.level(), activity.message(), &activity.context())
    }

    fn is_enabled(&self, level: ActivityLevel) -> bool {
        self.sink.is_level_enabled(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorders::MemorySink;

    #[test]
    fn test_disabled_level_emits_nothing() {
        let sink = Arc::new(MemorySink::with_min_level(ActivityLevel::Info));
        let logger = ActivityLogger::new(Arc::clone(&sink));

        for level in [ActivityLevel::Trace, ActivityLevel::Debug] {
            let activity = Activity::new(level, "cache-miss", "Cache miss", Context::new()).unwrap();
            logger.record(&activity).unwrap();
        }

        assert!(sink.is_empty());
        assert!(!logger.is_enabled(ActivityLevel::Debug));
    }

    #[test]
    fn test_enabled_level_emits_once() {
        let sink = Arc::new(MemorySink::with_min_level(ActivityLevel::Info));
        let logger = ActivityLogger::new(Arc::clone(&sink));
        let activity = Activity::warn_with("disk-low", "Disk space low", |context| {
            context.insert("free_mb", 120);
        })
        .unwrap();

        logger.record(&activity).unwrap();

        let emissions = sink.emissions();
        assert_eq!(emissions.len(), 1);
        assert_eq!(emissions[0].level, ActivityLevel::Warn);
        assert_eq!(emissions[0].message, "Disk space low");
        assert_eq!(emissions[0].context, activity.context());
    }

    #[test]
    fn test_every_level_passes_through_when_enabled() {
        let sink = Arc::new(MemorySink::new());
        let logger = ActivityLogger::new(Arc::clone(&sink));

        for level in ActivityLevel::ALL {
            let activity = Activity::new(level, "tick", "Tick", Context::new()).unwrap();
            logger.record(&activity).unwrap();
        }

        let levels: Vec<_> = sink.emissions().iter().map(|e| e.level).collect();
        assert_eq!(levels, ActivityLevel::ALL.to_vec());
    }
}
