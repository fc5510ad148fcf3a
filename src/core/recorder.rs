//! Recorder trait for activity destinations

use super::{activity::Activity, activity_level::ActivityLevel, error::Result};
use std::sync::Arc;

/// Anything that can take delivery of an activity
///
/// `record` takes `&self` so a recorder can be shared between threads; a
/// recorder that needs mutable state guards it itself.
pub trait ActivityRecorder: Send + Sync {
    fn record(&self, activity: &Activity) -> Result<()>;

    /// Whether an activity of `level` would be recorded at all
    fn is_enabled(&self, _level: ActivityLevel) -> bool {
        true
    }
}

impl<R: ActivityRecorder + ?Sized> ActivityRecorder for Arc<R> {
    fn record(&self, activity: &Activity) -> Result<()> {
        (**self).record(activity)
    }

    fn is_enabled(&self, level: ActivityLevel) -> bool {
        (**self).is_enabled(level)
    }
}

impl<R: ActivityRecorder + ?Sized> ActivityRecorder for Box<R> {
    fn record(&self, activity: &Activity) -> Result<()> {
        (**self).record(activity)
    }

    fn is_enabled(&self, level: ActivityLevel) -> bool {
        (**self).is_enabled(level)
    }
}
