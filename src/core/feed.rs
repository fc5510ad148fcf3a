//! Fan-out of activities to registered recorders

use super::{
    activity::Activity,
    activity_level::ActivityLevel,
    error::{ActivityError, Result},
    recorder::ActivityRecorder,
};
use crate::recorders::{ActivityLogger, ActivitySink};
use std::fmt;

/// Ordered, non-empty set of recorders
///
/// Every activity handed to [`add`](Self::add) is forwarded to each recorder
/// in registration order. The first recorder failure is returned to the
/// caller and the remaining recorders are not called. The feed holds no
/// mutable state, so it can be shared between threads as-is.
///
/// # Example
///
/// ```
/// use activity_feed::recorders::MemorySink;
/// use activity_feed::{Activity, ActivityFeed};
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let feed = ActivityFeed::with_logging(Arc::clone(&sink));
///
/// feed.add(&Activity::info("user-signed-in", "User signed in").unwrap())
///     .unwrap();
///
/// assert_eq!(sink.len(), 1);
/// ```
pub struct ActivityFeed {
    recorders: Vec<Box<dyn ActivityRecorder>>,
}

impl ActivityFeed {
    /// Create a feed over `recorders`
    ///
    /// Fails with `InvalidArgument` when the list is empty.
    pub fn new(recorders: Vec<Box<dyn ActivityRecorder>>) -> Result<Self> {
        if recorders.is_empty() {
            return Err(ActivityError::invalid_argument(
                "Activity recorders cannot be empty",
            ));
        }
        Ok(Self { recorders })
    }

    /// Feed with a single level-gated recorder writing to `sink`
    pub fn with_logging<S>(sink: S) -> Self
    where
        S: ActivitySink + 'static,
    {
        Self {
            recorders: vec![Box::new(ActivityLogger::new(sink))],
        }
    }

    pub fn builder() -> ActivityFeedBuilder {
        ActivityFeedBuilder::new()
    }

    /// Forward `activity` to every recorder, in registration order
    pub fn add(&self, activity: &Activity) -> Result<()> {
        for recorder in &self.recorders {
            recorder.record(activity)?;
        }
        Ok(())
    }

    /// Same as [`add`](Self::add)
    pub fn record(&self, activity: &Activity) -> Result<()> {
        self.add(activity)
    }

    /// Whether any recorder would record an activity of `level`
    pub fn is_enabled(&self, level: ActivityLevel) -> bool {
        self.recorders
            .iter()
            .any(|recorder| recorder.is_enabled(level))
    }

    /// Build and forward an activity only when some recorder wants `level`
    ///
    /// `make` is not called when the level is disabled everywhere, so no
    /// context is materialized. Returns whether the activity was forwarded.
    pub fn add_if_enabled<F>(&self, level: ActivityLevel, make: F) -> Result<bool>
    where
        F: FnOnce() -> Result<Activity>,
    {
        if !self.is_enabled(level) {
            return Ok(false);
        }
        self.add(&make()?)?;
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.recorders.len()
    }

    /// Always false: a feed cannot be built without recorders
    pub fn is_empty(&self) -> bool {
        self.recorders.is_empty()
    }
}

impl ActivityRecorder for ActivityFeed {
    fn record(&self, activity: &Activity) -> Result<()> {
        self.add(activity)
    }

    fn is_enabled(&self, level: ActivityLevel) -> bool {
        ActivityFeed::is_enabled(self, level)
    }
}

impl fmt::Debug for ActivityFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityFeed")
            .field("recorders", &self.recorders.len())
            .finish()
    }
}

/// Builder for [`ActivityFeed`]
#[derive(Default)]
pub struct ActivityFeedBuilder {
    recorders: Vec<Box<dyn ActivityRecorder>>,
}

impl ActivityFeedBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a recorder after the ones already added
    #[must_use]
    pub fn recorder<R>(mut self, recorder: R) -> Self
    where
        R: ActivityRecorder + 'static,
    {
        self.recorders.push(Box::new(recorder));
        self
    }

    /// Register a level-gated recorder writing to `sink`
    #[must_use]
    pub fn logging<S>(self, sink: S) -> Self
    where
        S: ActivitySink + 'static,
    {
        self.recorder(ActivityLogger::new(sink))
    }

    pub fn build(self) -> Result<ActivityFeed> {
        ActivityFeed::new(self.recorders)
    }
}
