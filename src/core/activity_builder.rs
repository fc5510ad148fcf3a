//! Fluent construction of activities
//!
//! The builder collects a level, identifier, message and context entries and
//! is consumed by [`ActivityBuilder::build`], which validates everything at
//! once so that a half-valid activity never reaches a recorder.

use super::activity::Activity;
use super::activity_level::ActivityLevel;
use super::context::{Context, ContextValue};
use super::error::{ActivityError, Result};
use super::exception_context::context_from;
use super::serializer::{ContextSerializer, Serializable};
use serde::Serialize;
use std::error::Error;

/// Key the exception context is stored under
pub const EXCEPTION_KEY: &str = "exception";

/// Builder for activities
///
/// # Example
///
/// ```
/// use activity_feed::an_error_activity;
///
/// let activity = an_error_activity()
///     .with_identifier("application-error")
///     .with_message("Application Error")
///     .with("action", "search-concerts")
///     .build()
///     .unwrap();
///
/// assert_eq!(activity.entries().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
#[must_use = "builders do nothing until `build` is called"]
pub struct ActivityBuilder {
    level: Option<ActivityLevel>,
    identifier: Option<String>,
    message: Option<String>,
    context: Context,
}

/// Start an activity whose level is chosen later
pub fn an_activity() -> ActivityBuilder {
    ActivityBuilder::new()
}

pub fn a_tracing_activity() -> ActivityBuilder {
    ActivityBuilder::for_level(ActivityLevel::Trace)
}

pub fn a_debugging_activity() -> ActivityBuilder {
    ActivityBuilder::for_level(ActivityLevel::Debug)
}

pub fn an_informational_activity() -> ActivityBuilder {
    ActivityBuilder::for_level(ActivityLevel::Info)
}

pub fn a_warning_activity() -> ActivityBuilder {
    ActivityBuilder::for_level(ActivityLevel::Warn)
}

pub fn an_error_activity() -> ActivityBuilder {
    ActivityBuilder::for_level(ActivityLevel::Error)
}

impl ActivityBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_level(level: ActivityLevel) -> Self {
        Self {
            level: Some(level),
            ..Self::default()
        }
    }

    pub fn level(mut self, level: ActivityLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn trace(self) -> Self {
        self.level(ActivityLevel::Trace)
    }

    pub fn debug(self) -> Self {
        self.level(ActivityLevel::Debug)
    }

    pub fn info(self) -> Self {
        self.level(ActivityLevel::Info)
    }

    pub fn warning(self) -> Self {
        self.level(ActivityLevel::Warn)
    }

    pub fn error(self) -> Self {
        self.level(ActivityLevel::Error)
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Add a context entry
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<ContextValue>,
    {
        self.context.insert(key, value);
        self
    }

    /// Append every entry of `context`, in order
    pub fn with_context(mut self, context: Context) -> Self {
        self.context.extend(context);
        self
    }

    /// Add the description of `error` and its causes under `exception`
    pub fn with_exception(mut self, error: &(dyn Error + 'static)) -> Self {
        self.context.insert(EXCEPTION_KEY, context_from(error));
        self
    }

    /// Like [`with_exception`](Self::with_exception), for an error that may be absent
    ///
    /// Fails with `InvalidArgument` when `error` is `None`.
    pub fn try_with_exception(self, error: Option<&(dyn Error + 'static)>) -> Result<Self> {
        match error {
            Some(error) => Ok(self.with_exception(error)),
            None => Err(ActivityError::invalid_argument("Exception cannot be null")),
        }
    }

    /// Add a value converted by `serializer` as a nested entry
    pub fn with_serialized<T: Serialize + ?Sized>(
        mut self,
        key: impl Into<String>,
        value: &T,
        serializer: &ContextSerializer,
    ) -> Result<Self> {
        self.context.insert(key, serializer.to_context_value(value)?);
        Ok(self)
    }

    /// Add a value that describes itself as a nested entry
    pub fn with_serializable<T: Serializable + ?Sized>(
        mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Self {
        self.context.insert(key, value.to_context());
        self
    }

    /// Validate and produce the activity
    ///
    /// Fails with `InvalidArgument` when the level was never set, when the
    /// identifier or message is missing or blank, or when an entry uses the
    /// reserved `identifier` key.
    pub fn build(self) -> Result<Activity> {
        let level = self.level.ok_or_else(|| {
            ActivityError::invalid_argument("Activity level must be set before building")
        })?;
        Activity::new(
            level,
            self.identifier.unwrap_or_default(),
            self.message.unwrap_or_default(),
            self.context,
        )
    }
}
