//! Immutable activity record

use super::activity_level::ActivityLevel;
use super::context::Context;
use super::error::{ActivityError, Result};

/// Key every rendered activity context is nested under
pub const CONTEXT_KEY: &str = "context";

/// Key carrying the activity identifier inside the rendered context
pub const IDENTIFIER_KEY: &str = "identifier";

/// A leveled, named event with a human message and structured context
///
/// Identifier and message are never blank, and the context never holds an
/// `identifier` entry of its own. Two activities are equal when their level,
/// identifier, message and context entries (in order) are.
///
/// # Example
///
/// ```
/// use activity_feed::{Activity, ActivityLevel};
///
/// let activity = Activity::info_with("file-saved", "File saved", |context| {
///     context.insert("filename", "example.pdf");
/// })
/// .unwrap();
///
/// assert_eq!(activity.level(), ActivityLevel::Info);
/// let rendered = activity.context();
/// let inner = rendered.get("context").and_then(|v| v.as_map()).unwrap();
/// assert_eq!(inner.keys().collect::<Vec<_>>(), vec!["identifier", "filename"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Activity {
    level: ActivityLevel,
    identifier: String,
    message: String,
    context: Context,
}

impl Activity {
    /// Create an activity from a prebuilt context
    pub fn new(
        level: ActivityLevel,
        identifier: impl Into<String>,
        message: impl Into<String>,
        context: Context,
    ) -> Result<Self> {
        let identifier = identifier.into();
        if identifier.trim().is_empty() {
            return Err(ActivityError::invalid_argument(format!(
                "Activity identifier cannot be blank. '{}' given",
                identifier
            )));
        }
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ActivityError::invalid_argument(format!(
                "Activity message cannot be blank. '{}' given",
                message
            )));
        }
        if context.contains_key(IDENTIFIER_KEY) {
            return Err(ActivityError::invalid_argument(format!(
                "Activity context cannot contain the reserved key '{}'",
                IDENTIFIER_KEY
            )));
        }
        Ok(Self {
            level,
            identifier,
            message,
            context,
        })
    }

    /// Create an activity whose context is filled by `factory`
    pub fn with_factory<F>(
        level: ActivityLevel,
        identifier: impl Into<String>,
        message: impl Into<String>,
        factory: F,
    ) -> Result<Self>
    where
        F: FnOnce(&mut Context),
    {
        let mut context = Context::new();
        factory(&mut context);
        Self::new(level, identifier, message, context)
    }

    pub fn trace(identifier: impl Into<String>, message: impl Into<String>) -> Result<Self> {
        Self::new(ActivityLevel::Trace, identifier, message, Context::new())
    }

    pub fn trace_with<F: FnOnce(&mut Context)>(
        identifier: impl Into<String>,
        message: impl Into<String>,
        factory: F,
    ) -> Result<Self> {
        Self::with_factory(ActivityLevel::Trace, identifier, message, factory)
    }

    pub fn debug(identifier: impl Into<String>, message: impl Into<String>) -> Result<Self> {
        Self::new(ActivityLevel::Debug, identifier, message, Context::new())
    }

    pub fn debug_with<F: FnOnce(&mut Context)>(
        identifier: impl Into<String>,
        message: impl Into<String>,
        factory: F,
    ) -> Result<Self> {
        Self::with_factory(ActivityLevel::Debug, identifier, message, factory)
    }

    pub fn info(identifier: impl Into<String>, message: impl Into<String>) -> Result<Self> {
        Self::new(ActivityLevel::Info, identifier, message, Context::new())
    }

    pub fn info_with<F: FnOnce(&mut Context)>(
        identifier: impl Into<String>,
        message: impl Into<String>,
        factory: F,
    ) -> Result<Self> {
        Self::with_factory(ActivityLevel::Info, identifier, message, factory)
    }

    pub fn warn(identifier: impl Into<String>, message: impl Into<String>) -> Result<Self> {
        Self::new(ActivityLevel::Warn, identifier, message, Context::new())
    }

    pub fn warn_with<F: FnOnce(&mut Context)>(
        identifier: impl Into<String>,
        message: impl Into<String>,
        factory: F,
    ) -> Result<Self> {
        Self::with_factory(ActivityLevel::Warn, identifier, message, factory)
    }

    pub fn error(identifier: impl Into<String>, message: impl Into<String>) -> Result<Self> {
        Self::new(ActivityLevel::Error, identifier, message, Context::new())
    }

    pub fn error_with<F: FnOnce(&mut Context)>(
        identifier: impl Into<String>,
        message: impl Into<String>,
        factory: F,
    ) -> Result<Self> {
        Self::with_factory(ActivityLevel::Error, identifier, message, factory)
    }

    pub fn level(&self) -> ActivityLevel {
        self.level
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Context entries exactly as supplied
    pub fn entries(&self) -> &Context {
        &self.context
    }

    /// Rendered context: `{"context": {"identifier": .., ..entries}}`
    ///
    /// The identifier always comes first.
    pub fn context(&self) -> Context {
        let mut inner = Context::new().with_entry(IDENTIFIER_KEY, self.identifier.as_str());
        inner.extend(self.context.clone());
        Context::new().with_entry(CONTEXT_KEY, inner)
    }
}
