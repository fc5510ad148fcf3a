//! # Activity Feed
//!
//! Structured, leveled activity recording. Application code states what
//! happened as an [`Activity`] (level, identifier, message and an ordered
//! context) and an [`ActivityFeed`] hands it to every registered recorder.
//!
//! ## Features
//!
//! - **Ordered Context**: contexts keep insertion order end to end
//! - **Structural Serialization**: any `serde::Serialize` value becomes a nested context
//! - **Masking**: sensitive values are replaced before they reach a sink
//! - **Error Chains**: errors and their causes become structured context
//! - **Level Gating**: disabled levels cost a single check
//!
//! ## Example
//!
//! ```
//! use activity_feed::prelude::*;
//! use activity_feed::recorders::MemorySink;
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemorySink::new());
//! let feed = ActivityFeed::with_logging(Arc::clone(&sink));
//!
//! let activity = an_informational_activity()
//!     .with_identifier("file-saved")
//!     .with_message("File saved")
//!     .with("filename", "example.pdf")
//!     .build()?;
//! feed.add(&activity)?;
//!
//! assert_eq!(sink.emissions()[0].message, "File saved");
//! # Ok::<(), activity_feed::ActivityError>(())
//! ```

pub mod core;
pub mod macros;
pub mod recorders;

pub use core::masking;

pub mod prelude {
    pub use crate::core::{
        a_debugging_activity, a_tracing_activity, a_warning_activity, an_activity,
        an_error_activity, an_informational_activity, Activity, ActivityBuilder, ActivityError,
        ActivityFeed, ActivityLevel, ActivityRecorder, Context, ContextSerializer, ContextValue,
        Masked, MaskedValue, Result, Serializable, TracedError,
    };
    pub use crate::recorders::{ActivityLogger, ActivitySink};
}

pub use core::{
    a_debugging_activity, a_tracing_activity, a_warning_activity, an_activity,
    an_error_activity, an_informational_activity, context_from, Activity, ActivityBuilder,
    ActivityError, ActivityFeed, ActivityFeedBuilder, ActivityLevel, ActivityRecorder, Context,
    ContextSerializer, ContextValue, LevelThreshold, Masked, MaskedValue, Result, Serializable,
    SerializerConfig, StackFrame, TracedError, CONTEXT_KEY, DEFAULT_MASK, DEFAULT_MAX_DEPTH,
    EXCEPTION_KEY, IDENTIFIER_KEY,
};
pub use recorders::{ActivityLogger, ActivitySink, JsonSink, MemorySink};
#[cfg(feature = "console")]
pub use recorders::ConsoleSink;
