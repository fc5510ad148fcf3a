//! Core activity types and traits

pub mod activity;
pub mod activity_builder;
pub mod activity_level;
pub mod context;
pub mod error;
pub mod exception_context;
pub mod feed;
pub mod masking;
pub mod recorder;
pub mod serializer;

pub use activity::{Activity, CONTEXT_KEY, IDENTIFIER_KEY};
pub use activity_builder::{
    a_debugging_activity, a_tracing_activity, a_warning_activity, an_activity,
    an_error_activity, an_informational_activity, ActivityBuilder, EXCEPTION_KEY,
};
pub use activity_level::{ActivityLevel, LevelThreshold};
pub use context::{Context, ContextValue};
pub use error::{ActivityError, Result};
pub use exception_context::{context_from, StackFrame, TracedError};
pub use feed::{ActivityFeed, ActivityFeedBuilder};
pub use masking::{Masked, MaskedValue, DEFAULT_MASK};
pub use recorder::ActivityRecorder;
pub use serializer::{ContextSerializer, Serializable, SerializerConfig, DEFAULT_MAX_DEPTH};
