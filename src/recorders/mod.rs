//! Concrete sinks and the level-gated recorder that drives them

#[cfg(feature = "console")]
pub mod console;
pub mod json;
pub mod logger;
pub mod memory;

#[cfg(feature = "console")]
pub use console::ConsoleSink;
pub use json::JsonSink;
pub use logger::{ActivityLogger, ActivitySink};
pub use memory::{Emission, MemorySink};
