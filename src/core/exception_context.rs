//! Structured description of an error and its chain of causes
//!
//! [`context_from`] accepts any `std::error::Error`. Rust errors carry no
//! stack frames of their own, so frames are read from [`TracedError`] links
//! in the chain; every other error contributes an empty trace.
//!
//! The produced context has the keys `message`, `class`, `line`, `file`
//! (only when the error has at least one frame), `trace` (always) and
//! `previous` (only when the error has a source).

use super::context::{Context, ContextValue};
use std::error::Error;
use std::fmt;

/// One location in an error's trace
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StackFrame {
    module_path: String,
    function: Option<String>,
    file: String,
    line: u32,
}

impl StackFrame {
    pub fn new(module_path: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            module_path: module_path.into(),
            function: None,
            file: file.into(),
            line,
        }
    }

    #[must_use]
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// Module (or type) the frame belongs to, reported under `class`
    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.function {
            Some(function) => write!(
                f,
                "{}::{}({}:{})",
                self.module_path, function, self.file, self.line
            ),
            None => write!(f, "{}({}:{})", self.module_path, self.file, self.line),
        }
    }
}

/// Error carrying the frames it was raised from and an optional cause
///
/// Use the [`traced_error!`](crate::traced_error) macro to capture the
/// current module, file and line.
#[derive(Debug)]
pub struct TracedError {
    message: Option<String>,
    frames: Vec<StackFrame>,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl TracedError {
    /// Create an error with a message and no frames
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            frames: Vec::new(),
            source: None,
        }
    }

    /// Create an error without a message
    pub fn without_message() -> Self {
        Self {
            message: None,
            frames: Vec::new(),
            source: None,
        }
    }

    /// Append a frame. The first frame added is the top of the trace.
    #[must_use]
    pub fn at(mut self, frame: StackFrame) -> Self {
        self.frames.push(frame);
        self
    }

    #[must_use]
    pub fn caused_by<E>(mut self, cause: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(cause));
        self
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }
}

impl fmt::Display for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message.as_deref().unwrap_or_default())
    }
}

impl Error for TracedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn Error + 'static))
    }
}

/// Describe `error` and, recursively, every error in its source chain
///
/// An error without a message (a `TracedError` built without one, or any
/// error whose `Display` output is empty) gets a null `message`.
pub fn context_from(error: &(dyn Error + 'static)) -> Context {
    let mut context = Context::new();
    context.insert("message", message_of(error));

    let frames = frames_of(error);
    if let Some(top) = frames.first() {
        context.insert("class", top.module_path());
        context.insert("line", top.line());
        context.insert("file", top.file());
    }
    context.insert(
        "trace",
        frames.iter().map(ToString::to_string).collect::<Vec<_>>(),
    );

    if let Some(cause) = error.source() {
        context.insert("previous", context_from(cause));
    }
    context
}

fn message_of(error: &(dyn Error + 'static)) -> ContextValue {
    match error.downcast_ref::<TracedError>() {
        Some(traced) => ContextValue::from(traced.message()),
        None => {
            let message = error.to_string();
            if message.is_empty() {
                ContextValue::Null
            } else {
                ContextValue::String(message)
            }
        }
    }
}

fn frames_of<'a>(error: &'a (dyn Error + 'static)) -> &'a [StackFrame] {
    error
        .downcast_ref::<TracedError>()
        .map(TracedError::frames)
        .unwrap_or(&[])
}
