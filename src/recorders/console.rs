//! Console sink

use super::logger::ActivitySink;
use crate::core::{ActivityLevel, Context, LevelThreshold, Result};
use chrono::Local;
use colored::Colorize;

/// Default strftime format for console timestamps
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Writes one text line per activity
///
/// Lines look like `[timestamp] [LEVEL] message {"context":{...}}`. `WARN`
/// and `ERROR` go to stderr, everything else to stdout.
#[derive(Debug)]
pub struct ConsoleSink {
    use_colors: bool,
    timestamp_format: String,
    threshold: LevelThreshold,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            threshold: LevelThreshold::default(),
        }
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    #[must_use]
    pub fn with_min_level(self, level: ActivityLevel) -> Self {
        self.threshold.set_min_level(level);
        self
    }

    /// Use a strftime-compatible timestamp format
    ///
    /// # Examples
    ///
    /// ```
    /// use activity_feed::recorders::ConsoleSink;
    ///
    /// let sink = ConsoleSink::new().with_timestamp_format("%H:%M:%S");
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    pub fn set_min_level(&self, level: ActivityLevel) {
        self.threshold.set_min_level(level);
    }

    fn format_line(&self, level: ActivityLevel, message: &str, context: &Context) -> Result<String> {
        let level_str = if self.use_colors {
            format!("{:5}", level.to_str())
                .color(level.color_code())
                .to_string()
        } else {
            format!("{:5}", level.to_str())
        };

        let timestamp = Local::now().format(&self.timestamp_format);
        let mut line = format!("[{}] [{}] {}", timestamp, level_str, message);
        if !context.is_empty() {
            line.push(' ');
            line.push_str(&serde_json::to_string(context)?);
        }
        Ok(line)
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivitySink for ConsoleSink {
    fn is_level_enabled(&self, level: ActivityLevel) -> bool {
        self.threshold.enables(level)
    }

    fn emit(&self, level: ActivityLevel, message: &str, context: &Context) -> Result<()> {
        let line = self.format_line(level, message, context)?;
        match level {
            ActivityLevel::Warn | ActivityLevel::Error => eprintln!("{}", line),
            _ => println!("{}", line),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Activity;

    #[test]
    fn test_plain_line_layout() {
        let sink = ConsoleSink::new()
            .with_colors(false)
            .with_timestamp_format("TS");
        let activity = Activity::info_with("file-saved", "File saved", |context| {
            context.insert("filename", "example.pdf");
        })
        .unwrap();

        let line = sink
            .format_line(activity.level(), activity.message(), &activity.context())
            .unwrap();

        assert_eq!(
            line,
            r#"[TS] [INFO ] File saved {"context":{"identifier":"file-saved","filename":"example.pdf"}}"#
        );
    }

    #[test]
    fn test_default_threshold_is_info() {
        let sink = ConsoleSink::new();

        assert!(!sink.is_level_enabled(ActivityLevel::Debug));
        assert!(sink.is_level_enabled(ActivityLevel::Info));

        let sink = sink.with_min_level(ActivityLevel::Trace);
        assert!(sink.is_level_enabled(ActivityLevel::Trace));
    }
}
