//! Activity level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

/// Severity of an activity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl ActivityLevel {
    /// All levels, least severe first
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Trace,
        ActivityLevel::Debug,
        ActivityLevel::Info,
        ActivityLevel::Warn,
        ActivityLevel::Error,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            ActivityLevel::Trace => "TRACE",
            ActivityLevel::Debug => "DEBUG",
            ActivityLevel::Info => "INFO",
            ActivityLevel::Warn => "WARN",
            ActivityLevel::Error => "ERROR",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => ActivityLevel::Trace,
            1 => ActivityLevel::Debug,
            2 => ActivityLevel::Info,
            3 => ActivityLevel::Warn,
            _ => ActivityLevel::Error,
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            ActivityLevel::Trace => BrightBlack,
            ActivityLevel::Debug => Blue,
            ActivityLevel::Info => Green,
            ActivityLevel::Warn => Yellow,
            ActivityLevel::Error => Red,
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TRACE" => Ok(ActivityLevel::Trace),
            "DEBUG" => Ok(ActivityLevel::Debug),
            "INFO" => Ok(ActivityLevel::Info),
            "WARN" | "WARNING" => Ok(ActivityLevel::Warn),
            "ERROR" => Ok(ActivityLevel::Error),
            _ => Err(format!("Invalid activity level: '{}'", s)),
        }
    }
}

/// Minimum enabled level shared between a sink and whoever configures it
///
/// Checking a level is a single atomic load, so sinks can gate activities
/// without taking a lock.
#[derive(Debug)]
pub struct LevelThreshold {
    min_level: AtomicU8,
}

impl LevelThreshold {
    pub const fn new(min_level: ActivityLevel) -> Self {
        Self {
            min_level: AtomicU8::new(min_level as u8),
        }
    }

    /// Whether activities at `level` pass this threshold
    #[inline]
    pub fn enables(&self, level: ActivityLevel) -> bool {
        level as u8 >= self.min_level.load(Ordering::Relaxed)
    }

    pub fn min_level(&self) -> ActivityLevel {
        ActivityLevel::from_u8(self.min_level.load(Ordering::Relaxed))
    }

    pub fn set_min_level(&self, level: ActivityLevel) {
        self.min_level.store(level as u8, Ordering::Relaxed);
    }
}

impl Default for LevelThreshold {
    fn default() -> Self {
        Self::new(ActivityLevel::Info)
    }
}
