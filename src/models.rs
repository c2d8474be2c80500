// Data models for TaskRoll

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse duration tier for a task, persisted as its ordinal code 1..=4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TimeBucket {
    UpToTen = 1,
    TenToTwenty = 2,
    HalfHourToHour = 3,
    OverHour = 4,
}

impl TimeBucket {
    /// Ordinal code as stored in exchange files
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Human readable range shown when asking which tier to roll from
    pub fn label(self) -> &'static str {
        match self {
            TimeBucket::UpToTen => "0 - 10 min",
            TimeBucket::TenToTwenty => "10 - 20 min",
            TimeBucket::HalfHourToHour => "30 min - 1 hour",
            TimeBucket::OverHour => "1 hour +",
        }
    }
}

impl TryFrom<u8> for TimeBucket {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(TimeBucket::UpToTen),
            2 => Ok(TimeBucket::TenToTwenty),
            3 => Ok(TimeBucket::HalfHourToHour),
            4 => Ok(TimeBucket::OverHour),
            other => Err(format!("invalid time bucket {} (expected 1-4)", other)),
        }
    }
}

impl From<TimeBucket> for u8 {
    fn from(bucket: TimeBucket) -> Self {
        bucket.value()
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single rollable activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub time: TimeBucket,
}

impl Task {
    pub fn new(name: impl Into<String>, time: TimeBucket) -> Self {
        Self {
            name: name.into(),
            time,
        }
    }
}

/// Named collection of tasks. The name is the lookup identity.
///
/// Field names are shared by every exchange format, so `timeSensitive` keeps
/// its camelCase spelling on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    #[serde(default, alias = "desc")]
    pub description: String,
    #[serde(default)]
    pub time_sensitive: bool,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Category {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            time_sensitive: false,
            tasks: Vec::new(),
        }
    }

    pub fn time_sensitive(mut self, time_sensitive: bool) -> Self {
        self.time_sensitive = time_sensitive;
        self
    }

    pub fn with_task(mut self, name: impl Into<String>, time: TimeBucket) -> Self {
        self.tasks.push(Task::new(name, time));
        self
    }

    /// Category seeded into a freshly reset store
    pub fn general() -> Self {
        Category::new("General", "Small things that make the day better")
            .time_sensitive(true)
            .with_task("Drink a glass of water", TimeBucket::UpToTen)
            .with_task("Stretch", TimeBucket::UpToTen)
            .with_task("Tidy your desk", TimeBucket::TenToTwenty)
            .with_task("Go for a walk", TimeBucket::HalfHourToHour)
            .with_task("Read a book", TimeBucket::OverHour)
    }
}

/// Load-time view of a category carrying a list position.
///
/// `key` is regenerated on every load and never written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedCategory {
    pub key: usize,
    pub category: Category,
}

/// Helper function to get current timestamp in milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
