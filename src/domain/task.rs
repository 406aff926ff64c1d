use super::editor::MAX_PRIORITY;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Format used for the `time` / `to` fields of a task
pub const CLOCK_FORMAT: &str = "%H:%M";

/// A single to-do entry scheduled on a calendar day.
///
/// Fields of the wrong JSON type fall back to their defaults, so one task
/// written badly by another producer does not make the whole file unreadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    /// Start time, "HH:MM"
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: String,
    /// End time, "HH:MM". An end at or before the start means the next day.
    #[serde(default, deserialize_with = "lenient_string")]
    pub to: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    /// 0 (low) to 10 (high)
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: u8,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub done: bool,
    /// Fields written by other producers (e.g. a sync script), kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        _ => String::new(),
    })
}

/// Numbers above the scale clamp to its top; negatives and non-numbers read as 0
fn lenient_priority<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => match n.as_u64() {
            Some(p) => p.min(u64::from(MAX_PRIORITY)) as u8,
            None => n.as_f64().filter(|p| *p > 0.0).map_or(0, |p| p.min(f64::from(MAX_PRIORITY)) as u8),
        },
        _ => 0,
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

/// What makes two countdowns "the same task"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskIdentity {
    pub title: String,
    pub time: String,
}

impl Task {
    pub fn new(title: impl Into<String>, time: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            time: time.into(),
            to: to.into(),
            description: String::new(),
            priority: 0,
            done: false,
            extra: Map::new(),
        }
    }

    pub fn identity(&self) -> TaskIdentity {
        TaskIdentity {
            title: self.title.clone(),
            time: self.time.clone(),
        }
    }

    /// Parsed start time, if the field is well formed
    pub fn start_time(&self) -> Option<NaiveTime> {
        parse_clock(&self.time)
    }

    /// Parsed end time, if the field is well formed
    pub fn end_time(&self) -> Option<NaiveTime> {
        parse_clock(&self.to)
    }

    /// The `[start, end)` interval of this task when scheduled on `date`.
    ///
    /// Returns `None` when either time field is missing or malformed.
    pub fn interval_on(&self, date: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let start = date.and_time(self.start_time()?);
        let mut end = date.and_time(self.end_time()?);
        if end <= start {
            end += Duration::days(1);
        }
        Some((start, end))
    }

    /// Title for display, with a placeholder for untitled tasks
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "No title"
        } else {
            &self.title
        }
    }
}

/// Parse an "HH:MM" clock string (single-digit parts and surrounding spaces allowed)
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    let (hours, minutes) = value.trim().split_once(':')?;
    let hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Format a time as the canonical zero-padded "HH:MM"
pub fn format_clock(time: NaiveTime) -> String {
    time.format(CLOCK_FORMAT).to_string()
}
