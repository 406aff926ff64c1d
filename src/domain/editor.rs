use super::task::{format_clock, parse_clock, Task};
use serde_json::Map;
use thiserror::Error;

/// Highest accepted priority
pub const MAX_PRIORITY: u8 = 10;

/// Why an add/edit was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("another task already starts at {0}")]
    DuplicateStartTime(String),
    #[error("invalid {field} time '{value}', expected HH:MM")]
    InvalidTime { field: &'static str, value: String },
    #[error("priority {0} is out of range (0-10)")]
    PriorityOutOfRange(u8),
    #[error("no task at position {0}")]
    NoSuchTask(usize),
}

/// User input for a new or edited task
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    pub title: String,
    pub time: String,
    pub to: String,
    pub description: String,
    pub priority: u8,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, time: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            time: time.into(),
            to: to.into(),
            ..Self::default()
        }
    }

    /// Prefill a draft from an existing task
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            time: task.time.clone(),
            to: task.to.clone(),
            description: task.description.clone(),
            priority: task.priority,
        }
    }

    /// Check the draft and turn it into a task with canonical "HH:MM" times.
    ///
    /// Conflicts with other tasks of the same day are checked by the store.
    pub fn validate(&self) -> Result<Task, EditError> {
        let start = parse_clock(&self.time).ok_or_else(|| EditError::InvalidTime {
            field: "start",
            value: self.time.clone(),
        })?;
        let end = parse_clock(&self.to).ok_or_else(|| EditError::InvalidTime {
            field: "end",
            value: self.to.clone(),
        })?;
        if self.priority > MAX_PRIORITY {
            return Err(EditError::PriorityOutOfRange(self.priority));
        }

        Ok(Task {
            title: self.title.trim().to_string(),
            time: format_clock(start),
            to: format_clock(end),
            description: self.description.trim().to_string(),
            priority: self.priority,
            done: false,
            extra: Map::new(),
        })
    }
}

/// Reject `task` if another task of the day (other than `skip`) starts at the same time
pub fn check_start_conflict(day: &[Task], task: &Task, skip: Option<usize>) -> Result<(), EditError> {
    let clash = day
        .iter()
        .enumerate()
        .any(|(i, existing)| Some(i) != skip && same_start(&existing.time, &task.time));
    if clash {
        return Err(EditError::DuplicateStartTime(task.time.clone()));
    }
    Ok(())
}

fn same_start(a: &str, b: &str) -> bool {
    match (parse_clock(a), parse_clock(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}
