//! Sources of "today's tasks" for the focus timer.

use crate::domain::{find_active_task, ActiveTask, Task};
use crate::persistence::TaskStore;
use anyhow::Result;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};

/// Something that can hand out the task list of a day
pub trait TaskProvider {
    /// Tasks scheduled on `date`
    fn tasks_for(&self, date: NaiveDate) -> Result<Vec<Task>>;

    /// Tasks scheduled today, by the local clock
    fn todays_tasks(&self) -> Result<Vec<Task>> {
        self.tasks_for(Local::now().date_naive())
    }

    /// Pick up changes made elsewhere (a reload, a sync)
    fn refresh(&mut self) -> Result<()> {
        Ok(())
    }

    /// Short name shown in the focus panel title
    fn describe(&self) -> String {
        "tasks".to_string()
    }
}

/// The editor's own store: always current, nothing to refresh
impl TaskProvider for TaskStore {
    fn tasks_for(&self, date: NaiveDate) -> Result<Vec<Task>> {
        Ok(self.tasks_on(date).to_vec())
    }

    fn describe(&self) -> String {
        self.path().display().to_string()
    }
}

/// A separately synced task file, re-read on refresh
#[derive(Debug)]
pub struct JsonFileProvider {
    path: PathBuf,
    store: TaskStore,
}

impl JsonFileProvider {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let store = TaskStore::load(&path);
        Self { path, store }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskProvider for JsonFileProvider {
    fn tasks_for(&self, date: NaiveDate) -> Result<Vec<Task>> {
        self.store.tasks_for(date)
    }

    fn refresh(&mut self) -> Result<()> {
        self.store = TaskStore::load(&self.path);
        log::debug!("Reloaded tasks from {}", self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Ask the provider for a day's tasks; failures are logged and count as no tasks
pub fn tasks_or_empty<P: TaskProvider + ?Sized>(provider: &P, date: NaiveDate) -> Vec<Task> {
    provider.tasks_for(date).unwrap_or_else(|err| {
        log::warn!("Task provider failed for {}: {:#}", date, err);
        Vec::new()
    })
}

/// The task active at `now`: today's list first, then yesterday's for tasks
/// running past midnight.
pub fn find_active_now<P: TaskProvider + ?Sized>(provider: &P, now: NaiveDateTime) -> Option<ActiveTask> {
    let today = now.date();
    if let Some(active) = find_active_task(&tasks_or_empty(provider, today), today, now) {
        return Some(active);
    }

    let yesterday = today - Duration::days(1);
    find_active_task(&tasks_or_empty(provider, yesterday), yesterday, now)
}
