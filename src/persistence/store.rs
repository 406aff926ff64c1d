use crate::domain::{check_start_conflict, visible_indices, EditError, Task, TaskDraft};
use crate::persistence::{atomic_write, backup_file, read_file};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key format of the day mapping
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Date string -> tasks of that day
pub type DayMap = BTreeMap<String, Vec<Task>>;

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Tasks of every day, persisted as one JSON object
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    path: PathBuf,
    days: DayMap,
}

impl TaskStore {
    /// An empty store that will be saved to `path`
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            days: DayMap::new(),
        }
    }

    /// Load the store from `path`.
    ///
    /// A missing, unreadable or malformed file yields an empty store. A malformed
    /// file is backed up first so the next save does not lose it.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let days = match read_days(&path) {
            Ok(days) => days,
            Err(err) => {
                log::warn!("Ignoring task store {}: {:#}", path.display(), err);
                match backup_file(&path) {
                    Ok(backup) if backup != path => {
                        log::warn!("Backed up unreadable store to {}", backup.display())
                    }
                    Ok(_) => {}
                    Err(err) => log::warn!("Could not back up {}: {:#}", path.display(), err),
                }
                DayMap::new()
            }
        };
        log::debug!("Loaded {} day(s) from {}", days.len(), path.display());
        Self { path, days }
    }

    /// Write the whole store back to its file
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.days).context("Failed to serialize tasks")?;
        atomic_write(&self.path, &json)?;
        log::debug!("Saved {} day(s) to {}", self.days.len(), self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn days(&self) -> &DayMap {
        &self.days
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Tasks scheduled on `date`, in insertion order
    pub fn tasks_on(&self, date: NaiveDate) -> &[Task] {
        self.days.get(&date_key(date)).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn task(&self, date: NaiveDate, index: usize) -> Option<&Task> {
        self.tasks_on(date).get(index)
    }

    /// Store positions of the tasks shown for `date`
    pub fn visible_indices(&self, date: NaiveDate, show_done: bool) -> Vec<usize> {
        visible_indices(self.tasks_on(date), show_done)
    }

    /// Dates that have at least one task
    pub fn dates_with_tasks(&self) -> Vec<NaiveDate> {
        self.days
            .iter()
            .filter(|(_, tasks)| !tasks.is_empty())
            .filter_map(|(key, _)| NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).ok())
            .collect()
    }

    /// Append a task to `date`, returning its position
    pub fn add_task(&mut self, date: NaiveDate, draft: &TaskDraft) -> Result<usize, EditError> {
        let task = draft.validate()?;
        check_start_conflict(self.tasks_on(date), &task, None)?;

        let tasks = self.days.entry(date_key(date)).or_default();
        tasks.push(task);
        Ok(tasks.len() - 1)
    }

    /// Replace the task at `index`, keeping its done flag and extra fields
    pub fn update_task(&mut self, date: NaiveDate, index: usize, draft: &TaskDraft) -> Result<(), EditError> {
        let mut task = draft.validate()?;
        let existing = self.task(date, index).ok_or(EditError::NoSuchTask(index))?;
        check_start_conflict(self.tasks_on(date), &task, Some(index))?;

        task.done = existing.done;
        task.extra = existing.extra.clone();
        if let Some(slot) = self.days.get_mut(&date_key(date)).and_then(|tasks| tasks.get_mut(index)) {
            *slot = task;
        }
        Ok(())
    }

    /// Remove the task at `index`; the day disappears with its last task
    pub fn remove_task(&mut self, date: NaiveDate, index: usize) -> Option<Task> {
        let key = date_key(date);
        let tasks = self.days.get_mut(&key)?;
        if index >= tasks.len() {
            return None;
        }
        let removed = tasks.remove(index);
        if tasks.is_empty() {
            self.days.remove(&key);
        }
        Some(removed)
    }

    /// Flip the done flag, returning the new value
    pub fn toggle_done(&mut self, date: NaiveDate, index: usize) -> Option<bool> {
        let task = self.days.get_mut(&date_key(date))?.get_mut(index)?;
        task.done = !task.done;
        Some(task.done)
    }

    /// Overwrite a whole day, as a sync producer does
    pub fn replace_day(&mut self, date: NaiveDate, tasks: Vec<Task>) {
        let key = date_key(date);
        if tasks.is_empty() {
            self.days.remove(&key);
        } else {
            self.days.insert(key, tasks);
        }
    }

    /// Drop days older than `days_to_keep` days before `today`, and keys that are
    /// not dates. Returns how many days were removed.
    pub fn prune_older_than(&mut self, today: NaiveDate, days_to_keep: i64) -> usize {
        let before = self.days.len();
        self.days.retain(|key, _| match NaiveDate::parse_from_str(key, DATE_KEY_FORMAT) {
            Ok(day) => (today - day).num_days() <= days_to_keep,
            Err(_) => false,
        });
        let removed = before - self.days.len();
        if removed > 0 {
            log::info!("Pruned {} day(s) older than {} days", removed, days_to_keep);
        }
        removed
    }
}

/// Parse a date-keyed JSON mapping.
///
/// Only a top level that is not an object fails. A day that is not a list, or
/// an entry that is not a task object, is logged and left out.
pub fn parse_days(content: &str) -> Result<DayMap> {
    if content.trim().is_empty() {
        return Ok(DayMap::new());
    }
    let raw: BTreeMap<String, Value> = serde_json::from_str(content).context("Malformed task store")?;
    Ok(days_from_values(raw))
}

fn read_days(path: &Path) -> Result<DayMap> {
    parse_days(&read_file(path)?)
}

fn days_from_values(raw: BTreeMap<String, Value>) -> DayMap {
    let mut days = DayMap::new();
    for (key, value) in raw {
        match value {
            Value::Array(items) => {
                let tasks = tasks_from_values(&key, items);
                days.insert(key, tasks);
            }
            other => log::warn!("Skipping day '{}': expected a task list, found {}", key, other),
        }
    }
    days
}

fn tasks_from_values(key: &str, items: Vec<Value>) -> Vec<Task> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value::<Task>(item) {
            Ok(task) => Some(task),
            Err(err) => {
                log::warn!("Skipping task #{} of '{}': {}", i + 1, key, err);
                None
            }
        })
        .collect()
}

/// Parse what a sync producer hands over: either one day's task array (filed
/// under `date`) or a whole date-keyed mapping
pub fn parse_import(content: &str, date: NaiveDate) -> Result<DayMap> {
    let value: Value = serde_json::from_str(content).context("Import is not valid JSON")?;
    match value {
        Value::Array(items) => {
            let key = date_key(date);
            let tasks = tasks_from_values(&key, items);
            Ok(DayMap::from([(key, tasks)]))
        }
        Value::Object(map) => Ok(days_from_values(map.into_iter().collect())),
        _ => anyhow::bail!("Import must be a task array or a date-keyed object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_parse_import_day_array() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let days = parse_import(r#"[{"id": "n1", "title": "Synced", "time": "10:00", "to": "11:00"}]"#, day).unwrap();

        let tasks = &days["2024-05-10"];
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Synced");
        assert_eq!(tasks[0].extra["id"], "n1");
    }

    #[test]
    fn test_parse_import_mapping_and_garbage() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let days = parse_import(r#"{"2024-05-11": [], "2024-05-12": [{"title": "B"}]}"#, day).unwrap();
        assert_eq!(days.len(), 2);
        assert!(days["2024-05-11"].is_empty());

        let days = parse_import(r#"[{"title": "Good"}, {"title": 5, "done": 1}, null]"#, day).unwrap();
        let tasks = &days["2024-05-10"];
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].title, "");
        assert!(!tasks[1].done);

        assert!(parse_import("42", day).is_err());
        assert!(parse_import("{not json", day).is_err());
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft(title: &str, time: &str, to: &str) -> TaskDraft {
        TaskDraft::new(title, time, to)
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp_dir = tempdir().unwrap();
        let store = TaskStore::load(temp_dir.path().join("data.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_malformed_file_is_empty_and_backed_up() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("data.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = TaskStore::load(&path);
        assert!(store.is_empty());

        let backups = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".bak."))
            .count();
        assert_eq!(backups, 1);
    }

    #[test]
    fn test_load_keeps_good_tasks_beside_malformed_one() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("data.json");
        std::fs::write(
            &path,
            r#"{
                "2024-05-09": [{"title": "Yesterday", "time": "09:00", "to": "10:00"}],
                "2024-05-10": [
                    {"title": "Standup", "time": "09:00", "to": "09:30"},
                    {"title": "Synced", "time": null, "to": "11:00", "priority": 11},
                    "not a task"
                ],
                "2024-05-11": "not a list"
            }"#,
        )
        .unwrap();

        let store = TaskStore::load(&path);
        assert_eq!(store.days().len(), 2);
        let tasks = store.tasks_on(date(2024, 5, 10));
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "Standup");
        assert_eq!(tasks[1].title, "Synced");
        assert_eq!(tasks[1].time, "");
        assert_eq!(tasks[1].priority, 10);

        // The file was readable, so nothing was backed up
        let backups = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".bak."))
            .count();
        assert_eq!(backups, 0);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("data.json");
        let day = date(2024, 5, 10);

        let mut store = TaskStore::empty(&path);
        store.add_task(day, &draft("Standup", "09:00", "09:15")).unwrap();
        store.add_task(day, &draft("Review", "10:00", "11:00")).unwrap();
        store.toggle_done(day, 1);
        store.save().unwrap();

        let loaded = TaskStore::load(&path);
        assert_eq!(loaded.days(), store.days());
        assert_eq!(loaded.tasks_on(day)[1].title, "Review");
        assert!(loaded.tasks_on(day)[1].done);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"2024-05-10\""));
    }

    #[test]
    fn test_unknown_fields_survive_save() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("data.json");
        std::fs::write(
            &path,
            r#"{"2024-05-10": [{"id": "page-1", "title": "Synced", "time": "10:00", "to": "11:00"}]}"#,
        )
        .unwrap();

        let mut store = TaskStore::load(&path);
        store
            .update_task(date(2024, 5, 10), 0, &draft("Renamed", "10:00", "11:30"))
            .unwrap();
        store.save().unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["2024-05-10"][0]["id"], "page-1");
        assert_eq!(raw["2024-05-10"][0]["title"], "Renamed");
    }

    #[test]
    fn test_add_rejects_duplicate_start() {
        let mut store = TaskStore::empty("unused.json");
        let day = date(2024, 5, 10);
        store.add_task(day, &draft("A", "09:00", "10:00")).unwrap();

        let err = store.add_task(day, &draft("B", "9:00", "09:30")).unwrap_err();
        assert_eq!(err, EditError::DuplicateStartTime("09:00".to_string()));
        assert_eq!(store.tasks_on(day).len(), 1);

        // Same start on another day is fine
        store.add_task(date(2024, 5, 11), &draft("B", "09:00", "09:30")).unwrap();
    }

    #[test]
    fn test_update_checks_other_tasks_only() {
        let mut store = TaskStore::empty("unused.json");
        let day = date(2024, 5, 10);
        store.add_task(day, &draft("A", "09:00", "10:00")).unwrap();
        store.add_task(day, &draft("B", "11:00", "12:00")).unwrap();
        store.toggle_done(day, 0);

        store.update_task(day, 0, &draft("A2", "09:00", "10:30")).unwrap();
        assert_eq!(store.tasks_on(day)[0].title, "A2");
        assert!(store.tasks_on(day)[0].done);

        let err = store.update_task(day, 0, &draft("A3", "11:00", "11:30")).unwrap_err();
        assert_eq!(err, EditError::DuplicateStartTime("11:00".to_string()));

        let err = store.update_task(day, 5, &draft("X", "13:00", "14:00")).unwrap_err();
        assert_eq!(err, EditError::NoSuchTask(5));
    }

    #[test]
    fn test_remove_last_task_drops_day() {
        let mut store = TaskStore::empty("unused.json");
        let day = date(2024, 5, 10);
        store.add_task(day, &draft("A", "09:00", "10:00")).unwrap();
        store.add_task(day, &draft("B", "11:00", "12:00")).unwrap();

        assert_eq!(store.remove_task(day, 0).map(|t| t.title), Some("A".to_string()));
        assert_eq!(store.dates_with_tasks(), vec![day]);
        assert!(store.remove_task(day, 3).is_none());

        store.remove_task(day, 0);
        assert!(store.is_empty());
        assert!(store.remove_task(day, 0).is_none());
    }

    #[test]
    fn test_prune_older_than() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, r#"{"someday": [{"title": "Odd", "time": "09:00", "to": "10:00"}]}"#).unwrap();

        let mut store = TaskStore::load(&path);
        let today = date(2024, 5, 10);
        for offset in [-2, 0, 6, 7, 8, 30] {
            let day = today - chrono::Duration::days(offset);
            store.add_task(day, &draft("Task", "09:00", "10:00")).unwrap();
        }
        assert_eq!(store.days().len(), 7);

        let removed = store.prune_older_than(today, 7);
        assert_eq!(removed, 3);
        assert_eq!(
            store.dates_with_tasks(),
            vec![date(2024, 5, 3), date(2024, 5, 4), today, date(2024, 5, 12)]
        );
    }

    #[test]
    fn test_replace_day() {
        let mut store = TaskStore::empty("unused.json");
        let day = date(2024, 5, 10);
        store.add_task(day, &draft("Local", "08:00", "09:00")).unwrap();

        store.replace_day(day, vec![Task::new("Synced", "10:00", "11:00")]);
        assert_eq!(store.tasks_on(day).len(), 1);
        assert_eq!(store.tasks_on(day)[0].title, "Synced");

        store.replace_day(day, Vec::new());
        assert!(store.is_empty());
    }

    #[test]
    fn test_visible_indices_skip_done() {
        let mut store = TaskStore::empty("unused.json");
        let day = date(2024, 5, 10);
        store.add_task(day, &draft("A", "08:00", "09:00")).unwrap();
        store.add_task(day, &draft("B", "09:00", "10:00")).unwrap();
        store.add_task(day, &draft("C", "10:00", "11:00")).unwrap();
        store.toggle_done(day, 1);

        assert_eq!(store.visible_indices(day, false), vec![0, 2]);
        assert_eq!(store.visible_indices(day, true), vec![0, 1, 2]);
    }

    #[test]
    fn test_parse_days_empty_content() {
        assert!(parse_days("").unwrap().is_empty());
        assert!(parse_days("  \n").unwrap().is_empty());
        assert!(parse_days("[1, 2]").is_err());
    }
}
