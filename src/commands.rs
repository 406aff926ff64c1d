//! Bodies of the non-interactive subcommands. Each returns the text to print.

use crate::domain::{done_badge, format_countdown, time_range, TaskDraft};
use crate::persistence::{date_key, parse_import, TaskStore, DATE_KEY_FORMAT};
use crate::provider::{find_active_now, TaskProvider};
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};

/// Parse an optional YYYY-MM-DD argument, defaulting to `today`
pub fn parse_date_arg(arg: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match arg {
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map_err(|e| anyhow::anyhow!("Invalid date format. Use YYYY-MM-DD: {}", e)),
        None => Ok(today),
    }
}

/// Map a 1-based position as printed by `list` to a store index
fn store_index(store: &TaskStore, date: NaiveDate, position: usize) -> Result<usize> {
    let count = store.tasks_on(date).len();
    if position == 0 || position > count {
        anyhow::bail!("No task #{} on {} ({} task(s))", position, date, count);
    }
    Ok(position - 1)
}

pub fn add(store: &mut TaskStore, date: NaiveDate, draft: &TaskDraft) -> Result<String> {
    let index = store.add_task(date, draft)?;
    store.save()?;
    let task = &store.tasks_on(date)[index];
    Ok(format!("Added #{} '{}' ({}) on {}", index + 1, task.display_title(), time_range(task), date))
}

pub fn list(store: &TaskStore, date: NaiveDate) -> String {
    let tasks = store.tasks_on(date);
    if tasks.is_empty() {
        return format!("No tasks on {}", date);
    }

    let mut out = format!("{}\n", date.format("%A %d %B %Y"));
    for (i, task) in tasks.iter().enumerate() {
        out.push_str(&format!("{:>3}. {} {}  {}", i + 1, done_badge(task), time_range(task), task.display_title()));
        if task.priority > 0 {
            out.push_str(&format!("  P{}", task.priority));
        }
        out.push('\n');
        if !task.description.is_empty() {
            out.push_str(&format!("       {}\n", task.description));
        }
    }
    out
}

pub fn toggle_done(store: &mut TaskStore, date: NaiveDate, position: usize) -> Result<String> {
    let index = store_index(store, date, position)?;
    let done = store
        .toggle_done(date, index)
        .with_context(|| format!("No task #{} on {}", position, date))?;
    store.save()?;
    let title = store.tasks_on(date)[index].display_title();
    Ok(if done {
        format!("Marked '{}' done", title)
    } else {
        format!("Marked '{}' not done", title)
    })
}

pub fn remove(store: &mut TaskStore, date: NaiveDate, position: usize) -> Result<String> {
    let index = store_index(store, date, position)?;
    let task = store
        .remove_task(date, index)
        .with_context(|| format!("No task #{} on {}", position, date))?;
    store.save()?;
    Ok(format!("Removed '{}' from {}", task.display_title(), date))
}

pub fn prune(store: &mut TaskStore, today: NaiveDate, days_to_keep: i64) -> Result<String> {
    let removed = store.prune_older_than(today, days_to_keep);
    if removed > 0 {
        store.save()?;
    }
    Ok(format!("Removed {} day(s) older than {} days", removed, days_to_keep))
}

/// Hand a producer's tasks over to the store, overwriting the days it covers
pub fn import(store: &mut TaskStore, content: &str, date: NaiveDate) -> Result<String> {
    let days = parse_import(content, date)?;

    let mut parsed = Vec::with_capacity(days.len());
    for (key, tasks) in days {
        let day = NaiveDate::parse_from_str(&key, DATE_KEY_FORMAT)
            .map_err(|_| anyhow::anyhow!("Import key '{}' is not a YYYY-MM-DD date", key))?;
        parsed.push((day, tasks));
    }

    let summary: Vec<String> = parsed
        .iter()
        .map(|(day, tasks)| format!("{} ({} task(s))", date_key(*day), tasks.len()))
        .collect();
    log::info!("Importing {}", summary.join(", "));

    for (day, tasks) in parsed {
        store.replace_day(day, tasks);
    }
    store.save()?;
    Ok(format!("Imported {}", summary.join(", ")))
}

/// The task active at `now` and its remaining time
pub fn now<P: TaskProvider + ?Sized>(provider: &P, now: NaiveDateTime) -> String {
    match find_active_now(provider, now) {
        Some(active) => format!(
            "{} ({}) - {} left{}",
            active.task.display_title(),
            time_range(&active.task),
            format_countdown(active.remaining_secs),
            if active.day != now.date() {
                format!(", started {}", date_key(active.day))
            } else {
                String::new()
            }
        ),
        None => "No active task".to_string(),
    }
}
