use super::task::Task;
use chrono::{NaiveDate, NaiveDateTime};

/// A task whose interval contains the scanned moment
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTask {
    pub task: Task,
    /// Position of the task in the scanned list
    pub index: usize,
    /// The day the task is scheduled on
    pub day: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub remaining_secs: i64,
    pub total_secs: i64,
}

/// Find the first task of `day` whose `[start, end)` interval contains `now`.
///
/// Tasks with malformed times are skipped. Intervals ending at or before their
/// start end on the following day.
pub fn find_active_task(tasks: &[Task], day: NaiveDate, now: NaiveDateTime) -> Option<ActiveTask> {
    tasks.iter().enumerate().find_map(|(index, task)| {
        let (start, end) = task.interval_on(day)?;
        if start <= now && now < end {
            Some(ActiveTask {
                task: task.clone(),
                index,
                day,
                start,
                end,
                remaining_secs: (end - now).num_seconds(),
                total_secs: (end - start).num_seconds(),
            })
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn at(date: NaiveDate, h: u32, m: u32, s: u32) -> NaiveDateTime {
        date.and_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_active_in_the_middle() {
        let tasks = vec![Task::new("Standup", "09:00", "09:30")];
        let active = find_active_task(&tasks, day(), at(day(), 9, 15, 0)).unwrap();
        assert_eq!(active.task.title, "Standup");
        assert_eq!(active.index, 0);
        assert_eq!(active.remaining_secs, 900);
        assert_eq!(active.total_secs, 1800);
    }

    #[test]
    fn test_interval_is_half_open() {
        let tasks = vec![Task::new("Standup", "09:00", "09:30")];
        assert!(find_active_task(&tasks, day(), at(day(), 9, 0, 0)).is_some());
        assert!(find_active_task(&tasks, day(), at(day(), 9, 30, 0)).is_none());
        assert!(find_active_task(&tasks, day(), at(day(), 8, 59, 59)).is_none());
    }

    #[test]
    fn test_every_inner_minute_is_active() {
        let tasks = vec![Task::new("Deep work", "13:10", "15:45")];
        let start = at(day(), 13, 10, 0);
        for minute in 1..155 {
            let now = start + chrono::Duration::minutes(minute);
            let active = find_active_task(&tasks, day(), now).unwrap();
            assert_eq!(active.remaining_secs, (155 - minute) * 60);
        }
    }

    #[test]
    fn test_crossing_midnight() {
        let tasks = vec![Task::new("Night shift", "23:00", "01:00")];
        let next_day = day().succ_opt().unwrap();

        let active = find_active_task(&tasks, day(), at(next_day, 0, 30, 0)).unwrap();
        assert_eq!(active.end, at(next_day, 1, 0, 0));
        assert_eq!(active.remaining_secs, 1800);
        assert_eq!(active.total_secs, 7200);

        assert!(find_active_task(&tasks, day(), at(day(), 23, 30, 0)).is_some());
        assert!(find_active_task(&tasks, day(), at(next_day, 1, 0, 0)).is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let tasks = vec![
            Task::new("Later", "11:00", "12:00"),
            Task::new("Long", "09:00", "12:00"),
            Task::new("Overlapping", "10:00", "11:00"),
        ];
        let active = find_active_task(&tasks, day(), at(day(), 10, 30, 0)).unwrap();
        assert_eq!(active.task.title, "Long");
        assert_eq!(active.index, 1);
    }

    #[test]
    fn test_malformed_tasks_are_skipped() {
        let tasks = vec![
            Task::new("Broken", "9 o'clock", "10:00"),
            Task::new("Missing end", "09:00", ""),
            Task::new("Fine", "09:00", "10:00"),
        ];
        let active = find_active_task(&tasks, day(), at(day(), 9, 30, 0)).unwrap();
        assert_eq!(active.task.title, "Fine");
        assert_eq!(active.index, 2);
    }

    #[test]
    fn test_nothing_active() {
        assert!(find_active_task(&[], day(), at(day(), 12, 0, 0)).is_none());
        let tasks = vec![Task::new("Morning", "08:00", "09:00")];
        assert!(find_active_task(&tasks, day(), at(day(), 12, 0, 0)).is_none());
    }

    #[test]
    fn test_remaining_truncates_sub_seconds() {
        let tasks = vec![Task::new("Standup", "09:00", "09:30")];
        let now = at(day(), 9, 15, 0) + chrono::Duration::milliseconds(400);
        let active = find_active_task(&tasks, day(), now).unwrap();
        assert_eq!(active.remaining_secs, 899);
    }
}
