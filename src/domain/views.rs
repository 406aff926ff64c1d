use super::task::Task;
use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};

/// Indices (into the day's list) of the tasks shown in the list pane
pub fn visible_indices(tasks: &[Task], show_done: bool) -> Vec<usize> {
    tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| show_done || !task.done)
        .map(|(i, _)| i)
        .collect()
}

/// Done checkbox glyph
pub fn done_badge(task: &Task) -> &'static str {
    if task.done {
        "[x]"
    } else {
        "[ ]"
    }
}

/// "09:00 → 10:30" (malformed fields shown as-is)
pub fn time_range(task: &Task) -> String {
    format!("{} → {}", task.time, task.to)
}

/// One week row of a month grid, Monday first. `None` pads days outside the month.
pub type WeekRow = [Option<NaiveDate>; 7];

/// Build the Monday-first week rows covering the month of `date`
pub fn month_grid(date: NaiveDate) -> Vec<WeekRow> {
    let first = date.with_day(1).unwrap_or(date);
    let offset = first.weekday().num_days_from_monday() as i64;
    let mut cursor = first - Duration::days(offset);

    let mut rows = Vec::new();
    loop {
        let mut row: WeekRow = [None; 7];
        for slot in row.iter_mut() {
            if cursor.month() == first.month() && cursor.year() == first.year() {
                *slot = Some(cursor);
            }
            cursor += Duration::days(1);
        }
        rows.push(row);

        let past_month = cursor.month() != first.month() || cursor.year() != first.year();
        if past_month && cursor.weekday() == Weekday::Mon {
            break;
        }
    }
    rows
}

/// Same day in the previous/next month, clamped to that month's length.
/// Out of chrono's range the date stays put.
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_visible_indices() {
        let mut done = Task::new("Done", "08:00", "09:00");
        done.done = true;
        let tasks = vec![Task::new("A", "07:00", "08:00"), done, Task::new("B", "10:00", "11:00")];

        assert_eq!(visible_indices(&tasks, true), vec![0, 1, 2]);
        assert_eq!(visible_indices(&tasks, false), vec![0, 2]);
    }

    #[test]
    fn test_month_grid() {
        // May 2024 starts on a Wednesday and has 31 days
        let rows = month_grid(date(2024, 5, 17));
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0][0], None);
        assert_eq!(rows[0][2], Some(date(2024, 5, 1)));
        assert_eq!(rows[4][4], Some(date(2024, 5, 31)));
        assert_eq!(rows[4][5], None);

        let days: usize = rows.iter().map(|r| r.iter().flatten().count()).sum();
        assert_eq!(days, 31);
    }

    #[test]
    fn test_month_grid_starting_monday() {
        // April 2024 starts on a Monday
        let rows = month_grid(date(2024, 4, 1));
        assert_eq!(rows[0][0], Some(date(2024, 4, 1)));
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn test_shift_months() {
        assert_eq!(shift_months(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(shift_months(date(2024, 3, 15), -3), date(2023, 12, 15));
        assert_eq!(shift_months(date(2023, 12, 1), 1), date(2024, 1, 1));
        assert_eq!(shift_months(date(2024, 3, 31), -1), date(2024, 2, 29));
        assert_eq!(shift_months(date(2024, 5, 31), -13), date(2023, 4, 30));
        assert_eq!(shift_months(date(2024, 5, 10), 0), date(2024, 5, 10));
        assert_eq!(shift_months(NaiveDate::MAX, 1), NaiveDate::MAX);
    }

    #[test]
    fn test_time_range_and_badge() {
        let mut task = Task::new("A", "09:00", "10:30");
        assert_eq!(time_range(&task), "09:00 → 10:30");
        assert_eq!(done_badge(&task), "[ ]");
        task.done = true;
        assert_eq!(done_badge(&task), "[x]");
    }
}
