use crate::domain::{
    format_clock, shift_months, time_range, FormField, Task, TaskDraft, UiMode, MAX_PRIORITY,
};
use crate::focus::{FocusEvents, FocusPanel};
use crate::notifications;
use crate::persistence::{Settings, TaskStore};
use crate::ticker::Periodic;
use anyhow::Result;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::time::Instant;

/// Input form state for adding or editing a task
#[derive(Debug, Clone)]
pub struct InputFormState {
    pub title: String,
    pub time: String,
    pub to: String,
    pub description: String,
    pub priority: String,
    pub field: FormField,
    /// Store position of the task being edited, `None` when adding
    pub editing: Option<usize>,
    /// Why the last submit was rejected
    pub error: Option<String>,
}

impl InputFormState {
    fn new_task(start: NaiveDateTime) -> Self {
        Self {
            title: String::new(),
            time: format_clock(start.time()),
            to: format_clock((start + Duration::hours(1)).time()),
            description: String::new(),
            priority: "0".to_string(),
            field: FormField::Title,
            editing: None,
            error: None,
        }
    }

    fn edit_task(task: &Task, index: usize) -> Self {
        let draft = TaskDraft::from_task(task);
        Self {
            title: draft.title,
            time: draft.time,
            to: draft.to,
            description: draft.description,
            priority: draft.priority.to_string(),
            field: FormField::Title,
            editing: Some(index),
            error: None,
        }
    }

    /// Text of a field
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Start => &self.time,
            FormField::End => &self.to,
            FormField::Description => &self.description,
            FormField::Priority => &self.priority,
        }
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Title => &mut self.title,
            FormField::Start => &mut self.time,
            FormField::End => &mut self.to,
            FormField::Description => &mut self.description,
            FormField::Priority => &mut self.priority,
        }
    }

    /// Build a draft, rejecting a non-numeric priority
    pub fn to_draft(&self) -> Result<TaskDraft, String> {
        let priority = if self.priority.trim().is_empty() {
            0
        } else {
            self.priority
                .trim()
                .parse::<u8>()
                .map_err(|_| format!("priority must be a number from 0 to {}", MAX_PRIORITY))?
        };
        Ok(TaskDraft {
            title: self.title.clone(),
            time: self.time.clone(),
            to: self.to.clone(),
            description: self.description.clone(),
            priority,
        })
    }
}

/// Main application state
pub struct AppState {
    pub store: TaskStore,
    pub settings: Settings,
    pub selected_date: NaiveDate,
    /// Position in the visible (filtered) task list
    pub selected_index: usize,
    pub show_done: bool,
    pub ui_mode: UiMode,
    pub input_form: Option<InputFormState>,
    /// Focus overlay, when open
    pub focus: Option<FocusPanel>,
    /// Task due to start now, waiting for the user to accept
    pub pending_start: Option<Task>,
    /// Last task the watcher prompted for, so it only asks once
    pub last_prompted: Option<(NaiveDate, String)>,
    /// One-line message for the status bar
    pub status: Option<String>,
    pub needs_save: bool,
    /// Wall clock as of the last timer pass
    pub clock: NaiveDateTime,
    watcher: Periodic,
}

impl AppState {
    pub fn new(mut store: TaskStore, settings: Settings, now: Instant, wall: NaiveDateTime) -> Self {
        let mut needs_save = false;
        if settings.auto_prune {
            needs_save = store.prune_older_than(wall.date(), settings.days_to_keep) > 0;
        }

        Self {
            store,
            selected_date: wall.date(),
            selected_index: 0,
            show_done: settings.show_done,
            ui_mode: UiMode::Normal,
            input_form: None,
            focus: None,
            pending_start: None,
            last_prompted: None,
            status: None,
            needs_save,
            clock: wall,
            watcher: Periodic::every_secs(settings.watcher_interval_secs, now),
            settings,
        }
    }

    /// Store positions of the tasks shown for the selected date
    pub fn visible_indices(&self) -> Vec<usize> {
        self.store.visible_indices(self.selected_date, self.show_done)
    }

    /// Store position of the selected task
    pub fn selected_store_index(&self) -> Option<usize> {
        self.visible_indices().get(self.selected_index).copied()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let index = self.selected_store_index()?;
        self.store.task(self.selected_date, index)
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.visible_indices().len() {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_indices().len();
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }

    /// Select another date, resetting the task selection
    pub fn select_date(&mut self, date: NaiveDate) {
        if date != self.selected_date {
            self.selected_date = date;
            self.selected_index = 0;
        }
    }

    pub fn shift_days(&mut self, days: i64) {
        self.select_date(self.selected_date + Duration::days(days));
    }

    pub fn shift_months(&mut self, months: i32) {
        self.select_date(shift_months(self.selected_date, months));
    }

    pub fn go_today(&mut self) {
        self.select_date(self.clock.date());
    }

    pub fn toggle_show_done(&mut self) {
        self.show_done = !self.show_done;
        self.clamp_selection();
    }

    /// Start adding a new task (opens input form)
    pub fn start_add_task(&mut self) {
        let start = self.selected_date.and_time(self.clock.time());
        self.input_form = Some(InputFormState::new_task(start));
        self.ui_mode = UiMode::AddingTask;
    }

    /// Start editing the selected task
    pub fn start_edit_task(&mut self) {
        let Some(index) = self.selected_store_index() else {
            self.status = Some("Select a task to edit".to_string());
            return;
        };
        if let Some(task) = self.store.task(self.selected_date, index) {
            self.input_form = Some(InputFormState::edit_task(task, index));
            self.ui_mode = UiMode::EditingTask;
        }
    }

    /// Move to the next form field
    pub fn input_form_next_field(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.field = form.field.next();
        }
    }

    /// Add character to the current form field
    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.input_form {
            let field = form.field;
            let accepted = match field {
                FormField::Start | FormField::End => {
                    (c.is_ascii_digit() || c == ':') && form.value(field).len() < 5
                }
                FormField::Priority => c.is_ascii_digit() && form.value(field).len() < 2,
                FormField::Title | FormField::Description => true,
            };
            if accepted {
                form.value_mut(field).push(c);
            }
        }
    }

    /// Remove last character from the current form field
    pub fn input_form_backspace(&mut self) {
        if let Some(form) = &mut self.input_form {
            let field = form.field;
            form.value_mut(field).pop();
        }
    }

    /// Validate and store the form. A rejected form stays open with the reason.
    pub fn submit_input_form(&mut self) {
        let Some(form) = self.input_form.as_mut() else {
            return;
        };

        let draft = match form.to_draft() {
            Ok(draft) => draft,
            Err(message) => {
                form.error = Some(message);
                return;
            }
        };

        let date = self.selected_date;
        let result = match form.editing {
            Some(index) => self.store.update_task(date, index, &draft).map(|_| index),
            None => self.store.add_task(date, &draft),
        };

        match result {
            Ok(index) => {
                self.input_form = None;
                self.ui_mode = self.resting_mode();
                self.needs_save = true;
                if let Some(pos) = self.visible_indices().iter().position(|&i| i == index) {
                    self.selected_index = pos;
                }
            }
            Err(err) => {
                log::debug!("Rejected task edit: {}", err);
                if let Some(form) = self.input_form.as_mut() {
                    form.error = Some(err.to_string());
                }
            }
        }
    }

    /// Cancel input form
    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.ui_mode = self.resting_mode();
    }

    /// Ask to delete the selected task
    pub fn request_delete(&mut self) {
        if self.selected_store_index().is_some() {
            self.ui_mode = UiMode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Some(index) = self.selected_store_index() {
            if let Some(task) = self.store.remove_task(self.selected_date, index) {
                self.status = Some(format!("Deleted '{}'", task.display_title()));
                self.needs_save = true;
            }
        }
        self.clamp_selection();
        self.ui_mode = self.resting_mode();
    }

    pub fn cancel_delete(&mut self) {
        self.ui_mode = self.resting_mode();
    }

    /// Toggle the done flag of the selected task
    pub fn toggle_done(&mut self) {
        if let Some(index) = self.selected_store_index() {
            if self.store.toggle_done(self.selected_date, index).is_some() {
                self.needs_save = true;
                self.clamp_selection();
            }
        }
    }

    /// Open the focus overlay (or bring it to the front)
    pub fn open_focus(&mut self, now: Instant, wall: NaiveDateTime) {
        if self.focus.is_none() {
            self.focus = Some(FocusPanel::open(
                &self.store,
                self.settings.recheck_interval_secs,
                now,
                wall,
            ));
        }
        self.ui_mode = UiMode::Focus;
    }

    /// Close the overlay, stopping its timers
    pub fn close_focus(&mut self) {
        self.focus = None;
        self.ui_mode = UiMode::Normal;
    }

    pub fn focus_toggle_pause(&mut self, now: Instant) {
        if let Some(panel) = &mut self.focus {
            panel.toggle_pause(now);
        }
    }

    /// Re-check the active task immediately
    pub fn focus_recheck(&mut self, now: Instant, wall: NaiveDateTime) {
        if let Some(panel) = &mut self.focus {
            panel.recheck(&self.store, now, wall);
        }
    }

    /// Run the timers due at `now`, in order: focus clock, countdown, re-check, watcher
    pub fn on_timers(&mut self, now: Instant, wall: NaiveDateTime) -> FocusEvents {
        self.clock = wall;

        let events = match &mut self.focus {
            Some(panel) => panel.on_timers(&self.store, now, wall),
            None => FocusEvents::default(),
        };

        if self.watcher.fire(now) {
            self.check_upcoming_tasks(wall);
        }

        events
    }

    /// Prompt for a not-done task of today that starts this minute
    pub fn check_upcoming_tasks(&mut self, wall: NaiveDateTime) {
        if self.focus.is_some() || self.ui_mode != UiMode::Normal {
            return;
        }

        let today = wall.date();
        let now_minute = format_clock(wall.time());
        let due = self
            .store
            .tasks_on(today)
            .iter()
            .find(|task| !task.done && task.start_time().map(format_clock) == Some(now_minute.clone()))
            .cloned();

        if let Some(task) = due {
            let key = (today, task.time.clone());
            if self.last_prompted.as_ref() == Some(&key) {
                return;
            }
            notifications::notify_task_starting(
                task.display_title(),
                &time_range(&task),
            );
            self.last_prompted = Some(key);
            self.pending_start = Some(task);
            self.ui_mode = UiMode::TaskStarting;
        }
    }

    /// Start focusing on the task that is due
    pub fn accept_task_start(&mut self, now: Instant, wall: NaiveDateTime) {
        self.pending_start = None;
        self.ui_mode = UiMode::Normal;
        self.open_focus(now, wall);
    }

    pub fn dismiss_task_start(&mut self) {
        self.pending_start = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Mode to return to after a form or prompt closes
    fn resting_mode(&self) -> UiMode {
        if self.focus.is_some() {
            UiMode::Focus
        } else {
            UiMode::Normal
        }
    }

    /// Save the store to disk
    pub fn save(&mut self) -> Result<()> {
        self.store.save()?;
        self.needs_save = false;
        Ok(())
    }
}
