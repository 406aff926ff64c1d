pub mod countdown;
pub mod editor;
pub mod enums;
pub mod scan;
pub mod task;
pub mod views;

pub use countdown::{format_countdown, Countdown, Reconcile, TickOutcome};
pub use editor::{check_start_conflict, EditError, TaskDraft, MAX_PRIORITY};
pub use enums::{CountdownPhase, FormField, UiMode};
pub use scan::{find_active_task, ActiveTask};
pub use task::{format_clock, Task};
pub use views::{done_badge, month_grid, shift_months, time_range, visible_indices};
