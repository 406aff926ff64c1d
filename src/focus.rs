use crate::domain::{Countdown, Reconcile, TickOutcome};
use crate::notifications;
use crate::provider::{find_active_now, TaskProvider};
use crate::ticker::{Periodic, CLOCK_REFRESH_SECS, COUNTDOWN_TICK_SECS};
use chrono::NaiveDateTime;
use std::time::Instant;

/// What a pass over the focus timers produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusEvents {
    /// A countdown began for this task
    pub started: Option<String>,
    /// The countdown ran out for this task
    pub finished: Option<String>,
    /// A re-check ran
    pub rechecked: bool,
}

/// The focus overlay: a countdown for the active task plus the timers that drive it
#[derive(Debug, Clone)]
pub struct FocusPanel {
    pub countdown: Countdown,
    /// Title of the counted task, kept for display
    pub task_title: Option<String>,
    /// Wall clock shown in the header
    pub clock: NaiveDateTime,
    tick: Periodic,
    recheck: Periodic,
    clock_refresh: Periodic,
    /// Start not yet reported through `on_timers`
    unreported_start: Option<String>,
}

impl FocusPanel {
    /// Open the overlay and look for an active task right away
    pub fn open<P: TaskProvider + ?Sized>(
        provider: &P,
        recheck_secs: u64,
        now: Instant,
        wall: NaiveDateTime,
    ) -> Self {
        let mut panel = Self {
            countdown: Countdown::new(),
            task_title: None,
            clock: wall,
            tick: Periodic::every_secs(COUNTDOWN_TICK_SECS, now),
            recheck: Periodic::every_secs(recheck_secs, now),
            clock_refresh: Periodic::every_secs(CLOCK_REFRESH_SECS, now),
            unreported_start: None,
        };
        panel.recheck(provider, now, wall);
        panel
    }

    /// Re-run the active task scan and reconcile the countdown with it
    pub fn recheck<P: TaskProvider + ?Sized>(
        &mut self,
        provider: &P,
        now: Instant,
        wall: NaiveDateTime,
    ) -> Reconcile {
        let active = find_active_now(provider, wall);
        let previous = self.countdown.active.clone();
        let outcome = self.countdown.reconcile(active.as_ref());

        match outcome {
            Reconcile::Started | Reconcile::Restarted => {
                self.tick.reset(now);
                if let Some(active) = &active {
                    let title = active.task.display_title().to_string();
                    // A restart for the same task (clock drift) is not a new start
                    if self.countdown.active != previous {
                        let end = active.end.format("%H:%M").to_string();
                        log::info!("Focus on '{}' until {} ({}s left)", title, end, active.remaining_secs);
                        notifications::notify_countdown_started(&title, &end);
                        self.unreported_start = Some(title.clone());
                    }
                    self.task_title = Some(title);
                }
            }
            Reconcile::Stopped => {
                log::info!("No active task, focus countdown stopped");
                self.task_title = None;
            }
            Reconcile::Idle => {
                self.task_title = None;
                self.countdown.finished = false;
            }
            Reconcile::Unchanged => {}
        }
        outcome
    }

    /// Pause or resume; resuming waits a full second before the next decrement
    pub fn toggle_pause(&mut self, now: Instant) {
        self.countdown.toggle_pause();
        if self.countdown.phase == crate::domain::CountdownPhase::Running {
            self.tick.reset(now);
        }
    }

    /// Run every timer that is due, one after the other
    pub fn on_timers<P: TaskProvider + ?Sized>(
        &mut self,
        provider: &P,
        now: Instant,
        wall: NaiveDateTime,
    ) -> FocusEvents {
        let mut events = FocusEvents {
            started: self.unreported_start.take(),
            ..FocusEvents::default()
        };

        if self.clock_refresh.fire(now) {
            self.clock = wall;
        }

        if self.tick.fire(now) && self.countdown.tick() == TickOutcome::Finished {
            let title = self.task_title.clone().unwrap_or_default();
            log::info!("Focus countdown finished for '{}'", title);
            notifications::notify_countdown_finished(&title);
            events.finished = Some(title);
        }

        if self.recheck.fire(now) {
            self.recheck(provider, now, wall);
            events.rechecked = true;
            if let Some(title) = self.unreported_start.take() {
                events.started = Some(title);
            }
        }

        events
    }

    /// Header text, e.g. "10/05/2024 | 09:15:02"
    pub fn clock_label(&self) -> String {
        self.clock.format("%d/%m/%Y | %H:%M:%S").to_string()
    }

    /// Title line of the overlay
    pub fn title_label(&self) -> &str {
        self.task_title.as_deref().unwrap_or("No Task")
    }

    /// Big timer text
    pub fn timer_label(&self) -> String {
        if self.countdown.finished && !self.countdown.is_running() {
            "Time's up!".to_string()
        } else {
            self.countdown.label()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CountdownPhase, TaskDraft};
    use crate::persistence::TaskStore;
    use crate::provider::tests::FailingProvider;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn wall(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap().and_hms_opt(h, m, s).unwrap()
    }

    fn store_with(title: &str, time: &str, to: &str) -> TaskStore {
        let mut store = TaskStore::empty("unused.json");
        store
            .add_task(wall(0, 0, 0).date(), &TaskDraft::new(title, time, to))
            .unwrap();
        store
    }

    #[test]
    fn test_open_finds_active_task() {
        let store = store_with("Standup", "09:00", "09:30");
        let panel = FocusPanel::open(&store, 5, Instant::now(), wall(9, 15, 0));

        assert_eq!(panel.countdown.phase, CountdownPhase::Running);
        assert_eq!(panel.countdown.remaining_secs, 900);
        assert_eq!(panel.countdown.total_secs, 1800);
        assert_eq!(panel.title_label(), "Standup");
        assert_eq!(panel.timer_label(), "15:00");
    }

    #[test]
    fn test_start_reported_once_per_task() {
        let mut store = store_with("Standup", "09:00", "09:30");
        store
            .add_task(wall(0, 0, 0).date(), &TaskDraft::new("Review", "09:30", "10:00"))
            .unwrap();
        let start = Instant::now();
        let mut panel = FocusPanel::open(&store, 5, start, wall(9, 15, 0));

        let events = panel.on_timers(&store, start, wall(9, 15, 0));
        assert_eq!(events.started, Some("Standup".to_string()));
        let events = panel.on_timers(&store, start, wall(9, 15, 0));
        assert_eq!(events.started, None);

        // Same task after a clock jump: restarted, but no new start
        assert_eq!(panel.recheck(&store, start, wall(9, 20, 0)), Reconcile::Restarted);
        assert_eq!(panel.on_timers(&store, start, wall(9, 20, 0)).started, None);

        // The next task takes over
        assert_eq!(panel.recheck(&store, start, wall(9, 30, 0)), Reconcile::Restarted);
        let events = panel.on_timers(&store, start, wall(9, 30, 0));
        assert_eq!(events.started, Some("Review".to_string()));
        assert_eq!(panel.title_label(), "Review");
    }

    #[test]
    fn test_open_without_active_task() {
        let store = store_with("Standup", "09:00", "09:30");
        let panel = FocusPanel::open(&store, 5, Instant::now(), wall(12, 0, 0));

        assert!(!panel.countdown.is_running());
        assert_eq!(panel.title_label(), "No Task");
        assert_eq!(panel.timer_label(), "--:--");
    }

    #[test]
    fn test_ticks_follow_the_wall_clock() {
        let store = store_with("Standup", "09:00", "09:30");
        let start = Instant::now();
        let mut panel = FocusPanel::open(&store, 5, start, wall(9, 15, 0));
        let run_id = panel.countdown.run_id;

        for s in 1..=5 {
            panel.on_timers(&store, start + Duration::from_secs(s), wall(9, 15, s as u32));
        }
        // Recheck at 5s agrees with the ticked value, no restart
        assert_eq!(panel.countdown.remaining_secs, 895);
        assert_eq!(panel.countdown.run_id, run_id);
        assert_eq!(panel.clock_label(), "10/05/2024 | 09:15:05");
    }

    #[test]
    fn test_recheck_restarts_on_drift() {
        let store = store_with("Standup", "09:00", "09:30");
        let start = Instant::now();
        let mut panel = FocusPanel::open(&store, 5, start, wall(9, 15, 0));
        let run_id = panel.countdown.run_id;

        // The wall clock jumped (e.g. after a suspend)
        let outcome = panel.recheck(&store, start, wall(9, 25, 0));
        assert_eq!(outcome, Reconcile::Restarted);
        assert_eq!(panel.countdown.remaining_secs, 300);
        assert_ne!(panel.countdown.run_id, run_id);
    }

    #[test]
    fn test_countdown_finishes() {
        let store = store_with("Short", "09:00", "09:01");
        let start = Instant::now();
        let mut panel = FocusPanel::open(&store, 300, start, wall(9, 0, 58));
        assert_eq!(panel.countdown.remaining_secs, 2);

        let events = panel.on_timers(&store, start + Duration::from_secs(1), wall(9, 0, 59));
        assert_eq!(events.finished, None);
        let events = panel.on_timers(&store, start + Duration::from_secs(2), wall(9, 1, 0));
        assert_eq!(events.finished, Some("Short".to_string()));
        assert_eq!(panel.timer_label(), "Time's up!");
        assert_eq!(panel.title_label(), "Short");
    }

    #[test]
    fn test_pause_survives_recheck() {
        let store = store_with("Standup", "09:00", "09:30");
        let start = Instant::now();
        let mut panel = FocusPanel::open(&store, 5, start, wall(9, 15, 0));
        panel.toggle_pause(start);

        for s in 1..=10 {
            panel.on_timers(&store, start + Duration::from_secs(s), wall(9, 15, s as u32));
        }
        assert!(panel.countdown.is_paused());
        assert_eq!(panel.countdown.remaining_secs, 900);

        panel.toggle_pause(start + Duration::from_secs(10));
        panel.on_timers(&store, start + Duration::from_secs(11), wall(9, 15, 11));
        assert_eq!(panel.countdown.remaining_secs, 899);
    }

    #[test]
    fn test_provider_failure_stops_countdown() {
        let store = store_with("Standup", "09:00", "09:30");
        let start = Instant::now();
        let mut panel = FocusPanel::open(&store, 5, start, wall(9, 15, 0));

        let outcome = panel.recheck(&FailingProvider, start, wall(9, 15, 5));
        assert_eq!(outcome, Reconcile::Stopped);
        assert!(!panel.countdown.is_running());
        assert_eq!(panel.title_label(), "No Task");
    }
}
