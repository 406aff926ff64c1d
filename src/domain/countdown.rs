use super::enums::CountdownPhase;
use super::scan::ActiveTask;
use super::task::TaskIdentity;
use uuid::Uuid;

/// Result of asking the countdown to start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Nothing to count (remaining time was zero or negative)
    Ignored,
    /// Already counting the same task with the same remaining time
    Unchanged,
    /// Started from Idle
    Started,
    /// Was counting something else, stopped and started again
    Restarted,
}

/// Result of a one-second tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Idle or paused, nothing happened
    Ignored,
    Counting,
    /// Reached zero on this tick
    Finished,
}

/// Result of reconciling the countdown with a fresh scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    Unchanged,
    Started,
    Restarted,
    Stopped,
    /// Nothing active and nothing counting
    Idle,
}

/// Countdown toward the end of the active task
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    pub phase: CountdownPhase,
    pub remaining_secs: i64,
    pub total_secs: i64,
    pub active: Option<TaskIdentity>,
    /// Fresh for every (re)start, `None` while idle
    pub run_id: Option<Uuid>,
    /// Set when the last countdown ran out, cleared on the next start/stop
    pub finished: bool,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            phase: CountdownPhase::Idle,
            remaining_secs: 0,
            total_secs: 0,
            active: None,
            run_id: None,
            finished: false,
        }
    }

    /// Counting (running or paused)
    pub fn is_running(&self) -> bool {
        self.phase != CountdownPhase::Idle
    }

    pub fn is_paused(&self) -> bool {
        self.phase == CountdownPhase::Paused
    }

    /// Start counting `remaining_secs` down for `identity`
    pub fn start(&mut self, identity: TaskIdentity, remaining_secs: i64, total_secs: i64) -> StartOutcome {
        if remaining_secs <= 0 {
            return StartOutcome::Ignored;
        }

        let outcome = if self.is_running() {
            if self.active.as_ref() == Some(&identity) && self.remaining_secs == remaining_secs {
                return StartOutcome::Unchanged;
            }
            self.stop();
            StartOutcome::Restarted
        } else {
            StartOutcome::Started
        };

        self.phase = CountdownPhase::Running;
        self.remaining_secs = remaining_secs;
        self.total_secs = total_secs.max(0);
        self.active = Some(identity);
        self.run_id = Some(Uuid::new_v4());
        self.finished = false;
        outcome
    }

    /// Stop counting and forget the active task
    pub fn stop(&mut self) {
        self.phase = CountdownPhase::Idle;
        self.remaining_secs = 0;
        self.total_secs = 0;
        self.active = None;
        self.run_id = None;
        self.finished = false;
    }

    /// Advance by one second
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != CountdownPhase::Running {
            return TickOutcome::Ignored;
        }

        self.remaining_secs -= 1;
        if self.remaining_secs <= 0 {
            self.stop();
            self.finished = true;
            TickOutcome::Finished
        } else {
            TickOutcome::Counting
        }
    }

    pub fn pause(&mut self) {
        if self.phase == CountdownPhase::Running {
            self.phase = CountdownPhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == CountdownPhase::Paused {
            self.phase = CountdownPhase::Running;
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            CountdownPhase::Running => self.pause(),
            CountdownPhase::Paused => self.resume(),
            CountdownPhase::Idle => {}
        }
    }

    /// Bring the countdown in line with what a fresh scan found.
    ///
    /// Any difference in task or remaining time restarts the countdown. A
    /// paused countdown of the same task stays paused.
    pub fn reconcile(&mut self, scan: Option<&ActiveTask>) -> Reconcile {
        let Some(active) = scan else {
            if self.is_running() {
                self.stop();
                return Reconcile::Stopped;
            }
            return Reconcile::Idle;
        };

        let identity = active.task.identity();
        if self.is_paused() && self.active.as_ref() == Some(&identity) {
            return Reconcile::Unchanged;
        }

        match self.start(identity, active.remaining_secs, active.total_secs) {
            StartOutcome::Started => Reconcile::Started,
            StartOutcome::Restarted => Reconcile::Restarted,
            StartOutcome::Unchanged => Reconcile::Unchanged,
            StartOutcome::Ignored => {
                if self.is_running() {
                    self.stop();
                    Reconcile::Stopped
                } else {
                    Reconcile::Idle
                }
            }
        }
    }

    /// Seconds already spent on the active task
    pub fn elapsed_secs(&self) -> i64 {
        (self.total_secs - self.remaining_secs).max(0)
    }

    /// Elapsed share of the task, 0.0 to 1.0
    pub fn progress_ratio(&self) -> f64 {
        if self.total_secs <= 0 {
            return 0.0;
        }
        (self.elapsed_secs() as f64 / self.total_secs as f64).clamp(0.0, 1.0)
    }

    /// Remaining share of the task, 1.0 while idle
    pub fn remaining_ratio(&self) -> f64 {
        if !self.is_running() || self.total_secs <= 0 {
            return 1.0;
        }
        (self.remaining_secs as f64 / self.total_secs as f64).clamp(0.0, 1.0)
    }

    /// "MM:SS" (minutes may exceed 59), "--:--" while idle
    pub fn label(&self) -> String {
        if !self.is_running() {
            return "--:--".to_string();
        }
        format_countdown(self.remaining_secs)
    }
}

/// Format seconds as "MM:SS"
pub fn format_countdown(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
