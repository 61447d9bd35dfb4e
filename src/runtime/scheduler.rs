use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Work queued by an edit handler to run after the current event finishes.
#[derive(Debug, Clone)]
pub enum SchedulerCommand<T> {
    /// Run on the next drain, unless cancelled first.
    NextTurn { key: String, task: T },
    Cancel { key: String },
}

#[derive(Debug, Clone)]
struct Guard {
    key: String,
    version: u64,
}

#[derive(Debug, Clone)]
struct PendingTask<T> {
    due_at: Instant,
    guard: Guard,
    task: T,
}

/// Version-guarded task queue. Cancelling a key bumps its version, so any
/// task queued under an older version is dropped when it comes due.
#[derive(Debug)]
pub struct Scheduler<T> {
    pending: Vec<PendingTask<T>>,
    key_versions: HashMap<String, u64>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            key_versions: HashMap::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, command: SchedulerCommand<T>, now: Instant) {
        match command {
            SchedulerCommand::NextTurn { key, task } => {
                let version = self.bump_version(&key);
                self.pending.push(PendingTask {
                    due_at: now,
                    guard: Guard { key, version },
                    task,
                });
            }
            SchedulerCommand::Cancel { key } => {
                self.bump_version(&key);
                self.pending.retain(|task| task.guard.key != key);
            }
        }
    }

    /// Remove every task due by `now`, keeping only those whose key was not
    /// rescheduled or cancelled since they were queued.
    pub fn drain_ready(&mut self, now: Instant) -> Vec<T> {
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|task| task.due_at <= now);
        self.pending = waiting;

        due.into_iter()
            .filter(|task| self.task_is_valid(task))
            .map(|task| task.task)
            .collect()
    }

    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        self.pending
            .iter()
            .filter(|task| self.task_is_valid(task))
            .map(|task| task.due_at.saturating_duration_since(now))
            .fold(default_timeout, Duration::min)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.iter().any(|task| self.task_is_valid(task))
    }

    fn task_is_valid(&self, task: &PendingTask<T>) -> bool {
        let current = *self.key_versions.get(&task.guard.key).unwrap_or(&0);
        current == task.guard.version
    }

    fn bump_version(&mut self, key: &str) -> u64 {
        let entry = self.key_versions.entry(key.to_string()).or_insert(0);
        *entry = entry.saturating_add(1);
        *entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_turn_task_runs_on_next_drain() {
        let now = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(
            SchedulerCommand::NextTurn {
                key: "selection".to_string(),
                task: 7,
            },
            now,
        );
        assert!(scheduler.has_pending());
        assert_eq!(scheduler.poll_timeout(now, Duration::from_secs(1)), Duration::ZERO);
        assert_eq!(scheduler.drain_ready(now), vec![7]);
        assert!(scheduler.drain_ready(now).is_empty());
    }

    #[test]
    fn cancel_drops_pending_task() {
        let now = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(
            SchedulerCommand::NextTurn {
                key: "selection".to_string(),
                task: 1,
            },
            now,
        );
        scheduler.schedule(
            SchedulerCommand::Cancel {
                key: "selection".to_string(),
            },
            now,
        );
        assert!(!scheduler.has_pending());
        assert!(scheduler.drain_ready(now).is_empty());
    }

    #[test]
    fn rescheduling_a_key_supersedes_older_task() {
        let now = Instant::now();
        let mut scheduler = Scheduler::new();
        for task in [1, 2] {
            scheduler.schedule(
                SchedulerCommand::NextTurn {
                    key: "selection".to_string(),
                    task,
                },
                now,
            );
        }
        assert_eq!(scheduler.drain_ready(now), vec![2]);
    }

    #[test]
    fn cancelled_task_does_not_shorten_poll_timeout() {
        let now = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(
            SchedulerCommand::NextTurn {
                key: "selection".to_string(),
                task: 3,
            },
            now,
        );
        scheduler.schedule(
            SchedulerCommand::Cancel {
                key: "selection".to_string(),
            },
            now,
        );
        assert_eq!(
            scheduler.poll_timeout(now, Duration::from_millis(250)),
            Duration::from_millis(250)
        );
    }
}
