use tokio::task::JoinHandle;

/// Owns at most one background task; installing a new one aborts the previous.
#[derive(Debug, Default)]
pub struct TaskSlot {
    handle: Option<JoinHandle<()>>,
}

impl TaskSlot {
    /// Abort whatever runs in the slot and take ownership of `handle`.
    pub fn replace(&mut self, handle: JoinHandle<()>) {
        self.cancel();
        self.handle = Some(handle);
    }

    /// Abort the running task, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Whether a task is installed and has not completed yet.
    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Every background task scoped to the match session.
#[derive(Debug, Default)]
pub struct MatchTasks {
    /// Per-question countdown.
    pub countdown: TaskSlot,
    /// Opponent score simulation, alive for the whole match.
    pub opponent: TaskSlot,
    /// One-shot delay: matchmaking latency or post-answer feedback display.
    pub deferred: TaskSlot,
}

impl MatchTasks {
    /// Abort every task.
    pub fn cancel_all(&mut self) {
        self.countdown.cancel();
        self.opponent.cancel();
        self.deferred.cancel();
    }

    /// Whether any task is still scheduled.
    pub fn any_active(&self) -> bool {
        self.active_count() > 0
    }

    /// Number of tasks still scheduled.
    pub fn active_count(&self) -> usize {
        [&self.countdown, &self.opponent, &self.deferred]
            .into_iter()
            .filter(|slot| slot.is_active())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        time::Duration,
    };

    use tokio::time::sleep;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn replacing_aborts_previous_task() {
        let fired = Arc::new(AtomicBool::new(false));
        let mut slot = TaskSlot::default();

        let flag = fired.clone();
        slot.replace(tokio::spawn(async move {
            sleep(Duration::from_secs(1)).await;
            flag.store(true, Ordering::SeqCst);
        }));
        slot.replace(tokio::spawn(sleep(Duration::from_secs(60))));

        sleep(Duration::from_secs(5)).await;
        assert!(!fired.load(Ordering::SeqCst));
        assert!(slot.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_leaves_nothing_running() {
        let mut tasks = MatchTasks::default();
        tasks.countdown.replace(tokio::spawn(sleep(Duration::from_secs(5))));
        tasks.opponent.replace(tokio::spawn(sleep(Duration::from_secs(5))));
        tasks.deferred.replace(tokio::spawn(sleep(Duration::from_secs(5))));
        assert!(tasks.any_active());

        tasks.cancel_all();
        assert!(!tasks.any_active());
    }
}
