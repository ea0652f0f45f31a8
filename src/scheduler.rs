//! Cooperative scheduling helper
//!
//! Long scans, removal cascades and traversal runs are broken into unit steps.
//! Every `interval` steps control is handed back to the tokio scheduler so one
//! big operation cannot starve other tasks sharing the runtime.

/// Counts unit steps and yields to the scheduler every `interval` of them
#[derive(Debug, Clone)]
pub struct CooperativeYield {
    interval: usize,
    steps: usize,
}

impl CooperativeYield {
    /// `interval` is clamped to at least 1
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
            steps: 0,
        }
    }

    /// Record one unit of work, yielding when the interval is reached
    pub async fn step(&mut self) {
        self.steps += 1;
        if self.steps % self.interval == 0 {
            tokio::task::yield_now().await;
        }
    }

    /// Steps recorded so far
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn interval(&self) -> usize {
        self.interval
    }
}

impl Default for CooperativeYield {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_interval_clamped() {
        assert_eq!(CooperativeYield::new(0).interval(), 1);
        assert_eq!(CooperativeYield::new(8).interval(), 8);
    }

    #[tokio::test]
    async fn test_counts_steps() {
        let mut yielder = CooperativeYield::new(3);
        for _ in 0..7 {
            yielder.step().await;
        }
        assert_eq!(yielder.steps(), 7);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_other_tasks_progress_between_steps() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let background = tokio::spawn(async move {
            loop {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
            }
        });

        let mut yielder = CooperativeYield::new(1);
        for _ in 0..10 {
            yielder.step().await;
        }

        // The spawned task only runs when this one yields on the single thread.
        assert!(ticks.load(Ordering::SeqCst) > 0);
        background.abort();
    }
}
