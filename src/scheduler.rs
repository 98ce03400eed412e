use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: Duration,
    seq: u64,
    queue: BTreeMap<(Duration, u64), T>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            seq: 0,
            queue: BTreeMap::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, task: T) {
        self.seq += 1;
        self.queue.insert((self.now + delay, self.seq), task);
    }

    /// Removes the earliest task due at or before `deadline`, moving the
    /// clock to its due time.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<T> {
        let (&key, _) = self.queue.first_key_value()?;
        if key.0 > deadline {
            return None;
        }
        self.now = self.now.max(key.0);
        self.queue.remove(&key)
    }

    /// Moves the clock forward without running anything.
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.queue.retain(|_, task| keep(task));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_run_by_due_time_then_insertion() {
        let mut s = Scheduler::new();
        s.schedule(Duration::from_millis(20), "late");
        s.schedule(Duration::from_millis(10), "a");
        s.schedule(Duration::from_millis(10), "b");

        let deadline = Duration::from_millis(15);
        assert_eq!(s.pop_due(deadline), Some("a"));
        assert_eq!(s.pop_due(deadline), Some("b"));
        assert_eq!(s.pop_due(deadline), None);
        assert_eq!(s.now(), Duration::from_millis(10));
        assert_eq!(s.next_due(), Some(Duration::from_millis(20)));
    }

    #[test]
    fn delays_are_relative_to_the_current_clock() {
        let mut s = Scheduler::new();
        s.advance_to(Duration::from_millis(100));
        s.schedule(Duration::from_millis(50), 1);
        assert_eq!(s.next_due(), Some(Duration::from_millis(150)));
        s.advance_to(Duration::from_millis(10));
        assert_eq!(s.now(), Duration::from_millis(100));
    }

    #[test]
    fn retain_drops_matching_tasks() {
        let mut s = Scheduler::new();
        for n in 0..4 {
            s.schedule(Duration::ZERO, n);
        }
        s.retain(|n| n % 2 == 0);
        assert_eq!(s.pending(), 2);
        assert!(!s.is_idle());
    }
}
