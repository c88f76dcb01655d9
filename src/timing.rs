use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use gloo_timers::callback::{Interval, Timeout};

/// Where the interaction layer parks its delayed and repeating work.
///
/// Both calls are fire-and-forget for the caller; the scheduler owns the
/// handles, so tearing the scheduler down cancels everything still pending.
pub trait Scheduler {
    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>);
    fn every(&self, period_ms: u32, task: Box<dyn FnMut()>);
}

pub type SharedScheduler = Rc<dyn Scheduler>;

#[derive(Default)]
struct TimerSet {
    next_id: u64,
    timeouts: HashMap<u64, Timeout>,
    // Handles whose callback already ran. Dropped on the next scheduling call
    // so a timeout never frees its closure while that closure is executing.
    spent: Vec<Timeout>,
    intervals: Vec<Interval>,
    disposed: bool,
}

/// `gloo-timers` backed scheduler used in the browser.
#[derive(Clone, Default)]
pub struct BrowserScheduler {
    timers: Rc<RefCell<TimerSet>>,
}

impl BrowserScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of timers still waiting to fire (intervals included).
    pub fn live_timers(&self) -> usize {
        let set = self.timers.borrow();
        set.timeouts.len() + set.intervals.len()
    }

    /// Cancels every pending timeout and interval. Later calls become no-ops.
    pub fn dispose(&self) {
        let mut set = self.timers.borrow_mut();
        set.disposed = true;
        set.timeouts.clear();
        set.spent.clear();
        set.intervals.clear();
    }

    fn retire(timers: &Weak<RefCell<TimerSet>>, id: u64) {
        if let Some(timers) = timers.upgrade() {
            let mut set = timers.borrow_mut();
            if let Some(handle) = set.timeouts.remove(&id) {
                set.spent.push(handle);
            }
        }
    }
}

impl Scheduler for BrowserScheduler {
    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        let mut set = self.timers.borrow_mut();
        if set.disposed {
            return;
        }
        set.spent.clear();

        let id = set.next_id;
        set.next_id += 1;
        let weak = Rc::downgrade(&self.timers);
        let timeout = Timeout::new(delay_ms, move || {
            BrowserScheduler::retire(&weak, id);
            task();
        });
        set.timeouts.insert(id, timeout);
    }

    fn every(&self, period_ms: u32, mut task: Box<dyn FnMut()>) {
        let mut set = self.timers.borrow_mut();
        if set.disposed {
            return;
        }
        set.intervals.push(Interval::new(period_ms, move || task()));
    }
}

enum ManualTask {
    Once(Box<dyn FnOnce()>),
    Every { period: u64, task: Box<dyn FnMut()> },
}

struct Pending {
    due: u64,
    seq: u64,
    task: ManualTask,
}

#[derive(Default)]
struct ManualState {
    now: u64,
    seq: u64,
    queue: Vec<Pending>,
}

impl ManualState {
    fn push(&mut self, due: u64, task: ManualTask) {
        let seq = self.seq;
        self.seq += 1;
        self.queue.push(Pending { due, seq, task });
    }

    fn pop_due(&mut self, until: u64) -> Option<Pending> {
        let index = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= until)
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, _)| i)?;
        let pending = self.queue.swap_remove(index);
        self.now = pending.due;
        Some(pending)
    }
}

/// Virtual clock. Nothing runs until [`ManualScheduler::advance`] moves time
/// forward; tasks then run in due order, ties broken by scheduling order.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.state.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    pub fn advance(&self, ms: u64) {
        let until = self.state.borrow().now + ms;
        loop {
            // The borrow ends before the task runs; tasks may schedule more work.
            let next = self.state.borrow_mut().pop_due(until);
            let Some(pending) = next else { break };
            match pending.task {
                ManualTask::Once(task) => task(),
                ManualTask::Every { period, mut task } => {
                    task();
                    let mut state = self.state.borrow_mut();
                    let due = state.now + period;
                    state.push(due, ManualTask::Every { period, task });
                }
            }
        }
        self.state.borrow_mut().now = until;
    }

    pub fn dispose(&self) {
        self.state.borrow_mut().queue.clear();
    }
}

impl Scheduler for ManualScheduler {
    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        let mut state = self.state.borrow_mut();
        let due = state.now + u64::from(delay_ms);
        state.push(due, ManualTask::Once(task));
    }

    fn every(&self, period_ms: u32, task: Box<dyn FnMut()>) {
        let period = u64::from(period_ms.max(1));
        let mut state = self.state.borrow_mut();
        let due = state.now + period;
        state.push(due, ManualTask::Every { period, task });
    }
}

/// Uniform randomness for the decorative effects.
pub trait RandomSource {
    /// A value in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// An index in `0..len`, or `None` for an empty collection.
    fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(((self.unit() * len as f64) as usize).min(len - 1))
    }

    /// A value in `[low, high)`; `low` when the range is empty.
    fn between(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        let span = f64::from(high - low);
        low + ((self.unit() * span) as u32).min(high - low - 1)
    }
}

impl RandomSource for fastrand::Rng {
    fn unit(&mut self) -> f64 {
        self.f64()
    }
}

pub type SharedRandom = Rc<RefCell<dyn RandomSource>>;

/// Page-lifetime generator seeded from `Math.random`.
pub fn page_random() -> SharedRandom {
    let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
    Rc::new(RefCell::new(fastrand::Rng::with_seed(seed)))
}

pub fn seeded_random(seed: u64) -> SharedRandom {
    Rc::new(RefCell::new(fastrand::Rng::with_seed(seed)))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::RandomSource;

    /// Replays a fixed list of unit values, cycling when exhausted.
    pub struct Scripted {
        values: Vec<f64>,
        cursor: usize,
    }

    impl Scripted {
        pub fn new(values: &[f64]) -> Self {
            Self { values: values.to_vec(), cursor: 0 }
        }
    }

    impl RandomSource for Scripted {
        fn unit(&mut self) -> f64 {
            let value = self.values[self.cursor % self.values.len()];
            self.cursor += 1;
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::Scripted;
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_manual_runs_in_due_order() {
        let clock = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (delay, label) in [(300, "c"), (100, "a"), (200, "b"), (100, "a2")] {
            let log = log.clone();
            clock.after(delay, Box::new(move || log.borrow_mut().push(label)));
        }
        clock.advance(150);
        assert_eq!(*log.borrow(), vec!["a", "a2"]);
        clock.advance(1000);
        assert_eq!(*log.borrow(), vec!["a", "a2", "b", "c"]);
        assert_eq!(clock.now(), 1150);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_manual_interval_repeats() {
        let clock = ManualScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        clock.every(16, Box::new(move || counter.set(counter.get() + 1)));
        clock.advance(160);
        assert_eq!(hits.get(), 10);
        clock.dispose();
        clock.advance(160);
        assert_eq!(hits.get(), 10);
    }

    #[test]
    fn test_tasks_can_schedule_followups() {
        let clock = ManualScheduler::new();
        let fired_at = Rc::new(Cell::new(0));
        let inner_clock = clock.clone();
        let fired = fired_at.clone();
        clock.after(
            100,
            Box::new(move || {
                let probe = inner_clock.clone();
                inner_clock.after(50, Box::new(move || fired.set(probe.now())));
            }),
        );
        clock.advance(1000);
        assert_eq!(fired_at.get(), 150);
    }

    #[test]
    fn test_random_helpers_stay_in_range() {
        let mut rng = Scripted::new(&[0.0, 0.999_999, 0.5]);
        assert_eq!(rng.index(8), Some(0));
        assert_eq!(rng.index(8), Some(7));
        assert_eq!(rng.index(8), Some(4));
        assert_eq!(rng.index(0), None);

        let mut seeded = fastrand::Rng::with_seed(7);
        for _ in 0..1000 {
            let period = seeded.between(3000, 8000);
            assert!((3000..8000).contains(&period));
        }
        assert_eq!(seeded.between(5, 5), 5);
    }
}
