//! Discrete-event scheduler driving the simulation clock
//!
//! Actions are small handle values owned by the caller. The scheduler keeps
//! a priority-ordered pending set of (due-time, action) entries and, on each
//! `step`, advances the clock one unit and dispatches everything that has
//! come due, in due-time order with ties broken by admission order. Each
//! dispatched action reports its own next firing offset, so periodic
//! behavior lives in the actions, not in the engine.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

use crate::clock::SimTime;

/// What a dispatched action asks the scheduler to do with it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reschedule {
    /// Fire again this many steps after the tick the action was due.
    /// `After(0)` is treated as `Never`.
    After(u64),
    /// Drop the action; it will not fire again unless re-admitted.
    Never,
}

pub struct Scheduler<A> {
    clock: SimTime,
    next_seq: u64,
    /// Pending entries ordered by (due-time, admission sequence).
    queue: BTreeMap<(SimTime, u64), A>,
    /// Reverse index; also enforces at-most-once membership per action.
    index: HashMap<A, (SimTime, u64)>,
    /// Actions cancelled since the current dispatch pass began.
    cancelled: HashSet<A>,
}

impl<A> Scheduler<A>
where
    A: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            clock: SimTime::ZERO,
            next_seq: 0,
            queue: BTreeMap::new(),
            index: HashMap::new(),
            cancelled: HashSet::new(),
        }
    }

    pub fn now(&self) -> SimTime {
        self.clock
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn contains(&self, action: &A) -> bool {
        self.index.contains_key(action)
    }

    /// Due-time of a pending action, if it is pending.
    pub fn due_time(&self, action: &A) -> Option<SimTime> {
        self.index.get(action).map(|&(time, _)| time)
    }

    /// Admit `action` to fire once the clock passes `due`. If the action is
    /// already pending its due-time is replaced; the pending set never holds
    /// the same action twice. A due-time at or before the current clock
    /// fires on the very next `step`.
    pub fn schedule(&mut self, due: SimTime, action: A) {
        self.cancelled.remove(&action);
        if let Some(key) = self.index.remove(&action) {
            self.queue.remove(&key);
        }
        let key = (due, self.next_seq);
        self.next_seq += 1;
        self.queue.insert(key, action.clone());
        self.index.insert(action, key);
    }

    /// Admit `action` to fire `offset` steps from now.
    pub fn schedule_in(&mut self, offset: u64, action: A) {
        self.schedule(self.clock.advance(offset), action);
    }

    /// Remove `action` from the pending set. Returns whether it was pending.
    ///
    /// Safe to call from inside a dispatch pass: an entry cancelled before
    /// its own dispatch this tick is skipped, and an action cancelled during
    /// its own dispatch completes the in-flight invocation but is not
    /// re-admitted afterwards.
    pub fn cancel(&mut self, action: &A) -> bool {
        self.cancelled.insert(action.clone());
        match self.index.remove(action) {
            Some(key) => {
                self.queue.remove(&key);
                true
            }
            None => false,
        }
    }

    /// Advance the clock by exactly one step, then dispatch every pending
    /// action whose due-time has passed.
    ///
    /// `dispatch` receives the scheduler itself, so actions may schedule or
    /// cancel other actions (or themselves) re-entrantly; entries admitted
    /// during the pass are only seen by later `step` calls. An action that
    /// returns `Reschedule::After(k)` is re-admitted at `due + k`, keeping
    /// fixed-cadence actions anchored to their original phase. Errors
    /// propagate immediately, leaving the clock advanced and the failing
    /// action un-rescheduled.
    pub fn step<E, F>(&mut self, mut dispatch: F) -> Result<(), E>
    where
        F: FnMut(&mut Self, &A) -> Result<Reschedule, E>,
    {
        self.clock = self.clock.advance(1);
        self.cancelled.clear();

        // Drain everything due this pass up front; re-entrant schedules land
        // in the queue for future passes, never the one in flight.
        let mut due = Vec::new();
        loop {
            let key = self.queue.first_key_value().map(|(&key, _)| key);
            match key {
                Some((time, seq)) if time < self.clock => {
                    if let Some(action) = self.queue.remove(&(time, seq)) {
                        self.index.remove(&action);
                        due.push((time, action));
                    }
                }
                _ => break,
            }
        }

        for (due_at, action) in due {
            if self.cancelled.contains(&action) {
                continue;
            }
            match dispatch(self, &action)? {
                Reschedule::After(k) if k > 0 => {
                    if !self.cancelled.contains(&action) {
                        self.schedule(due_at.advance(k), action);
                    }
                }
                Reschedule::After(_) | Reschedule::Never => {}
            }
        }
        Ok(())
    }
}

impl<A> Default for Scheduler<A>
where
    A: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
