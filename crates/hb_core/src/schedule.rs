//! Tick-indexed deferred events.
//!
//! Delayed effects record the tick they are due on instead of arming a
//! wall-clock timer, so a run is fully reproducible from its inputs. Each entry
//! is stamped with the schedule's generation; `reset` bumps the generation and
//! drops everything queued, so nothing from a torn-down session can fire into
//! the next one.

#[derive(Debug, Clone)]
struct Scheduled<T> {
    due_tick: u64,
    seq: u64,
    generation: u32,
    payload: T,
}

#[derive(Debug, Clone)]
pub struct Schedule<T> {
    entries: Vec<Scheduled<T>>,
    generation: u32,
    next_seq: u64,
}

impl<T> Schedule<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            generation: 0,
            next_seq: 0,
        }
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queue `payload` to fire on `due_tick`.
    pub fn push_at(&mut self, due_tick: u64, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Scheduled {
            due_tick,
            seq,
            generation: self.generation,
            payload,
        });
    }

    /// Remove and return every payload due at or before `now`, ordered by due
    /// tick and then by insertion order.
    pub fn drain_due(&mut self, now: u64) -> Vec<T> {
        let generation = self.generation;
        let mut due = Vec::new();
        let mut pending = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if entry.generation != generation {
                continue;
            }
            if entry.due_tick <= now {
                due.push(entry);
            } else {
                pending.push(entry);
            }
        }
        self.entries = pending;
        due.sort_by_key(|entry| (entry.due_tick, entry.seq));
        due.into_iter().map(|entry| entry.payload).collect()
    }

    /// Invalidate everything queued so far.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.generation = self.generation.wrapping_add(1);
    }
}

impl<T> Default for Schedule<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_only_due_entries_in_order() {
        let mut schedule = Schedule::new();
        schedule.push_at(10, "late");
        schedule.push_at(3, "first");
        schedule.push_at(3, "second");
        schedule.push_at(5, "third");

        assert!(schedule.drain_due(2).is_empty());
        assert_eq!(schedule.drain_due(5), vec!["first", "second", "third"]);
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.drain_due(100), vec!["late"]);
        assert!(schedule.is_empty());
    }

    #[test]
    fn reset_discards_pending_entries() {
        let mut schedule = Schedule::new();
        schedule.push_at(1, 1);
        schedule.push_at(2, 2);
        let before = schedule.generation();

        schedule.reset();
        assert_ne!(schedule.generation(), before);
        assert!(schedule.drain_due(u64::MAX).is_empty());

        schedule.push_at(1, 3);
        assert_eq!(schedule.drain_due(1), vec![3]);
    }
}
