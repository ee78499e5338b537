//! Timestamps and timestamp-based ids.
//!
//! Both are monotonic within a process: two calls never return the same
//! instant or the same id, even when they land in the same millisecond.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Default)]
pub struct Clock {
    last_instant: Mutex<Option<DateTime<Utc>>>,
    last_id_millis: AtomicI64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time, strictly after every instant previously returned.
    pub fn now(&self) -> DateTime<Utc> {
        self.advance(None)
    }

    /// Like [`Clock::now`], but also strictly after `floor`. Stored
    /// timestamps may run ahead of this machine's clock.
    pub fn now_after(&self, floor: DateTime<Utc>) -> DateTime<Utc> {
        self.advance(Some(floor))
    }

    fn advance(&self, floor: Option<DateTime<Utc>>) -> DateTime<Utc> {
        let mut last = self
            .last_instant
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let now = Utc::now();
        let bound = match (*last, floor) {
            (Some(prev), Some(floor)) => Some(prev.max(floor)),
            (prev, floor) => prev.or(floor),
        };
        let next = match bound {
            Some(bound) if now <= bound => bound + Duration::microseconds(1),
            _ => now,
        };
        *last = Some(next);
        next
    }

    /// Next id of the form `<prefix><millis>`, e.g. `m-1718000000000`.
    pub fn next_id(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.next_millis())
    }

    fn next_millis(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut prev = self.last_id_millis.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self.last_id_millis.compare_exchange_weak(
                prev,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn instants_strictly_increase() {
        let clock = Clock::new();
        let mut prev = clock.now();
        for _ in 0..1000 {
            let next = clock.now();
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn now_after_passes_a_future_floor() {
        let clock = Clock::new();
        let future = Utc::now() + Duration::days(365 * 50);

        let bumped = clock.now_after(future);
        assert!(bumped > future);
        assert!(clock.now() > bumped);
    }

    #[test]
    fn now_after_past_floor_is_plain_now() {
        let clock = Clock::new();
        let before = Utc::now();
        let stamp = clock.now_after(before - Duration::hours(1));
        assert!(stamp >= before);
    }

    #[test]
    fn ids_are_unique_in_a_tight_loop() {
        let clock = Clock::new();
        let ids: HashSet<String> = (0..1000).map(|_| clock.next_id("t-")).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn ids_carry_prefix_and_timestamp() {
        let clock = Clock::new();
        let before = Utc::now().timestamp_millis();
        let id = clock.next_id("ts-");
        let millis: i64 = id.strip_prefix("ts-").unwrap().parse().unwrap();
        assert!(millis >= before);

        let bare = clock.next_id("");
        assert!(bare.parse::<i64>().is_ok());
    }
}
