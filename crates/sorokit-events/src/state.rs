//! Poller state: the held events, cursor and failure bookkeeping.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};
use sorokit_core::error::TransportError;
use sorokit_core::event::EventRecord;

/// Where a poller is in its fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PollerPhase {
    /// No fetch in flight; the next poll runs at the base interval.
    Idle,
    /// Exactly one fetch cycle is in flight.
    Fetching,
    /// The last cycle exhausted its retries; polling continues at the
    /// degraded interval.
    Degraded,
    /// Terminal.
    Disposed,
}

impl fmt::Display for PollerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Fetching => write!(f, "fetching"),
            Self::Degraded => write!(f, "degraded"),
            Self::Disposed => write!(f, "disposed"),
        }
    }
}

/// Mutable state owned by one poller.
#[derive(Debug, Default)]
pub struct PollerState {
    pub cursor: Option<String>,
    events: VecDeque<EventRecord>,
    seen: HashSet<String>,
    pub consecutive_failures: u32,
    pub is_recovering: bool,
    pub last_error: Option<TransportError>,
}

impl PollerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Append the records whose ids are not yet held, in arrival order, and
    /// return the ones that were new.
    ///
    /// The cursor moves to the last new record's token only when at least
    /// one record was new. When `cap` is set the oldest events beyond it are
    /// dropped and their ids forgotten.
    pub fn absorb<I>(&mut self, records: I, cap: Option<usize>) -> Vec<EventRecord>
    where
        I: IntoIterator<Item = EventRecord>,
    {
        let mut fresh = Vec::new();
        for record in records {
            if self.seen.insert(record.id.clone()) {
                fresh.push(record);
            }
        }
        if let Some(last) = fresh.last() {
            self.cursor = Some(last.cursor_token.clone());
        }
        self.events.extend(fresh.iter().cloned());

        if let Some(cap) = cap {
            while self.events.len() > cap {
                if let Some(old) = self.events.pop_front() {
                    self.seen.remove(&old.id);
                }
            }
        }
        fresh
    }

    /// Record a successful cycle. Returns `true` if this ended degraded mode.
    pub fn record_success(&mut self) -> bool {
        let recovered = self.is_recovering;
        self.consecutive_failures = 0;
        self.is_recovering = false;
        self.last_error = None;
        recovered
    }

    /// Note one failed attempt within a cycle.
    pub fn record_attempt_failure(&mut self, attempt: u32) {
        self.consecutive_failures = attempt;
    }

    /// Record a cycle whose retries were exhausted.
    pub fn record_exhausted(&mut self, error: TransportError) {
        self.is_recovering = true;
        self.last_error = Some(error);
    }

    pub fn snapshot(&self, is_fetching: bool, disposed: bool) -> PollerSnapshot {
        let phase = if disposed {
            PollerPhase::Disposed
        } else if is_fetching {
            PollerPhase::Fetching
        } else if self.is_recovering {
            PollerPhase::Degraded
        } else {
            PollerPhase::Idle
        };
        PollerSnapshot {
            cursor: self.cursor.clone(),
            events: self.events.iter().cloned().collect(),
            consecutive_failures: self.consecutive_failures,
            is_recovering: self.is_recovering,
            last_error: self.last_error.clone(),
            is_fetching,
            disposed,
            phase,
        }
    }
}

/// Point-in-time copy of a poller's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerSnapshot {
    pub cursor: Option<String>,
    pub events: Vec<EventRecord>,
    pub consecutive_failures: u32,
    pub is_recovering: bool,
    pub last_error: Option<TransportError>,
    pub is_fetching: bool,
    pub disposed: bool,
    pub phase: PollerPhase,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> EventRecord {
        EventRecord {
            id: id.into(),
            kind: "contract".into(),
            ledger_sequence: 1,
            ledger_close_time: String::new(),
            contract_id: String::new(),
            topics: vec![],
            value: String::new(),
            cursor_token: format!("tok-{id}"),
            transaction_hash: String::new(),
            succeeded_in_call: true,
        }
    }

    #[test]
    fn first_occurrence_wins() {
        let mut state = PollerState::new();
        let mut first = record("a");
        first.ledger_sequence = 10;
        state.absorb(vec![first, record("b")], None);
        let fresh = state.absorb(vec![record("a"), record("c")], None);
        assert_eq!(fresh.len(), 1);
        let snap = state.snapshot(false, false);
        let ids: Vec<_> = snap.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(snap.events[0].ledger_sequence, 10);
        assert_eq!(snap.cursor.as_deref(), Some("tok-c"));
    }

    #[test]
    fn duplicates_within_one_page_are_dropped() {
        let mut state = PollerState::new();
        let fresh = state.absorb(vec![record("a"), record("a")], None);
        assert_eq!(fresh.len(), 1);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn cursor_unchanged_without_new_records() {
        let mut state = PollerState::new();
        state.absorb(vec![record("a")], None);
        state.absorb(vec![record("a")], None);
        state.absorb(Vec::new(), None);
        assert_eq!(state.cursor.as_deref(), Some("tok-a"));
    }

    #[test]
    fn cap_trims_oldest_and_forgets_ids() {
        let mut state = PollerState::new();
        state.absorb(vec![record("a"), record("b"), record("c")], Some(2));
        let ids: Vec<_> = state.snapshot(false, false).events.into_iter().map(|e| e.id).collect();
        assert_eq!(ids, ["b", "c"]);
        assert_eq!(state.absorb(vec![record("a")], Some(2)).len(), 1);
    }

    #[test]
    fn phases() {
        let mut state = PollerState::new();
        assert_eq!(state.snapshot(false, false).phase, PollerPhase::Idle);
        assert_eq!(state.snapshot(true, false).phase, PollerPhase::Fetching);
        state.record_attempt_failure(3);
        state.record_exhausted(TransportError::Http("down".into()));
        assert_eq!(state.snapshot(false, false).phase, PollerPhase::Degraded);
        assert_eq!(state.snapshot(false, true).phase, PollerPhase::Disposed);
        assert!(state.record_success());
        let snap = state.snapshot(false, false);
        assert_eq!(snap.consecutive_failures, 0);
        assert!(snap.last_error.is_none());
        assert!(!state.record_success());
    }
}
