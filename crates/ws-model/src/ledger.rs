//! Run-scoped emissions ledger.
//!
//! Every woodburner accumulates its output here under the timestamp of the
//! ignition. The ledger also counts the soft misses the model recovers from
//! (no temperature bin, hour outside the ignition table, no containing curve
//! segment, absent ledger key).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ws_core::{Timestamp, on_hour_grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissKind {
    TemperatureBin,
    IgnitionHour,
    Segment,
    LedgerKey,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissCounts {
    pub temperature_bin: u64,
    pub ignition_hour: u64,
    pub segment: u64,
    pub ledger_key: u64,
}

impl MissCounts {
    pub fn total(&self) -> u64 {
        self.temperature_bin + self.ignition_hour + self.segment + self.ledger_key
    }
}

#[derive(Debug, Clone, Default)]
pub struct EmissionsLedger {
    entries: BTreeMap<Timestamp, f64>,
    misses: MissCounts,
}

impl EmissionsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` to the entry for `key`, creating it if absent.
    pub fn accumulate(&mut self, key: Timestamp, value: f64) {
        *self.entries.entry(key).or_insert(0.0) += value;
    }

    pub fn get(&self, key: &Timestamp) -> Option<f64> {
        self.entries.get(key).copied()
    }

    /// Read an entry, treating an absent key as zero and counting the miss.
    pub fn lookup(&mut self, key: &Timestamp) -> f64 {
        match self.entries.get(key) {
            Some(v) => *v,
            None => {
                self.record_miss(MissKind::LedgerKey);
                0.0
            }
        }
    }

    pub fn record_miss(&mut self, kind: MissKind) {
        match kind {
            MissKind::TemperatureBin => self.misses.temperature_bin += 1,
            MissKind::IgnitionHour => self.misses.ignition_hour += 1,
            MissKind::Segment => self.misses.segment += 1,
            MissKind::LedgerKey => self.misses.ledger_key += 1,
        }
    }

    pub fn misses(&self) -> MissCounts {
        self.misses
    }

    /// Entries in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (&Timestamp, &f64)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.values().sum()
    }

    /// Sum of the entries on the hourly grid from `start` to `end` inclusive.
    pub fn sum_hourly(&self, start: Timestamp, end: Timestamp) -> f64 {
        if end < start {
            return 0.0;
        }
        self.entries
            .range(start..=end)
            .filter(|(key, _)| on_hour_grid(&start, key))
            .map(|(_, value)| value)
            .sum()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.misses = MissCounts::default();
    }
}

impl FromIterator<(Timestamp, f64)> for EmissionsLedger {
    fn from_iter<I: IntoIterator<Item = (Timestamp, f64)>>(iter: I) -> Self {
        let mut ledger = EmissionsLedger::new();
        for (key, value) in iter {
            ledger.accumulate(key, value);
        }
        ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ws_core::parse_timestamp;

    fn ts(s: &str) -> Timestamp {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn accumulate_creates_then_adds() {
        let mut ledger = EmissionsLedger::new();
        let key = ts("2019-06-01 17:00:00");
        ledger.accumulate(key, 1.5);
        ledger.accumulate(key, 2.0);
        assert_eq!(ledger.get(&key), Some(3.5));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn lookup_counts_misses() {
        let mut ledger = EmissionsLedger::new();
        assert_eq!(ledger.lookup(&ts("2019-06-01 17:00:00")), 0.0);
        assert_eq!(ledger.misses().ledger_key, 1);
        ledger.record_miss(MissKind::Segment);
        assert_eq!(ledger.misses().total(), 2);
    }

    #[test]
    fn iteration_is_chronological() {
        let ledger: EmissionsLedger = [
            (ts("2019-06-02 09:00:00"), 1.0),
            (ts("2019-06-01 21:00:00"), 2.0),
            (ts("2019-06-01 09:00:00"), 3.0),
        ]
        .into_iter()
        .collect();
        let keys: Vec<_> = ledger.iter().map(|(k, _)| *k).collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn sum_hourly_is_inclusive() {
        let ledger: EmissionsLedger = [
            (ts("2019-06-01 16:00:00"), 1.0),
            (ts("2019-06-01 17:00:00"), 2.0),
            (ts("2019-06-01 18:00:00"), 4.0),
        ]
        .into_iter()
        .collect();
        let sum = ledger.sum_hourly(ts("2019-06-01 16:00:00"), ts("2019-06-01 17:00:00"));
        assert_eq!(sum, 3.0);
        assert_eq!(
            ledger.sum_hourly(ts("2019-06-01 19:00:00"), ts("2019-06-01 23:00:00")),
            0.0
        );
    }

    #[test]
    fn sum_hourly_walks_only_stored_keys() {
        let ledger: EmissionsLedger = [
            (ts("2019-06-01 15:00:00"), 100.0),
            (ts("2019-06-01 19:00:00"), 1.0),
            (ts("2019-06-01 20:30:00"), 50.0),
            (ts("2019-06-01 23:00:00"), 2.0),
            (ts("2019-06-02 00:00:00"), 100.0),
        ]
        .into_iter()
        .collect();
        let start = ts("2019-06-01 19:00:00");
        let end = ts("2019-06-01 23:00:00");
        assert_eq!(ledger.sum_hourly(start, end), 3.0);
        assert_eq!(ledger.sum_hourly(end, start), 0.0);
        assert_eq!(ledger.sum_hourly(ts("2019-01-01 00:00:00"), ts("2030-01-01 00:00:00")), 203.0);
    }

    #[test]
    fn clear_resets_state() {
        let mut ledger = EmissionsLedger::new();
        ledger.accumulate(ts("2019-06-01 16:00:00"), 1.0);
        ledger.record_miss(MissKind::IgnitionHour);
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.misses(), MissCounts::default());
    }
}
