use chrono::NaiveDate;
use std::collections::HashSet;

/// `YYYY-MM-DD|amount`. Two rows with the same date and signed amount share a
/// fingerprint whatever their descriptions.
pub fn fingerprint(date: NaiveDate, formatted_amount: &str) -> String {
    format!("{}|{}", date.format("%Y-%m-%d"), formatted_amount)
}

/// Remembers which date/amount pairs are already in the journal.
///
/// A heuristic: distinct transactions that share a date and amount are
/// reported as seen.
#[derive(Debug, Clone, Default)]
pub struct DedupGuard {
    seen: HashSet<String>,
}

impl DedupGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_seen(&mut self, date: NaiveDate, formatted_amount: &str) {
        self.seen.insert(fingerprint(date, formatted_amount));
    }

    pub fn already_seen(&self, date: NaiveDate, formatted_amount: &str) -> bool {
        self.seen.contains(&fingerprint(date, formatted_amount))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fingerprint_layout() {
        assert_eq!(fingerprint(date(2020, 1, 1), "$-12.50"), "2020-01-01|$-12.50");
    }

    #[test]
    fn detects_same_date_and_amount() {
        let mut guard = DedupGuard::new();
        guard.record_seen(date(2020, 1, 1), "$-12.50");
        assert!(guard.already_seen(date(2020, 1, 1), "$-12.50"));
    }

    #[test]
    fn ignores_different_amount_or_date() {
        let mut guard = DedupGuard::new();
        guard.record_seen(date(2020, 1, 1), "$-12.50");
        assert!(!guard.already_seen(date(2020, 1, 1), "$12.50"));
        assert!(!guard.already_seen(date(2020, 1, 2), "$-12.50"));
    }

    #[test]
    fn repeated_records_collapse() {
        let mut guard = DedupGuard::new();
        guard.record_seen(date(2020, 1, 1), "$1.00");
        guard.record_seen(date(2020, 1, 1), "$1.00");
        assert_eq!(guard.len(), 1);
    }
}
