// src/record.rs
//! Records, profiles and the per-day grouping built during aggregation.

use std::collections::BTreeMap;

/// One data element taken from an `IPDATA` or `BGDATA` container.
///
/// `raw` is an owned copy of the element's exact source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub date: String,
    pub time: Option<String>,
    pub raw: String,
}

impl Record {
    /// Key used by timestamp deduplication and sorting.
    #[must_use]
    pub fn timestamp_key(&self) -> (&str, &str, &str) {
        (
            self.date.as_str(),
            self.time.as_deref().unwrap_or(""),
            self.name.as_str(),
        )
    }
}

/// An insulin-pump profile snapshot (`IP` element), written verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub date: String,
    pub raw: String,
}

/// Records grouped by their `Dt` value.
///
/// Dates iterate in lexical order; records within a date keep the order in
/// which they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayBucket {
    days: BTreeMap<String, Vec<Record>>,
}

impl DayBucket {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Files the record under its own date.
    pub fn push(&mut self, record: Record) {
        self.days.entry(record.date.clone()).or_default().push(record);
    }

    #[must_use]
    pub fn get(&self, date: &str) -> Option<&[Record]> {
        self.days.get(date).map(Vec::as_slice)
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.days.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.days.iter().map(|(d, r)| (d.as_str(), r.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }
}

impl IntoIterator for DayBucket {
    type Item = (String, Vec<Record>);
    type IntoIter = std::collections::btree_map::IntoIter<String, Vec<Record>>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, date: &str, raw: &str) -> Record {
        Record {
            name: name.to_string(),
            date: date.to_string(),
            time: None,
            raw: raw.to_string(),
        }
    }

    #[test]
    fn test_records_filed_under_own_date() {
        let mut b = DayBucket::new();
        b.push(rec("BG", "2021-01-02", "<BG/>"));
        b.push(rec("BOLUS", "2021-01-01", "<BOLUS/>"));
        b.push(rec("BG", "2021-01-01", "<BG/>"));

        assert_eq!(b.len(), 2);
        assert_eq!(b.record_count(), 3);
        for (date, records) in b.iter() {
            assert!(records.iter().all(|r| r.date == date));
        }
    }

    #[test]
    fn test_insertion_order_kept_within_day() {
        let mut b = DayBucket::new();
        b.push(rec("B", "d", "<B/>"));
        b.push(rec("A", "d", "<A/>"));
        let names: Vec<_> = b.get("d").unwrap().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
    }

    #[test]
    fn test_dates_iterate_sorted() {
        let mut b = DayBucket::new();
        b.push(rec("X", "2021-03-01", ""));
        b.push(rec("X", "2021-01-01", ""));
        let dates: Vec<_> = b.dates().collect();
        assert_eq!(dates, ["2021-01-01", "2021-03-01"]);
    }
}
