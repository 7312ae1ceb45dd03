use crate::notification::NotificationRecord;
use chrono::{DateTime, Utc};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Records gathered during one polling session, keyed by queue message id.
///
/// Entries are insert-once: a message id already present keeps its first record.
#[derive(Debug, Clone)]
pub struct AccumulatedState {
    records: HashMap<String, NotificationRecord>,
    iteration: u32,
    started_at: DateTime<Utc>,
}

impl AccumulatedState {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            records: HashMap::new(),
            iteration: 0,
            started_at,
        }
    }

    pub fn reset(
        &mut self,
        started_at: DateTime<Utc>,
    ) {
        self.records.clear();
        self.iteration = 0;
        self.started_at = started_at;
    }

    /// Returns how many records were actually inserted.
    pub fn merge(
        &mut self,
        records: impl IntoIterator<Item = (String, NotificationRecord)>,
    ) -> usize {
        let mut inserted = 0;

        for (message_id, record) in records {
            if let Entry::Vacant(entry) = self.records.entry(message_id) {
                entry.insert(record);
                inserted += 1;
            }
        }

        inserted
    }

    pub fn get(
        &self,
        message_id: &str,
    ) -> Option<&NotificationRecord> {
        self.records.get(message_id)
    }

    pub fn records(&self) -> impl Iterator<Item = &NotificationRecord> {
        self.records.values()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &NotificationRecord)> {
        self.records.iter().map(|(message_id, record)| (message_id.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub(crate) fn advance(&mut self) {
        self.iteration += 1;
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
