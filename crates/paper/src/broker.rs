//! Paper Broker - in-memory account with an append-only journal

use log::{debug, warn};
use parking_lot::Mutex;
use serde::Serialize;
use trader_core::Tick;
use trader_ports::{Broker, OperationError, OperationResult};

/// One record in the paper broker journal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalEntry {
    /// Position in the journal, starting at 0
    pub sequence: u64,
    /// Strategy that produced the operation
    pub strategy: String,
    /// Tick the operation was produced for
    pub tick: Tick,
    /// Free-form description
    pub note: String,
}

/// In-memory broker journaling every operation applied to it
///
/// Operations reach the broker from the tick loop thread, while tests and
/// the binary read the journal from the caller thread, hence the mutex.
pub struct PaperBroker {
    name: String,
    max_entries: Option<usize>,
    journal: Mutex<Vec<JournalEntry>>,
}

impl PaperBroker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_entries: None,
            journal: Mutex::new(Vec::new()),
        }
    }

    /// Refuse further records once `max_entries` are journaled
    pub fn with_capacity_limit(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    /// Append an entry, returning its sequence number
    pub fn record(
        &self,
        strategy: impl Into<String>,
        tick: Tick,
        note: impl Into<String>,
    ) -> OperationResult<u64> {
        let mut journal = self.journal.lock();

        if let Some(limit) = self.max_entries
            && journal.len() >= limit
        {
            warn!("[{}] Journal full ({} entries), rejecting record", self.name, limit);
            return Err(OperationError::Rejected(format!(
                "journal capacity of {limit} entries reached"
            )));
        }

        let sequence = journal.len() as u64;
        let entry = JournalEntry {
            sequence,
            strategy: strategy.into(),
            tick,
            note: note.into(),
        };
        debug!(
            "[{}] #{} {} @ {}: {}",
            self.name, sequence, entry.strategy, entry.tick, entry.note
        );
        journal.push(entry);

        Ok(sequence)
    }

    /// Snapshot of the journal
    pub fn journal(&self) -> Vec<JournalEntry> {
        self.journal.lock().clone()
    }

    /// Ticks of all journal entries, in application order
    pub fn ticks(&self) -> Vec<Tick> {
        self.journal.lock().iter().map(|e| e.tick).collect()
    }

    pub fn len(&self) -> usize {
        self.journal.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.journal.lock().is_empty()
    }
}

impl Broker for PaperBroker {
    fn name(&self) -> &str {
        &self.name
    }
}
