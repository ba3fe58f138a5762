use crate::player::{LookupEntry, RemotePlayer};
use anyhow::Result;

/// Which top-level command opened the turn; decides append vs replace at flush
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueOrigin {
    #[default]
    Add,
    Set,
}

/// Entries resolved during one interactive turn, waiting to be sent 📋
#[derive(Debug, Default)]
pub struct QueueAccumulator {
    entries: Vec<LookupEntry>,
}

impl QueueAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: LookupEntry) {
        self.entries.push(entry);
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = LookupEntry>) {
        self.entries.extend(entries);
    }

    pub fn entries(&self) -> &[LookupEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Send everything to the server. Entries are only dropped once the call
    /// succeeds so a failed flush can be retried.
    pub fn flush(&mut self, remote: &dyn RemotePlayer, origin: QueueOrigin) -> Result<usize> {
        let paths: Vec<String> = self.entries.iter().map(|e| e.path.clone()).collect();
        match origin {
            QueueOrigin::Add => remote.add_to_queue(&paths)?,
            QueueOrigin::Set => remote.set_queue(&paths)?,
        }
        let count = self.entries.len();
        self.entries.clear();
        tracing::info!(count, ?origin, "queue flushed");
        Ok(count)
    }
}
