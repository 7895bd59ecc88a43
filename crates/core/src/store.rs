//! The card's in-memory record list.
//!
//! Order is the server's list order followed by records created in this
//! session. At most one record per primary key is held at any time.

use crate::resource::Resource;

#[derive(Debug, Clone, PartialEq)]
pub struct LocalStore<R> {
    records: Vec<R>,
}

impl<R> Default for LocalStore<R> {
    fn default() -> Self {
        LocalStore {
            records: Vec::new(),
        }
    }
}

impl<R: Resource> LocalStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole contents with a freshly fetched list.
    ///
    /// A list repeating a key keeps the first occurrence's position and the
    /// last occurrence's value.
    pub fn replace_all(&mut self, records: Vec<R>) {
        self.records.clear();
        for record in records {
            self.upsert(record);
        }
    }

    /// Append a record returned by a create. When the server hands back a key
    /// already present, the existing entry is overwritten in place and
    /// `false` is returned.
    pub fn push_created(&mut self, record: R) -> bool {
        self.upsert(record)
    }

    /// Overwrite the entry with the same key, keeping its position.
    ///
    /// Returns `false` and leaves the store untouched when no entry has that
    /// key.
    pub fn replace(&mut self, record: R) -> bool {
        match self.position(record.id()) {
            Some(idx) => {
                self.records[idx] = record;
                true
            }
            None => false,
        }
    }

    /// Remove the entry with key `id`, returning it.
    pub fn remove(&mut self, id: &str) -> Option<R> {
        let idx = self.position(id)?;
        Some(self.records.remove(idx))
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    // true when the record was appended, false when it overwrote
    fn upsert(&mut self, record: R) -> bool {
        match self.position(record.id()) {
            Some(idx) => {
                self.records[idx] = record;
                false
            }
            None => {
                self.records.push(record);
                true
            }
        }
    }
}
