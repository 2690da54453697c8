use injectra::{Arguments, Dependency, Injectable, Scope};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct HashRecord {
    pub id: u64,
    pub input: String,
    pub algorithm: String,
    pub digest: String,
}

#[derive(Default)]
struct Table {
    next_id: u64,
    rows: BTreeMap<u64, HashRecord>,
}

/// In-memory table of computed hashes, shared by every request.
pub struct HashStore {
    capacity: usize,
    table: Mutex<Table>,
}

impl Injectable for HashStore {
    const SCOPE: Scope = Scope::Singleton;

    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::value::<usize>("capacity").with_default(1024usize)]
    }

    fn construct(args: Arguments) -> injectra::Result<Self> {
        Ok(HashStore {
            capacity: args.value("capacity")?,
            table: Mutex::new(Table::default()),
        })
    }
}

impl HashStore {
    pub fn insert(&self, input: &str, algorithm: &str, digest: String) -> Result<HashRecord, String> {
        let mut table = self.table.lock();
        if table.rows.len() >= self.capacity {
            return Err(format!("store is full ({} entries)", self.capacity));
        }
        if table.rows.values().any(|row| row.input == input) {
            return Err(format!("Duplicate input: {}", input));
        }

        table.next_id += 1;
        let record = HashRecord {
            id: table.next_id,
            input: input.to_string(),
            algorithm: algorithm.to_string(),
            digest,
        };
        table.rows.insert(record.id, record.clone());
        Ok(record)
    }

    pub fn get(&self, id: u64) -> Option<HashRecord> {
        self.table.lock().rows.get(&id).cloned()
    }

    pub fn find_by_input(&self, input: &str) -> Option<HashRecord> {
        self.table
            .lock()
            .rows
            .values()
            .find(|row| row.input == input)
            .cloned()
    }

    pub fn list(&self) -> Vec<HashRecord> {
        self.table.lock().rows.values().rev().cloned().collect()
    }

    /// Replace the digest of an existing row.
    pub fn update(&self, id: u64, algorithm: &str, digest: String) -> Option<HashRecord> {
        let mut table = self.table.lock();
        let row = table.rows.get_mut(&id)?;
        row.algorithm = algorithm.to_string();
        row.digest = digest;
        Some(row.clone())
    }

    pub fn delete(&self, id: u64) -> bool {
        self.table.lock().rows.remove(&id).is_some()
    }
}
