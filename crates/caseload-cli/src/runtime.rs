// Copyright 2026 Caseload Contributors
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use caseload_app::{Category, Record, RecordId, RecordRepository};
use caseload_db::Store;

/// Adapts the SQLite store to the repository seam the grid state machine
/// dispatches against.
pub struct DbRuntime<'a> {
    store: &'a Store,
}

impl<'a> DbRuntime<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }
}

impl RecordRepository for DbRuntime<'_> {
    fn list(&self, category: Category) -> Result<Vec<Record>> {
        self.store.list_records(category)
    }

    fn get(&self, category: Category, id: &RecordId) -> Result<Option<Record>> {
        self.store.get_record(category, id)
    }

    fn insert(&mut self, record: Record) -> Result<()> {
        self.store.insert_record(&record)
    }

    fn update(&mut self, record: Record) -> Result<bool> {
        self.store.update_record(&record)
    }

    fn delete(&mut self, category: Category, id: &RecordId) -> Result<bool> {
        self.store.delete_record(category, id)
    }
}
