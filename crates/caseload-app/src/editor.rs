// Copyright 2026 Caseload Contributors
// Licensed under the Apache License, Version 2.0

use crate::ids::RecordId;
use crate::model::{FieldValue, Record};

/// Staged, uncommitted field values for one record under edit. Seeded with a
/// shadow copy of the record's editable fields; complex fields stay out since
/// they are read-only in the grid. Commit merges only the keys present here.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditBuffer {
    entries: Vec<(String, FieldValue)>,
}

impl EditBuffer {
    pub fn from_record(record: &Record) -> Self {
        let entries = record
            .fields()
            .into_iter()
            .filter(|field| field.name != "id" && !field.value.is_complex())
            .map(|field| (field.name.to_owned(), field.value))
            .collect();
        Self { entries }
    }

    /// Last-write-wins update by field name.
    pub fn set(&mut self, field: &str, value: FieldValue) {
        match self.entries.iter_mut().find(|(name, _)| name == field) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((field.to_owned(), value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn entries(&self) -> &[(String, FieldValue)] {
        &self.entries
    }

    /// Field-wise overwrite of the buffer's keys onto `record`. Keys the
    /// record does not accept (unknown, read-only, unparsable text) are
    /// skipped silently; everything absent from the buffer is preserved.
    pub fn merge_into(&self, record: &mut Record) {
        for (field, value) in &self.entries {
            let _applied = record.apply_field(field, value);
        }
    }
}

/// Per-category edit lifecycle. At most one row per category is ever in
/// `Editing`; the switchboard enforces that by holding one of these per
/// category.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditorState {
    #[default]
    Viewing,
    Editing { id: RecordId, buffer: EditBuffer },
}

impl EditorState {
    /// Opens an edit session for `record`, replacing any session already in
    /// flight. Returns the id of the session that was discarded, if any.
    pub fn begin(&mut self, record: &Record) -> Option<RecordId> {
        let discarded = match self {
            Self::Editing { id, .. } if id != record.id() => Some(id.clone()),
            _ => None,
        };
        *self = Self::Editing {
            id: record.id().clone(),
            buffer: EditBuffer::from_record(record),
        };
        discarded
    }

    /// Stages one field change. No-op in `Viewing`.
    pub fn change(&mut self, field: &str, value: FieldValue) -> bool {
        match self {
            Self::Editing { buffer, .. } => {
                buffer.set(field, value);
                true
            }
            Self::Viewing => false,
        }
    }

    /// Discards the buffer. Idempotent: cancelling from `Viewing` is a no-op.
    pub fn cancel(&mut self) -> Option<RecordId> {
        match std::mem::take(self) {
            Self::Editing { id, .. } => Some(id),
            Self::Viewing => None,
        }
    }

    /// Takes the session for commit, returning to `Viewing`. The caller
    /// merges the buffer into the target record and writes it back.
    pub fn take(&mut self) -> Option<(RecordId, EditBuffer)> {
        match std::mem::take(self) {
            Self::Editing { id, buffer } => Some((id, buffer)),
            Self::Viewing => None,
        }
    }

    /// Clears the session if it targets `id` (the row was deleted).
    pub fn clear_if_editing(&mut self, id: &RecordId) -> bool {
        match self {
            Self::Editing { id: editing, .. } if editing == id => {
                *self = Self::Viewing;
                true
            }
            _ => false,
        }
    }

    pub const fn editing_id(&self) -> Option<&RecordId> {
        match self {
            Self::Editing { id, .. } => Some(id),
            Self::Viewing => None,
        }
    }

    pub fn buffer(&self) -> Option<&EditBuffer> {
        match self {
            Self::Editing { buffer, .. } => Some(buffer),
            Self::Viewing => None,
        }
    }
}
