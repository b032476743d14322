// Copyright 2026 Caseload Contributors
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use std::collections::BTreeMap;
use time::OffsetDateTime;

use crate::editor::EditorState;
use crate::ids::RecordId;
use crate::model::{Category, FieldValue, Record};
use crate::paging::PageCursor;
use crate::repo::RecordRepository;
use crate::visibility::{ColumnPreset, ColumnVisibility};

// Statics, not consts: both types carry drop glue, so a `&CONST` borrow
// would be a temporary and could not outlive the accessor.
static VIEWING: EditorState = EditorState::Viewing;
static ALL_VISIBLE: ColumnVisibility = ColumnVisibility::new();

/// Grid-wide state: one active category plus per-category pagination,
/// column visibility, and edit sessions. Switching categories resets the
/// page cursor of the newly selected category; its visibility and any
/// in-flight edit survive the round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct GridState {
    active: Category,
    page_size: usize,
    cursors: BTreeMap<Category, PageCursor>,
    visibility: BTreeMap<Category, ColumnVisibility>,
    editors: BTreeMap<Category, EditorState>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridCommand {
    SelectCategory(Category),
    NextCategory,
    PrevCategory,
    SetPage(usize),
    NextPage,
    PrevPage,
    ApplyPreset(ColumnPreset),
    ToggleColumn(String),
    BeginEdit(RecordId),
    ChangeField(String, FieldValue),
    SaveEdit,
    CancelEdit,
    DeleteRecord(RecordId),
    AddRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
    CategoryChanged(Category),
    PageChanged { page: usize, total: usize },
    PresetChanged(ColumnPreset),
    ColumnToggled(String),
    EditStarted(RecordId),
    EditDiscarded(RecordId),
    FieldStaged(String),
    EditSaved(RecordId),
    EditCancelled(RecordId),
    RecordAdded(RecordId),
    RecordDeleted(RecordId),
    Notice(String),
}

/// Field list a category exposes, taken from its first record. Empty
/// categories yield an empty list; visibility falls back to its cache.
pub fn category_fields(records: &[Record]) -> Vec<String> {
    records
        .first()
        .map(|record| {
            record
                .field_names()
                .into_iter()
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

impl GridState {
    pub fn new(start_category: Category, page_size: usize) -> Self {
        Self {
            active: start_category,
            page_size: page_size.max(1),
            cursors: BTreeMap::new(),
            visibility: BTreeMap::new(),
            editors: BTreeMap::new(),
        }
    }

    pub const fn active_category(&self) -> Category {
        self.active
    }

    pub fn cursor(&self, category: Category) -> PageCursor {
        self.cursors
            .get(&category)
            .copied()
            .unwrap_or_else(|| PageCursor::new(self.page_size))
    }

    pub fn visibility(&self, category: Category) -> &ColumnVisibility {
        self.visibility.get(&category).unwrap_or(&ALL_VISIBLE)
    }

    pub fn editor(&self, category: Category) -> &EditorState {
        self.editors.get(&category).unwrap_or(&VIEWING)
    }

    fn cursor_mut(&mut self, category: Category) -> &mut PageCursor {
        self.cursors
            .entry(category)
            .or_insert_with(|| PageCursor::new(self.page_size))
    }

    fn visibility_mut(&mut self, category: Category) -> &mut ColumnVisibility {
        self.visibility.entry(category).or_default()
    }

    fn editor_mut(&mut self, category: Category) -> &mut EditorState {
        self.editors.entry(category).or_default()
    }

    /// Applies one command against the repository and reports what changed.
    /// All repository failures surface as errors; domain misses (unknown id,
    /// out-of-range page) degrade to no-ops or notices instead.
    pub fn dispatch(
        &mut self,
        repo: &mut dyn RecordRepository,
        now: OffsetDateTime,
        command: GridCommand,
    ) -> Result<Vec<GridEvent>> {
        match command {
            GridCommand::SelectCategory(category) => self.select_category(repo, category),
            GridCommand::NextCategory => self.rotate_category(repo, 1),
            GridCommand::PrevCategory => self.rotate_category(repo, -1),
            GridCommand::SetPage(page) => self.set_page(repo, page),
            GridCommand::NextPage => {
                let page = self.cursor(self.active).page();
                self.set_page(repo, page.saturating_add(1))
            }
            GridCommand::PrevPage => {
                let page = self.cursor(self.active).page();
                self.set_page(repo, page.saturating_sub(1).max(1))
            }
            GridCommand::ApplyPreset(preset) => self.apply_preset(repo, preset),
            GridCommand::ToggleColumn(field) => {
                self.visibility_mut(self.active).toggle(&field);
                Ok(vec![
                    GridEvent::ColumnToggled(field),
                    GridEvent::PresetChanged(ColumnPreset::Custom),
                ])
            }
            GridCommand::BeginEdit(id) => self.begin_edit(repo, id),
            GridCommand::ChangeField(field, value) => {
                if self.editor_mut(self.active).change(&field, value) {
                    Ok(vec![GridEvent::FieldStaged(field)])
                } else {
                    Ok(Vec::new())
                }
            }
            GridCommand::SaveEdit => self.save_edit(repo),
            GridCommand::CancelEdit => match self.editor_mut(self.active).cancel() {
                Some(id) => Ok(vec![GridEvent::EditCancelled(id)]),
                None => Ok(Vec::new()),
            },
            GridCommand::DeleteRecord(id) => self.delete_record(repo, id),
            GridCommand::AddRecord => self.add_record(repo, now),
        }
    }

    fn select_category(
        &mut self,
        repo: &mut dyn RecordRepository,
        category: Category,
    ) -> Result<Vec<GridEvent>> {
        self.active = category;
        self.cursor_mut(category).reset();
        let count = repo.list(category)?.len();
        let total = self.cursor(category).total_pages(count);
        Ok(vec![
            GridEvent::CategoryChanged(category),
            GridEvent::PageChanged { page: 1, total },
        ])
    }

    fn rotate_category(
        &mut self,
        repo: &mut dyn RecordRepository,
        delta: isize,
    ) -> Result<Vec<GridEvent>> {
        let categories = Category::ALL;
        let current = categories
            .iter()
            .position(|category| *category == self.active)
            .unwrap_or(0) as isize;
        let len = categories.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.select_category(repo, categories[next])
    }

    fn set_page(&mut self, repo: &mut dyn RecordRepository, page: usize) -> Result<Vec<GridEvent>> {
        let count = repo.list(self.active)?.len();
        let cursor = self.cursor_mut(self.active);
        cursor.set_page(page, count);
        let page = cursor.page();
        let total = cursor.total_pages(count);
        Ok(vec![GridEvent::PageChanged { page, total }])
    }

    fn apply_preset(
        &mut self,
        repo: &mut dyn RecordRepository,
        preset: ColumnPreset,
    ) -> Result<Vec<GridEvent>> {
        let fields = category_fields(&repo.list(self.active)?);
        let category = self.active;
        self.visibility_mut(category)
            .apply_preset(category, &fields, preset);
        Ok(vec![GridEvent::PresetChanged(preset)])
    }

    fn begin_edit(
        &mut self,
        repo: &mut dyn RecordRepository,
        id: RecordId,
    ) -> Result<Vec<GridEvent>> {
        let Some(record) = repo.get(self.active, &id)? else {
            return Ok(vec![GridEvent::Notice("record not found".to_owned())]);
        };
        let discarded = self.editor_mut(self.active).begin(&record);
        let mut events = Vec::new();
        if let Some(discarded) = discarded {
            events.push(GridEvent::EditDiscarded(discarded));
        }
        events.push(GridEvent::EditStarted(id));
        Ok(events)
    }

    fn save_edit(&mut self, repo: &mut dyn RecordRepository) -> Result<Vec<GridEvent>> {
        let Some((id, buffer)) = self.editor_mut(self.active).take() else {
            return Ok(Vec::new());
        };
        let Some(mut record) = repo.get(self.active, &id)? else {
            // Row vanished while the edit was open; the buffer goes with it.
            return Ok(vec![GridEvent::Notice("record not found".to_owned())]);
        };
        buffer.merge_into(&mut record);
        if !repo.update(record)? {
            return Ok(vec![GridEvent::Notice("record not found".to_owned())]);
        }
        Ok(vec![
            GridEvent::EditSaved(id),
            GridEvent::Notice("item updated".to_owned()),
        ])
    }

    fn delete_record(
        &mut self,
        repo: &mut dyn RecordRepository,
        id: RecordId,
    ) -> Result<Vec<GridEvent>> {
        if !repo.delete(self.active, &id)? {
            return Ok(vec![GridEvent::Notice("record not found".to_owned())]);
        }
        let mut events = Vec::new();
        if self.editor_mut(self.active).clear_if_editing(&id) {
            events.push(GridEvent::EditDiscarded(id.clone()));
        }
        let count = repo.list(self.active)?.len();
        let cursor = self.cursor_mut(self.active);
        cursor.clamp(count);
        events.push(GridEvent::RecordDeleted(id));
        events.push(GridEvent::PageChanged {
            page: cursor.page(),
            total: cursor.total_pages(count),
        });
        events.push(GridEvent::Notice("item removed".to_owned()));
        Ok(events)
    }

    fn add_record(
        &mut self,
        repo: &mut dyn RecordRepository,
        now: OffsetDateTime,
    ) -> Result<Vec<GridEvent>> {
        let id = self.unique_draft_id(repo, now)?;
        let record = Record::draft(self.active, id.clone(), now);
        repo.insert(record.clone())?;

        let count = repo.list(self.active)?.len();
        let cursor = self.cursor_mut(self.active);
        cursor.set_page(cursor.total_pages(count), count);
        let page = cursor.page();
        let total = cursor.total_pages(count);

        let mut events = vec![GridEvent::RecordAdded(id.clone())];
        if let Some(discarded) = self.editor_mut(self.active).begin(&record) {
            events.push(GridEvent::EditDiscarded(discarded));
        }
        events.push(GridEvent::EditStarted(id));
        events.push(GridEvent::PageChanged { page, total });
        events.push(GridEvent::Notice("item added".to_owned()));
        Ok(events)
    }

    /// Millisecond draft ids collide when two adds land in the same tick;
    /// bump forward until the id is free in this category.
    fn unique_draft_id(
        &self,
        repo: &mut dyn RecordRepository,
        now: OffsetDateTime,
    ) -> Result<RecordId> {
        let mut stamp = now;
        loop {
            let id = RecordId::draft(stamp);
            if repo.get(self.active, &id)?.is_none() {
                return Ok(id);
            }
            stamp += time::Duration::milliseconds(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GridCommand, GridEvent, GridState, category_fields};
    use crate::editor::EditorState;
    use crate::ids::RecordId;
    use crate::model::{Category, FieldValue, Record};
    use crate::paging::DEFAULT_PAGE_SIZE;
    use crate::repo::{MemoryRepository, RecordRepository};
    use crate::visibility::ColumnPreset;
    use anyhow::Result;
    use time::OffsetDateTime;

    fn fixture_now() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000).expect("valid timestamp")
    }

    fn grid() -> GridState {
        GridState::new(Category::Clients, DEFAULT_PAGE_SIZE)
    }

    fn repo_with_clients(count: usize) -> MemoryRepository {
        let mut repo = MemoryRepository::new();
        for n in 0..count {
            let id = RecordId::from(format!("c{n}").as_str());
            repo.insert(Record::draft(Category::Clients, id, fixture_now()))
                .expect("insert client");
        }
        repo
    }

    #[test]
    fn untouched_category_accessors_return_defaults() {
        let state = grid();

        assert_eq!(state.cursor(Category::Invoices).page(), 1);
        assert_eq!(
            state.visibility(Category::Invoices).preset(),
            ColumnPreset::All
        );
        assert_eq!(state.editor(Category::Invoices), &EditorState::Viewing);
    }

    #[test]
    fn twelve_clients_paginate_into_three_pages() -> Result<()> {
        let mut repo = repo_with_clients(12);
        let mut state = grid();

        let events = state.dispatch(&mut repo, fixture_now(), GridCommand::SetPage(2))?;
        assert_eq!(events, vec![GridEvent::PageChanged { page: 2, total: 3 }]);
        Ok(())
    }

    #[test]
    fn out_of_range_page_clamps_to_last() -> Result<()> {
        let mut repo = repo_with_clients(12);
        let mut state = grid();

        let events = state.dispatch(&mut repo, fixture_now(), GridCommand::SetPage(5))?;
        assert_eq!(events, vec![GridEvent::PageChanged { page: 3, total: 3 }]);
        Ok(())
    }

    #[test]
    fn switching_category_resets_page_but_keeps_visibility() -> Result<()> {
        let mut repo = repo_with_clients(12);
        let mut state = grid();

        state.dispatch(&mut repo, fixture_now(), GridCommand::SetPage(3))?;
        state.dispatch(
            &mut repo,
            fixture_now(),
            GridCommand::ApplyPreset(ColumnPreset::Essential),
        )?;

        state.dispatch(
            &mut repo,
            fixture_now(),
            GridCommand::SelectCategory(Category::Facilities),
        )?;
        state.dispatch(
            &mut repo,
            fixture_now(),
            GridCommand::SelectCategory(Category::Clients),
        )?;

        assert_eq!(state.cursor(Category::Clients).page(), 1);
        assert_eq!(
            state.visibility(Category::Clients).preset(),
            ColumnPreset::Essential
        );
        Ok(())
    }

    #[test]
    fn category_rotation_wraps_both_ways() -> Result<()> {
        let mut repo = MemoryRepository::new();
        let mut state = grid();

        state.dispatch(&mut repo, fixture_now(), GridCommand::PrevCategory)?;
        assert_eq!(state.active_category(), Category::Invoices);

        state.dispatch(&mut repo, fixture_now(), GridCommand::NextCategory)?;
        assert_eq!(state.active_category(), Category::Clients);
        Ok(())
    }

    #[test]
    fn essential_preset_projects_to_identity_columns() -> Result<()> {
        let mut repo = MemoryRepository::seeded();
        let mut state = grid();

        state.dispatch(
            &mut repo,
            fixture_now(),
            GridCommand::ApplyPreset(ColumnPreset::Essential),
        )?;

        let fields = category_fields(&repo.list(Category::Clients)?);
        let visible = state.visibility(Category::Clients).visible_columns(&fields);
        assert_eq!(visible, vec!["id", "name", "status", "created_at"]);
        Ok(())
    }

    #[test]
    fn edit_status_of_seeded_client_and_save() -> Result<()> {
        let mut repo = MemoryRepository::seeded();
        let mut state = grid();
        let c1 = RecordId::from("c1");

        let events = state.dispatch(&mut repo, fixture_now(), GridCommand::BeginEdit(c1.clone()))?;
        assert_eq!(events, vec![GridEvent::EditStarted(c1.clone())]);

        state.dispatch(
            &mut repo,
            fixture_now(),
            GridCommand::ChangeField("status".to_owned(), FieldValue::Text("tour".to_owned())),
        )?;

        // Nothing is written until save.
        let stored = repo.get(Category::Clients, &c1)?.expect("seeded client");
        assert_eq!(
            stored.field("status"),
            Some(FieldValue::Text("assessment".to_owned()))
        );

        let events = state.dispatch(&mut repo, fixture_now(), GridCommand::SaveEdit)?;
        assert_eq!(
            events,
            vec![
                GridEvent::EditSaved(c1.clone()),
                GridEvent::Notice("item updated".to_owned()),
            ]
        );

        let stored = repo.get(Category::Clients, &c1)?.expect("updated client");
        assert_eq!(stored.field("status"), Some(FieldValue::Text("tour".to_owned())));
        assert!(state.editor(Category::Clients).editing_id().is_none());
        Ok(())
    }

    #[test]
    fn delete_under_edit_discards_the_buffer() -> Result<()> {
        let mut repo = MemoryRepository::seeded();
        let mut state = grid();
        let c1 = RecordId::from("c1");

        state.dispatch(&mut repo, fixture_now(), GridCommand::BeginEdit(c1.clone()))?;
        let events =
            state.dispatch(&mut repo, fixture_now(), GridCommand::DeleteRecord(c1.clone()))?;

        assert!(events.contains(&GridEvent::EditDiscarded(c1.clone())));
        assert!(events.contains(&GridEvent::RecordDeleted(c1.clone())));
        assert!(events.contains(&GridEvent::Notice("item removed".to_owned())));
        assert!(state.editor(Category::Clients).editing_id().is_none());
        assert!(repo.get(Category::Clients, &c1)?.is_none());
        Ok(())
    }

    #[test]
    fn cancel_without_session_emits_nothing() -> Result<()> {
        let mut repo = MemoryRepository::seeded();
        let mut state = grid();

        state.dispatch(&mut repo, fixture_now(), GridCommand::BeginEdit(RecordId::from("c1")))?;
        let first = state.dispatch(&mut repo, fixture_now(), GridCommand::CancelEdit)?;
        let second = state.dispatch(&mut repo, fixture_now(), GridCommand::CancelEdit)?;

        assert_eq!(first, vec![GridEvent::EditCancelled(RecordId::from("c1"))]);
        assert!(second.is_empty());
        Ok(())
    }

    #[test]
    fn save_after_concurrent_delete_drops_the_buffer() -> Result<()> {
        let mut repo = MemoryRepository::seeded();
        let mut state = grid();
        let c1 = RecordId::from("c1");

        state.dispatch(&mut repo, fixture_now(), GridCommand::BeginEdit(c1.clone()))?;
        repo.delete(Category::Clients, &c1)?;

        let events = state.dispatch(&mut repo, fixture_now(), GridCommand::SaveEdit)?;
        assert_eq!(events, vec![GridEvent::Notice("record not found".to_owned())]);
        assert!(state.editor(Category::Clients).editing_id().is_none());
        Ok(())
    }

    #[test]
    fn add_record_lands_on_last_page_and_opens_editor() -> Result<()> {
        let mut repo = repo_with_clients(5);
        let mut state = grid();

        let events = state.dispatch(&mut repo, fixture_now(), GridCommand::AddRecord)?;

        let records = repo.list(Category::Clients)?;
        assert_eq!(records.len(), 6);
        let draft_id = records.last().map(|record| record.id().clone()).expect("draft");
        assert!(draft_id.as_str().starts_with("new-"));

        assert!(events.contains(&GridEvent::RecordAdded(draft_id.clone())));
        assert!(events.contains(&GridEvent::EditStarted(draft_id.clone())));
        assert!(events.contains(&GridEvent::PageChanged { page: 2, total: 2 }));
        assert_eq!(state.editor(Category::Clients).editing_id(), Some(&draft_id));
        Ok(())
    }

    #[test]
    fn same_tick_adds_get_distinct_draft_ids() -> Result<()> {
        let mut repo = MemoryRepository::new();
        let mut state = grid();

        state.dispatch(&mut repo, fixture_now(), GridCommand::AddRecord)?;
        state.dispatch(&mut repo, fixture_now(), GridCommand::AddRecord)?;

        let records = repo.list(Category::Clients)?;
        assert_eq!(records.len(), 2);
        assert_ne!(records[0].id(), records[1].id());
        Ok(())
    }

    #[test]
    fn second_begin_edit_reports_discarded_session() -> Result<()> {
        let mut repo = repo_with_clients(2);
        let mut state = grid();

        state.dispatch(&mut repo, fixture_now(), GridCommand::BeginEdit(RecordId::from("c0")))?;
        let events =
            state.dispatch(&mut repo, fixture_now(), GridCommand::BeginEdit(RecordId::from("c1")))?;

        assert_eq!(
            events,
            vec![
                GridEvent::EditDiscarded(RecordId::from("c0")),
                GridEvent::EditStarted(RecordId::from("c1")),
            ]
        );
        Ok(())
    }

    #[test]
    fn toggle_column_forces_custom_preset() -> Result<()> {
        let mut repo = MemoryRepository::seeded();
        let mut state = grid();

        state.dispatch(
            &mut repo,
            fixture_now(),
            GridCommand::ApplyPreset(ColumnPreset::All),
        )?;
        let events = state.dispatch(
            &mut repo,
            fixture_now(),
            GridCommand::ToggleColumn("email".to_owned()),
        )?;

        assert_eq!(
            events,
            vec![
                GridEvent::ColumnToggled("email".to_owned()),
                GridEvent::PresetChanged(ColumnPreset::Custom),
            ]
        );
        assert!(!state.visibility(Category::Clients).is_visible("email"));
        Ok(())
    }

    #[test]
    fn begin_edit_of_unknown_id_is_a_notice() -> Result<()> {
        let mut repo = MemoryRepository::new();
        let mut state = grid();

        let events = state.dispatch(
            &mut repo,
            fixture_now(),
            GridCommand::BeginEdit(RecordId::from("ghost")),
        )?;
        assert_eq!(events, vec![GridEvent::Notice("record not found".to_owned())]);
        assert!(state.editor(Category::Clients).editing_id().is_none());
        Ok(())
    }
}
