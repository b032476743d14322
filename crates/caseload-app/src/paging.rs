// Copyright 2026 Caseload Contributors
// Licensed under the Apache License, Version 2.0

use std::ops::Range;

pub const DEFAULT_PAGE_SIZE: usize = 5;

/// 1-based page cursor over a fixed page size. The cursor itself does not
/// watch the collection; callers re-clamp after adds and deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page: usize,
    page_size: usize,
}

impl PageCursor {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub const fn page(&self) -> usize {
        self.page
    }

    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, record_count: usize) -> usize {
        record_count.div_ceil(self.page_size).max(1)
    }

    /// Moves to page `n`, clamped into `[1, total_pages]`.
    pub fn set_page(&mut self, n: usize, record_count: usize) {
        self.page = n.clamp(1, self.total_pages(record_count));
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Pulls the cursor back in range after the collection shrank.
    pub fn clamp(&mut self, record_count: usize) {
        let total = self.total_pages(record_count);
        if self.page > total {
            self.page = total;
        }
    }

    /// Index range of the current page within an ordered collection.
    pub fn slice_bounds(&self, record_count: usize) -> Range<usize> {
        let start = (self.page - 1).saturating_mul(self.page_size).min(record_count);
        let end = start.saturating_add(self.page_size).min(record_count);
        start..end
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

pub fn current_slice<'a, T>(cursor: &PageCursor, records: &'a [T]) -> &'a [T] {
    &records[cursor.slice_bounds(records.len())]
}

#[cfg(test)]
mod tests {
    use super::{PageCursor, current_slice};

    #[test]
    fn twelve_records_at_page_size_five_make_three_pages() {
        let cursor = PageCursor::new(5);
        assert_eq!(cursor.total_pages(12), 3);
    }

    #[test]
    fn set_page_clamps_to_last_page() {
        let mut cursor = PageCursor::new(5);
        cursor.set_page(5, 12);
        assert_eq!(cursor.page(), 3);

        cursor.set_page(0, 12);
        assert_eq!(cursor.page(), 1);
    }

    #[test]
    fn last_page_slice_holds_the_remainder() {
        let records: Vec<i32> = (0..12).collect();
        let mut cursor = PageCursor::new(5);
        cursor.set_page(3, records.len());

        let slice = current_slice(&cursor, &records);
        assert_eq!(slice, &[10, 11]);
    }

    #[test]
    fn empty_collection_still_has_one_page() {
        let cursor = PageCursor::new(5);
        assert_eq!(cursor.total_pages(0), 1);
        assert_eq!(cursor.slice_bounds(0), 0..0);
    }

    #[test]
    fn clamp_moves_cursor_down_after_removals() {
        let mut cursor = PageCursor::new(5);
        cursor.set_page(3, 12);

        cursor.clamp(5);
        assert_eq!(cursor.page(), 1);
    }

    #[test]
    fn clamp_keeps_in_range_cursor_where_it_is() {
        let mut cursor = PageCursor::new(5);
        cursor.set_page(2, 12);

        cursor.clamp(12);
        assert_eq!(cursor.page(), 2);
    }
}
