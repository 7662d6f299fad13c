#![forbid(unsafe_code)]

//! Sortable, searchable, paginated table interaction state machine.
//!
//! [`SortableTable`] owns no rendering: it holds the interaction state
//! `(query, sort, page)` over a generic row type and exposes the derived
//! chain `filter -> sort -> paginate` plus a CSV export of the full
//! sorted view. State changes a sighted user perceives visually are
//! narrated through the [`LiveAnnouncer`].
//!
//! # Invariants
//!
//! 1. `page` is always in `[1, page_count]`; `page_count` is at least 1
//!    even when the filtered set is empty.
//! 2. The sort direction is set exactly when a sort column is set.
//! 3. Sorting is stable: rows comparing equal under the sort key keep
//!    their relative order from the filtered view, and clearing the sort
//!    returns to insertion order.
//!
//! # Failure modes
//!
//! - `toggle_sort` on an unknown column: silent no-op, no announcement.
//! - `set_page` out of range: clamps, never errors.

use std::cmp::Ordering;
use std::time::Instant;

use axess_core::event::KeyEvent;
use axess_core::intent::{NavIntent, dispatch};
use tracing::debug;

use crate::announcer::{LiveAnnouncer, Politeness};
use crate::roving::{RovingSelection, WrapPolicy};

/// A typed cell value, so numeric columns sort numerically and text
/// columns lexicographically.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Text cell.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Numeric cell.
    #[must_use]
    pub fn number(value: f64) -> Self {
        Self::Number(value)
    }

    /// The cell as it renders in the table and in CSV export.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => format!("{n}"),
        }
    }

    /// Comparison used by the sorter. Mixed-type comparisons fall back
    /// to the rendered text; NaN compares equal (stable sort keeps the
    /// filtered order for such rows).
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.render().cmp(&other.render()),
        }
    }
}

/// A table column: stable key, human title, and the accessor projecting
/// a row to this column's cell.
#[derive(Debug, Clone)]
pub struct Column<R> {
    key: String,
    title: String,
    get: fn(&R) -> CellValue,
}

impl<R> Column<R> {
    /// Define a column.
    #[must_use]
    pub fn new(key: impl Into<String>, title: impl Into<String>, get: fn(&R) -> CellValue) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            get,
        }
    }

    /// The stable key used by `toggle_sort`.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The human-readable title (CSV header, announcements).
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Sort direction; present exactly when a sort column is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// The table interaction state machine.
#[derive(Debug)]
pub struct SortableTable<R> {
    columns: Vec<Column<R>>,
    rows: Vec<R>,
    query: String,
    sort: Option<(usize, SortDirection)>,
    page: usize,
    page_size: usize,
    /// Row indices surviving the query filter, in insertion order.
    filtered: Vec<usize>,
    /// `filtered` after the (stable) sort; equal to it when unsorted.
    sorted: Vec<usize>,
    headers: RovingSelection,
}

impl<R> SortableTable<R> {
    /// Create a table over `rows`. `page_size` is clamped to at least 1.
    #[must_use]
    pub fn new(columns: Vec<Column<R>>, rows: Vec<R>, page_size: usize) -> Self {
        let header_count = columns.len();
        let mut table = Self {
            columns,
            rows,
            query: String::new(),
            sort: None,
            page: 1,
            page_size: page_size.max(1),
            filtered: Vec::new(),
            sorted: Vec::new(),
            headers: RovingSelection::new(header_count, WrapPolicy::Clamp),
        };
        table.refilter();
        table
    }

    /// Current search query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Key of the active sort column, if any.
    #[must_use]
    pub fn sort_key(&self) -> Option<&str> {
        self.sort.map(|(col, _)| self.columns[col].key())
    }

    /// Active sort direction, if any.
    #[must_use]
    pub fn sort_direction(&self) -> Option<SortDirection> {
        self.sort.map(|(_, dir)| dir)
    }

    /// Current page (1-based).
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Rows per page.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of rows surviving the filter.
    #[must_use]
    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    /// Number of pages; at least 1 even for an empty filtered set.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.sorted.len().div_ceil(self.page_size).max(1)
    }

    /// The rows on the current page, in display order.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<&R> {
        let start = (self.page - 1) * self.page_size;
        self.sorted
            .iter()
            .skip(start)
            .take(self.page_size)
            .map(|&i| &self.rows[i])
            .collect()
    }

    /// Every filtered row in sorted order (the export view).
    #[must_use]
    pub fn sorted_rows(&self) -> Vec<&R> {
        self.sorted.iter().map(|&i| &self.rows[i]).collect()
    }

    /// Set the query, recompute the filtered view, and reset to page 1.
    /// Announces the result count politely.
    pub fn apply_query(&mut self, text: &str, announcer: &mut LiveAnnouncer, now: Instant) {
        self.query = text.to_owned();
        self.refilter();
        self.page = 1;
        let count = self.filtered.len();
        debug!(query = %self.query, count, "table query applied");
        announcer.announce(
            &format!("Showing {count} results"),
            Politeness::Polite,
            now,
        );
    }

    /// Three-state sort cycle on the column with the given key:
    /// ascending, then descending, then back to insertion order.
    /// Unknown keys are a silent no-op.
    pub fn toggle_sort(&mut self, key: &str, announcer: &mut LiveAnnouncer, now: Instant) {
        let Some(col) = self.columns.iter().position(|c| c.key() == key) else {
            return;
        };
        self.sort = match self.sort {
            Some((active, SortDirection::Ascending)) if active == col => {
                Some((col, SortDirection::Descending))
            }
            Some((active, SortDirection::Descending)) if active == col => None,
            _ => Some((col, SortDirection::Ascending)),
        };
        self.resort();
        self.clamp_page();

        let message = match self.sort {
            Some((col, SortDirection::Ascending)) => {
                format!("Sorted by {} ascending", self.columns[col].title())
            }
            Some((col, SortDirection::Descending)) => {
                format!("Sorted by {} descending", self.columns[col].title())
            }
            None => "Sorting removed".to_owned(),
        };
        debug!(sort = ?self.sort, "table sort toggled");
        announcer.announce(&message, Politeness::Polite, now);
    }

    /// Move to page `n`, clamped into `[1, page_count]`. Returns `true`
    /// if the page changed; an unchanged page announces nothing.
    pub fn set_page(&mut self, n: usize, announcer: &mut LiveAnnouncer, now: Instant) -> bool {
        let clamped = n.clamp(1, self.page_count());
        if clamped == self.page {
            return false;
        }
        self.page = clamped;
        debug!(page = self.page, "table page changed");
        announcer.announce(
            &format!("Page {} of {}", self.page, self.page_count()),
            Politeness::Polite,
            now,
        );
        true
    }

    /// Serialize the header row plus every filtered, sorted row (all
    /// pages) as CSV. Every field is quoted; embedded quotes double.
    #[must_use]
    pub fn export_csv(&self) -> String {
        fn quote(field: &str) -> String {
            format!("\"{}\"", field.replace('"', "\"\""))
        }

        let mut out = String::new();
        let header: Vec<String> = self.columns.iter().map(|c| quote(c.title())).collect();
        out.push_str(&header.join(","));
        out.push('\n');
        for &row in &self.sorted {
            let fields: Vec<String> = self
                .columns
                .iter()
                .map(|c| quote(&(c.get)(&self.rows[row]).render()))
                .collect();
            out.push_str(&fields.join(","));
            out.push('\n');
        }
        out
    }

    /// The header cell currently active for keyboard navigation.
    #[must_use]
    pub fn active_header(&self) -> Option<usize> {
        self.headers.active()
    }

    /// Route a key press through header navigation: arrows and Home/End
    /// move the active header (clamped, no wrap), Enter/Space toggles
    /// the sort on it. Returns `true` when the key was consumed.
    pub fn handle_header_key(
        &mut self,
        key: &KeyEvent,
        announcer: &mut LiveAnnouncer,
        now: Instant,
    ) -> bool {
        let Some(intent) = dispatch(key) else {
            return false;
        };
        match intent {
            NavIntent::Next | NavIntent::Prev | NavIntent::First | NavIntent::Last => {
                self.headers.apply(intent);
                true
            }
            NavIntent::Activate => {
                if let Some(col) = self.headers.active() {
                    let key = self.columns[col].key().to_owned();
                    self.toggle_sort(&key, announcer, now);
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    fn matches(&self, row: &R, needle: &str) -> bool {
        self.columns
            .iter()
            .any(|c| (c.get)(row).render().to_lowercase().contains(needle))
    }

    fn refilter(&mut self) {
        let needle = self.query.trim().to_lowercase();
        let filtered: Vec<usize> = (0..self.rows.len())
            .filter(|&i| needle.is_empty() || self.matches(&self.rows[i], &needle))
            .collect();
        self.filtered = filtered;
        self.resort();
        self.clamp_page();
    }

    fn resort(&mut self) {
        self.sorted = self.filtered.clone();
        let Some((col, direction)) = self.sort else {
            return;
        };
        let get = self.columns[col].get;
        let rows = &self.rows;
        // Stable sort; the reversed comparator for descending still
        // leaves equal rows in filtered order.
        self.sorted.sort_by(|&a, &b| {
            let ord = get(&rows[a]).compare(&get(&rows[b]));
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }

    fn clamp_page(&mut self) {
        self.page = self.page.clamp(1, self.page_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i64,
        name: &'static str,
        score: f64,
    }

    fn columns() -> Vec<Column<Row>> {
        vec![
            Column::new("id", "ID", |r: &Row| CellValue::number(r.id as f64)),
            Column::new("name", "Name", |r: &Row| CellValue::text(r.name)),
            Column::new("score", "Score", |r: &Row| CellValue::number(r.score)),
        ]
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: 1, name: "Ada", score: 70.0 },
            Row { id: 2, name: "Grace", score: 90.0 },
            Row { id: 3, name: "Alan", score: 70.0 },
        ]
    }

    fn table() -> SortableTable<Row> {
        SortableTable::new(columns(), rows(), 10)
    }

    fn ids(rows: &[&Row]) -> Vec<i64> {
        rows.iter().map(|r| r.id).collect()
    }

    fn now() -> Instant {
        Instant::now()
    }

    #[test]
    fn three_state_sort_cycle_round_trips() {
        let mut t = table();
        let mut a = LiveAnnouncer::new();

        // Ascending: ties (70, 70) keep insertion order.
        t.toggle_sort("score", &mut a, now());
        assert_eq!(ids(&t.sorted_rows()), vec![1, 3, 2]);
        assert_eq!(t.sort_direction(), Some(SortDirection::Ascending));

        // Descending: ties still in filtered order.
        t.toggle_sort("score", &mut a, now());
        assert_eq!(ids(&t.sorted_rows()), vec![2, 1, 3]);

        // Third toggle clears: insertion order restored.
        t.toggle_sort("score", &mut a, now());
        assert_eq!(ids(&t.sorted_rows()), vec![1, 2, 3]);
        assert_eq!(t.sort_key(), None);
        assert_eq!(t.sort_direction(), None);
    }

    #[test]
    fn sort_announcements() {
        let mut t = table();
        let mut a = LiveAnnouncer::new();

        t.toggle_sort("score", &mut a, now());
        assert_eq!(
            a.region_text(Politeness::Polite),
            Some("Sorted by Score ascending")
        );
        t.toggle_sort("score", &mut a, now());
        assert_eq!(
            a.region_text(Politeness::Polite),
            Some("Sorted by Score descending")
        );
        t.toggle_sort("score", &mut a, now());
        assert_eq!(a.region_text(Politeness::Polite), Some("Sorting removed"));
    }

    #[test]
    fn switching_columns_restarts_ascending() {
        let mut t = table();
        let mut a = LiveAnnouncer::new();

        t.toggle_sort("score", &mut a, now());
        t.toggle_sort("score", &mut a, now()); // score descending
        t.toggle_sort("name", &mut a, now());
        assert_eq!(t.sort_key(), Some("name"));
        assert_eq!(t.sort_direction(), Some(SortDirection::Ascending));
        assert_eq!(ids(&t.sorted_rows()), vec![1, 3, 2]); // Ada, Alan, Grace
    }

    #[test]
    fn unknown_column_is_silent_noop() {
        let mut t = table();
        let mut a = LiveAnnouncer::new();

        t.toggle_sort("nonsense", &mut a, now());
        assert_eq!(t.sort_key(), None);
        assert_eq!(ids(&t.sorted_rows()), vec![1, 2, 3]);
        // Not announced: the region was never even created.
        assert_eq!(a.region_text(Politeness::Polite), None);
    }

    #[test]
    fn text_sort_is_lexicographic_and_stable() {
        let mut t = SortableTable::new(
            columns(),
            vec![
                Row { id: 1, name: "Bea", score: 1.0 },
                Row { id: 2, name: "Bea", score: 2.0 },
                Row { id: 3, name: "Abe", score: 3.0 },
            ],
            10,
        );
        let mut a = LiveAnnouncer::new();
        t.toggle_sort("name", &mut a, now());
        assert_eq!(ids(&t.sorted_rows()), vec![3, 1, 2]);
    }

    #[test]
    fn query_filters_case_insensitively_and_resets_page() {
        let mut t = SortableTable::new(columns(), rows(), 1);
        let mut a = LiveAnnouncer::new();
        t.set_page(3, &mut a, now());
        assert_eq!(t.page(), 3);

        t.apply_query("aDa", &mut a, now());
        assert_eq!(t.filtered_count(), 1);
        assert_eq!(t.page(), 1);
        assert_eq!(
            a.region_text(Politeness::Polite),
            Some("Showing 1 results")
        );
    }

    #[test]
    fn query_matches_any_column() {
        let mut t = table();
        let mut a = LiveAnnouncer::new();
        // "70" appears only in the score column.
        t.apply_query("70", &mut a, now());
        assert_eq!(ids(&t.sorted_rows()), vec![1, 3]);
    }

    #[test]
    fn active_sort_survives_requery() {
        let mut t = table();
        let mut a = LiveAnnouncer::new();
        t.toggle_sort("score", &mut a, now());
        t.toggle_sort("score", &mut a, now()); // descending
        t.apply_query("a", &mut a, now()); // Ada, Grace, Alan all match
        assert_eq!(ids(&t.sorted_rows()), vec![2, 1, 3]);
    }

    #[test]
    fn pagination_clamps_and_skips_noop_announcements() {
        let mut t = SortableTable::new(columns(), rows(), 2);
        let mut a = LiveAnnouncer::new();
        assert_eq!(t.page_count(), 2);

        // Out of range clamps to the last page.
        assert!(t.set_page(99, &mut a, now()));
        assert_eq!(t.page(), 2);
        assert_eq!(a.region_text(Politeness::Polite), Some("Page 2 of 2"));

        // Same page after clamping: no change, no announcement.
        a.clear(Politeness::Polite);
        assert!(!t.set_page(5, &mut a, now()));
        assert_eq!(a.region_text(Politeness::Polite), Some(""));

        // Below range clamps to 1.
        assert!(t.set_page(0, &mut a, now()));
        assert_eq!(t.page(), 1);
    }

    #[test]
    fn visible_rows_follow_page() {
        let mut t = SortableTable::new(columns(), rows(), 2);
        let mut a = LiveAnnouncer::new();
        assert_eq!(ids(&t.visible_rows()), vec![1, 2]);
        t.set_page(2, &mut a, now());
        assert_eq!(ids(&t.visible_rows()), vec![3]);
    }

    #[test]
    fn shrinking_filter_reclamps_page() {
        let mut t = SortableTable::new(columns(), rows(), 1);
        let mut a = LiveAnnouncer::new();
        t.set_page(3, &mut a, now());
        t.apply_query("grace", &mut a, now());
        assert_eq!(t.page(), 1);
        assert_eq!(t.page_count(), 1);
    }

    #[test]
    fn empty_filtered_set_keeps_page_invariant() {
        let mut t = table();
        let mut a = LiveAnnouncer::new();
        t.apply_query("zzz", &mut a, now());
        assert_eq!(t.filtered_count(), 0);
        assert_eq!(t.page_count(), 1);
        assert_eq!(t.page(), 1);
        assert!(t.visible_rows().is_empty());
        assert_eq!(
            a.region_text(Politeness::Polite),
            Some("Showing 0 results")
        );
    }

    #[test]
    fn export_includes_all_sorted_rows_not_just_the_page() {
        let mut t = SortableTable::new(columns(), rows(), 1);
        let mut a = LiveAnnouncer::new();
        t.toggle_sort("score", &mut a, now());

        let csv = t.export_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4); // header + 3 rows despite page size 1
        assert_eq!(lines[0], "\"ID\",\"Name\",\"Score\"");
        assert_eq!(lines[1], "\"1\",\"Ada\",\"70\"");
        assert_eq!(lines[2], "\"3\",\"Alan\",\"70\"");
        assert_eq!(lines[3], "\"2\",\"Grace\",\"90\"");
    }

    #[test]
    fn export_doubles_embedded_quotes() {
        let t = SortableTable::new(
            vec![Column::new("name", "Name", |r: &Row| {
                CellValue::text(format!("{} \"the\" {}", r.name, r.id))
            })],
            vec![Row { id: 1, name: "Ada", score: 0.0 }],
            10,
        );
        assert_eq!(t.export_csv(), "\"Name\"\n\"Ada \"\"the\"\" 1\"\n");
    }

    #[test]
    fn export_respects_filter() {
        let mut t = table();
        let mut a = LiveAnnouncer::new();
        t.apply_query("grace", &mut a, now());
        let csv = t.export_csv();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("Grace"));
        assert!(!csv.contains("Ada"));
    }

    #[test]
    fn header_navigation_clamps_at_the_ends() {
        use axess_core::event::{KeyCode, KeyEvent};
        let mut t = table();
        let mut a = LiveAnnouncer::new();

        t.handle_header_key(&KeyEvent::press(KeyCode::Down), &mut a, now());
        assert_eq!(t.active_header(), Some(0));
        // Up at the first header stays put (no wrap).
        t.handle_header_key(&KeyEvent::press(KeyCode::Up), &mut a, now());
        assert_eq!(t.active_header(), Some(0));

        t.handle_header_key(&KeyEvent::press(KeyCode::End), &mut a, now());
        assert_eq!(t.active_header(), Some(2));
        t.handle_header_key(&KeyEvent::press(KeyCode::Down), &mut a, now());
        assert_eq!(t.active_header(), Some(2));
    }

    #[test]
    fn header_activation_toggles_sort() {
        use axess_core::event::{KeyCode, KeyEvent};
        let mut t = table();
        let mut a = LiveAnnouncer::new();

        t.handle_header_key(&KeyEvent::press(KeyCode::End), &mut a, now());
        assert!(t.handle_header_key(&KeyEvent::press(KeyCode::Enter), &mut a, now()));
        assert_eq!(t.sort_key(), Some("score"));
        assert_eq!(t.sort_direction(), Some(SortDirection::Ascending));
    }

    #[test]
    fn header_activation_without_active_header_is_noop() {
        use axess_core::event::{KeyCode, KeyEvent};
        let mut t = table();
        let mut a = LiveAnnouncer::new();
        assert!(!t.handle_header_key(&KeyEvent::press(KeyCode::Enter), &mut a, now()));
        assert_eq!(t.sort_key(), None);
    }

    #[test]
    fn page_size_zero_is_clamped_to_one() {
        let t = SortableTable::new(columns(), rows(), 0);
        assert_eq!(t.page_size(), 1);
        assert_eq!(t.page_count(), 3);
    }
}
