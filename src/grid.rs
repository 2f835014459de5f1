use std::time::Instant;

use tracing::{debug, trace};

use crate::column::{ColumnRegistry, FieldPath};
use crate::debounce::Debouncer;
use crate::domain::GridConfig;
use crate::filter::filter;
use crate::pagination::{page_count, show_pagination, visible_page};
use crate::record::{Record, RecordStore};
use crate::sort::sort;

/// Session state changed only by the grid's event handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct GridState {
    pub search_text: String,
    pub sort_key: Option<FieldPath>,
    pub current_page: usize,
    pub page_size: usize,
}

impl GridState {
    pub fn new(page_size: usize) -> Self {
        GridState {
            search_text: String::new(),
            sort_key: None,
            current_page: 1,
            page_size,
        }
    }
}

/// A record store seen through a search, an optional sort key and a page.
///
/// `rows` holds indices into the store and is rebuilt from scratch whenever the search text
/// or column visibility changes.
#[derive(Debug)]
pub struct Grid {
    store: RecordStore,
    columns: ColumnRegistry,
    state: GridState,
    rows: Vec<usize>,
    search: Debouncer<String>,
}

impl Grid {
    pub fn new(store: RecordStore, columns: ColumnRegistry, config: &GridConfig) -> Self {
        let mut grid = Grid {
            store,
            columns,
            state: GridState::new(config.page_size),
            rows: Vec::new(),
            search: Debouncer::new(config.search_debounce),
        };
        grid.recompute();
        grid
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn columns(&self) -> &ColumnRegistry {
        &self.columns
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    /// The filtered, possibly sorted, view as store indices.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn filtered_len(&self) -> usize {
        self.rows.len()
    }

    pub fn page_count(&self) -> usize {
        page_count(self.rows.len(), self.state.page_size)
    }

    pub fn search_pending(&self) -> bool {
        self.search.is_pending()
    }

    pub fn on_search_input(&mut self, text: &str, now: Instant) {
        trace!("Search input \"{text}\"");
        self.search.push(text.to_string(), now);
    }

    /// Applies a debounced search once it is due. Returns true if the view was rebuilt.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.search.poll(now) {
            Some(text) => {
                self.update_search(&text);
                true
            }
            None => false,
        }
    }

    /// Sets the search text immediately, bypassing the debouncer.
    pub fn update_search(&mut self, text: &str) {
        debug!("Search text \"{text}\"");
        self.state.search_text = text.to_string();
        self.recompute();
    }

    pub fn on_sort_request(&mut self, key: &str) {
        let path = FieldPath::parse(key);
        sort(&mut self.rows, &self.store, &path);
        self.state.sort_key = Some(path);
    }

    /// Returns false if no column has the given key, in which case nothing changes.
    pub fn on_toggle_column(&mut self, key: &str, visible: bool) -> bool {
        if !self.columns.set_visible(key, visible) {
            return false;
        }
        self.recompute();
        true
    }

    /// Flips the column at `idx` and returns its new visibility.
    pub fn toggle_column_at(&mut self, idx: usize) -> Option<bool> {
        let visible = self.columns.toggle(idx)?;
        self.recompute();
        Some(visible)
    }

    pub fn on_page_change(&mut self, page: usize) {
        trace!("Page {} -> {}", self.state.current_page, page);
        self.state.current_page = page;
    }

    pub fn recompute(&mut self) {
        self.rows = filter(&self.store, &self.columns, &self.state.search_text);
        if let Some(path) = &self.state.sort_key {
            sort(&mut self.rows, &self.store, path);
        }
    }

    pub fn page_rows(&self) -> &[usize] {
        visible_page(&self.rows, self.state.current_page, self.state.page_size)
    }

    pub fn page_records(&self) -> Vec<&Record> {
        self.store.records(self.page_rows()).collect()
    }

    pub fn show_pagination(&self) -> bool {
        show_pagination(&self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn grid(n: usize) -> Grid {
        let values = (0..n)
            .map(|i| json!({"name": {"first": format!("user{i:02}")}, "company": if i % 2 == 0 { "Even" } else { "Odd" }}))
            .collect();
        let store = RecordStore::from_values(values).unwrap();
        Grid::new(store, ColumnRegistry::default(), &GridConfig::default())
    }

    fn first_names(grid: &Grid) -> Vec<String> {
        grid.page_records()
            .iter()
            .map(|r| r.data().name.first.clone())
            .collect()
    }

    #[test]
    fn starts_with_the_full_set_on_page_one() {
        let grid = grid(12);
        assert_eq!(grid.filtered_len(), 12);
        assert_eq!(grid.state().current_page, 1);
        assert_eq!(grid.page_rows(), &[0, 1, 2, 3, 4]);
        assert_eq!(grid.page_count(), 3);
    }

    #[test]
    fn debounced_search_applies_after_quiet_period() {
        let mut grid = grid(12);
        let t0 = Instant::now();
        grid.on_search_input("odd", t0);
        assert!(!grid.tick(t0 + Duration::from_millis(100)));
        assert_eq!(grid.filtered_len(), 12);
        assert!(grid.tick(t0 + Duration::from_millis(500)));
        assert_eq!(grid.state().search_text, "odd");
        assert_eq!(grid.filtered_len(), 6);
    }

    #[test]
    fn sort_key_survives_a_new_search() {
        let mut grid = grid(6);
        grid.on_sort_request("company");
        assert_eq!(grid.rows(), &[0, 2, 4, 1, 3, 5]);
        grid.update_search("user0");
        assert_eq!(grid.rows(), &[0, 2, 4, 1, 3, 5]);
        grid.update_search("user01");
        assert_eq!(grid.rows(), &[1]);
    }

    #[test]
    fn toggling_a_column_refilters() {
        let mut grid = grid(4);
        grid.update_search("even");
        assert_eq!(grid.filtered_len(), 2);
        assert!(grid.on_toggle_column("company", false));
        assert_eq!(grid.filtered_len(), 0);
        assert!(grid.show_pagination());
        assert_eq!(grid.toggle_column_at(4), Some(true));
        assert_eq!(grid.filtered_len(), 2);
        assert!(!grid.on_toggle_column("nope", false));
    }

    #[test]
    fn page_change_is_not_clamped() {
        let mut grid = grid(12);
        grid.on_page_change(3);
        assert_eq!(first_names(&grid), vec!["user10", "user11"]);
        grid.on_page_change(4);
        assert!(grid.page_records().is_empty());
        assert_eq!(grid.state().current_page, 4);
    }

    #[test]
    fn hiding_every_column_empties_searches_and_hides_pagination() {
        let mut grid = grid(3);
        let keys: Vec<String> = grid.columns().iter().map(|c| c.key().to_string()).collect();
        for key in &keys {
            grid.on_toggle_column(key, false);
        }
        grid.update_search("user");
        assert_eq!(grid.filtered_len(), 0);
        assert!(!grid.show_pagination());
    }
}
