use std::time::Instant;

use tracing::trace;

use crate::column::ColumnRegistry;
use crate::record::{Record, RecordStore};

/// Returns the indices of all records with a visible column containing `search_text`,
/// ignoring case. An empty search keeps every record.
pub fn filter(store: &RecordStore, columns: &ColumnRegistry, search_text: &str) -> Vec<usize> {
    if search_text.is_empty() {
        return (0..store.len()).collect();
    }

    let start_time = Instant::now();
    let term = search_text.to_lowercase();
    let rows: Vec<usize> = store
        .iter()
        .enumerate()
        .filter(|(_, record)| matches(record, columns, &term))
        .map(|(idx, _)| idx)
        .collect();

    trace!(
        "Filter \"{}\" matched {}/{} records in {}ms",
        search_text,
        rows.len(),
        store.len(),
        start_time.elapsed().as_millis()
    );
    rows
}

// `term` must already be lower case.
fn matches(record: &Record, columns: &ColumnRegistry, term: &str) -> bool {
    columns
        .visible()
        .any(|column| record.resolve(&column.path).to_lowercase().contains(term))
}
