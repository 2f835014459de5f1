use feruca::{Collator, Tailoring};
use tracing::trace;

use crate::column::FieldPath;
use crate::record::RecordStore;

/// Sorts the view `rows` ascending by the string value at `path`.
///
/// Values are compared with the Unicode Collation Algorithm, so accented letters and case
/// sort the way a reader expects rather than by code point. Numbers are not special: a
/// balance of `$1,200` sorts before `$300`. The sort is stable, rows with equal values keep
/// their relative order.
pub fn sort(rows: &mut [usize], store: &RecordStore, path: &FieldPath) {
    // Resolve every value once instead of on each comparison.
    let mut indexed_rows: Vec<(usize, String)> = rows
        .iter()
        .map(|&row_idx| (row_idx, store.resolve(row_idx, path)))
        .collect();

    // Spaces and punctuation carry primary weight, "12 3rd Ave" sorts before "123 Main St".
    let mut collator = Collator::new(Tailoring::default(), false, true);
    indexed_rows.sort_by(|(_, a), (_, b)| collator.collate(a.as_str(), b.as_str()));

    for (slot, (row_idx, _)) in rows.iter_mut().zip(indexed_rows) {
        *slot = row_idx;
    }
    trace!("Sorted {} rows by \"{}\"", rows.len(), path.key());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store(values: &[&str]) -> RecordStore {
        RecordStore::from_values(values.iter().map(|v| json!({ "company": v })).collect())
            .unwrap()
    }

    fn sorted_values(store: &RecordStore, rows: &[usize], key: &str) -> Vec<String> {
        let path = FieldPath::parse(key);
        rows.iter().map(|&r| store.resolve(r, &path)).collect()
    }

    #[test]
    fn balances_sort_as_strings() {
        let store = RecordStore::from_values(vec![
            json!({"name": {"first": "Amy"}, "balance": "$1,200"}),
            json!({"name": {"first": "Bob"}, "balance": "$300"}),
        ])
        .unwrap();
        let mut rows = vec![1, 0];
        sort(&mut rows, &store, &FieldPath::parse("balance"));
        assert_eq!(rows, vec![0, 1]);
        assert_eq!(
            sorted_values(&store, &rows, "balance"),
            vec!["$1,200", "$300"]
        );
    }

    #[test]
    fn numbers_are_not_compared_numerically() {
        let store = RecordStore::from_values(vec![
            json!({"age": 9}),
            json!({"age": 10}),
            json!({"age": 100}),
        ])
        .unwrap();
        let mut rows = vec![0, 1, 2];
        sort(&mut rows, &store, &FieldPath::parse("age"));
        assert_eq!(sorted_values(&store, &rows, "age"), vec!["10", "100", "9"]);
    }

    #[test]
    fn uses_collation_order() {
        let store = store(&["Zebra", "éclair", "apple"]);
        let mut rows = vec![0, 1, 2];
        sort(&mut rows, &store, &FieldPath::parse("company"));
        assert_eq!(
            sorted_values(&store, &rows, "company"),
            vec!["apple", "éclair", "Zebra"]
        );
    }

    #[test]
    fn spaces_and_punctuation_are_not_ignored() {
        let store = store(&["123 Main St", "12 3rd Ave", "a-c", "ab"]);
        let mut rows = vec![0, 1];
        sort(&mut rows, &store, &FieldPath::parse("company"));
        assert_eq!(
            sorted_values(&store, &rows, "company"),
            vec!["12 3rd Ave", "123 Main St"]
        );

        let mut rows = vec![3, 2];
        sort(&mut rows, &store, &FieldPath::parse("company"));
        assert_eq!(sorted_values(&store, &rows, "company"), vec!["a-c", "ab"]);
    }

    #[test]
    fn equal_values_keep_relative_order() {
        let store = store(&["b", "a", "b", "a", "b"]);
        let mut rows = vec![4, 3, 2, 1, 0];
        sort(&mut rows, &store, &FieldPath::parse("company"));
        assert_eq!(rows, vec![3, 1, 4, 2, 0]);
    }

    #[test]
    fn missing_values_sort_first() {
        let store = RecordStore::from_values(vec![
            json!({"name": {"first": "Cy"}}),
            json!({}),
            json!({"name": {"first": "Al"}}),
        ])
        .unwrap();
        let mut rows = vec![0, 1, 2];
        sort(&mut rows, &store, &FieldPath::parse("name.first"));
        assert_eq!(rows, vec![1, 2, 0]);
    }

    #[test]
    fn sorting_twice_is_stable() {
        let store = store(&["c", "a", "b"]);
        let mut rows = vec![0, 1, 2];
        let path = FieldPath::parse("company");
        sort(&mut rows, &store, &path);
        let first = rows.clone();
        sort(&mut rows, &store, &path);
        assert_eq!(rows, first);
        assert_eq!(rows, vec![1, 2, 0]);
    }

    #[test]
    fn sorts_only_the_given_view() {
        let store = store(&["c", "a", "b", "d"]);
        let mut rows = vec![3, 0, 2];
        sort(&mut rows, &store, &FieldPath::parse("company"));
        assert_eq!(rows, vec![2, 0, 3]);
    }
}
