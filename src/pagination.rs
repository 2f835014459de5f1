use crate::column::ColumnRegistry;

pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Slice of `rows` shown on the 1-based `current_page`.
///
/// Pages outside the view, including page 0, yield an empty slice. Clamping the page number
/// is up to the caller.
pub fn visible_page(rows: &[usize], current_page: usize, page_size: usize) -> &[usize] {
    let Some(start) = current_page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(page_size))
    else {
        return &[];
    };
    if start >= rows.len() {
        return &[];
    }
    let end = std::cmp::min(start.saturating_add(page_size), rows.len());
    &rows[start..end]
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    }
}

/// Pagination controls are shown while any column is visible, whatever the record count.
pub fn show_pagination(columns: &ColumnRegistry) -> bool {
    columns.any_visible()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;

    #[test]
    fn third_page_of_twelve_holds_the_remainder() {
        let rows: Vec<usize> = (0..12).collect();
        assert_eq!(visible_page(&rows, 3, 5), &[10, 11]);
    }

    #[test]
    fn page_lengths_are_exact() {
        let rows: Vec<usize> = (0..12).collect();
        for n in 1..=13 {
            for p in 1..=15 {
                let expected = std::cmp::min(n, rows.len().saturating_sub((p - 1) * n));
                assert_eq!(visible_page(&rows, p, n).len(), expected, "page {p} size {n}");
            }
        }
    }

    #[test]
    fn consecutive_pages_partition_the_view() {
        let rows: Vec<usize> = (100..117).collect();
        for n in 1..=6 {
            let joined: Vec<usize> = (1..=page_count(rows.len(), n))
                .flat_map(|p| visible_page(&rows, p, n).iter().copied())
                .collect();
            assert_eq!(joined, rows);
        }
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let rows: Vec<usize> = (0..4).collect();
        assert!(visible_page(&rows, 0, 5).is_empty());
        assert!(visible_page(&rows, 2, 5).is_empty());
        assert!(visible_page(&rows, usize::MAX, 5).is_empty());
        assert!(visible_page(&rows, 1, 0).is_empty());
        assert!(visible_page(&[], 1, 5).is_empty());
    }

    #[test]
    fn counts_pages() {
        assert_eq!(page_count(0, 5), 0);
        assert_eq!(page_count(5, 5), 1);
        assert_eq!(page_count(12, 5), 3);
        assert_eq!(page_count(12, 0), 0);
    }

    #[test]
    fn pagination_follows_column_visibility_not_rows() {
        let mut columns = ColumnRegistry::new(vec![Column::new("A", "a"), Column::new("B", "b")]);
        assert!(show_pagination(&columns));
        columns.set_visible("a", false);
        assert!(show_pagination(&columns));
        columns.set_visible("b", false);
        assert!(!show_pagination(&columns));
        assert!(!show_pagination(&ColumnRegistry::new(Vec::new())));
    }
}
