/// Sentinel index returned by [`find_row`] when no row matches.
pub const NO_MATCH: i64 = -1;

/// A matched row tagged with its original matrix index, so index-based
/// deletion remains correct after filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMatch {
    pub index: i64,
    pub values: Vec<String>,
}

/// First row satisfying the predicate, in matrix order. Returns the
/// [`NO_MATCH`] sentinel with empty values when nothing matches; callers
/// must check `index` before use.
pub fn find_row<F>(matrix: &[Vec<String>], predicate: F) -> RowMatch
where
    F: Fn(&[String]) -> bool,
{
    matrix
        .iter()
        .enumerate()
        .find(|(_, row)| predicate(row))
        .map(|(index, row)| RowMatch {
            index: index as i64,
            values: row.clone(),
        })
        .unwrap_or(RowMatch {
            index: NO_MATCH,
            values: Vec::new(),
        })
}

/// All rows satisfying the predicate, each tagged with its original index,
/// evaluated in matrix order.
pub fn find_rows<F>(matrix: &[Vec<String>], predicate: F) -> Vec<RowMatch>
where
    F: Fn(&[String]) -> bool,
{
    matrix
        .iter()
        .enumerate()
        .filter(|(_, row)| predicate(row))
        .map(|(index, row)| RowMatch {
            index: index as i64,
            values: row.clone(),
        })
        .collect()
}
