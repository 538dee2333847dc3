//! Board state projection.
//!
//! Derived, never stored: each snapshot is re-bucketed from scratch and
//! the projector keeps no state between calls.

use indexmap::IndexMap;
use kadro_core::status::BoardItem;

/// Group a flat collection into status columns.
///
/// Every item lands in the bucket for its current status; relative input
/// order is preserved inside a column, which is the subscription layer's
/// creation order — the system keeps no manual rank. Columns are keyed in
/// the order given, so empty columns still render.
///
/// A status outside `columns` cannot occur through this subsystem's write
/// paths: the enumerations are closed and callers pass
/// [`Column::ALL`](kadro_core::status::Column::ALL).
pub fn project<T: BoardItem + Clone>(
    items: &[T],
    columns: &[T::Status],
) -> IndexMap<T::Status, Vec<T>> {
    let mut board: IndexMap<T::Status, Vec<T>> =
        columns.iter().map(|c| (*c, Vec::new())).collect();
    for item in items {
        debug_assert!(
            board.contains_key(&item.status()),
            "status outside the projected column set"
        );
        if let Some(bucket) = board.get_mut(&item.status()) {
            bucket.push(item.clone());
        }
    }
    board
}

/// Per-column card counts, for column header badges.
pub fn column_counts<T: BoardItem + Clone>(
    items: &[T],
    columns: &[T::Status],
) -> IndexMap<T::Status, usize> {
    project(items, columns)
        .into_iter()
        .map(|(column, cards)| (column, cards.len()))
        .collect()
}
