//! Project completion arithmetic.
//!
//! The stored `progress` field on a project is a derived value: the
//! percentage of its tasks that are completed, rounded to the nearest
//! integer. The aggregator in `kadro-board` keeps the stored value in sync
//! with this function; a manual slider write may diverge it until the next
//! task-set change.

/// Percentage of completed tasks, rounded to the nearest integer.
///
/// Returns `0` for an empty task set rather than dividing by zero.
pub fn completion_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u8
}
