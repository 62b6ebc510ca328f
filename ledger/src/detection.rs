//! First-time completion detection.
//!
//! A chore earns rewards only on the update that first flips its
//! `completed_before` flag. Before/after snapshots are matched by chore id;
//! positions in the two lists carry no meaning.

use std::collections::HashMap;

use crate::types::Chore;

/// Return the chores in `after` that were completed for the first time.
///
/// A chore qualifies when it is completed and flagged `completed_before` in
/// `after`, and the record with the same id in `before` was not yet flagged
/// (a chore missing from `before` counts as never completed). Results keep
/// the order of `after`.
pub fn first_time_completions<'a>(before: &[Chore], after: &'a [Chore]) -> Vec<&'a Chore> {
    let previously_done: HashMap<&str, bool> = before
        .iter()
        .map(|c| (c.id.as_str(), c.completed_before))
        .collect();

    after
        .iter()
        .filter(|c| c.completed && c.completed_before)
        .filter(|c| !previously_done.get(c.id.as_str()).copied().unwrap_or(false))
        .collect()
}
