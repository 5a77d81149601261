//! Set difference between the entities of two consecutive revisions.

use std::{fmt::Display, hash::Hash};

use rustc_hash::FxHashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiffAction {
    Added,
    Removed,
}

impl DiffAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            DiffAction::Added => "added",
            DiffAction::Removed => "removed",
        }
    }

    pub const fn inverse(self) -> Self {
        match self {
            DiffAction::Added => DiffAction::Removed,
            DiffAction::Removed => DiffAction::Added,
        }
    }
}

impl Display for DiffAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Diff<T> {
    pub action: DiffAction,
    pub value: T,
}

impl<T> Diff<T> {
    pub fn added(value: T) -> Self {
        Self {
            action: DiffAction::Added,
            value,
        }
    }

    pub fn removed(value: T) -> Self {
        Self {
            action: DiffAction::Removed,
            value,
        }
    }
}

/// Compare the entities of two revisions as sets.
///
/// Entities in `current` but not in `previous` are reported as added, then entities in
/// `previous` but not in `current` as removed. Duplicates on either side collapse into one
/// record; within each group the records follow the order of first occurrence.
pub fn diff<T>(previous: &[T], current: &[T]) -> Vec<Diff<T>>
where
    T: Eq + Hash + Clone,
{
    let previous_set: FxHashSet<&T> = previous.iter().collect();
    let current_set: FxHashSet<&T> = current.iter().collect();

    let mut seen = FxHashSet::default();
    let added = current
        .iter()
        .filter(|value| !previous_set.contains(value) && seen.insert(*value))
        .map(|value| Diff::added(value.clone()));

    let mut records: Vec<Diff<T>> = added.collect();

    seen.clear();
    records.extend(
        previous
            .iter()
            .filter(|value| !current_set.contains(value) && seen.insert(*value))
            .map(|value| Diff::removed(value.clone())),
    );

    records
}
