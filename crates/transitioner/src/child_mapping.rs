//! Keyed child snapshots and the prev/next merge.
//!
//! When children are added and removed in the same pass we want to show
//! *both*: the leaving ones stay on screen while they animate out, the new ones
//! animate in. [`merge_mappings`] produces that union with a best guess at the
//! right order: new children follow `next`, leaving children stay right before
//! the surviving child they used to precede.

use std::collections::HashMap;

use indexmap::IndexMap;
use smallvec::SmallVec;
use transitioner_core::Key;

/// Ordered key → child snapshot. Iteration order is display order.
pub type ChildMapping<T> = IndexMap<Key, T>;

/// Tree-shaped children input, as handed over by the host on every update.
#[derive(Clone, Debug, PartialEq)]
pub enum Child<T> {
    Keyed(Key, T),
    Fragment(Vec<Child<T>>),
}

impl<T> Child<T> {
    pub fn keyed(key: impl Into<Key>, value: T) -> Self {
        Child::Keyed(key.into(), value)
    }

    pub fn fragment(children: impl IntoIterator<Item = Child<T>>) -> Self {
        Child::Fragment(children.into_iter().collect())
    }
}

/// Flattens `children` into an ordered mapping.
///
/// Fragments are walked depth-first in order. Keys are expected to be unique;
/// a repeated key keeps its first position and takes the last value.
pub fn child_mapping<T>(children: impl IntoIterator<Item = Child<T>>) -> ChildMapping<T> {
    let mut mapping = IndexMap::new();
    for child in children {
        collect(child, &mut mapping);
    }
    mapping
}

fn collect<T>(child: Child<T>, out: &mut ChildMapping<T>) {
    match child {
        Child::Keyed(key, value) => {
            if out.insert(key.clone(), value).is_some() {
                log::debug!("child_mapping: duplicate key `{key}`; last one wins");
            }
        }
        Child::Fragment(children) => {
            for c in children {
                collect(c, out);
            }
        }
    }
}

fn value_for_key<'a, T>(
    key: &Key,
    prev: &'a ChildMapping<T>,
    next: &'a ChildMapping<T>,
) -> Option<&'a T> {
    next.get(key).or_else(|| prev.get(key))
}

/// Union of `prev` and `next` in display order.
///
/// Keys only in `prev` are placed immediately before the next key they
/// preceded in `prev` that is still in `next`, or at the end if there is none.
/// Everything else follows `next`.
pub fn merge_mappings<T: Clone>(
    prev: &ChildMapping<T>,
    next: &ChildMapping<T>,
) -> ChildMapping<T> {
    // For each key of `next`, the prev-only keys to insert before it
    let mut pending_before: HashMap<&Key, SmallVec<[&Key; 4]>> = HashMap::new();

    let mut pending: SmallVec<[&Key; 4]> = SmallVec::new();
    for prev_key in prev.keys() {
        if next.contains_key(prev_key) {
            if !pending.is_empty() {
                pending_before.insert(prev_key, std::mem::take(&mut pending));
            }
        } else {
            pending.push(prev_key);
        }
    }

    let mut merged = IndexMap::with_capacity(prev.len() + next.len());
    for next_key in next.keys() {
        if let Some(run) = pending_before.remove(next_key) {
            for key in run {
                if let Some(v) = value_for_key(key, prev, next) {
                    merged.insert(key.clone(), v.clone());
                }
            }
        }
        if let Some(v) = value_for_key(next_key, prev, next) {
            merged.insert(next_key.clone(), v.clone());
        }
    }

    // Keys that didn't appear before any key in `next`
    for key in pending {
        if let Some(v) = value_for_key(key, prev, next) {
            merged.insert(key.clone(), v.clone());
        }
    }

    merged
}
