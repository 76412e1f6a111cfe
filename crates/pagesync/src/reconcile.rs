//! Reconciliation of fetched remote records against persisted natural keys.
//!
//! Deduplication is a pure set difference: a fetched record is new exactly
//! when its natural key is absent from the set of already-persisted keys.
//! There are no merge or update semantics.

use std::collections::HashSet;
use std::hash::Hash;

/// Filter `fetched` down to the records whose natural key is not in
/// `existing`, preserving input order.
///
/// Runs in O(F + E) via hash-set membership. An empty `fetched` yields an
/// empty result; running reconciliation again with the previously inserted
/// keys included in `existing` yields an empty result (idempotence).
pub fn new_items<T, K, F>(fetched: Vec<T>, existing: &HashSet<K>, key_of: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    fetched
        .into_iter()
        .filter(|item| !existing.contains(&key_of(item)))
        .collect()
}
