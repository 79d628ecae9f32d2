//! # Merged Access Cache
//!
//! Caller-held memo of merged rules keyed by block id. Entries stay valid
//! only for the tree snapshot they were computed from: after changing a
//! local rule the caller invalidates the affected subtree (or uses the ids
//! returned by [`CourseTree::set_local_access`](crate::CourseTree::set_local_access)).
//! The cache never outlives the tree it describes unless the caller lets it.

use std::collections::HashMap;

use tracing::debug;

use lms_core::BlockId;

use crate::merge::merge_with_parent;
use crate::rule::AccessRule;
use crate::tree::BlockTree;

/// Memoized merged access rules for one tree snapshot.
#[derive(Debug, Clone, Default)]
pub struct MergedAccessCache {
    entries: HashMap<BlockId, AccessRule>,
}

impl MergedAccessCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached merged rule for `block`, if present.
    pub fn get(&self, block: &BlockId) -> Option<&AccessRule> {
        self.entries.get(block)
    }

    /// Merged rule for `block`, computing and caching it (and any uncached
    /// ancestors) on a miss.
    ///
    /// Computation resumes from the nearest cached ancestor, so the result
    /// equals [`merged_access`](crate::merged_access) as long as every
    /// cached entry is still valid for `tree`.
    pub fn get_or_compute<'a, T: BlockTree + ?Sized>(
        &mut self,
        tree: &'a T,
        block: &'a BlockId,
    ) -> AccessRule {
        if let Some(hit) = self.entries.get(block) {
            return hit.clone();
        }

        let mut pending = Vec::new();
        let mut base: Option<AccessRule> = None;
        let mut cursor = Some(block);
        while let Some(id) = cursor {
            if let Some(hit) = self.entries.get(id) {
                base = Some(hit.clone());
                break;
            }
            pending.push(id);
            cursor = tree.parent(id);
        }
        debug!(block = %block, computed = pending.len(), "merged access cache miss");

        let empty = AccessRule::new();
        let mut merged = base;
        for id in pending.into_iter().rev() {
            let local = tree.local_access(id);
            let next = match &merged {
                Some(parent) => merge_with_parent(parent, local.unwrap_or(&empty)),
                None => local.cloned().unwrap_or_default(),
            };
            self.entries.insert(id.clone(), next.clone());
            merged = Some(next);
        }
        merged.unwrap_or_default()
    }

    /// Drop the entries of `block` and all of its descendants.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_subtree<T: BlockTree + ?Sized>(&mut self, tree: &T, block: &BlockId) -> usize {
        let mut removed = 0;
        let mut stack = vec![block];
        while let Some(id) = stack.pop() {
            if self.entries.remove(id).is_some() {
                removed += 1;
            }
            stack.extend(tree.children(id));
        }
        debug!(block = %block, removed, "merged access cache invalidated");
        removed
    }

    /// Drop the entries for the given ids.
    pub fn invalidate_all<'a>(&mut self, blocks: impl IntoIterator<Item = &'a BlockId>) {
        for block in blocks {
            self.entries.remove(block);
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
