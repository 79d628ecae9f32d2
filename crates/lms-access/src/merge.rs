//! # Access Merger
//!
//! Computes the effective access rule of a block by folding the local rules
//! of its ancestor chain from the root down. Each step narrows:
//!
//! - a partition already present upstream is intersected with the local
//!   groups, and an empty intersection collapses to [`GroupAccess::DenyAll`].
//!   An upstream unrestricted entry counts as the empty set here, so a
//!   restriction below it denies everyone;
//! - a deny-all partition stays deny-all;
//! - a partition absent upstream takes the local groups;
//! - unrestricted local entries contribute nothing;
//! - a local deny-all entry is an explicit exclusion and always yields
//!   deny-all.
//!
//! The result is a pure function of the current tree. Nothing is cached
//! here; see [`MergedAccessCache`](crate::MergedAccessCache) for explicit
//! memoization.

use std::collections::BTreeSet;

use lms_core::{BlockId, GroupId};

use crate::partition::{Group, UserPartition};
use crate::rule::{AccessRule, GroupAccess};
use crate::tree::BlockTree;

/// Merge a block's local rule into its parent's merged rule.
pub fn merge_with_parent(parent_merged: &AccessRule, local: &AccessRule) -> AccessRule {
    let mut merged = parent_merged.clone();
    for (partition, local_access) in local {
        let local_groups = match local_access {
            GroupAccess::Unrestricted => continue,
            GroupAccess::DenyAll => {
                merged.insert(*partition, GroupAccess::DenyAll);
                continue;
            }
            GroupAccess::Restricted(groups) => groups,
        };
        let narrowed = match merged.get(partition) {
            Some(GroupAccess::DenyAll) => continue,
            Some(GroupAccess::Restricted(upstream)) => {
                let common: BTreeSet<GroupId> =
                    upstream.intersection(local_groups).copied().collect();
                if common.is_empty() {
                    GroupAccess::DenyAll
                } else {
                    GroupAccess::Restricted(common)
                }
            }
            Some(GroupAccess::Unrestricted) => GroupAccess::DenyAll,
            None => GroupAccess::Restricted(local_groups.clone()),
        };
        merged.insert(*partition, narrowed);
    }
    merged
}

/// Effective access rule of `block`.
///
/// A block without a parent yields its own local rule (empty if unset).
/// Otherwise the local rules along the chain are merged root first, so a
/// block's result is never computed before its parent's.
pub fn merged_access<T: BlockTree + ?Sized>(tree: &T, block: &BlockId) -> AccessRule {
    let mut chain = vec![block];
    let mut cursor = tree.parent(block);
    while let Some(parent) = cursor {
        chain.push(parent);
        cursor = tree.parent(parent);
    }

    let empty = AccessRule::new();
    let mut links = chain.into_iter().rev();
    let mut merged = links
        .next()
        .and_then(|root| tree.local_access(root))
        .cloned()
        .unwrap_or_default();
    for id in links {
        merged = merge_with_parent(&merged, tree.local_access(id).unwrap_or(&empty));
    }
    merged
}

/// Whether members of `group` in `partition` may see content governed by
/// `rule`.
///
/// True when the rule has no entry for the partition or the entry is
/// unrestricted; otherwise true only for listed groups. Deny-all admits no
/// group.
pub fn is_visible_to_group(rule: &AccessRule, partition: &UserPartition, group: &Group) -> bool {
    rule.allows(partition.id, group.id)
}
