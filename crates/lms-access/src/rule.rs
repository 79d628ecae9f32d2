//! # Access Rules
//!
//! An [`AccessRule`] maps each user partition to a [`GroupAccess`] value.
//! The same type is used for the rule authored on a block (its local rule)
//! and for the effective rule after merging with its ancestors.
//!
//! ## Wire Format
//!
//! A rule serializes as a mapping from partition id to either a sequence
//! of group ids or the deny-all sentinel `false`:
//!
//! ```text
//! {"1": [2, 3], "7": [], "9": false}
//! ```
//!
//! An empty sequence means "no restriction along this partition". The
//! representation round-trips losslessly: `Unrestricted` ↔ `[]`,
//! `Restricted(s)` ↔ sorted non-empty sequence, `DenyAll` ↔ `false`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use lms_core::{GroupId, PartitionId};

// ─── Group Access ───────────────────────────────────────────────────

/// Access along a single user partition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GroupAccess {
    /// No restriction: every group of the partition may see the block.
    #[default]
    Unrestricted,
    /// Only members of these groups may see the block. Never empty.
    Restricted(BTreeSet<GroupId>),
    /// Every group is excluded, blocking all users along this partition.
    DenyAll,
}

impl GroupAccess {
    /// Build an access value from a list of group ids.
    ///
    /// An empty list yields [`GroupAccess::Unrestricted`], matching the
    /// authored meaning of an empty group list.
    pub fn from_groups(groups: impl IntoIterator<Item = GroupId>) -> Self {
        let groups: BTreeSet<GroupId> = groups.into_iter().collect();
        if groups.is_empty() {
            Self::Unrestricted
        } else {
            Self::Restricted(groups)
        }
    }

    /// Whether a member of `group` passes this access value.
    pub fn allows(&self, group: GroupId) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Restricted(groups) => groups.contains(&group),
            Self::DenyAll => false,
        }
    }

    /// The allowed groups, if this is a restriction.
    pub fn groups(&self) -> Option<&BTreeSet<GroupId>> {
        match self {
            Self::Restricted(groups) => Some(groups),
            _ => None,
        }
    }
}

impl fmt::Display for GroupAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrestricted => f.write_str("unrestricted"),
            Self::DenyAll => f.write_str("deny-all"),
            Self::Restricted(groups) => {
                f.write_str("[")?;
                for (i, group) in groups.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{group}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl Serialize for GroupAccess {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::DenyAll => serializer.serialize_bool(false),
            Self::Unrestricted => serializer.serialize_seq(Some(0))?.end(),
            Self::Restricted(groups) => {
                let mut seq = serializer.serialize_seq(Some(groups.len()))?;
                for group in groups {
                    seq.serialize_element(group)?;
                }
                seq.end()
            }
        }
    }
}

struct GroupAccessVisitor;

impl<'de> Visitor<'de> for GroupAccessVisitor {
    type Value = GroupAccess;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence of group ids or `false`")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        if v {
            Err(E::invalid_value(de::Unexpected::Bool(true), &self))
        } else {
            Ok(GroupAccess::DenyAll)
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(GroupAccess::Unrestricted)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(GroupAccess::Unrestricted)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut groups = BTreeSet::new();
        while let Some(group) = seq.next_element::<GroupId>()? {
            groups.insert(group);
        }
        Ok(GroupAccess::from_groups(groups))
    }
}

impl<'de> Deserialize<'de> for GroupAccess {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(GroupAccessVisitor)
    }
}

// ─── Access Rule ────────────────────────────────────────────────────

/// Per-partition access rule of a block.
///
/// Partitions without an entry are unrestricted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessRule(BTreeMap<PartitionId, GroupAccess>);

impl AccessRule {
    /// An empty rule (no restrictions).
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder: restrict `partition` to `groups` (an empty list clears the
    /// restriction to `Unrestricted`).
    pub fn with_groups(
        mut self,
        partition: impl Into<PartitionId>,
        groups: impl IntoIterator<Item = u64>,
    ) -> Self {
        self.insert(
            partition.into(),
            GroupAccess::from_groups(groups.into_iter().map(GroupId)),
        );
        self
    }

    /// Builder: deny every group along `partition`.
    pub fn with_deny_all(mut self, partition: impl Into<PartitionId>) -> Self {
        self.insert(partition.into(), GroupAccess::DenyAll);
        self
    }

    /// Look up the access value for a partition.
    pub fn get(&self, partition: &PartitionId) -> Option<&GroupAccess> {
        self.0.get(partition)
    }

    /// Set the access value for a partition, returning the previous one.
    pub fn insert(&mut self, partition: PartitionId, access: GroupAccess) -> Option<GroupAccess> {
        self.0.insert(partition, access)
    }

    /// Remove the entry for a partition.
    pub fn remove(&mut self, partition: &PartitionId) -> Option<GroupAccess> {
        self.0.remove(partition)
    }

    /// Whether members of `group` in `partition` pass this rule.
    ///
    /// Missing and unrestricted entries allow every group; a deny-all
    /// entry allows none.
    pub fn allows(&self, partition: PartitionId, group: GroupId) -> bool {
        self.0.get(&partition).map_or(true, |access| access.allows(group))
    }

    /// Iterate over entries in partition order.
    pub fn iter(&self) -> impl Iterator<Item = (&PartitionId, &GroupAccess)> {
        self.0.iter()
    }

    /// Partitions that have an entry.
    pub fn partitions(&self) -> impl Iterator<Item = &PartitionId> {
        self.0.keys()
    }

    /// Number of entries (including unrestricted ones).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the rule has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(PartitionId, GroupAccess)> for AccessRule {
    fn from_iter<I: IntoIterator<Item = (PartitionId, GroupAccess)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a AccessRule {
    type Item = (&'a PartitionId, &'a GroupAccess);
    type IntoIter = std::collections::btree_map::Iter<'a, PartitionId, GroupAccess>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for AccessRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("{}");
        }
        f.write_str("{")?;
        for (i, (partition, access)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{partition}: {access}")?;
        }
        f.write_str("}")
    }
}
