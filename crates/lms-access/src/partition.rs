//! # User Partitions
//!
//! A user partition ("group configuration") splits learners along one
//! axis, such as a cohort assignment or a content experiment. Each
//! partition owns an ordered list of groups.
//!
//! Validation resolves the ids referenced by an access rule through the
//! [`PartitionResolver`] trait; the course tree implements it using the
//! partitions configured on its root block.

use serde::{Deserialize, Serialize};

use lms_core::{GroupId, PartitionId};

/// A group within a user partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group identifier, unique within its partition.
    pub id: GroupId,
    /// Human-readable group name.
    pub name: String,
}

impl Group {
    /// Create a group.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: GroupId(id),
            name: name.into(),
        }
    }
}

/// A user partition and its groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPartition {
    /// Partition identifier.
    pub id: PartitionId,
    /// Human-readable name.
    pub name: String,
    /// Longer description shown to course authors.
    #[serde(default)]
    pub description: String,
    /// Assignment scheme (e.g. `cohort`, `random`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    /// Groups in authored order.
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl UserPartition {
    /// Create a partition with the given groups.
    pub fn new(id: u64, name: impl Into<String>, groups: Vec<Group>) -> Self {
        Self {
            id: PartitionId(id),
            name: name.into(),
            description: String::new(),
            scheme: None,
            groups,
        }
    }

    /// Find a group of this partition by id.
    pub fn find_group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.iter().find(|group| group.id == *id)
    }
}

/// Resolves partition ids referenced by access rules.
pub trait PartitionResolver {
    /// Look up a partition by id.
    fn find_partition(&self, id: &PartitionId) -> Option<&UserPartition>;
}

impl PartitionResolver for [UserPartition] {
    fn find_partition(&self, id: &PartitionId) -> Option<&UserPartition> {
        self.iter().find(|partition| partition.id == *id)
    }
}

impl PartitionResolver for Vec<UserPartition> {
    fn find_partition(&self, id: &PartitionId) -> Option<&UserPartition> {
        self.as_slice().find_partition(id)
    }
}
