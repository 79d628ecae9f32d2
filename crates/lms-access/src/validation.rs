//! # Access Rule Validation
//!
//! Checks that every partition and group referenced by an access rule
//! still exists. Validation is non-fatal and exhaustive: it never mutates
//! the rule and reports every dangling reference it finds instead of
//! stopping at the first one.
//!
//! ## Validation Layers
//!
//! 1. **Group access**: partition ids resolve through a
//!    [`PartitionResolver`]; group ids resolve within their partition.
//! 2. **Block settings**: the authored `chrome` value is a known option
//!    (warning only).

use std::fmt;

use serde::Serialize;
use tracing::warn;

use lms_core::{BlockId, GroupId, PartitionId};

use crate::partition::PartitionResolver;
use crate::rule::{AccessRule, GroupAccess};
use crate::tree::CourseTree;

/// Severity of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The block is misconfigured.
    Error,
    /// Suspicious but harmless.
    Warning,
}

/// What a validation issue is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// The rule names a partition that does not exist.
    MissingPartition {
        /// The unresolved partition.
        partition: PartitionId,
    },
    /// The rule names a group that does not exist in its partition.
    MissingGroup {
        /// The partition that was found.
        partition: PartitionId,
        /// The unresolved group.
        group: GroupId,
    },
    /// The block's chrome setting is not a known option.
    UnknownChrome {
        /// The authored value.
        value: String,
    },
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// How serious the finding is.
    pub severity: Severity,
    /// Structured description.
    #[serde(flatten)]
    pub kind: IssueKind,
    /// Human-readable message.
    pub message: String,
}

impl ValidationIssue {
    fn missing_partition(partition: PartitionId) -> Self {
        Self {
            severity: Severity::Error,
            kind: IssueKind::MissingPartition { partition },
            message: format!(
                "refers to missing partition {partition} (deleted or invalid content group configuration)"
            ),
        }
    }

    fn missing_group(partition: PartitionId, group: GroupId) -> Self {
        Self {
            severity: Severity::Error,
            kind: IssueKind::MissingGroup { partition, group },
            message: format!(
                "refers to missing group {group} in partition {partition} (deleted or invalid content group)"
            ),
        }
    }

    fn unknown_chrome(value: &str) -> Self {
        Self {
            severity: Severity::Warning,
            kind: IssueKind::UnknownChrome {
                value: value.to_string(),
            },
            message: format!(
                "unknown chrome {value:?}; expected chromeless, tabs, accordion or tabs,accordion"
            ),
        }
    }

    /// Whether this issue is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{label}: {}", self.message)
    }
}

/// Check every partition and group referenced by `rule`.
pub fn validate<R: PartitionResolver + ?Sized>(rule: &AccessRule, resolver: &R) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for (partition_id, access) in rule {
        let Some(partition) = resolver.find_partition(partition_id) else {
            issues.push(ValidationIssue::missing_partition(*partition_id));
            continue;
        };
        if let GroupAccess::Restricted(groups) = access {
            for group_id in groups {
                if partition.find_group(group_id).is_none() {
                    issues.push(ValidationIssue::missing_group(*partition_id, *group_id));
                }
            }
        }
    }
    issues
}

// ─── Block Validation ───────────────────────────────────────────────

/// Validation result for one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockValidation {
    /// The validated block.
    pub block: BlockId,
    /// Every issue found, errors and warnings interleaved in check order.
    pub issues: Vec<ValidationIssue>,
}

impl BlockValidation {
    /// Whether no error-level issue was found.
    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(ValidationIssue::is_error)
    }

    /// Error-level issues.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|issue| issue.is_error())
    }

    /// Warning-level issues.
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|issue| !issue.is_error())
    }
}

/// Validate one block of `tree` against the course's user partitions.
///
/// Unknown blocks validate cleanly (there is nothing to check).
pub fn validate_block(tree: &CourseTree, block: &BlockId) -> BlockValidation {
    let mut issues = Vec::new();
    if let Some(node) = tree.get(block) {
        issues.extend(validate(node.group_access(), tree));
        if let Some(chrome) = node.settings.chrome.as_deref() {
            if node.settings.parsed_chrome().is_none() {
                issues.push(ValidationIssue::unknown_chrome(chrome));
            }
        }
    }
    for issue in issues.iter().filter(|issue| issue.is_error()) {
        warn!(block = %block, "{}", issue.message);
    }
    BlockValidation {
        block: block.clone(),
        issues,
    }
}

/// Validate every block of the course, in pre-order.
pub fn validate_course(tree: &CourseTree) -> Vec<BlockValidation> {
    tree.preorder()
        .into_iter()
        .map(|block| validate_block(tree, block))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lms_core::CourseId;

    use crate::partition::{Group, UserPartition};
    use crate::tree::{Block, BlockSettings};

    fn partitions() -> Vec<UserPartition> {
        vec![
            UserPartition::new(1, "Cohorts", vec![Group::new(1, "A"), Group::new(2, "B")]),
            UserPartition::new(2, "Experiment", vec![Group::new(0, "Control")]),
        ]
    }

    #[test]
    fn missing_partition_yields_exactly_one_error() {
        let rule = AccessRule::new().with_groups(99u64, [1, 2, 3]);
        let issues = validate(&rule, &partitions());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert_eq!(
            issues[0].kind,
            IssueKind::MissingPartition {
                partition: PartitionId(99)
            }
        );
    }

    #[test]
    fn each_missing_group_is_reported() {
        let rule = AccessRule::new().with_groups(1u64, [1, 5, 6]);
        let issues = validate(&rule, &partitions());
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|issue| matches!(
            issue.kind,
            IssueKind::MissingGroup { partition: PartitionId(1), .. }
        )));
    }

    #[test]
    fn issues_accumulate_across_partitions() {
        let rule = AccessRule::new()
            .with_groups(1u64, [7])
            .with_groups(2u64, [0])
            .with_groups(42u64, [1]);
        let issues = validate(&rule, &partitions());
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn valid_rule_has_no_issues() {
        let rule = AccessRule::new()
            .with_groups(1u64, [1, 2])
            .with_groups(2u64, [])
            .with_deny_all(1u64);
        assert!(validate(&rule, &partitions()).is_empty());
    }

    #[test]
    fn validate_does_not_mutate_rule() {
        let rule = AccessRule::new().with_groups(99u64, [1]);
        let before = rule.clone();
        let _ = validate(&rule, &partitions());
        assert_eq!(rule, before);
    }

    #[test]
    fn block_validation_uses_course_partitions_and_checks_chrome() {
        let root_id = BlockId::new("course").unwrap();
        let mut tree = CourseTree::new(
            CourseId::new("edX/DemoX/2014T2").unwrap(),
            Block::new(root_id.clone(), "course"),
        )
        .with_user_partitions(partitions());
        let html = BlockId::new("html").unwrap();
        tree.add_child(
            &root_id,
            Block::new(html.clone(), "html")
                .with_group_access(AccessRule::new().with_groups(1u64, [3]))
                .with_settings(BlockSettings {
                    chrome: Some("sidebar".to_string()),
                    ..BlockSettings::default()
                }),
        )
        .unwrap();

        let result = validate_block(&tree, &html);
        assert!(!result.is_valid());
        assert_eq!(result.errors().count(), 1);
        assert_eq!(result.warnings().count(), 1);

        let all = validate_course(&tree);
        assert_eq!(all.len(), 2);
        assert!(all[0].is_valid());
    }

    #[test]
    fn issue_serializes_with_kind_tag() {
        let issue = ValidationIssue::missing_partition(PartitionId(99));
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["severity"], "error");
        assert_eq!(json["kind"], "missing_partition");
        assert_eq!(json["partition"], 99);
    }
}
