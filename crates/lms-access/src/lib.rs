//! # lms-access — Merged Group Access for Courseware Trees
//!
//! Content authors restrict a block to certain groups of one or more user
//! partitions (cohorts, experiment arms). Restrictions are inherited: a
//! block's effective rule is its own rule merged with those of all of its
//! ancestors, and merging only ever narrows access.
//!
//! ## Modules
//!
//! - [`rule`]: [`AccessRule`] and the per-partition [`GroupAccess`] variant.
//! - [`partition`]: user partitions, groups and the [`PartitionResolver`] seam.
//! - [`tree`]: the [`BlockTree`] provider trait and the [`CourseTree`] arena.
//! - [`merge`]: [`merged_access`] and [`is_visible_to_group`].
//! - [`cache`]: [`MergedAccessCache`], an explicit caller-held memo.
//! - [`validation`]: [`validate`] and per-block checks.
//! - [`document`]: YAML/JSON course documents.
//!
//! ## Crate Policy
//!
//! - Merging and visibility are pure and infallible; unknown blocks merge
//!   to the empty rule.
//! - Dangling partition or group references never fail a merge; they are
//!   reported only by validation.
//! - Merged rules are never stored on blocks.

pub mod cache;
pub mod document;
pub mod error;
pub mod merge;
pub mod partition;
pub mod rule;
pub mod tree;
pub mod validation;

pub use cache::MergedAccessCache;
pub use document::{BlockDocument, CourseDocument};
pub use error::{CourseLoadError, TreeError};
pub use merge::{is_visible_to_group, merge_with_parent, merged_access};
pub use partition::{Group, PartitionResolver, UserPartition};
pub use rule::{AccessRule, GroupAccess};
pub use tree::{Block, BlockSettings, BlockTree, Chrome, CourseTree};
pub use validation::{
    validate, validate_block, validate_course, BlockValidation, IssueKind, Severity,
    ValidationIssue,
};
