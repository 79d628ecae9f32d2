//! # Visible Subcommand
//!
//! Answers whether learners in a given group of a given partition can see
//! a block, taking the merged access of all ancestors into account.
//! Blocks marked visible to staff only are hidden from every group.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use lms_access::{is_visible_to_group, CourseTree, PartitionResolver};
use lms_core::{GroupId, PartitionId};

use crate::{find_block, load_course};

/// Arguments for the visible subcommand.
#[derive(Args, Debug)]
pub struct VisibleArgs {
    /// Course document (YAML, or JSON with a `.json` extension).
    pub file: PathBuf,

    /// Block to check.
    #[arg(long)]
    pub block: String,

    /// User partition id.
    #[arg(long)]
    pub partition: u64,

    /// Group id within the partition.
    #[arg(long)]
    pub group: u64,
}

/// Visibility verdict for one block and group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The group can see the block.
    Visible,
    /// The merged access rule excludes the group.
    Hidden,
    /// The block (or an ancestor) is visible to staff only.
    StaffOnly,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
            Self::StaffOnly => "hidden (staff only)",
        };
        f.write_str(s)
    }
}

/// Decide whether `group` of `partition` can see `block`.
pub fn check_visibility(tree: &CourseTree, block: &str, partition: u64, group: u64) -> Result<Verdict> {
    let block = find_block(tree, block)?;
    let partition = tree
        .find_partition(&PartitionId(partition))
        .with_context(|| format!("partition {partition} is not configured for this course"))?;
    let group = partition.find_group(&GroupId(group)).with_context(|| {
        format!("group {group} does not exist in partition {}", partition.id)
    })?;

    if tree.is_staff_only(&block) {
        return Ok(Verdict::StaffOnly);
    }
    let merged = tree.merged_access(&block);
    tracing::debug!(block = %block, merged = %merged, "checking visibility");
    Ok(if is_visible_to_group(&merged, partition, group) {
        Verdict::Visible
    } else {
        Verdict::Hidden
    })
}

/// Execute the visible subcommand.
pub fn run_visible(args: &VisibleArgs) -> Result<u8> {
    let tree = load_course(&args.file)?;
    let verdict = check_visibility(&tree, &args.block, args.partition, args.group)?;
    println!("{verdict}");
    Ok(0)
}
