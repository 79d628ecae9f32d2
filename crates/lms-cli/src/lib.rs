//! # lms-cli — Courseware Tooling CLI
//!
//! Provides the `lms` command-line interface over course documents and
//! license codes.
//!
//! ## Subcommands
//!
//! - `lms access`: Merged group access per block.
//! - `lms validate`: Dangling partition/group references and bad settings.
//! - `lms visible`: Whether a group can see a block.
//! - `lms license`: Parse a license code and print its attributes.
//!
//! ```bash
//! lms access course.yaml --block week1 --format json
//! lms validate course.yaml
//! lms visible course.yaml --block lesson1 --partition 50 --group 2
//! lms license CC-BY-NC-SA --version 4.0
//! ```
//!
//! Each subcommand returns its process exit code; rendering is split from
//! printing so the output can be tested directly.

pub mod access;
pub mod config;
pub mod license;
pub mod validate;
pub mod visible;

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;

use lms_access::{CourseDocument, CourseTree};
use lms_core::BlockId;

/// Output format shared by the inspection subcommands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Load a course document (YAML, or JSON by extension) into a tree.
pub fn load_course(path: &Path) -> Result<CourseTree> {
    let document = CourseDocument::load(path)?;
    let tree = document
        .into_tree()
        .with_context(|| format!("failed to build course tree from {}", path.display()))?;
    tracing::info!(
        course = %tree.course_id(),
        blocks = tree.block_count(),
        "loaded course document"
    );
    Ok(tree)
}

/// Resolve a `--block` argument against the tree.
pub fn find_block(tree: &CourseTree, block: &str) -> Result<BlockId> {
    let id = BlockId::new(block).with_context(|| format!("invalid block id {block:?}"))?;
    if !tree.contains(&id) {
        anyhow::bail!("block {id} not found in course {}", tree.course_id());
    }
    Ok(id)
}
