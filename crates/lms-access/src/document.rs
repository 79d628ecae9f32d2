//! # Course Documents
//!
//! A course document is a nested YAML or JSON description of a course: its
//! user partitions and its block hierarchy, with each block's settings and
//! local group access.
//!
//! ```yaml
//! course_id: edX/DemoX/2014T2
//! user_partitions:
//!   - id: 1
//!     name: Cohorts
//!     groups: [{id: 1, name: Red}, {id: 2, name: Blue}]
//! root:
//!   id: course
//!   category: course
//!   children:
//!     - id: week1
//!       category: chapter
//!       group_access: {1: [1]}
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use lms_core::{BlockId, CourseId};

use crate::error::CourseLoadError;
use crate::partition::UserPartition;
use crate::rule::AccessRule;
use crate::tree::{Block, BlockSettings, CourseTree};

fn default_category() -> String {
    "vertical".to_string()
}

/// One block of a course document, with its children inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDocument {
    /// Block usage key.
    pub id: BlockId,
    /// Block type; defaults to `vertical`.
    #[serde(default = "default_category")]
    pub category: String,
    /// Title shown to learners.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Settings-scoped fields.
    #[serde(default)]
    pub settings: BlockSettings,
    /// Local access rule.
    #[serde(default, skip_serializing_if = "AccessRule::is_empty")]
    pub group_access: AccessRule,
    /// Child blocks in authored order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BlockDocument>,
}

/// A complete course document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDocument {
    /// Course key.
    pub course_id: CourseId,
    /// Course-level user partitions.
    #[serde(default)]
    pub user_partitions: Vec<UserPartition>,
    /// Root block (usually of category `course`).
    pub root: BlockDocument,
}

impl CourseDocument {
    /// Parse a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self, CourseLoadError> {
        serde_yaml::from_str(content).map_err(|e| CourseLoadError::Parse {
            path: "<yaml>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Parse a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, CourseLoadError> {
        serde_json::from_str(content).map_err(|e| CourseLoadError::Parse {
            path: "<json>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Load a document from a file; `.json` files are parsed as JSON and
    /// everything else as YAML.
    pub fn load(path: &Path) -> Result<Self, CourseLoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| CourseLoadError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let parsed = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        };
        parsed.map_err(|e| match e {
            CourseLoadError::Parse { reason, .. } => CourseLoadError::Parse {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Build the course tree described by this document.
    ///
    /// # Errors
    ///
    /// Returns [`CourseLoadError::Tree`] if two blocks share an id.
    pub fn into_tree(self) -> Result<CourseTree, CourseLoadError> {
        let CourseDocument {
            course_id,
            user_partitions,
            root,
        } = self;
        let (root_block, root_children) = split(root);
        let root_id = root_block.id().clone();
        let mut tree =
            CourseTree::new(course_id, root_block).with_user_partitions(user_partitions);

        let mut stack: Vec<(BlockId, BlockDocument)> = root_children
            .into_iter()
            .rev()
            .map(|child| (root_id.clone(), child))
            .collect();
        while let Some((parent, doc)) = stack.pop() {
            let (block, children) = split(doc);
            let id = block.id().clone();
            tree.add_child(&parent, block)?;
            stack.extend(children.into_iter().rev().map(|child| (id.clone(), child)));
        }
        debug!(course = %tree.course_id(), blocks = tree.block_count(), "course tree loaded");
        Ok(tree)
    }
}

fn split(doc: BlockDocument) -> (Block, Vec<BlockDocument>) {
    let mut block = Block::new(doc.id, doc.category)
        .with_settings(doc.settings)
        .with_group_access(doc.group_access);
    block.display_name = doc.display_name;
    (block, doc.children)
}
