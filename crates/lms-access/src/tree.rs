//! # Course Block Tree
//!
//! The [`BlockTree`] trait is the tree-provider seam used by the merger:
//! it answers `parent`, `children` and `local_access` for a block id.
//! Parent links are plain ids (non-owning); the tree owns every block.
//!
//! [`CourseTree`] is the arena implementation. Blocks can only be attached
//! under a block that is already present and ids are unique, so parent
//! chains always terminate at the root.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use lms_core::{BlockId, CourseId, PartitionId};

use crate::error::TreeError;
use crate::merge;
use crate::partition::{PartitionResolver, UserPartition};
use crate::rule::AccessRule;

/// Read access to a block hierarchy.
///
/// Implementations must guarantee acyclic parent chains. Unknown ids are
/// answered as parentless, childless blocks without a local rule.
pub trait BlockTree {
    /// Parent of `block`, or `None` for the root (or an unknown id).
    fn parent(&self, block: &BlockId) -> Option<&BlockId>;

    /// Children of `block` in authored order.
    fn children(&self, block: &BlockId) -> &[BlockId];

    /// The access rule authored directly on `block`, if any.
    fn local_access(&self, block: &BlockId) -> Option<&AccessRule>;
}

// ─── Block Settings ─────────────────────────────────────────────────

/// Navigation chrome used when rendering a block in the LMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chrome {
    /// No tabs and no accordion.
    Chromeless,
    /// Tabs only.
    Tabs,
    /// Accordion only.
    Accordion,
    /// Tabs and accordion.
    TabsAccordion,
}

impl Chrome {
    /// Parse an authored chrome value.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "chromeless" => Some(Self::Chromeless),
            "tabs" => Some(Self::Tabs),
            "accordion" => Some(Self::Accordion),
            "tabs,accordion" => Some(Self::TabsAccordion),
            _ => None,
        }
    }
}

impl std::fmt::Display for Chrome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Chromeless => "chromeless",
            Self::Tabs => "tabs",
            Self::Accordion => "accordion",
            Self::TabsAccordion => "tabs,accordion",
        };
        f.write_str(s)
    }
}

/// Settings-scoped fields common to all LMS blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockSettings {
    /// Whether to hide this block from the table of contents.
    pub hide_from_toc: bool,
    /// Grading format (e.g. "Homework"), also shown in the TOC.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Navigation chrome, see [`Chrome`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chrome: Option<String>,
    /// Tab selected by default; the courseware tab when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_tab: Option<String>,
    /// LaTeX source file name. Deprecated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    /// Whether the course is open to the public.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ispublic: Option<bool>,
    /// Only course staff may see the block, regardless of start date.
    /// Group access is ignored for such blocks.
    pub visible_to_staff_only: bool,
}

impl BlockSettings {
    /// The parsed chrome, if set and recognized.
    pub fn parsed_chrome(&self) -> Option<Chrome> {
        self.chrome.as_deref().and_then(Chrome::parse)
    }
}

// ─── Block ──────────────────────────────────────────────────────────

/// A courseware block held by a [`CourseTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    id: BlockId,
    /// Block type (e.g. `course`, `chapter`, `sequential`, `vertical`, `html`).
    pub category: String,
    /// Title shown to learners.
    pub display_name: Option<String>,
    /// Settings-scoped fields.
    pub settings: BlockSettings,
    group_access: AccessRule,
    parent: Option<BlockId>,
    children: Vec<BlockId>,
}

impl Block {
    /// Create a detached block with no local access rule.
    pub fn new(id: BlockId, category: impl Into<String>) -> Self {
        Self {
            id,
            category: category.into(),
            display_name: None,
            settings: BlockSettings::default(),
            group_access: AccessRule::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Builder: set the settings fields.
    pub fn with_settings(mut self, settings: BlockSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Builder: set the local access rule.
    pub fn with_group_access(mut self, rule: AccessRule) -> Self {
        self.group_access = rule;
        self
    }

    /// Block id.
    pub fn id(&self) -> &BlockId {
        &self.id
    }

    /// The access rule authored on this block.
    pub fn group_access(&self) -> &AccessRule {
        &self.group_access
    }

    /// Parent block id (`None` for the root).
    pub fn parent(&self) -> Option<&BlockId> {
        self.parent.as_ref()
    }

    /// Child block ids in authored order.
    pub fn children(&self) -> &[BlockId] {
        &self.children
    }
}

// ─── Course Tree ────────────────────────────────────────────────────

/// Arena-backed block hierarchy of one course.
#[derive(Debug, Clone)]
pub struct CourseTree {
    course_id: CourseId,
    root: BlockId,
    user_partitions: Vec<UserPartition>,
    blocks: HashMap<BlockId, Block>,
}

impl CourseTree {
    /// Create a tree containing only `root`.
    pub fn new(course_id: CourseId, mut root: Block) -> Self {
        root.parent = None;
        root.children.clear();
        let root_id = root.id.clone();
        let mut blocks = HashMap::new();
        blocks.insert(root_id.clone(), root);
        Self {
            course_id,
            root: root_id,
            user_partitions: Vec::new(),
            blocks,
        }
    }

    /// Builder: set the course's user partitions.
    pub fn with_user_partitions(mut self, partitions: Vec<UserPartition>) -> Self {
        self.user_partitions = partitions;
        self
    }

    /// Course key.
    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    /// Root block id.
    pub fn root(&self) -> &BlockId {
        &self.root
    }

    /// User partitions configured at the course level.
    pub fn user_partitions(&self) -> &[UserPartition] {
        &self.user_partitions
    }

    /// Look up a block.
    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.get(id)
    }

    /// Whether the tree contains `id`.
    pub fn contains(&self, id: &BlockId) -> bool {
        self.blocks.contains_key(id)
    }

    /// Number of blocks, including the root.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Attach `block` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// - [`TreeError::UnknownBlock`] if `parent` is not in the tree.
    /// - [`TreeError::DuplicateBlock`] if the block id is already used.
    pub fn add_child(&mut self, parent: &BlockId, mut block: Block) -> Result<(), TreeError> {
        if self.blocks.contains_key(&block.id) {
            return Err(TreeError::DuplicateBlock { block: block.id });
        }
        let parent_block = self
            .blocks
            .get_mut(parent)
            .ok_or_else(|| TreeError::UnknownBlock {
                block: parent.clone(),
            })?;
        parent_block.children.push(block.id.clone());
        block.parent = Some(parent.clone());
        block.children.clear();
        self.blocks.insert(block.id.clone(), block);
        Ok(())
    }

    /// Replace the local access rule of `block`.
    ///
    /// Returns the ids of every block whose merged rule may have changed:
    /// the block itself and all of its descendants, in pre-order. Callers
    /// holding a [`MergedAccessCache`](crate::MergedAccessCache) must
    /// invalidate these.
    pub fn set_local_access(
        &mut self,
        block: &BlockId,
        rule: AccessRule,
    ) -> Result<Vec<BlockId>, TreeError> {
        let target = self
            .blocks
            .get_mut(block)
            .ok_or_else(|| TreeError::UnknownBlock {
                block: block.clone(),
            })?;
        target.group_access = rule;
        let stale: Vec<BlockId> = self.subtree(block).into_iter().cloned().collect();
        debug!(block = %block, stale = stale.len(), "local access rule replaced");
        Ok(stale)
    }

    /// `block` followed by all of its descendants, in pre-order.
    pub fn subtree<'a>(&'a self, block: &'a BlockId) -> Vec<&'a BlockId> {
        let mut out = Vec::new();
        if !self.blocks.contains_key(block) {
            return out;
        }
        let mut stack = vec![block];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        out
    }

    /// Every block of the course, in pre-order from the root.
    pub fn preorder(&self) -> Vec<&BlockId> {
        self.subtree(&self.root)
    }

    /// Ancestors of `block`, nearest first (excluding `block` itself).
    pub fn ancestors<'a>(&'a self, block: &BlockId) -> Vec<&'a BlockId> {
        let mut out = Vec::new();
        let mut cursor = self.parent(block);
        while let Some(id) = cursor {
            out.push(id);
            cursor = self.parent(id);
        }
        out
    }

    /// Effective access rule of `block`, merged with all of its ancestors.
    pub fn merged_access(&self, block: &BlockId) -> AccessRule {
        merge::merged_access(self, block)
    }

    /// Whether `block` or any ancestor is marked visible to staff only.
    pub fn is_staff_only(&self, block: &BlockId) -> bool {
        let own = self
            .get(block)
            .is_some_and(|b| b.settings.visible_to_staff_only);
        own || self.ancestors(block).into_iter().any(|id| {
            self.get(id)
                .is_some_and(|b| b.settings.visible_to_staff_only)
        })
    }
}

impl BlockTree for CourseTree {
    fn parent(&self, block: &BlockId) -> Option<&BlockId> {
        self.blocks.get(block).and_then(|b| b.parent.as_ref())
    }

    fn children(&self, block: &BlockId) -> &[BlockId] {
        self.blocks
            .get(block)
            .map(|b| b.children.as_slice())
            .unwrap_or(&[])
    }

    fn local_access(&self, block: &BlockId) -> Option<&AccessRule> {
        self.blocks.get(block).map(|b| &b.group_access)
    }
}

impl PartitionResolver for CourseTree {
    fn find_partition(&self, id: &PartitionId) -> Option<&UserPartition> {
        self.user_partitions.find_partition(id)
    }
}
