//! # Access Errors
//!
//! Errors raised while building or mutating a course tree and while
//! loading course documents. Merging and validation never fail; dangling
//! partition or group references surface as validation issues instead.

use thiserror::Error;

use lms_core::BlockId;

/// Errors from course tree construction and mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The referenced block is not part of the tree.
    #[error("unknown block {block}")]
    UnknownBlock {
        /// The missing block.
        block: BlockId,
    },

    /// A block with this id already exists in the tree.
    #[error("duplicate block {block}")]
    DuplicateBlock {
        /// The repeated block id.
        block: BlockId,
    },
}

/// Errors from loading a course document.
#[derive(Error, Debug)]
pub enum CourseLoadError {
    /// The document file could not be read.
    #[error("cannot read course document '{path}': {source}")]
    Read {
        /// Path to the document.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The document could not be parsed.
    #[error("invalid course document '{path}': {reason}")]
    Parse {
        /// Path or label of the document.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// The document describes an invalid tree.
    #[error("invalid course tree: {0}")]
    Tree(#[from] TreeError),
}
