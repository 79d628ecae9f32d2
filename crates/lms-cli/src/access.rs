//! # Access Subcommand
//!
//! Prints merged group access for one block, or for every block of the
//! course in pre-order.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::json;

use lms_access::{CourseTree, MergedAccessCache};
use lms_core::BlockId;

use crate::{find_block, load_course, OutputFormat};

/// Arguments for the access subcommand.
#[derive(Args, Debug)]
pub struct AccessArgs {
    /// Course document (YAML, or JSON with a `.json` extension).
    pub file: PathBuf,

    /// Only print this block.
    #[arg(long)]
    pub block: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the access subcommand.
pub fn run_access(args: &AccessArgs) -> Result<u8> {
    let tree = load_course(&args.file)?;
    println!("{}", render_access(&tree, args.block.as_deref(), args.format)?);
    Ok(0)
}

/// Render merged rules for `block` (or all blocks).
pub fn render_access(tree: &CourseTree, block: Option<&str>, format: OutputFormat) -> Result<String> {
    let blocks: Vec<BlockId> = match block {
        Some(block) => vec![find_block(tree, block)?],
        None => tree.preorder().into_iter().cloned().collect(),
    };

    let mut cache = MergedAccessCache::new();
    let rows: Vec<_> = blocks
        .into_iter()
        .map(|id| {
            let merged = cache.get_or_compute(tree, &id);
            (id, merged)
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = rows
                .iter()
                .map(|(id, merged)| json!({"block": id, "merged_access": merged}))
                .collect();
            Ok(serde_json::to_string_pretty(&entries)?)
        }
        OutputFormat::Text => {
            let width = rows.iter().map(|(id, _)| id.as_str().len()).max().unwrap_or(0);
            Ok(rows
                .iter()
                .map(|(id, merged)| format!("{:<width$}  {merged}", id.as_str()))
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}
