//! Read/write skill tree documents from a tree directory.

use crate::config::StorageConfig;
use crate::graph::SkillTree;
use crate::schema;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Document file name inside a tree directory.
pub const TREE_FILE: &str = "SkillTree.json";

/// Get the path to the tree document for a given tree directory.
pub fn tree_file(tree_dir: &Path, config: &StorageConfig) -> PathBuf {
    tree_dir.join(&config.file_name)
}

/// Check if a tree document exists in the given directory.
pub fn tree_exists(tree_dir: &Path, config: &StorageConfig) -> bool {
    tree_file(tree_dir, config).exists()
}

/// Load a tree document from disk.
pub fn load(tree_dir: &Path, config: &StorageConfig) -> Result<SkillTree> {
    let path = tree_file(tree_dir, config);
    let json = fs::read_to_string(&path)
        .with_context(|| format!("failed to read skill tree from {}", path.display()))?;
    schema::from_json(&json).with_context(|| format!("in {}", path.display()))
}

/// Save a tree document, replacing the previous file.
///
/// Writes to a sibling temp file first so a failed write never leaves a
/// truncated document behind.
pub fn save(tree_dir: &Path, config: &StorageConfig, tree: &SkillTree) -> Result<()> {
    let path = tree_file(tree_dir, config);
    let json = schema::to_json(tree, config.indent)?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, &path)
        .with_context(|| format!("failed to replace skill tree at {}", path.display()))?;

    Ok(())
}
