//! Errors raised by the annotation pass.

/// A data-integrity failure found while annotating a tree.
///
/// Every variant names the offending node so a malformed export can be traced
/// back to its source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnnotateError {
    #[error("node {referenced_by} has an edge to unknown node {node}")]
    UnknownNode { node: String, referenced_by: String },
    #[error("node {node} has no skill label (needed while resolving {start})")]
    MissingLabel { node: String, start: String },
    #[error("no node with id {node} in tree")]
    UnknownStart { node: String },
}
