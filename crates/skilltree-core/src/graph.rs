//! Document model for an exported skill tree.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Id of the synthetic node every class start hangs off.
pub const ROOT_NODE_ID: &str = "root";

/// Tree tags starting with this prefix belong to atlas trees.
const ATLAS_PREFIX: &str = "Atlas";

/// A complete skill tree document as exported by the game.
///
/// Only the fields the precalculation reads are typed; everything else
/// (groups, constants, sprites, ...) is carried through `extra` untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillTree {
    /// Tree kind tag, e.g. `"Default"` or `"Atlas"`.
    pub tree: String,
    pub nodes: BTreeMap<String, Node>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single allocatable point in the tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// The node's label. Not unique across nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<NodeLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<String>>,
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub inbound: Option<Vec<String>>,
    #[serde(rename = "out", default, skip_serializing_if = "Option::is_none")]
    pub outbound: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ascendancy_name: Option<String>,
    /// Written by [`crate::annotate::annotate`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earliest_mandatory_node: Option<NodeLabel>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A node label or annotation value.
///
/// Game exports use integer skill hashes; the exit branch of the annotation
/// writes a node id, which is always a string. The JSON type is kept as read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeLabel {
    Number(i64),
    Text(String),
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeLabel::Number(n) => write!(f, "{}", n),
            NodeLabel::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for NodeLabel {
    fn from(n: i64) -> Self {
        NodeLabel::Number(n)
    }
}

impl From<&str> for NodeLabel {
    fn from(s: &str) -> Self {
        NodeLabel::Text(s.to_string())
    }
}

impl From<String> for NodeLabel {
    fn from(s: String) -> Self {
        NodeLabel::Text(s)
    }
}

/// A problem found by [`SkillTree::integrity_issues`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    MissingRoot,
    DanglingEdge { source: String, target: String },
    MissingLabel { node: String },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::MissingRoot => write!(f, "tree has no '{}' node", ROOT_NODE_ID),
            IntegrityIssue::DanglingEdge { source, target } => {
                write!(f, "dangling edge: {} -> {}", source, target)
            }
            IntegrityIssue::MissingLabel { node } => write!(f, "node {} has no skill label", node),
        }
    }
}

impl Node {
    /// Stat descriptions, empty if the node carries none.
    pub fn stats(&self) -> &[String] {
        self.stats.as_deref().unwrap_or_default()
    }

    pub fn inbound(&self) -> &[String] {
        self.inbound.as_deref().unwrap_or_default()
    }

    pub fn outbound(&self) -> &[String] {
        self.outbound.as_deref().unwrap_or_default()
    }

    /// True if neither an `in` nor an `out` list is present.
    ///
    /// An explicitly empty list still counts as adjacency information.
    pub fn has_no_adjacency(&self) -> bool {
        self.inbound.is_none() && self.outbound.is_none()
    }

    pub fn is_ascendancy(&self) -> bool {
        self.ascendancy_name.is_some()
    }

    /// All edge targets, inbound first, each reported once.
    pub fn neighbors(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for id in self.inbound().iter().chain(self.outbound()) {
            if !out.contains(&id.as_str()) {
                out.push(id);
            }
        }
        out
    }
}

impl SkillTree {
    /// Create an empty tree with the given kind tag.
    pub fn new(tree: impl Into<String>) -> Self {
        Self {
            tree: tree.into(),
            nodes: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    /// Atlas trees annotate ascendancy-marked nodes; passive trees skip them.
    pub fn is_atlas(&self) -> bool {
        self.tree.starts_with(ATLAS_PREFIX)
    }

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn insert_node(&mut self, id: impl Into<String>, node: Node) {
        self.nodes.insert(id.into(), node);
    }

    /// Total number of edge entries across all `in` and `out` lists.
    pub fn edge_count(&self) -> usize {
        self.nodes
            .values()
            .map(|n| n.inbound().len() + n.outbound().len())
            .sum()
    }

    /// Number of nodes carrying an `earliestMandatoryNode` value.
    pub fn annotated_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|n| n.earliest_mandatory_node.is_some())
            .count()
    }

    /// Collect structural problems without failing on the first one.
    pub fn integrity_issues(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();

        if !self.nodes.contains_key(ROOT_NODE_ID) {
            issues.push(IntegrityIssue::MissingRoot);
        }

        for (id, node) in &self.nodes {
            for target in node.neighbors() {
                if !self.nodes.contains_key(target) {
                    issues.push(IntegrityIssue::DanglingEdge {
                        source: id.clone(),
                        target: target.to_string(),
                    });
                }
            }
            if id != ROOT_NODE_ID && node.skill.is_none() {
                issues.push(IntegrityIssue::MissingLabel { node: id.clone() });
            }
        }

        issues
    }
}
