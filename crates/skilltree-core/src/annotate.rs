//! Earliest-mandatory-node precalculation.
//!
//! For every eligible node, walk breadth-first away from it until the walk
//! runs out of unvisited nodes, stopping at travel nodes. If the walk hits
//! exactly one travel node, that node is the annotation. Otherwise the
//! annotation is the label of the node where the walk first branched (or the
//! last node dequeued if it never branched).

use crate::error::AnnotateError;
use crate::graph::{Node, NodeLabel, ROOT_NODE_ID, SkillTree};
use crate::travel::TravelStats;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info};

/// Whether a node takes part in the annotation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    /// The synthetic `root` node is never a start node.
    Root,
    /// Ascendancy nodes on a passive tree.
    Ascendancy,
    /// Neither `in` nor `out` present.
    NoAdjacency,
}

/// Outcome of walking away from one start node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The value written to `earliestMandatoryNode`.
    pub value: NodeLabel,
    /// Travel node ids in the order they were hit. May repeat.
    pub exits: Vec<String>,
    pub split_found: bool,
    /// Number of nodes dequeued during the walk, start node included.
    pub expanded: usize,
}

impl Resolution {
    /// True if the value is the single exit rather than the frozen label.
    pub fn from_exit(&self) -> bool {
        self.exits.len() == 1
    }
}

/// Summary of one annotation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationReport {
    pub annotated: usize,
    pub from_exit: usize,
    pub from_label: usize,
    pub skipped_root: usize,
    pub skipped_ascendancy: usize,
    pub skipped_no_adjacency: usize,
}

impl AnnotationReport {
    pub fn skipped(&self) -> usize {
        self.skipped_root + self.skipped_ascendancy + self.skipped_no_adjacency
    }
}

pub fn eligibility(tree: &SkillTree, id: &str, node: &Node) -> Eligibility {
    if id == ROOT_NODE_ID {
        Eligibility::Root
    } else if !tree.is_atlas() && node.is_ascendancy() {
        Eligibility::Ascendancy
    } else if node.has_no_adjacency() {
        Eligibility::NoAdjacency
    } else {
        Eligibility::Eligible
    }
}

fn label_of<'a>(id: &str, node: &'a Node, start: &str) -> Result<&'a NodeLabel, AnnotateError> {
    node.skill.as_ref().ok_or_else(|| AnnotateError::MissingLabel {
        node: id.to_string(),
        start: start.to_string(),
    })
}

/// Compute the annotation for `start` without touching the tree.
///
/// Eligibility is not checked here; callers decide which nodes to resolve.
pub fn resolve(
    tree: &SkillTree,
    start: &str,
    travel: &TravelStats,
) -> Result<Resolution, AnnotateError> {
    let (start_id, start_node) = tree
        .nodes
        .get_key_value(start)
        .ok_or_else(|| AnnotateError::UnknownStart {
            node: start.to_string(),
        })?;

    let mut frontier: VecDeque<(&str, &Node)> = VecDeque::new();
    frontier.push_back((start_id.as_str(), start_node));
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(start_id.as_str());

    let mut exits: Vec<String> = Vec::new();
    let mut candidate = label_of(start_id, start_node, start)?;
    let mut split_found = false;
    let mut expanded = 0;

    while let Some((id, node)) = frontier.pop_front() {
        expanded += 1;

        let adjacent: Vec<&str> = node
            .neighbors()
            .into_iter()
            .filter(|n| !visited.contains(n))
            .collect();

        // The candidate moves to the dequeued node before the branch test,
        // so a split freezes it at the splitting node itself.
        if !split_found {
            candidate = label_of(id, node, start)?;
            if adjacent.len() > 1 {
                split_found = true;
            }
        }

        for adjacent_id in adjacent {
            let (adjacent_key, adjacent_node) = tree
                .nodes
                .get_key_value(adjacent_id)
                .ok_or_else(|| AnnotateError::UnknownNode {
                    node: adjacent_id.to_string(),
                    referenced_by: id.to_string(),
                })?;

            if travel.is_travel(adjacent_node.stats()) {
                // Exits are not marked visited; another corridor node can hit
                // the same exit again.
                exits.push(adjacent_key.clone());
            } else {
                visited.insert(adjacent_key.as_str());
                frontier.push_back((adjacent_key.as_str(), adjacent_node));
            }
        }
    }

    let value = match exits.as_slice() {
        [only] => NodeLabel::Text(only.clone()),
        _ => candidate.clone(),
    };

    Ok(Resolution {
        value,
        exits,
        split_found,
        expanded,
    })
}

/// Annotate every eligible node with `earliestMandatoryNode`.
///
/// All values are computed before any is written, so on error the tree is
/// left exactly as it was. Existing values on eligible nodes are overwritten.
pub fn annotate(
    tree: &mut SkillTree,
    travel: &TravelStats,
) -> Result<AnnotationReport, AnnotateError> {
    let mut report = AnnotationReport::default();
    let mut values: Vec<(String, NodeLabel)> = Vec::new();

    info!("Checking {} nodes", tree.nodes.len());

    for (id, node) in &tree.nodes {
        match eligibility(tree, id, node) {
            Eligibility::Eligible => {
                let resolution = resolve(tree, id, travel)?;
                debug!(
                    node = %id,
                    value = %resolution.value,
                    exits = resolution.exits.len(),
                    split = resolution.split_found,
                    expanded = resolution.expanded,
                    "resolved"
                );
                if resolution.from_exit() {
                    report.from_exit += 1;
                } else {
                    report.from_label += 1;
                }
                values.push((id.clone(), resolution.value));
            }
            Eligibility::Root => {
                debug!(node = %id, "root node skipped");
                report.skipped_root += 1;
            }
            Eligibility::Ascendancy => {
                debug!(node = %id, "ascendancy node skipped");
                report.skipped_ascendancy += 1;
            }
            Eligibility::NoAdjacency => {
                debug!(node = %id, "node without adjacency skipped");
                report.skipped_no_adjacency += 1;
            }
        }
    }

    report.annotated = values.len();
    for (id, value) in values {
        if let Some(node) = tree.nodes.get_mut(&id) {
            node.earliest_mandatory_node = Some(value);
        }
    }

    info!(
        annotated = report.annotated,
        from_exit = report.from_exit,
        skipped = report.skipped(),
        "annotation pass complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRAVEL: &str = "+10 to Strength";

    fn add(tree: &mut SkillTree, id: &str, stats: &[&str]) {
        tree.insert_node(
            id,
            Node {
                skill: Some(NodeLabel::from(id)),
                stats: Some(stats.iter().map(|s| s.to_string()).collect()),
                inbound: Some(Vec::new()),
                outbound: Some(Vec::new()),
                ..Node::default()
            },
        );
    }

    fn link(tree: &mut SkillTree, from: &str, to: &str) {
        if let Some(n) = tree.nodes.get_mut(from) {
            n.outbound.get_or_insert_with(Vec::new).push(to.to_string());
        }
        if let Some(n) = tree.nodes.get_mut(to) {
            n.inbound.get_or_insert_with(Vec::new).push(from.to_string());
        }
    }

    #[test]
    fn test_candidate_freezes_at_deep_split() {
        let mut tree = SkillTree::new("Default");
        for id in ["a", "b", "c", "d", "e"] {
            add(&mut tree, id, &[]);
        }
        link(&mut tree, "a", "b");
        link(&mut tree, "b", "c");
        link(&mut tree, "c", "d");
        link(&mut tree, "c", "e");

        let r = resolve(&tree, "a", &TravelStats::default()).unwrap();
        assert_eq!(r.value, NodeLabel::from("c"));
        assert!(r.split_found);
        assert!(r.exits.is_empty());
        assert_eq!(r.expanded, 5);
    }

    #[test]
    fn test_no_split_takes_last_dequeued() {
        let mut tree = SkillTree::new("Default");
        for id in ["a", "b", "c"] {
            add(&mut tree, id, &[]);
        }
        link(&mut tree, "a", "b");
        link(&mut tree, "b", "c");

        let r = resolve(&tree, "a", &TravelStats::default()).unwrap();
        assert_eq!(r.value, NodeLabel::from("c"));
        assert!(!r.split_found);
    }

    #[test]
    fn test_isolated_node_resolves_to_itself() {
        let mut tree = SkillTree::new("Default");
        add(&mut tree, "a", &[]);

        let r = resolve(&tree, "a", &TravelStats::default()).unwrap();
        assert_eq!(r.value, NodeLabel::from("a"));
        assert_eq!(r.expanded, 1);
    }

    #[test]
    fn test_same_exit_reached_twice_counts_twice() {
        let mut tree = SkillTree::new("Default");
        for id in ["a", "b", "c"] {
            add(&mut tree, id, &[]);
        }
        add(&mut tree, "x", &[TRAVEL]);
        link(&mut tree, "a", "b");
        link(&mut tree, "a", "c");
        link(&mut tree, "b", "x");
        link(&mut tree, "c", "x");

        let r = resolve(&tree, "a", &TravelStats::default()).unwrap();
        assert_eq!(r.exits, vec!["x".to_string(), "x".to_string()]);
        assert_eq!(r.value, NodeLabel::from("a"));
        assert!(!r.from_exit());
    }

    #[test]
    fn test_walk_does_not_pass_exit() {
        let mut tree = SkillTree::new("Default");
        add(&mut tree, "a", &[]);
        add(&mut tree, "x", &[TRAVEL]);
        add(&mut tree, "beyond", &[TRAVEL]);
        link(&mut tree, "a", "x");
        link(&mut tree, "x", "beyond");

        let r = resolve(&tree, "a", &TravelStats::default()).unwrap();
        assert_eq!(r.exits, vec!["x".to_string()]);
        assert_eq!(r.value, NodeLabel::from("x"));
    }

    #[test]
    fn test_exit_value_is_node_id_not_label() {
        let mut tree = SkillTree::new("Default");
        add(&mut tree, "a", &[]);
        add(&mut tree, "26725", &[TRAVEL]);
        tree.nodes.get_mut("26725").unwrap().skill = Some(NodeLabel::Number(26725));
        link(&mut tree, "a", "26725");

        let r = resolve(&tree, "a", &TravelStats::default()).unwrap();
        assert_eq!(r.value, NodeLabel::Text("26725".to_string()));
    }

    #[test]
    fn test_missing_label_after_split_is_not_needed() {
        let mut tree = SkillTree::new("Default");
        for id in ["a", "b", "c"] {
            add(&mut tree, id, &[]);
        }
        link(&mut tree, "a", "b");
        link(&mut tree, "a", "c");
        tree.nodes.get_mut("b").unwrap().skill = None;

        let r = resolve(&tree, "a", &TravelStats::default()).unwrap();
        assert_eq!(r.value, NodeLabel::from("a"));
    }

    #[test]
    fn test_missing_label_in_corridor_fails() {
        let mut tree = SkillTree::new("Default");
        for id in ["a", "b"] {
            add(&mut tree, id, &[]);
        }
        link(&mut tree, "a", "b");
        tree.nodes.get_mut("b").unwrap().skill = None;

        let err = resolve(&tree, "a", &TravelStats::default()).unwrap_err();
        assert_eq!(
            err,
            AnnotateError::MissingLabel {
                node: "b".to_string(),
                start: "a".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_start() {
        let tree = SkillTree::new("Default");
        let err = resolve(&tree, "nope", &TravelStats::default()).unwrap_err();
        assert!(matches!(err, AnnotateError::UnknownStart { .. }));
    }

    #[test]
    fn test_report_counts() {
        let mut tree = SkillTree::new("Default");
        add(&mut tree, ROOT_NODE_ID, &[]);
        add(&mut tree, "a", &[]);
        add(&mut tree, "x", &[TRAVEL]);
        add(&mut tree, "asc", &[]);
        tree.nodes.get_mut("asc").unwrap().ascendancy_name = Some("Slayer".to_string());
        tree.insert_node(
            "lonely",
            Node {
                skill: Some(NodeLabel::from("lonely")),
                ..Node::default()
            },
        );
        link(&mut tree, "a", "x");

        let report = annotate(&mut tree, &TravelStats::default()).unwrap();
        assert_eq!(report.skipped_root, 1);
        assert_eq!(report.skipped_ascendancy, 1);
        assert_eq!(report.skipped_no_adjacency, 1);
        assert_eq!(report.skipped(), 3);
        // "a" resolves to the exit "x"; "x" walks back to "a" and stops there.
        assert_eq!(report.annotated, 2);
        assert_eq!(report.from_exit, 1);
        assert_eq!(report.from_label, 1);
    }
}
