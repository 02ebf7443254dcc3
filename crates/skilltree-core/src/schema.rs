//! JSON (de)serialization for skill tree documents.

use crate::graph::SkillTree;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Indent width used by the game's export tooling.
pub const DEFAULT_INDENT: usize = 4;

/// Serialize a tree to pretty-printed JSON with the given indent width.
pub fn to_json(tree: &SkillTree, indent: usize) -> Result<String> {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    tree.serialize(&mut ser)
        .context("failed to serialize skill tree to JSON")?;
    String::from_utf8(buf).context("serialized skill tree is not valid UTF-8")
}

/// Deserialize a tree from a JSON string.
pub fn from_json(json: &str) -> Result<SkillTree> {
    serde_json::from_str(json).context("failed to deserialize skill tree from JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeLabel;

    const SAMPLE: &str = r#"{
        "tree": "Default",
        "classes": [{"name": "Scion"}],
        "nodes": {
            "root": {"group": 0, "out": ["100"], "in": []},
            "100": {
                "skill": 100,
                "name": "Start",
                "stats": [],
                "in": ["root"],
                "orbit": 2
            }
        },
        "constants": {"orbitRadii": [0, 82, 162]}
    }"#;

    #[test]
    fn test_unknown_fields_survive_roundtrip() {
        let tree = from_json(SAMPLE).unwrap();
        assert_eq!(tree.tree, "Default");
        assert!(tree.extra.contains_key("classes"));
        assert!(tree.extra.contains_key("constants"));

        let node = &tree.nodes["100"];
        assert_eq!(node.skill, Some(NodeLabel::Number(100)));
        assert_eq!(node.extra["name"], "Start");
        assert!(node.outbound.is_none());

        let json = to_json(&tree, DEFAULT_INDENT).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["constants"]["orbitRadii"][2], 162);
        assert_eq!(value["nodes"]["100"]["orbit"], 2);
        assert_eq!(value["nodes"]["root"]["in"], serde_json::json!([]));
        assert!(value["nodes"]["100"].get("out").is_none());
        assert!(value["nodes"]["100"].get("earliestMandatoryNode").is_none());
    }

    #[test]
    fn test_indent_width() {
        let tree = from_json(r#"{"tree": "Atlas", "nodes": {}}"#).unwrap();
        let json = to_json(&tree, 4).unwrap();
        assert!(json.contains("\n    \"tree\": \"Atlas\""));
        let json = to_json(&tree, 2).unwrap();
        assert!(json.contains("\n  \"tree\": \"Atlas\""));
    }

    #[test]
    fn test_missing_tree_tag_is_rejected() {
        assert!(from_json(r#"{"nodes": {}}"#).is_err());
    }
}
