//! Catalog tree
//!
//! The library's table of contents is a tree of categories whose leaves are
//! works. Raw trees arrive as JSON from the corpus; parsing them into
//! [`CatalogNode`] drops every node that is neither a category with contents
//! nor a leaf with a title, logging each dropped node.

use serde_json::{Map, Value};

/// A node of the catalog tree
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogNode {
    /// A category with child nodes
    Category {
        /// Category name, matched against category paths
        name: Option<String>,
        /// All other fields of the node, passed through to output
        attributes: Map<String, Value>,
        contents: Vec<CatalogNode>,
    },

    /// A work
    Leaf {
        title: String,
        /// All fields of the node, passed through to output
        attributes: Map<String, Value>,
    },
}

impl CatalogNode {
    /// Parses a raw tree (a JSON array of nodes), dropping malformed nodes
    pub fn parse_tree(raw: &Value) -> Vec<CatalogNode> {
        match raw {
            Value::Array(items) => items.iter().filter_map(CatalogNode::parse).collect(),
            other => {
                tracing::warn!(kind = %json_kind(other), "Catalog tree is not a list, ignoring it");
                Vec::new()
            }
        }
    }

    fn parse(raw: &Value) -> Option<CatalogNode> {
        let Some(object) = raw.as_object() else {
            tracing::warn!(node = %raw, "Dropping catalog node that is not an object");
            return None;
        };

        if let Some(Value::Array(children)) = object.get("contents") {
            let mut attributes = object.clone();
            attributes.remove("contents");
            let name = object
                .get("category")
                .and_then(Value::as_str)
                .map(str::to_string);
            let contents = children.iter().filter_map(CatalogNode::parse).collect();
            return Some(CatalogNode::Category {
                name,
                attributes,
                contents,
            });
        }

        if let Some(title) = object.get("title").and_then(Value::as_str) {
            return Some(CatalogNode::Leaf {
                title: title.to_string(),
                attributes: object.clone(),
            });
        }

        tracing::warn!(
            category = object.get("category").and_then(serde_json::Value::as_str).unwrap_or(""),
            "Dropping catalog node without contents or title"
        );
        None
    }

    /// Converts the node back to JSON
    pub fn to_value(&self) -> Value {
        match self {
            CatalogNode::Category {
                attributes,
                contents,
                ..
            } => {
                let mut object = attributes.clone();
                object.insert("contents".to_string(), tree_to_value(contents));
                Value::Object(object)
            }
            CatalogNode::Leaf { attributes, .. } => Value::Object(attributes.clone()),
        }
    }

    /// Category name, if this is a category
    pub fn category_name(&self) -> Option<&str> {
        match self {
            CatalogNode::Category { name, .. } => name.as_deref(),
            CatalogNode::Leaf { .. } => None,
        }
    }

    /// A string attribute of the node
    pub fn attribute(&self, key: &str) -> Option<&str> {
        let attributes = match self {
            CatalogNode::Category { attributes, .. } => attributes,
            CatalogNode::Leaf { attributes, .. } => attributes,
        };
        attributes.get(key).and_then(Value::as_str)
    }
}

/// Converts a parsed tree back to a JSON array
pub fn tree_to_value(nodes: &[CatalogNode]) -> Value {
    Value::Array(nodes.iter().map(CatalogNode::to_value).collect())
}

/// Flattens a tree into the titles of all its leaves, in tree order
pub fn flatten_titles(nodes: &[CatalogNode]) -> Vec<String> {
    let mut titles = Vec::new();
    collect_titles(nodes, &mut titles);
    titles
}

fn collect_titles(nodes: &[CatalogNode], titles: &mut Vec<String>) {
    for node in nodes {
        match node {
            CatalogNode::Category { contents, .. } => collect_titles(contents, titles),
            CatalogNode::Leaf { title, .. } => titles.push(title.clone()),
        }
    }
}

/// Titles of all works under a category path
///
/// Each path element must match a category name one level deeper; once the
/// path is exhausted every leaf below is collected. An empty path selects
/// the whole tree.
pub fn titles_in_category(nodes: &[CatalogNode], path: &[&str]) -> Vec<String> {
    let mut titles = Vec::new();
    for node in nodes {
        match node {
            CatalogNode::Category { name, contents, .. } => {
                match path.split_first() {
                    None => titles.extend(titles_in_category(contents, path)),
                    Some((head, rest)) if name.as_deref() == Some(*head) => {
                        titles.extend(titles_in_category(contents, rest))
                    }
                    Some(_) => {}
                }
            }
            CatalogNode::Leaf { title, .. } if path.is_empty() => titles.push(title.clone()),
            CatalogNode::Leaf { .. } => {}
        }
    }
    titles
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!([
            {"category": "Tanakh", "heCategory": "תנ״ך", "contents": [
                {"category": "Torah", "contents": [
                    {"title": "Genesis", "heTitle": "בראשית"},
                    {"title": "Exodus"}
                ]},
                {"category": "Commentary", "contents": [
                    {"category": "Rashi", "contents": [{"title": "Rashi on Genesis"}]}
                ]},
                {"category": "Empty"}
            ]},
            {"category": "Talmud", "contents": [{"title": "Berakhot"}]},
            {"heTitle": "orphan"}
        ])
    }

    #[test]
    fn test_parse_drops_malformed_nodes() {
        let tree = CatalogNode::parse_tree(&sample());
        assert_eq!(tree.len(), 2);

        let value = tree_to_value(&tree);
        let tanakh = value[0]["contents"].as_array().unwrap();
        assert_eq!(tanakh.len(), 2);
        assert_eq!(value[0]["heCategory"], "תנ״ך");
        assert_eq!(tanakh[0]["contents"][0]["heTitle"], "בראשית");
    }

    #[test]
    fn test_flatten_titles() {
        let tree = CatalogNode::parse_tree(&sample());
        assert_eq!(
            flatten_titles(&tree),
            vec!["Genesis", "Exodus", "Rashi on Genesis", "Berakhot"]
        );
    }

    #[test]
    fn test_titles_in_category() {
        let tree = CatalogNode::parse_tree(&sample());

        assert_eq!(
            titles_in_category(&tree, &["Tanakh", "Torah"]),
            vec!["Genesis", "Exodus"]
        );
        assert_eq!(
            titles_in_category(&tree, &["Tanakh", "Commentary", "Rashi"]),
            vec!["Rashi on Genesis"]
        );
        assert_eq!(titles_in_category(&tree, &["Talmud"]), vec!["Berakhot"]);
        assert!(titles_in_category(&tree, &["Midrash"]).is_empty());
        assert_eq!(titles_in_category(&tree, &[]).len(), 4);
    }

    #[test]
    fn test_non_array_tree_is_empty() {
        assert!(CatalogNode::parse_tree(&json!({"title": "x"})).is_empty());
    }
}
