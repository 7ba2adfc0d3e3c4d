//! Hand-authored tutorial tree.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One page in the narrative documentation tree.
///
/// Every node has exactly one parent; the loader rejects trees that violate
/// this, so traversal is guaranteed to terminate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TutorialNode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    /// Markdown body.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub children: Vec<TutorialNode>,
}

/// Errors raised while loading a tutorial tree.
#[derive(Debug, thiserror::Error)]
pub enum TutorialError {
    #[error("invalid tutorial tree: {0}")]
    Invalid(String),

    #[error("tutorial {0:?} appears under more than one parent")]
    DuplicateName(String),
}

impl TutorialNode {
    /// An empty root with no pages under it.
    pub fn empty_root() -> Self {
        Self::default()
    }

    /// Load a tree from JSON. Accepts either a single root node or a list
    /// of top-level tutorials, which gets wrapped in a synthetic root.
    pub fn root_from_json(text: &str) -> Result<Self, TutorialError> {
        let root = match serde_json::from_str::<TutorialNode>(text) {
            Ok(node) => node,
            Err(_) => {
                let children = serde_json::from_str::<Vec<TutorialNode>>(text)
                    .map_err(|e| TutorialError::Invalid(e.to_string()))?;
                TutorialNode {
                    children,
                    ..TutorialNode::default()
                }
            }
        };
        root.validate()?;
        Ok(root)
    }

    /// Reject a node reachable under two parents.
    pub fn validate(&self) -> Result<(), TutorialError> {
        fn walk<'a>(
            node: &'a TutorialNode,
            seen: &mut HashSet<&'a str>,
        ) -> Result<(), TutorialError> {
            for child in &node.children {
                if !seen.insert(child.name.as_str()) {
                    return Err(TutorialError::DuplicateName(child.name.clone()));
                }
                walk(child, seen)?;
            }
            Ok(())
        }

        let mut seen = HashSet::new();
        walk(self, &mut seen)
    }
}
