//! Message extraction from error trees.
//!
//! [`messages`] produces a read-only mirror of an [`ErrorNode`] tree where
//! each node exposes only its display string, and flattened dotted paths are
//! expanded back into nested children. `messages(&err)` on an object error
//! with a field at `addresses.0.zip` yields a tree navigable as
//! `tree.get("addresses")` → `get("0")` → `get("zip")`.

use std::fmt::{self, Display};

use indexmap::IndexMap;

use crate::error::node::ErrorNode;
use crate::path::FieldPath;

/// Message used for intermediate path levels that have no error of their own.
const PLACEHOLDER: &str = "Please check your input:";

/// A read-only message mirror of an error tree node.
///
/// String coercion (`Display` / `to_string`) yields the node's message;
/// [`get`](MessageTree::get) navigates to named children.
#[derive(Debug, Clone)]
pub struct MessageTree {
    message: String,
    children: IndexMap<String, MessageTree>,
}

impl MessageTree {
    fn leaf(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            children: IndexMap::new(),
        }
    }

    /// Returns the display message for this node.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the child at `key`, if any.
    pub fn get(&self, key: &str) -> Option<&MessageTree> {
        self.children.get(key)
    }

    /// Returns the node at a dotted path below this one, if every segment exists.
    pub fn at(&self, path: &str) -> Option<&MessageTree> {
        path.split('.')
            .try_fold(self, |node, segment| node.get(segment))
    }

    /// Returns an iterator over the named children in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MessageTree)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if this node has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Display for MessageTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "[unknown error]")
        } else {
            write!(f, "{}", self.message)
        }
    }
}

/// Builds a [`MessageTree`] mirror of an error tree.
///
/// Dotted field paths are expanded into nested children. When a path level
/// has its own entry in the error's flat field map, that entry's message is
/// used for the level *regardless of insertion order* — a parent-level
/// message always wins over a conflicting child-level one. Levels without an
/// entry get a placeholder message. The first message installed at a slot is
/// kept.
pub fn messages(error: &ErrorNode) -> MessageTree {
    let mut root = MessageTree::leaf(error.message());

    for (path, node) in error.fields() {
        let segments: Vec<&str> = path.segments().collect();
        let mut parent = &mut root;
        let mut prefix: Option<FieldPath> = None;

        for segment in &segments[..segments.len() - 1] {
            let prefix_path = match prefix {
                Some(p) => p.push(*segment),
                None => FieldPath::field(*segment),
            };
            if !parent.children.contains_key(*segment) {
                // Prefer the parent-level entry from the flat map, whatever
                // order it arrived in.
                let level = match error.fields().get(&prefix_path) {
                    Some(own) => MessageTree::leaf(own.message()),
                    None => MessageTree::leaf(PLACEHOLDER),
                };
                parent.children.insert(segment.to_string(), level);
            }
            parent = parent.children.get_mut(*segment).expect("just inserted");
            prefix = Some(prefix_path);
        }

        let last = segments[segments.len() - 1];
        if !parent.children.contains_key(last) {
            // The node's own nested fields are not expanded here; they are
            // already flattened into the parent's field map.
            parent
                .children
                .insert(last.to_string(), MessageTree::leaf(node.message()));
        }
    }

    root
}
