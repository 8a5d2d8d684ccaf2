//! The mergeable error tree and its merge primitives.
//!
//! [`ErrorNode`] is the central entity of the crate: a tree node carrying a
//! message, a kind-name classification, optional sibling errors, and
//! field-keyed child errors. Trees are assembled exclusively through
//! [`combine`](ErrorNode::combine), [`combine_at`](ErrorNode::combine_at),
//! and [`rebase`](ErrorNode::rebase).

use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use stillwater::prelude::*;

use crate::error::kind;
use crate::path::{is_valid_field_name, FieldPath};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A mergeable, hierarchical error value.
///
/// Every node carries:
/// - a `kind` name plus `status_code` for classification,
/// - a `message` and optionally a `safe_message` fit to show end users,
/// - a `generic` flag marking a placeholder superseded by the first
///   non-generic node combined with it,
/// - ordered sibling `errors` and field-keyed child `fields`.
///
/// Nodes are deduplicated by *identity*, never by structural equality:
/// combining the same node twice is a no-op, while two distinct nodes with
/// identical messages are both kept. Cloning preserves identity — a clone is
/// "the same error" for deduplication purposes.
///
/// # Example
///
/// ```rust
/// use trellis::{kind, ErrorNode};
///
/// let base = ErrorNode::new(kind::OBJECT_FIELDS, "Please check the following values:").generic();
/// let specific = ErrorNode::invalid(kind::REQUIRED, "Value is required.");
/// let marker = specific.clone();
///
/// // The first specific error supersedes the generic base, keeping it as history.
/// let merged = base.combine(specific);
/// assert!(merged.same(&marker));
/// assert_eq!(merged.errors()[0].kind(), kind::OBJECT_FIELDS);
/// ```
#[derive(Debug, Clone)]
pub struct ErrorNode {
    id: u64,
    kind: String,
    message: String,
    safe_message: Option<String>,
    friendly_name: Option<String>,
    status_code: u16,
    generic: bool,
    errors: Vec<ErrorNode>,
    fields: IndexMap<FieldPath, ErrorNode>,
}

impl ErrorNode {
    /// Creates a new error node with the given kind and message.
    ///
    /// The status code defaults to 500 and the message is not marked safe.
    /// Use the builder methods to adjust either.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: next_id(),
            kind: kind.into(),
            message: message.into(),
            safe_message: None,
            friendly_name: None,
            status_code: 500,
            generic: false,
            errors: Vec::new(),
            fields: IndexMap::new(),
        }
    }

    /// Creates a validation error node: status 400, message marked safe.
    ///
    /// This is the constructor the validator engine uses for every failure
    /// it reports.
    pub fn invalid(kind: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            safe_message: Some(message.clone()),
            status_code: 400,
            ..Self::new(kind, message)
        }
    }

    /// Creates a 400 user error with a safe message.
    pub fn user_error(message: impl Into<String>) -> Self {
        Self::invalid(kind::USER_ERROR, message)
    }

    /// Creates a 401 authorization error.
    pub fn auth_error(message: impl Into<String>) -> Self {
        Self::new(kind::AUTH_ERROR, message).with_status(401)
    }

    /// Creates a 404 not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(kind::NOT_FOUND, message).with_status(404)
    }

    /// Creates a 500 server error whose message is safe to show the user.
    pub fn notify_user(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(kind::NOTIFY_USER, message.clone()).with_safe_message(message)
    }

    /// Creates a 500 developer-misconfiguration error.
    pub fn dev_error(message: impl Into<String>) -> Self {
        Self::new(kind::DEV_ERROR, message)
    }

    /// Creates a 500 server error.
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(kind::SERVER_ERROR, message)
    }

    /// Sets the status code and returns self for chaining.
    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }

    /// Sets the safe message and returns self for chaining.
    pub fn with_safe_message(mut self, message: impl Into<String>) -> Self {
        self.safe_message = Some(message.into());
        self
    }

    /// Sets the friendly display name and returns self for chaining.
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    /// Marks this node as a generic placeholder and returns self.
    ///
    /// A generic node is superseded by the first non-generic node combined
    /// with it (the generic node survives as history in `errors`).
    pub fn generic(mut self) -> Self {
        self.generic = true;
        self
    }

    /// Returns the kind name.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the message safe to expose to end users, if one was set.
    pub fn safe_message(&self) -> Option<&str> {
        self.safe_message.as_deref()
    }

    /// Returns the friendly display name, if one was set.
    pub fn friendly_name(&self) -> Option<&str> {
        self.friendly_name.as_deref()
    }

    /// Returns the status code.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Returns true if this node is a generic placeholder.
    pub fn is_generic(&self) -> bool {
        self.generic
    }

    /// Returns the ordered sibling errors.
    pub fn errors(&self) -> &[ErrorNode] {
        &self.errors
    }

    /// Returns the ordered field-keyed child errors.
    pub fn fields(&self) -> &IndexMap<FieldPath, ErrorNode> {
        &self.fields
    }

    /// Returns true if `other` is the same error as `self`.
    ///
    /// Identity survives cloning, so a node compares equal to its clones.
    /// Two independently constructed nodes are never the same, even with
    /// identical content.
    pub fn same(&self, other: &ErrorNode) -> bool {
        self.id == other.id
    }

    /// Merges `addition` into this node as a sibling and returns the result.
    ///
    /// - Combining a node with itself is a no-op.
    /// - A non-generic addition supersedes a generic base via
    ///   [`rebase`](ErrorNode::rebase): the addition becomes the returned
    ///   root, the base loses its generic status and survives as the first
    ///   sibling.
    /// - Otherwise the addition is appended to `errors` unless the same
    ///   node is already present.
    /// - The addition's own `errors` and `fields` are then folded into the
    ///   base, preserving relative order: existing content first.
    pub fn combine(mut self, addition: ErrorNode) -> ErrorNode {
        if self.id == addition.id {
            return self;
        }

        if !addition.generic {
            if self.generic {
                self.generic = false;
                return self.rebase(addition);
            }
            if !self.errors.iter().any(|e| e.id == addition.id) {
                self.errors.push(addition.clone());
            }
        }

        for child in &addition.errors {
            self = self.combine(child.clone());
        }
        for (path, child) in &addition.fields {
            self = self.combine_path(path.clone(), child.clone());
        }
        self
    }

    /// Merges `addition` into this node under the given field name.
    ///
    /// If no error exists at `field`, the addition is stored there. A
    /// non-generic addition supersedes an existing generic entry; otherwise
    /// the two are sibling-merged at that slot, so duplicate contributions
    /// to a field become siblings of each other. Nested `fields` carried by
    /// the addition are additionally flattened into dotted paths at this
    /// node (`field.subfield`).
    ///
    /// # Panics
    ///
    /// Panics if `field` is empty, contains a period, or begins with an
    /// underscore (the reserved identity fields `_id` and `__v` excepted).
    /// These are structurally invalid names for a single merge step.
    pub fn combine_at(self, field: &str, addition: ErrorNode) -> ErrorNode {
        if !is_valid_field_name(field) {
            panic!(
                "ErrorNode::combine_at() field cannot be empty, begin with an underscore, \
                 or contain a period: {:?}",
                field
            );
        }
        self.combine_path(FieldPath::field(field), addition)
    }

    /// Field-keyed merge at an already-built path. Paths produced by
    /// flattening bypass the single-step name checks in `combine_at`.
    pub(crate) fn combine_path(mut self, path: FieldPath, addition: ErrorNode) -> ErrorNode {
        if self.id == addition.id {
            return self;
        }

        // The addition keeps its nested fields; they are also flattened
        // into dotted paths at this node, mirrored before the addition is
        // moved into its slot.
        let nested: Vec<(FieldPath, ErrorNode)> = addition
            .fields
            .iter()
            .map(|(sub, node)| (path.join(sub), node.clone()))
            .collect();

        if let Some(slot) = self.fields.get_mut(&path) {
            let existing = std::mem::replace(slot, ErrorNode::detached());
            *slot = if existing.generic && !addition.generic {
                let mut existing = existing;
                existing.generic = false;
                existing.rebase(addition)
            } else {
                existing.combine(addition)
            };
        } else {
            self.fields.insert(path, addition);
        }

        for (sub, node) in nested {
            self = self.combine_path(sub, node);
        }
        self
    }

    /// Promotes `new_root` to the root of the tree, keeping this node's
    /// history, and returns `new_root`.
    ///
    /// The new root's `errors` and `fields` are detached, the old base is
    /// combined into the now-childless root as a sibling (a generic base is
    /// folded in without being appended itself), and the saved children are
    /// re-attached: siblings concatenated after the combine result's own,
    /// fields re-added one by one so that entries already present on the
    /// root take precedence over re-added generic ones.
    pub fn rebase(self, mut new_root: ErrorNode) -> ErrorNode {
        let saved_errors = std::mem::take(&mut new_root.errors);
        let saved_fields = std::mem::take(&mut new_root.fields);

        let mut root = new_root.combine(self);

        root.errors.extend(saved_errors);
        for (path, node) in saved_fields {
            root = root.combine_path(path, node);
        }
        root
    }

    // Throwaway node used to take ownership out of a field slot.
    fn detached() -> Self {
        Self::new("", "")
    }
}

impl Display for ErrorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "[no message]")?;
        } else {
            write!(f, "{}", self.message)?;
        }
        for (path, child) in &self.fields {
            let label = match child.friendly_name.as_deref() {
                Some(name) => name.to_string(),
                None => path.to_string(),
            };
            let message = child.safe_message.as_deref().unwrap_or(&child.message);
            write!(f, "\n\t{}: {}", label, message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorNode {}

/// Sibling merge is the associative combine operation for error trees,
/// which lets `ErrorNode` stand directly as the failure type of
/// `stillwater::Validation`.
impl Semigroup for ErrorNode {
    fn combine(self, other: Self) -> Self {
        ErrorNode::combine(self, other)
    }
}

// ErrorNode is Send + Sync since all fields are owned types. This is
// automatically derived, but we add these assertions to ensure it remains
// true if the types change.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ErrorNode>();
    assert_sync::<ErrorNode>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let node = ErrorNode::new(kind::SERVER_ERROR, "boom");
        assert_eq!(node.kind(), kind::SERVER_ERROR);
        assert_eq!(node.message(), "boom");
        assert_eq!(node.status_code(), 500);
        assert!(node.safe_message().is_none());
        assert!(!node.is_generic());
        assert!(node.errors().is_empty());
        assert!(node.fields().is_empty());
    }

    #[test]
    fn test_invalid_is_safe_400() {
        let node = ErrorNode::invalid(kind::REQUIRED, "Value is required.");
        assert_eq!(node.status_code(), 400);
        assert_eq!(node.safe_message(), Some("Value is required."));
    }

    #[test]
    fn test_application_kinds() {
        assert_eq!(ErrorNode::auth_error("no").status_code(), 401);
        assert_eq!(ErrorNode::not_found("gone").status_code(), 404);
        assert_eq!(ErrorNode::user_error("bad").status_code(), 400);
        assert_eq!(ErrorNode::dev_error("oops").status_code(), 500);
        let notify = ErrorNode::notify_user("try later");
        assert_eq!(notify.status_code(), 500);
        assert_eq!(notify.safe_message(), Some("try later"));
    }

    #[test]
    fn test_identity_survives_clone() {
        let node = ErrorNode::invalid(kind::ENUM, "Invalid value.");
        let clone = node.clone();
        assert!(node.same(&clone));

        let other = ErrorNode::invalid(kind::ENUM, "Invalid value.");
        assert!(!node.same(&other));
    }

    #[test]
    fn test_combine_self_is_noop() {
        let node = ErrorNode::invalid(kind::ENUM, "Invalid value.");
        let clone = node.clone();
        let merged = node.combine(clone);
        assert!(merged.errors().is_empty());
    }

    #[test]
    fn test_combine_appends_sibling() {
        let base = ErrorNode::invalid(kind::REQUIRED, "Value is required.");
        let addition = ErrorNode::invalid(kind::ENUM, "Invalid value.");
        let tag = addition.clone();

        let merged = base.combine(addition);
        assert_eq!(merged.errors().len(), 1);
        assert!(merged.errors()[0].same(&tag));
    }

    #[test]
    fn test_combine_dedupes_by_identity_not_structure() {
        let base = ErrorNode::invalid(kind::REQUIRED, "Value is required.");
        let a = ErrorNode::invalid(kind::ENUM, "Invalid value.");
        let b = ErrorNode::invalid(kind::ENUM, "Invalid value.");

        // Same node twice: one entry. Distinct twins: two entries.
        let merged = base.combine(a.clone()).combine(a).combine(b);
        assert_eq!(merged.errors().len(), 2);
    }

    #[test]
    fn test_generic_addition_contributes_children_only() {
        let base = ErrorNode::invalid(kind::REQUIRED, "Value is required.");
        let child = ErrorNode::invalid(kind::ENUM, "Invalid value.");
        let tag = child.clone();
        let generic = ErrorNode::new(kind::USER_ERROR, "check values")
            .generic()
            .combine_at("color", child);

        let merged = base.combine(generic);
        // The generic node itself is not appended as a sibling...
        assert!(merged.errors().is_empty());
        // ...but its field children are folded in.
        let at_color = merged
            .fields()
            .get(&crate::FieldPath::field("color"))
            .unwrap();
        assert!(at_color.same(&tag));
    }

    #[test]
    fn test_combine_at_rejects_bad_names_by_panicking() {
        let result = std::panic::catch_unwind(|| {
            ErrorNode::invalid(kind::REQUIRED, "x")
                .combine_at("a.b", ErrorNode::invalid(kind::ENUM, "y"))
        });
        assert!(result.is_err());

        let result = std::panic::catch_unwind(|| {
            ErrorNode::invalid(kind::REQUIRED, "x")
                .combine_at("_secret", ErrorNode::invalid(kind::ENUM, "y"))
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_combine_at_allows_reserved_identity_fields() {
        let merged = ErrorNode::invalid(kind::REQUIRED, "x")
            .combine_at("_id", ErrorNode::invalid(kind::ENUM, "y"))
            .combine_at("__v", ErrorNode::invalid(kind::ENUM, "z"));
        assert_eq!(merged.fields().len(), 2);
    }

    #[test]
    fn test_display_lists_fields_with_safe_messages() {
        let child = ErrorNode::invalid(kind::REQUIRED, "Value is required.")
            .with_friendly_name("First Name");
        let tree = ErrorNode::invalid(kind::OBJECT_FIELDS, "Please check the following values:")
            .combine_at("first_name", child);

        let rendered = tree.to_string();
        assert!(rendered.starts_with("Please check the following values:"));
        assert!(rendered.contains("\n\tFirst Name: Value is required."));
    }

    #[test]
    fn test_display_no_message() {
        let node = ErrorNode::new(kind::SERVER_ERROR, "");
        assert_eq!(node.to_string(), "[no message]");
    }

    #[test]
    fn test_semigroup_combine_is_sibling_merge() {
        let a = ErrorNode::invalid(kind::REQUIRED, "a");
        let b = ErrorNode::invalid(kind::ENUM, "b");
        let merged = Semigroup::combine(a, b);
        assert_eq!(merged.errors().len(), 1);
    }
}
