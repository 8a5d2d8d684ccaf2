//! The error node model.
//!
//! This module provides [`ErrorNode`] — the mergeable error tree — together
//! with the kind-name constants used to classify nodes and the
//! [`messages`] extraction that mirrors a tree as display strings.

pub mod kind;
mod messages;
mod node;

pub use messages::{messages, MessageTree};
pub use node::ErrorNode;
