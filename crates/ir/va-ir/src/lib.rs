//! Typed intermediate representation for V
//!
//! A lowered file is a strictly owned tree of immutable records. Each record
//! carries a [`NodeId`] (the key analysis passes join on) and the
//! [`va_syntax::SyntaxNodeId`] it was lowered from (for spans and text).
//! There are no parent pointers; see `va-lower` for parent and position
//! queries.

mod id;
mod node;
mod visitor;

pub use id::{IdGen, NodeId};
pub use node::*;
pub use visitor::{Accept, Visitor};

/// Identities of every node reachable from `node`, in traversal order
pub fn collect_ids<T: Accept>(node: &T) -> Vec<NodeId> {
    let mut ids = Vec::new();
    node.accept(&mut |visited: NodeRef<'_>| {
        ids.push(visited.id());
        true
    });
    ids
}

/// Pre-order kind names separated by spaces, for snapshot tests
pub fn kinds<T: Accept>(node: &T) -> String {
    let mut out = Vec::new();
    node.accept(&mut |visited: NodeRef<'_>| {
        out.push(visited.kind().as_str());
        true
    });
    out.join(" ")
}
