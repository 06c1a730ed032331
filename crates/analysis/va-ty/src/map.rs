//! Inferred type labels

use rustc_hash::FxHashMap;
use va_ir::NodeId;

/// Type label per node identity
///
/// Labels are type names, not structured types. A node without a label is
/// not an error; callers decide on a fallback with [`TypeMap::label_or`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TypeMap {
    labels: FxHashMap<NodeId, String>,
}

impl TypeMap {
    /// Conventional fallback for nodes without a label
    pub const UNKNOWN: &'static str = "unknown";

    /// Map with no labels
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Label of `id`, if inferred
    pub fn get(&self, id: NodeId) -> Option<&str> {
        self.labels.get(&id).map(String::as_str)
    }

    /// Label of `id`, or `default`
    pub fn label_or<'map>(&'map self, id: NodeId, default: &'map str) -> &'map str {
        self.get(id).unwrap_or(default)
    }

    /// Whether `id` has a label
    pub fn contains(&self, id: NodeId) -> bool {
        self.labels.contains_key(&id)
    }

    /// Number of labeled nodes
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether nothing was labeled
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub(crate) fn insert(&mut self, id: NodeId, label: impl Into<String>) {
        self.labels.insert(id, label.into());
    }

    /// Copies the label of `from` onto `to`, if `from` has one
    pub(crate) fn copy(&mut self, from: NodeId, to: NodeId) {
        if let Some(label) = self.labels.get(&from).cloned() {
            self.labels.insert(to, label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_or() {
        let mut map = TypeMap::new();
        map.insert(NodeId(3), "int");
        map.copy(NodeId(3), NodeId(4));
        map.copy(NodeId(9), NodeId(5));

        assert_eq!(map.get(NodeId(4)), Some("int"));
        assert_eq!(map.label_or(NodeId(5), TypeMap::UNKNOWN), "unknown");
        assert_eq!(map.len(), 2);
    }
}
