//! Node identities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an IR node, the join key between analysis passes
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Reserved identity of the null node; never handed out by [`IdGen`]
    pub const NULL: Self = Self(0);

    /// Whether this is the reserved null identity
    pub fn is_null(self) -> bool {
        self == Self::NULL
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

/// Monotonic identity counter owned by one lowering run
#[derive(Debug, Clone)]
pub struct IdGen {
    next: u32,
}

impl IdGen {
    /// Fresh counter whose first identity follows the null node
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Counter that continues after `issued` identities handed out elsewhere
    pub fn resume(issued: u32) -> Self {
        Self { next: issued + 1 }
    }

    /// Hands out the next identity; each call returns a fresh one
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    /// Number of identities handed out so far
    pub fn issued(&self) -> u32 {
        self.next - 1
    }
}

impl Default for IdGen {
    fn default() -> Self {
        Self::new()
    }
}
