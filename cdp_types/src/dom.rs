use serde::{Deserialize, Serialize};

/// Unique DOM node identifier, scoped to the `DOM` domain's own bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub const IDENTIFIER: &'static str = "DOM.NodeId";

    pub fn new(id: u32) -> Self {
        Self(id)
    }
}
