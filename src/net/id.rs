//! 标识符类型
//!
//! 定义拓扑中节点和边的标识符。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 节点标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 边标识符：无向图中端点按升序规范化
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

impl Edge {
    pub fn directed(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }

    pub fn undirected(a: NodeId, b: NodeId) -> Self {
        Self {
            from: a.min(b),
            to: a.max(b),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}
