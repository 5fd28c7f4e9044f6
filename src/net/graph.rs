//! 连通图
//!
//! 无权图，支持有向与无向两种模式。邻接集合有序，所有邻居查询按 id 升序返回。

use std::collections::{BTreeMap, BTreeSet};

use super::error::TopologyError;
use super::id::{Edge, NodeId};

#[derive(Debug, Clone, Default)]
pub struct Graph {
    directed: bool,
    succ: BTreeMap<NodeId, BTreeSet<NodeId>>,
    pred: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

impl Graph {
    pub fn undirected() -> Self {
        Self::default()
    }

    pub fn directed() -> Self {
        Self {
            directed: true,
            ..Self::default()
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// 添加节点；已存在时返回 false
    pub fn add_node(&mut self, n: NodeId) -> bool {
        let fresh = !self.succ.contains_key(&n);
        self.succ.entry(n).or_default();
        self.pred.entry(n).or_default();
        fresh
    }

    /// 添加边，端点不存在时自动添加。返回规范化后的边。
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<Edge, TopologyError> {
        if a == b {
            return Err(TopologyError::SelfLoop(a));
        }
        self.add_node(a);
        self.add_node(b);
        self.succ.entry(a).or_default().insert(b);
        self.pred.entry(b).or_default().insert(a);
        if self.directed {
            Ok(Edge::directed(a, b))
        } else {
            self.succ.entry(b).or_default().insert(a);
            self.pred.entry(a).or_default().insert(b);
            Ok(Edge::undirected(a, b))
        }
    }

    pub fn contains(&self, n: NodeId) -> bool {
        self.succ.contains_key(&n)
    }

    pub fn node_count(&self) -> usize {
        self.succ.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.succ.keys().copied()
    }

    /// 所有边（无向图每条边只出现一次，`from < to`）
    pub fn edges(&self) -> Vec<Edge> {
        let mut out = Vec::new();
        for (&a, nbrs) in &self.succ {
            for &b in nbrs {
                if self.directed {
                    out.push(Edge::directed(a, b));
                } else if a < b {
                    out.push(Edge::undirected(a, b));
                }
            }
        }
        out
    }

    pub fn edge_count(&self) -> usize {
        self.edges().len()
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.succ.get(&a).is_some_and(|s| s.contains(&b))
    }

    pub fn successors(&self, n: NodeId) -> Result<Vec<NodeId>, TopologyError> {
        self.succ
            .get(&n)
            .map(|s| s.iter().copied().collect())
            .ok_or(TopologyError::UnknownNode(n))
    }

    pub fn predecessors(&self, n: NodeId) -> Result<Vec<NodeId>, TopologyError> {
        self.pred
            .get(&n)
            .map(|s| s.iter().copied().collect())
            .ok_or(TopologyError::UnknownNode(n))
    }

    /// 邻居：无向图为相邻节点，有向图为后继
    pub fn neighbors(&self, n: NodeId) -> Result<Vec<NodeId>, TopologyError> {
        self.successors(n)
    }

    /// 度：无向图为邻居数，有向图为入度 + 出度
    pub fn degree(&self, n: NodeId) -> Result<usize, TopologyError> {
        let out = self.succ.get(&n).ok_or(TopologyError::UnknownNode(n))?.len();
        if self.directed {
            let inc = self.pred.get(&n).map_or(0, |s| s.len());
            Ok(out + inc)
        } else {
            Ok(out)
        }
    }

    pub(crate) fn successor_set(&self, n: NodeId) -> Option<&BTreeSet<NodeId>> {
        self.succ.get(&n)
    }
}
