//! 转发表
//!
//! 在无权图上计算全源最短路径（每个源点一次 BFS，邻居按 id 升序访问，结果确定）。
//! 图被修改后转发表立即视为过期，必须重新计算后才能查询。

use std::collections::{BTreeMap, VecDeque};

use tracing::{debug, trace};

use super::error::TopologyError;
use super::graph::Graph;
use super::id::NodeId;

/// 下一跳查询结果。“不可达”与“已在目的地”是两个不同的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextHop {
    /// 经由相邻节点转发
    Via(NodeId),
    /// `from == to`：路径只有一个节点，返回 `from` 本身
    Local(NodeId),
    /// 不存在路径
    Unreachable,
}

impl NextHop {
    /// 下一跳节点；`Local` 返回起点本身，`Unreachable` 返回 None
    pub fn node(self) -> Option<NodeId> {
        match self {
            NextHop::Via(n) | NextHop::Local(n) => Some(n),
            NextHop::Unreachable => None,
        }
    }

    pub fn is_reachable(self) -> bool {
        !matches!(self, NextHop::Unreachable)
    }
}

/// (from -> to -> 最短路径) 表
#[derive(Debug, Clone)]
pub struct ForwardingTable {
    dirty: bool,
    paths: BTreeMap<NodeId, BTreeMap<NodeId, Vec<NodeId>>>,
}

impl Default for ForwardingTable {
    fn default() -> Self {
        Self {
            dirty: true,
            paths: BTreeMap::new(),
        }
    }
}

impl ForwardingTable {
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_stale(&self) -> bool {
        self.dirty
    }

    /// 确保转发表基于当前图是最新的。
    #[tracing::instrument(skip(self, g), fields(nodes = g.node_count()))]
    pub fn ensure_built(&mut self, g: &Graph) {
        if !self.dirty {
            return;
        }

        self.paths.clear();
        let mut q: VecDeque<NodeId> = VecDeque::new();

        for src in g.nodes() {
            // parent[v] = BFS 树中 v 的前驱
            let mut parent: BTreeMap<NodeId, NodeId> = BTreeMap::new();
            let mut order = vec![src];
            parent.insert(src, src);
            q.clear();
            q.push_back(src);

            while let Some(v) = q.pop_front() {
                let Some(nbrs) = g.successor_set(v) else {
                    continue;
                };
                for &nh in nbrs {
                    if !parent.contains_key(&nh) {
                        parent.insert(nh, v);
                        order.push(nh);
                        q.push_back(nh);
                    }
                }
            }

            let mut from_src: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
            for dst in order {
                let path = if dst == src {
                    vec![src]
                } else {
                    // BFS 顺序保证前驱的路径已经算好
                    let p = parent[&dst];
                    let mut path = from_src[&p].clone();
                    path.push(dst);
                    path
                };
                from_src.insert(dst, path);
            }
            trace!(src = ?src, reachable = from_src.len(), "BFS 完成");
            self.paths.insert(src, from_src);
        }

        self.dirty = false;
        debug!(sources = self.paths.len(), "🧭 转发表已计算");
    }

    /// 最短路径（含两端）；不存在时返回 None
    pub fn path(&self, from: NodeId, to: NodeId) -> Result<Option<&[NodeId]>, TopologyError> {
        if self.dirty {
            return Err(TopologyError::StaleForwardingTable);
        }
        Ok(self
            .paths
            .get(&from)
            .and_then(|m| m.get(&to))
            .map(|p| p.as_slice()))
    }

    pub fn next_hop(&self, from: NodeId, to: NodeId) -> Result<NextHop, TopologyError> {
        Ok(match self.path(from, to)? {
            None => NextHop::Unreachable,
            Some([only]) => NextHop::Local(*only),
            Some(path) => NextHop::Via(path[1]),
        })
    }

    /// 从 `from` 出发到所有可达节点的最短路径
    pub fn paths_from(&self, from: NodeId) -> Result<Option<&BTreeMap<NodeId, Vec<NodeId>>>, TopologyError> {
        if self.dirty {
            return Err(TopologyError::StaleForwardingTable);
        }
        Ok(self.paths.get(&from))
    }

    /// 全源最短路径
    pub fn all_paths(&self) -> Result<&BTreeMap<NodeId, BTreeMap<NodeId, Vec<NodeId>>>, TopologyError> {
        if self.dirty {
            return Err(TopologyError::StaleForwardingTable);
        }
        Ok(&self.paths)
    }
}

/// 一个简单、确定性的 64-bit mixing（splitmix64），用于可复现的随机选择。
pub(crate) fn mix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
