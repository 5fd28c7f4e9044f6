//! 网络拓扑管理
//!
//! 持有连通图、节点 id -> 组件、边 -> channel 的映射，以及预计算的转发表。
//! 只在连线阶段修改；任何图修改都会让转发表过期，直到 `compute_forwarding_table`
//! 重新计算。

use std::collections::BTreeMap;

use tracing::debug;

use super::error::TopologyError;
use super::graph::Graph;
use super::id::{Edge, NodeId};
use super::routing::{ForwardingTable, NextHop, mix64};
use crate::sim::ComponentHandle;

#[derive(Default)]
pub struct Topology {
    graph: Graph,
    nodes: BTreeMap<NodeId, ComponentHandle>,
    channels: BTreeMap<Edge, ComponentHandle>,
    table: ForwardingTable,
}

impl Topology {
    /// 替换整张图（例如有向图）。已登记的节点组件保持不变。
    pub fn set_graph(&mut self, graph: Graph) {
        self.graph = graph;
        self.table.mark_dirty();
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// 把组件登记为节点 `id`，并把节点加入图
    pub fn add_node(&mut self, id: NodeId, component: ComponentHandle) -> Result<(), TopologyError> {
        if self.nodes.contains_key(&id) {
            return Err(TopologyError::DuplicateNode(id));
        }
        debug!(node = ?id, component = %component.key(), "添加节点");
        self.graph.add_node(id);
        self.nodes.insert(id, component);
        self.table.mark_dirty();
        Ok(())
    }

    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<Edge, TopologyError> {
        let edge = self.graph.add_edge(a, b)?;
        self.table.mark_dirty();
        Ok(edge)
    }

    /// 为边登记 channel 组件
    pub fn add_channel(&mut self, edge: Edge, channel: ComponentHandle) {
        debug!(edge = %edge, channel = %channel.key(), "添加 channel");
        self.channels.insert(edge, channel);
    }

    pub fn node(&self, id: NodeId) -> Option<&ComponentHandle> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &ComponentHandle)> {
        self.nodes.iter().map(|(id, c)| (*id, c))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn channel(&self, edge: &Edge) -> Option<&ComponentHandle> {
        self.channels.get(edge)
    }

    /// 两个节点之间的 channel（无向图不区分端点顺序）
    pub fn channel_between(&self, a: NodeId, b: NodeId) -> Option<&ComponentHandle> {
        let edge = if self.graph.is_directed() {
            Edge::directed(a, b)
        } else {
            Edge::undirected(a, b)
        };
        self.channels.get(&edge)
    }

    pub fn channels(&self) -> impl Iterator<Item = (&Edge, &ComponentHandle)> {
        self.channels.iter()
    }

    /// 按组件标识反查节点 id
    pub fn node_of(&self, component: &ComponentHandle) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, c)| c.ptr_eq(component))
            .map(|(id, _)| *id)
    }

    pub fn compute_forwarding_table(&mut self) {
        self.table.ensure_built(&self.graph);
    }

    pub fn is_forwarding_table_stale(&self) -> bool {
        self.table.is_stale()
    }

    pub fn forwarding_table(&self) -> &ForwardingTable {
        &self.table
    }

    /// 基于转发表的下一跳
    pub fn next_hop(&self, from: NodeId, to: NodeId) -> Result<NextHop, TopologyError> {
        self.table.next_hop(from, to)
    }

    /// 全源最短路径
    pub fn all_pairs_shortest_paths(
        &self,
    ) -> Result<&BTreeMap<NodeId, BTreeMap<NodeId, Vec<NodeId>>>, TopologyError> {
        self.table.all_paths()
    }

    /// 从 `node` 到每个可达节点的最短路径（按目的 id 升序）
    pub fn shortest_paths_from(&self, node: NodeId) -> Result<Vec<Vec<NodeId>>, TopologyError> {
        if !self.graph.contains(node) {
            return Err(TopologyError::UnknownNode(node));
        }
        Ok(self
            .table
            .paths_from(node)?
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default())
    }

    pub fn neighbors(&self, node: NodeId) -> Result<Vec<NodeId>, TopologyError> {
        self.graph.neighbors(node)
    }

    pub fn predecessors(&self, node: NodeId) -> Result<Vec<NodeId>, TopologyError> {
        self.graph.predecessors(node)
    }

    pub fn successors(&self, node: NodeId) -> Result<Vec<NodeId>, TopologyError> {
        self.graph.successors(node)
    }

    pub fn neighbor_count(&self, node: NodeId) -> Result<usize, TopologyError> {
        self.graph.degree(node)
    }

    /// 基于种子的确定性随机节点
    pub fn random_node(&self, seed: u64) -> Option<NodeId> {
        let n = self.graph.node_count();
        if n == 0 {
            return None;
        }
        let idx = (mix64(seed) as usize) % n;
        self.graph.nodes().nth(idx)
    }

    /// 把转发表（下一跳矩阵）写入日志
    pub fn log_forwarding_table(&self) {
        if self.table.is_stale() {
            debug!("转发表已过期，跳过输出");
            return;
        }
        let ids: Vec<NodeId> = self.graph.nodes().collect();
        for &from in &ids {
            let row = ids
                .iter()
                .map(|&to| match self.table.next_hop(from, to) {
                    Ok(NextHop::Via(n)) | Ok(NextHop::Local(n)) => format!("{:>4}", n.0),
                    _ => format!("{:>4}", "inf"),
                })
                .collect::<String>();
            debug!(from = %from, row = %row, "转发表");
        }
    }
}
