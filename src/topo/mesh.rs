//! 全连接拓扑构建

use tracing::info;

use super::{BuiltTopology, attach_channels, spawn_nodes};
use crate::error::Result;
use crate::net::{Edge, NodeId};
use crate::sim::{Component, Simulation};

/// 构建全连接拓扑
///
/// 创建 `nodes` 个节点，所有有序节点对都成为边（无向图中合并为一条），
/// 每条无向边分配一个 channel，两个端点都以 `Down` 角色接入。
pub fn build_full_mesh<N: Component, C: Component>(
    sim: &mut Simulation,
    nodes: usize,
    make_node: impl FnMut(NodeId) -> N,
    make_channel: impl FnMut(Edge) -> C,
) -> Result<BuiltTopology> {
    let ids: Vec<NodeId> = (0..nodes).map(NodeId).collect();
    let node_handles = spawn_nodes(sim, ids.iter().copied(), make_node)?;

    for &a in &ids {
        for &b in &ids {
            if a != b {
                sim.topology_mut().add_edge(a, b)?;
            }
        }
    }

    let edges = sim.topology().graph().edges();
    let channels = attach_channels(sim, edges, make_channel)?;
    info!(nodes, channels = channels.len(), "🕸️  全连接拓扑已构建");

    Ok(BuiltTopology {
        nodes: node_handles,
        channels,
    })
}
