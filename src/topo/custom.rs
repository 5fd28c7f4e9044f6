//! 自定义拓扑构建：只有节点，或从任意图构建

use tracing::info;

use super::{BuiltTopology, attach_channels, spawn_nodes};
use crate::error::Result;
use crate::net::{Edge, Graph, NodeId};
use crate::sim::{Component, Simulation};

/// 只创建节点，不创建边和 channel，留给调用者手工连线（例如分层协议栈）。
pub fn build_nodes_only<N: Component>(
    sim: &mut Simulation,
    nodes: usize,
    make_node: impl FnMut(NodeId) -> N,
) -> Result<BuiltTopology> {
    let node_handles = spawn_nodes(sim, (0..nodes).map(NodeId), make_node)?;
    info!(nodes, "只有节点的拓扑已构建");
    Ok(BuiltTopology {
        nodes: node_handles,
        channels: Vec::new(),
    })
}

/// 按调用者给出的图构建：每个节点一个组件，每条边一个 channel。
pub fn build_from_graph<N: Component, C: Component>(
    sim: &mut Simulation,
    graph: Graph,
    make_node: impl FnMut(NodeId) -> N,
    make_channel: impl FnMut(Edge) -> C,
) -> Result<BuiltTopology> {
    let ids: Vec<NodeId> = graph.nodes().collect();
    let edges = graph.edges();
    sim.topology_mut().set_graph(graph);

    let node_handles = spawn_nodes(sim, ids, make_node)?;
    let channels = attach_channels(sim, edges, make_channel)?;
    info!(
        nodes = node_handles.len(),
        channels = channels.len(),
        "从图构建拓扑完成"
    );

    Ok(BuiltTopology {
        nodes: node_handles,
        channels,
    })
}
