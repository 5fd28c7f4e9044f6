//! 拓扑构建
//!
//! 四种构建方式：全连接 + channel、只有节点、从任意图构建、单节点/收发双节点。
//! 所有构建函数都在连线阶段对 `Simulation` 操作，组件名取组件类型名，
//! 节点实例号为节点 id，channel 实例号为边（`a-b`）。

pub mod custom;
pub mod mesh;
pub mod pair;
pub mod spec;

pub use custom::{build_from_graph, build_nodes_only};
pub use mesh::build_full_mesh;
pub use pair::{build_sender_receiver, build_single_node};
pub use spec::{SimSpec, SpecError, TopologySpec, build_from_spec};

use crate::error::Result;
use crate::net::{Edge, NodeId, TopologyError};
use crate::sim::{Component, ComponentHandle, ConnectorRole, Simulation};

/// 构建结果：按 id 排序的节点组件与按边排序的 channel 组件
#[derive(Debug, Clone, Default)]
pub struct BuiltTopology {
    pub nodes: Vec<ComponentHandle>,
    pub channels: Vec<ComponentHandle>,
}

/// 类型名的最后一段（`crate::demo::PingNode` -> `PingNode`）
pub fn component_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// 为每个 id 创建节点组件并加入拓扑
pub(crate) fn spawn_nodes<N: Component>(
    sim: &mut Simulation,
    ids: impl IntoIterator<Item = NodeId>,
    mut make_node: impl FnMut(NodeId) -> N,
) -> Result<Vec<ComponentHandle>> {
    let name = component_name::<N>();
    let mut out = Vec::new();
    for id in ids {
        let c = sim.spawn(name, id, make_node(id))?;
        sim.topology_mut().add_node(id, c.clone())?;
        out.push(c);
    }
    Ok(out)
}

/// 每条边一个 channel，两个端点都以 `Down` 角色接入
pub(crate) fn attach_channels<C: Component>(
    sim: &mut Simulation,
    edges: impl IntoIterator<Item = Edge>,
    mut make_channel: impl FnMut(Edge) -> C,
) -> Result<Vec<ComponentHandle>> {
    let mut out = Vec::new();
    for edge in edges {
        out.push(attach_channel(sim, edge, make_channel(edge))?);
    }
    Ok(out)
}

pub(crate) fn attach_channel<C: Component>(
    sim: &mut Simulation,
    edge: Edge,
    channel: C,
) -> Result<ComponentHandle> {
    let ch = sim.spawn(component_name::<C>(), edge, channel)?;
    sim.topology_mut().add_channel(edge, ch.clone());
    for end in [edge.from, edge.to] {
        let node = sim
            .topology()
            .node(end)
            .cloned()
            .ok_or(TopologyError::UnknownNode(end))?;
        node.connect_to_channel(ConnectorRole::Down, &ch);
    }
    Ok(ch)
}
