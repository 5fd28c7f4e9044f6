//! 退化拓扑：单节点、收发双节点

use super::{BuiltTopology, attach_channel, component_name};
use crate::error::Result;
use crate::net::NodeId;
use crate::sim::{Component, Simulation};

/// 单节点拓扑：图中只有节点 0，组件实例号为 `instance`
pub fn build_single_node<N: Component>(
    sim: &mut Simulation,
    instance: usize,
    node: N,
) -> Result<BuiltTopology> {
    let c = sim.spawn(component_name::<N>(), instance, node)?;
    sim.topology_mut().add_node(NodeId(0), c.clone())?;
    Ok(BuiltTopology {
        nodes: vec![c],
        channels: Vec::new(),
    })
}

/// 发送方（节点 0）与接收方（节点 1）通过一个 channel 相连
pub fn build_sender_receiver<S: Component, R: Component, C: Component>(
    sim: &mut Simulation,
    sender: S,
    receiver: R,
    channel: C,
) -> Result<BuiltTopology> {
    let s = sim.spawn(component_name::<S>(), 0, sender)?;
    let r = sim.spawn(component_name::<R>(), 1, receiver)?;
    sim.topology_mut().add_node(NodeId(0), s.clone())?;
    sim.topology_mut().add_node(NodeId(1), r.clone())?;
    let edge = sim.topology_mut().add_edge(NodeId(0), NodeId(1))?;

    let ch = attach_channel(sim, edge, channel)?;

    Ok(BuiltTopology {
        nodes: vec![s, r],
        channels: vec![ch],
    })
}
