//! 网络模拟模块
//!
//! 此模块包含拓扑相关的组件：节点/边标识、连通图、转发表、拓扑、
//! 广播 channel 以及消息约定。

// 子模块声明
mod channel;
mod error;
mod graph;
mod id;
mod message;
mod routing;
mod topology;
mod topology_viz;

// 重新导出公共接口
pub use channel::Channel;
pub use error::TopologyError;
pub use graph::Graph;
pub use id::{Edge, NodeId};
pub use message::{Address, GenericMessage, MessageHeader};
pub use routing::{ForwardingTable, NextHop};
pub use topology::Topology;
