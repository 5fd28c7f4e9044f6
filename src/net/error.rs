//! 拓扑错误类型

use thiserror::Error;

use super::id::NodeId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("node {0} already has a component")]
    DuplicateNode(NodeId),
    #[error("self loop on node {0}")]
    SelfLoop(NodeId),
    /// 图被修改后尚未重新计算转发表
    #[error("forwarding table is stale, recompute before lookup")]
    StaleForwardingTable,
}
