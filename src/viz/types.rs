use std::io::Write;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VizNodeInfo {
    pub id: usize,
    /// 组件的 `name.instance`
    pub component: String,
    pub neighbors: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VizChannelInfo {
    pub from: usize,
    pub to: usize,
    /// 该边上的 channel 组件（手工连线的拓扑可能没有）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

/// 拓扑快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologySnapshot {
    pub directed: bool,
    pub nodes: Vec<VizNodeInfo>,
    pub links: Vec<VizChannelInfo>,
}

impl TopologySnapshot {
    pub fn write_json<W: Write>(&self, w: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(w, self)
    }
}
