//! Snapshot export for visualization.

use crate::viz::{TopologySnapshot, VizChannelInfo, VizNodeInfo};

use super::Topology;

impl Topology {
    /// Read-only snapshot of nodes and links, ordered by id.
    pub fn snapshot(&self) -> TopologySnapshot {
        let graph = self.graph();
        let nodes = graph
            .nodes()
            .map(|id| VizNodeInfo {
                id: id.0,
                component: self
                    .node(id)
                    .map(|c| c.unique_name())
                    .unwrap_or_default(),
                neighbors: graph
                    .neighbors(id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|n| n.0)
                    .collect(),
            })
            .collect();
        let links = graph
            .edges()
            .into_iter()
            .map(|e| VizChannelInfo {
                from: e.from.0,
                to: e.to.0,
                channel: self.channel(&e).map(|c| c.unique_name()),
            })
            .collect();
        TopologySnapshot {
            directed: graph.is_directed(),
            nodes,
            links,
        }
    }
}
