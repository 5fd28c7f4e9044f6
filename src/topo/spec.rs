//! JSON topology description.
//!
//! ```json
//! {
//!   "schema_version": 1,
//!   "config": { "default_workers": 1 },
//!   "topology": { "kind": "graph", "nodes": [0, 1, 2], "edges": [[0, 1], [1, 2]] }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{BuiltTopology, build_from_graph, build_full_mesh, build_nodes_only, build_single_node};
use crate::error::Result;
use crate::net::{Edge, Graph, NodeId};
use crate::sim::{Component, SimConfig, Simulation};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot read spec: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported schema_version {0}")]
    UnsupportedVersion(u32),
    #[error("invalid topology: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSpec {
    pub schema_version: u32,
    #[serde(default)]
    pub config: SimConfig,
    pub topology: TopologySpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopologySpec {
    FullMesh {
        nodes: usize,
    },
    NodesOnly {
        nodes: usize,
    },
    Graph {
        nodes: Vec<usize>,
        #[serde(default)]
        edges: Vec<(usize, usize)>,
        #[serde(default)]
        directed: bool,
    },
    SingleNode {
        #[serde(default)]
        instance: usize,
    },
    SenderReceiver,
}

impl SimSpec {
    pub fn from_json_str(s: &str) -> std::result::Result<Self, SpecError> {
        let spec: SimSpec = serde_json::from_str(s)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Self, SpecError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> std::result::Result<(), SpecError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(SpecError::UnsupportedVersion(self.schema_version));
        }
        if self.config.default_workers == 0 {
            return Err(SpecError::Invalid("default_workers must be >= 1".into()));
        }
        self.topology.validate()
    }
}

impl TopologySpec {
    pub fn validate(&self) -> std::result::Result<(), SpecError> {
        if let TopologySpec::Graph { nodes, edges, .. } = self {
            for &(a, b) in edges {
                if a == b {
                    return Err(SpecError::Invalid(format!("self loop on node {a}")));
                }
                for end in [a, b] {
                    if !nodes.contains(&end) {
                        return Err(SpecError::Invalid(format!(
                            "edge {a}-{b} references unknown node {end}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Graph described by this spec (channels are not part of it).
    pub fn graph(&self) -> std::result::Result<Graph, SpecError> {
        let invalid = |e: crate::net::TopologyError| SpecError::Invalid(e.to_string());
        let mut g = match self {
            TopologySpec::Graph { directed: true, .. } => Graph::directed(),
            _ => Graph::undirected(),
        };
        match self {
            TopologySpec::FullMesh { nodes } => {
                for a in 0..*nodes {
                    g.add_node(NodeId(a));
                    for b in 0..*nodes {
                        if a != b {
                            g.add_edge(NodeId(a), NodeId(b)).map_err(invalid)?;
                        }
                    }
                }
            }
            TopologySpec::NodesOnly { nodes } => {
                for a in 0..*nodes {
                    g.add_node(NodeId(a));
                }
            }
            TopologySpec::Graph { nodes, edges, .. } => {
                for &n in nodes {
                    g.add_node(NodeId(n));
                }
                for &(a, b) in edges {
                    g.add_edge(NodeId(a), NodeId(b)).map_err(invalid)?;
                }
            }
            TopologySpec::SingleNode { .. } => {
                g.add_node(NodeId(0));
            }
            TopologySpec::SenderReceiver => {
                g.add_edge(NodeId(0), NodeId(1)).map_err(invalid)?;
            }
        }
        Ok(g)
    }
}

/// Builds the described topology with one node type and one channel type.
///
/// `sender_receiver` uses `make_node` for both ends (ids 0 and 1).
pub fn build_from_spec<N: Component, C: Component>(
    sim: &mut Simulation,
    spec: &TopologySpec,
    mut make_node: impl FnMut(NodeId) -> N,
    make_channel: impl FnMut(Edge) -> C,
) -> Result<BuiltTopology> {
    spec.validate()?;
    match spec {
        TopologySpec::FullMesh { nodes } => build_full_mesh(sim, *nodes, make_node, make_channel),
        TopologySpec::NodesOnly { nodes } => build_nodes_only(sim, *nodes, make_node),
        TopologySpec::SingleNode { instance } => {
            build_single_node(sim, *instance, make_node(NodeId(0)))
        }
        TopologySpec::Graph { .. } | TopologySpec::SenderReceiver => {
            build_from_graph(sim, spec.graph()?, make_node, make_channel)
        }
    }
}
