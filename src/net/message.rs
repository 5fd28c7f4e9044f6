//! Message payload convention shared by protocol components.
//!
//! The core never inspects payloads; this is the layout collaborators agree on
//! when they put a message inside an [`Event`](crate::sim::Event).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::NodeId;

/// Message endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Address {
    Node(NodeId),
    Named(String),
    /// Single-hop broadcast: every directly connected node.
    LinkBroadcast,
    /// Flooding: every node reachable over one or more links.
    NetworkBroadcast,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Node(n) => write!(f, "{n}"),
            Address::Named(s) => f.write_str(s),
            Address::LinkBroadcast => f.write_str("-1"),
            Address::NetworkBroadcast => f.write_str("-2"),
        }
    }
}

impl From<NodeId> for Address {
    fn from(n: NodeId) -> Self {
        Address::Node(n)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeader {
    pub message_type: String,
    pub from: Address,
    pub to: Address,
    #[serde(default)]
    pub next_hop: Option<NodeId>,
    #[serde(default)]
    pub interface_id: Option<u32>,
    #[serde(default = "unsequenced")]
    pub sequence_number: i64,
}

fn unsequenced() -> i64 {
    -1
}

impl MessageHeader {
    pub fn new(message_type: impl Into<String>, from: impl Into<Address>, to: impl Into<Address>) -> Self {
        Self {
            message_type: message_type.into(),
            from: from.into(),
            to: to.into(),
            next_hop: None,
            interface_id: None,
            sequence_number: unsequenced(),
        }
    }

    pub fn with_next_hop(mut self, next_hop: NodeId) -> Self {
        self.next_hop = Some(next_hop);
        self
    }

    pub fn with_sequence_number(mut self, seq: i64) -> Self {
        self.sequence_number = seq;
        self
    }

    pub fn with_interface(mut self, interface_id: u32) -> Self {
        self.interface_id = Some(interface_id);
        self
    }

    /// True when the message is addressed to `node` directly or by broadcast.
    pub fn is_for(&self, node: NodeId) -> bool {
        match &self.to {
            Address::Node(n) => *n == node,
            Address::LinkBroadcast | Address::NetworkBroadcast => true,
            Address::Named(_) => false,
        }
    }
}

/// Header + body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericMessage<B = serde_json::Value> {
    pub header: MessageHeader,
    pub body: B,
}

impl<B> GenericMessage<B> {
    pub fn new(header: MessageHeader, body: B) -> Self {
        Self { header, body }
    }

    /// `from-sequence_number`: identifies the message independent of the
    /// wrapping event id.
    pub fn unique_id(&self) -> String {
        format!("{}-{}", self.header.from, self.header.sequence_number)
    }
}
