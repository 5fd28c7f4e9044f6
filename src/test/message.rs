use serde_json::json;

use crate::net::{Address, GenericMessage, MessageHeader, NodeId};

#[test]
fn unique_id_combines_sender_and_sequence() {
    let msg = GenericMessage::new(
        MessageHeader::new("PING", NodeId(3), NodeId(5)).with_sequence_number(7),
        json!({ "hello": "world" }),
    );
    assert_eq!(msg.unique_id(), "3-7");

    let unsequenced = GenericMessage::new(MessageHeader::new("PING", NodeId(3), NodeId(5)), ());
    assert_eq!(unsequenced.header.sequence_number, -1);
    assert_eq!(unsequenced.unique_id(), "3--1");
}

#[test]
fn is_for_matches_destination_and_broadcasts() {
    let to_two = MessageHeader::new("DATA", NodeId(0), NodeId(2));
    assert!(to_two.is_for(NodeId(2)));
    assert!(!to_two.is_for(NodeId(1)));

    let link = MessageHeader::new("HELLO", NodeId(0), Address::LinkBroadcast);
    let net = MessageHeader::new("FLOOD", NodeId(0), Address::NetworkBroadcast);
    assert!(link.is_for(NodeId(9)));
    assert!(net.is_for(NodeId(9)));

    let named = MessageHeader::new("CTRL", NodeId(0), Address::Named("gateway".into()));
    assert!(!named.is_for(NodeId(0)));
    assert_eq!(Address::LinkBroadcast.to_string(), "-1");
    assert_eq!(Address::NetworkBroadcast.to_string(), "-2");
}

#[test]
fn header_json_shape_and_defaults() {
    let header = MessageHeader::new("PING", NodeId(1), NodeId(2))
        .with_next_hop(NodeId(4))
        .with_interface(0)
        .with_sequence_number(9);
    let v = serde_json::to_value(&header).unwrap();
    assert_eq!(
        v,
        json!({
            "message_type": "PING",
            "from": { "node": 1 },
            "to": { "node": 2 },
            "next_hop": 4,
            "interface_id": 0,
            "sequence_number": 9,
        })
    );

    let minimal: MessageHeader = serde_json::from_value(json!({
        "message_type": "PONG",
        "from": { "node": 2 },
        "to": "link_broadcast",
    }))
    .unwrap();
    assert_eq!(minimal.next_hop, None);
    assert_eq!(minimal.interface_id, None);
    assert_eq!(minimal.sequence_number, -1);
    assert_eq!(minimal.to, Address::LinkBroadcast);
}
