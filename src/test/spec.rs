use super::Probe;
use crate::net::{Channel, NodeId};
use crate::sim::Simulation;
use crate::topo::{SimSpec, SpecError, TopologySpec, build_from_spec};

#[test]
fn parses_graph_spec_with_config() {
    let spec = SimSpec::from_json_str(
        r#"
{
    "schema_version": 1,
    "config": { "default_workers": 2 },
    "topology": { "kind": "graph", "nodes": [0, 1, 2], "edges": [[0, 1], [1, 2]] }
}
        "#,
    )
    .unwrap();
    assert_eq!(spec.config.default_workers, 2);
    assert_eq!(
        spec.topology,
        TopologySpec::Graph {
            nodes: vec![0, 1, 2],
            edges: vec![(0, 1), (1, 2)],
            directed: false,
        }
    );
    let g = spec.topology.graph().unwrap();
    assert_eq!(g.node_count(), 3);
    assert_eq!(g.edge_count(), 2);
}

#[test]
fn config_defaults_to_one_worker() {
    let spec = SimSpec::from_json_str(
        r#"{ "schema_version": 1, "topology": { "kind": "sender_receiver" } }"#,
    )
    .unwrap();
    assert_eq!(spec.config.default_workers, 1);
    assert_eq!(spec.topology, TopologySpec::SenderReceiver);
}

#[test]
fn rejects_bad_specs() {
    let version = SimSpec::from_json_str(
        r#"{ "schema_version": 9, "topology": { "kind": "full_mesh", "nodes": 3 } }"#,
    );
    assert!(matches!(version, Err(SpecError::UnsupportedVersion(9))));

    let workers = SimSpec::from_json_str(
        r#"{ "schema_version": 1, "config": { "default_workers": 0 }, "topology": { "kind": "nodes_only", "nodes": 1 } }"#,
    );
    assert!(matches!(workers, Err(SpecError::Invalid(_))));

    let self_loop = SimSpec::from_json_str(
        r#"{ "schema_version": 1, "topology": { "kind": "graph", "nodes": [0], "edges": [[0, 0]] } }"#,
    );
    assert!(matches!(self_loop, Err(SpecError::Invalid(_))));

    let unknown = SimSpec::from_json_str(
        r#"{ "schema_version": 1, "topology": { "kind": "graph", "nodes": [0, 1], "edges": [[0, 4]] } }"#,
    );
    assert!(matches!(unknown, Err(SpecError::Invalid(msg)) if msg.contains("unknown node 4")));

    let kind = SimSpec::from_json_str(r#"{ "schema_version": 1, "topology": { "kind": "torus" } }"#);
    assert!(matches!(kind, Err(SpecError::Json(_))));
}

#[test]
fn build_from_spec_wires_graph_with_channels() {
    let (tx, _rx) = crossbeam_channel::unbounded();
    let spec = TopologySpec::Graph {
        nodes: vec![0, 1, 2, 3],
        edges: vec![(0, 1), (1, 2)],
        directed: false,
    };
    let mut sim = Simulation::default();
    let built = build_from_spec(&mut sim, &spec, |_| Probe::new(tx.clone()), |_| Channel::new()).unwrap();

    assert_eq!(built.nodes.len(), 4);
    assert_eq!(built.channels.len(), 2);
    assert_eq!(sim.registry().len(), 6);
    assert!(sim.topology().channel_between(NodeId(1), NodeId(2)).is_some());
    assert!(sim.topology().channel_between(NodeId(0), NodeId(2)).is_none());
    assert_eq!(sim.topology().neighbor_count(NodeId(3)).unwrap(), 0);
}

#[test]
fn build_from_spec_single_node_uses_instance() {
    let (tx, _rx) = crossbeam_channel::unbounded();
    let mut sim = Simulation::default();
    let built = build_from_spec(
        &mut sim,
        &TopologySpec::SingleNode { instance: 7 },
        |_| Probe::new(tx.clone()),
        |_| Channel::new(),
    )
    .unwrap();
    assert_eq!(built.nodes[0].key().instance(), "7");
    assert!(sim.topology().node(NodeId(0)).unwrap().ptr_eq(&built.nodes[0]));
}
