use crate::net::{ForwardingTable, Graph, NextHop, NodeId, Topology, TopologyError};

fn line(n: usize) -> Graph {
    let mut g = Graph::undirected();
    for i in 1..n {
        g.add_edge(NodeId(i - 1), NodeId(i)).unwrap();
    }
    g
}

#[test]
fn forwarding_table_gives_first_hop_of_shortest_path() {
    let mut ft = ForwardingTable::default();
    ft.ensure_built(&line(3));

    assert_eq!(ft.next_hop(NodeId(0), NodeId(2)).unwrap(), NextHop::Via(NodeId(1)));
    assert_eq!(ft.next_hop(NodeId(2), NodeId(0)).unwrap(), NextHop::Via(NodeId(1)));
    assert_eq!(ft.next_hop(NodeId(0), NodeId(1)).unwrap(), NextHop::Via(NodeId(1)));
    assert_eq!(ft.next_hop(NodeId(1), NodeId(1)).unwrap(), NextHop::Local(NodeId(1)));
    assert_eq!(
        ft.path(NodeId(0), NodeId(2)).unwrap(),
        Some(&[NodeId(0), NodeId(1), NodeId(2)][..])
    );
}

#[test]
fn isolated_node_is_unreachable() {
    let mut g = line(2);
    g.add_node(NodeId(5));
    let mut ft = ForwardingTable::default();
    ft.ensure_built(&g);

    assert_eq!(ft.next_hop(NodeId(0), NodeId(5)).unwrap(), NextHop::Unreachable);
    assert_eq!(ft.next_hop(NodeId(5), NodeId(0)).unwrap(), NextHop::Unreachable);
    assert_eq!(ft.next_hop(NodeId(5), NodeId(5)).unwrap(), NextHop::Local(NodeId(5)));
    assert!(!NextHop::Unreachable.is_reachable());
    assert_eq!(NextHop::Unreachable.node(), None);
}

#[test]
fn ties_are_broken_by_lowest_neighbor_id() {
    // Diamond:
    // 0 - 1 - 3
    //  \- 2 -/
    let mut g = Graph::undirected();
    for (a, b) in [(0, 2), (2, 3), (0, 1), (1, 3)] {
        g.add_edge(NodeId(a), NodeId(b)).unwrap();
    }
    let mut ft = ForwardingTable::default();
    ft.ensure_built(&g);
    assert_eq!(ft.next_hop(NodeId(0), NodeId(3)).unwrap(), NextHop::Via(NodeId(1)));
    assert_eq!(ft.next_hop(NodeId(3), NodeId(0)).unwrap(), NextHop::Via(NodeId(1)));
}

#[test]
fn table_is_stale_until_recomputed() {
    let mut topo = Topology::default();
    topo.add_edge(NodeId(0), NodeId(1)).unwrap();
    assert!(topo.is_forwarding_table_stale());
    assert_eq!(
        topo.next_hop(NodeId(0), NodeId(1)),
        Err(TopologyError::StaleForwardingTable)
    );

    topo.compute_forwarding_table();
    assert_eq!(topo.next_hop(NodeId(0), NodeId(1)).unwrap(), NextHop::Via(NodeId(1)));

    topo.add_edge(NodeId(1), NodeId(2)).unwrap();
    assert!(topo.is_forwarding_table_stale());
    assert!(topo.all_pairs_shortest_paths().is_err());

    topo.compute_forwarding_table();
    assert_eq!(topo.next_hop(NodeId(0), NodeId(2)).unwrap(), NextHop::Via(NodeId(1)));
}

#[test]
fn shortest_paths_from_lists_every_reachable_destination() {
    let mut topo = Topology::default();
    topo.set_graph(line(3));
    topo.compute_forwarding_table();

    let paths = topo.shortest_paths_from(NodeId(0)).unwrap();
    assert_eq!(
        paths,
        vec![
            vec![NodeId(0)],
            vec![NodeId(0), NodeId(1)],
            vec![NodeId(0), NodeId(1), NodeId(2)],
        ]
    );
    assert_eq!(topo.all_pairs_shortest_paths().unwrap().len(), 3);
    assert_eq!(
        topo.shortest_paths_from(NodeId(9)),
        Err(TopologyError::UnknownNode(NodeId(9)))
    );
}

#[test]
fn directed_graph_routes_along_edge_direction() {
    let mut g = Graph::directed();
    g.add_edge(NodeId(0), NodeId(1)).unwrap();
    g.add_edge(NodeId(1), NodeId(2)).unwrap();
    g.add_edge(NodeId(2), NodeId(0)).unwrap();
    assert!(g.is_directed());
    assert_eq!(g.edge_count(), 3);
    assert!(g.has_edge(NodeId(0), NodeId(1)));
    assert!(!g.has_edge(NodeId(1), NodeId(0)));

    let mut topo = Topology::default();
    topo.set_graph(g);
    topo.compute_forwarding_table();

    assert_eq!(topo.next_hop(NodeId(0), NodeId(2)).unwrap(), NextHop::Via(NodeId(1)));
    assert_eq!(topo.next_hop(NodeId(1), NodeId(0)).unwrap(), NextHop::Via(NodeId(2)));
    assert_eq!(topo.successors(NodeId(0)).unwrap(), vec![NodeId(1)]);
    assert_eq!(topo.predecessors(NodeId(0)).unwrap(), vec![NodeId(2)]);
    assert_eq!(topo.neighbor_count(NodeId(0)).unwrap(), 2);
}

#[test]
fn neighbors_are_sorted_and_unknown_nodes_rejected() {
    let mut g = Graph::undirected();
    for b in [4, 2, 3] {
        g.add_edge(NodeId(1), NodeId(b)).unwrap();
    }
    assert_eq!(g.neighbors(NodeId(1)).unwrap(), vec![NodeId(2), NodeId(3), NodeId(4)]);
    assert_eq!(g.predecessors(NodeId(1)).unwrap(), vec![NodeId(2), NodeId(3), NodeId(4)]);
    assert_eq!(g.degree(NodeId(1)).unwrap(), 3);
    assert_eq!(g.edge_count(), 3);
    assert_eq!(g.neighbors(NodeId(7)), Err(TopologyError::UnknownNode(NodeId(7))));
    assert_eq!(
        g.add_edge(NodeId(3), NodeId(3)),
        Err(TopologyError::SelfLoop(NodeId(3)))
    );
}
