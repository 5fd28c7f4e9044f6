use super::{Probe, key, next};
use crate::net::Channel;
use crate::sim::{ConnectorRole, EventKind, RegistryError, Simulation};

#[test]
fn duplicate_key_is_rejected_and_first_registration_kept() {
    let (tx, _rx) = crossbeam_channel::unbounded();
    let mut sim = Simulation::default();
    let first = sim.spawn("Node", 0, Probe::new(tx.clone())).unwrap();
    let err = sim.spawn("Node", 0, Probe::new(tx)).unwrap_err();

    assert_eq!(err, RegistryError::DuplicateKey(key("Node", 0)));
    assert_eq!(sim.registry().len(), 1);
    assert!(sim.registry().lookup_by_key("Node", 0).unwrap().ptr_eq(&first));
}

#[test]
fn lookup_by_key_and_by_instance() {
    let (tx, _rx) = crossbeam_channel::unbounded();
    let mut sim = Simulation::default();
    let a = sim.spawn("Node", 0, Probe::new(tx.clone())).unwrap();
    let b = sim.spawn("Node", 1, Probe::new(tx)).unwrap();
    let reg = sim.registry();

    assert!(reg.lookup_by_key("Node", 1).unwrap().ptr_eq(&b));
    assert!(reg.lookup_by_key("Node", 2).is_none());
    assert!(reg.lookup_by_key("Other", 0).is_none());
    assert!(reg.get(&key("Node", 0)).unwrap().ptr_eq(&a));
    assert_eq!(reg.lookup_by_instance(&a), vec![key("Node", 0)]);

    let (tx, _rx) = crossbeam_channel::unbounded();
    let mut other = Simulation::default();
    let stranger = other.spawn("Node", 0, Probe::new(tx)).unwrap();
    assert!(reg.lookup_by_instance(&stranger).is_empty());
}

#[test]
fn init_is_delivered_once_to_every_component() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let mut sim = Simulation::default();
    for i in 0..3 {
        sim.spawn("Node", i, Probe::new(tx.clone())).unwrap();
    }
    let running = sim.start().unwrap();
    assert!(running.registry().is_initialized());

    let mut inits: Vec<_> = (0..3).map(|_| next(&rx)).collect();
    inits.sort_by(|a, b| a.component.cmp(&b.component));
    for (i, o) in inits.iter().enumerate() {
        assert_eq!(o.kind, EventKind::Init);
        assert_eq!(o.component, key("Node", i));
        assert!(o.source.is_none());
    }

    assert_eq!(
        running.registry().init_all(),
        Err(RegistryError::AlreadyInitialized)
    );
    super::assert_quiet(&rx);

    running.shutdown();
}

#[test]
fn non_channel_components_and_describe() {
    let (tx, _rx) = crossbeam_channel::unbounded();
    let mut sim = Simulation::default();
    let a = sim.spawn("Node", 0, Probe::new(tx.clone())).unwrap();
    let b = sim.spawn("Node", 1, Probe::new(tx)).unwrap();
    let ch = sim.spawn("Channel", "0-1", Channel::new()).unwrap();
    a.connect_to_channel(ConnectorRole::Down, &ch);
    b.connect_to_channel(ConnectorRole::Down, &ch);

    let reg = sim.registry();
    let plain: Vec<_> = reg
        .non_channel_components()
        .into_iter()
        .map(|c| c.key().clone())
        .collect();
    assert_eq!(plain, vec![key("Node", 0), key("Node", 1)]);

    let text = reg.describe();
    assert!(text.contains("Channel.0-1\n"));
    assert!(text.contains("\tNode.0 Node.0\n"));
    assert!(text.contains("Node.0\n\tDOWN Channel.0-1\n"));
    assert!(text.contains("Node.1\n\tDOWN Channel.0-1\n"));
}

#[test]
fn unique_name_joins_name_and_instance() {
    let k = key("Node", 3);
    assert_eq!(k.name(), "Node");
    assert_eq!(k.instance(), "3");
    assert_eq!(k.unique_name(), "Node.3");
    assert_eq!(k.to_string(), "Node.3");
}
