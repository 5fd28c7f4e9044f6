use super::{Probe, assert_quiet, key, next, next_non_init};
use crate::net::Channel;
use crate::sim::{
    Component, ConnectorKey, ConnectorRole, Ctx, Event, EventKind, HandlerResult, Simulation,
};

/// 链路层：把上层事件原样向下转交，从 channel 收到的事件交给 Probe 记录
struct PassThrough {
    inner: Probe,
}

impl Component for PassThrough {
    fn on_message_from_top(&self, ctx: &Ctx<'_>, ev: &Event) -> HandlerResult {
        ctx.send_down(ev.clone());
        Ok(())
    }

    fn on_message_from_bottom(&self, ctx: &Ctx<'_>, ev: &Event) -> HandlerResult {
        self.inner.on_message_from_bottom(ctx, ev)
    }
}

#[test]
fn channel_relays_to_every_attachment_except_sender() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let mut sim = Simulation::default();
    let a = sim.spawn("Node", "A", Probe::new(tx.clone())).unwrap();
    let b = sim.spawn("Node", "B", Probe::new(tx.clone())).unwrap();
    let c = sim.spawn("Node", "C", Probe::new(tx)).unwrap();
    let ch = sim.spawn("Channel", 0, Channel::new()).unwrap();
    for n in [&a, &b, &c] {
        n.connect_to_channel(ConnectorRole::Down, &ch);
    }
    assert!(ch.is_channel());
    assert_eq!(
        ch.attachments(),
        vec![key("Node", "A"), key("Node", "B"), key("Node", "C")]
    );

    let running = sim.start().unwrap();
    for _ in 0..3 {
        assert_eq!(next(&rx).kind, EventKind::Init);
    }

    let ev = Event::new(a.key().clone(), EventKind::FromTop, 42u32);
    let id = ev.id();
    a.send_down(ev);

    let mut got: Vec<_> = (0..2).map(|_| next(&rx)).collect();
    got.sort_by(|x, y| x.component.cmp(&y.component));
    assert_eq!(got[0].component, key("Node", "B"));
    assert_eq!(got[1].component, key("Node", "C"));
    for o in &got {
        assert_eq!(o.kind, EventKind::FromBottom);
        assert_eq!(o.event_id, id);
        assert_eq!(o.source, Some(key("Node", "A")));
        assert_eq!(o.sender, Some(key("Channel", 0)));
        assert_eq!(o.origin_channel, Some(key("Channel", 0)));
        assert_eq!(o.tag, Some(42));
    }
    assert_quiet(&rx);

    running.shutdown();
}

#[test]
fn channel_forwards_to_all_when_source_is_not_attached() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let mut sim = Simulation::default();
    let a = sim.spawn("Node", "A", Probe::new(tx.clone())).unwrap();
    let b = sim.spawn("Node", "B", Probe::new(tx)).unwrap();
    let ch = sim.spawn("Channel", 0, Channel::new()).unwrap();
    a.connect_to_channel(ConnectorRole::Down, &ch);
    b.connect_to_channel(ConnectorRole::Down, &ch);
    let running = sim.start().unwrap();

    ch.trigger_event(Event::new(key("Outside", 0), EventKind::FromBottom, 1u32));
    let first = next_non_init(&rx);
    let second = next_non_init(&rx);
    let mut who = vec![first.component, second.component];
    who.sort();
    assert_eq!(who, vec![key("Node", "A"), key("Node", "B")]);

    running.shutdown();
}

#[test]
fn node_side_of_channel_connection_uses_role() {
    let (tx, _rx) = crossbeam_channel::unbounded();
    let mut sim = Simulation::default();
    let a = sim.spawn("Node", "A", Probe::new(tx)).unwrap();
    let ch = sim.spawn("Channel", 0, Channel::new()).unwrap();
    a.connect_to_channel(ConnectorRole::Down, &ch);

    assert_eq!(a.connected(ConnectorRole::Down), vec![key("Channel", 0)]);
    let summary = ch.connector_summary();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].0, ConnectorKey::Attached(key("Node", "A")));
}

#[test]
fn forwarded_event_is_not_echoed_to_the_link_that_sent_it() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let mut sim = Simulation::default();
    let app = sim.spawn("App", 0, Probe::new(tx.clone())).unwrap();
    let l0 = sim
        .spawn("Link", 0, PassThrough { inner: Probe::new(tx.clone()) })
        .unwrap();
    let l1 = sim
        .spawn("Link", 1, PassThrough { inner: Probe::new(tx) })
        .unwrap();
    let ch = sim.spawn("Channel", "0-1", Channel::new()).unwrap();
    app.connect_to_component(ConnectorRole::Down, &l0);
    l0.connect_to_channel(ConnectorRole::Down, &ch);
    l1.connect_to_channel(ConnectorRole::Down, &ch);
    let running = sim.start().unwrap();
    assert_eq!(next(&rx).component, key("App", 0));

    let ev = Event::new(app.key().clone(), EventKind::FromTop, 8u32);
    let id = ev.id();
    app.send_down(ev);

    let o = next(&rx);
    assert_eq!(o.component, key("Link", 1));
    assert_eq!(o.event_id, id);
    assert_eq!(o.source, Some(key("App", 0)));
    assert_eq!(o.sender, Some(key("Channel", "0-1")));
    assert_quiet(&rx);
    assert_eq!(ch.pending(), 0);

    running.shutdown();
}
