mod channel;
mod message;
mod registry;
mod routing_table;
mod spec;

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

use crate::sim::{Component, ComponentKey, Ctx, Event, EventId, EventKind, HandlerResult};

pub(crate) const WAIT: Duration = Duration::from_secs(2);
pub(crate) const QUIET: Duration = Duration::from_millis(100);

/// 组件观察到的一次处理函数调用
#[derive(Debug, Clone)]
pub(crate) struct Observed {
    pub component: ComponentKey,
    pub kind: EventKind,
    pub event_id: EventId,
    pub source: Option<ComponentKey>,
    pub origin_channel: Option<ComponentKey>,
    pub sender: Option<ComponentKey>,
    pub tag: Option<u32>,
}

/// 把每次处理函数调用报告到 channel 的测试组件
pub(crate) struct Probe {
    tx: Sender<Observed>,
}

impl Probe {
    pub(crate) fn new(tx: Sender<Observed>) -> Self {
        Self { tx }
    }

    fn record(&self, ctx: &Ctx<'_>, ev: &Event) -> HandlerResult {
        let _ = self.tx.send(Observed {
            component: ctx.key().clone(),
            kind: ev.kind(),
            event_id: ev.id(),
            source: ev.source().cloned(),
            origin_channel: ev.origin_channel().cloned(),
            sender: ev.sender().cloned(),
            tag: ev.payload::<u32>().copied(),
        });
        Ok(())
    }
}

impl Component for Probe {
    fn on_init(&self, ctx: &Ctx<'_>, ev: &Event) -> HandlerResult {
        self.record(ctx, ev)
    }

    fn on_message_from_bottom(&self, ctx: &Ctx<'_>, ev: &Event) -> HandlerResult {
        self.record(ctx, ev)
    }

    fn on_message_from_top(&self, ctx: &Ctx<'_>, ev: &Event) -> HandlerResult {
        self.record(ctx, ev)
    }

    fn on_message_from_peer(&self, ctx: &Ctx<'_>, ev: &Event) -> HandlerResult {
        self.record(ctx, ev)
    }
}

/// 接收一条观察记录，超时则测试失败
pub(crate) fn next(rx: &Receiver<Observed>) -> Observed {
    rx.recv_timeout(WAIT).expect("observation within timeout")
}

/// 跳过 Init，接收下一条记录
pub(crate) fn next_non_init(rx: &Receiver<Observed>) -> Observed {
    loop {
        let o = next(rx);
        if o.kind != EventKind::Init {
            return o;
        }
    }
}

/// 确认短时间内没有更多记录
pub(crate) fn assert_quiet(rx: &Receiver<Observed>) {
    if let Ok(o) = rx.recv_timeout(QUIET) {
        panic!("unexpected observation: {o:?}");
    }
}

pub(crate) fn key(name: &str, instance: impl std::fmt::Display) -> ComponentKey {
    ComponentKey::new(name, instance)
}
