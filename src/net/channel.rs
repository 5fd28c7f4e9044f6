//! 共享介质
//!
//! Channel 也是一个组件，但它的连接器表按接入方标识索引，没有上/下之分。
//! 收到的任何事件都会转发给除直接发送方之外的每个接入方，转发后的事件类别为
//! `FromBottom`，并记录经过的 channel。

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace};

use crate::sim::{Component, ConnectorKey, Ctx, Event, EventKind, HandlerResult};

/// 广播型 channel
#[derive(Debug, Default)]
pub struct Channel {
    relayed: AtomicU64,
}

impl Channel {
    pub fn new() -> Self {
        Self::default()
    }

    /// 累计转发的副本数
    pub fn relayed(&self) -> u64 {
        self.relayed.load(Ordering::Relaxed)
    }

    #[tracing::instrument(skip(self, ctx, ev), fields(channel = %ctx.key(), event_id = ev.id()))]
    fn relay(&self, ctx: &Ctx<'_>, ev: &Event) -> HandlerResult {
        let me = ctx.handle();
        let out = ev.relayed(EventKind::FromBottom, me.key().clone());

        let mut copies = 0u64;
        for peer in me.attachments() {
            if ev.sender() == Some(&peer) {
                trace!(peer = %peer, "跳过发送方");
                continue;
            }
            me.send_to(&ConnectorKey::Attached(peer), out.clone());
            copies += 1;
        }

        self.relayed.fetch_add(copies, Ordering::Relaxed);
        debug!(copies, "📡 channel 转发");
        Ok(())
    }
}

impl Component for Channel {
    fn is_channel(&self) -> bool {
        true
    }

    fn on_message_from_top(&self, ctx: &Ctx<'_>, ev: &Event) -> HandlerResult {
        self.relay(ctx, ev)
    }

    fn on_message_from_bottom(&self, ctx: &Ctx<'_>, ev: &Event) -> HandlerResult {
        self.relay(ctx, ev)
    }
}
