//! 演示和示例代码
//!
//! 基于转发表逐跳路由的 ping/pong 节点及其统计信息。节点把消息向下发给所有
//! 接入的 channel，只有消息头 `next_hop` 指向自己的节点才处理，其余节点忽略。

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::{debug, info, trace, warn};

use crate::net::{Address, GenericMessage, MessageHeader, NextHop, NodeId};
use crate::sim::{Component, Ctx, Event, EventKind, HandlerError, HandlerResult};

pub const PING: &str = "PING";
pub const PONG: &str = "PONG";

/// 演示消息
pub type DemoMessage = GenericMessage<String>;

/// 到达目的节点的消息
#[derive(Debug, Clone)]
pub struct Delivery {
    pub node: NodeId,
    pub message: DemoMessage,
}

/// 演示统计信息
#[derive(Debug, Default)]
pub struct DemoStats {
    pub delivered: AtomicU64,
    pub forwarded: AtomicU64,
    pub dropped: AtomicU64,
}

impl DemoStats {
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn forwarded(&self) -> u64 {
        self.forwarded.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// ping/pong 节点
pub struct PingNode {
    id: NodeId,
    target: Option<(NodeId, u32)>,
    stats: Arc<DemoStats>,
    deliveries: Sender<Delivery>,
    seq: AtomicI64,
}

impl PingNode {
    pub fn new(id: NodeId, stats: Arc<DemoStats>, deliveries: Sender<Delivery>) -> Self {
        Self {
            id,
            target: None,
            stats,
            deliveries,
            seq: AtomicI64::new(0),
        }
    }

    /// Init 时向 `dst` 发送 `count` 个 ping
    pub fn with_target(mut self, dst: NodeId, count: u32) -> Self {
        self.target = Some((dst, count));
        self
    }

    fn next_seq(&self) -> i64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    /// 查转发表，填入下一跳并向下发送
    fn route(&self, ctx: &Ctx<'_>, mut msg: DemoMessage, dst: NodeId) -> HandlerResult {
        let hop = ctx
            .topology()
            .next_hop(self.id, dst)
            .map_err(|e| HandlerError::failed(e.to_string()))?;
        match hop {
            NextHop::Via(nh) => {
                trace!(node = %self.id, dst = %dst, next_hop = %nh, "转发");
                msg.header.next_hop = Some(nh);
                ctx.send_down(ctx.event(EventKind::FromTop, msg));
            }
            NextHop::Local(_) => self.deliver(ctx, msg)?,
            NextHop::Unreachable => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(node = %self.id, dst = %dst, uid = %msg.unique_id(), "目的不可达，丢弃");
            }
        }
        Ok(())
    }

    fn deliver(&self, ctx: &Ctx<'_>, msg: DemoMessage) -> HandlerResult {
        self.stats.delivered.fetch_add(1, Ordering::Relaxed);
        info!(node = %self.id, kind = %msg.header.message_type, uid = %msg.unique_id(), "✅ 消息送达");

        let reply_to = (msg.header.message_type == PING).then(|| msg.header.from.clone());
        let uid = msg.unique_id();
        // 先报告送达，再发出 pong
        let _ = self.deliveries.send(Delivery {
            node: self.id,
            message: msg,
        });

        match reply_to {
            Some(Address::Node(origin)) => {
                let reply = DemoMessage::new(
                    MessageHeader::new(PONG, self.id, origin).with_sequence_number(self.next_seq()),
                    format!("pong for {uid}"),
                );
                self.route(ctx, reply, origin)
            }
            Some(other) => Err(HandlerError::failed(format!("cannot answer ping from {other}"))),
            None => Ok(()),
        }
    }
}

impl Component for PingNode {
    fn on_init(&self, ctx: &Ctx<'_>, _ev: &Event) -> HandlerResult {
        let Some((dst, count)) = self.target else {
            return Ok(());
        };
        debug!(node = %self.id, dst = %dst, count, "开始发送 ping");
        for _ in 0..count {
            let msg = DemoMessage::new(
                MessageHeader::new(PING, self.id, dst).with_sequence_number(self.next_seq()),
                format!("ping from {}", self.id),
            );
            self.route(ctx, msg, dst)?;
        }
        Ok(())
    }

    fn on_message_from_bottom(&self, ctx: &Ctx<'_>, ev: &Event) -> HandlerResult {
        let msg = ev.payload_as::<DemoMessage>()?;
        if msg.header.next_hop != Some(self.id) {
            trace!(node = %self.id, uid = %msg.unique_id(), "不是下一跳，忽略");
            return Ok(());
        }

        if msg.header.is_for(self.id) {
            return self.deliver(ctx, msg.clone());
        }

        let Address::Node(dst) = msg.header.to else {
            self.stats.dropped.fetch_add(1, Ordering::Relaxed);
            return Err(HandlerError::failed(format!(
                "cannot route to {}",
                msg.header.to
            )));
        };
        self.stats.forwarded.fetch_add(1, Ordering::Relaxed);
        self.route(ctx, msg.clone(), dst)
    }
}
