//! 组件 trait
//!
//! 协议组件实现的处理函数集合，以及处理函数执行时可用的上下文 `Ctx`。

use std::any::Any;

use tracing::debug;

use super::actor::ComponentHandle;
use super::connector::ConnectorRole;
use super::context::SimContext;
use super::error::{HandlerError, HandlerResult};
use super::event::{Event, EventKind};
use super::handle::HandleTable;
use super::key::ComponentKey;
use super::registry::Registry;
use crate::net::Topology;

/// 协议组件：按事件类别提供处理函数，默认全部为空操作。
///
/// 处理函数通过 `&self` 调用：组件配置多个 worker 线程时，同一组件的处理函数
/// 可能并发执行，可变状态需要组件自己加锁。处理函数应尽快返回，它执行期间
/// 独占所在的 worker 线程。
pub trait Component: Send + Sync + 'static {
    /// 是否为共享介质（Channel）
    fn is_channel(&self) -> bool {
        false
    }

    fn on_init(&self, _ctx: &Ctx<'_>, _ev: &Event) -> HandlerResult {
        Ok(())
    }

    fn on_message_from_bottom(&self, _ctx: &Ctx<'_>, _ev: &Event) -> HandlerResult {
        Ok(())
    }

    fn on_message_from_top(&self, _ctx: &Ctx<'_>, _ev: &Event) -> HandlerResult {
        Ok(())
    }

    fn on_message_from_peer(&self, _ctx: &Ctx<'_>, _ev: &Event) -> HandlerResult {
        Ok(())
    }

    /// 自定义事件类别（`EventKind::Custom`）的处理函数
    fn on_event(&self, _ctx: &Ctx<'_>, ev: &Event) -> HandlerResult {
        Err(HandlerError::Unhandled(ev.kind()))
    }

    /// 每个事件分发到处理函数之前调用
    fn on_pre_event(&self, _ctx: &Ctx<'_>, _ev: &Event) {}

    /// 连接到 channel 时调用（仅用于诊断）
    fn on_connected_to_channel(&self, me: &ComponentKey, role: ConnectorRole, channel: &ComponentKey) {
        debug!(component = %me, %role, channel = %channel, "🔌 已连接到 channel");
    }
}

/// 处理函数的执行上下文：当前组件 + 冻结的仿真上下文。
pub struct Ctx<'a> {
    me: &'a ComponentHandle,
    sim: &'a SimContext,
}

impl<'a> Ctx<'a> {
    pub(crate) fn new(me: &'a ComponentHandle, sim: &'a SimContext) -> Self {
        Self { me, sim }
    }

    pub fn key(&self) -> &ComponentKey {
        self.me.key()
    }

    pub fn handle(&self) -> &ComponentHandle {
        self.me
    }

    pub fn context(&self) -> &SimContext {
        self.sim
    }

    pub fn registry(&self) -> &Registry {
        self.sim.registry()
    }

    pub fn topology(&self) -> &Topology {
        self.sim.topology()
    }

    pub fn handles(&self) -> &HandleTable {
        self.sim.handles()
    }

    /// 以当前组件为来源构造事件
    pub fn event<T: Any + Send + Sync>(&self, kind: EventKind, payload: T) -> Event {
        Event::new(self.key().clone(), kind, payload)
    }

    pub fn send_down(&self, ev: Event) {
        self.me.send_down(ev);
    }

    pub fn send_up(&self, ev: Event) {
        self.me.send_up(ev);
    }

    pub fn send_peer(&self, ev: Event) {
        self.me.send_peer(ev);
    }

    pub fn send_self(&self, ev: Event) {
        self.me.send_self(ev);
    }
}
