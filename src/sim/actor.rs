//! 组件执行模型
//!
//! 每个组件拥有一个无界 FIFO 邮箱，由若干 worker 线程（默认 1 个）消费。
//! 发送（`send_down/up/peer/self`）只是向目标邮箱入队，不阻塞；唯一的阻塞点是
//! worker 从邮箱取事件。终止时先置位终止标志，再为每个 worker 入队一条
//! `Shutdown` 消息，保证阻塞在空邮箱上的线程也能退出。

use std::any::Any;
use std::fmt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, trace, warn};

use super::component::{Component, Ctx};
use super::connector::{Connection, ConnectorKey, ConnectorRole, ConnectorTable};
use super::context::SimContext;
use super::error::HandlerError;
use super::event::{Event, EventKind};
use super::key::ComponentKey;

/// 邮箱中的条目
pub(crate) enum Envelope {
    Event(Event),
    /// 毒丸消息：收到后 worker 线程退出
    Shutdown,
}

/// 组件生命周期：Created → Running → Terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Running,
    Terminated,
}

impl Lifecycle {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Lifecycle::Created,
            1 => Lifecycle::Running,
            _ => Lifecycle::Terminated,
        }
    }
}

pub(crate) struct ComponentCell {
    key: ComponentKey,
    behaviour: Box<dyn Component>,
    is_channel: bool,
    workers: usize,
    tx: Sender<Envelope>,
    rx: Receiver<Envelope>,
    connectors: RwLock<ConnectorTable>,
    state: AtomicU8,
    terminated: AtomicBool,
    threads: Mutex<Vec<JoinHandle<()>>>,
}

/// 组件句柄（共享引用）。Registry 持有强引用，连接器表只持有弱引用。
#[derive(Clone)]
pub struct ComponentHandle(Arc<ComponentCell>);

impl ComponentHandle {
    pub(crate) fn new<C: Component>(key: ComponentKey, behaviour: C, workers: usize) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        let is_channel = behaviour.is_channel();
        Self(Arc::new(ComponentCell {
            key,
            behaviour: Box::new(behaviour),
            is_channel,
            workers: workers.max(1),
            tx,
            rx,
            connectors: RwLock::new(ConnectorTable::default()),
            state: AtomicU8::new(Lifecycle::Created as u8),
            terminated: AtomicBool::new(false),
            threads: Mutex::new(Vec::new()),
        }))
    }

    fn from_weak(w: &Weak<ComponentCell>) -> Option<Self> {
        w.upgrade().map(ComponentHandle)
    }

    fn downgrade(&self) -> Weak<ComponentCell> {
        Arc::downgrade(&self.0)
    }

    fn connection(&self) -> Connection {
        Connection {
            key: self.0.key.clone(),
            target: self.downgrade(),
        }
    }

    pub fn key(&self) -> &ComponentKey {
        &self.0.key
    }

    pub fn unique_name(&self) -> String {
        self.0.key.unique_name()
    }

    pub fn is_channel(&self) -> bool {
        self.0.is_channel
    }

    pub fn workers(&self) -> usize {
        self.0.workers
    }

    pub fn state(&self) -> Lifecycle {
        Lifecycle::from_u8(self.0.state.load(Ordering::Acquire))
    }

    pub fn is_terminated(&self) -> bool {
        self.0.terminated.load(Ordering::Acquire)
    }

    /// 邮箱中尚未取出的条目数
    pub fn pending(&self) -> usize {
        self.0.rx.len()
    }

    pub fn ptr_eq(&self, other: &ComponentHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// 把 `peer` 追加到 `role` 的连接列表（单向）
    ///
    /// 只能在连线阶段（`Simulation::start()` 之前）调用；启动之后连线属于
    /// 违反前置条件，正在运行的发送方可能看不到新连接。
    pub fn connect_to_component(&self, role: ConnectorRole, peer: &ComponentHandle) {
        debug!(component = %self.key(), %role, peer = %peer.key(), "连接组件");
        self.0
            .connectors
            .write()
            .push(ConnectorKey::Role(role), peer.connection());
    }

    /// 连接到 channel：双向登记，并调用 `on_connected_to_channel` 钩子
    ///
    /// 与 `connect_to_component` 相同，只能在 `start()` 之前调用。
    pub fn connect_to_channel(&self, role: ConnectorRole, channel: &ComponentHandle) {
        self.connect_to_component(role, channel);
        channel.0.connectors.write().push(
            ConnectorKey::Attached(self.key().clone()),
            self.connection(),
        );
        self.0
            .behaviour
            .on_connected_to_channel(self.key(), role, channel.key());
    }

    /// `role` 下已连接组件的标识（按连接顺序）
    pub fn connected(&self, role: ConnectorRole) -> Vec<ComponentKey> {
        self.0
            .connectors
            .read()
            .get(&ConnectorKey::Role(role))
            .iter()
            .map(|c| c.key.clone())
            .collect()
    }

    /// Channel 上所有接入方的标识（有序）
    pub fn attachments(&self) -> Vec<ComponentKey> {
        self.0
            .connectors
            .read()
            .iter()
            .filter_map(|(k, _)| match k {
                ConnectorKey::Attached(key) => Some(key.clone()),
                ConnectorKey::Role(_) => None,
            })
            .collect()
    }

    /// 连接器表快照：(键, 目标标识列表)
    pub fn connector_summary(&self) -> Vec<(ConnectorKey, Vec<ComponentKey>)> {
        self.0
            .connectors
            .read()
            .iter()
            .map(|(k, conns)| (k.clone(), conns.iter().map(|c| c.key.clone()).collect()))
            .collect()
    }

    /// 向 `key` 下的所有连接广播事件；没有连接时什么也不做。
    pub fn send_to(&self, key: &ConnectorKey, ev: Event) {
        let targets: Vec<Connection> = self.0.connectors.read().get(key).to_vec();
        if targets.is_empty() {
            trace!(component = %self.key(), connector = %key, event_id = ev.id(), "无连接，忽略发送");
            return;
        }
        for conn in &targets {
            match ComponentHandle::from_weak(&conn.target) {
                Some(peer) => peer.trigger_event(ev.clone().handed_by(self.key())),
                None => trace!(target = %conn.key, "目标组件已释放"),
            }
        }
    }

    pub fn send_down(&self, ev: Event) {
        self.send_to(&ConnectorKey::Role(ConnectorRole::Down), ev);
    }

    pub fn send_up(&self, ev: Event) {
        self.send_to(&ConnectorKey::Role(ConnectorRole::Up), ev);
    }

    pub fn send_peer(&self, ev: Event) {
        self.send_to(&ConnectorKey::Role(ConnectorRole::Peer), ev);
    }

    /// 投递到自己的邮箱（回环）
    pub fn send_self(&self, ev: Event) {
        self.trigger_event(ev.handed_by(self.key()));
    }

    /// 唯一的入口：线程安全、不阻塞、FIFO。
    pub fn trigger_event(&self, ev: Event) {
        trace!(component = %self.key(), event_id = ev.id(), kind = %ev.kind(), "入队");
        // 发送端与接收端都由本结构持有，send 不会失败
        let _ = self.0.tx.send(Envelope::Event(ev));
    }

    /// 协作式终止：置位终止标志并为每个 worker 入队一条 Shutdown。
    pub fn terminate(&self) {
        if self.0.terminated.swap(true, Ordering::AcqRel) {
            return;
        }
        self.0
            .state
            .store(Lifecycle::Terminated as u8, Ordering::Release);
        for _ in 0..self.0.workers {
            let _ = self.0.tx.send(Envelope::Shutdown);
        }
        debug!(component = %self.key(), "🛑 已请求终止");
    }

    /// 等待所有 worker 线程退出
    pub fn join(&self) {
        let threads: Vec<JoinHandle<()>> = self.0.threads.lock().drain(..).collect();
        for t in threads {
            if t.join().is_err() {
                warn!(component = %self.key(), "worker 线程异常退出");
            }
        }
    }

    /// 启动 worker 线程
    pub(crate) fn start_workers(&self, ctx: &Arc<SimContext>) -> io::Result<()> {
        let mut threads = self.0.threads.lock();
        for idx in 0..self.0.workers {
            let me = self.clone();
            let ctx = Arc::clone(ctx);
            let t = thread::Builder::new()
                .name(format!("{}#{}", self.key(), idx))
                .spawn(move || me.run_worker(&ctx))?;
            threads.push(t);
        }
        Ok(())
    }

    fn run_worker(&self, ctx: &SimContext) {
        let _ = self.0.state.compare_exchange(
            Lifecycle::Created as u8,
            Lifecycle::Running as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        trace!(component = %self.key(), "worker 启动");

        while !self.is_terminated() {
            match self.0.rx.recv() {
                Ok(Envelope::Event(ev)) => {
                    // 取出后再次检查：终止之后不再调用处理函数
                    if self.is_terminated() {
                        trace!(event_id = ev.id(), "组件已终止，丢弃事件");
                        break;
                    }
                    self.dispatch(ctx, &ev);
                }
                Ok(Envelope::Shutdown) | Err(_) => break,
            }
        }

        trace!(component = %self.key(), "worker 退出");
    }

    /// 按事件类别分发到处理函数。处理函数的错误与 panic 都在此处捕获并记录。
    #[tracing::instrument(skip(self, ctx, ev), fields(component = %self.key(), event_id = ev.id(), kind = %ev.kind()))]
    fn dispatch(&self, ctx: &SimContext, ev: &Event) {
        let cx = Ctx::new(self, ctx);
        let comp = &self.0.behaviour;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            comp.on_pre_event(&cx, ev);
            match ev.kind() {
                EventKind::Init => comp.on_init(&cx, ev),
                EventKind::FromBottom => comp.on_message_from_bottom(&cx, ev),
                EventKind::FromTop => comp.on_message_from_top(&cx, ev),
                EventKind::FromPeer => comp.on_message_from_peer(&cx, ev),
                EventKind::Custom(_) => comp.on_event(&cx, ev),
            }
        }));

        match outcome {
            Ok(Ok(())) => trace!("处理完成"),
            Ok(Err(HandlerError::Unhandled(kind))) => {
                warn!(%kind, "handler not implemented，事件已丢弃");
            }
            Ok(Err(e)) => error!(error = %e, "处理函数返回错误"),
            Err(payload) => error!(panic = panic_message(payload.as_ref()), "处理函数 panic"),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic>"
    }
}

impl fmt::Debug for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentHandle")
            .field("key", self.key())
            .field("is_channel", &self.is_channel())
            .field("state", &self.state())
            .finish()
    }
}

impl Drop for ComponentCell {
    fn drop(&mut self) {
        trace!(component = %self.key, "组件释放");
    }
}
