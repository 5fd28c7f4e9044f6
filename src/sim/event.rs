//! 事件类型
//!
//! 定义组件之间传递的不可变事件，以及进程内单调递增的事件 id 分配。

use std::any::{Any, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use super::error::HandlerError;
use super::key::ComponentKey;

/// 事件 id
pub type EventId = u64;

/// 事件载荷：对核心不透明，由组件自行约定语义。
pub type Payload = Arc<dyn Any + Send + Sync>;

static NEXT_EVENT_ID: AtomicU64 = AtomicU64::new(0);

/// 分配下一个事件 id（全进程唯一，按分配顺序严格递增）。
pub fn next_event_id() -> EventId {
    NEXT_EVENT_ID.fetch_add(1, Ordering::Relaxed)
}

/// 事件类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Init,
    FromBottom,
    FromTop,
    FromPeer,
    /// 协议组件自定义的事件类别（例如物理层接收回调）
    Custom(&'static str),
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Init => f.write_str("init"),
            EventKind::FromBottom => f.write_str("msgfrombottom"),
            EventKind::FromTop => f.write_str("msgfromtop"),
            EventKind::FromPeer => f.write_str("msgfrompeer"),
            EventKind::Custom(name) => f.write_str(name),
        }
    }
}

/// 不可变事件。相等性与哈希只由 `id` 决定，与内容无关。
#[derive(Clone)]
pub struct Event {
    id: EventId,
    kind: EventKind,
    source: Option<ComponentKey>,
    payload: Option<Payload>,
    origin_channel: Option<ComponentKey>,
    /// 把事件交给当前组件的直接发送方（经连接器投递时由发送方填写）
    sender: Option<ComponentKey>,
    created_at: SystemTime,
}

impl Event {
    /// 创建事件，自动分配 id
    pub fn new<T: Any + Send + Sync>(source: ComponentKey, kind: EventKind, payload: T) -> Self {
        Self::with_id(next_event_id(), source, kind, payload)
    }

    /// 使用调用者给定的 id 创建事件（重投递/转发时使用）
    pub fn with_id<T: Any + Send + Sync>(
        id: EventId,
        source: ComponentKey,
        kind: EventKind,
        payload: T,
    ) -> Self {
        Self {
            id,
            kind,
            source: Some(source),
            payload: Some(Arc::new(payload)),
            origin_channel: None,
            sender: None,
            created_at: SystemTime::now(),
        }
    }

    /// 不带载荷的事件
    pub fn signal(source: ComponentKey, kind: EventKind) -> Self {
        Self {
            id: next_event_id(),
            kind,
            source: Some(source),
            payload: None,
            origin_channel: None,
            sender: None,
            created_at: SystemTime::now(),
        }
    }

    /// Registry 广播的 Init 事件，没有来源组件。
    pub(crate) fn init() -> Self {
        Self {
            id: next_event_id(),
            kind: EventKind::Init,
            source: None,
            payload: None,
            origin_channel: None,
            sender: None,
            created_at: SystemTime::now(),
        }
    }

    /// 经由 channel 转发：保留 id、来源与载荷，记录经过的 channel。
    pub fn relayed(&self, kind: EventKind, channel: ComponentKey) -> Self {
        Self {
            id: self.id,
            kind,
            source: self.source.clone(),
            payload: self.payload.clone(),
            origin_channel: Some(channel),
            sender: None,
            created_at: SystemTime::now(),
        }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn source(&self) -> Option<&ComponentKey> {
        self.source.as_ref()
    }

    pub fn origin_channel(&self) -> Option<&ComponentKey> {
        self.origin_channel.as_ref()
    }

    /// 直接发送方。通过 `send_down/up/peer/self` 投递的事件总是带有发送方，
    /// 外部直接 `trigger_event` 的事件没有。
    pub fn sender(&self) -> Option<&ComponentKey> {
        self.sender.as_ref()
    }

    pub(crate) fn handed_by(mut self, sender: &ComponentKey) -> Self {
        self.sender = Some(sender.clone());
        self
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// 按类型读取载荷
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref().and_then(|p| p.downcast_ref::<T>())
    }

    /// 按类型读取载荷，类型不符时返回 `HandlerError::PayloadType`
    pub fn payload_as<T: Any>(&self) -> Result<&T, HandlerError> {
        self.payload::<T>().ok_or(HandlerError::PayloadType {
            expected: type_name::<T>(),
        })
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Event {}

impl Hash for Event {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("source", &self.source)
            .field("origin_channel", &self.origin_channel)
            .field("sender", &self.sender)
            .field("has_payload", &self.payload.is_some())
            .finish()
    }
}
