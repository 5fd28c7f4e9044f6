//! 不透明句柄表
//!
//! 外部回调（例如无线电设备的接收线程）无法携带组件引用，只能携带一个整数句柄。
//! 句柄在登记时分配；回调通过句柄找回所属组件，再用 `send_self` 把控制权交回
//! actor 模型。

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::{debug, trace};

use super::actor::ComponentHandle;
use super::event::Event;

/// 不透明整数句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(pub u64);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

#[derive(Default)]
pub struct HandleTable {
    next: AtomicU64,
    entries: RwLock<HashMap<Handle, ComponentHandle>>,
}

impl HandleTable {
    /// 为组件分配一个新句柄
    pub fn register(&self, component: &ComponentHandle) -> Handle {
        let h = Handle(self.next.fetch_add(1, Ordering::Relaxed));
        self.entries.write().insert(h, component.clone());
        debug!(handle = %h, component = %component.key(), "分配句柄");
        h
    }

    pub fn resolve(&self, h: Handle) -> Option<ComponentHandle> {
        self.entries.read().get(&h).cloned()
    }

    /// 释放句柄；之后的回调无法再找到组件
    pub fn release(&self, h: Handle) -> Option<ComponentHandle> {
        self.entries.write().remove(&h)
    }

    /// 回调入口：找到所属组件并投递到它自己的邮箱。句柄无效时返回 false。
    pub fn send_self(&self, h: Handle, ev: Event) -> bool {
        match self.resolve(h) {
            Some(c) => {
                c.send_self(ev);
                true
            }
            None => {
                trace!(handle = %h, "句柄无效，丢弃回调事件");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
