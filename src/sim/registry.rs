//! 组件目录
//!
//! 按 `(name, instance)` 登记所有组件，支持查找与一次性的 Init 广播。
//! 只在单线程的连线阶段写入；`start()` 之后随 `SimContext` 冻结为只读。

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use super::actor::ComponentHandle;
use super::error::RegistryError;
use super::event::Event;
use super::key::ComponentKey;

#[derive(Default)]
pub struct Registry {
    components: BTreeMap<ComponentKey, ComponentHandle>,
    initialized: AtomicBool,
}

impl Registry {
    /// 登记组件。重复的 `(name, instance)` 被拒绝，先登记的组件保持不变。
    pub fn register(&mut self, component: ComponentHandle) -> Result<(), RegistryError> {
        let key = component.key().clone();
        if self.components.contains_key(&key) {
            return Err(RegistryError::DuplicateKey(key));
        }
        debug!(component = %key, "登记组件");
        self.components.insert(key, component);
        Ok(())
    }

    pub fn lookup_by_key(&self, name: &str, instance: impl std::fmt::Display) -> Option<&ComponentHandle> {
        self.components.get(&ComponentKey::new(name, instance))
    }

    pub fn get(&self, key: &ComponentKey) -> Option<&ComponentHandle> {
        self.components.get(key)
    }

    /// 反向查找：返回指向同一组件实例的所有键（线性扫描）
    pub fn lookup_by_instance(&self, component: &ComponentHandle) -> Vec<ComponentKey> {
        self.components
            .iter()
            .filter(|(_, c)| c.ptr_eq(component))
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// 按键有序遍历
    pub fn iter(&self) -> impl Iterator<Item = &ComponentHandle> {
        self.components.values()
    }

    /// 所有非 channel 组件
    pub fn non_channel_components(&self) -> Vec<&ComponentHandle> {
        self.components.values().filter(|c| !c.is_channel()).collect()
    }

    /// 向所有已登记组件的邮箱投递一个 Init 事件，只能执行一次。
    #[tracing::instrument(skip(self), fields(components = self.components.len()))]
    pub fn init_all(&self) -> Result<(), RegistryError> {
        if self.initialized.swap(true, Ordering::AcqRel) {
            return Err(RegistryError::AlreadyInitialized);
        }
        for c in self.components.values() {
            debug!(component = %c.key(), "投递 Init");
            c.trigger_event(Event::init());
        }
        info!("🚀 Init 广播完成");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// 连线情况的文本描述（每个组件一行，连接缩进列出）
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for c in self.components.values() {
            out.push_str(&format!("{}\n", c.key()));
            for (connector, peers) in c.connector_summary() {
                for p in peers {
                    out.push_str(&format!("\t{connector} {p}\n"));
                }
            }
        }
        out
    }
}
