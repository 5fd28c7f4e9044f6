//! 冻结的仿真上下文
//!
//! `start()` 之后 Registry 与 Topology 只能通过共享引用访问，连线阶段之后的
//! 修改在类型层面不可表达。

use std::sync::Arc;

use super::config::SimConfig;
use super::handle::HandleTable;
use super::registry::Registry;
use crate::net::Topology;

pub struct SimContext {
    pub(crate) config: SimConfig,
    pub(crate) registry: Registry,
    pub(crate) topology: Topology,
    pub(crate) handles: Arc<HandleTable>,
}

impl SimContext {
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn handles(&self) -> &HandleTable {
        &self.handles
    }
}
