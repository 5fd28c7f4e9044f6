//! 仿真
//!
//! `Simulation` 是连线阶段的应用上下文：单线程地创建组件、登记、连线、构建拓扑。
//! `start()` 计算转发表、把上下文冻结为 `SimContext`、启动所有 worker 线程并
//! 广播 Init，返回运行中的 `RunningSimulation`。

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info};

use super::actor::ComponentHandle;
use super::component::Component;
use super::config::SimConfig;
use super::context::SimContext;
use super::error::RegistryError;
use super::event::Event;
use super::handle::HandleTable;
use super::key::ComponentKey;
use super::registry::Registry;
use crate::error::Result;
use crate::net::Topology;

#[derive(Default)]
pub struct Simulation {
    config: SimConfig,
    registry: Registry,
    topology: Topology,
    handles: Arc<HandleTable>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// 创建并登记组件（使用默认 worker 数）
    pub fn spawn<C: Component>(
        &mut self,
        name: &str,
        instance: impl fmt::Display,
        component: C,
    ) -> std::result::Result<ComponentHandle, RegistryError> {
        let workers = self.config.default_workers;
        self.spawn_with_workers(name, instance, component, workers)
    }

    pub fn spawn_with_workers<C: Component>(
        &mut self,
        name: &str,
        instance: impl fmt::Display,
        component: C,
        workers: usize,
    ) -> std::result::Result<ComponentHandle, RegistryError> {
        let key = ComponentKey::new(name, instance);
        let handle = ComponentHandle::new(key, component, workers);
        self.registry.register(handle.clone())?;
        Ok(handle)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn topology_mut(&mut self) -> &mut Topology {
        &mut self.topology
    }

    pub fn handles(&self) -> &Arc<HandleTable> {
        &self.handles
    }

    /// 计算转发表，冻结上下文，启动 worker 并广播 Init。
    #[tracing::instrument(skip(self), fields(components = self.registry.len(), nodes = self.topology.node_count()))]
    pub fn start(self) -> Result<RunningSimulation> {
        let Simulation {
            config,
            registry,
            mut topology,
            handles,
        } = self;

        topology.compute_forwarding_table();
        debug!(wiring = %registry.describe(), "连线完成");
        topology.log_forwarding_table();

        let ctx = Arc::new(SimContext {
            config,
            registry,
            topology,
            handles,
        });
        let running = RunningSimulation {
            ctx: Arc::clone(&ctx),
        };

        for c in ctx.registry.iter() {
            if let Err(e) = c.start_workers(&ctx) {
                error!(component = %c.key(), error = %e, "启动 worker 失败");
                running.terminate_all();
                return Err(e.into());
            }
        }
        ctx.registry.init_all()?;

        info!("▶️  仿真已启动");
        Ok(running)
    }
}

/// 运行中的仿真。释放时终止所有组件（不等待线程退出）。
pub struct RunningSimulation {
    ctx: Arc<SimContext>,
}

impl RunningSimulation {
    pub fn context(&self) -> &Arc<SimContext> {
        &self.ctx
    }

    pub fn registry(&self) -> &Registry {
        self.ctx.registry()
    }

    pub fn topology(&self) -> &Topology {
        self.ctx.topology()
    }

    pub fn handles(&self) -> &HandleTable {
        self.ctx.handles()
    }

    /// 向指定组件投递事件；组件不存在时返回 false
    pub fn trigger(&self, key: &ComponentKey, ev: Event) -> bool {
        match self.ctx.registry.get(key) {
            Some(c) => {
                c.trigger_event(ev);
                true
            }
            None => false,
        }
    }

    pub fn terminate_all(&self) {
        for c in self.ctx.registry.iter() {
            c.terminate();
        }
    }

    /// 终止所有组件并等待 worker 线程退出
    #[tracing::instrument(skip(self))]
    pub fn shutdown(self) {
        self.terminate_all();
        for c in self.ctx.registry.iter() {
            c.join();
        }
        info!("⏹️  仿真已停止");
    }
}

impl Drop for RunningSimulation {
    fn drop(&mut self) {
        self.terminate_all();
    }
}
