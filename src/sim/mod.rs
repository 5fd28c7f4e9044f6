//! 仿真核心模块
//!
//! 此模块包含 actor/事件仿真的核心组件：事件、组件执行模型、连接器、
//! 组件目录、句柄表与仿真上下文。

// 子模块声明
mod actor;
mod component;
mod config;
mod connector;
mod context;
mod error;
mod event;
mod handle;
mod key;
mod registry;
mod simulation;

// 重新导出公共接口
pub use actor::{ComponentHandle, Lifecycle};
pub use component::{Component, Ctx};
pub use config::SimConfig;
pub use connector::{ConnectorKey, ConnectorRole};
pub use context::SimContext;
pub use error::{HandlerError, HandlerResult, RegistryError};
pub use event::{Event, EventId, EventKind, Payload, next_event_id};
pub use handle::{Handle, HandleTable};
pub use key::ComponentKey;
pub use registry::Registry;
pub use simulation::{RunningSimulation, Simulation};
