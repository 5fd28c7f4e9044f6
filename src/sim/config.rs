//! 仿真配置

use serde::{Deserialize, Serialize};

fn default_workers() -> usize {
    1
}

/// 仿真配置（可从 JSON 读取，缺省字段取默认值）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// 每个组件的 worker 线程数。大于 1 时同一组件的处理函数可能并发执行。
    #[serde(default = "default_workers")]
    pub default_workers: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            default_workers: default_workers(),
        }
    }
}
