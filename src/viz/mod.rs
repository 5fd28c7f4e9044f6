//! 拓扑快照（供可视化使用）
//!
//! 设计目标：
//! - **只读**：从冻结的拓扑导出，不回写核心
//! - **结构化**：JSON 输出，前端自行布局与绘制

mod types;

pub use types::{VizChannelInfo, VizNodeInfo, TopologySnapshot};
