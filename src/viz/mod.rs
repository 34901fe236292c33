//! 可视化事件记录（用于离线回放）
//!
//! 设计目标：
//! - **结构化**：用 JSON 事件描述每一次可见的状态变化
//! - **轻量**：只在内存里收集，结束时由 CLI 写文件
//! - **可回放**：事件按仿真时间排列，可逐帧重建组件画面

mod types;

pub use types::{VizEvent, VizEventKind, VizLogger, VizPacketKind, WidgetKind};
