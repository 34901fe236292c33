use serde::{Deserialize, Serialize};

use crate::seq::{Counters, Direction};
use crate::view::Tone;

/// 事件来自哪个演示组件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Handshake,
    Transfer,
    Exchange,
    Parsing,
    Pipeline,
    Resolve,
}

/// 数据包类别（便于回放时上色）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VizPacketKind {
    Control,
    Data,
    Ack,
    Request,
    Response,
}

/// 可视化事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VizEventKind {
    /// 状态标签变化（Connected / Request in flight ...）
    Status { label: String, tone: Tone },
    /// 步骤表中的当前步骤
    StepActive { index: Option<usize> },
    /// 数据包出现在轨道起点
    PacketLaunch {
        name: String,
        meta: String,
        packet: VizPacketKind,
        direction: Direction,
        at_pct: u8,
    },
    /// 数据包开始向终点移动
    PacketTravel { to_pct: u8 },
    /// 数据包到达并交付
    PacketDelivered { name: String },
    /// 数据包被人为丢弃
    PacketDropped { name: String },
    /// 数据包从轨道上消失
    PacketCleared,
    /// 网络告警开关
    NetworkAlert { on: bool },
    /// seq/ack 计数更新
    Counters(Counters),
    /// HTML 解析前进一行
    LineParsed { line: usize, dom_lines: usize },
    /// 渲染流水线高亮
    StageHighlight { stages: Vec<String> },
    /// DNS 查询开始
    LookupStart { host: String },
    /// DNS 查询结果
    LookupDone { host: String, addresses: Vec<String> },
    /// 输入被拒绝或无记录
    LookupError { message: String },
}

/// 一个可回放的事件（JSON）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizEvent {
    /// 仿真时间（纳秒，和 `SimTime.0` 同口径）
    pub t_ns: u64,
    pub widget: WidgetKind,
    /// 组件的动画 tick；同一 tick 内的事件属于同一次过渡
    pub tick: u64,
    #[serde(flatten)]
    pub kind: VizEventKind,
}

/// 一个简单的事件收集器（存内存，结束时写 JSON 文件）
#[derive(Debug, Default)]
pub struct VizLogger {
    pub events: Vec<VizEvent>,
}

impl VizLogger {
    pub fn push(&mut self, ev: VizEvent) {
        self.events.push(ev);
    }

    pub fn count(&self, pred: impl Fn(&VizEventKind) -> bool) -> usize {
        self.events.iter().filter(|e| pred(&e.kind)).count()
    }
}
