//! 演示组件
//!
//! 每个组件是一个独立的 `World`：自己的步骤驱动器、定时器槽位和显示状态。
//! 用户操作直接拿 `&mut Simulator` 调用；定时回调是各自模块里的 `Event`。

pub mod address;
pub mod exchange;
pub mod handshake;
pub mod parsing;
pub mod pipeline;
pub mod resolve;
pub mod transfer;

use crate::seq::Direction;
use crate::sim::{SimTime, Simulator, World};
use crate::view::{Frame, PacketView, Tone};
use crate::viz::{VizEvent, VizEventKind, VizLogger, WidgetKind};

/// 组件的公共接口
pub trait Widget: World {
    fn kind(&self) -> WidgetKind;

    /// 当前画面
    fn frame(&self) -> Frame;

    /// 卸载：取消所有未触发的定时器，之后不会再有状态变化。
    fn unmount(&mut self, sim: &mut Simulator);

    fn recorder_mut(&mut self) -> &mut Recorder;
}

/// 按组件打标签的可视化事件收集
#[derive(Debug)]
pub struct Recorder {
    widget: WidgetKind,
    pub viz: Option<VizLogger>,
}

impl Recorder {
    pub fn new(widget: WidgetKind) -> Self {
        Self { widget, viz: None }
    }

    pub fn enable(&mut self) {
        if self.viz.is_none() {
            self.viz = Some(VizLogger::default());
        }
    }

    pub fn take(&mut self) -> Option<VizLogger> {
        self.viz.take()
    }

    pub fn emit(&mut self, now: SimTime, tick: u64, kind: VizEventKind) {
        if let Some(v) = &mut self.viz {
            v.push(VizEvent {
                t_ns: now.0,
                widget: self.widget,
                tick,
                kind,
            });
        }
    }
}

/// 轨道上正在显示的数据包
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub name: String,
    pub meta: String,
    pub direction: Direction,
    pub position: u8,
}

impl Packet {
    pub fn view(&self, tone: Tone) -> PacketView {
        PacketView {
            left_pct: self.position,
            name: self.name.clone(),
            meta: self.meta.clone(),
            tone,
        }
    }
}
