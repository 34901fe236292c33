//! 展示层
//!
//! 组件状态 → 画面的纯函数：数据包位置、文案、颜色档位。没有自己的逻辑。

use serde::{Deserialize, Serialize};

/// 状态点/数据包的颜色档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// 灰：未开始
    Idle,
    /// 黄：进行中
    Busy,
    /// 绿：完成/已连接
    Ok,
    /// 红：丢包/错误
    Alert,
}

impl Tone {
    pub fn css_class(self) -> &'static str {
        match self {
            Tone::Idle => "bg-slate-300",
            Tone::Busy => "bg-yellow-400",
            Tone::Ok => "bg-green-400",
            Tone::Alert => "bg-red-400",
        }
    }

    fn glyph(self) -> char {
        match self {
            Tone::Idle => '○',
            Tone::Busy => '◐',
            Tone::Ok => '●',
            Tone::Alert => '✕',
        }
    }
}

/// 轨道上的一个数据包
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketView {
    pub left_pct: u8,
    pub name: String,
    pub meta: String,
    pub tone: Tone,
}

/// 一个组件某一时刻的完整画面
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub status: String,
    pub tone: Tone,
    pub packet: Option<PacketView>,
    /// 附加行（计数、提示、结果等）
    pub lines: Vec<String>,
}

const TRACK_WIDTH: usize = 50;

/// 把数据包画到一条 ASCII 轨道上。
pub fn render_track(packet: Option<&PacketView>) -> String {
    let mut cells = vec!['─'; TRACK_WIDTH];
    if let Some(p) = packet {
        let pct = usize::from(p.left_pct.min(100));
        let idx = (pct * (TRACK_WIDTH - 1)) / 100;
        cells[idx] = match p.tone {
            Tone::Alert => '✕',
            _ => '■',
        };
    }
    let track: String = cells.into_iter().collect();
    match packet {
        Some(p) if p.meta.is_empty() => format!("[client] {track} [server]  {}", p.name),
        Some(p) => format!("[client] {track} [server]  {} {}", p.name, p.meta),
        None => format!("[client] {track} [server]"),
    }
}

/// 多行文本形式的画面
pub fn render_frame(frame: &Frame) -> String {
    let mut out = format!("{} {}\n", frame.tone.glyph(), frame.status);
    out.push_str(&render_track(frame.packet.as_ref()));
    for line in &frame.lines {
        out.push('\n');
        out.push_str("  ");
        out.push_str(line);
    }
    out
}
