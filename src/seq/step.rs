//! 步骤表
//!
//! 一张组件定义一次、之后不再修改的有序步骤列表。

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::SequencerError;

/// 数据包轨道左端（百分比）
pub const TRACK_LEFT_PCT: u8 = 18;
/// 数据包轨道右端（百分比）
pub const TRACK_RIGHT_PCT: u8 = 82;

/// 数据包方向：Outbound 为浏览器 → 服务器（左到右）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Outbound,
    Inbound,
}

impl Direction {
    pub fn flip(self) -> Direction {
        match self {
            Direction::Outbound => Direction::Inbound,
            Direction::Inbound => Direction::Outbound,
        }
    }

    /// 在 `[left, right]` 轨道上的起点
    pub fn start_pct(self, left: u8, right: u8) -> u8 {
        match self {
            Direction::Outbound => left,
            Direction::Inbound => right,
        }
    }

    pub fn end_pct(self, left: u8, right: u8) -> u8 {
        self.flip().start_pct(left, right)
    }
}

/// 两端的 seq/ack 计数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Counters {
    pub client_seq: u64,
    pub client_ack: u64,
    pub server_seq: u64,
    pub server_ack: u64,
}

/// 一个步骤
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub direction: Option<Direction>,
    #[serde(default)]
    pub counters: Option<Counters>,
    /// 数据包上显示的附加信息，如 `seq=1000`
    #[serde(default)]
    pub meta: Option<String>,
    #[serde(default)]
    pub description: String,
    /// 触发这一步的按钮文案
    #[serde(default)]
    pub button_label: Option<String>,
}

impl Step {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            direction: None,
            counters: None,
            meta: None,
            description: String::new(),
            button_label: None,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_counters(mut self, counters: Counters) -> Self {
        self.counters = Some(counters);
        self
    }

    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_button_label(mut self, label: impl Into<String>) -> Self {
        self.button_label = Some(label.into());
        self
    }
}

/// 不可变的步骤表，下标 `0..N-1`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTable {
    steps: Vec<Step>,
}

impl StepTable {
    pub fn new(steps: Vec<Step>) -> Result<Self, SequencerError> {
        if steps.is_empty() {
            return Err(SequencerError::EmptyTable);
        }
        let mut seen = HashSet::new();
        for s in &steps {
            if !seen.insert(s.id.as_str()) {
                return Err(SequencerError::DuplicateStep(s.id.clone()));
            }
        }
        Ok(Self { steps })
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// 构造时已保证非空
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }
}
