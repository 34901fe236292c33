//! 步骤驱动器
//!
//! 维护当前步骤下标（`None` 表示未激活）和一个单调递增的 tick。
//! tick 用来让连续两次相同的画面仍然重新播放过渡动画。

use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDriver {
    len: usize,
    current: Option<usize>,
    tick: u64,
}

impl StepDriver {
    /// `len` 为步骤表长度；0 会被当作 1 处理。
    pub fn new(len: usize) -> Self {
        Self {
            len: len.max(1),
            current: None,
            tick: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_last(&self) -> bool {
        self.current == Some(self.len - 1)
    }

    /// 下一次 `advance` 会落到的下标；`None` 表示会回到未激活。
    pub fn next_index(&self) -> Option<usize> {
        match self.current {
            None => Some(0),
            Some(i) if i + 1 < self.len => Some(i + 1),
            Some(_) => None,
        }
    }

    /// 未激活 → 0；中间步骤 → 下一步；最后一步 → 未激活。
    pub fn advance(&mut self) -> Option<usize> {
        self.current = self.next_index();
        self.bump();
        trace!(current = ?self.current, tick = self.tick, "advance");
        self.current
    }

    pub fn reset(&mut self) {
        self.current = None;
        self.bump();
    }

    /// 直接跳到某一步，越界时钳到最后一步。
    pub fn jump(&mut self, index: usize) -> usize {
        let i = index.min(self.len - 1);
        self.current = Some(i);
        self.bump();
        i
    }

    /// 仅刷新 tick（同一画面重播）
    pub fn bump(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }
}
