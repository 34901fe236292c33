//! 按槽位管理的定时器
//!
//! 每个组件实例最多在每个槽位上挂一个待触发的回调；同一槽位再次调度会先取消旧的。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sim::{Event, EventId, SimTime, Simulator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerSlot {
    /// 数据包开始移动
    Travel,
    /// 数据包到达/阶段完成
    Delivery,
    /// 下一次发送或恢复
    Resend,
    /// 短暂的高亮/告警
    Alert,
}

#[derive(Debug, Default)]
pub struct TimerSlots {
    slots: HashMap<TimerSlot, EventId>,
}

impl TimerSlots {
    /// 在 `slot` 上调度 `ev`，`delay` 后执行。
    pub fn schedule<E: Event>(
        &mut self,
        sim: &mut Simulator,
        slot: TimerSlot,
        delay: SimTime,
        ev: E,
    ) -> EventId {
        self.cancel(sim, slot);
        let id = sim.schedule_after(delay, ev);
        debug!(?slot, ?delay, seq = id.0, "arm timer");
        self.slots.insert(slot, id);
        id
    }

    pub fn cancel(&mut self, sim: &mut Simulator, slot: TimerSlot) -> bool {
        match self.slots.remove(&slot) {
            Some(id) => sim.cancel(id),
            None => false,
        }
    }

    pub fn cancel_all(&mut self, sim: &mut Simulator) {
        for (slot, id) in self.slots.drain() {
            if sim.cancel(id) {
                debug!(?slot, seq = id.0, "cancel timer");
            }
        }
    }

    /// 由触发中的事件调用，释放自己的槽位。
    pub fn fired(&mut self, slot: TimerSlot) {
        self.slots.remove(&slot);
    }

    pub fn is_armed(&self, slot: TimerSlot) -> bool {
        self.slots.contains_key(&slot)
    }

    pub fn armed(&self) -> usize {
        self.slots.len()
    }
}
