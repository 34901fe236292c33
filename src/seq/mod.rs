//! 分步动画时序器
//!
//! 所有演示组件共用的三件套：步骤表、步骤驱动器和按槽位管理的定时器。

mod driver;
mod step;
mod timers;

pub use driver::StepDriver;
pub use step::{Counters, Direction, Step, StepTable, TRACK_LEFT_PCT, TRACK_RIGHT_PCT};
pub use timers::{TimerSlot, TimerSlots};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequencerError {
    #[error("step table must contain at least one step")]
    EmptyTable,
    #[error("duplicate step id `{0}`")]
    DuplicateStep(String),
}
