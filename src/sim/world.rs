//! 世界 trait
//!
//! 定义仿真世界接口。

use super::simulator::Simulator;
use std::any::Any;

/// 仿真世界：由组件层实现（每个演示组件就是一个独立的世界）。
pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn on_tick(&mut self, _sim: &mut Simulator) {}
}

/// 把 `dyn World` 还原成具体组件类型。
///
/// 事件只会被调度到创建它的组件上，类型不符说明调用方把事件跑在了错误的世界里。
pub fn world_mut<W: World>(world: &mut dyn World) -> &mut W {
    world
        .as_any_mut()
        .downcast_mut::<W>()
        .unwrap_or_else(|| panic!("world must be {}", std::any::type_name::<W>()))
}
