//! 布局 / 绘制 / 合成
//!
//! 改颜色只重跑 paint，改宽度重跑 layout + paint；高亮持续一段时间后熄灭。

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Recorder, Widget};
use crate::config::PipelineTiming;
use crate::i18n::Catalog;
use crate::seq::{SequencerError, Step, StepDriver, StepTable, TimerSlot, TimerSlots};
use crate::sim::{Event, Simulator, World, world_mut};
use crate::view::{Frame, Tone};
use crate::viz::{VizEventKind, WidgetKind};

pub const COLORS: [&str; 3] = ["#e2e8f0", "#38bdf8", "#fb923c"];
pub const WIDTHS: [u32; 3] = [200, 260, 320];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Layout,
    Paint,
    Composite,
}

impl Stage {
    pub fn id(self) -> &'static str {
        match self {
            Stage::Layout => "layout",
            Stage::Paint => "paint",
            Stage::Composite => "composite",
        }
    }
}

pub fn pipeline_stages(catalog: &Catalog) -> Result<StepTable, SequencerError> {
    let t = catalog.scope("examples.layoutPaintComposite");
    StepTable::new(
        [Stage::Layout, Stage::Paint, Stage::Composite]
            .into_iter()
            .map(|s| {
                Step::new(s.id(), t.t(&format!("{}Title", s.id())))
                    .with_description(t.t(&format!("{}Description", s.id())))
            })
            .collect(),
    )
}

#[derive(Debug)]
pub struct RenderPipeline {
    stages: StepTable,
    timing: PipelineTiming,
    catalog: Catalog,
    driver: StepDriver,
    timers: TimerSlots,
    color_index: usize,
    width_index: usize,
    active: Vec<Stage>,
    status: String,
    pub recorder: Recorder,
}

impl RenderPipeline {
    pub fn new(catalog: &Catalog, timing: PipelineTiming) -> Result<Self, SequencerError> {
        let stages = pipeline_stages(catalog)?;
        Ok(Self {
            driver: StepDriver::new(stages.len()),
            stages,
            timing,
            catalog: catalog.clone(),
            timers: TimerSlots::default(),
            color_index: 0,
            width_index: 0,
            active: Vec::new(),
            status: catalog.get("examples.layoutPaintComposite.clickToSee"),
            recorder: Recorder::new(WidgetKind::Pipeline),
        })
    }

    pub fn color(&self) -> &'static str {
        COLORS[self.color_index % COLORS.len()]
    }

    pub fn width(&self) -> u32 {
        WIDTHS[self.width_index % WIDTHS.len()]
    }

    pub fn active_stages(&self) -> &[Stage] {
        &self.active
    }

    pub fn is_active(&self, stage: Stage) -> bool {
        self.active.contains(&stage)
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn change_color(&mut self, sim: &mut Simulator) {
        self.color_index = (self.color_index + 1) % COLORS.len();
        let msg = self.catalog.get("examples.layoutPaintComposite.rerunsPaint");
        self.highlight(sim, vec![Stage::Paint], msg);
    }

    pub fn change_width(&mut self, sim: &mut Simulator) {
        self.width_index = (self.width_index + 1) % WIDTHS.len();
        let msg = self
            .catalog
            .get("examples.layoutPaintComposite.rerunsLayoutPaint");
        self.highlight(sim, vec![Stage::Layout, Stage::Paint], msg);
    }

    fn highlight(&mut self, sim: &mut Simulator, stages: Vec<Stage>, message: String) {
        debug!(?stages, color = self.color(), width = self.width(), "highlight");
        self.driver.bump();
        self.active = stages;
        self.status = message;
        self.emit_highlight(sim);
        self.timers.schedule(
            sim,
            TimerSlot::Alert,
            self.timing.highlight(),
            HighlightCleared,
        );
    }

    fn emit_highlight(&mut self, sim: &Simulator) {
        let stages = self.active.iter().map(|s| s.id().to_string()).collect();
        self.recorder.emit(
            sim.now(),
            self.driver.tick(),
            VizEventKind::StageHighlight { stages },
        );
    }
}

impl World for RenderPipeline {
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

impl Widget for RenderPipeline {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Pipeline
    }

    fn frame(&self) -> Frame {
        let mut lines: Vec<String> = self
            .stages
            .iter()
            .map(|s| {
                let on = self.active.iter().any(|a| a.id() == s.id);
                format!("{} {}: {}", if on { '*' } else { ' ' }, s.label, s.description)
            })
            .collect();
        lines.push(format!("box: width={}px color={}", self.width(), self.color()));
        Frame {
            status: self.status.clone(),
            tone: if self.active.is_empty() {
                Tone::Idle
            } else {
                Tone::Busy
            },
            packet: None,
            lines,
        }
    }

    fn unmount(&mut self, sim: &mut Simulator) {
        self.timers.cancel_all(sim);
    }

    fn recorder_mut(&mut self) -> &mut Recorder {
        &mut self.recorder
    }
}

#[derive(Debug)]
pub struct HighlightCleared;

impl Event for HighlightCleared {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world_mut::<RenderPipeline>(world);
        w.timers.fired(TimerSlot::Alert);
        w.active.clear();
        w.emit_highlight(sim);
    }
}
