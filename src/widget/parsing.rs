//! HTML 解析成 DOM 树
//!
//! 每个步长读入一行源码，DOM 树按进度表逐步显示。

use tracing::info;

use super::{Recorder, Widget};
use crate::config::ParsingTiming;
use crate::i18n::Catalog;
use crate::seq::{StepDriver, TimerSlot, TimerSlots};
use crate::sim::{Event, Simulator, World, world_mut};
use crate::view::{Frame, Tone};
use crate::viz::{VizEventKind, WidgetKind};

/// 读到第 i 行源码时应显示的 DOM 行数
pub const DOM_LINE_PROGRESS: [usize; 13] = [2, 3, 4, 6, 6, 7, 8, 10, 12, 15, 15, 15, 15];

pub fn html_lines(title: &str, description: &str, link: &str) -> Vec<String> {
    vec![
        "<!doctype html>".to_string(),
        "<html>".to_string(),
        "  <head>".to_string(),
        format!("    <title>{title}</title>"),
        "  </head>".to_string(),
        "  <body>".to_string(),
        "    <main>".to_string(),
        format!("      <h1 style=\"color: red;\">{title}</h1>"),
        format!("      <p>{description}</p>"),
        format!("      <p><a href=\"https://example.com\">{link}</a></p>"),
        "    </main>".to_string(),
        "  </body>".to_string(),
        "</html>".to_string(),
    ]
}

pub fn dom_lines(title: &str, description: &str, link: &str) -> Vec<String> {
    vec![
        "Document".to_string(),
        "|- <!doctype html>".to_string(),
        "`- html".to_string(),
        "   |- head".to_string(),
        "   |  `- title".to_string(),
        format!("   |     `- \"{title}\""),
        "   `- body".to_string(),
        "      `- main".to_string(),
        "         |- h1 (style: color: red)".to_string(),
        format!("         |  `- \"{title}\""),
        "         |- p".to_string(),
        format!("         |  `- \"{description}\""),
        "         `- p".to_string(),
        "            `- a (href=\"https://example.com\")".to_string(),
        format!("               `- \"{link}\""),
    ]
}

#[derive(Debug)]
pub struct HtmlParsing {
    timing: ParsingTiming,
    catalog: Catalog,
    html: Vec<String>,
    dom: Vec<String>,
    driver: StepDriver,
    timers: TimerSlots,
    parsing: bool,
    pub recorder: Recorder,
}

impl HtmlParsing {
    pub fn new(catalog: &Catalog, timing: ParsingTiming) -> Self {
        let t = catalog.scope("examples.parsingHtml");
        let (title, description, link) =
            (t.t("exampleTitle"), t.t("exampleDescription"), t.t("exampleLink"));
        let html = html_lines(&title, &description, &link);
        let dom = dom_lines(&title, &description, &link);
        Self {
            timing,
            catalog: catalog.clone(),
            driver: StepDriver::new(html.len()),
            html,
            dom,
            timers: TimerSlots::default(),
            parsing: false,
            recorder: Recorder::new(WidgetKind::Parsing),
        }
    }

    pub fn is_parsing(&self) -> bool {
        self.parsing
    }

    pub fn active_line(&self) -> Option<usize> {
        self.driver.current()
    }

    pub fn html(&self) -> &[String] {
        &self.html
    }

    pub fn dom(&self) -> &[String] {
        &self.dom
    }

    pub fn visible_dom_lines(&self) -> usize {
        self.driver
            .current()
            .and_then(|i| DOM_LINE_PROGRESS.get(i).copied())
            .unwrap_or(0)
            .min(self.dom.len())
    }

    pub fn button_label(&self) -> String {
        let t = self.catalog.scope("examples.parsingHtml");
        if self.parsing { t.t("parsing") } else { t.t("parse") }
    }

    /// 从第一行开始解析；解析中时忽略。
    #[tracing::instrument(skip(self, sim))]
    pub fn parse(&mut self, sim: &mut Simulator) {
        if self.parsing {
            return;
        }
        self.timers.cancel_all(sim);
        self.driver.jump(0);
        self.parsing = true;
        info!(lines = self.html.len(), "parse html");
        self.on_line(sim);
    }

    fn on_line(&mut self, sim: &mut Simulator) {
        let line = self.driver.current().unwrap_or(0);
        let dom_lines = self.visible_dom_lines();
        self.recorder.emit(
            sim.now(),
            self.driver.tick(),
            VizEventKind::LineParsed { line, dom_lines },
        );
        if self.driver.is_last() {
            self.parsing = false;
            return;
        }
        self.timers
            .schedule(sim, TimerSlot::Travel, self.timing.step(), ParseNextLine);
    }
}

impl World for HtmlParsing {
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

impl Widget for HtmlParsing {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Parsing
    }

    fn frame(&self) -> Frame {
        let active = self.driver.current();
        let mut lines: Vec<String> = self
            .html
            .iter()
            .enumerate()
            .map(|(i, l)| {
                let marker = match active {
                    Some(a) if self.parsing && a == i => '>',
                    Some(a) if i <= a => '.',
                    _ => ' ',
                };
                format!("{marker} {l}")
            })
            .collect();
        lines.extend(self.dom.iter().take(self.visible_dom_lines()).cloned());
        let tone = match (self.parsing, active) {
            (true, _) => Tone::Busy,
            (false, Some(_)) => Tone::Ok,
            (false, None) => Tone::Idle,
        };
        Frame {
            status: self.button_label(),
            tone,
            packet: None,
            lines,
        }
    }

    fn unmount(&mut self, sim: &mut Simulator) {
        self.timers.cancel_all(sim);
        self.parsing = false;
    }

    fn recorder_mut(&mut self) -> &mut Recorder {
        &mut self.recorder
    }
}

#[derive(Debug)]
pub struct ParseNextLine;

impl Event for ParseNextLine {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world_mut::<HtmlParsing>(world);
        w.timers.fired(TimerSlot::Travel);
        if !w.parsing {
            return;
        }
        w.driver.advance();
        w.on_line(sim);
    }
}
