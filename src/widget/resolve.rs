//! DNS 终端
//!
//! 非法主机名在本地直接拒绝，不会调度查询。合法主机名在固定延迟后从本地表里解析；
//! 新的提交会取消还没完成的旧查询。

use tracing::{info, warn};

use super::{Recorder, Widget};
use crate::config::ResolveTiming;
use crate::dns::{FixtureResolver, HostError, parse_host, sanitize_host};
use crate::i18n::Catalog;
use crate::seq::{StepDriver, TimerSlot, TimerSlots};
use crate::sim::{Event, Simulator, World, world_mut};
use crate::view::{Frame, Tone};
use crate::viz::{VizEventKind, WidgetKind};

#[derive(Debug)]
pub struct DnsConsole {
    timing: ResolveTiming,
    catalog: Catalog,
    fixtures: FixtureResolver,
    driver: StepDriver,
    timers: TimerSlots,
    input: String,
    host: Option<String>,
    loading: bool,
    addresses: Vec<String>,
    error: Option<String>,
    lookups: u64,
    pub recorder: Recorder,
}

impl DnsConsole {
    pub fn new(catalog: &Catalog, timing: ResolveTiming, fixtures: FixtureResolver) -> Self {
        Self {
            timing,
            catalog: catalog.clone(),
            fixtures,
            driver: StepDriver::new(1),
            timers: TimerSlots::default(),
            input: "example.com".to_string(),
            host: None,
            loading: false,
            addresses: Vec::new(),
            error: None,
            lookups: 0,
            recorder: Recorder::new(WidgetKind::Resolve),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }
    pub fn is_loading(&self) -> bool {
        self.loading
    }
    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
    /// 实际执行过的查询次数
    pub fn lookups(&self) -> u64 {
        self.lookups
    }
    pub fn timers(&self) -> &TimerSlots {
        &self.timers
    }

    /// 输入框内容变化
    pub fn edit(&mut self, input: &str) {
        self.input = sanitize_host(input);
        self.addresses.clear();
        self.error = None;
    }

    #[tracing::instrument(skip(self, sim))]
    pub fn submit(&mut self, sim: &mut Simulator, input: &str) -> Result<(), HostError> {
        self.input = sanitize_host(input);
        let host = match parse_host(input) {
            Ok(h) => h,
            Err(e) => {
                warn!(error = %e, "rejected host");
                self.addresses.clear();
                let message = self.catalog.get("examples.resolve.invalidHost");
                self.error = Some(message.clone());
                self.emit(sim, VizEventKind::LookupError { message });
                return Err(e);
            }
        };
        self.driver.bump();
        self.loading = true;
        self.error = None;
        self.host = Some(host.clone());
        info!(host = %host, "lookup scheduled");
        self.emit(sim, VizEventKind::LookupStart { host: host.clone() });
        self.timers.schedule(
            sim,
            TimerSlot::Delivery,
            self.timing.lookup(),
            LookupComplete { host },
        );
        Ok(())
    }

    fn emit(&mut self, sim: &Simulator, kind: VizEventKind) {
        let tick = self.driver.tick();
        self.recorder.emit(sim.now(), tick, kind);
    }
}

impl World for DnsConsole {
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

impl Widget for DnsConsole {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Resolve
    }

    fn frame(&self) -> Frame {
        let mut lines = vec![format!("$ resolve {}", self.input)];
        let (status, tone) = if self.loading {
            (self.catalog.get("examples.resolve.resolving"), Tone::Busy)
        } else if let Some(e) = &self.error {
            (e.clone(), Tone::Alert)
        } else if !self.addresses.is_empty() {
            ("ok".to_string(), Tone::Ok)
        } else {
            (String::new(), Tone::Idle)
        };
        if !self.loading && self.error.is_none() {
            let host = self.host.as_deref().unwrap_or(&self.input);
            lines.extend(
                self.addresses
                    .iter()
                    .map(|ip| format!("Name: {host} → Address: {ip}")),
            );
        }
        Frame {
            status,
            tone,
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
pub struct LookupComplete {
    pub host: String,
}

impl Event for LookupComplete {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world_mut::<DnsConsole>(world);
        w.timers.fired(TimerSlot::Delivery);
        w.lookups += 1;
        let records = w.fixtures.lookup(&self.host);
        w.loading = false;
        if records.is_empty() {
            let message = w.catalog.get("examples.resolve.noRecords");
            w.addresses.clear();
            w.error = Some(message.clone());
            w.emit(sim, VizEventKind::LookupError { message });
        } else {
            w.addresses = records.clone();
            w.emit(
                sim,
                VizEventKind::LookupDone {
                    host: self.host,
                    addresses: records,
                },
            );
        }
    }
}
