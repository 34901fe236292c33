//! TCP 三次握手
//!
//! 每按一次按钮前进一步：SYN → SYN-ACK → ACK → 断开。
//! 只有最后一步的数据包到达后才显示“已连接”。

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Packet, Recorder, Widget};
use crate::config::HandshakeTiming;
use crate::i18n::Catalog;
use crate::seq::{
    Counters, Direction, SequencerError, Step, StepDriver, StepTable, TRACK_LEFT_PCT,
    TRACK_RIGHT_PCT, TimerSlot, TimerSlots,
};
use crate::sim::{Event, Simulator, World, world_mut};
use crate::view::{Frame, Tone};
use crate::viz::{VizEventKind, VizPacketKind, WidgetKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    /// 只有标签，没有任何转移会进入这个状态
    Retrying,
    Connected,
}

/// SYN / SYN-ACK / ACK 三步
pub fn handshake_steps(catalog: &Catalog) -> Result<StepTable, SequencerError> {
    let t = catalog.scope("examples.tcpHandshake");
    StepTable::new(vec![
        Step::new("syn", "SYN")
            .with_direction(Direction::Outbound)
            .with_meta("seq=1000")
            .with_counters(Counters {
                client_seq: 1000,
                client_ack: 0,
                server_seq: 0,
                server_ack: 0,
            })
            .with_description(t.t("synDescription"))
            .with_button_label(t.t("sendFirstPacket")),
        Step::new("syn-ack", "SYN-ACK")
            .with_direction(Direction::Inbound)
            .with_meta("seq=5000 ack=1001")
            .with_counters(Counters {
                client_seq: 1000,
                client_ack: 0,
                server_seq: 5000,
                server_ack: 1001,
            })
            .with_description(t.t("synAckDescription"))
            .with_button_label(t.t("confirmClientPacket")),
        Step::new("ack", "ACK")
            .with_direction(Direction::Outbound)
            .with_meta("seq=1001 ack=5001")
            .with_counters(Counters {
                client_seq: 1001,
                client_ack: 5001,
                server_seq: 5000,
                server_ack: 1001,
            })
            .with_description(t.t("ackDescription"))
            .with_button_label(t.t("confirmServerPacket")),
    ])
}

#[derive(Debug)]
pub struct TcpHandshake {
    steps: StepTable,
    timing: HandshakeTiming,
    catalog: Catalog,
    driver: StepDriver,
    timers: TimerSlots,
    state: ConnectionState,
    counters: Counters,
    packet: Option<Packet>,
    pub recorder: Recorder,
}

impl TcpHandshake {
    pub fn new(catalog: &Catalog, timing: HandshakeTiming) -> Result<Self, SequencerError> {
        Ok(Self::with_steps(handshake_steps(catalog)?, catalog, timing))
    }

    /// 使用自定义步骤表
    pub fn with_steps(steps: StepTable, catalog: &Catalog, timing: HandshakeTiming) -> Self {
        let driver = StepDriver::new(steps.len());
        Self {
            steps,
            timing,
            catalog: catalog.clone(),
            driver,
            timers: TimerSlots::default(),
            state: ConnectionState::Disconnected,
            counters: Counters::default(),
            packet: None,
            recorder: Recorder::new(WidgetKind::Handshake),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn active_step(&self) -> Option<usize> {
        self.driver.current()
    }

    pub fn tick(&self) -> u64 {
        self.driver.tick()
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn packet(&self) -> Option<&Packet> {
        self.packet.as_ref()
    }

    pub fn steps(&self) -> &StepTable {
        &self.steps
    }

    pub fn timers(&self) -> &TimerSlots {
        &self.timers
    }

    /// 按钮：下一步，或在最后一步之后断开。
    #[tracing::instrument(skip(self, sim), fields(step = ?self.driver.current()))]
    pub fn press(&mut self, sim: &mut Simulator) {
        self.timers.cancel_all(sim);
        match self.driver.advance() {
            Some(index) => {
                if index == 0 {
                    self.set_state(sim, ConnectionState::Connecting);
                }
                self.apply_step(sim, index);
            }
            None => {
                self.counters = Counters::default();
                self.packet = None;
                self.emit(sim, VizEventKind::StepActive { index: None });
                self.emit(sim, VizEventKind::PacketCleared);
                self.emit(sim, VizEventKind::Counters(self.counters));
                self.set_state(sim, ConnectionState::Disconnected);
            }
        }
    }

    fn apply_step(&mut self, sim: &mut Simulator, index: usize) {
        let Some(step) = self.steps.get(index).cloned() else {
            return;
        };
        let direction = step.direction.unwrap_or(Direction::Outbound);
        let start = direction.start_pct(TRACK_LEFT_PCT, TRACK_RIGHT_PCT);
        let end = direction.end_pct(TRACK_LEFT_PCT, TRACK_RIGHT_PCT);
        if let Some(c) = step.counters {
            self.counters = c;
        }
        let meta = step.meta.clone().unwrap_or_default();
        self.packet = Some(Packet {
            name: step.label.clone(),
            meta: meta.clone(),
            direction,
            position: start,
        });
        info!(step = %step.id, "handshake step");

        self.emit(sim, VizEventKind::StepActive { index: Some(index) });
        self.emit(sim, VizEventKind::Counters(self.counters));
        self.emit(
            sim,
            VizEventKind::PacketLaunch {
                name: step.label,
                meta,
                packet: VizPacketKind::Control,
                direction,
                at_pct: start,
            },
        );

        self.timers.schedule(
            sim,
            TimerSlot::Travel,
            self.timing.start_delay(),
            HandshakeTravel { to_pct: end },
        );
        if index == self.steps.last_index() {
            self.timers.schedule(
                sim,
                TimerSlot::Delivery,
                self.timing.arrival(),
                HandshakeEstablished,
            );
        }
    }

    fn set_state(&mut self, sim: &Simulator, state: ConnectionState) {
        self.state = state;
        let label = self.state_label();
        let tone = self.tone();
        self.emit(sim, VizEventKind::Status { label, tone });
    }

    fn emit(&mut self, sim: &Simulator, kind: VizEventKind) {
        let tick = self.driver.tick();
        self.recorder.emit(sim.now(), tick, kind);
    }

    pub fn state_label(&self) -> String {
        let t = self.catalog.scope("examples.tcpHandshake");
        match self.state {
            ConnectionState::Disconnected => t.t("disconnected"),
            ConnectionState::Connecting => t.t("connecting"),
            ConnectionState::Retrying => t.t("retrying"),
            ConnectionState::Connected => t.t("connected"),
        }
    }

    pub fn tone(&self) -> Tone {
        match self.state {
            ConnectionState::Connected => Tone::Ok,
            ConnectionState::Disconnected => Tone::Idle,
            ConnectionState::Connecting | ConnectionState::Retrying => Tone::Busy,
        }
    }

    /// 按钮文案：下一步的按钮标签，最后一步之后为“断开”。
    pub fn button_label(&self) -> String {
        self.driver
            .next_index()
            .and_then(|i| self.steps.get(i))
            .and_then(|s| s.button_label.clone())
            .unwrap_or_else(|| self.catalog.get("examples.tcpHandshake.disconnect"))
    }
}

impl World for TcpHandshake {
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

impl Widget for TcpHandshake {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Handshake
    }

    fn frame(&self) -> Frame {
        let mut lines: Vec<String> = self
            .steps
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let marker = if self.driver.current() == Some(i) { '>' } else { ' ' };
                format!("{marker} {}. {}", i + 1, s.description)
            })
            .collect();
        let c = self.counters;
        lines.push(format!(
            "client seq={} ack={} | server seq={} ack={}",
            c.client_seq, c.client_ack, c.server_seq, c.server_ack
        ));
        lines.push(format!("[{}]", self.button_label()));
        Frame {
            status: self.state_label(),
            tone: self.tone(),
            packet: self.packet.as_ref().map(|p| p.view(Tone::Busy)),
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

/// 数据包开始移动到终点
#[derive(Debug)]
pub struct HandshakeTravel {
    pub to_pct: u8,
}

impl Event for HandshakeTravel {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world_mut::<TcpHandshake>(world);
        w.timers.fired(TimerSlot::Travel);
        if let Some(p) = &mut w.packet {
            p.position = self.to_pct;
        }
        w.emit(sim, VizEventKind::PacketTravel { to_pct: self.to_pct });
    }
}

/// 最后一个 ACK 到达
#[derive(Debug)]
pub struct HandshakeEstablished;

impl Event for HandshakeEstablished {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world_mut::<TcpHandshake>(world);
        w.timers.fired(TimerSlot::Delivery);
        if let Some(name) = w.packet.as_ref().map(|p| p.name.clone()) {
            w.emit(sim, VizEventKind::PacketDelivered { name });
        }
        w.set_state(sim, ConnectionState::Connected);
    }
}
