//! TCP 数据往返
//!
//! 连接建立后 DATA 与 ACK 自动来回发送。“干扰网络”会丢掉正在路上的包，
//! 告警短暂亮起，随后在固定延迟后按原方向重发，不需要用户再操作。
//! 这里的重发只是演示，没有真正的重传策略。

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Packet, Recorder, Widget};
use crate::config::TransferTiming;
use crate::i18n::Catalog;
use crate::seq::{
    Counters, Direction, SequencerError, Step, StepDriver, StepTable, TRACK_LEFT_PCT,
    TRACK_RIGHT_PCT, TimerSlot, TimerSlots,
};
use crate::sim::{Event, SimTime, Simulator, World, world_mut};
use crate::view::{Frame, Tone};
use crate::viz::{VizEventKind, VizPacketKind, WidgetKind};

/// 握手完成时的计数
pub const ESTABLISHED: Counters = Counters {
    client_seq: 1001,
    client_ack: 5001,
    server_seq: 5000,
    server_ack: 1001,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketStatus {
    Idle,
    InFlight,
    Dropped,
}

fn transfer_steps() -> Result<StepTable, SequencerError> {
    StepTable::new(vec![
        Step::new("data", "DATA").with_direction(Direction::Outbound),
        Step::new("ack", "ACK").with_direction(Direction::Inbound),
    ])
}

fn step_index(direction: Direction) -> usize {
    match direction {
        Direction::Outbound => 0,
        Direction::Inbound => 1,
    }
}

#[derive(Debug)]
pub struct TcpTransfer {
    steps: StepTable,
    timing: TransferTiming,
    catalog: Catalog,
    driver: StepDriver,
    timers: TimerSlots,
    counters: Counters,
    sending: bool,
    direction: Direction,
    status: PacketStatus,
    packet: Option<Packet>,
    network_alert: bool,
    has_disrupted: bool,
    /// 每次发送/丢弃都递增；交付回调据此判断自己是否过期
    packet_id: u64,
    delivered: u64,
    pub recorder: Recorder,
}

impl TcpTransfer {
    pub fn new(catalog: &Catalog, timing: TransferTiming) -> Result<Self, SequencerError> {
        let steps = transfer_steps()?;
        let driver = StepDriver::new(steps.len());
        Ok(Self {
            steps,
            timing,
            catalog: catalog.clone(),
            driver,
            timers: TimerSlots::default(),
            counters: ESTABLISHED,
            sending: false,
            direction: Direction::Outbound,
            status: PacketStatus::Idle,
            packet: None,
            network_alert: false,
            has_disrupted: false,
            packet_id: 0,
            delivered: 0,
            recorder: Recorder::new(WidgetKind::Transfer),
        })
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }
    pub fn status(&self) -> PacketStatus {
        self.status
    }
    pub fn direction(&self) -> Direction {
        self.direction
    }
    pub fn is_sending(&self) -> bool {
        self.sending
    }
    pub fn network_alert(&self) -> bool {
        self.network_alert
    }
    pub fn packet(&self) -> Option<&Packet> {
        self.packet.as_ref()
    }
    pub fn timers(&self) -> &TimerSlots {
        &self.timers
    }
    /// 已交付的数据包总数
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// 发送中且未被干扰过时按钮不可用
    pub fn can_start(&self) -> bool {
        !self.sending || self.has_disrupted
    }

    #[tracing::instrument(skip(self, sim))]
    pub fn start(&mut self, sim: &mut Simulator) {
        if !self.can_start() {
            return;
        }
        self.timers.cancel_all(sim);
        self.status = PacketStatus::Idle;
        self.packet = None;
        self.network_alert = false;
        self.counters = ESTABLISHED;
        self.packet_id = self.packet_id.wrapping_add(1);
        self.sending = true;
        self.emit(sim, VizEventKind::Counters(self.counters));
        self.emit_status(sim);
        let direction = self.direction;
        self.send_packet(sim, direction);
    }

    /// 丢弃路上的包；只有包在途中时有效。
    #[tracing::instrument(skip(self, sim))]
    pub fn disrupt(&mut self, sim: &mut Simulator) {
        if self.status != PacketStatus::InFlight {
            return;
        }
        self.has_disrupted = true;
        self.packet_id = self.packet_id.wrapping_add(1);
        self.timers.cancel(sim, TimerSlot::Travel);
        self.timers.cancel(sim, TimerSlot::Delivery);
        self.status = PacketStatus::Dropped;
        self.network_alert = true;
        info!(direction = ?self.direction, "packet dropped");
        if let Some(name) = self.packet.as_ref().map(|p| p.name.clone()) {
            self.emit(sim, VizEventKind::PacketDropped { name });
        }
        self.emit(sim, VizEventKind::NetworkAlert { on: true });
        self.emit_status(sim);

        self.timers
            .schedule(sim, TimerSlot::Alert, self.timing.alert(), AlertCleared);
        self.timers.schedule(
            sim,
            TimerSlot::Resend,
            self.timing.recovery(),
            TransferRecover {
                direction: self.direction,
            },
        );
    }

    /// 停止发送（卸载同理）
    pub fn stop(&mut self, sim: &mut Simulator) {
        self.sending = false;
        self.timers.cancel_all(sim);
    }

    fn send_packet(&mut self, sim: &mut Simulator, direction: Direction) {
        if !self.sending {
            return;
        }
        self.packet_id = self.packet_id.wrapping_add(1);
        let packet_id = self.packet_id;
        self.driver.jump(step_index(direction));
        let (name, meta, kind) = self.packet_content(direction);
        let start = direction.start_pct(TRACK_LEFT_PCT, TRACK_RIGHT_PCT);
        let end = direction.end_pct(TRACK_LEFT_PCT, TRACK_RIGHT_PCT);
        self.status = PacketStatus::InFlight;
        self.packet = Some(Packet {
            name: name.clone(),
            meta: meta.clone(),
            direction,
            position: start,
        });
        debug!(packet_id, %name, %meta, "send packet");
        self.emit(
            sim,
            VizEventKind::PacketLaunch {
                name,
                meta,
                packet: kind,
                direction,
                at_pct: start,
            },
        );

        self.timers.schedule(
            sim,
            TimerSlot::Travel,
            self.timing.start_delay(),
            TransferTravel { to_pct: end },
        );
        self.timers.schedule(
            sim,
            TimerSlot::Delivery,
            self.timing.delivery(),
            TransferDelivery {
                packet_id,
                direction,
            },
        );
    }

    fn packet_content(&self, direction: Direction) -> (String, String, VizPacketKind) {
        let c = self.counters;
        let label = self
            .steps
            .get(step_index(direction))
            .map(|s| s.label.clone())
            .unwrap_or_default();
        match direction {
            Direction::Outbound => (
                label,
                format!("seq={} ack={}", c.client_seq, c.client_ack),
                VizPacketKind::Data,
            ),
            Direction::Inbound => (
                label,
                format!("seq={} ack={}", c.server_seq, c.server_ack),
                VizPacketKind::Ack,
            ),
        }
    }

    fn deliver(&mut self, direction: Direction) {
        let c = &mut self.counters;
        match direction {
            Direction::Outbound => {
                c.client_seq += 1;
                c.server_ack = c.client_seq;
            }
            Direction::Inbound => {
                c.server_seq += 1;
                c.client_ack = c.server_seq;
            }
        }
        self.delivered += 1;
    }

    fn schedule_next(&mut self, sim: &mut Simulator, direction: Direction, delay: SimTime) {
        if !self.sending {
            return;
        }
        self.timers
            .schedule(sim, TimerSlot::Resend, delay, TransferSend { direction });
    }

    fn emit(&mut self, sim: &Simulator, kind: VizEventKind) {
        let tick = self.driver.tick();
        self.recorder.emit(sim.now(), tick, kind);
    }

    fn emit_status(&mut self, sim: &Simulator) {
        let label = self.status_label();
        let tone = self.tone();
        self.emit(sim, VizEventKind::Status { label, tone });
    }

    pub fn status_label(&self) -> String {
        let t = self.catalog.scope("examples.tcpCommunication");
        match self.status {
            PacketStatus::Dropped => t.t("packetDropped"),
            _ => t.t("connected"),
        }
    }

    pub fn tone(&self) -> Tone {
        match self.status {
            PacketStatus::Dropped => Tone::Alert,
            _ => Tone::Ok,
        }
    }

    pub fn start_label(&self) -> String {
        let t = self.catalog.scope("examples.tcpCommunication");
        if self.sending && self.has_disrupted {
            t.t("restart")
        } else {
            t.t("start")
        }
    }
}

impl World for TcpTransfer {
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

impl Widget for TcpTransfer {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Transfer
    }

    fn frame(&self) -> Frame {
        let c = self.counters;
        let mut status = self.status_label();
        if self.sending && self.status == PacketStatus::InFlight {
            status.push_str(" ...");
        }
        let packet_tone = match self.status {
            PacketStatus::Dropped => Tone::Alert,
            _ => Tone::Busy,
        };
        let mut lines = vec![format!(
            "client seq={} ack={} | server seq={} ack={}",
            c.client_seq, c.client_ack, c.server_seq, c.server_ack
        )];
        if self.network_alert {
            lines.push("network: disrupted".to_string());
        }
        Frame {
            status,
            tone: self.tone(),
            packet: self.packet.as_ref().map(|p| p.view(packet_tone)),
            lines,
        }
    }

    fn unmount(&mut self, sim: &mut Simulator) {
        self.stop(sim);
    }

    fn recorder_mut(&mut self) -> &mut Recorder {
        &mut self.recorder
    }
}

#[derive(Debug)]
pub struct TransferTravel {
    pub to_pct: u8,
}

impl Event for TransferTravel {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world_mut::<TcpTransfer>(world);
        w.timers.fired(TimerSlot::Travel);
        if let Some(p) = &mut w.packet {
            p.position = self.to_pct;
        }
        w.emit(sim, VizEventKind::PacketTravel { to_pct: self.to_pct });
    }
}

/// 数据包到达：更新计数、换向，稍后发送回应
#[derive(Debug)]
pub struct TransferDelivery {
    pub packet_id: u64,
    pub direction: Direction,
}

impl Event for TransferDelivery {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world_mut::<TcpTransfer>(world);
        w.timers.fired(TimerSlot::Delivery);
        if w.packet_id != self.packet_id {
            debug!(stale = self.packet_id, current = w.packet_id, "stale delivery");
            return;
        }
        let name = w.packet.take().map(|p| p.name).unwrap_or_default();
        w.status = PacketStatus::Idle;
        w.deliver(self.direction);
        w.emit(sim, VizEventKind::PacketDelivered { name });
        w.emit(sim, VizEventKind::Counters(w.counters));

        let next = self.direction.flip();
        w.direction = next;
        let delay = w.timing.turnaround();
        w.schedule_next(sim, next, delay);
    }
}

#[derive(Debug)]
pub struct TransferSend {
    pub direction: Direction,
}

impl Event for TransferSend {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world_mut::<TcpTransfer>(world);
        w.timers.fired(TimerSlot::Resend);
        w.send_packet(sim, self.direction);
    }
}

/// 丢包后的恢复：清掉残留的包，稍后按原方向重发
#[derive(Debug)]
pub struct TransferRecover {
    pub direction: Direction,
}

impl Event for TransferRecover {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world_mut::<TcpTransfer>(world);
        w.timers.fired(TimerSlot::Resend);
        w.status = PacketStatus::Idle;
        w.packet = None;
        w.emit(sim, VizEventKind::PacketCleared);
        w.emit_status(sim);
        let delay = w.timing.resend();
        w.schedule_next(sim, self.direction, delay);
    }
}

#[derive(Debug)]
pub struct AlertCleared;

impl Event for AlertCleared {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world_mut::<TcpTransfer>(world);
        w.timers.fired(TimerSlot::Alert);
        w.network_alert = false;
        w.emit(sim, VizEventKind::NetworkAlert { on: false });
    }
}
