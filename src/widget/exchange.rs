//! HTTP 请求/响应
//!
//! `idle → sending → processing → responding → done`。
//! 除了开始这一下，后面的阶段全部按时间推进。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Packet, Recorder, Widget};
use crate::config::ExchangeTiming;
use crate::i18n::Catalog;
use crate::seq::{Direction, StepDriver, TimerSlot, TimerSlots};
use crate::sim::{Event, Simulator, World, world_mut};
use crate::view::{Frame, Tone};
use crate::viz::{VizEventKind, VizPacketKind, WidgetKind};

pub const REQUEST_PACKET: &str = "GET / HTTP/1.1\nHost: example.com\nAccept: text/html\nConnection: close\n";

const LEFT_PCT: u8 = 16;
const RIGHT_PCT: u8 = 84;

const EXAMPLE_BODY: &[&str] = &[
    "<main>",
    "  <h1>Example Domain</h1>",
    "  <p>This domain is for use in illustrative examples in documents. You may use this domain in literature without prior coordination or asking for permission.</p>",
    "  <p><a href=\"https://www.iana.org/domains/example\">More information...</a></p>",
    "</main>",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Sending,
    Processing,
    Responding,
    Done,
}

impl Phase {
    pub fn is_busy(self) -> bool {
        matches!(self, Phase::Sending | Phase::Processing | Phase::Responding)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketKind {
    Request,
    Response,
}

/// 完整的示例 HTML 文档
pub fn html_document(title: &str) -> String {
    let mut lines = vec![
        "<!doctype html>".to_string(),
        "<html>".to_string(),
        "  <head>".to_string(),
        format!("    <title>{title}</title>"),
        "    <meta charset=\"utf-8\" />".to_string(),
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />"
            .to_string(),
        "  </head>".to_string(),
        "  <body>".to_string(),
    ];
    lines.extend(EXAMPLE_BODY.iter().map(|l| format!("    {l}")));
    lines.push("  </body>".to_string());
    lines.push("</html>".to_string());
    lines.join("\n")
}

/// RFC 1123 日期，HTTP `Date` 头的格式
pub fn http_date(date: &DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

pub fn build_response(date: &DateTime<Utc>, document: &str) -> String {
    [
        "HTTP/1.1 200 OK".to_string(),
        format!("Date: {}", http_date(date)),
        "Content-Type: text/html; charset=UTF-8".to_string(),
        format!("Content-Length: {}", document.len()),
        "Connection: close".to_string(),
        String::new(),
        document.to_string(),
    ]
    .join("\n")
}

/// 数据包上显示的缩略版响应
pub fn build_response_snippet(date: &DateTime<Utc>, document: &str) -> String {
    [
        "HTTP/1.1 200 OK".to_string(),
        format!("Date: {}", http_date(date)),
        "Content-Type: text/html; charset=UTF-8".to_string(),
        format!("Content-Length: {}", document.len()),
        String::new(),
        "<!doctype html>".to_string(),
        "<html>".to_string(),
        "  <head>...</head>".to_string(),
        "  <body>...</body>".to_string(),
        "</html>".to_string(),
    ]
    .join("\n")
}

#[derive(Debug)]
pub struct HttpExchange {
    timing: ExchangeTiming,
    catalog: Catalog,
    document: String,
    driver: StepDriver,
    timers: TimerSlots,
    phase: Phase,
    packet_kind: PacketKind,
    packet: Option<Packet>,
    pending_response: Option<(String, String)>,
    response: Option<String>,
    pub recorder: Recorder,
}

impl HttpExchange {
    pub fn new(catalog: &Catalog, timing: ExchangeTiming) -> Self {
        Self {
            timing,
            catalog: catalog.clone(),
            document: html_document("Example Domain"),
            // 仅用 tick
            driver: StepDriver::new(1),
            timers: TimerSlots::default(),
            phase: Phase::Idle,
            packet_kind: PacketKind::Request,
            packet: None,
            pending_response: None,
            response: None,
            recorder: Recorder::new(WidgetKind::Exchange),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn packet(&self) -> Option<&Packet> {
        self.packet.as_ref()
    }
    pub fn packet_kind(&self) -> PacketKind {
        self.packet_kind
    }
    /// 完成后才有值
    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }
    pub fn timers(&self) -> &TimerSlots {
        &self.timers
    }

    /// 发出请求；进行中时忽略。
    #[tracing::instrument(skip(self, sim, date))]
    pub fn start(&mut self, sim: &mut Simulator, date: DateTime<Utc>) {
        if self.phase.is_busy() {
            return;
        }
        self.timers.cancel_all(sim);
        self.response = None;
        self.pending_response = Some((
            build_response(&date, &self.document),
            build_response_snippet(&date, &self.document),
        ));
        info!(date = %http_date(&date), "http request");
        self.set_phase(sim, Phase::Sending);
        self.launch(sim, PacketKind::Request, REQUEST_PACKET.to_string());
    }

    fn launch(&mut self, sim: &mut Simulator, kind: PacketKind, content: String) {
        let (direction, start, end, viz_kind, name) = match kind {
            PacketKind::Request => (
                Direction::Outbound,
                LEFT_PCT,
                RIGHT_PCT,
                VizPacketKind::Request,
                "GET /",
            ),
            PacketKind::Response => (
                Direction::Inbound,
                RIGHT_PCT,
                LEFT_PCT,
                VizPacketKind::Response,
                "200 OK",
            ),
        };
        self.packet_kind = kind;
        self.driver.bump();
        self.packet = Some(Packet {
            name: name.to_string(),
            meta: content.clone(),
            direction,
            position: start,
        });
        self.emit(
            sim,
            VizEventKind::PacketLaunch {
                name: name.to_string(),
                meta: content,
                packet: viz_kind,
                direction,
                at_pct: start,
            },
        );
        self.timers.schedule(
            sim,
            TimerSlot::Travel,
            self.timing.start_delay(),
            ExchangeTravel { to_pct: end },
        );
        self.timers.schedule(
            sim,
            TimerSlot::Delivery,
            self.timing.start_delay().saturating_add(self.timing.travel()),
            ExchangeArrive { kind },
        );
    }

    fn set_phase(&mut self, sim: &Simulator, phase: Phase) {
        self.phase = phase;
        let label = self.status_label();
        let tone = self.tone();
        self.emit(sim, VizEventKind::Status { label, tone });
    }

    fn emit(&mut self, sim: &Simulator, kind: VizEventKind) {
        let tick = self.driver.tick();
        self.recorder.emit(sim.now(), tick, kind);
    }

    fn t(&self, key: &str) -> String {
        self.catalog.scope("examples.http").t(key)
    }

    pub fn status_label(&self) -> String {
        self.t(match self.phase {
            Phase::Idle => "statusIdle",
            Phase::Sending => "statusSending",
            Phase::Processing => "statusProcessing",
            Phase::Responding => "statusResponding",
            Phase::Done => "statusDone",
        })
    }

    pub fn tone(&self) -> Tone {
        match self.phase {
            Phase::Done => Tone::Ok,
            Phase::Idle => Tone::Idle,
            _ => Tone::Busy,
        }
    }

    pub fn browser_hint(&self) -> String {
        self.t(match self.phase {
            Phase::Sending => "hintSending",
            Phase::Processing => "hintProcessing",
            Phase::Responding => "hintResponding",
            Phase::Idle | Phase::Done => "hintIdle",
        })
    }

    pub fn browser_request_state(&self) -> String {
        self.t(match self.phase {
            Phase::Idle => "statusIdle",
            Phase::Sending => "requestSent",
            Phase::Processing => "requestDelivered",
            Phase::Responding | Phase::Done => "requestComplete",
        })
    }

    pub fn browser_response_state(&self) -> String {
        self.t(match self.phase {
            Phase::Responding => "receivingResponse",
            Phase::Done => "responseReceived",
            _ => "waitingForResponse",
        })
    }

    pub fn server_request_state(&self) -> String {
        self.t(match self.phase {
            Phase::Idle => "waitingForRequest",
            Phase::Sending => "receivingRequest",
            _ => "requestReceived",
        })
    }

    pub fn server_response_state(&self) -> String {
        self.t(match self.phase {
            Phase::Processing => "buildingResponse",
            Phase::Responding => "sendingResponse",
            Phase::Done => "responseSent",
            _ => "waitingToRespond",
        })
    }
}

impl World for HttpExchange {
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

impl Widget for HttpExchange {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Exchange
    }

    fn frame(&self) -> Frame {
        let mut lines = vec![
            self.browser_hint(),
            format!(
                "browser: {} / {}",
                self.browser_request_state(),
                self.browser_response_state()
            ),
            format!(
                "server: {} / {}",
                self.server_request_state(),
                self.server_response_state()
            ),
        ];
        if let Some(r) = &self.response {
            lines.extend(r.lines().take(5).map(str::to_string));
        }
        let packet_tone = match self.packet_kind {
            PacketKind::Request => Tone::Busy,
            PacketKind::Response => Tone::Ok,
        };
        Frame {
            status: self.status_label(),
            tone: self.tone(),
            // 轨道上只显示第一行
            packet: self.packet.as_ref().map(|p| {
                let mut v = p.view(packet_tone);
                v.meta = v.meta.lines().next().unwrap_or_default().to_string();
                v
            }),
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
pub struct ExchangeTravel {
    pub to_pct: u8,
}

impl Event for ExchangeTravel {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world_mut::<HttpExchange>(world);
        w.timers.fired(TimerSlot::Travel);
        if let Some(p) = &mut w.packet {
            p.position = self.to_pct;
        }
        w.emit(sim, VizEventKind::PacketTravel { to_pct: self.to_pct });
    }
}

/// 数据包到达对端
#[derive(Debug)]
pub struct ExchangeArrive {
    pub kind: PacketKind,
}

impl Event for ExchangeArrive {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world_mut::<HttpExchange>(world);
        w.timers.fired(TimerSlot::Delivery);
        let name = w.packet.take().map(|p| p.name).unwrap_or_default();
        w.emit(sim, VizEventKind::PacketDelivered { name });
        match self.kind {
            PacketKind::Request => {
                w.set_phase(sim, Phase::Processing);
                let delay = w.timing.server();
                w.timers
                    .schedule(sim, TimerSlot::Delivery, delay, ExchangeRespond);
            }
            PacketKind::Response => {
                w.response = w.pending_response.take().map(|(full, _)| full);
                w.set_phase(sim, Phase::Done);
            }
        }
    }
}

/// 服务器处理完毕，发出响应
#[derive(Debug)]
pub struct ExchangeRespond;

impl Event for ExchangeRespond {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world_mut::<HttpExchange>(world);
        w.timers.fired(TimerSlot::Delivery);
        w.set_phase(sim, Phase::Responding);
        let snippet = w
            .pending_response
            .as_ref()
            .map(|(_, s)| s.clone())
            .unwrap_or_default();
        w.launch(sim, PacketKind::Response, snippet);
    }
}
