use chrono::{TimeZone, Utc};

use crate::config::ExchangeTiming;
use crate::i18n::Catalog;
use crate::sim::{SimTime, Simulator};
use crate::widget::Widget;
use crate::widget::exchange::{
    HttpExchange, PacketKind, Phase, build_response, html_document, http_date,
};

fn setup() -> (Simulator, HttpExchange) {
    (
        Simulator::default(),
        HttpExchange::new(&Catalog::default(), ExchangeTiming::default()),
    )
}

fn date() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, 9, 7, 1)
        .single()
        .expect("valid date")
}

fn run_to(sim: &mut Simulator, ex: &mut HttpExchange, ms: u64) {
    sim.run_until(SimTime::from_millis(ms), ex);
}

#[test]
fn http_date_is_rfc1123() {
    assert_eq!(http_date(&date()), "Tue, 05 Mar 2024 09:07:01 GMT");
}

#[test]
fn response_carries_document_length() {
    let doc = html_document("Example Domain");
    let resp = build_response(&date(), &doc);
    assert!(resp.starts_with("HTTP/1.1 200 OK\n"));
    assert!(resp.contains(&format!("Content-Length: {}\n", doc.len())));
    assert!(resp.ends_with("</html>"));
}

#[test]
fn phases_advance_on_timers_only() {
    let (mut sim, mut ex) = setup();
    assert_eq!(ex.phase(), Phase::Idle);
    ex.start(&mut sim, date());
    assert_eq!(ex.phase(), Phase::Sending);
    assert_eq!(ex.packet_kind(), PacketKind::Request);
    assert_eq!(ex.packet().map(|p| p.position), Some(16));

    run_to(&mut sim, &mut ex, 180);
    assert_eq!(ex.packet().map(|p| p.position), Some(84));

    run_to(&mut sim, &mut ex, 2_380);
    assert_eq!(ex.phase(), Phase::Processing);
    assert!(ex.packet().is_none());
    assert_eq!(ex.server_response_state(), "Building response...");

    run_to(&mut sim, &mut ex, 2_980);
    assert_eq!(ex.phase(), Phase::Responding);
    assert_eq!(ex.packet_kind(), PacketKind::Response);
    assert_eq!(ex.packet().map(|p| p.position), Some(84));

    run_to(&mut sim, &mut ex, 3_160);
    assert_eq!(ex.packet().map(|p| p.position), Some(16));
    assert!(ex.response().is_none());

    let total = ExchangeTiming::default().total().as_millis();
    assert_eq!(total, 5_360);
    run_to(&mut sim, &mut ex, total - 1);
    assert_eq!(ex.phase(), Phase::Responding);
    run_to(&mut sim, &mut ex, total);
    assert_eq!(ex.phase(), Phase::Done);
    assert_eq!(ex.status_label(), "Response delivered");
    let resp = ex.response().expect("response delivered");
    assert!(resp.contains("Date: Tue, 05 Mar 2024 09:07:01 GMT"));
    assert_eq!(sim.pending(), 0);
}

#[test]
fn start_is_ignored_while_busy() {
    let (mut sim, mut ex) = setup();
    ex.start(&mut sim, date());
    run_to(&mut sim, &mut ex, 1_000);
    let pending = sim.pending();
    ex.start(&mut sim, date());
    assert_eq!(sim.pending(), pending);
    assert_eq!(ex.phase(), Phase::Sending);
}

#[test]
fn can_run_again_after_done() {
    let (mut sim, mut ex) = setup();
    ex.start(&mut sim, date());
    sim.run(&mut ex);
    assert_eq!(ex.phase(), Phase::Done);

    ex.start(&mut sim, date());
    assert_eq!(ex.phase(), Phase::Sending);
    assert!(ex.response().is_none());
}

#[test]
fn unmount_mid_flight_freezes_state() {
    let (mut sim, mut ex) = setup();
    ex.start(&mut sim, date());
    run_to(&mut sim, &mut ex, 2_500);
    ex.unmount(&mut sim);
    sim.run(&mut ex);
    assert_eq!(ex.phase(), Phase::Processing);
}

#[test]
fn frame_lists_both_sides() {
    let (mut sim, mut ex) = setup();
    ex.start(&mut sim, date());
    let frame = ex.frame();
    assert_eq!(frame.status, "Request in flight");
    assert_eq!(frame.packet.map(|p| p.meta), Some("GET / HTTP/1.1".to_string()));
    assert!(frame.lines.iter().any(|l| l.starts_with("server: Receiving request...")));
}
