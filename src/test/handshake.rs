use crate::config::HandshakeTiming;
use crate::i18n::Catalog;
use crate::seq::Counters;
use crate::sim::{SimTime, Simulator};
use crate::viz::VizEventKind;
use crate::widget::Widget;
use crate::widget::handshake::{ConnectionState, TcpHandshake};

fn setup() -> (Simulator, TcpHandshake) {
    let hs = TcpHandshake::new(&Catalog::default(), HandshakeTiming::default())
        .expect("handshake table");
    (Simulator::default(), hs)
}

fn run_for(sim: &mut Simulator, hs: &mut TcpHandshake, ms: u64) {
    let until = sim.now().saturating_add(SimTime::from_millis(ms));
    sim.run_until(until, hs);
}

#[test]
fn three_presses_walk_syn_synack_ack_and_fourth_disconnects() {
    let (mut sim, mut hs) = setup();
    assert_eq!(hs.state(), ConnectionState::Disconnected);

    hs.press(&mut sim);
    assert_eq!(hs.active_step(), Some(0));
    assert_eq!(hs.state(), ConnectionState::Connecting);
    assert_eq!(hs.packet().map(|p| p.name.as_str()), Some("SYN"));
    run_for(&mut sim, &mut hs, 2_000);

    hs.press(&mut sim);
    assert_eq!(hs.active_step(), Some(1));
    assert_eq!(hs.counters().server_ack, 1001);
    run_for(&mut sim, &mut hs, 2_000);

    hs.press(&mut sim);
    assert_eq!(hs.active_step(), Some(2));
    assert_eq!(
        hs.counters(),
        Counters {
            client_seq: 1001,
            client_ack: 5001,
            server_seq: 5000,
            server_ack: 1001,
        }
    );
    run_for(&mut sim, &mut hs, 2_000);
    assert_eq!(hs.state(), ConnectionState::Connected);

    hs.press(&mut sim);
    assert_eq!(hs.active_step(), None);
    assert_eq!(hs.state(), ConnectionState::Disconnected);
    assert_eq!(hs.counters(), Counters::default());
    assert!(hs.packet().is_none());
    assert_eq!(sim.pending(), 0);
}

#[test]
fn connected_only_after_last_delivery_timer() {
    let (mut sim, mut hs) = setup();
    hs.press(&mut sim);
    hs.press(&mut sim);
    hs.press(&mut sim);
    // 前两步不会触发“已连接”
    assert_eq!(hs.state(), ConnectionState::Connecting);

    run_for(&mut sim, &mut hs, 1_579);
    assert_eq!(hs.state(), ConnectionState::Connecting);
    run_for(&mut sim, &mut hs, 1);
    assert_eq!(hs.state(), ConnectionState::Connected);
}

#[test]
fn middle_steps_never_connect() {
    let (mut sim, mut hs) = setup();
    hs.press(&mut sim);
    run_for(&mut sim, &mut hs, 5_000);
    hs.press(&mut sim);
    run_for(&mut sim, &mut hs, 5_000);
    assert_eq!(hs.state(), ConnectionState::Connecting);
}

#[test]
fn packet_moves_to_far_end_after_start_delay() {
    let (mut sim, mut hs) = setup();
    hs.press(&mut sim);
    assert_eq!(hs.packet().map(|p| p.position), Some(18));
    run_for(&mut sim, &mut hs, 179);
    assert_eq!(hs.packet().map(|p| p.position), Some(18));
    run_for(&mut sim, &mut hs, 1);
    assert_eq!(hs.packet().map(|p| p.position), Some(82));

    hs.press(&mut sim);
    assert_eq!(hs.packet().map(|p| p.position), Some(82));
    run_for(&mut sim, &mut hs, 180);
    assert_eq!(hs.packet().map(|p| p.position), Some(18));
}

#[test]
fn unmount_cancels_every_pending_timer() {
    let (mut sim, mut hs) = setup();
    hs.press(&mut sim);
    hs.press(&mut sim);
    hs.press(&mut sim);
    assert!(sim.pending() > 0);

    hs.unmount(&mut sim);
    assert_eq!(sim.pending(), 0);
    assert_eq!(hs.timers().armed(), 0);

    sim.run(&mut hs);
    assert_eq!(hs.state(), ConnectionState::Connecting);
    assert_eq!(hs.packet().map(|p| p.position), Some(18));
}

#[test]
fn disconnecting_before_delivery_suppresses_connected() {
    let (mut sim, mut hs) = setup();
    hs.press(&mut sim);
    hs.press(&mut sim);
    hs.press(&mut sim);
    run_for(&mut sim, &mut hs, 500);
    hs.press(&mut sim);
    sim.run(&mut hs);
    assert_eq!(hs.state(), ConnectionState::Disconnected);
}

#[test]
fn repeated_presses_bump_tick() {
    let (mut sim, mut hs) = setup();
    let t0 = hs.tick();
    for _ in 0..4 {
        hs.press(&mut sim);
    }
    assert_eq!(hs.tick(), t0 + 4);
}

#[test]
fn button_label_follows_next_step() {
    let (mut sim, mut hs) = setup();
    assert_eq!(hs.button_label(), "Send SYN");
    hs.press(&mut sim);
    assert_eq!(hs.button_label(), "Reply with SYN-ACK");
    hs.press(&mut sim);
    assert_eq!(hs.button_label(), "Send ACK");
    hs.press(&mut sim);
    assert_eq!(hs.button_label(), "Disconnect");
}

#[test]
fn viz_records_single_connected_status() {
    let (mut sim, mut hs) = setup();
    hs.recorder.enable();
    for _ in 0..3 {
        hs.press(&mut sim);
    }
    sim.run(&mut hs);

    let viz = hs.recorder.take().expect("viz enabled");
    let connected = viz.count(|k| {
        matches!(k, VizEventKind::Status { label, .. } if label == "Connected")
    });
    assert_eq!(connected, 1);
    let last = viz.events.last().expect("events");
    assert_eq!(last.t_ns, SimTime::from_millis(1_580).0);
}

#[test]
fn frame_shows_counters_and_active_step() {
    let (mut sim, mut hs) = setup();
    hs.press(&mut sim);
    let frame = hs.frame();
    assert_eq!(frame.status, "Connecting");
    assert!(frame.lines[0].starts_with('>'));
    assert!(
        frame
            .lines
            .iter()
            .any(|l| l == "client seq=1000 ack=0 | server seq=0 ack=0")
    );
    assert_eq!(frame.packet.map(|p| p.meta), Some("seq=1000".to_string()));
}
