use crate::view::{Frame, PacketView, Tone, render_frame, render_track};

#[test]
fn empty_track_has_no_packet() {
    let line = render_track(None);
    assert!(line.starts_with("[client] "));
    assert!(line.ends_with(" [server]"));
    assert!(!line.contains('■'));
}

#[test]
fn packet_position_maps_onto_track() {
    let packet = PacketView {
        left_pct: 0,
        name: "SYN".to_string(),
        meta: "seq=1000".to_string(),
        tone: Tone::Busy,
    };
    let line = render_track(Some(&packet));
    assert!(line.starts_with("[client] ■"));
    assert!(line.ends_with("SYN seq=1000"));

    let dropped = PacketView {
        left_pct: 100,
        tone: Tone::Alert,
        ..packet
    };
    assert!(render_track(Some(&dropped)).contains("✕ [server]"));
}

#[test]
fn frame_renders_status_and_lines() {
    let frame = Frame {
        status: "Connected".to_string(),
        tone: Tone::Ok,
        packet: None,
        lines: vec!["client seq=1 ack=2".to_string()],
    };
    let text = render_frame(&frame);
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("● Connected"));
    assert!(lines.next().is_some_and(|l| l.starts_with("[client]")));
    assert_eq!(lines.next(), Some("  client seq=1 ack=2"));
    assert_eq!(Tone::Ok.css_class(), "bg-green-400");
}
