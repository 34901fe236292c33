use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "walkthrough-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_walkthrough"))
        .args(args)
        .output()
        .expect("run walkthrough")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "walkthrough failed: stdout={}, stderr={}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn read_events(path: &PathBuf) -> Vec<Value> {
    let text = fs::read_to_string(path).expect("read viz json");
    let v: Value = serde_json::from_str(&text).expect("parse viz json");
    v.as_array().expect("viz json is an array").clone()
}

#[test]
fn handshake_three_presses_ends_connected() {
    let dir = unique_temp_dir("handshake");
    let out_json = dir.join("viz.json");
    let output = run(&[
        "handshake",
        "--presses",
        "3",
        "--until-ms",
        "6000",
        "--viz-json",
        out_json.to_str().unwrap(),
    ]);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Connected"), "stdout={stdout}");

    let events = read_events(&out_json);
    let active: Vec<u64> = events
        .iter()
        .filter(|e| e["kind"] == "step_active")
        .filter_map(|e| e["index"].as_u64())
        .collect();
    assert_eq!(active, vec![0, 1, 2]);
    assert!(events.iter().all(|e| e["widget"] == "handshake"));

    let mut last = 0;
    for e in &events {
        let t = e["t_ns"].as_u64().expect("t_ns");
        assert!(t >= last, "events out of order");
        last = t;
    }
}

#[test]
fn transfer_disrupt_records_dropped_packet() {
    let dir = unique_temp_dir("transfer");
    let out_json = dir.join("viz.json");
    let output = run(&[
        "transfer",
        "--disrupt-at-ms",
        "200",
        "--until-ms",
        "3000",
        "--viz-json",
        out_json.to_str().unwrap(),
    ]);
    stdout_of(&output);

    let events = read_events(&out_json);
    assert!(events.iter().any(|e| e["kind"] == "packet_dropped"));
    assert!(events.iter().any(|e| e["kind"] == "network_alert"));
    assert!(events.iter().any(|e| e["kind"] == "packet_delivered"));
}

#[test]
fn exchange_prints_response_headers() {
    let output = run(&["exchange", "--until-ms", "6000"]);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("GET / HTTP/1.1"), "stdout={stdout}");
    assert!(stdout.contains("HTTP/1.1 200 OK"), "stdout={stdout}");
}

#[test]
fn resolve_fixture_host_and_rejects_garbage() {
    let output = run(&["resolve", "example.com", "not a domain", "--until-ms", "3000"]);
    let stdout = stdout_of(&output);
    assert!(
        stdout.contains("Name: example.com → Address: 93.184.215.14"),
        "stdout={stdout}"
    );
    assert!(stdout.contains("Invalid host name."), "stdout={stdout}");
}

#[test]
fn pipeline_rejects_unknown_action() {
    let output = run(&["pipeline", "--actions", "spin"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown pipeline action"), "stderr={stderr}");
}

#[test]
fn url_turns_words_into_search() {
    let stdout = stdout_of(&run(&["url", "how", "browsers", "work"]));
    assert!(
        stdout.contains("https://google.com/search?q=how%20browsers%20work"),
        "stdout={stdout}"
    );

    let stdout = stdout_of(&run(&["url", "example.com"]));
    assert!(stdout.contains("https://example.com"), "stdout={stdout}");
}

#[test]
fn config_overrides_messages() {
    let dir = unique_temp_dir("config");
    let cfg = dir.join("config.json");
    fs::write(
        &cfg,
        r#"{ "schema_version": 1, "messages": { "examples.tcpHandshake.connected": "Linked up" } }"#,
    )
    .expect("write config");
    let output = run(&[
        "--config",
        cfg.to_str().unwrap(),
        "handshake",
        "--until-ms",
        "6000",
    ]);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Linked up"), "stdout={stdout}");
}

#[test]
fn bad_config_schema_fails() {
    let dir = unique_temp_dir("bad-config");
    let cfg = dir.join("config.json");
    fs::write(&cfg, r#"{ "schema_version": 99 }"#).expect("write config");
    let output = run(&["--config", cfg.to_str().unwrap(), "parsing"]);
    assert!(!output.status.success());
}
