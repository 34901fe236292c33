use crate::config::PipelineTiming;
use crate::i18n::Catalog;
use crate::sim::{SimTime, Simulator};
use crate::widget::pipeline::{RenderPipeline, Stage};

fn setup() -> (Simulator, RenderPipeline) {
    let p = RenderPipeline::new(&Catalog::default(), PipelineTiming::default()).expect("stages");
    (Simulator::default(), p)
}

#[test]
fn color_change_highlights_paint_only() {
    let (mut sim, mut p) = setup();
    p.change_color(&mut sim);
    assert_eq!(p.color(), "#38bdf8");
    assert_eq!(p.active_stages(), &[Stage::Paint]);
    assert_eq!(p.status(), "Changing the color only reruns paint.");

    sim.run_until(SimTime::from_millis(1_399), &mut p);
    assert!(p.is_active(Stage::Paint));
    sim.run_until(SimTime::from_millis(1_400), &mut p);
    assert!(p.active_stages().is_empty());
}

#[test]
fn width_change_highlights_layout_and_paint() {
    let (mut sim, mut p) = setup();
    p.change_width(&mut sim);
    assert_eq!(p.width(), 260);
    assert!(p.is_active(Stage::Layout));
    assert!(p.is_active(Stage::Paint));
    assert!(!p.is_active(Stage::Composite));
}

#[test]
fn new_highlight_restarts_the_clear_timer() {
    let (mut sim, mut p) = setup();
    p.change_color(&mut sim);
    sim.run_until(SimTime::from_millis(1_000), &mut p);
    p.change_width(&mut sim);
    assert_eq!(sim.pending(), 1);

    sim.run_until(SimTime::from_millis(1_500), &mut p);
    assert_eq!(p.active_stages(), &[Stage::Layout, Stage::Paint]);
    sim.run_until(SimTime::from_millis(2_400), &mut p);
    assert!(p.active_stages().is_empty());
}

#[test]
fn values_cycle() {
    let (mut sim, mut p) = setup();
    for _ in 0..3 {
        p.change_color(&mut sim);
        p.change_width(&mut sim);
    }
    assert_eq!(p.color(), "#e2e8f0");
    assert_eq!(p.width(), 200);
}
