use crate::seq::StepDriver;

#[test]
fn advance_walks_the_table_then_returns_to_inactive() {
    let mut d = StepDriver::new(3);
    assert_eq!(d.current(), None);
    assert_eq!(d.advance(), Some(0));
    assert_eq!(d.advance(), Some(1));
    assert_eq!(d.advance(), Some(2));
    assert!(d.is_last());
    assert_eq!(d.advance(), None);
    assert!(!d.is_active());
}

#[test]
fn n_advances_from_inactive_complete_a_cycle() {
    for n in 1..=6 {
        let mut d = StepDriver::new(n);
        for _ in 0..n {
            assert!(d.advance().is_some());
        }
        assert_eq!(d.advance(), None, "table of {n} steps");
    }
}

#[test]
fn every_transition_bumps_the_tick() {
    let mut d = StepDriver::new(2);
    let t0 = d.tick();
    d.advance();
    d.reset();
    d.reset();
    assert_eq!(d.tick(), t0 + 3);
}

#[test]
fn jump_clamps_out_of_range_index() {
    let mut d = StepDriver::new(3);
    assert_eq!(d.jump(99), 2);
    assert_eq!(d.current(), Some(2));
    assert_eq!(d.next_index(), None);
}

#[test]
fn zero_length_driver_behaves_like_single_step() {
    let mut d = StepDriver::new(0);
    assert_eq!(d.len(), 1);
    assert_eq!(d.advance(), Some(0));
    assert_eq!(d.advance(), None);
}
