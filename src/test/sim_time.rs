use crate::sim::SimTime;

#[test]
fn sim_time_unit_conversions() {
    assert_eq!(SimTime::from_micros(1), SimTime(1_000));
    assert_eq!(SimTime::from_millis(1), SimTime(1_000_000));
    assert_eq!(SimTime::from_secs(1), SimTime(1_000_000_000));
}

#[test]
fn sim_time_unit_conversions_saturate_on_overflow() {
    assert_eq!(SimTime::from_micros(u64::MAX), SimTime(u64::MAX));
    assert_eq!(SimTime::from_millis(u64::MAX), SimTime(u64::MAX));
    assert_eq!(SimTime::from_secs(u64::MAX), SimTime(u64::MAX));
}

#[test]
fn sim_time_add_saturates_and_displays_millis() {
    let t = SimTime::from_millis(1400).saturating_add(SimTime::from_millis(180));
    assert_eq!(t.as_millis(), 1580);
    assert_eq!(t.to_string(), "1580ms");
    assert_eq!(SimTime(u64::MAX).saturating_add(SimTime(1)), SimTime(u64::MAX));
}
