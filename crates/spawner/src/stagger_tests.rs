use super::*;
use chrono::Duration;

#[test]
fn no_recent_session_means_no_delay() {
    let now = Utc::now();
    assert_eq!(stagger_delay_ms(5_000, None, now), 0);
}

#[test]
fn zero_window_means_no_delay() {
    let now = Utc::now();
    assert_eq!(stagger_delay_ms(0, Some(now), now), 0);
}

#[test]
fn negative_window_means_no_delay() {
    let now = Utc::now();
    assert_eq!(stagger_delay_ms(-100, Some(now), now), 0);
}

#[test]
fn recent_session_within_window_yields_remaining_wait() {
    let now = Utc::now();
    let started = now - Duration::milliseconds(2_000);
    assert_eq!(stagger_delay_ms(5_000, Some(started), now), 3_000);
}

#[test]
fn session_older_than_window_yields_zero() {
    let now = Utc::now();
    let started = now - Duration::milliseconds(10_000);
    assert_eq!(stagger_delay_ms(5_000, Some(started), now), 0);
}

#[test]
fn session_exactly_at_window_boundary_yields_zero() {
    let now = Utc::now();
    let started = now - Duration::milliseconds(5_000);
    assert_eq!(stagger_delay_ms(5_000, Some(started), now), 0);
}
