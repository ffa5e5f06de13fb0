use std::time::Duration;

use shroom_sniff_core::{Event, EventBus};
use shroom_sniff_system_timer::RoundTimer;

#[test]
fn emits_one_event_per_whole_second() {
    let mut timer = RoundTimer::new(10);
    let mut bus = EventBus::new();

    timer.tick(Duration::from_millis(600), &mut bus);
    assert!(bus.is_empty(), "no event before a full second");

    timer.tick(Duration::from_millis(1_500), &mut bus);
    assert_eq!(
        bus.drain(),
        vec![
            Event::TimerAdvanced {
                elapsed_seconds: 1,
                remaining_seconds: Some(9),
            },
            Event::TimerAdvanced {
                elapsed_seconds: 2,
                remaining_seconds: Some(8),
            },
        ]
    );
    assert_eq!(timer.elapsed_seconds(), 2);
}

#[test]
fn time_up_fires_exactly_once() {
    let mut timer = RoundTimer::new(3);
    let mut bus = EventBus::new();

    timer.tick(Duration::from_secs(10), &mut bus);
    timer.tick(Duration::from_secs(10), &mut bus);

    let time_ups = bus
        .drain()
        .into_iter()
        .filter(|event| matches!(event, Event::TimeUp { .. }))
        .count();
    assert_eq!(time_ups, 1);
    assert!(timer.is_expired());
    assert_eq!(timer.elapsed_seconds(), 3);
    assert_eq!(timer.remaining_seconds(), Some(0));
}

#[test]
fn paused_timer_does_not_advance() {
    let mut timer = RoundTimer::new(5);
    let mut bus = EventBus::new();

    timer.pause();
    timer.tick(Duration::from_secs(3), &mut bus);
    assert!(bus.is_empty());
    assert!(timer.is_paused());

    timer.resume();
    timer.tick(Duration::from_secs(1), &mut bus);
    assert_eq!(timer.elapsed_seconds(), 1);
}

#[test]
fn cancelled_timer_stops_for_good() {
    let mut timer = RoundTimer::new(2);
    let mut bus = EventBus::new();

    timer.tick(Duration::from_millis(1_200), &mut bus);
    timer.cancel();
    timer.tick(Duration::from_secs(5), &mut bus);

    assert_eq!(timer.elapsed_seconds(), 1);
    assert!(timer.is_cancelled());
    assert!(!bus
        .drain()
        .iter()
        .any(|event| matches!(event, Event::TimeUp { .. })));
}

#[test]
fn zero_limit_never_expires() {
    let mut timer = RoundTimer::new(0);
    let mut bus = EventBus::new();

    timer.tick(Duration::from_secs(120), &mut bus);

    assert!(!timer.is_expired());
    assert_eq!(timer.elapsed_seconds(), 120);
    assert_eq!(timer.remaining_seconds(), None);
}
