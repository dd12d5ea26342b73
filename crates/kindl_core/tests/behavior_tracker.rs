use kindl_core::{BehaviorTracker, ManualClock, ReactionKind, TrackerError};

const T0: i64 = 1_760_000_000_000;
const HOUR_MS: i64 = 60 * 60 * 1000;

fn tracker_at(now_ms: i64) -> (BehaviorTracker<ManualClock>, ManualClock) {
    let clock = ManualClock::new(now_ms);
    (BehaviorTracker::new(clock.clone()), clock)
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn coffee_scenario_scores_138_at_last_view() {
    let (mut tracker, clock) = tracker_at(T0);

    for _ in 0..3 {
        tracker.track_view("coffee");
        clock.advance(10_000);
    }
    tracker.track_time_spent("coffee", 20_000);
    tracker.track_time_spent("coffee", 25_000);
    for depth in [0.2, 0.6, 0.4] {
        tracker.track_scroll_depth("coffee", depth).unwrap();
    }
    tracker.track_reaction("coffee", ReactionKind::FeelsRight);
    tracker.track_reaction("coffee", ReactionKind::FeelsRight);
    tracker.track_reaction_str("coffee", "not-vibe").unwrap();

    let last_viewed = tracker
        .view_record("coffee")
        .and_then(|record| record.last_viewed)
        .unwrap();
    clock.set(last_viewed);
    assert_close(tracker.score("coffee"), 138.0);

    clock.advance(HOUR_MS);
    assert_close(tracker.score("coffee"), 136.75);
}

#[test]
fn session_start_is_fixed_at_creation() {
    let (mut tracker, clock) = tracker_at(T0);
    clock.advance(5 * HOUR_MS);
    tracker.track_view("1");
    assert_eq!(tracker.session_start(), T0);
}

#[test]
fn scroll_depth_is_max_hold_regardless_of_order() {
    let (mut tracker, _) = tracker_at(T0);
    for depth in [0.3, 0.1, 0.5, 0.2] {
        tracker.track_scroll_depth("2", depth).unwrap();
    }
    assert_eq!(tracker.view_record("2").unwrap().scroll_depth, 0.5);

    let err = tracker.track_scroll_depth("2", f64::INFINITY).unwrap_err();
    assert!(matches!(err, TrackerError::InvalidArgument(_)));
    assert_eq!(tracker.view_record("2").unwrap().scroll_depth, 0.5);
}

#[test]
fn recently_viewed_orders_by_last_view_and_respects_limit() {
    let (mut tracker, clock) = tracker_at(T0);
    tracker.track_view("A");
    clock.advance(1_000);
    tracker.track_view("B");
    clock.advance(1_000);
    tracker.track_view("C");
    clock.advance(1_000);
    tracker.track_view("A");
    tracker.track_time_spent("never-viewed", 5_000);

    assert_eq!(tracker.recently_viewed(2), vec!["A", "C"]);
    assert_eq!(tracker.recently_viewed(10), vec!["A", "C", "B"]);
    assert!(tracker.recently_viewed(0).is_empty());
}

#[test]
fn recently_viewed_ties_keep_first_reference_order() {
    let (mut tracker, _) = tracker_at(T0);
    tracker.track_scroll_depth("late", 0.1).unwrap();
    tracker.track_view("early");
    tracker.track_view("late");

    assert_eq!(tracker.recently_viewed(2), vec!["late", "early"]);
}

#[test]
fn score_is_monotonic_in_views_time_and_feels_right() {
    let (mut tracker, _) = tracker_at(T0);

    let mut previous = tracker.score("x");
    for _ in 0..5 {
        tracker.track_view("x");
        let current = tracker.score("x");
        assert!(current >= previous);
        previous = current;
    }
    for _ in 0..80 {
        tracker.track_time_spent("x", 1_000);
        let current = tracker.score("x");
        assert!(current >= previous);
        previous = current;
    }
    tracker.track_time_spent("x", 1_000_000);
    assert_close(tracker.score("x"), previous);

    tracker.track_reaction("x", ReactionKind::FeelsRight);
    assert!(tracker.score("x") > previous);
}

#[test]
fn time_score_is_capped_at_fifty() {
    let (mut tracker, _) = tracker_at(T0);
    tracker.track_time_spent("long-read", 3_600_000);
    assert_close(tracker.score("long-read"), 50.0);
}

#[test]
fn ordered_by_score_is_stable_for_ties() {
    let (mut tracker, _) = tracker_at(T0);
    tracker.track_reaction("b", ReactionKind::MaybeLater);
    tracker.track_reaction("d", ReactionKind::MaybeLater);
    tracker.track_reaction("top", ReactionKind::FeelsRight);

    let ordered = tracker.ordered_by_score(&["a", "b", "c", "d", "top", "e"]);
    assert_eq!(ordered, vec!["top", "b", "d", "a", "c", "e"]);

    let reversed = tracker.ordered_by_score(&["e", "d", "c", "b", "a"]);
    assert_eq!(reversed, vec!["d", "b", "e", "c", "a"]);
}

#[test]
fn ordered_by_score_does_not_create_records() {
    let (tracker, _) = tracker_at(T0);
    let ordered = tracker.ordered_by_score(&["1", "2"]);
    assert_eq!(ordered, vec!["1", "2"]);
    assert!(tracker.snapshot().is_empty());
}

#[test]
fn snapshot_restore_keeps_order_and_counters() {
    let (mut source, clock) = tracker_at(T0);
    source.track_view("3");
    clock.advance(1);
    source.track_view("1");
    source.track_reaction("1", ReactionKind::FeelsRight);
    source.track_profile_view("1-4", 2_500);

    let (mut restored, _) = tracker_at(T0 + 10);
    restored.restore(source.snapshot());

    assert_eq!(restored.snapshot(), source.snapshot());
    assert_eq!(restored.recently_viewed(5), vec!["1", "3"]);
    assert_eq!(restored.reactions("1").feels_right, 1);
    assert_eq!(restored.session_start(), T0 + 10);
}
