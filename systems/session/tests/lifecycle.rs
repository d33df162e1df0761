use std::time::Duration;

use snake_core::{CellCoord, Direction, EndReason, Event, Score, SessionStatus};
use snake_system_session::{FixedIntervalScheduler, MemoryHighScoreStore, Session};
use snake_world::{query, World};

type TestSession = Session<FixedIntervalScheduler, MemoryHighScoreStore>;

const FRAME: Duration = Duration::from_millis(50);

fn session(seed: u64) -> TestSession {
    Session::new(
        World::with_seed(seed),
        FixedIntervalScheduler::new(),
        MemoryHighScoreStore::default(),
    )
}

fn run_until_over(session: &mut TestSession, events: &mut Vec<Event>) {
    for _ in 0..2_000 {
        session.advance(FRAME, events);
        if session.last_outcome().is_some() {
            return;
        }
    }
    panic!("game did not end");
}

fn ticks(session: &mut TestSession, count: u32, events: &mut Vec<Event>) {
    let interval = query::tick_interval(session.world());
    for _ in 0..count {
        session.advance(interval, events);
    }
}

/// Eats the opening item at (15, 15), then runs north into the wall.
fn play_scoring_game(session: &mut TestSession, events: &mut Vec<Event>) {
    session.start(events);
    session.steer(Direction::South, events);
    ticks(session, 5, events);
    session.steer(Direction::East, events);
    ticks(session, 5, events);
    session.steer(Direction::North, events);
    run_until_over(session, events);
}

#[test]
fn stationary_snake_survives_until_steered() {
    let mut session = session(1);
    let mut events = Vec::new();
    session.start(&mut events);

    ticks(&mut session, 25, &mut events);

    assert_eq!(query::status(session.world()), SessionStatus::Running);
    assert_eq!(
        query::body(session.world()).head(),
        Some(CellCoord::new(10, 10))
    );
}

#[test]
fn running_north_hits_the_wall_after_ten_moves() {
    let mut session = session(1);
    let mut events = Vec::new();
    session.start(&mut events);
    session.steer(Direction::North, &mut events);

    ticks(&mut session, 10, &mut events);
    assert_eq!(
        query::body(session.world()).head(),
        Some(CellCoord::new(10, 0))
    );
    assert!(session.last_outcome().is_none());

    ticks(&mut session, 1, &mut events);
    assert_eq!(query::status(session.world()), SessionStatus::Ended);
    assert_eq!(
        events.last(),
        Some(&Event::GameOver {
            final_score: Score::ZERO,
            high_score: Score::ZERO,
            new_record: false,
            reason: EndReason::WallCollision,
        })
    );
    assert_eq!(session.store().writes(), 0);
    assert!(session.timer().is_none());
}

#[test]
fn high_score_only_increases_across_games() {
    let mut session = session(3);
    let mut events = Vec::new();

    play_scoring_game(&mut session, &mut events);
    let first = session.last_outcome().expect("first game finished");
    assert!(first.new_record);
    assert!(first.final_score >= Score::new(10));
    assert_eq!(session.high_score(), first.final_score);
    assert_eq!(session.store().writes(), 1);

    session.reset(&mut events);
    session.start(&mut events);
    session.steer(Direction::West, &mut events);
    run_until_over(&mut session, &mut events);

    let second = session.last_outcome().expect("second game finished");
    assert_eq!(second.final_score, Score::ZERO);
    assert!(!second.new_record);
    assert_eq!(session.high_score(), first.final_score);
    assert_eq!(session.store().writes(), 1);
}

#[test]
fn ended_game_ignores_input_until_reset() {
    let mut session = session(5);
    let mut events = Vec::new();
    session.start(&mut events);
    session.steer(Direction::North, &mut events);
    run_until_over(&mut session, &mut events);
    events.clear();

    session.start(&mut events);
    session.steer(Direction::East, &mut events);
    session.advance(Duration::from_secs(1), &mut events);

    assert!(events
        .iter()
        .all(|event| !matches!(event, Event::SnakeAdvanced { .. })));
    assert_eq!(query::status(session.world()), SessionStatus::Ended);

    session.reset(&mut events);
    session.start(&mut events);
    assert_eq!(query::status(session.world()), SessionStatus::Running);
}

#[test]
fn identical_seeds_replay_identically() {
    let mut first = session(42);
    let mut second = session(42);
    let mut first_events = Vec::new();
    let mut second_events = Vec::new();

    play_scoring_game(&mut first, &mut first_events);
    play_scoring_game(&mut second, &mut second_events);

    assert_eq!(first_events, second_events);
    assert_eq!(first.last_outcome(), second.last_outcome());
}
