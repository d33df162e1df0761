use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use snake_core::{CellCoord, Command, Direction, Event};
use snake_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_sequence() {
    let first = replay(0x5eed_cafe, scripted_commands());
    let second = replay(0x5eed_cafe, scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(
        first
            .events
            .iter()
            .any(|event| matches!(event, Event::SnakeAdvanced { .. })),
        "script should move the snake"
    );
}

#[test]
fn sweeping_the_board_eats_the_first_item() {
    let outcome = replay(7, scripted_commands());

    assert!(
        outcome.events.contains(&Event::ItemConsumed {
            cell: CellCoord::new(15, 15)
        }),
        "the sweep passes through the initial item cell"
    );
}

fn replay(seed: u64, commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::with_seed(seed);
    let mut events = Vec::new();
    let mut heads = Vec::new();

    for command in commands {
        world::apply(&mut world, command, &mut events);
        if let Some(head) = query::body(&world).head() {
            heads.push(head);
        }
    }

    ReplayOutcome { events, heads }
}

/// Walks south to the initial item, then sweeps east and west along the lower rows.
fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![Command::Start];
    let turn = |commands: &mut Vec<Command>, direction: Direction, ticks: usize| {
        commands.push(Command::SetPendingDirection { direction });
        commands.extend(std::iter::repeat(Command::Tick).take(ticks));
    };

    turn(&mut commands, Direction::South, 5);
    turn(&mut commands, Direction::East, 5);
    for row in 0..3 {
        turn(&mut commands, Direction::South, 1);
        let direction = if row % 2 == 0 {
            Direction::West
        } else {
            Direction::East
        };
        turn(&mut commands, direction, 12);
    }

    commands
}

#[derive(Debug, PartialEq, Eq)]
struct ReplayOutcome {
    events: Vec<Event>,
    heads: Vec<CellCoord>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.heads.hash(&mut hasher);
        for event in &self.events {
            format!("{event:?}").hash(&mut hasher);
        }
        hasher.finish()
    }
}
