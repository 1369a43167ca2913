use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use turret_defence_core::{Command, Event};
use turret_defence_world::{self as world, query, World, WorldConfig};

const TICKS: usize = 900;

#[test]
fn reference_session_replays_identically() {
    let first = replay();
    let second = replay();

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(first.shots > 0, "no turret ever fired");
    assert_eq!(first.spawned, 10);
    assert!(first.lives <= 10);
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    log: Vec<String>,
    positions: Vec<(u32, u32, u32)>,
    shots: usize,
    spawned: u32,
    lives: u32,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.log.hash(&mut hasher);
        self.positions.hash(&mut hasher);
        hasher.finish()
    }
}

fn replay() -> ReplayOutcome {
    let mut world = World::new(&WorldConfig::default()).expect("reference world");
    let mut log = Vec::new();
    let mut shots = 0;

    for _ in 0..TICKS {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );
        shots += events
            .iter()
            .filter(|event| matches!(event, Event::TurretFired { .. }))
            .count();
        log.extend(events.iter().map(|event| format!("{event:?}")));
    }

    let positions = query::enemy_view(&world)
        .iter()
        .map(|enemy| {
            (
                enemy.id.get(),
                enemy.position.x.to_bits(),
                enemy.position.y.to_bits(),
            )
        })
        .collect();

    ReplayOutcome {
        log,
        positions,
        shots,
        spawned: query::spawned_count(&world),
        lives: query::lives(&world),
    }
}
