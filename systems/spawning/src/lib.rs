#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning stage that releases enemies at the route entry on a fixed cadence.

use std::time::Duration;

use turret_defence_core::{Enemy, EntityFrame, Event, Health, Route, Tuning};

/// Configuration parameters required to construct the spawning stage.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
    spawn_cap: u32,
    enemy_health: Health,
}

impl Config {
    /// Creates a new configuration from the spawn cadence, total cap and starting health.
    #[must_use]
    pub const fn new(spawn_interval: Duration, spawn_cap: u32, enemy_health: Health) -> Self {
        Self {
            spawn_interval,
            spawn_cap,
            enemy_health,
        }
    }
}

impl From<&Tuning> for Config {
    fn from(tuning: &Tuning) -> Self {
        Self::new(
            tuning.spawn_interval(),
            tuning.spawn_cap,
            Health::new(tuning.enemy_health),
        )
    }
}

/// Pure stage that accumulates elapsed time and spawns at most one enemy per tick.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
}

impl Spawning {
    /// Creates a new spawning stage using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Advances the spawn timer and appends a new enemy when one is due.
    ///
    /// The timer keeps accumulating after the cap is reached; only the spawn
    /// itself is suppressed.
    pub fn handle(
        &self,
        mut frame: EntityFrame,
        dt: Duration,
        route: &Route,
        out: &mut Vec<Event>,
    ) -> EntityFrame {
        frame.spawn_timer = frame.spawn_timer.saturating_add(dt);

        if !self.spawn_due(&frame) {
            return frame;
        }

        let id = frame.allocate_enemy_id();
        let enemy = Enemy::at_entry(id, route, self.config.enemy_health);
        frame.spawned = frame.spawned.saturating_add(1);
        frame.spawn_timer = Duration::ZERO;
        frame.enemies.push(enemy);
        out.push(Event::EnemySpawned {
            enemy: id,
            position: enemy.position,
        });

        frame
    }

    fn spawn_due(&self, frame: &EntityFrame) -> bool {
        frame.spawn_timer >= self.config.spawn_interval && frame.spawned < self.config.spawn_cap
    }
}
