#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement stage that walks enemies along the waypoint route.
//!
//! Every enemy is either traveling between two waypoints or terminal. A
//! traveling enemy moves along the straight line joining the centre of its
//! current waypoint to the centre of its next one. Once it comes within the
//! arrival radius of the next centre, or would step past it, both indices
//! advance and the enemy snaps onto the waypoint it reached. It becomes
//! terminal when the next index runs past the end of the route.

use std::time::Duration;

use turret_defence_core::{Enemy, EntityFrame, Event, Route, TerminalPolicy, Tuning};

/// Configuration parameters required to construct the movement stage.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    speed: f32,
    arrival_radius: f32,
    terminal_policy: TerminalPolicy,
}

impl Config {
    /// Creates a new configuration from the walking speed, arrival radius and exit rule.
    #[must_use]
    pub const fn new(speed: f32, arrival_radius: f32, terminal_policy: TerminalPolicy) -> Self {
        Self {
            speed,
            arrival_radius,
            terminal_policy,
        }
    }
}

impl From<&Tuning> for Config {
    fn from(tuning: &Tuning) -> Self {
        Self::new(
            tuning.enemy_speed,
            tuning.arrival_radius,
            tuning.terminal_policy,
        )
    }
}

/// Pure stage advancing every traveling enemy by one tick.
#[derive(Debug)]
pub struct Movement {
    config: Config,
}

impl Movement {
    /// Creates a new movement stage using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Moves enemies towards their next waypoint and resolves arrivals.
    ///
    /// Health is never modified here.
    pub fn handle(
        &self,
        mut frame: EntityFrame,
        dt: Duration,
        route: &Route,
        out: &mut Vec<Event>,
    ) -> EntityFrame {
        let step = self.config.speed * dt.as_secs_f32();
        let mut escaped = false;

        for enemy in frame.enemies.iter_mut().filter(|enemy| !enemy.terminal) {
            if !advance(enemy, route, step, self.config.arrival_radius) {
                continue;
            }

            out.push(Event::WaypointReached {
                enemy: enemy.id,
                index: enemy.current,
            });

            if enemy.terminal {
                match self.config.terminal_policy {
                    TerminalPolicy::Hold => out.push(Event::EnemyHalted { enemy: enemy.id }),
                    TerminalPolicy::Escape => {
                        out.push(Event::EnemyEscaped { enemy: enemy.id });
                        escaped = true;
                    }
                }
            }
        }

        if escaped {
            frame.enemies.retain(|enemy| !enemy.terminal);
        }

        frame
    }
}

/// Moves a traveling enemy and reports whether it reached its next waypoint.
fn advance(enemy: &mut Enemy, route: &Route, step: f32, arrival_radius: f32) -> bool {
    debug_assert!(
        enemy.next < route.len(),
        "traveling enemy {} points past the route",
        enemy.id.get()
    );

    let (Some(from), Some(to)) = (route.center(enemy.current), route.center(enemy.next)) else {
        enemy.terminal = true;
        return false;
    };

    let direction = (to - from).normalize_or_zero();
    let remaining = enemy.position.distance(to);
    enemy.position += direction * step;

    let arrived = enemy.position.distance(to) <= arrival_radius || step >= remaining;
    if !arrived {
        return false;
    }

    enemy.current += 1;
    enemy.next += 1;
    enemy.position = to;
    enemy.terminal = enemy.next >= route.len();
    true
}
