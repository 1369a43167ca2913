#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects one in-range enemy per turret.

use turret_defence_core::{Enemy, EntityFrame, TargetPolicy, Turret, TurretTarget};

/// Turret targeting system applying a fixed selection policy.
#[derive(Debug, Default)]
pub struct TurretTargeting {
    policy: TargetPolicy,
}

impl TurretTargeting {
    /// Creates a new targeting system using the provided policy.
    #[must_use]
    pub fn new(policy: TargetPolicy) -> Self {
        Self { policy }
    }

    /// Computes turret targets for the provided frame.
    ///
    /// The output buffer is cleared before populating it. Entries follow the
    /// frame's turret order; turrets without an enemy strictly inside their
    /// range produce no entry.
    pub fn handle(&self, frame: &EntityFrame, out: &mut Vec<TurretTarget>) {
        out.clear();

        if frame.turrets.is_empty() || frame.enemies.is_empty() {
            return;
        }

        for turret in &frame.turrets {
            let selected = match self.policy {
                TargetPolicy::LastInRange => last_in_range(turret, &frame.enemies),
                TargetPolicy::Nearest => nearest_in_range(turret, &frame.enemies),
            };

            if let Some(enemy) = selected {
                out.push(TurretTarget {
                    turret: turret.id,
                    enemy: enemy.id,
                    enemy_position: enemy.position,
                });
            }
        }
    }
}

fn in_range(turret: &Turret, enemy: &Enemy) -> bool {
    turret.position.distance(enemy.position) < turret.range
}

fn last_in_range<'a>(turret: &Turret, enemies: &'a [Enemy]) -> Option<&'a Enemy> {
    enemies.iter().rev().find(|enemy| in_range(turret, enemy))
}

fn nearest_in_range<'a>(turret: &Turret, enemies: &'a [Enemy]) -> Option<&'a Enemy> {
    let mut best: Option<(f32, &Enemy)> = None;

    for enemy in enemies.iter().filter(|enemy| in_range(turret, enemy)) {
        let distance_sq = turret.position.distance_squared(enemy.position);
        let replace = match best {
            Some((best_distance, best_enemy)) => {
                distance_sq < best_distance
                    || (distance_sq == best_distance && enemy.id < best_enemy.id)
            }
            None => true,
        };

        if replace {
            best = Some((distance_sq, enemy));
        }
    }

    best.map(|(_, enemy)| enemy)
}
