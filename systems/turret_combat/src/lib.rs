#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Firing stage that advances turret cooldowns and launches bullets at targets.

use std::time::Duration;

use glam::Vec2;
use turret_defence_core::{Bullet, EnemyId, EntityFrame, Event, TurretId, TurretTarget};

/// Turret combat stage that reuses a scratch buffer for the shots of a tick.
#[derive(Debug, Default)]
pub struct TurretCombat {
    scratch: Vec<Shot>,
}

impl TurretCombat {
    /// Creates a new combat stage with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances every cooldown and fires the turrets that are both ready and targeting.
    ///
    /// A firing turret resets its cooldown to zero and launches one bullet
    /// from its own position towards the target's position at this instant.
    /// Bullets never home.
    pub fn handle(
        &mut self,
        mut frame: EntityFrame,
        dt: Duration,
        targets: &[TurretTarget],
        out: &mut Vec<Event>,
    ) -> EntityFrame {
        self.scratch.clear();

        for turret in &mut frame.turrets {
            turret.cooldown = turret.cooldown.saturating_add(dt);

            let Some(target) = find_target(targets, turret.id) else {
                continue;
            };

            if turret.cooldown < turret.fire_interval {
                continue;
            }

            turret.cooldown = Duration::ZERO;
            self.scratch.push(Shot {
                turret: turret.id,
                target: target.enemy,
                origin: turret.position,
                direction: (target.enemy_position - turret.position).normalize_or_zero(),
            });
        }

        if self.scratch.is_empty() {
            return frame;
        }

        frame.bullets.reserve(self.scratch.len());
        for shot in self.scratch.drain(..) {
            let bullet = frame.allocate_bullet_id();
            frame
                .bullets
                .push(Bullet::fired(bullet, shot.origin, shot.direction));
            out.push(Event::TurretFired {
                turret: shot.turret,
                bullet,
                target: shot.target,
            });
        }

        frame
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Shot {
    turret: TurretId,
    target: EnemyId,
    origin: Vec2,
    direction: Vec2,
}

fn find_target(targets: &[TurretTarget], turret: TurretId) -> Option<&TurretTarget> {
    targets.iter().find(|target| target.turret == turret)
}
