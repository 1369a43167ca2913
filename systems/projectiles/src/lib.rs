#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectile stage that moves bullets, resolves hits and discards spent bullets.

use std::time::Duration;

use glam::Vec2;
use turret_defence_core::{Bullet, Enemy, EntityFrame, Event, Tuning};

/// Configuration parameters required to construct the projectile stage.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    speed: f32,
    lifetime: Duration,
    bullet_radius: f32,
    enemy_radius: f32,
}

impl Config {
    /// Creates a new configuration from bullet kinematics and both hit radii.
    #[must_use]
    pub const fn new(speed: f32, lifetime: Duration, bullet_radius: f32, enemy_radius: f32) -> Self {
        Self {
            speed,
            lifetime,
            bullet_radius,
            enemy_radius,
        }
    }
}

impl From<&Tuning> for Config {
    fn from(tuning: &Tuning) -> Self {
        Self::new(
            tuning.bullet_speed,
            tuning.bullet_lifetime(),
            tuning.bullet_radius,
            tuning.enemy_radius,
        )
    }
}

/// Pure stage resolving bullet flight, collisions and expiry for one tick.
#[derive(Debug)]
pub struct Projectiles {
    config: Config,
}

impl Projectiles {
    /// Creates a new projectile stage using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Advances every bullet, applies at most one hit per bullet and drops disabled bullets.
    ///
    /// Enemies are scanned in frame order and the first overlapping enemy
    /// takes one point of damage. An enemy whose health is depleted leaves
    /// the frame immediately and consumes the bullet. A bullet that expires
    /// this tick still resolves its hit before it is discarded.
    pub fn handle(&self, mut frame: EntityFrame, dt: Duration, out: &mut Vec<Event>) -> EntityFrame {
        let step = self.config.speed * dt.as_secs_f32();
        let enemies = &mut frame.enemies;

        for bullet in &mut frame.bullets {
            bullet.position += bullet.direction * step;
            bullet.elapsed = bullet.elapsed.saturating_add(dt);
            let expired = bullet.elapsed >= self.config.lifetime;

            self.resolve_hit(bullet, enemies, out);

            if expired && bullet.enabled {
                out.push(Event::BulletExpired { bullet: bullet.id });
            }
            bullet.enabled = bullet.enabled && !expired;
        }

        frame.bullets.retain(|bullet| bullet.enabled);
        frame
    }

    fn resolve_hit(&self, bullet: &mut Bullet, enemies: &mut Vec<Enemy>, out: &mut Vec<Event>) {
        let Some(index) = enemies.iter().position(|enemy| {
            circles_overlap(
                enemy.position,
                self.config.enemy_radius,
                bullet.position,
                self.config.bullet_radius,
            )
        }) else {
            return;
        };

        let enemy = &mut enemies[index];
        enemy.health = enemy.health.after_hit();

        if enemy.health.is_depleted() {
            let enemy = enemies.remove(index);
            bullet.enabled = false;
            out.push(Event::EnemyDestroyed {
                enemy: enemy.id,
                bullet: bullet.id,
            });
        } else {
            out.push(Event::EnemyDamaged {
                enemy: enemy.id,
                bullet: bullet.id,
                remaining: enemy.health,
            });
        }
    }
}

fn circles_overlap(first: Vec2, first_radius: f32, second: Vec2, second_radius: f32) -> bool {
    let reach = first_radius + second_radius;
    first.distance_squared(second) <= reach * reach
}
