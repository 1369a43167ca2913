#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Turret Defence engine.
//!
//! This crate defines the data that connects adapters, the authoritative
//! world, and the pure simulation stages. Adapters submit [`Command`] values,
//! the world executes them via its `apply` entry point and broadcasts
//! [`Event`] values describing what happened. Each simulation stage consumes
//! the previous [`EntityFrame`] by value and produces the next one, so the
//! fixed phase ordering inside a tick is an explicit data dependency.

mod grid;
mod tuning;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use grid::{CellCoord, GridError, Route, RouteError, TileGrid, TileKind};
pub use tuning::{TargetPolicy, TerminalPolicy, Tuning, TuningError};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Turret Defence.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an enemy entered the field at the route entry.
    EnemySpawned {
        /// Identifier assigned to the new enemy.
        enemy: EnemyId,
        /// World-space position the enemy was placed at.
        position: Vec2,
    },
    /// Reports that an enemy arrived at a waypoint and snapped onto it.
    WaypointReached {
        /// Identifier of the enemy that arrived.
        enemy: EnemyId,
        /// Index of the waypoint the enemy now occupies.
        index: usize,
    },
    /// Reports that an enemy finished the route and froze on the exit.
    EnemyHalted {
        /// Identifier of the halted enemy.
        enemy: EnemyId,
    },
    /// Reports that an enemy finished the route and left the field.
    EnemyEscaped {
        /// Identifier of the escaped enemy.
        enemy: EnemyId,
    },
    /// Confirms that a turret fired a bullet.
    TurretFired {
        /// Turret that fired.
        turret: TurretId,
        /// Bullet created by the shot.
        bullet: BulletId,
        /// Enemy the bullet was aimed at.
        target: EnemyId,
    },
    /// Reports that a bullet hit an enemy without killing it.
    EnemyDamaged {
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Bullet responsible for the hit.
        bullet: BulletId,
        /// Health left after the hit.
        remaining: Health,
    },
    /// Reports that a bullet reduced an enemy's health to zero.
    EnemyDestroyed {
        /// Enemy removed from the field.
        enemy: EnemyId,
        /// Bullet consumed by the kill.
        bullet: BulletId,
    },
    /// Reports that a bullet outlived its maximum lifetime.
    BulletExpired {
        /// Identifier of the expired bullet.
        bullet: BulletId,
    },
    /// Announces that the defender ran out of lives.
    LivesDepleted,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a turret.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TurretId(u32);

impl TurretId {
    /// Creates a new turret identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a bullet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BulletId(u32);

impl BulletId {
    /// Creates a new bullet identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Remaining hit points of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(i32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the health value.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Returns the health left after a single hit.
    #[must_use]
    pub const fn after_hit(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// Reports whether the value dropped to zero or below.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 <= 0
    }
}

/// Live enemy walking the route.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Enemy {
    /// Identifier allocated when the enemy spawned.
    pub id: EnemyId,
    /// Continuous world-space position.
    pub position: Vec2,
    /// Remaining hit points.
    pub health: Health,
    /// Index of the waypoint the enemy last arrived at.
    pub current: usize,
    /// Index of the waypoint the enemy is walking towards.
    pub next: usize,
    /// Set once `next` advanced past the final waypoint.
    pub terminal: bool,
}

impl Enemy {
    /// Creates an enemy snapped onto the route entry.
    #[must_use]
    pub fn at_entry(id: EnemyId, route: &Route, health: Health) -> Self {
        Self {
            id,
            position: route.entry(),
            health,
            current: 0,
            next: 1,
            terminal: false,
        }
    }
}

/// Stationary turret instantiated from a turret slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Turret {
    /// Identifier allocated at startup.
    pub id: TurretId,
    /// Grid slot the turret occupies.
    pub cell: CellCoord,
    /// World-space centre of the slot.
    pub position: Vec2,
    /// Radius within which targets are acquired.
    pub range: f32,
    /// Time accumulated since the last shot.
    pub cooldown: Duration,
    /// Minimum time between two shots.
    pub fire_interval: Duration,
}

impl Turret {
    /// Creates a turret centred on the provided slot.
    #[must_use]
    pub fn at_slot(id: TurretId, cell: CellCoord, grid: &TileGrid, tuning: &Tuning) -> Self {
        Self {
            id,
            cell,
            position: grid.tile_center(cell),
            range: tuning.turret_range,
            cooldown: Duration::ZERO,
            fire_interval: tuning.fire_interval(),
        }
    }
}

/// Projectile travelling along a fixed direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bullet {
    /// Identifier allocated when the bullet was fired.
    pub id: BulletId,
    /// Continuous world-space position.
    pub position: Vec2,
    /// Unit direction fixed at the instant of firing.
    pub direction: Vec2,
    /// Time the bullet has been alive.
    pub elapsed: Duration,
    /// Cleared once the bullet expired or was consumed by a kill.
    pub enabled: bool,
}

impl Bullet {
    /// Creates a freshly fired bullet.
    #[must_use]
    pub const fn fired(id: BulletId, position: Vec2, direction: Vec2) -> Self {
        Self {
            id,
            position,
            direction,
            elapsed: Duration::ZERO,
            enabled: true,
        }
    }
}

/// Complete entity state between two pipeline stages.
///
/// The frame is moved from stage to stage; no stage holds on to it after
/// returning.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityFrame {
    /// Enemies alive on the field in spawn order.
    pub enemies: Vec<Enemy>,
    /// Turrets in slot order.
    pub turrets: Vec<Turret>,
    /// Bullets in flight in firing order.
    pub bullets: Vec<Bullet>,
    /// Time accumulated towards the next spawn.
    pub spawn_timer: Duration,
    /// Total number of enemies spawned so far.
    pub spawned: u32,
    next_enemy: u32,
    next_bullet: u32,
}

impl EntityFrame {
    /// Creates the initial frame holding only the session's turrets.
    #[must_use]
    pub fn with_turrets(turrets: Vec<Turret>) -> Self {
        Self {
            turrets,
            ..Self::default()
        }
    }

    /// Allocates the identifier for the next spawned enemy.
    pub fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next_enemy);
        self.next_enemy = self.next_enemy.wrapping_add(1);
        id
    }

    /// Allocates the identifier for the next fired bullet.
    pub fn allocate_bullet_id(&mut self) -> BulletId {
        let id = BulletId::new(self.next_bullet);
        self.next_bullet = self.next_bullet.wrapping_add(1);
        id
    }
}

/// Target chosen for a turret during the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurretTarget {
    /// Turret that acquired the target.
    pub turret: TurretId,
    /// Enemy selected as the target.
    pub enemy: EnemyId,
    /// Position of the enemy at the instant of selection.
    pub enemy_position: Vec2,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// World-space position.
    pub position: Vec2,
    /// Remaining hit points.
    pub health: Health,
    /// Index of the waypoint the enemy last arrived at.
    pub waypoint: usize,
    /// Indicates whether the enemy finished the route.
    pub terminal: bool,
}

impl From<&Enemy> for EnemySnapshot {
    fn from(enemy: &Enemy) -> Self {
        Self {
            id: enemy.id,
            position: enemy.position,
            health: enemy.health,
            waypoint: enemy.current,
            terminal: enemy.terminal,
        }
    }
}

/// Read-only snapshot describing all enemies on the field.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemy was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single turret used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurretSnapshot {
    /// Identifier allocated to the turret.
    pub id: TurretId,
    /// Grid slot occupied by the turret.
    pub cell: CellCoord,
    /// World-space centre of the turret.
    pub position: Vec2,
    /// Targeting radius.
    pub range: f32,
}

impl From<&Turret> for TurretSnapshot {
    fn from(turret: &Turret) -> Self {
        Self {
            id: turret.id,
            cell: turret.cell,
            position: turret.position,
            range: turret.range,
        }
    }
}

/// Read-only snapshot describing all turrets.
#[derive(Clone, Debug, Default)]
pub struct TurretView {
    snapshots: Vec<TurretSnapshot>,
}

impl TurretView {
    /// Creates a new turret view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TurretSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured turret snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TurretSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TurretSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single bullet used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulletSnapshot {
    /// Identifier allocated to the bullet.
    pub id: BulletId,
    /// World-space position.
    pub position: Vec2,
    /// Unit direction of travel.
    pub direction: Vec2,
}

impl From<&Bullet> for BulletSnapshot {
    fn from(bullet: &Bullet) -> Self {
        Self {
            id: bullet.id,
            position: bullet.position,
            direction: bullet.direction,
        }
    }
}

/// Read-only snapshot describing all bullets in flight.
#[derive(Clone, Debug, Default)]
pub struct BulletView {
    snapshots: Vec<BulletSnapshot>,
}

impl BulletView {
    /// Creates a new bullet view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BulletSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured bullet snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &BulletSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured bullets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no bullet was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<BulletSnapshot> {
        self.snapshots
    }
}
