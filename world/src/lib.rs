#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Turret Defence.
//!
//! The world owns the immutable terrain and route together with the mutable
//! [`EntityFrame`]. Every [`Command::Tick`] moves the frame through the fixed
//! stage order: spawning, enemy movement, turret targeting and firing, then
//! bullet flight and cleanup.

pub mod layout;
pub mod navigation;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use turret_defence_core::{
    CellCoord, Command, EntityFrame, Event, Route, RouteError, TileGrid, Turret, TurretId,
    TurretTarget, Tuning, TuningError, WELCOME_BANNER,
};
use turret_defence_system_movement::Movement;
use turret_defence_system_projectiles::Projectiles;
use turret_defence_system_spawning::Spawning;
use turret_defence_system_turret_combat::TurretCombat;
use turret_defence_system_turret_targeting::TurretTargeting;

pub use layout::{turret_slots, Layout, LayoutError};
pub use navigation::{extract_waypoints, flood_fill, NavigationError};

/// Everything required to start a session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Simulation constants.
    pub tuning: Tuning,
    /// Terrain and route entry.
    pub layout: Layout,
}

/// Reasons a world could not be assembled.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The tuning table holds an invalid constant.
    #[error("invalid tuning: {0}")]
    Tuning(#[from] TuningError),
    /// The layout could not be turned into a grid.
    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),
    /// The route search could not start.
    #[error("route extraction failed: {0}")]
    Navigation(#[from] NavigationError),
    /// The extracted route cannot be walked.
    #[error("invalid route: {0}")]
    Route(#[from] RouteError),
    /// A prebuilt grid disagrees with the tuning about the tile length.
    #[error("grid tile length {grid} does not match tuning tile length {tuning}")]
    TileLengthMismatch {
        /// Tile length the grid was built with.
        grid: f32,
        /// Tile length named by the tuning table.
        tuning: f32,
    },
}

/// Represents the authoritative Turret Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tile_grid: TileGrid,
    route: Route,
    tuning: Tuning,
    frame: EntityFrame,
    targets: Vec<TurretTarget>,
    spawning: Spawning,
    movement: Movement,
    targeting: TurretTargeting,
    combat: TurretCombat,
    projectiles: Projectiles,
    lives: u32,
    lives_depleted: bool,
    tick_index: u64,
}

impl World {
    /// Creates a world from a layout and tuning table.
    pub fn new(config: &WorldConfig) -> Result<Self, WorldError> {
        config.tuning.validate()?;
        let grid = config.layout.to_grid(config.tuning.tile_length)?;
        Self::assemble(grid, config.layout.start, config.tuning.clone())
    }

    /// Creates a world from an already constructed grid.
    ///
    /// The grid must have been built with `tuning.tile_length`.
    pub fn from_parts(grid: TileGrid, start: CellCoord, tuning: Tuning) -> Result<Self, WorldError> {
        tuning.validate()?;
        if grid.tile_length() != tuning.tile_length {
            return Err(WorldError::TileLengthMismatch {
                grid: grid.tile_length(),
                tuning: tuning.tile_length,
            });
        }
        Self::assemble(grid, start, tuning)
    }

    fn assemble(grid: TileGrid, start: CellCoord, tuning: Tuning) -> Result<Self, WorldError> {
        let waypoints = extract_waypoints(&grid, start)?;
        let route = Route::new(waypoints, &grid)?;

        let turrets: Vec<Turret> = turret_slots(&grid)
            .into_iter()
            .zip(0_u32..)
            .map(|(cell, id)| Turret::at_slot(TurretId::new(id), cell, &grid, &tuning))
            .collect();

        tracing::info!(
            "world ready: {}x{} grid, {} waypoints, {} turrets",
            grid.size(),
            grid.size(),
            route.len(),
            turrets.len()
        );

        Ok(Self {
            banner: WELCOME_BANNER,
            frame: EntityFrame::with_turrets(turrets),
            targets: Vec::new(),
            spawning: Spawning::new((&tuning).into()),
            movement: Movement::new((&tuning).into()),
            targeting: TurretTargeting::new(tuning.target_policy),
            combat: TurretCombat::new(),
            projectiles: Projectiles::new((&tuning).into()),
            lives: tuning.starting_lives,
            lives_depleted: false,
            tick_index: 0,
            tile_grid: grid,
            route,
            tuning,
        })
    }

    fn run_pipeline(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let frame = std::mem::take(&mut self.frame);
        let frame = self.spawning.handle(frame, dt, &self.route, out_events);
        let frame = self.movement.handle(frame, dt, &self.route, out_events);
        self.targeting.handle(&frame, &mut self.targets);
        let frame = self.combat.handle(frame, dt, &self.targets, out_events);
        self.frame = self.projectiles.handle(frame, dt, out_events);
    }

    fn settle_lives(&mut self, escaped: usize, out_events: &mut Vec<Event>) {
        if escaped == 0 {
            return;
        }

        let lost = u32::try_from(escaped).unwrap_or(u32::MAX);
        self.lives = self.lives.saturating_sub(lost);

        if self.lives == 0 && !self.lives_depleted {
            self.lives_depleted = true;
            tracing::info!("defender ran out of lives at tick {}", self.tick_index);
            out_events.push(Event::LivesDepleted);
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });

            let first = out_events.len();
            world.run_pipeline(dt, out_events);

            let escaped = log_tick_events(world.tick_index, &out_events[first..]);
            world.settle_lives(escaped, out_events);

            tracing::trace!(
                "tick {}: {} enemies, {} bullets",
                world.tick_index,
                world.frame.enemies.len(),
                world.frame.bullets.len()
            );
        }
    }
}

/// Logs the notable events of a tick and returns the number of escapes.
fn log_tick_events(tick: u64, events: &[Event]) -> usize {
    let mut escaped = 0;

    for event in events {
        match event {
            Event::EnemySpawned { enemy, .. } => {
                tracing::debug!("tick {}: enemy {} spawned", tick, enemy.get());
            }
            Event::EnemyDestroyed { enemy, bullet } => {
                tracing::debug!(
                    "tick {}: enemy {} destroyed by bullet {}",
                    tick,
                    enemy.get(),
                    bullet.get()
                );
            }
            Event::EnemyEscaped { enemy } => {
                escaped += 1;
                tracing::debug!("tick {}: enemy {} escaped", tick, enemy.get());
            }
            _ => {}
        }
    }

    escaped
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use turret_defence_core::{
        BulletSnapshot, BulletView, EnemySnapshot, EnemyView, Route, TileGrid, Tuning,
        TurretSnapshot, TurretView,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the world's tile grid.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        &world.tile_grid
    }

    /// Provides read-only access to the waypoint route.
    #[must_use]
    pub fn route(world: &World) -> &Route {
        &world.route
    }

    /// Provides read-only access to the session constants.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Captures a read-only view of the enemies on the field.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .frame
                .enemies
                .iter()
                .map(EnemySnapshot::from)
                .collect(),
        )
    }

    /// Captures a read-only view of the turrets.
    #[must_use]
    pub fn turret_view(world: &World) -> TurretView {
        TurretView::from_snapshots(
            world
                .frame
                .turrets
                .iter()
                .map(TurretSnapshot::from)
                .collect(),
        )
    }

    /// Captures a read-only view of the bullets in flight.
    #[must_use]
    pub fn bullet_view(world: &World) -> BulletView {
        BulletView::from_snapshots(
            world
                .frame
                .bullets
                .iter()
                .map(BulletSnapshot::from)
                .collect(),
        )
    }

    /// Lives the defender has left.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Number of enemies spawned since the session started.
    #[must_use]
    pub fn spawned_count(world: &World) -> u32 {
        world.frame.spawned
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Reports whether every enemy was spawned and nothing is left in play.
    ///
    /// Enemies held on the exit waypoint count as in play.
    #[must_use]
    pub fn is_finished(world: &World) -> bool {
        world.frame.spawned >= world.tuning.spawn_cap
            && world.frame.enemies.is_empty()
            && world.frame.bullets.is_empty()
    }
}
