#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Turret Defence adapters.
//!
//! Adapters never touch the world directly. They receive a [`Scene`] built
//! from world queries and draw it verbatim; the scene is refreshed from the
//! world after every simulated frame.

use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::Vec2;
use turret_defence_core::{CellCoord, TileGrid, TileKind};
use turret_defence_world::{query, World};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Colors assigned to every drawable element of a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Fill of empty tiles.
    pub empty_tile: Color,
    /// Fill of path, waypoint and turret slot tiles.
    pub terrain_tile: Color,
    /// Fill of enemies.
    pub enemy: Color,
    /// Fill of bullets.
    pub bullet: Color,
    /// Fill of turrets.
    pub turret: Color,
    /// Fill of the tile under the cursor.
    pub hovered_tile: Color,
    /// Color of the bullet counter.
    pub text: Color,
    /// Solid color used to clear each frame.
    pub background: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            empty_tile: Color::from_rgb_u8(0, 228, 48),
            terrain_tile: Color::from_rgb_u8(211, 176, 131),
            enemy: Color::from_rgb_u8(255, 109, 194),
            bullet: Color::from_rgb_u8(0, 121, 241),
            turret: Color::from_rgb_u8(112, 31, 126),
            hovered_tile: Color::from_rgb_u8(200, 122, 255),
            text: Color::from_rgb_u8(0, 121, 241),
            background: Color::from_rgb_u8(0, 0, 0),
        }
    }
}

impl Palette {
    /// Fill used for a tile of the provided kind.
    #[must_use]
    pub fn tile(&self, kind: TileKind) -> Color {
        match kind {
            TileKind::Empty => self.empty_tile,
            TileKind::Path | TileKind::Waypoint | TileKind::TurretSlot => self.terrain_tile,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position expressed in world units, if the cursor is over the window.
    pub cursor_world_space: Option<Vec2>,
}

/// Single colored tile of the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Cell covered by the tile.
    pub cell: CellCoord,
    /// Fill color of the tile.
    pub color: Color,
}

/// Static description of the tile grid.
///
/// Geometry queries delegate to the simulation's [`TileGrid`] so that the
/// drawn tiles and the hovered cell always agree with the world.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGridPresentation {
    grid: TileGrid,
    /// Tiles in row-major order.
    pub tiles: Vec<TilePresentation>,
}

impl TileGridPresentation {
    /// Colors every tile of the grid using the palette.
    #[must_use]
    pub fn from_grid(grid: &TileGrid, palette: &Palette) -> Self {
        Self {
            tiles: grid
                .cells()
                .map(|(cell, kind)| TilePresentation {
                    cell,
                    color: palette.tile(kind),
                })
                .collect(),
            grid: grid.clone(),
        }
    }

    /// Side length of a single tile in world units.
    #[must_use]
    pub fn tile_length(&self) -> f32 {
        self.grid.tile_length()
    }

    /// Total side length of the grid in world units.
    #[must_use]
    pub fn extent(&self) -> f32 {
        self.grid.extent()
    }

    /// World-space upper-left corner of the provided cell.
    #[must_use]
    pub fn tile_corner(&self, cell: CellCoord) -> Vec2 {
        self.grid.tile_corner(cell)
    }

    /// Resolves the cell under a world-space point, if the point lies on the grid.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<CellCoord> {
        self.grid.cell_at(point)
    }
}

/// Filled circle drawn for an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CirclePresentation {
    /// World-space centre.
    pub position: Vec2,
    /// Radius in world units.
    pub radius: f32,
    /// Fill color.
    pub color: Color,
}

/// Scene description combining the tile grid and every entity on the field.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Tile grid that composes the play area.
    pub tile_grid: TileGridPresentation,
    /// Enemies on the field.
    pub enemies: Vec<CirclePresentation>,
    /// Turrets on their slots.
    pub turrets: Vec<CirclePresentation>,
    /// Bullets in flight.
    pub bullets: Vec<CirclePresentation>,
    /// Tile currently under the cursor.
    pub hovered_cell: Option<CellCoord>,
    /// Number of bullets in flight.
    pub bullet_count: usize,
    /// Colors used by the scene.
    pub palette: Palette,
}

impl Scene {
    /// Captures the current state of the world.
    #[must_use]
    pub fn from_world(world: &World, palette: Palette) -> Self {
        let mut scene = Self {
            tile_grid: TileGridPresentation::from_grid(query::tile_grid(world), &palette),
            enemies: Vec::new(),
            turrets: Vec::new(),
            bullets: Vec::new(),
            hovered_cell: None,
            bullet_count: 0,
            palette,
        };
        scene.refresh(world);
        scene
    }

    /// Replaces the entity layers with the current world state.
    ///
    /// The tile grid and hovered cell are left untouched.
    pub fn refresh(&mut self, world: &World) {
        let tuning = query::tuning(world);
        let palette = self.palette;

        self.enemies = query::enemy_view(world)
            .iter()
            .map(|enemy| CirclePresentation {
                position: enemy.position,
                radius: tuning.enemy_radius,
                color: palette.enemy,
            })
            .collect();

        // Turrets share the bullet radius.
        self.turrets = query::turret_view(world)
            .iter()
            .map(|turret| CirclePresentation {
                position: turret.position,
                radius: tuning.bullet_radius,
                color: palette.turret,
            })
            .collect();

        self.bullets = query::bullet_view(world)
            .iter()
            .map(|bullet| CirclePresentation {
                position: bullet.position,
                radius: tuning.bullet_radius,
                color: palette.bullet,
            })
            .collect();

        self.bullet_count = self.bullets.len();
    }

    /// Records the tile under the cursor.
    pub fn set_cursor(&mut self, cursor_world_space: Option<Vec2>) {
        self.hovered_cell = cursor_world_space.and_then(|point| self.tile_grid.cell_at(point));
    }

    /// Text of the bullet counter overlay.
    #[must_use]
    pub fn bullet_counter_text(&self) -> String {
        format!("Total bullets: {}", self.bullet_count)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Turret Defence scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and may mutate the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

#[cfg(test)]
mod tests {
    use super::*;
    use turret_defence_core::Command;
    use turret_defence_world::{apply, WorldConfig};

    fn reference_world() -> World {
        World::new(&WorldConfig::default()).expect("reference world")
    }

    #[test]
    fn tiles_use_green_for_empty_and_beige_for_terrain() {
        let world = reference_world();
        let palette = Palette::default();
        let scene = Scene::from_world(&world, palette);

        assert_eq!(scene.tile_grid.tiles.len(), 400);
        let entry = scene
            .tile_grid
            .tiles
            .iter()
            .find(|tile| tile.cell == CellCoord::new(0, 12))
            .expect("entry tile");
        assert_eq!(entry.color, palette.terrain_tile);
        assert_eq!(scene.tile_grid.tiles[0].color, palette.empty_tile);
    }

    #[test]
    fn turrets_are_drawn_with_bullet_radius() {
        let scene = Scene::from_world(&reference_world(), Palette::default());

        assert_eq!(scene.turrets.len(), 5);
        assert!(scene.turrets.iter().all(|turret| turret.radius == 15.0));
        assert!(scene.enemies.is_empty());
        assert_eq!(scene.bullet_counter_text(), "Total bullets: 0");
    }

    #[test]
    fn refresh_tracks_spawned_enemies() {
        let mut world = reference_world();
        let mut scene = Scene::from_world(&world, Palette::default());
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
            &mut events,
        );
        scene.refresh(&world);

        assert_eq!(scene.enemies.len(), 1);
        assert_eq!(scene.enemies[0].radius, 20.0);
    }

    #[test]
    fn cursor_outside_grid_clears_hover() {
        let mut scene = Scene::from_world(&reference_world(), Palette::default());

        scene.set_cursor(Some(Vec2::new(45.0, 85.0)));
        assert_eq!(scene.hovered_cell, Some(CellCoord::new(2, 1)));

        scene.set_cursor(Some(Vec2::new(801.0, 10.0)));
        assert_eq!(scene.hovered_cell, None);

        scene.set_cursor(None);
        assert_eq!(scene.hovered_cell, None);
    }

    #[test]
    fn presented_geometry_matches_world_grid() {
        let world = reference_world();
        let scene = Scene::from_world(&world, Palette::default());
        let grid = query::tile_grid(&world);

        assert_eq!(scene.tile_grid.extent(), grid.extent());
        assert_eq!(scene.tile_grid.tile_length(), grid.tile_length());
        for tile in &scene.tile_grid.tiles {
            let corner = scene.tile_grid.tile_corner(tile.cell);
            assert_eq!(corner, grid.tile_corner(tile.cell));
            assert_eq!(scene.tile_grid.cell_at(grid.tile_center(tile.cell)), Some(tile.cell));
        }
        assert_eq!(scene.tile_grid.cell_at(Vec2::new(-0.5, 10.0)), None);
    }
}
