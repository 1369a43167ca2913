#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Turret Defence.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.

use std::time::Duration;

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{is_key_pressed, mouse_position, KeyCode};
use turret_defence_rendering::{
    CirclePresentation, Color, FrameInput, Presentation, RenderingBackend, Scene,
    TileGridPresentation,
};

const WINDOW_SIDE: i32 = 800;
const COUNTER_FONT_SIZE: f32 = 20.0;
const COUNTER_MARGIN: f32 = 10.0;

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: WINDOW_SIDE,
            window_height: WINDOW_SIDE,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = self.swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);

            loop {
                if is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q) {
                    break;
                }

                macroquad::window::clear_background(background);

                let metrics = SceneMetrics::from_scene(
                    &scene,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let (cursor_x, cursor_y) = mouse_position();
                let frame_input = FrameInput {
                    cursor_world_space: metrics.screen_to_world(Vec2::new(cursor_x, cursor_y)),
                };

                update_scene(frame_dt, frame_input, &mut scene);

                draw_tiles(&scene.tile_grid, &metrics);
                draw_circles(&scene.bullets, &metrics);
                draw_circles(&scene.enemies, &metrics);
                draw_circles(&scene.turrets, &metrics);
                draw_bullet_counter(&scene, &metrics);
                draw_hovered_tile(&scene, &metrics);

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Uniform scale and offset that fit the square grid inside the window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset: Vec2,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let extent = scene.tile_grid.extent();
        let scale = (screen_width / extent).min(screen_height / extent);
        let scaled = extent * scale;
        let offset = Vec2::new(
            ((screen_width - scaled) * 0.5).max(0.0),
            ((screen_height - scaled) * 0.5).max(0.0),
        );

        Self { scale, offset }
    }

    fn world_to_screen(&self, point: Vec2) -> Vec2 {
        self.offset + point * self.scale
    }

    fn screen_to_world(&self, point: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }

        Some((point - self.offset) / self.scale)
    }
}

fn draw_tiles(tile_grid: &TileGridPresentation, metrics: &SceneMetrics) {
    let side = tile_grid.tile_length() * metrics.scale;

    for tile in &tile_grid.tiles {
        let corner = metrics.world_to_screen(tile_grid.tile_corner(tile.cell));
        macroquad::shapes::draw_rectangle(
            corner.x,
            corner.y,
            side,
            side,
            to_macroquad_color(tile.color),
        );
    }
}

fn draw_circles(circles: &[CirclePresentation], metrics: &SceneMetrics) {
    for circle in circles {
        let centre = metrics.world_to_screen(circle.position);
        macroquad::shapes::draw_circle(
            centre.x,
            centre.y,
            circle.radius * metrics.scale,
            to_macroquad_color(circle.color),
        );
    }
}

fn draw_bullet_counter(scene: &Scene, metrics: &SceneMetrics) {
    let origin = metrics.world_to_screen(Vec2::splat(COUNTER_MARGIN));
    let _ = macroquad::text::draw_text(
        &scene.bullet_counter_text(),
        origin.x,
        origin.y + COUNTER_FONT_SIZE * metrics.scale,
        COUNTER_FONT_SIZE * metrics.scale,
        to_macroquad_color(scene.palette.text),
    );
}

fn draw_hovered_tile(scene: &Scene, metrics: &SceneMetrics) {
    let Some(cell) = scene.hovered_cell else {
        return;
    };

    let side = scene.tile_grid.tile_length() * metrics.scale;
    let corner = metrics.world_to_screen(scene.tile_grid.tile_corner(cell));
    macroquad::shapes::draw_rectangle(
        corner.x,
        corner.y,
        side,
        side,
        to_macroquad_color(scene.palette.hovered_tile),
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use turret_defence_core::{TileGrid, TileKind};
    use turret_defence_rendering::Palette;

    fn scene(size: u32, tile_length: f32) -> Scene {
        let side = size as usize;
        let grid = TileGrid::new(size, tile_length, vec![TileKind::Empty; side * side])
            .expect("grid");
        let palette = Palette::default();
        Scene {
            tile_grid: TileGridPresentation::from_grid(&grid, &palette),
            enemies: Vec::new(),
            turrets: Vec::new(),
            bullets: Vec::new(),
            hovered_cell: None,
            bullet_count: 0,
            palette,
        }
    }

    #[test]
    fn metrics_are_identity_for_matching_window() {
        let metrics = SceneMetrics::from_scene(&scene(20, 40.0), 800.0, 800.0);

        assert_eq!(metrics.scale, 1.0);
        assert_eq!(metrics.offset, Vec2::ZERO);
        assert_eq!(
            metrics.world_to_screen(Vec2::new(20.0, 500.0)),
            Vec2::new(20.0, 500.0)
        );
    }

    #[test]
    fn metrics_centre_grid_in_wide_window() {
        let metrics = SceneMetrics::from_scene(&scene(20, 40.0), 1000.0, 400.0);

        assert_eq!(metrics.scale, 0.5);
        assert_eq!(metrics.offset, Vec2::new(300.0, 0.0));
    }

    #[test]
    fn screen_to_world_inverts_world_to_screen() {
        let metrics = SceneMetrics::from_scene(&scene(20, 40.0), 1000.0, 400.0);
        let world = Vec2::new(120.0, 640.0);

        assert_eq!(
            metrics.screen_to_world(metrics.world_to_screen(world)),
            Some(world)
        );
    }

    #[test]
    fn colors_convert_channel_for_channel() {
        let converted = to_macroquad_color(Color::new(0.25, 0.5, 0.75, 1.0));
        assert_eq!(
            (converted.r, converted.g, converted.b, converted.a),
            (0.25, 0.5, 0.75, 1.0)
        );
    }
}
