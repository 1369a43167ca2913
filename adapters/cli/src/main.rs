#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Turret Defence experience.

mod config;
mod headless;

use std::{path::PathBuf, time::Duration};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use turret_defence_core::Command;
use turret_defence_rendering::{Palette, Presentation, RenderingBackend, Scene};
use turret_defence_rendering_macroquad::MacroquadBackend;
use turret_defence_world::{self as world, query, World};

const WINDOW_TITLE: &str = "Turret Defence";

#[derive(Parser, Debug)]
#[command(name = "turret-defence")]
#[command(about = "Turrets defend a painted route against waves of walking enemies")]
struct Args {
    /// TOML file with optional [tuning] and [layout] tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulate without opening a window
    #[arg(long)]
    headless: bool,

    /// Number of ticks simulated in headless mode
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,

    /// Fixed tick length in seconds used in headless mode
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Synchronise presentation with the display refresh rate
    #[arg(long)]
    vsync: bool,
}

/// Entry point for the Turret Defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = config::load(args.config.as_deref())?;
    let world = World::new(&config).context("failed to build the world")?;
    tracing::info!("{}", query::welcome_banner(&world));

    if args.headless {
        run_headless(world, args.ticks, args.dt)
    } else {
        run_windowed(world, args.vsync)
    }
}

fn run_headless(mut world: World, ticks: u64, dt_seconds: f32) -> Result<()> {
    ensure!(
        dt_seconds.is_finite() && dt_seconds > 0.0,
        "--dt must be a positive number of seconds (received {dt_seconds})"
    );
    let dt = Duration::try_from_secs_f32(dt_seconds).context("--dt is out of range")?;

    let summary = headless::run(&mut world, ticks, dt);
    tracing::info!(
        "simulated {} ticks: {} spawned, {} shots, {} destroyed, {} escaped, {} lives left",
        summary.ticks,
        summary.spawned,
        summary.shots,
        summary.destroyed,
        summary.escaped,
        summary.lives
    );
    if summary.finished {
        tracing::info!("every enemy has been resolved");
    } else {
        tracing::info!("session still in progress");
    }

    Ok(())
}

fn run_windowed(mut world: World, vsync: bool) -> Result<()> {
    let palette = Palette::default();
    let scene = Scene::from_world(&world, palette);
    let presentation = Presentation::new(WINDOW_TITLE, palette.background, scene);
    let mut events = Vec::new();

    MacroquadBackend::new()
        .with_vsync(vsync)
        .run(presentation, move |dt, input, scene| {
            events.clear();
            world::apply(&mut world, Command::Tick { dt }, &mut events);
            scene.refresh(&world);
            scene.set_cursor(input.cursor_world_space);
        })
}
