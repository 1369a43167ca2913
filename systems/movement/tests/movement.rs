use std::time::Duration;

use glam::Vec2;
use turret_defence_core::{
    CellCoord, Enemy, EnemyId, EntityFrame, Event, Health, Route, TerminalPolicy, TileGrid,
    TileKind, Tuning,
};
use turret_defence_system_movement::{Config, Movement};
use turret_defence_world::{query, World, WorldConfig};

fn three_cell_route() -> Route {
    let mut tiles = vec![TileKind::Empty; 9];
    tiles[0] = TileKind::Waypoint;
    tiles[1] = TileKind::Waypoint;
    tiles[2] = TileKind::Waypoint;
    let grid = TileGrid::new(3, 1.0, tiles).expect("grid");
    Route::new(
        vec![
            CellCoord::new(0, 0),
            CellCoord::new(0, 1),
            CellCoord::new(0, 2),
        ],
        &grid,
    )
    .expect("route")
}

fn frame_with_enemy(route: &Route, health: i32) -> EntityFrame {
    let mut frame = EntityFrame::default();
    frame
        .enemies
        .push(Enemy::at_entry(EnemyId::new(0), route, Health::new(health)));
    frame
}

#[test]
fn three_cell_route_completes_in_about_two_seconds() {
    let route = three_cell_route();
    let movement = Movement::new(Config::new(1.0, 0.1, TerminalPolicy::Hold));
    let dt = Duration::from_millis(125);
    let mut frame = frame_with_enemy(&route, 1);
    let mut elapsed = Duration::ZERO;
    let mut reached = Vec::new();

    while !frame.enemies[0].terminal {
        assert!(elapsed < Duration::from_secs(3), "enemy never finished");
        let mut events = Vec::new();
        frame = movement.handle(frame, dt, &route, &mut events);
        elapsed += dt;
        reached.extend(events.into_iter().filter_map(|event| match event {
            Event::WaypointReached { index, .. } => Some(index),
            _ => None,
        }));
    }

    let seconds = elapsed.as_secs_f32();
    assert!((1.7..=2.05).contains(&seconds), "finished after {seconds}s");
    assert_eq!(reached, vec![1, 2]);
    assert_eq!(frame.enemies[0].position, Vec2::new(2.5, 0.5));
}

#[test]
fn held_enemy_stays_frozen_on_exit() {
    let route = three_cell_route();
    let movement = Movement::new(Config::new(10.0, 0.1, TerminalPolicy::Hold));
    let dt = Duration::from_millis(250);
    let mut frame = frame_with_enemy(&route, 1);
    let mut events = Vec::new();

    for _ in 0..8 {
        frame = movement.handle(frame, dt, &route, &mut events);
    }

    let halted = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyHalted { .. }))
        .count();
    assert_eq!(halted, 1);
    assert_eq!(frame.enemies.len(), 1);
    assert_eq!(frame.enemies[0].position, Vec2::new(2.5, 0.5));
}

#[test]
fn escaping_enemy_leaves_the_frame() {
    let route = three_cell_route();
    let movement = Movement::new(Config::new(10.0, 0.1, TerminalPolicy::Escape));
    let mut events = Vec::new();
    let mut frame = frame_with_enemy(&route, 1);

    for _ in 0..4 {
        frame = movement.handle(frame, Duration::from_millis(250), &route, &mut events);
    }

    assert!(frame.enemies.is_empty());
    assert!(events.contains(&Event::EnemyEscaped {
        enemy: EnemyId::new(0)
    }));
}

#[test]
fn reference_route_visits_every_waypoint_in_order() {
    let world = World::new(&WorldConfig::default()).expect("reference world");
    let route = query::route(&world).clone();
    let movement = Movement::new((&Tuning::default()).into());
    let dt = Duration::from_secs_f32(1.0 / 64.0);
    let mut frame = frame_with_enemy(&route, 15);
    let mut events = Vec::new();

    for _ in 0..2_000 {
        if frame.enemies.is_empty() {
            break;
        }
        let enemy = frame.enemies[0];
        frame = movement.handle(frame, dt, &route, &mut events);
        if let Some(moved) = frame.enemies.first() {
            assert_eq!(moved.health, enemy.health, "movement changed health");
        }
    }

    let reached: Vec<usize> = events
        .iter()
        .filter_map(|event| match event {
            Event::WaypointReached { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    let expected: Vec<usize> = (1..route.len()).collect();
    assert_eq!(reached, expected);
    assert_eq!(
        events.last(),
        Some(&Event::EnemyEscaped {
            enemy: EnemyId::new(0)
        })
    );
}
