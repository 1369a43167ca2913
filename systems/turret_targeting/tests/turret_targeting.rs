use std::time::Duration;

use turret_defence_core::{
    Enemy, EnemyId, EntityFrame, Health, TargetPolicy, Turret, TurretId, Tuning,
};
use turret_defence_system_turret_targeting::TurretTargeting;
use turret_defence_world::{query, World, WorldConfig};

fn reference_frame() -> EntityFrame {
    let world = World::new(&WorldConfig::default()).expect("reference world");
    let grid = query::tile_grid(&world);
    let route = query::route(&world);
    let tuning = Tuning::default();

    let turrets = query::turret_view(&world)
        .iter()
        .map(|snapshot| Turret::at_slot(snapshot.id, snapshot.cell, grid, &tuning))
        .collect();
    let mut frame = EntityFrame::with_turrets(turrets);

    for (index, cell) in grid.cells().enumerate() {
        if index % 3 != 0 {
            continue;
        }
        let id = EnemyId::new(u32::try_from(index).expect("index fits"));
        let mut enemy = Enemy::at_entry(id, route, Health::new(1));
        enemy.position = grid.tile_center(cell.0);
        frame.enemies.push(enemy);
    }

    frame
}

#[test]
fn selected_targets_are_strictly_within_range() {
    let frame = reference_frame();

    for policy in [TargetPolicy::LastInRange, TargetPolicy::Nearest] {
        let mut targets = Vec::new();
        TurretTargeting::new(policy).handle(&frame, &mut targets);

        assert!(!targets.is_empty(), "no turret acquired a target");
        for target in &targets {
            let turret = frame
                .turrets
                .iter()
                .find(|turret| turret.id == target.turret)
                .expect("turret exists");
            assert!(turret.position.distance(target.enemy_position) < turret.range);
        }
    }
}

#[test]
fn nearest_policy_never_picks_a_farther_enemy() {
    let frame = reference_frame();
    let mut targets = Vec::new();
    TurretTargeting::new(TargetPolicy::Nearest).handle(&frame, &mut targets);

    for target in &targets {
        let turret = frame
            .turrets
            .iter()
            .find(|turret| turret.id == target.turret)
            .expect("turret exists");
        let chosen = turret.position.distance_squared(target.enemy_position);
        assert!(frame
            .enemies
            .iter()
            .all(|enemy| turret.position.distance_squared(enemy.position) >= chosen));
    }
}

#[test]
fn every_turret_targets_an_enemy_on_its_own_slot() {
    let world = World::new(&WorldConfig::default()).expect("reference world");
    let route = query::route(&world);
    let turrets: Vec<Turret> = query::turret_view(&world)
        .iter()
        .map(|snapshot| Turret {
            id: snapshot.id,
            cell: snapshot.cell,
            position: snapshot.position,
            range: snapshot.range,
            cooldown: Duration::ZERO,
            fire_interval: Duration::from_secs(1),
        })
        .collect();
    let mut frame = EntityFrame::with_turrets(turrets.clone());

    for (turret, id) in turrets.iter().zip(100_u32..) {
        let mut enemy = Enemy::at_entry(EnemyId::new(id), route, Health::new(1));
        enemy.position = turret.position;
        frame.enemies.push(enemy);
    }

    let mut targets = Vec::new();
    TurretTargeting::new(TargetPolicy::Nearest).handle(&frame, &mut targets);

    let pairs: Vec<(TurretId, EnemyId)> = targets
        .iter()
        .map(|target| (target.turret, target.enemy))
        .collect();
    let expected: Vec<(TurretId, EnemyId)> = turrets
        .iter()
        .zip(100_u32..)
        .map(|(turret, id)| (turret.id, EnemyId::new(id)))
        .collect();
    assert_eq!(pairs, expected);
}
