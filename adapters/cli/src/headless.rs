//! Fixed-step simulation without a window.

use std::time::Duration;

use turret_defence_core::{Command, Event};
use turret_defence_world::{self as world, query, World};

/// Tallies of what happened during a headless run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub(crate) ticks: u64,
    pub(crate) spawned: u32,
    pub(crate) shots: u32,
    pub(crate) destroyed: u32,
    pub(crate) escaped: u32,
    pub(crate) lives: u32,
    pub(crate) finished: bool,
}

impl RunSummary {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TurretFired { .. } => self.shots += 1,
                Event::EnemyDestroyed { .. } => self.destroyed += 1,
                Event::EnemyEscaped { .. } => self.escaped += 1,
                _ => {}
            }
        }
    }
}

/// Advances the world by `ticks` steps of `dt` each.
pub(crate) fn run(world: &mut World, ticks: u64, dt: Duration) -> RunSummary {
    let mut summary = RunSummary::default();
    let mut events = Vec::new();

    for _ in 0..ticks {
        events.clear();
        world::apply(world, Command::Tick { dt }, &mut events);
        summary.record(&events);
    }

    summary.ticks = query::tick_index(world);
    summary.spawned = query::spawned_count(world);
    summary.lives = query::lives(world);
    summary.finished = query::is_finished(world);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use turret_defence_core::{TerminalPolicy, Tuning};
    use turret_defence_world::WorldConfig;

    #[test]
    fn reference_session_accounts_for_every_enemy() {
        let mut world = World::new(&WorldConfig::default()).expect("reference world");

        let summary = run(&mut world, 3_600, Duration::from_secs_f32(1.0 / 64.0));

        assert_eq!(summary.ticks, 3_600);
        assert_eq!(summary.spawned, 10);
        assert!(summary.shots > 0);
        assert!(summary.finished);
        assert_eq!(summary.destroyed + summary.escaped, 10);
        assert_eq!(summary.lives, 10 - summary.escaped);
    }

    #[test]
    fn zero_ticks_leave_the_world_untouched() {
        let mut world = World::new(&WorldConfig::default()).expect("reference world");

        let summary = run(&mut world, 0, Duration::from_millis(16));

        assert_eq!(
            summary,
            RunSummary {
                lives: 10,
                ..RunSummary::default()
            }
        );
    }

    #[test]
    fn held_enemies_keep_session_open() {
        let config = WorldConfig {
            tuning: Tuning {
                terminal_policy: TerminalPolicy::Hold,
                turret_range: 0.0,
                ..Tuning::default()
            },
            ..WorldConfig::default()
        };
        let mut world = World::new(&config).expect("world");

        let summary = run(&mut world, 1_280, Duration::from_secs_f32(1.0 / 64.0));

        assert_eq!(summary.escaped, 0);
        assert_eq!(summary.shots, 0);
        assert!(!summary.finished);
        assert_eq!(query::enemy_view(&world).len(), 10);
    }
}
