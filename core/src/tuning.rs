//! Session-wide simulation constants supplied once before the first tick.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rule used by turrets to pick one enemy among those in range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetPolicy {
    /// Selects the last in-range enemy encountered in iteration order.
    #[default]
    LastInRange,
    /// Selects the closest in-range enemy, preferring the smaller identifier on ties.
    Nearest,
}

/// Disposition applied to an enemy once it walks past the final waypoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalPolicy {
    /// The enemy freezes on the exit waypoint and remains a valid target.
    Hold,
    /// The enemy leaves the field and the defender loses a life.
    #[default]
    Escape,
}

/// Tunable constants that stay fixed for the whole session.
///
/// Distances are measured in world units, speeds in world units per second and
/// durations in seconds. The defaults reproduce an 800 unit square field split
/// into 20 tiles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Side length of a single tile.
    pub tile_length: f32,
    /// Distance an enemy covers per second.
    pub enemy_speed: f32,
    /// Radius of an enemy's hit circle.
    pub enemy_radius: f32,
    /// Distance from a waypoint centre at which an enemy counts as arrived.
    pub arrival_radius: f32,
    /// Health assigned to freshly spawned enemies.
    pub enemy_health: i32,
    /// Seconds that must accumulate between two spawns.
    pub spawn_interval: f32,
    /// Total number of enemies spawned over the session.
    pub spawn_cap: u32,
    /// Radius within which turrets acquire targets.
    pub turret_range: f32,
    /// Minimum seconds between two shots of the same turret.
    pub fire_interval: f32,
    /// Distance a bullet covers per second.
    pub bullet_speed: f32,
    /// Seconds after which an unspent bullet expires.
    pub bullet_lifetime: f32,
    /// Radius of a bullet's hit circle.
    pub bullet_radius: f32,
    /// Rule used to choose among in-range enemies.
    pub target_policy: TargetPolicy,
    /// Disposition of enemies that finish the route.
    pub terminal_policy: TerminalPolicy,
    /// Lives available to the defender before the session counts as lost.
    pub starting_lives: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tile_length: 40.0,
            enemy_speed: 250.0,
            enemy_radius: 20.0,
            arrival_radius: 20.0,
            enemy_health: 15,
            spawn_interval: 1.0,
            spawn_cap: 10,
            turret_range: 222.2,
            fire_interval: 0.75,
            bullet_speed: 500.0,
            bullet_lifetime: 1.0,
            bullet_radius: 15.0,
            target_policy: TargetPolicy::LastInRange,
            terminal_policy: TerminalPolicy::Escape,
            starting_lives: 10,
        }
    }
}

/// Reasons a tuning table may be rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TuningError {
    /// Every real-valued constant must be finite.
    #[error("`{field}` must be finite")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
    },
    /// Distances, speeds and durations cannot be negative.
    #[error("`{field}` must not be negative (received {value})")]
    Negative {
        /// Name of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// Some constants must be strictly positive.
    #[error("`{field}` must be positive")]
    NotPositive {
        /// Name of the offending field.
        field: &'static str,
    },
}

impl Tuning {
    /// Checks that every constant describes a well-defined simulation.
    pub fn validate(&self) -> Result<(), TuningError> {
        let reals = [
            ("tile_length", self.tile_length),
            ("enemy_speed", self.enemy_speed),
            ("enemy_radius", self.enemy_radius),
            ("arrival_radius", self.arrival_radius),
            ("spawn_interval", self.spawn_interval),
            ("turret_range", self.turret_range),
            ("fire_interval", self.fire_interval),
            ("bullet_speed", self.bullet_speed),
            ("bullet_lifetime", self.bullet_lifetime),
            ("bullet_radius", self.bullet_radius),
        ];

        for (field, value) in reals {
            if !value.is_finite() {
                return Err(TuningError::NonFinite { field });
            }
            if value < 0.0 {
                return Err(TuningError::Negative { field, value });
            }
        }

        if self.tile_length <= 0.0 {
            return Err(TuningError::NotPositive {
                field: "tile_length",
            });
        }

        if self.spawn_interval <= 0.0 {
            return Err(TuningError::NotPositive {
                field: "spawn_interval",
            });
        }

        if self.enemy_health <= 0 {
            return Err(TuningError::NotPositive {
                field: "enemy_health",
            });
        }

        Ok(())
    }

    /// Spawn cadence expressed as a duration.
    #[must_use]
    pub fn spawn_interval(&self) -> Duration {
        seconds(self.spawn_interval)
    }

    /// Turret cadence expressed as a duration.
    #[must_use]
    pub fn fire_interval(&self) -> Duration {
        seconds(self.fire_interval)
    }

    /// Bullet lifetime expressed as a duration.
    #[must_use]
    pub fn bullet_lifetime(&self) -> Duration {
        seconds(self.bullet_lifetime)
    }
}

/// Converts seconds to a duration, saturating at `Duration::MAX` on overflow.
fn seconds(value: f32) -> Duration {
    if value.is_nan() || value <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f32(value).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Tuning::default().validate(), Ok(()));
    }

    #[test]
    fn negative_speed_is_rejected() {
        let tuning = Tuning {
            enemy_speed: -1.0,
            ..Tuning::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(TuningError::Negative {
                field: "enemy_speed",
                value: -1.0
            })
        );
    }

    #[test]
    fn non_finite_range_is_rejected() {
        let tuning = Tuning {
            turret_range: f32::INFINITY,
            ..Tuning::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(TuningError::NonFinite {
                field: "turret_range"
            })
        );
    }

    #[test]
    fn zero_spawn_interval_and_health_are_rejected() {
        let tuning = Tuning {
            spawn_interval: 0.0,
            ..Tuning::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NotPositive {
                field: "spawn_interval"
            })
        ));

        let tuning = Tuning {
            enemy_health: 0,
            ..Tuning::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NotPositive {
                field: "enemy_health"
            })
        ));
    }

    #[test]
    fn durations_convert_from_seconds() {
        let tuning = Tuning::default();
        assert_eq!(tuning.spawn_interval(), Duration::from_secs(1));
        assert_eq!(tuning.fire_interval(), Duration::from_millis(750));
        assert_eq!(tuning.bullet_lifetime(), Duration::from_secs(1));
    }

    #[test]
    fn oversized_durations_saturate_instead_of_collapsing() {
        let tuning = Tuning {
            bullet_lifetime: 1e30,
            spawn_interval: 1e30,
            fire_interval: f32::MAX,
            ..Tuning::default()
        };

        assert_eq!(tuning.validate(), Ok(()));
        assert_eq!(tuning.bullet_lifetime(), Duration::MAX);
        assert_eq!(tuning.spawn_interval(), Duration::MAX);
        assert_eq!(tuning.fire_interval(), Duration::MAX);
    }

    #[test]
    fn negative_seconds_clamp_to_zero_duration() {
        assert_eq!(seconds(-3.0), Duration::ZERO);
        assert_eq!(seconds(f32::NAN), Duration::ZERO);
    }
}
