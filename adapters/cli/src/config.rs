//! Loading of the optional TOML session file.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use turret_defence_world::WorldConfig;

/// Reads the session configuration, falling back to the reference session when no path is given.
pub(crate) fn load(path: Option<&Path>) -> Result<WorldConfig> {
    let Some(path) = path else {
        return Ok(WorldConfig::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration from {}", path.display()))?;
    parse(&text).with_context(|| format!("invalid configuration in {}", path.display()))
}

/// Parses a session configuration from TOML text.
pub(crate) fn parse(text: &str) -> Result<WorldConfig> {
    toml::from_str(text).context("failed to parse TOML")
}

#[cfg(test)]
mod tests {
    use super::*;
    use turret_defence_core::{CellCoord, TerminalPolicy};

    #[test]
    fn missing_path_yields_reference_session() {
        let config = load(None).expect("default configuration");
        assert_eq!(config, WorldConfig::default());
    }

    #[test]
    fn partial_tuning_keeps_remaining_defaults() {
        let config = parse(
            r#"
            [tuning]
            spawn_cap = 3
            terminal_policy = "hold"
            "#,
        )
        .expect("configuration");

        assert_eq!(config.tuning.spawn_cap, 3);
        assert_eq!(config.tuning.terminal_policy, TerminalPolicy::Hold);
        assert_eq!(config.tuning.enemy_speed, 250.0);
        assert_eq!(config.layout.start, CellCoord::new(0, 12));
    }

    #[test]
    fn unknown_policy_is_reported() {
        let error = parse(
            r#"
            [tuning]
            target_policy = "strongest"
            "#,
        )
        .expect_err("unknown policy must be rejected");

        assert!(format!("{error:#}").contains("failed to parse TOML"));
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let error = load(Some(Path::new("/definitely/not/here.toml")))
            .expect_err("missing file must be rejected");

        assert!(format!("{error}").contains("/definitely/not/here.toml"));
    }
}
