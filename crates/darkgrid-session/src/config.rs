//! Game configuration: player limits, role ratios, phase timing.

use std::time::Duration;

use darkgrid_protocol::Step;
use serde::{Deserialize, Serialize};

/// Configuration for one game session, read once at creation.
///
/// Role ratios are "one per N players": with `hackers_per = 4`, a
/// ten-player game deals `10 / 4 = 2` hackers. Hackers floor at one so
/// the game always has an opposition; whitehats and analysts may be zero
/// in small games.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Minimum players required to start.
    pub min_players: usize,

    /// Maximum players allowed to join.
    pub max_players: usize,

    /// One hacker per this many players (at least one overall).
    pub hackers_per: usize,

    /// One whitehat per this many players.
    pub whitehats_per: usize,

    /// One analyst per this many players.
    pub analysts_per: usize,

    /// How long the external timer should hold the night step.
    pub night_duration: Duration,

    /// How long the external timer should hold the day step.
    pub day_duration: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 16,
            hackers_per: 4,
            whitehats_per: 5,
            analysts_per: 5,
            night_duration: Duration::from_secs(90),
            day_duration: Duration::from_secs(180),
        }
    }
}

/// How many of each special role a game of `n` players deals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleCounts {
    pub hackers: usize,
    pub whitehats: usize,
    pub analysts: usize,
}

impl GameConfig {
    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Rules: `min_players` at least 2, `max_players` at least
    /// `min_players`, ratios at least 1.
    pub fn validated(mut self) -> Self {
        self.min_players = self.min_players.max(2);
        self.max_players = self.max_players.max(self.min_players);
        self.hackers_per = self.hackers_per.max(1);
        self.whitehats_per = self.whitehats_per.max(1);
        self.analysts_per = self.analysts_per.max(1);
        self
    }

    /// The special-role deal for a game of `n` players.
    ///
    /// Special roles never fill the whole roster: if the ratios would
    /// leave no ordinary user, analysts are shed first, then whitehats.
    /// Requires `n >= 2` (enforced by `min_players`).
    pub fn role_counts(&self, n: usize) -> RoleCounts {
        let hackers = (n / self.hackers_per).clamp(1, n - 1);
        let mut whitehats = n / self.whitehats_per;
        let mut analysts = n / self.analysts_per;

        while hackers + whitehats + analysts >= n && analysts > 0 {
            analysts -= 1;
        }
        while hackers + whitehats + analysts >= n && whitehats > 0 {
            whitehats -= 1;
        }

        RoleCounts {
            hackers,
            whitehats,
            analysts,
        }
    }

    /// The timer duration for a round step. `Resolution` has no timer —
    /// the caller advances past it as soon as outcomes are delivered.
    pub fn duration_of(&self, step: Step) -> Option<Duration> {
        match step {
            Step::NightAction => Some(self.night_duration),
            Step::Day => Some(self.day_duration),
            Step::Resolution => None,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_counts_two_players_one_hacker() {
        let counts = GameConfig::default().role_counts(2);
        assert_eq!(
            counts,
            RoleCounts {
                hackers: 1,
                whitehats: 0,
                analysts: 0
            }
        );
    }

    #[test]
    fn test_role_counts_ten_players() {
        let counts = GameConfig::default().role_counts(10);
        assert_eq!(counts.hackers, 2);
        assert_eq!(counts.whitehats, 2);
        assert_eq!(counts.analysts, 2);
    }

    #[test]
    fn test_role_counts_always_leaves_an_ordinary_user() {
        let config = GameConfig {
            hackers_per: 1,
            whitehats_per: 1,
            analysts_per: 1,
            ..GameConfig::default()
        };
        for n in 2..=8 {
            let counts = config.role_counts(n);
            assert!(
                counts.hackers + counts.whitehats + counts.analysts < n,
                "n = {n}"
            );
        }
    }

    #[test]
    fn test_validated_clamps_degenerate_values() {
        let config = GameConfig {
            min_players: 0,
            max_players: 0,
            hackers_per: 0,
            ..GameConfig::default()
        }
        .validated();
        assert_eq!(config.min_players, 2);
        assert_eq!(config.max_players, 2);
        assert_eq!(config.hackers_per, 1);
    }

    #[test]
    fn test_duration_of_resolution_is_untimed() {
        let config = GameConfig::default();
        assert!(config.duration_of(Step::Resolution).is_none());
        assert_eq!(
            config.duration_of(Step::NightAction),
            Some(config.night_duration)
        );
    }
}
