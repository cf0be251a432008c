//! Game configuration.
//!
//! A game is created from a `GameSession`: the chosen level, one optional
//! profile per seat, an RNG seed and the house rules. The session is built
//! once by the caller (typically the level-select screen) and handed to
//! `TurnEngine::new`; the engine keeps no other ambient configuration.
//!
//! ```
//! use labyrinth::core::{GameSession, ProfileId, RulesConfig};
//! # use labyrinth::level::LevelDefinition;
//! # let level = LevelDefinition::from_toml_str(r#"
//! #     name = "levels/tiny"
//! #     width = 2
//! #     height = 2
//! #     [[players]]
//! #     start = { x = 0, y = 0 }
//! #     objective = { x = 1, y = 1 }
//! #     [[players]]
//! #     start = { x = 1, y = 0 }
//! #     objective = { x = 0, y = 1 }
//! #     [tiles.floor]
//! #     goal = 5
//! # "#).unwrap();
//!
//! let session = GameSession::builder(level)
//!     .player_count(2)
//!     .profile(0, ProfileId(7))
//!     .seed(42)
//!     .rules(RulesConfig { forbid_reverse_shift: true, ..RulesConfig::default() })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(session.profiles, vec![Some(ProfileId(7)), None]);
//! ```

use serde::{Deserialize, Serialize};

use super::player::{PlayerId, ProfileId};
use crate::level::{LevelDefinition, LevelError};

/// House rules that vary between tables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Refuse a shift that exactly undoes the previous player's shift.
    pub forbid_reverse_shift: bool,

    /// How many full rounds Fire and Ice last.
    pub effect_cycles: u32,

    /// Draw one action tile at the start of every turn.
    pub draw_action_each_turn: bool,

    pub min_players: usize,
    pub max_players: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            forbid_reverse_shift: false,
            effect_cycles: 1,
            draw_action_each_turn: true,
            min_players: 2,
            max_players: 4,
        }
    }
}

/// Everything needed to start a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSession {
    pub level: LevelDefinition,
    /// One entry per seat, in turn order.
    pub profiles: Vec<Option<ProfileId>>,
    pub seed: u64,
    pub rules: RulesConfig,
}

impl GameSession {
    #[must_use]
    pub fn builder(level: LevelDefinition) -> GameSessionBuilder {
        GameSessionBuilder::new(level)
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.profiles.len()
    }
}

/// Builder for `GameSession`.
pub struct GameSessionBuilder {
    level: LevelDefinition,
    player_count: usize,
    profiles: Vec<(usize, ProfileId)>,
    seed: u64,
    rules: RulesConfig,
}

impl GameSessionBuilder {
    fn new(level: LevelDefinition) -> Self {
        Self {
            level,
            player_count: 2,
            profiles: Vec::new(),
            seed: 0,
            rules: RulesConfig::default(),
        }
    }

    pub fn player_count(mut self, count: usize) -> Self {
        self.player_count = count;
        self
    }

    /// Link a seat to a profile for win tracking.
    pub fn profile(mut self, seat: usize, profile: ProfileId) -> Self {
        self.profiles.retain(|&(s, _)| s != seat);
        self.profiles.push((seat, profile));
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn rules(mut self, rules: RulesConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Validate the level and seat assignment.
    pub fn build(self) -> Result<GameSession, LevelError> {
        self.level.validate()?;

        let requested = self.player_count;
        let slots = self.level.players.len();
        let rules = &self.rules;
        let max = rules.max_players.min(PlayerId::LIMIT);
        if requested < rules.min_players || requested > max || requested > slots {
            return Err(LevelError::PlayerCount {
                requested,
                min: rules.min_players,
                max,
                slots,
            });
        }

        let mut profiles = vec![None; requested];
        for (seat, profile) in self.profiles {
            let Some(entry) = profiles.get_mut(seat) else {
                return Err(LevelError::invalid(format!(
                    "profile assigned to seat {seat} but only {requested} players are seated"
                )));
            };
            *entry = Some(profile);
        }
        let mut seen = Vec::new();
        for profile in profiles.iter().flatten() {
            if seen.contains(profile) {
                return Err(LevelError::invalid(format!("{profile} is seated twice")));
            }
            seen.push(*profile);
        }

        Ok(GameSession {
            level: self.level,
            profiles,
            seed: self.seed,
            rules: self.rules,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(seats: usize) -> LevelDefinition {
        let mut text = String::from(
            r#"
            name = "levels/test"
            width = 3
            height = 3
            "#,
        );
        for x in 0..seats {
            text.push_str(&format!(
                "[[players]]\nstart = {{ x = {x}, y = 0 }}\nobjective = {{ x = {x}, y = 2 }}\n"
            ));
        }
        text.push_str("[tiles.floor]\nstraight = 10\n");
        LevelDefinition::from_toml_str(&text).unwrap()
    }

    #[test]
    fn test_default_rules() {
        let rules = RulesConfig::default();
        assert!(!rules.forbid_reverse_shift);
        assert_eq!(rules.effect_cycles, 1);
        assert_eq!((rules.min_players, rules.max_players), (2, 4));
    }

    #[test]
    fn test_builder_defaults() {
        let session = GameSession::builder(level(2)).build().unwrap();
        assert_eq!(session.player_count(), 2);
        assert_eq!(session.profiles, vec![None, None]);
        assert_eq!(session.seed, 0);
    }

    #[test]
    fn test_player_count_limits() {
        assert!(matches!(
            GameSession::builder(level(3)).player_count(1).build(),
            Err(LevelError::PlayerCount { requested: 1, .. })
        ));
        assert!(matches!(
            GameSession::builder(level(3)).player_count(4).build(),
            Err(LevelError::PlayerCount { slots: 3, .. })
        ));
        assert!(GameSession::builder(level(3)).player_count(3).build().is_ok());
    }

    #[test]
    fn test_max_players_capped_at_id_range() {
        let rules = RulesConfig {
            max_players: usize::MAX,
            ..RulesConfig::default()
        };
        let err = GameSession::builder(level(3))
            .player_count(300)
            .rules(rules)
            .build()
            .unwrap_err();
        assert!(matches!(err, LevelError::PlayerCount { max: PlayerId::LIMIT, .. }));
    }

    #[test]
    fn test_profile_outside_seats_rejected() {
        let result = GameSession::builder(level(2)).profile(3, ProfileId(1)).build();
        assert!(matches!(result, Err(LevelError::Invalid { .. })));
    }

    #[test]
    fn test_duplicate_profile_rejected() {
        let result = GameSession::builder(level(2))
            .profile(0, ProfileId(1))
            .profile(1, ProfileId(1))
            .build();
        assert!(matches!(result, Err(LevelError::Invalid { .. })));
    }

    #[test]
    fn test_profile_reassigned_to_same_seat() {
        let session = GameSession::builder(level(2))
            .profile(1, ProfileId(1))
            .profile(1, ProfileId(2))
            .build()
            .unwrap();
        assert_eq!(session.profiles, vec![None, Some(ProfileId(2))]);
    }

    #[test]
    fn test_rules_from_toml() {
        let rules: RulesConfig = toml::from_str("forbid_reverse_shift = true").unwrap();
        assert!(rules.forbid_reverse_shift);
        assert_eq!(rules.max_players, 4);
    }
}
