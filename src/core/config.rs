//! Game configuration and per-variant rule constants.
//!
//! - `Variant`: which game in the family is being played
//! - `VariantRules`: fixed constants (supplies, rate table, caps)
//! - `GameConfig`: per-game choices (players, roles, difficulty, seed)
//!
//! `GameConfig` is serde-enabled so a UI can hand the engine a JSON blob.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::role::Role;
use crate::board::{Board, Color, ALL_COLORS};

/// The game in the family being played.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Diseases, research stations, world map.
    #[default]
    Classic,
    /// Barbarian tribes, forts, legions, battles, alliances.
    Rome,
    /// Diseases, hospitals, railroads, ships, purification.
    Iberia,
}

impl Variant {
    /// Fixed rule constants for this variant.
    #[must_use]
    pub const fn rules(self) -> &'static VariantRules {
        match self {
            Variant::Classic => &CLASSIC_RULES,
            Variant::Rome => &ROME_RULES,
            Variant::Iberia => &IBERIA_RULES,
        }
    }

    /// The built-in board for this variant.
    pub fn board(self) -> Result<Board, ConfigError> {
        match self {
            Variant::Classic => Board::classic(),
            Variant::Rome => Board::rome(),
            Variant::Iberia => Board::iberia(),
        }
    }

    /// Word for an outbreak under this variant's vocabulary.
    #[must_use]
    pub const fn outbreak_word(self) -> &'static str {
        match self {
            Variant::Rome => "sacking",
            Variant::Classic | Variant::Iberia => "outbreak",
        }
    }

    /// Word for a cure under this variant's vocabulary.
    #[must_use]
    pub const fn cure_word(self) -> &'static str {
        match self {
            Variant::Rome => "alliance",
            Variant::Classic | Variant::Iberia => "cure",
        }
    }

    /// Word for an epidemic under this variant's vocabulary.
    #[must_use]
    pub const fn epidemic_word(self) -> &'static str {
        match self {
            Variant::Rome => "revolt",
            Variant::Classic | Variant::Iberia => "epidemic",
        }
    }
}

/// Fixed per-variant constants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantRules {
    /// Cubes (barbarians) per native color.
    pub cubes_per_color: u8,
    /// Purple cubes (mutation challenge or the fifth tribe).
    pub purple_cubes: u8,
    /// Cubes of one color a city holds before it outbreaks.
    pub city_cap: u8,
    /// Outbreak counter value that loses the game.
    pub max_outbreaks: u8,
    /// Infection cards drawn per step, indexed by rate index.
    pub rate_table: &'static [u8],
    /// Research stations (forts in Rome) available.
    pub station_supply: u8,
    /// Legion tokens available.
    pub legion_supply: u8,
    /// Railroad segments available.
    pub railroad_supply: u8,
    /// Purification tokens available.
    pub purification_supply: u8,
    /// Most dice rolled in one battle.
    pub battle_dice: u8,
    /// Most legions that march alongside a pawn.
    pub escort_limit: u8,
    /// Actions per turn for ordinary roles.
    pub actions_per_turn: u8,
    /// Default cards needed for a cure (alliance).
    pub cure_cards: u8,
}

static CLASSIC_RULES: VariantRules = VariantRules {
    cubes_per_color: 24,
    purple_cubes: 12,
    city_cap: 3,
    max_outbreaks: 8,
    rate_table: &[2, 2, 2, 3, 3, 4, 4],
    station_supply: 6,
    legion_supply: 0,
    railroad_supply: 0,
    purification_supply: 0,
    battle_dice: 0,
    escort_limit: 0,
    actions_per_turn: 4,
    cure_cards: 5,
};

static ROME_RULES: VariantRules = VariantRules {
    cubes_per_color: 20,
    purple_cubes: 20,
    city_cap: 3,
    max_outbreaks: 8,
    rate_table: &[2, 2, 3, 3, 4, 4, 5],
    station_supply: 6,
    legion_supply: 16,
    railroad_supply: 0,
    purification_supply: 0,
    battle_dice: 3,
    escort_limit: 3,
    actions_per_turn: 4,
    cure_cards: 4,
};

static IBERIA_RULES: VariantRules = VariantRules {
    cubes_per_color: 24,
    purple_cubes: 0,
    city_cap: 3,
    max_outbreaks: 8,
    rate_table: &[2, 2, 2, 3, 3, 4, 4],
    station_supply: 0,
    legion_supply: 0,
    railroad_supply: 20,
    purification_supply: 16,
    battle_dice: 0,
    escort_limit: 0,
    actions_per_turn: 4,
    cure_cards: 5,
};

/// Per-game configuration.
///
/// ## Example
///
/// ```
/// use outbreak::core::{GameConfig, Role, Variant};
///
/// let config = GameConfig::new(Variant::Classic)
///     .with_roles(vec![Role::Medic, Role::Scientist])
///     .with_epidemics(5)
///     .with_seed(7);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.player_count(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub variant: Variant,

    /// One role per player, in seat order.
    pub roles: Vec<Role>,

    /// Epidemic (revolt) cards shuffled into the player deck.
    pub epidemics: u8,

    /// Seed for every shuffle and die roll.
    pub seed: u64,

    /// Classic only: add purple cubes and mutation cards.
    #[serde(default)]
    pub mutation: bool,

    /// Same-colored city cards a standard cure requires.
    pub cure_cards: u8,
}

impl GameConfig {
    /// Defaults: four players with the first legal roles, 5 epidemics,
    /// and the variant's usual cure size.
    #[must_use]
    pub fn new(variant: Variant) -> Self {
        let roles = Role::ALL
            .iter()
            .copied()
            .filter(|r| r.in_variant(variant))
            .take(4)
            .collect();
        Self {
            variant,
            roles,
            epidemics: 5,
            seed: 0,
            mutation: false,
            cure_cards: variant.rules().cure_cards,
        }
    }

    /// Set player roles (also sets the player count).
    #[must_use]
    pub fn with_roles(mut self, roles: Vec<Role>) -> Self {
        self.roles = roles;
        self
    }

    /// Override the cards needed for a cure.
    #[must_use]
    pub fn with_cure_cards(mut self, cards: u8) -> Self {
        self.cure_cards = cards;
        self
    }

    /// Set the epidemic count (difficulty).
    #[must_use]
    pub fn with_epidemics(mut self, epidemics: u8) -> Self {
        self.epidemics = epidemics;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable the mutation challenge (Classic only).
    #[must_use]
    pub fn with_mutation(mut self) -> Self {
        self.mutation = true;
        self
    }

    /// Number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.roles.len()
    }

    /// Colors with cubes in play.
    #[must_use]
    pub fn active_colors(&self) -> Vec<Color> {
        ALL_COLORS
            .iter()
            .copied()
            .filter(|&c| c != Color::Purple || self.variant == Variant::Rome || self.mutation)
            .collect()
    }

    /// Colors that must be cured (allied) to win: every color in play.
    #[must_use]
    pub fn required_cures(&self) -> Vec<Color> {
        self.active_colors()
    }

    /// Total cubes of one color.
    #[must_use]
    pub fn cube_total(&self, color: Color) -> u8 {
        let rules = self.variant.rules();
        match color {
            Color::Purple if self.active_colors().contains(&Color::Purple) => rules.purple_cubes,
            Color::Purple => 0,
            _ => rules.cubes_per_color,
        }
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let count = self.roles.len();
        if !(2..=5).contains(&count) {
            return Err(ConfigError::PlayerCount(count));
        }
        if !(4..=7).contains(&self.epidemics) {
            return Err(ConfigError::EpidemicCount(self.epidemics));
        }
        if !(3..=7).contains(&self.cure_cards) {
            return Err(ConfigError::CureCards(self.cure_cards));
        }
        for (i, role) in self.roles.iter().enumerate() {
            if !role.in_variant(self.variant) {
                return Err(ConfigError::RoleNotInVariant(*role, self.variant));
            }
            if self.roles[..i].contains(role) {
                return Err(ConfigError::DuplicateRole(*role));
            }
        }
        if self.mutation && self.variant != Variant::Classic {
            return Err(ConfigError::MutationNotInVariant(self.variant));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(Variant::Classic)
    }
}
