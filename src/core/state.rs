//! The game snapshot.
//!
//! `GameState` holds everything needed to continue a game: board tokens,
//! decks, hands, counters, the suspended wizard (if any), and the RNG.
//! It is built on `im` persistent collections, so cloning a snapshot for
//! the undo ledger or a speculative reducer step is O(1), and `PartialEq`
//! compares the whole game.
//!
//! Mutation goes through the reducer in `crate::rules`; resolvers receive
//! a cloned `&mut GameState` and the original is never touched.

use im::{OrdMap, OrdSet, Vector};
use serde::{Deserialize, Serialize};

use super::action::ActionRecord;
use super::config::{GameConfig, Variant};
use super::error::{InvariantViolation, Rejection};
use super::phase::Phase;
use super::player::{Player, PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::board::{CityId, Color, ColorMap, Route, ALL_COLORS};
use crate::cards::{InfectionCard, PlayerCard};
use crate::events::EventWizard;
use crate::rules::battle::{BattleOutcome, DieFace};

/// Progress of one disease (tribe).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiseaseStatus {
    #[default]
    Active,
    /// Cured (allied in Rome). Cubes may remain.
    Cured,
    /// Cured with no cubes on the board. New cubes are never placed.
    Eradicated,
}

/// A suspended multi-step resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pending {
    Event(EventWizard),
    BattleRemoval(BattleOutcome),
}

/// Battle dice fixed in advance by an event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceOverride {
    pub faces: Vec<DieFace>,
    /// Applies to every battle this turn instead of only the next one.
    pub persistent: bool,
}

/// Per-turn flags, reset when a new turn starts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnFlags {
    pub operations_flight_used: bool,
    pub sample_taken: bool,
    pub epidemiologist_used: bool,
    pub archivist_used: bool,
    /// Mobile Hospital: each move this turn removes a cube.
    pub mobile_hospital: bool,
    pub dice_override: Option<DiceOverride>,
}

/// Complete game snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub variant: Variant,

    // === Turn Flow ===
    pub phase: Phase,
    /// Phases interrupted by `Discard` or `Resolving(_)`, innermost last.
    pub phase_stack: Vector<Phase>,
    pub current_player: PlayerId,
    pub actions_remaining: u8,
    /// Turn number (starts at 1).
    pub turn_number: u32,
    /// Commands accepted this turn.
    pub action_sequence: u32,
    /// Player cards still to draw in the current draw step.
    pub draws_remaining: u8,
    pub turn: TurnFlags,

    // === Players ===
    pub players: PlayerMap<Player>,

    // === Decks (top card at index 0) ===
    pub player_deck: Vector<PlayerCard>,
    pub player_discard: Vector<PlayerCard>,
    pub infection_deck: Vector<InfectionCard>,
    pub infection_discard: Vector<InfectionCard>,
    pub removed_cards: Vector<PlayerCard>,
    pub removed_infection: Vector<InfectionCard>,

    // === Board ===
    pub cubes: OrdMap<CityId, ColorMap<u8>>,
    pub supply: ColorMap<u8>,
    pub diseases: ColorMap<DiseaseStatus>,
    /// Research stations, or forts in Rome.
    pub stations: OrdSet<CityId>,
    pub station_supply: u8,
    pub legions: OrdMap<CityId, u8>,
    pub legion_supply: u8,
    pub railroads: OrdSet<Route>,
    pub railroad_supply: u8,
    /// At most one hospital per color.
    pub hospitals: ColorMap<Option<CityId>>,
    pub purification: OrdMap<CityId, u8>,
    pub purification_supply: u8,
    pub prevention_token: Option<CityId>,

    // === Tracks ===
    pub outbreaks: u8,
    pub rate_index: u8,
    /// Decline tokens: each adds one card to every invasion step.
    pub decline: u8,
    /// Infection steps still to be skipped.
    pub quiet_nights: u8,
    /// Commercial Travel Ban: active until this player's next turn.
    pub travel_ban: Option<PlayerId>,

    // === Suspension and Bookkeeping ===
    pub pending: Option<Pending>,
    pub history: Vector<ActionRecord>,
    pub rng: GameRng,
}

impl GameState {
    /// An empty board with full supplies and every pawn on `start`.
    ///
    /// Decks are empty; `session::GameBuilder` deals and infects.
    #[must_use]
    pub fn new(config: &GameConfig, start: CityId) -> Self {
        let rules = config.variant.rules();
        let players = PlayerMap::new(config.player_count(), |id| {
            Player::new(id, config.roles[id.index()], start)
        });
        let first_actions = players[PlayerId(0)]
            .role
            .actions_per_turn(rules.actions_per_turn);

        Self {
            variant: config.variant,
            phase: Phase::Setup,
            phase_stack: Vector::new(),
            current_player: PlayerId(0),
            actions_remaining: first_actions,
            turn_number: 1,
            action_sequence: 0,
            draws_remaining: 0,
            turn: TurnFlags::default(),
            players,
            player_deck: Vector::new(),
            player_discard: Vector::new(),
            infection_deck: Vector::new(),
            infection_discard: Vector::new(),
            removed_cards: Vector::new(),
            removed_infection: Vector::new(),
            cubes: OrdMap::new(),
            supply: ColorMap::from_fn(|c| config.cube_total(c)),
            diseases: ColorMap::splat(DiseaseStatus::Active),
            stations: OrdSet::new(),
            station_supply: rules.station_supply,
            legions: OrdMap::new(),
            legion_supply: rules.legion_supply,
            railroads: OrdSet::new(),
            railroad_supply: rules.railroad_supply,
            hospitals: ColorMap::splat(None),
            purification: OrdMap::new(),
            purification_supply: rules.purification_supply,
            prevention_token: None,
            outbreaks: 0,
            rate_index: 0,
            decline: 0,
            quiet_nights: 0,
            travel_ban: None,
            pending: None,
            history: Vector::new(),
            rng: GameRng::new(config.seed),
        }
    }

    // === Players ===

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// A player by seat, or `UnknownPlayer`.
    pub fn player(&self, id: PlayerId) -> Result<&Player, Rejection> {
        self.players.get(id).ok_or(Rejection::UnknownPlayer)
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current(&self) -> &Player {
        &self.players[self.current_player]
    }

    /// Players whose pawn is in `city`.
    pub fn pawns_at(&self, city: CityId) -> impl Iterator<Item = &Player> {
        self.players.values().filter(move |p| p.location == city)
    }

    /// The first player over their hand limit.
    #[must_use]
    pub fn over_limit_player(&self) -> Option<PlayerId> {
        self.players.values().find(|p| p.over_limit()).map(|p| p.id)
    }

    // === Cubes ===

    #[must_use]
    pub fn city_cubes(&self, city: CityId) -> ColorMap<u8> {
        self.cubes.get(&city).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn cube_count(&self, city: CityId, color: Color) -> u8 {
        self.cubes.get(&city).map_or(0, |m| m[color])
    }

    /// Cubes of `color` on the whole board.
    #[must_use]
    pub fn cubes_on_board(&self, color: Color) -> u32 {
        self.cubes.values().map(|m| u32::from(m[color])).sum()
    }

    /// Move one cube from the supply to `city`. False if the supply is empty.
    pub fn add_cube(&mut self, city: CityId, color: Color) -> bool {
        if self.supply[color] == 0 {
            return false;
        }
        self.supply[color] -= 1;
        let mut counts = self.city_cubes(city);
        counts[color] += 1;
        self.cubes.insert(city, counts);
        true
    }

    /// Return up to `n` cubes from `city` to the supply. Returns how many moved.
    pub fn remove_cubes(&mut self, city: CityId, color: Color, n: u8) -> u8 {
        let mut counts = self.city_cubes(city);
        let removed = counts[color].min(n);
        if removed == 0 {
            return 0;
        }
        counts[color] -= removed;
        self.supply[color] += removed;
        if counts.is_empty() {
            self.cubes.remove(&city);
        } else {
            self.cubes.insert(city, counts);
        }
        removed
    }

    // === Diseases ===

    /// Cured or eradicated.
    #[must_use]
    pub fn is_cured(&self, color: Color) -> bool {
        self.diseases[color] != DiseaseStatus::Active
    }

    #[must_use]
    pub fn is_eradicated(&self, color: Color) -> bool {
        self.diseases[color] == DiseaseStatus::Eradicated
    }

    // === Stations and Legions ===

    #[must_use]
    pub fn has_station(&self, city: CityId) -> bool {
        self.stations.contains(&city)
    }

    #[must_use]
    pub fn legions_at(&self, city: CityId) -> u8 {
        self.legions.get(&city).copied().unwrap_or(0)
    }

    /// Move up to `n` legions from the supply to `city`. Returns how many moved.
    pub fn add_legions(&mut self, city: CityId, n: u8) -> u8 {
        let added = self.legion_supply.min(n);
        if added > 0 {
            self.legion_supply -= added;
            *self.legions.entry(city).or_insert(0) += added;
        }
        added
    }

    /// Return up to `n` legions from `city` to the supply.
    pub fn remove_legions(&mut self, city: CityId, n: u8) -> u8 {
        let present = self.legions_at(city);
        let removed = present.min(n);
        if removed == 0 {
            return 0;
        }
        self.legion_supply += removed;
        if present == removed {
            self.legions.remove(&city);
        } else {
            self.legions.insert(city, present - removed);
        }
        removed
    }

    /// Move `n` legions between cities without touching the supply.
    pub fn march_legions(&mut self, from: CityId, to: CityId, n: u8) {
        let moved = self.legions_at(from).min(n);
        if moved == 0 {
            return;
        }
        let left = self.legions_at(from) - moved;
        if left == 0 {
            self.legions.remove(&from);
        } else {
            self.legions.insert(from, left);
        }
        *self.legions.entry(to).or_insert(0) += moved;
    }

    #[must_use]
    pub fn purification_at(&self, city: CityId) -> u8 {
        self.purification.get(&city).copied().unwrap_or(0)
    }

    // === Lifecycle ===

    /// True once the game reached `Victory` or `Defeat`.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Push the current phase and enter `next`.
    pub fn interrupt(&mut self, next: Phase) {
        self.phase_stack.push_back(self.phase);
        self.phase = next;
    }

    /// Leave an interrupting phase and resume the one beneath it.
    ///
    /// Falls back to `fallback` if nothing was pushed.
    pub fn resume(&mut self, fallback: Phase) {
        self.phase = self.phase_stack.pop_back().unwrap_or(fallback);
    }

    /// Check every engine guarantee against this snapshot.
    ///
    /// `previous` is the snapshot the reducer started from; it enables the
    /// monotonicity checks.
    pub fn check_invariants(
        &self,
        config: &GameConfig,
        previous: Option<&GameState>,
    ) -> Result<(), InvariantViolation> {
        let rules = config.variant.rules();

        for color in ALL_COLORS {
            let on_board = self.cubes_on_board(color);
            let samples: u32 = self.players.values().map(|p| u32::from(p.samples[color])).sum();
            let in_supply = u32::from(self.supply[color]) + samples;
            let total = u32::from(config.cube_total(color));
            if on_board + in_supply != total {
                return Err(InvariantViolation::CubeConservation {
                    color,
                    on_board,
                    in_supply,
                    total,
                });
            }
            if self.is_eradicated(color) && on_board > 0 {
                return Err(InvariantViolation::FalseEradication(color));
            }
        }

        for (city, counts) in &self.cubes {
            for (color, &count) in counts.iter() {
                if count > rules.city_cap {
                    return Err(InvariantViolation::CityOverCap {
                        city: *city,
                        color,
                        count,
                    });
                }
            }
        }

        if let Some(prev) = previous {
            if self.outbreaks < prev.outbreaks {
                return Err(InvariantViolation::OutbreaksRegressed {
                    before: prev.outbreaks,
                    after: self.outbreaks,
                });
            }
        }
        if self.outbreaks >= rules.max_outbreaks && !matches!(self.phase, Phase::Defeat(_)) {
            return Err(InvariantViolation::MaxOutbreaksWithoutDefeat);
        }

        let settled = matches!(
            self.phase,
            Phase::PlayerAction | Phase::PreDrawPlayerCards | Phase::InfectionStep
        );
        if settled && self.over_limit_player().is_some() {
            return Err(InvariantViolation::HandLimitUnresolved);
        }

        Ok(())
    }

    /// Serialize the snapshot for in-memory suspension.
    pub fn checkpoint(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Rebuild a snapshot from `checkpoint` output.
    pub fn restore(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}
