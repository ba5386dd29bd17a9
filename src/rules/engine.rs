//! Rules engine trait and the reducer.
//!
//! `RulesEngine` is the seam between the rules and everything that drives
//! them (sessions, bots, tests):
//! - What actions are legal
//! - How actions transform state
//! - Win/loss conditions
//!
//! `Ruleset` implements it for all three variants. `apply_action` is a
//! pure function: it never mutates its input and returns either a new
//! state with the events it caused, or the reason the command was refused.

use tracing::{debug, error, warn};

use super::battle;
use super::cure;
use super::effects;
use super::legality;
use super::phase;
use crate::board::{Board, BoardBuilder, CityId, Color, Route, ALL_COLORS};
use crate::cards::{CityCard, EventCard, PlayerCard};
use crate::core::{
    Action, ActionRecord, ConfigError, DefeatReason, GameConfig, GameEvent, GameState,
    Interrupt, Pending, Phase, PlayerId, Rejection, Removals, Role, Variant, VariantRules,
};
use crate::events::{resolver, targeting, wizard, Selection};

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Every required disease cured.
    Victory,
    Defeat(DefeatReason),
}

impl GameResult {
    #[must_use]
    pub const fn is_victory(self) -> bool {
        matches!(self, GameResult::Victory)
    }
}

/// An accepted command: the new state and what happened, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: GameState,
    pub events: Vec<GameEvent>,
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_actions`: Return empty vec if the player can't act
/// - `apply_action`: Must be pure and deterministic; randomness comes
///   from the RNG carried in the state
/// - `is_terminal`: Return None if the game continues
pub trait RulesEngine {
    /// Get the game configuration.
    fn config(&self) -> &GameConfig;

    /// Every command `player` may issue in `state`.
    fn legal_actions(&self, state: &GameState, player: PlayerId) -> Vec<Action>;

    /// Apply a command, producing a new state.
    fn apply_action(
        &self,
        state: &GameState,
        player: PlayerId,
        action: &Action,
    ) -> Result<Transition, Rejection>;

    /// Check if the game is over.
    fn is_terminal(&self, state: &GameState) -> Option<GameResult>;

    // === Convenience Methods ===

    /// True if `player` may issue `action`.
    fn is_legal(&self, state: &GameState, player: PlayerId, action: &Action) -> bool {
        self.legal_actions(state, player).contains(action)
    }
}

/// The rules of one configured game.
#[derive(Clone, Debug)]
pub struct Ruleset {
    config: GameConfig,
    board: Board,
}

impl Ruleset {
    /// Validate `config` and load its variant's board.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = config.variant.board()?;
        Ok(Self { config, board })
    }

    /// Use a custom board, built from `board`.
    pub fn with_board(config: GameConfig, board: BoardBuilder) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = board.build()?;
        Ok(Self { config, board })
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Constants of the configured variant.
    #[must_use]
    pub fn rules(&self) -> &'static VariantRules {
        self.config.variant.rules()
    }

    /// Check `action` without applying it.
    pub fn check(&self, state: &GameState, player: PlayerId, action: &Action) -> Result<(), Rejection> {
        legality::check(self, state, player, action)
    }

    fn dispatch(
        &self,
        state: &mut GameState,
        player: PlayerId,
        action: &Action,
        log: &mut Vec<GameEvent>,
    ) -> Result<(), Rejection> {
        let here = state.players[player].location;
        match action {
            Action::ChooseStartingCity { city } => {
                phase::choose_starting_city(self, state, player, *city, log);
            }

            // === Movement ===
            Action::Drive { to, legions } => {
                state.march_legions(here, *to, *legions);
                effects::move_pawn(self, state, player, *to, log);
            }
            Action::DirectFlight { to } => {
                let card = state.players[player]
                    .hand
                    .iter()
                    .copied()
                    .find(|c| c.is_city(*to))
                    .ok_or(Rejection::MissingCard)?;
                effects::discard(state, player, card, log)?;
                effects::move_pawn(self, state, player, *to, log);
            }
            Action::CharterFlight { to } => {
                let card = state.players[player]
                    .hand
                    .iter()
                    .copied()
                    .find(|c| c.is_city(here))
                    .ok_or(Rejection::MissingCard)?;
                effects::discard(state, player, card, log)?;
                effects::move_pawn(self, state, player, *to, log);
            }
            Action::ShuttleFlight { to } | Action::RailMove { to } => {
                effects::move_pawn(self, state, player, *to, log);
            }
            Action::OperationsFlight { to, discard } => {
                effects::discard(state, player, PlayerCard::City(*discard), log)?;
                state.turn.operations_flight_used = true;
                effects::move_pawn(self, state, player, *to, log);
            }
            Action::DispatchToPawn { pawn, to } => {
                effects::move_pawn(self, state, *pawn, *to, log);
            }
            Action::Sail { to, card, legions } => {
                if let Some(fare) = card {
                    effects::discard(state, player, PlayerCard::City(*fare), log)?;
                }
                state.march_legions(here, *to, *legions);
                effects::move_pawn(self, state, player, *to, log);
            }

            // === Board Actions ===
            Action::Treat { color, keep_sample } => {
                let p = &state.players[player];
                let all = state.is_cured(*color) || p.role == Role::Medic;
                let removed =
                    effects::remove_cubes(state, here, *color, if all { u8::MAX } else { 1 }, log);
                if *keep_sample && removed > 0 {
                    state.supply[*color] -= 1;
                    state.players[player].samples[*color] += 1;
                    state.turn.sample_taken = true;
                }
            }
            Action::Cure {
                color,
                method,
                cards,
            } => cure::resolve_cure(self, state, player, *color, *method, cards, log)?,
            Action::BuildStation { remove } => {
                if state.players[player].role != Role::OperationsExpert {
                    let card = CityCard::new(here, self.board.color(here));
                    effects::discard(state, player, PlayerCard::City(card), log)?;
                }
                if let Some(old) = remove {
                    effects::remove_station(state, *old, log);
                }
                effects::build_station(state, here, log);
            }
            Action::ShareKnowledge { other, card, give } => {
                let (from, to) = if *give { (player, *other) } else { (*other, player) };
                effects::give(state, from, to, PlayerCard::City(*card), log)?;
            }
            Action::BuildRailroad { to, extend } => {
                resolver::lay_track(state, Route::new(here, *to), log);
                if let Some(next) = extend {
                    resolver::lay_track(state, Route::new(*to, *next), log);
                }
            }
            Action::BuildHospital => {
                let color = self.board.color(here);
                let card = CityCard::new(here, color);
                effects::discard(state, player, PlayerCard::City(card), log)?;
                state.hospitals[color] = Some(here);
                log.push(GameEvent::HospitalBuilt { city: here, color });
            }
            Action::Purify { discard } => {
                effects::discard(state, player, PlayerCard::City(*discard), log)?;
                let tokens = if state.players[player].role == Role::Agronomist {
                    3
                } else {
                    2
                };
                resolver::place_purification(state, here, tokens, log);
            }
            Action::PlacePreventionToken { city } => {
                state.prevention_token = Some(*city);
                log.push(GameEvent::PreventionTokenPlaced { city: *city });
            }
            Action::Recruit { count } => resolver::recruit(state, here, *count, log),
            Action::Battle { dice } => battle::resolve_battle(self, state, player, *dice, log),
            Action::Enlist { color } => {
                effects::remove_cubes(state, here, *color, 1, log);
                state.add_legions(here, 1);
                log.push(GameEvent::Enlisted {
                    city: here,
                    color: *color,
                });
            }

            // === Role Abilities ===
            Action::ContingencyTake { card } => {
                let taken = PlayerCard::Event(*card);
                let pos = state
                    .player_discard
                    .index_of(&taken)
                    .ok_or(Rejection::MissingCard)?;
                state.player_discard.remove(pos);
                state.players[player].stash = Some(*card);
                log.push(GameEvent::CardRetrieved {
                    player,
                    card: taken,
                });
            }
            Action::EpidemiologistTake { from, card } => {
                effects::give(state, *from, player, PlayerCard::City(*card), log)?;
                state.turn.epidemiologist_used = true;
            }
            Action::ArchivistRetrieve => {
                let card = CityCard::new(here, self.board.color(here));
                effects::retrieve(state, player, PlayerCard::City(card), log)?;
                state.turn.archivist_used = true;
            }

            // === Events and Interrupts ===
            Action::PlayEvent { card } => wizard::play(state, player, *card, log),
            Action::SubmitSelection { selection } => wizard::submit(state, selection.clone())?,
            Action::WizardBack => wizard::back(state)?,
            Action::ConfirmEvent => wizard::confirm(self, state, log)?,
            Action::CancelEvent => wizard::cancel(state, log),
            Action::ChooseBattleRemovals { removals } => {
                battle::apply_removals(state, removals, log);
            }

            // === Turn Flow ===
            Action::EndActions => phase::end_actions(state, log),
            Action::DrawPlayerCards => phase::begin_draw(self, state, log),
            Action::Continue => match state.phase {
                Phase::PostEpidemicEventWindow => phase::close_epidemic_window(self, state, log),
                _ => effects::resume(state, Phase::PlayerAction, log),
            },
            Action::Discard { card } => effects::discard(state, player, *card, log)?,
            Action::InfectCities => phase::infect_and_end_turn(self, state, log),
            Action::Undo => return Err(Rejection::NothingToUndo),
        }
        Ok(())
    }

    // === Candidate Generation ===

    fn movement_candidates(&self, state: &GameState, player: PlayerId, out: &mut Vec<Action>) {
        let Some(p) = state.players.get(player) else {
            return;
        };
        let here = p.location;
        let escort = self.rules().escort_limit.min(state.legions_at(here));

        for &to in self.board.neighbors(here) {
            for legions in 0..=escort {
                out.push(Action::Drive { to, legions });
            }
        }
        if state.variant == Variant::Classic {
            for card in p.hand.iter() {
                if let Some(to) = card.city() {
                    out.push(Action::DirectFlight { to });
                }
            }
            if p.holds_city(here) {
                out.extend(self.board.cities().map(|to| Action::CharterFlight { to }));
            }
            out.extend(state.stations.iter().map(|&to| Action::ShuttleFlight { to }));
            if p.role == Role::OperationsExpert {
                for discard in city_cards(p.hand.iter().copied()) {
                    out.extend(
                        self.board
                            .cities()
                            .map(|to| Action::OperationsFlight { to, discard }),
                    );
                }
            }
            if p.role == Role::Dispatcher {
                for pawn in state.players.player_ids() {
                    out.extend(
                        self.board
                            .cities()
                            .map(|to| Action::DispatchToPawn { pawn, to }),
                    );
                }
            }
        }
        if !state.railroads.is_empty() {
            out.extend(
                legality::rail_network(state, here)
                    .into_iter()
                    .map(|to| Action::RailMove { to }),
            );
        }
        if self.board.is_port(here) {
            let ports: Vec<CityId> = self.board.cities().filter(|&c| self.board.is_port(c)).collect();
            for to in ports {
                for legions in 0..=escort {
                    out.push(Action::Sail {
                        to,
                        card: None,
                        legions,
                    });
                    for fare in city_cards(p.hand.iter().copied()) {
                        out.push(Action::Sail {
                            to,
                            card: Some(fare),
                            legions,
                        });
                    }
                }
            }
        }
    }

    fn board_candidates(&self, state: &GameState, player: PlayerId, out: &mut Vec<Action>) {
        let Some(p) = state.players.get(player) else {
            return;
        };
        let here = p.location;

        for color in ALL_COLORS {
            out.push(Action::Treat {
                color,
                keep_sample: false,
            });
            out.push(Action::Treat {
                color,
                keep_sample: true,
            });
            out.push(Action::Enlist { color });
            for offer in cure::offers(self, state, player, color) {
                out.push(Action::Cure {
                    color,
                    method: offer.method,
                    cards: offer.suggested.into_iter().collect(),
                });
            }
        }

        out.push(Action::BuildStation { remove: None });
        out.extend(
            state
                .stations
                .iter()
                .map(|&old| Action::BuildStation { remove: Some(old) }),
        );

        for other in state.players.values().filter(|o| o.id != player) {
            for card in city_cards(p.hand.iter().copied()) {
                out.push(Action::ShareKnowledge {
                    other: other.id,
                    card,
                    give: true,
                });
            }
            for card in city_cards(other.hand.iter().copied()) {
                out.push(Action::ShareKnowledge {
                    other: other.id,
                    card,
                    give: false,
                });
                out.push(Action::EpidemiologistTake {
                    from: other.id,
                    card,
                });
            }
        }

        for &to in self.board.neighbors(here) {
            out.push(Action::BuildRailroad { to, extend: None });
            if p.role == Role::Railwayman {
                for &next in self.board.neighbors(to) {
                    out.push(Action::BuildRailroad {
                        to,
                        extend: Some(next),
                    });
                }
            }
            out.push(Action::PlacePreventionToken { city: to });
        }
        out.push(Action::PlacePreventionToken { city: here });
        out.push(Action::BuildHospital);
        for discard in city_cards(p.hand.iter().copied()) {
            out.push(Action::Purify { discard });
        }

        for count in 1..=legality::recruit_limit(p.role) {
            out.push(Action::Recruit { count });
        }
        for dice in 1..=self.rules().battle_dice {
            out.push(Action::Battle { dice });
        }

        for card in state.player_discard.iter().filter_map(|c| c.event()) {
            out.push(Action::ContingencyTake { card });
        }
        out.push(Action::ArchivistRetrieve);
    }

    fn event_candidates(&self, state: &GameState, player: PlayerId, out: &mut Vec<Action>) {
        let Some(p) = state.players.get(player) else {
            return;
        };
        let mut cards: Vec<EventCard> = p.hand.iter().filter_map(|c| c.event()).collect();
        cards.extend(p.stash);
        out.extend(cards.into_iter().map(|card| Action::PlayEvent { card }));
    }

    fn wizard_candidates(&self, state: &GameState, out: &mut Vec<Action>) {
        let Some(Pending::Event(w)) = &state.pending else {
            return;
        };
        out.extend(
            targeting::options(self, state, w)
                .into_iter()
                .map(|selection: Selection| Action::SubmitSelection { selection }),
        );
        out.push(Action::WizardBack);
        out.push(Action::ConfirmEvent);
        out.push(Action::CancelEvent);
    }

    fn removal_candidates(&self, state: &GameState, out: &mut Vec<Action>) {
        let Some(Pending::BattleRemoval(outcome)) = &state.pending else {
            return;
        };
        let cubes = state.city_cubes(outcome.city);
        let target = u32::from(outcome.barbarians_to_remove).min(cubes.total());
        let present: Vec<(Color, u8)> = cubes
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(c, n)| (c, *n))
            .collect();

        let mut choice = Removals::new();
        removal_splits(&present, target, &mut choice, out);
    }

    fn candidates(&self, state: &GameState, player: PlayerId) -> Vec<Action> {
        let mut out = Vec::new();
        match state.phase {
            Phase::Setup | Phase::Victory | Phase::Defeat(_) => {}
            Phase::ChoosingStartingCity => {
                out.extend(self.board.cities().map(|city| Action::ChooseStartingCity { city }));
            }
            Phase::PlayerAction => {
                self.movement_candidates(state, player, &mut out);
                self.board_candidates(state, player, &mut out);
                self.event_candidates(state, player, &mut out);
                out.push(Action::EndActions);
            }
            Phase::Resolving(Interrupt::Event(_)) => self.wizard_candidates(state, &mut out),
            Phase::Resolving(Interrupt::BattleRemoval) => self.removal_candidates(state, &mut out),
            Phase::Resolving(Interrupt::PostCure(_)) => {
                self.event_candidates(state, player, &mut out);
                out.push(Action::Continue);
            }
            Phase::Discard => {
                if let Some(p) = state.players.get(player) {
                    out.extend(p.hand.iter().map(|&card| Action::Discard { card }));
                }
                self.event_candidates(state, player, &mut out);
            }
            Phase::PreDrawPlayerCards => {
                out.push(Action::DrawPlayerCards);
                self.event_candidates(state, player, &mut out);
            }
            Phase::PostEpidemicEventWindow => {
                out.push(Action::Continue);
                self.event_candidates(state, player, &mut out);
            }
            Phase::InfectionStep => {
                out.push(Action::InfectCities);
                self.event_candidates(state, player, &mut out);
            }
            Phase::DrawingPlayerCards | Phase::EpidemicAnnounceInfect => {}
        }
        out
    }
}

fn city_cards(cards: impl Iterator<Item = PlayerCard>) -> impl Iterator<Item = CityCard> {
    cards.filter_map(|c| match c {
        PlayerCard::City(city) => Some(city),
        _ => None,
    })
}

/// Every way to take exactly `remaining` cubes from `present`.
fn removal_splits(
    present: &[(Color, u8)],
    remaining: u32,
    choice: &mut Removals,
    out: &mut Vec<Action>,
) {
    let Some((&(color, available), rest)) = present.split_first() else {
        if remaining == 0 {
            out.push(Action::ChooseBattleRemovals {
                removals: choice.clone(),
            });
        }
        return;
    };
    let most = u32::from(available).min(remaining);
    for take in 0..=most {
        if take > 0 {
            choice.push((color, take as u8));
        }
        removal_splits(rest, remaining - take, choice, out);
        if take > 0 {
            choice.pop();
        }
    }
}

impl RulesEngine for Ruleset {
    fn config(&self) -> &GameConfig {
        &self.config
    }

    fn legal_actions(&self, state: &GameState, player: PlayerId) -> Vec<Action> {
        let mut legal = Vec::new();
        for action in self.candidates(state, player) {
            if !legal.contains(&action) && legality::check(self, state, player, &action).is_ok() {
                legal.push(action);
            }
        }
        legal
    }

    fn apply_action(
        &self,
        state: &GameState,
        player: PlayerId,
        action: &Action,
    ) -> Result<Transition, Rejection> {
        if let Err(rejection) = legality::check(self, state, player, action) {
            warn!(%player, action = action.name(), %rejection, "Action rejected");
            return Err(rejection);
        }

        let mut next = state.clone();
        let mut events = Vec::new();
        let confirmed = match (&state.pending, action) {
            (Some(Pending::Event(w)), Action::ConfirmEvent) => Some(w.card),
            _ => None,
        };

        if action.spends_action() {
            next.actions_remaining = next.actions_remaining.saturating_sub(1);
        }
        self.dispatch(&mut next, player, action, &mut events)?;

        if !action.is_wizard_step() {
            let recorded = match confirmed {
                Some(card) => Action::PlayEvent { card },
                None => action.clone(),
            };
            next.history.push_back(ActionRecord::new(
                player,
                recorded,
                state.turn_number,
                state.action_sequence,
            ));
            next.action_sequence += 1;
        }

        phase::settle(&mut next, &mut events);

        if let Err(violation) = next.check_invariants(&self.config, Some(state)) {
            error!(%violation, action = action.name(), "Invariant violated; command discarded");
            return Err(Rejection::Internal(violation));
        }

        debug!(
            %player,
            action = action.name(),
            events = events.len(),
            phase = ?next.phase,
            "Action applied"
        );
        Ok(Transition {
            state: next,
            events,
        })
    }

    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        match state.phase {
            Phase::Victory => Some(GameResult::Victory),
            Phase::Defeat(reason) => Some(GameResult::Defeat(reason)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;

    fn setup(variant: Variant, roles: Vec<Role>) -> (Ruleset, GameState) {
        let rs = Ruleset::new(GameConfig::new(variant).with_roles(roles)).unwrap();
        let mut state = GameState::new(rs.config(), rs.board().start());
        state.phase = Phase::PlayerAction;
        (rs, state)
    }

    #[test]
    fn test_game_result_is_victory() {
        assert!(GameResult::Victory.is_victory());
        assert!(!GameResult::Defeat(DefeatReason::Outbreaks).is_victory());
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let (rs, state) = setup(Variant::Classic, vec![Role::Medic, Role::Scientist]);
        let before = state.clone();
        let chicago = rs.board().id("Chicago").unwrap();
        let t = rs
            .apply_action(&state, PlayerId(0), &Action::Drive { to: chicago, legions: 0 })
            .unwrap();
        assert_eq!(state, before);
        assert_eq!(t.state.players[PlayerId(0)].location, chicago);
        assert_eq!(t.state.actions_remaining, 3);
        assert_eq!(t.state.history.len(), 1);
    }

    #[test]
    fn test_rejection_returns_reason() {
        let (rs, state) = setup(Variant::Classic, vec![Role::Medic, Role::Scientist]);
        let tokyo = rs.board().id("Tokyo").unwrap();
        assert_eq!(
            rs.apply_action(&state, PlayerId(0), &Action::Drive { to: tokyo, legions: 0 }),
            Err(Rejection::NotConnected)
        );
    }

    #[test]
    fn test_legal_actions_all_apply() {
        let (rs, state) = setup(Variant::Classic, vec![Role::Dispatcher, Role::Scientist]);
        let legal = rs.legal_actions(&state, PlayerId(0));
        assert!(legal.contains(&Action::EndActions));
        for action in &legal {
            assert!(
                rs.apply_action(&state, PlayerId(0), action).is_ok(),
                "{action:?} listed but refused"
            );
        }
        assert!(rs.legal_actions(&state, PlayerId(1)).is_empty());
    }

    #[test]
    fn test_fourth_action_moves_to_predraw() {
        let (rs, mut state) = setup(Variant::Classic, vec![Role::Medic, Role::Scientist]);
        state.actions_remaining = 1;
        let chicago = rs.board().id("Chicago").unwrap();
        let t = rs
            .apply_action(&state, PlayerId(0), &Action::Drive { to: chicago, legions: 0 })
            .unwrap();
        assert_eq!(t.state.phase, Phase::PreDrawPlayerCards);
    }

    #[test]
    fn test_battle_removal_choices_cover_outcomes() {
        let present = [(Color::Red, 2), (Color::Black, 1)];
        let mut out = Vec::new();
        removal_splits(&present, 2, &mut Removals::new(), &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_march_with_legions() {
        let (rs, mut state) = setup(Variant::Rome, vec![Role::Consul, Role::Mercator]);
        let roma = rs.board().start();
        state.add_legions(roma, 3);
        let neapolis = rs.board().id("Neapolis").unwrap();
        let t = rs
            .apply_action(&state, PlayerId(0), &Action::Drive { to: neapolis, legions: 2 })
            .unwrap();
        assert_eq!(t.state.legions_at(roma), 1);
        assert_eq!(t.state.legions_at(neapolis), 2);
    }

    #[test]
    fn test_contingency_planner_stores_one_event() {
        let (rs, mut state) = setup(Variant::Classic, vec![Role::ContingencyPlanner, Role::Medic]);
        let quiet = PlayerCard::Event(EventCard::OneQuietNight);
        let grant = PlayerCard::Event(EventCard::GovernmentGrant);
        state.player_discard.push_back(quiet);
        state.player_discard.push_back(grant);

        let take = Action::ContingencyTake {
            card: EventCard::OneQuietNight,
        };
        let t = rs.apply_action(&state, PlayerId(0), &take).unwrap();
        assert_eq!(t.state.players[PlayerId(0)].stash, Some(EventCard::OneQuietNight));
        assert!(!t.state.player_discard.contains(&quiet));
        assert_eq!(t.state.actions_remaining, 3);

        let again = Action::ContingencyTake {
            card: EventCard::GovernmentGrant,
        };
        assert!(rs.check(&t.state, PlayerId(0), &again).is_err());
    }

    #[test]
    fn test_epidemiologist_takes_once_for_free() {
        let (rs, mut state) = setup(Variant::Classic, vec![Role::Epidemiologist, Role::Medic]);
        let paris = rs.board().id("Paris").unwrap();
        let card = CityCard::new(paris, rs.board().color(paris));
        state.players[PlayerId(1)].hand.push_back(PlayerCard::City(card));
        let take = Action::EpidemiologistTake {
            from: PlayerId(1),
            card,
        };

        let t = rs.apply_action(&state, PlayerId(0), &take).unwrap();
        assert!(t.state.players[PlayerId(0)].holds(PlayerCard::City(card)));
        assert!(t.state.players[PlayerId(1)].hand.is_empty());
        assert_eq!(t.state.actions_remaining, 4);

        let mut back = t.state.clone();
        back.players[PlayerId(0)].remove_card(PlayerCard::City(card));
        back.players[PlayerId(1)].hand.push_back(PlayerCard::City(card));
        assert_eq!(rs.check(&back, PlayerId(0), &take), Err(Rejection::AlreadyUsed));
    }

    #[test]
    fn test_archivist_retrieves_current_city() {
        let (rs, mut state) = setup(Variant::Classic, vec![Role::Archivist, Role::Medic]);
        let atlanta = rs.board().start();
        let card = PlayerCard::City(CityCard::new(atlanta, rs.board().color(atlanta)));
        assert_eq!(
            rs.check(&state, PlayerId(0), &Action::ArchivistRetrieve),
            Err(Rejection::MissingCard)
        );

        state.player_discard.push_back(card);
        let t = rs
            .apply_action(&state, PlayerId(0), &Action::ArchivistRetrieve)
            .unwrap();
        assert!(t.state.players[PlayerId(0)].holds(card));
        assert!(t.state.player_discard.is_empty());
        assert_eq!(
            rs.check(&t.state, PlayerId(0), &Action::ArchivistRetrieve),
            Err(Rejection::AlreadyUsed)
        );
    }
}
