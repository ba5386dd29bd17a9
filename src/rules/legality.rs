//! Action legality.
//!
//! One pure predicate per command. Predicates never mutate and never
//! panic: an illegal command yields the `Rejection` a UI would show. The
//! reducer calls `check` before every command, and `legal_actions`
//! filters its candidates through the same function, so the two can
//! never disagree.

use rustc_hash::FxHashSet;

use super::battle;
use super::cure;
use super::engine::Ruleset;
use crate::board::{CityId, Color};
use crate::cards::{CityCard, EventCard, PlayerCard};
use crate::core::{
    Action, GameState, Interrupt, Legality, Pending, Phase, Player, PlayerId, Rejection, Role,
    Variant,
};
use crate::events::targeting;

/// Most legions a role may recruit in one action.
#[must_use]
pub const fn recruit_limit(role: Role) -> u8 {
    match role {
        Role::Consul => 3,
        _ => 2,
    }
}

// === Shared Preconditions ===

pub(crate) fn ensure(condition: bool, rejection: Rejection) -> Legality {
    if condition {
        Ok(())
    } else {
        Err(rejection)
    }
}

fn variant_in(state: &GameState, variants: &[Variant]) -> Legality {
    ensure(variants.contains(&state.variant), Rejection::NotInVariant)
}

fn role_is(player: &Player, role: Role) -> Legality {
    ensure(player.role == role, Rejection::WrongRole)
}

fn known_city(rs: &Ruleset, city: CityId) -> Legality {
    ensure(rs.board().contains(city), Rejection::UnknownCity(city))
}

/// The current player, in `PlayerAction`, with nothing suspended.
fn own_turn<'s>(state: &'s GameState, player: PlayerId) -> Result<&'s Player, Rejection> {
    ensure(!state.is_over(), Rejection::GameOver)?;
    let p = state.player(player)?;
    ensure(state.pending.is_none(), Rejection::WizardBusy)?;
    ensure(state.phase == Phase::PlayerAction, Rejection::WrongPhase)?;
    ensure(player == state.current_player, Rejection::NotYourTurn)?;
    Ok(p)
}

/// `own_turn` plus an action left to spend.
fn own_action<'s>(state: &'s GameState, player: PlayerId) -> Result<&'s Player, Rejection> {
    let p = own_turn(state, player)?;
    ensure(state.actions_remaining > 0, Rejection::NoActionsLeft)?;
    Ok(p)
}

fn escort(rs: &Ruleset, state: &GameState, from: CityId, legions: u8) -> Legality {
    if legions == 0 {
        return Ok(());
    }
    variant_in(state, &[Variant::Rome])?;
    ensure(
        legions <= rs.rules().escort_limit,
        Rejection::InvalidSelection("too many legions to escort"),
    )?;
    ensure(legions <= state.legions_at(from), Rejection::NoLegions)
}

/// Cities reachable from `from` along built railroads.
#[must_use]
pub fn rail_network(state: &GameState, from: CityId) -> FxHashSet<CityId> {
    let mut seen = FxHashSet::default();
    seen.insert(from);
    let mut stack = vec![from];
    while let Some(city) = stack.pop() {
        for route in state.railroads.iter() {
            if let Some(next) = route.other(city) {
                if seen.insert(next) {
                    stack.push(next);
                }
            }
        }
    }
    seen
}

// === Setup ===

pub fn check_choose_starting_city(
    rs: &Ruleset,
    state: &GameState,
    player: PlayerId,
    city: CityId,
) -> Legality {
    ensure(state.phase == Phase::ChoosingStartingCity, Rejection::WrongPhase)?;
    state.player(player)?;
    ensure(player == state.current_player, Rejection::NotYourTurn)?;
    known_city(rs, city)
}

// === Movement ===

pub fn check_drive(
    rs: &Ruleset,
    state: &GameState,
    player: PlayerId,
    to: CityId,
    legions: u8,
) -> Legality {
    let p = own_action(state, player)?;
    known_city(rs, to)?;
    ensure(rs.board().are_adjacent(p.location, to), Rejection::NotConnected)?;
    escort(rs, state, p.location, legions)
}

pub fn check_direct_flight(rs: &Ruleset, state: &GameState, player: PlayerId, to: CityId) -> Legality {
    variant_in(state, &[Variant::Classic])?;
    let p = own_action(state, player)?;
    known_city(rs, to)?;
    ensure(p.location != to, Rejection::SameCity)?;
    ensure(p.holds_city(to), Rejection::MissingCard)
}

pub fn check_charter_flight(rs: &Ruleset, state: &GameState, player: PlayerId, to: CityId) -> Legality {
    variant_in(state, &[Variant::Classic])?;
    let p = own_action(state, player)?;
    known_city(rs, to)?;
    ensure(p.location != to, Rejection::SameCity)?;
    ensure(p.holds_city(p.location), Rejection::MissingCard)
}

pub fn check_shuttle_flight(rs: &Ruleset, state: &GameState, player: PlayerId, to: CityId) -> Legality {
    variant_in(state, &[Variant::Classic])?;
    let p = own_action(state, player)?;
    known_city(rs, to)?;
    ensure(p.location != to, Rejection::SameCity)?;
    ensure(state.has_station(p.location) && state.has_station(to), Rejection::NoStation)
}

pub fn check_operations_flight(
    rs: &Ruleset,
    state: &GameState,
    player: PlayerId,
    to: CityId,
    discard: CityCard,
) -> Legality {
    variant_in(state, &[Variant::Classic])?;
    let p = own_action(state, player)?;
    role_is(p, Role::OperationsExpert)?;
    known_city(rs, to)?;
    ensure(p.location != to, Rejection::SameCity)?;
    ensure(state.has_station(p.location), Rejection::NoStation)?;
    ensure(!state.turn.operations_flight_used, Rejection::AlreadyUsed)?;
    ensure(p.holds(PlayerCard::City(discard)), Rejection::MissingCard)
}

pub fn check_dispatch(
    rs: &Ruleset,
    state: &GameState,
    player: PlayerId,
    pawn: PlayerId,
    to: CityId,
) -> Legality {
    variant_in(state, &[Variant::Classic])?;
    let p = own_action(state, player)?;
    role_is(p, Role::Dispatcher)?;
    known_city(rs, to)?;
    let moved = state.player(pawn)?;
    ensure(moved.location != to, Rejection::SameCity)?;
    let joins_pawn = state.pawns_at(to).any(|other| other.id != pawn);
    ensure(
        joins_pawn || rs.board().are_adjacent(moved.location, to),
        Rejection::NotConnected,
    )
}

pub fn check_rail_move(rs: &Ruleset, state: &GameState, player: PlayerId, to: CityId) -> Legality {
    variant_in(state, &[Variant::Iberia])?;
    let p = own_action(state, player)?;
    known_city(rs, to)?;
    ensure(p.location != to, Rejection::SameCity)?;
    ensure(rail_network(state, p.location).contains(&to), Rejection::NotConnected)
}

/// True if the role sails without paying a card.
#[must_use]
pub const fn sails_free(role: Role) -> bool {
    matches!(role, Role::Sailor | Role::PraefectusClassis)
}

pub fn check_sail(
    rs: &Ruleset,
    state: &GameState,
    player: PlayerId,
    to: CityId,
    card: Option<CityCard>,
    legions: u8,
) -> Legality {
    variant_in(state, &[Variant::Rome, Variant::Iberia])?;
    let p = own_action(state, player)?;
    known_city(rs, to)?;
    ensure(p.location != to, Rejection::SameCity)?;
    ensure(rs.board().is_port(p.location) && rs.board().is_port(to), Rejection::NotAPort)?;
    match card {
        None => ensure(sails_free(p.role), Rejection::MissingCard)?,
        Some(fare) => {
            ensure(
                fare.color == rs.board().color(to),
                Rejection::InvalidSelection("fare must match the destination's color"),
            )?;
            ensure(p.holds(PlayerCard::City(fare)), Rejection::MissingCard)?;
        }
    }
    escort(rs, state, p.location, legions)
}

// === Board Actions ===

pub fn check_treat(state: &GameState, player: PlayerId, color: Color, keep_sample: bool) -> Legality {
    variant_in(state, &[Variant::Classic, Variant::Iberia])?;
    let p = own_action(state, player)?;
    ensure(state.cube_count(p.location, color) > 0, Rejection::NoCubes(color))?;
    if keep_sample {
        role_is(p, Role::FieldOperative)?;
        ensure(!state.turn.sample_taken, Rejection::AlreadyUsed)?;
    }
    Ok(())
}

pub fn check_cure(
    rs: &Ruleset,
    state: &GameState,
    player: PlayerId,
    color: Color,
    method: cure::CureMethod,
    cards: &[PlayerCard],
) -> Legality {
    let p = own_action(state, player)?;
    cure::check_cure(rs, state, p, color, method, cards)
}

pub fn check_build_station(state: &GameState, player: PlayerId, remove: Option<CityId>) -> Legality {
    variant_in(state, &[Variant::Classic, Variant::Rome])?;
    let p = own_action(state, player)?;
    ensure(!state.has_station(p.location), Rejection::StationExists)?;
    if p.role != Role::OperationsExpert {
        ensure(p.holds_city(p.location), Rejection::MissingCard)?;
    }
    match (state.station_supply, remove) {
        (0, None) => Err(Rejection::SupplyExhausted),
        (0, Some(old)) => ensure(state.has_station(old), Rejection::NoStation),
        (_, Some(_)) => Err(Rejection::InvalidSelection("stations remain in the supply")),
        (_, None) => Ok(()),
    }
}

pub fn check_share(
    rs: &Ruleset,
    state: &GameState,
    player: PlayerId,
    other: PlayerId,
    card: CityCard,
    give: bool,
) -> Legality {
    let p = own_action(state, player)?;
    let o = state.player(other)?;
    ensure(player != other, Rejection::InvalidSelection("cannot share with yourself"))?;

    let (giver, taker) = if give { (p, o) } else { (o, p) };
    let remote = give && p.role == Role::Politician;
    ensure(remote || p.location == o.location, Rejection::NotTogether)?;
    ensure(giver.holds(PlayerCard::City(card)), Rejection::MissingCard)?;

    let here = p.location;
    let matches_city = card.city == here;
    let researcher = giver.role == Role::Researcher;
    let mercator = (giver.role == Role::Mercator || taker.role == Role::Mercator)
        && card.color == rs.board().color(here);
    ensure(
        matches_city || researcher || mercator || remote,
        Rejection::InvalidSelection("card must match the current city"),
    )
}

pub fn check_build_railroad(
    rs: &Ruleset,
    state: &GameState,
    player: PlayerId,
    to: CityId,
    extend: Option<CityId>,
) -> Legality {
    variant_in(state, &[Variant::Iberia])?;
    let p = own_action(state, player)?;
    known_city(rs, to)?;
    let board = rs.board();
    ensure(board.are_adjacent(p.location, to), Rejection::NotConnected)?;
    let first = crate::board::Route::new(p.location, to);
    ensure(
        !state.railroads.contains(&first),
        Rejection::InvalidSelection("track already laid"),
    )?;

    let Some(next) = extend else {
        return ensure(state.railroad_supply >= 1, Rejection::SupplyExhausted);
    };
    role_is(p, Role::Railwayman)?;
    known_city(rs, next)?;
    ensure(next != p.location && board.are_adjacent(to, next), Rejection::NotConnected)?;
    ensure(
        !state.railroads.contains(&crate::board::Route::new(to, next)),
        Rejection::InvalidSelection("track already laid"),
    )?;
    ensure(state.railroad_supply >= 2, Rejection::SupplyExhausted)
}

pub fn check_build_hospital(rs: &Ruleset, state: &GameState, player: PlayerId) -> Legality {
    variant_in(state, &[Variant::Iberia])?;
    let p = own_action(state, player)?;
    let color = rs.board().color(p.location);
    ensure(state.hospitals[color] != Some(p.location), Rejection::StationExists)?;
    ensure(p.holds_city(p.location), Rejection::MissingCard)
}

pub fn check_purify(rs: &Ruleset, state: &GameState, player: PlayerId, discard: CityCard) -> Legality {
    variant_in(state, &[Variant::Iberia])?;
    let p = own_action(state, player)?;
    ensure(p.holds(PlayerCard::City(discard)), Rejection::MissingCard)?;
    ensure(
        discard.color == rs.board().color(p.location),
        Rejection::InvalidSelection("card must match the city's color"),
    )?;
    ensure(state.purification_supply > 0, Rejection::SupplyExhausted)
}

pub fn check_prevention_token(
    rs: &Ruleset,
    state: &GameState,
    player: PlayerId,
    city: CityId,
) -> Legality {
    variant_in(state, &[Variant::Iberia])?;
    let p = own_action(state, player)?;
    role_is(p, Role::Nurse)?;
    known_city(rs, city)?;
    ensure(
        city == p.location || rs.board().are_adjacent(p.location, city),
        Rejection::NotConnected,
    )?;
    ensure(
        state.prevention_token != Some(city),
        Rejection::InvalidSelection("the token is already there"),
    )
}

pub fn check_recruit(state: &GameState, player: PlayerId, count: u8) -> Legality {
    variant_in(state, &[Variant::Rome])?;
    let p = own_action(state, player)?;
    ensure(state.has_station(p.location), Rejection::NoStation)?;
    ensure(
        (1..=recruit_limit(p.role)).contains(&count),
        Rejection::InvalidSelection("recruit count out of range"),
    )?;
    ensure(state.legion_supply >= count, Rejection::SupplyExhausted)
}

pub fn check_battle(rs: &Ruleset, state: &GameState, player: PlayerId, dice: u8) -> Legality {
    variant_in(state, &[Variant::Rome])?;
    let p = own_action(state, player)?;
    let legions = state.legions_at(p.location);
    ensure(legions > 0, Rejection::NoLegions)?;
    ensure(!state.city_cubes(p.location).is_empty(), Rejection::NoBarbarians)?;
    let max = legions.min(rs.rules().battle_dice);
    ensure((1..=max).contains(&dice), Rejection::TooManyDice(max))
}

pub fn check_enlist(state: &GameState, player: PlayerId, color: Color) -> Legality {
    variant_in(state, &[Variant::Rome])?;
    let p = own_action(state, player)?;
    ensure(state.is_cured(color), Rejection::NotCured(color))?;
    ensure(state.cube_count(p.location, color) > 0, Rejection::NoCubes(color))?;
    ensure(state.legion_supply > 0, Rejection::SupplyExhausted)
}

// === Role Abilities ===

pub fn check_contingency_take(state: &GameState, player: PlayerId, card: EventCard) -> Legality {
    variant_in(state, &[Variant::Classic])?;
    let p = own_action(state, player)?;
    role_is(p, Role::ContingencyPlanner)?;
    ensure(p.stash.is_none(), Rejection::InvalidSelection("an event is already stored"))?;
    ensure(
        state.player_discard.contains(&PlayerCard::Event(card)),
        Rejection::MissingCard,
    )
}

pub fn check_epidemiologist_take(
    state: &GameState,
    player: PlayerId,
    from: PlayerId,
    card: CityCard,
) -> Legality {
    variant_in(state, &[Variant::Classic])?;
    let p = own_turn(state, player)?;
    role_is(p, Role::Epidemiologist)?;
    ensure(!state.turn.epidemiologist_used, Rejection::AlreadyUsed)?;
    let o = state.player(from)?;
    ensure(from != player, Rejection::InvalidSelection("cannot take from yourself"))?;
    ensure(o.location == p.location, Rejection::NotTogether)?;
    ensure(o.holds(PlayerCard::City(card)), Rejection::MissingCard)
}

pub fn check_archivist_retrieve(state: &GameState, player: PlayerId) -> Legality {
    variant_in(state, &[Variant::Classic])?;
    let p = own_action(state, player)?;
    role_is(p, Role::Archivist)?;
    ensure(!state.turn.archivist_used, Rejection::AlreadyUsed)?;
    ensure(
        state.player_discard.iter().any(|c| c.is_city(p.location)),
        Rejection::MissingCard,
    )
}

// === Interrupts and Turn Flow ===

pub fn check_battle_removals(state: &GameState, player: PlayerId, removals: &[(Color, u8)]) -> Legality {
    ensure(!state.is_over(), Rejection::GameOver)?;
    ensure(
        state.phase == Phase::Resolving(Interrupt::BattleRemoval),
        Rejection::WrongPhase,
    )?;
    ensure(player == state.current_player, Rejection::NotYourTurn)?;
    battle::check_removals(state, removals)
}

pub fn check_end_actions(state: &GameState, player: PlayerId) -> Legality {
    own_turn(state, player).map(|_| ())
}

pub fn check_draw(state: &GameState, player: PlayerId) -> Legality {
    ensure(!state.is_over(), Rejection::GameOver)?;
    state.player(player)?;
    ensure(state.pending.is_none(), Rejection::WizardBusy)?;
    ensure(state.phase == Phase::PreDrawPlayerCards, Rejection::WrongPhase)?;
    ensure(player == state.current_player, Rejection::NotYourTurn)
}

pub fn check_infect(state: &GameState, player: PlayerId) -> Legality {
    ensure(!state.is_over(), Rejection::GameOver)?;
    state.player(player)?;
    ensure(state.pending.is_none(), Rejection::WizardBusy)?;
    ensure(state.phase == Phase::InfectionStep, Rejection::WrongPhase)?;
    ensure(player == state.current_player, Rejection::NotYourTurn)
}

/// Any player may close an optional window.
pub fn check_continue(state: &GameState, player: PlayerId) -> Legality {
    ensure(!state.is_over(), Rejection::GameOver)?;
    state.player(player)?;
    ensure(state.pending.is_none(), Rejection::WizardBusy)?;
    ensure(
        matches!(
            state.phase,
            Phase::PostEpidemicEventWindow | Phase::Resolving(Interrupt::PostCure(_))
        ),
        Rejection::WrongPhase,
    )
}

pub fn check_discard(state: &GameState, player: PlayerId, card: PlayerCard) -> Legality {
    ensure(!state.is_over(), Rejection::GameOver)?;
    let p = state.player(player)?;
    ensure(state.pending.is_none(), Rejection::WizardBusy)?;
    ensure(state.phase == Phase::Discard, Rejection::WrongPhase)?;
    ensure(p.over_limit(), Rejection::NotOverLimit)?;
    ensure(p.holds(card), Rejection::MissingCard)
}

/// Undo is possible before the draw, with nothing suspended.
pub fn check_undo(state: &GameState) -> Legality {
    ensure(!state.is_over(), Rejection::GameOver)?;
    ensure(state.pending.is_none(), Rejection::WizardBusy)?;
    ensure(state.phase.allows_undo(), Rejection::WrongPhase)
}

fn check_wizard_owner(state: &GameState, player: PlayerId) -> Legality {
    match &state.pending {
        Some(Pending::Event(w)) => ensure(w.player == player, Rejection::NotYourTurn),
        _ => Err(Rejection::NoWizard),
    }
}

/// Check any command.
pub fn check(rs: &Ruleset, state: &GameState, player: PlayerId, action: &Action) -> Legality {
    match action {
        Action::ChooseStartingCity { city } => check_choose_starting_city(rs, state, player, *city),
        Action::Drive { to, legions } => check_drive(rs, state, player, *to, *legions),
        Action::DirectFlight { to } => check_direct_flight(rs, state, player, *to),
        Action::CharterFlight { to } => check_charter_flight(rs, state, player, *to),
        Action::ShuttleFlight { to } => check_shuttle_flight(rs, state, player, *to),
        Action::OperationsFlight { to, discard } => {
            check_operations_flight(rs, state, player, *to, *discard)
        }
        Action::DispatchToPawn { pawn, to } => check_dispatch(rs, state, player, *pawn, *to),
        Action::RailMove { to } => check_rail_move(rs, state, player, *to),
        Action::Sail { to, card, legions } => check_sail(rs, state, player, *to, *card, *legions),
        Action::Treat { color, keep_sample } => check_treat(state, player, *color, *keep_sample),
        Action::Cure {
            color,
            method,
            cards,
        } => check_cure(rs, state, player, *color, *method, cards),
        Action::BuildStation { remove } => check_build_station(state, player, *remove),
        Action::ShareKnowledge { other, card, give } => {
            check_share(rs, state, player, *other, *card, *give)
        }
        Action::BuildRailroad { to, extend } => {
            check_build_railroad(rs, state, player, *to, *extend)
        }
        Action::BuildHospital => check_build_hospital(rs, state, player),
        Action::Purify { discard } => check_purify(rs, state, player, *discard),
        Action::PlacePreventionToken { city } => check_prevention_token(rs, state, player, *city),
        Action::Recruit { count } => check_recruit(state, player, *count),
        Action::Battle { dice } => check_battle(rs, state, player, *dice),
        Action::Enlist { color } => check_enlist(state, player, *color),
        Action::ContingencyTake { card } => check_contingency_take(state, player, *card),
        Action::EpidemiologistTake { from, card } => {
            check_epidemiologist_take(state, player, *from, *card)
        }
        Action::ArchivistRetrieve => check_archivist_retrieve(state, player),
        Action::PlayEvent { card } => targeting::check_play(state, player, *card),
        Action::SubmitSelection { selection } => {
            check_wizard_owner(state, player)?;
            targeting::check_selection(rs, state, selection)
        }
        Action::WizardBack => {
            check_wizard_owner(state, player)?;
            match &state.pending {
                Some(Pending::Event(w)) if !w.selections.is_empty() => Ok(()),
                _ => Err(Rejection::InvalidSelection("nothing to go back to")),
            }
        }
        Action::ConfirmEvent => {
            check_wizard_owner(state, player)?;
            targeting::check_complete(rs, state)
        }
        Action::CancelEvent => {
            state.player(player)?;
            match &state.pending {
                Some(Pending::Event(w)) => ensure(w.player == player, Rejection::NotYourTurn),
                _ => Ok(()),
            }
        }
        Action::ChooseBattleRemovals { removals } => check_battle_removals(state, player, removals),
        Action::EndActions => check_end_actions(state, player),
        Action::DrawPlayerCards => check_draw(state, player),
        Action::Continue => check_continue(state, player),
        Action::Discard { card } => check_discard(state, player, *card),
        Action::InfectCities => check_infect(state, player),
        Action::Undo => {
            state.player(player)?;
            check_undo(state)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;

    fn setup(variant: Variant, roles: Vec<Role>) -> (Ruleset, GameState) {
        let config = GameConfig::new(variant).with_roles(roles);
        let rs = Ruleset::new(config).unwrap();
        let mut state = GameState::new(rs.config(), rs.board().start());
        state.phase = Phase::PlayerAction;
        (rs, state)
    }

    fn card(rs: &Ruleset, name: &str) -> CityCard {
        let city = rs.board().id(name).unwrap();
        CityCard::new(city, rs.board().color(city))
    }

    #[test]
    fn test_drive_requires_adjacency() {
        let (rs, state) = setup(Variant::Classic, vec![Role::Medic, Role::Scientist]);
        let chicago = rs.board().id("Chicago").unwrap();
        let tokyo = rs.board().id("Tokyo").unwrap();
        assert!(check_drive(&rs, &state, PlayerId(0), chicago, 0).is_ok());
        assert_eq!(
            check_drive(&rs, &state, PlayerId(0), tokyo, 0),
            Err(Rejection::NotConnected)
        );
    }

    #[test]
    fn test_only_current_player_acts() {
        let (rs, state) = setup(Variant::Classic, vec![Role::Medic, Role::Scientist]);
        let chicago = rs.board().id("Chicago").unwrap();
        assert_eq!(
            check_drive(&rs, &state, PlayerId(1), chicago, 0),
            Err(Rejection::NotYourTurn)
        );
        assert_eq!(
            check_drive(&rs, &state, PlayerId(7), chicago, 0),
            Err(Rejection::UnknownPlayer)
        );
    }

    #[test]
    fn test_no_actions_left() {
        let (rs, mut state) = setup(Variant::Classic, vec![Role::Medic, Role::Scientist]);
        state.actions_remaining = 0;
        let chicago = rs.board().id("Chicago").unwrap();
        assert_eq!(
            check_drive(&rs, &state, PlayerId(0), chicago, 0),
            Err(Rejection::NoActionsLeft)
        );
    }

    #[test]
    fn test_flights_need_cards() {
        let (rs, mut state) = setup(Variant::Classic, vec![Role::Medic, Role::Scientist]);
        let tokyo = card(&rs, "Tokyo");
        assert_eq!(
            check_direct_flight(&rs, &state, PlayerId(0), tokyo.city),
            Err(Rejection::MissingCard)
        );
        state.players[PlayerId(0)].hand.push_back(PlayerCard::City(tokyo));
        assert!(check_direct_flight(&rs, &state, PlayerId(0), tokyo.city).is_ok());
    }

    #[test]
    fn test_flights_not_in_rome() {
        let (rs, state) = setup(Variant::Rome, vec![Role::Consul, Role::Mercator]);
        assert_eq!(
            check_charter_flight(&rs, &state, PlayerId(0), CityId(0)),
            Err(Rejection::NotInVariant)
        );
    }

    #[test]
    fn test_role_gated_ability() {
        let (rs, mut state) = setup(Variant::Classic, vec![Role::Medic, Role::Scientist]);
        state.stations.insert(rs.board().start());
        let paris = card(&rs, "Paris");
        state.players[PlayerId(0)].hand.push_back(PlayerCard::City(paris));
        assert_eq!(
            check_operations_flight(&rs, &state, PlayerId(0), paris.city, paris),
            Err(Rejection::WrongRole)
        );
    }

    #[test]
    fn test_share_knowledge_matches_city() {
        let (rs, mut state) = setup(Variant::Classic, vec![Role::Medic, Role::Scientist]);
        let atlanta = card(&rs, "Atlanta");
        let paris = card(&rs, "Paris");
        state.players[PlayerId(0)].hand.push_back(PlayerCard::City(atlanta));
        state.players[PlayerId(0)].hand.push_back(PlayerCard::City(paris));

        assert!(check_share(&rs, &state, PlayerId(0), PlayerId(1), atlanta, true).is_ok());
        assert!(check_share(&rs, &state, PlayerId(0), PlayerId(1), paris, true).is_err());
        assert_eq!(
            check_share(&rs, &state, PlayerId(0), PlayerId(1), atlanta, false),
            Err(Rejection::MissingCard)
        );
    }

    #[test]
    fn test_researcher_gives_any_card() {
        let (rs, mut state) = setup(Variant::Classic, vec![Role::Researcher, Role::Scientist]);
        let paris = card(&rs, "Paris");
        state.players[PlayerId(0)].hand.push_back(PlayerCard::City(paris));
        assert!(check_share(&rs, &state, PlayerId(0), PlayerId(1), paris, true).is_ok());
    }

    #[test]
    fn test_battle_dice_limits() {
        let (rs, mut state) = setup(Variant::Rome, vec![Role::Consul, Role::Mercator]);
        let roma = rs.board().start();
        assert_eq!(check_battle(&rs, &state, PlayerId(0), 1), Err(Rejection::NoLegions));
        state.add_legions(roma, 2);
        assert_eq!(check_battle(&rs, &state, PlayerId(0), 1), Err(Rejection::NoBarbarians));
        state.add_cube(roma, Color::Red);
        assert!(check_battle(&rs, &state, PlayerId(0), 2).is_ok());
        assert_eq!(check_battle(&rs, &state, PlayerId(0), 3), Err(Rejection::TooManyDice(2)));
    }

    #[test]
    fn test_rail_network_reaches_along_track() {
        let (rs, mut state) = setup(Variant::Iberia, vec![Role::Railwayman, Role::Nurse]);
        let madrid = rs.board().id("Madrid").unwrap();
        let zaragoza = rs.board().id("Zaragoza").unwrap();
        let barcelona = rs.board().id("Barcelona").unwrap();
        state.railroads.insert(crate::board::Route::new(madrid, zaragoza));
        state.railroads.insert(crate::board::Route::new(zaragoza, barcelona));

        assert!(check_rail_move(&rs, &state, PlayerId(0), barcelona).is_ok());
        let valencia = rs.board().id("Valencia").unwrap();
        assert_eq!(
            check_rail_move(&rs, &state, PlayerId(0), valencia),
            Err(Rejection::NotConnected)
        );
    }

    #[test]
    fn test_station_supply_relocation() {
        let (rs, mut state) = setup(Variant::Classic, vec![Role::OperationsExpert, Role::Medic]);
        let paris = rs.board().id("Paris").unwrap();
        state.station_supply = 0;
        state.stations.insert(paris);
        assert_eq!(
            check_build_station(&state, PlayerId(0), None),
            Err(Rejection::SupplyExhausted)
        );
        assert!(check_build_station(&state, PlayerId(0), Some(paris)).is_ok());
    }

    #[test]
    fn test_undo_window() {
        let (_, mut state) = setup(Variant::Classic, vec![Role::Medic, Role::Scientist]);
        assert!(check_undo(&state).is_ok());
        state.phase = Phase::InfectionStep;
        assert_eq!(check_undo(&state), Err(Rejection::WrongPhase));
    }
}
