//! Wizard parameter plans and validation.
//!
//! `plan` lists every parameter the card needs given the selections so
//! far; it grows as choices are made (a Railway Expansion asks for as many
//! routes as the quantity picked). `validate` checks one value against
//! the next slot, and `options` enumerates the valid values for slots
//! with a finite domain.

use rustc_hash::FxHashSet;

use super::{EventMode, EventWizard, ParamKind, Selection};
use crate::board::{CityId, Color, Route, ALL_COLORS};
use crate::cards::{EventCard, EventTiming, PlayerCard};
use crate::core::{GameState, Interrupt, Legality, Pending, Phase, PlayerId, Rejection, Role};
use crate::rules::battle::DIE_FACES;
use crate::rules::engine::Ruleset;
use crate::rules::legality::ensure;

const FORECAST_DEPTH: usize = 6;
const SIBYLLINE_DEPTH: usize = 3;
const VACCINE_CUBES: u8 = 5;
const REMOTE_CUBES: u8 = 2;
const EXPANSION_ROUTES: u8 = 3;

/// The color just cured, while the post-cure window is open.
#[must_use]
pub fn post_cure_color(state: &GameState) -> Option<Color> {
    let window = |phase: Phase| match phase {
        Phase::Resolving(Interrupt::PostCure(color)) => Some(color),
        _ => None,
    };
    window(state.phase).or_else(|| state.phase_stack.last().copied().and_then(window))
}

/// Every parameter the card needs, in order, given the selections so far.
#[must_use]
pub fn plan(rs: &Ruleset, state: &GameState, wizard: &EventWizard) -> Vec<ParamKind> {
    use EventCard as E;
    use ParamKind as K;

    let mut plan = Vec::new();
    if wizard.card.is_dual_mode() {
        plan.push(K::Mode);
        if wizard.mode().is_none() {
            return plan;
        }
    }
    let corrupt = wizard.mode() == Some(EventMode::Corrupt);
    let twice = if corrupt { 2 } else { 1 };

    match wizard.card {
        E::Airlift | E::ShipRequisition => plan.extend([K::Player, K::City]),
        E::GovernmentGrant => {
            plan.push(K::City);
            if state.station_supply == 0 {
                plan.push(K::City);
            }
        }
        E::OneQuietNight
        | E::BorrowedTime
        | E::CommercialTravelBan
        | E::MobileHospital
        | E::PaxRomana => {}
        E::ResilientPopulation => plan.push(K::InfectionCard),
        E::Forecast => plan.push(K::Permutation {
            len: state.infection_deck.len().min(FORECAST_DEPTH),
        }),
        E::RapidVaccineDeployment => plan.push(K::CubePicks { max: VACCINE_CUBES }),
        E::ReExaminedResearch => plan.push(K::PlayerCard),
        E::RemoteTreatment => plan.push(K::CubePicks { max: REMOTE_CUBES }),
        E::NewAssignment => plan.extend([K::Player, K::Role]),
        E::RailwayExpansion => {
            plan.push(K::Quantity {
                min: 1,
                max: state.railroad_supply.min(EXPANSION_ROUTES),
            });
            if let Some(Selection::Quantity(n)) = wizard.params().first() {
                plan.extend(std::iter::repeat(K::Route).take(usize::from(*n)));
            }
        }
        E::HolyWater | E::Conscription | E::Praetorians => plan.push(K::City),
        E::Telegraph => plan.extend([K::Player, K::PlayerCard]),
        E::FieldHospital => plan.extend([K::City, K::Color]),
        E::Augury => plan.push(K::Dice {
            max: rs.rules().battle_dice,
        }),
        E::Tribute if corrupt => plan.push(K::City),
        E::Tribute => plan.extend([K::City, K::Color]),
        E::ImperialSummons if corrupt => plan.extend([K::Player, K::City]),
        E::ImperialSummons => plan.push(K::Player),
        E::SibyllineBooks => {
            let depth = if corrupt { FORECAST_DEPTH } else { SIBYLLINE_DEPTH };
            plan.push(K::Permutation {
                len: state.infection_deck.len().min(depth),
            });
        }
        E::PanemEtCircenses => plan.extend(std::iter::repeat(K::PlayerCard).take(twice)),
        E::HadriansWall => plan.extend(std::iter::repeat(K::InfectionCard).take(twice)),
    }
    plan
}

/// The parameter the wizard asks for next, or `None` when complete.
#[must_use]
pub fn next_param(rs: &Ruleset, state: &GameState, wizard: &EventWizard) -> Option<ParamKind> {
    plan(rs, state, wizard).get(wizard.selections.len()).copied()
}

fn wizard(state: &GameState) -> Result<&EventWizard, Rejection> {
    match &state.pending {
        Some(Pending::Event(w)) => Ok(w),
        _ => Err(Rejection::NoWizard),
    }
}

/// Check a selection against the open wizard.
pub fn check_selection(rs: &Ruleset, state: &GameState, selection: &Selection) -> Legality {
    validate(rs, state, wizard(state)?, selection)
}

/// Check that the open wizard has every parameter it needs.
pub fn check_complete(rs: &Ruleset, state: &GameState) -> Legality {
    let w = wizard(state)?;
    ensure(next_param(rs, state, w).is_none(), Rejection::WizardIncomplete)
}

/// Check a selection for the next slot of `wizard`.
pub fn validate(
    rs: &Ruleset,
    state: &GameState,
    wizard: &EventWizard,
    selection: &Selection,
) -> Legality {
    let kind = next_param(rs, state, wizard)
        .ok_or(Rejection::InvalidSelection("no further selections"))?;
    ensure(selection.fits(kind), Rejection::InvalidSelection("wrong kind of selection"))?;
    let params = wizard.params();

    match (selection, kind) {
        (Selection::Mode(_), _) => Ok(()),
        (Selection::Player(p), _) => {
            state.player(*p)?;
            ensure(
                wizard.card != EventCard::Telegraph || *p != wizard.player,
                Rejection::InvalidSelection("cannot send to yourself"),
            )
        }
        (Selection::City(city), _) => validate_city(rs, state, wizard, *city),
        (Selection::Color(color), _) => {
            let Some(Selection::City(city)) = params.first() else {
                return Err(Rejection::InvalidSelection("choose a city first"));
            };
            ensure(state.cube_count(*city, *color) > 0, Rejection::NoCubes(*color))
        }
        (Selection::Quantity(n), ParamKind::Quantity { min, max }) => ensure(
            (min..=max).contains(n),
            Rejection::InvalidSelection("quantity out of range"),
        ),
        (Selection::InfectionCard(card), _) => {
            let chosen = params.iter().filter(|s| *s == selection).count();
            let available = state.infection_discard.iter().filter(|c| *c == card).count();
            ensure(chosen < available, Rejection::MissingCard)
        }
        (Selection::PlayerCard(card), _) => validate_player_card(state, wizard, *card),
        (Selection::Permutation(order), ParamKind::Permutation { len }) => {
            ensure(order.len() == len, Rejection::InvalidSelection("wrong number of cards"))?;
            let mut proposed = order.clone();
            let mut top: Vec<_> = state.infection_deck.iter().take(len).copied().collect();
            proposed.sort();
            top.sort();
            ensure(
                proposed == top,
                Rejection::InvalidSelection("not a reordering of the top cards"),
            )
        }
        (Selection::CubePicks(picks), ParamKind::CubePicks { max }) => {
            validate_picks(rs, state, wizard.card, picks, max)
        }
        (Selection::Dice(faces), ParamKind::Dice { max }) => ensure(
            !faces.is_empty() && faces.len() <= usize::from(max),
            Rejection::TooManyDice(max),
        ),
        (Selection::Role(role), _) => {
            ensure(role.in_variant(state.variant), Rejection::NotInVariant)?;
            ensure(
                state.players.values().all(|p| p.role != *role),
                Rejection::InvalidSelection("role already in play"),
            )
        }
        (Selection::Route(route), _) => {
            ensure(rs.board().are_adjacent(route.a, route.b), Rejection::NotConnected)?;
            ensure(
                !state.railroads.contains(route) && !params.contains(selection),
                Rejection::InvalidSelection("track already laid"),
            )
        }
        _ => Err(Rejection::InvalidSelection("wrong kind of selection")),
    }
}

fn pawn(params: &[Selection]) -> Result<PlayerId, Rejection> {
    match params.first() {
        Some(Selection::Player(p)) => Ok(*p),
        _ => Err(Rejection::InvalidSelection("choose a player first")),
    }
}

fn validate_city(rs: &Ruleset, state: &GameState, wizard: &EventWizard, city: CityId) -> Legality {
    ensure(rs.board().contains(city), Rejection::UnknownCity(city))?;
    let params = wizard.params();
    match wizard.card {
        EventCard::Airlift | EventCard::ImperialSummons => {
            let moved = state.player(pawn(params)?)?;
            ensure(moved.location != city, Rejection::SameCity)
        }
        EventCard::ShipRequisition => {
            let moved = state.player(pawn(params)?)?;
            ensure(moved.location != city, Rejection::SameCity)?;
            ensure(rs.board().is_port(city), Rejection::NotAPort)
        }
        EventCard::GovernmentGrant if params.is_empty() => {
            ensure(!state.has_station(city), Rejection::StationExists)
        }
        EventCard::GovernmentGrant => {
            ensure(state.has_station(city), Rejection::NoStation)?;
            ensure(
                params.first() != Some(&Selection::City(city)),
                Rejection::SameCity,
            )
        }
        EventCard::HolyWater => ensure(state.purification_supply > 0, Rejection::SupplyExhausted),
        EventCard::FieldHospital | EventCard::Tribute => ensure(
            !state.city_cubes(city).is_empty(),
            Rejection::InvalidSelection("no cubes there"),
        ),
        EventCard::Conscription => {
            ensure(state.has_station(city), Rejection::NoStation)?;
            ensure(state.legion_supply > 0, Rejection::SupplyExhausted)
        }
        EventCard::Praetorians => {
            ensure(!state.has_station(city), Rejection::StationExists)?;
            ensure(state.station_supply > 0, Rejection::SupplyExhausted)
        }
        _ => Err(Rejection::InvalidSelection("this card takes no city")),
    }
}

fn validate_player_card(state: &GameState, wizard: &EventWizard, card: PlayerCard) -> Legality {
    match wizard.card {
        EventCard::Telegraph => {
            let giver = state.player(wizard.player)?;
            ensure(card.city().is_some(), Rejection::InvalidSelection("only city cards"))?;
            ensure(giver.holds(card), Rejection::MissingCard)
        }
        EventCard::ReExaminedResearch => {
            ensure(card.city().is_some(), Rejection::InvalidSelection("only city cards"))?;
            ensure(state.player_discard.contains(&card), Rejection::MissingCard)
        }
        EventCard::PanemEtCircenses => {
            let chosen = wizard
                .params()
                .iter()
                .filter(|s| **s == Selection::PlayerCard(card))
                .count();
            let available = state.player_discard.iter().filter(|c| **c == card).count();
            ensure(chosen < available, Rejection::MissingCard)
        }
        _ => Err(Rejection::InvalidSelection("this card takes no player card")),
    }
}

fn validate_picks(
    rs: &Ruleset,
    state: &GameState,
    card: EventCard,
    picks: &[(CityId, Color, u8)],
    max: u8,
) -> Legality {
    let total: u32 = picks.iter().map(|&(_, _, n)| u32::from(n)).sum();
    ensure(
        (1..=u32::from(max)).contains(&total),
        Rejection::InvalidSelection("cube count out of range"),
    )?;

    let mut seen = FxHashSet::default();
    for &(city, color, n) in picks {
        ensure(rs.board().contains(city), Rejection::UnknownCity(city))?;
        ensure(n > 0, Rejection::InvalidSelection("empty pick"))?;
        ensure(seen.insert((city, color)), Rejection::InvalidSelection("pick listed twice"))?;
        ensure(n <= state.cube_count(city, color), Rejection::NoCubes(color))?;
    }

    if card == EventCard::RapidVaccineDeployment {
        let cured = post_cure_color(state).ok_or(Rejection::WrongPhase)?;
        ensure(
            picks.iter().all(|&(_, color, _)| color == cured),
            Rejection::InvalidSelection("only the cured color"),
        )?;
        let cities: Vec<CityId> = picks.iter().map(|&(city, _, _)| city).collect();
        ensure(
            connected(rs, &cities),
            Rejection::InvalidSelection("cities must be connected"),
        )?;
    }
    Ok(())
}

/// True if `cities` form one connected group on the board.
fn connected(rs: &Ruleset, cities: &[CityId]) -> bool {
    let Some(&first) = cities.first() else {
        return true;
    };
    let members: FxHashSet<CityId> = cities.iter().copied().collect();
    let mut reached = FxHashSet::default();
    reached.insert(first);
    let mut stack = vec![first];
    while let Some(city) = stack.pop() {
        for &next in rs.board().neighbors(city) {
            if members.contains(&next) && reached.insert(next) {
                stack.push(next);
            }
        }
    }
    reached.len() == members.len()
}

/// Valid values for the next slot.
///
/// Free-form slots get a representative: the current order for a
/// permutation, single cubes for picks, one die of each face.
#[must_use]
pub fn options(rs: &Ruleset, state: &GameState, wizard: &EventWizard) -> Vec<Selection> {
    let Some(kind) = next_param(rs, state, wizard) else {
        return Vec::new();
    };
    let board = rs.board();
    let candidates: Vec<Selection> = match kind {
        ParamKind::Mode => vec![
            Selection::Mode(EventMode::Normal),
            Selection::Mode(EventMode::Corrupt),
        ],
        ParamKind::Player => state.players.player_ids().map(Selection::Player).collect(),
        ParamKind::City => board.cities().map(Selection::City).collect(),
        ParamKind::Color => ALL_COLORS.into_iter().map(Selection::Color).collect(),
        ParamKind::Quantity { min, max } => (min..=max).map(Selection::Quantity).collect(),
        ParamKind::InfectionCard => state
            .infection_discard
            .iter()
            .map(|&c| Selection::InfectionCard(c))
            .collect(),
        ParamKind::PlayerCard if wizard.card == EventCard::Telegraph => state
            .players
            .get(wizard.player)
            .map(|p| p.hand.iter().map(|&c| Selection::PlayerCard(c)).collect())
            .unwrap_or_default(),
        ParamKind::PlayerCard => state
            .player_discard
            .iter()
            .map(|&c| Selection::PlayerCard(c))
            .collect(),
        ParamKind::Permutation { len } => vec![Selection::Permutation(
            state.infection_deck.iter().take(len).copied().collect(),
        )],
        ParamKind::CubePicks { .. } => state
            .cubes
            .iter()
            .flat_map(|(&city, cubes)| {
                cubes
                    .iter()
                    .filter(|(_, n)| **n > 0)
                    .map(move |(color, _)| Selection::CubePicks(vec![(city, color, 1)]))
            })
            .collect(),
        ParamKind::Dice { .. } => {
            let mut faces = Vec::new();
            for face in DIE_FACES {
                if !faces.contains(&face) {
                    faces.push(face);
                }
            }
            faces.into_iter().map(|f| Selection::Dice(vec![f])).collect()
        }
        ParamKind::Role => Role::ALL.into_iter().map(Selection::Role).collect(),
        ParamKind::Route => board
            .cities()
            .flat_map(|a| {
                board
                    .neighbors(a)
                    .iter()
                    .filter(move |&&b| a < b)
                    .map(move |&b| Selection::Route(Route::new(a, b)))
            })
            .collect(),
    };

    let mut valid = Vec::new();
    for selection in candidates {
        if !valid.contains(&selection) && validate(rs, state, wizard, &selection).is_ok() {
            valid.push(selection);
        }
    }
    valid
}

/// True if the card has something to act on.
fn has_targets(state: &GameState, card: EventCard) -> bool {
    match card {
        EventCard::RailwayExpansion => state.railroad_supply > 0,
        EventCard::HolyWater => state.purification_supply > 0,
        EventCard::ResilientPopulation | EventCard::HadriansWall => {
            !state.infection_discard.is_empty()
        }
        EventCard::ReExaminedResearch => state.player_discard.iter().any(|c| c.city().is_some()),
        EventCard::PanemEtCircenses => !state.player_discard.is_empty(),
        _ => true,
    }
}

/// Check that `player` may start playing `card` now.
pub fn check_play(state: &GameState, player: PlayerId, card: EventCard) -> Legality {
    ensure(!state.is_over(), Rejection::GameOver)?;
    let p = state.player(player)?;
    ensure(state.pending.is_none(), Rejection::WizardBusy)?;
    ensure(card.in_variant(state.variant), Rejection::NotInVariant)?;
    ensure(p.can_reach_event(card), Rejection::MissingCard)?;

    let open = match card.timing() {
        EventTiming::Anytime => matches!(
            state.phase,
            Phase::PlayerAction
                | Phase::PreDrawPlayerCards
                | Phase::Discard
                | Phase::PostEpidemicEventWindow
                | Phase::InfectionStep
        ),
        EventTiming::OwnActions => {
            state.phase == Phase::PlayerAction && player == state.current_player
        }
        EventTiming::AfterCure => matches!(state.phase, Phase::Resolving(Interrupt::PostCure(_))),
    };
    ensure(open, Rejection::WrongPhase)?;
    ensure(has_targets(state, card), Rejection::InvalidSelection("nothing to target"))
}
