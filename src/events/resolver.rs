//! Event effects.
//!
//! `resolve` runs after the wizard is confirmed and every selection has
//! been validated, so a malformed wizard here is an engine defect and is
//! reported as `InvalidSelection` rather than silently ignored.

use tracing::debug;

use super::targeting::post_cure_color;
use super::{EventMode, EventWizard, Selection};
use crate::board::{CityId, Color, Route, ALL_COLORS};
use crate::cards::EventCard as E;
use crate::cards::{InfectionCard, PlayerCard};
use crate::core::{DiceOverride, GameEvent, GameState, PlayerId, Rejection, Role};
use crate::rules::battle::DieFace;
use crate::rules::effects;
use crate::rules::engine::Ruleset;

const MALFORMED: Rejection = Rejection::InvalidSelection("incomplete event selections");

fn player_at(params: &[Selection], i: usize) -> Result<PlayerId, Rejection> {
    match params.get(i) {
        Some(Selection::Player(p)) => Ok(*p),
        _ => Err(MALFORMED),
    }
}

fn city_at(params: &[Selection], i: usize) -> Result<CityId, Rejection> {
    match params.get(i) {
        Some(Selection::City(c)) => Ok(*c),
        _ => Err(MALFORMED),
    }
}

fn color_at(params: &[Selection], i: usize) -> Result<Color, Rejection> {
    match params.get(i) {
        Some(Selection::Color(c)) => Ok(*c),
        _ => Err(MALFORMED),
    }
}

fn infection_cards(params: &[Selection]) -> Vec<InfectionCard> {
    params
        .iter()
        .filter_map(|s| match s {
            Selection::InfectionCard(c) => Some(*c),
            _ => None,
        })
        .collect()
}

fn player_cards(params: &[Selection]) -> Vec<PlayerCard> {
    params
        .iter()
        .filter_map(|s| match s {
            Selection::PlayerCard(c) => Some(*c),
            _ => None,
        })
        .collect()
}

/// Apply a confirmed wizard.
pub fn resolve(
    rs: &Ruleset,
    state: &mut GameState,
    wizard: &EventWizard,
    log: &mut Vec<GameEvent>,
) -> Result<(), Rejection> {
    let params = wizard.params();
    let corrupt = wizard.mode() == Some(EventMode::Corrupt);
    debug!(card = %wizard.card, selections = params.len(), "Resolving event");

    match wizard.card {
        E::Airlift | E::ShipRequisition => {
            let pawn = player_at(params, 0)?;
            let to = city_at(params, 1)?;
            effects::move_pawn(rs, state, pawn, to, log);
        }
        E::GovernmentGrant => {
            let city = city_at(params, 0)?;
            if let Ok(old) = city_at(params, 1) {
                effects::remove_station(state, old, log);
            }
            effects::build_station(state, city, log);
        }
        E::OneQuietNight => state.quiet_nights = state.quiet_nights.max(1),
        E::PaxRomana => state.quiet_nights = state.quiet_nights.max(if corrupt { 2 } else { 1 }),
        E::ResilientPopulation | E::HadriansWall => {
            for card in infection_cards(params) {
                let pos = state
                    .infection_discard
                    .index_of(&card)
                    .ok_or(Rejection::MissingCard)?;
                state.infection_discard.remove(pos);
                state.removed_infection.push_back(card);
            }
        }
        E::Forecast | E::SibyllineBooks => {
            let Some(Selection::Permutation(order)) = params.first() else {
                return Err(MALFORMED);
            };
            let rest = state.infection_deck.skip(order.len());
            let mut deck: im::Vector<InfectionCard> = order.iter().copied().collect();
            deck.append(rest);
            state.infection_deck = deck;
            log.push(GameEvent::InfectionDeckReordered { count: order.len() });
        }
        E::BorrowedTime => {
            state.actions_remaining = state.actions_remaining.saturating_add(2);
            log.push(GameEvent::ActionsGranted {
                player: wizard.player,
                count: 2,
            });
        }
        E::CommercialTravelBan => state.travel_ban = Some(wizard.player),
        E::MobileHospital => state.turn.mobile_hospital = true,
        E::RapidVaccineDeployment | E::RemoteTreatment => {
            let Some(Selection::CubePicks(picks)) = params.first() else {
                return Err(MALFORMED);
            };
            if wizard.card == E::RapidVaccineDeployment && post_cure_color(state).is_none() {
                return Err(Rejection::WrongPhase);
            }
            for &(city, color, n) in picks {
                effects::remove_cubes(state, city, color, n, log);
            }
        }
        E::ReExaminedResearch | E::PanemEtCircenses => {
            for card in player_cards(params) {
                effects::retrieve(state, wizard.player, card, log)?;
            }
        }
        E::NewAssignment => {
            let target = player_at(params, 0)?;
            let Some(Selection::Role(role)) = params.get(1) else {
                return Err(MALFORMED);
            };
            change_role(state, target, *role, log);
        }
        E::RailwayExpansion => {
            for selection in params.iter().skip(1) {
                if let Selection::Route(route) = selection {
                    lay_track(state, *route, log);
                }
            }
        }
        E::HolyWater => {
            let city = city_at(params, 0)?;
            place_purification(state, city, 2, log);
        }
        E::Telegraph => {
            let to = player_at(params, 0)?;
            let Some(Selection::PlayerCard(card)) = params.get(1) else {
                return Err(MALFORMED);
            };
            effects::give(state, wizard.player, to, *card, log)?;
        }
        E::FieldHospital => {
            let city = city_at(params, 0)?;
            let color = color_at(params, 1)?;
            effects::remove_cubes(state, city, color, u8::MAX, log);
        }
        E::Augury => {
            let Some(Selection::Dice(faces)) = params.first() else {
                return Err(MALFORMED);
            };
            fix_dice(state, faces.clone(), corrupt);
        }
        E::Conscription => {
            let city = city_at(params, 0)?;
            recruit(state, city, if corrupt { 4 } else { 2 }, log);
        }
        E::Tribute => {
            let city = city_at(params, 0)?;
            if corrupt {
                for color in ALL_COLORS {
                    effects::remove_cubes(state, city, color, u8::MAX, log);
                }
            } else {
                let color = color_at(params, 1)?;
                effects::remove_cubes(state, city, color, 2, log);
            }
        }
        E::ImperialSummons => {
            let pawn = player_at(params, 0)?;
            let to = if corrupt {
                city_at(params, 1)?
            } else {
                rs.board().capital().unwrap_or_else(|| rs.board().start())
            };
            if state.players[pawn].location != to {
                effects::move_pawn(rs, state, pawn, to, log);
            }
        }
        E::Praetorians => {
            let city = city_at(params, 0)?;
            effects::build_station(state, city, log);
            if corrupt {
                recruit(state, city, 2, log);
            }
        }
    }
    Ok(())
}

/// Swap a player's role for an unused one.
pub fn change_role(state: &mut GameState, player: PlayerId, role: Role, log: &mut Vec<GameEvent>) {
    let from = state.players[player].role;
    state.players[player].role = role;
    log.push(GameEvent::RoleChanged {
        player,
        from,
        to: role,
    });
}

/// Lay one railroad from the supply.
pub fn lay_track(state: &mut GameState, route: Route, log: &mut Vec<GameEvent>) {
    if state.railroad_supply == 0 || state.railroads.contains(&route) {
        return;
    }
    state.railroad_supply -= 1;
    state.railroads.insert(route);
    log.push(GameEvent::RailroadBuilt {
        from: route.a,
        to: route.b,
    });
}

/// Place up to `n` purification tokens from the supply.
pub fn place_purification(state: &mut GameState, city: CityId, n: u8, log: &mut Vec<GameEvent>) {
    let count = n.min(state.purification_supply);
    if count == 0 {
        return;
    }
    state.purification_supply -= count;
    *state.purification.entry(city).or_insert(0) += count;
    log.push(GameEvent::PurificationPlaced { city, count });
}

/// Move up to `n` legions from the supply into `city`.
pub fn recruit(state: &mut GameState, city: CityId, n: u8, log: &mut Vec<GameEvent>) {
    let count = state.add_legions(city, n);
    if count > 0 {
        log.push(GameEvent::LegionsRecruited { city, count });
    }
}

fn fix_dice(state: &mut GameState, faces: Vec<DieFace>, persistent: bool) {
    state.turn.dice_override = Some(DiceOverride { faces, persistent });
}
