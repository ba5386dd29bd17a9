//! Infection (invasion) resolution: cube placement, defenses, outbreak
//! cascades, the infection step, and epidemics.
//!
//! ## Outbreaks
//!
//! Placing a cube in a city already at the cap outbreaks it instead: the
//! counter goes up by one and every neighbor receives one cube of that
//! color. Propagation is breadth-first with a visited set, so a city
//! outbreaks at most once per chain and a saturated neighbor chains on.
//!
//! ## Defenses
//!
//! Checked in order for every cube, chained ones included:
//!
//! 1. eradicated color: nothing happens
//! 2. Quarantine Specialist in or next to the city
//! 3. Medic in the city, color cured
//! 4. prevention token
//! 5. purification token (spent)
//! 6. legion (lost)

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use super::effects;
use super::engine::Ruleset;
use crate::board::{CityId, Color};
use crate::cards::InfectionCard;
use crate::core::{DefeatReason, GameEvent, GameState, Role, Variant};

/// Cards drawn by the next infection step.
#[must_use]
pub fn infection_rate(rs: &Ruleset, state: &GameState) -> u8 {
    if state.travel_ban.is_some() {
        return 1;
    }
    let table = rs.rules().rate_table;
    let index = usize::from(state.rate_index).min(table.len() - 1);
    table[index] + state.decline
}

/// Apply the first defense that stops a cube, consuming tokens as needed.
fn defended(
    rs: &Ruleset,
    state: &mut GameState,
    city: CityId,
    color: Color,
    log: &mut Vec<GameEvent>,
) -> bool {
    let board = rs.board();
    let quarantined = state.players.values().any(|p| {
        p.role == Role::QuarantineSpecialist
            && (p.location == city || board.are_adjacent(p.location, city))
    });
    let medic = state.is_cured(color) && state.pawns_at(city).any(|p| p.role == Role::Medic);
    if quarantined || medic || state.prevention_token == Some(city) {
        log.push(GameEvent::InfectionPrevented { city, color });
        return true;
    }

    let tokens = state.purification_at(city);
    if tokens > 0 {
        if tokens == 1 {
            state.purification.remove(&city);
        } else {
            state.purification.insert(city, tokens - 1);
        }
        state.purification_supply += 1;
        log.push(GameEvent::InfectionPrevented { city, color });
        return true;
    }

    if state.remove_legions(city, 1) > 0 {
        log.push(GameEvent::LegionsLost { city, count: 1 });
        return true;
    }

    false
}

/// Place one cube at `origin`, cascading outbreaks breadth-first.
fn spread(
    rs: &Ruleset,
    state: &mut GameState,
    origin: CityId,
    color: Color,
    outbroken: &mut FxHashSet<CityId>,
    log: &mut Vec<GameEvent>,
) {
    let rules = rs.rules();
    let mut queue = VecDeque::from([origin]);

    while let Some(city) = queue.pop_front() {
        if state.is_over() {
            return;
        }
        if outbroken.contains(&city) || defended(rs, state, city, color, log) {
            continue;
        }

        if state.cube_count(city, color) < rules.city_cap {
            if !state.add_cube(city, color) {
                effects::defeat(state, DefeatReason::CubesExhausted(color), log);
                return;
            }
            log.push(GameEvent::CubesPlaced {
                city,
                color,
                count: 1,
            });
            continue;
        }

        outbroken.insert(city);
        state.outbreaks = state.outbreaks.saturating_add(1);
        info!(
            city = %rs.board().name(city),
            %color,
            total = state.outbreaks,
            "{}",
            state.variant.outbreak_word()
        );
        log.push(GameEvent::Outbreak {
            city,
            color,
            total: state.outbreaks,
        });

        if state.outbreaks >= rules.max_outbreaks {
            effects::defeat(state, DefeatReason::Outbreaks, log);
            return;
        }
        if state.variant == Variant::Rome && rs.board().capital() == Some(city) {
            effects::defeat(state, DefeatReason::CapitalSacked, log);
            return;
        }

        for &next in rs.board().neighbors(city) {
            if !outbroken.contains(&next) {
                queue.push_back(next);
            }
        }
    }
}

/// Place `count` cubes of `color` in `city`.
///
/// Once the city outbreaks, the remaining cubes are lost: a city outbreaks
/// at most once per placement.
pub fn infect(
    rs: &Ruleset,
    state: &mut GameState,
    city: CityId,
    color: Color,
    count: u8,
    log: &mut Vec<GameEvent>,
) {
    if state.is_eradicated(color) {
        log.push(GameEvent::InfectionPrevented { city, color });
        return;
    }
    let mut outbroken = FxHashSet::default();
    for _ in 0..count {
        if state.is_over() || outbroken.contains(&city) {
            break;
        }
        spread(rs, state, city, color, &mut outbroken, log);
    }
}

/// Position of the bottom-most city card in the infection deck.
fn bottom_city(state: &GameState) -> Option<usize> {
    (0..state.infection_deck.len())
        .rev()
        .find(|&i| state.infection_deck[i].city().is_some())
}

/// Resolve one drawn infection card.
fn resolve_card(
    rs: &Ruleset,
    state: &mut GameState,
    card: InfectionCard,
    log: &mut Vec<GameEvent>,
) {
    match card {
        InfectionCard::City(c) => infect(rs, state, c.city, c.color, 1, log),
        InfectionCard::Mutation => {
            // The bottom card is spent like an epidemic's.
            let Some(pos) = bottom_city(state) else {
                return;
            };
            let bottom = state.infection_deck.remove(pos);
            state.infection_discard.push_back(bottom);
            if let Some(city) = bottom.city() {
                infect(rs, state, city, Color::Purple, 1, log);
            }
        }
    }
}

/// Run the infection step: draw the rate's worth of cards and infect.
pub fn infection_step(rs: &Ruleset, state: &mut GameState, log: &mut Vec<GameEvent>) {
    if state.quiet_nights > 0 {
        state.quiet_nights -= 1;
        debug!(turn = state.turn_number, "Infection step skipped");
        log.push(GameEvent::InfectionStepSkipped);
        return;
    }

    let draws = infection_rate(rs, state);
    debug!(draws, turn = state.turn_number, "Infection step");
    for _ in 0..draws {
        if state.is_over() {
            return;
        }
        let Some(card) = state.infection_deck.pop_front() else {
            warn!("Infection deck is empty");
            effects::defeat(state, DefeatReason::InfectionDeckExhausted, log);
            return;
        };
        log.push(GameEvent::InfectionCardDrawn { card });
        resolve_card(rs, state, card, log);
        state.infection_discard.push_back(card);
    }
}

/// Epidemic, first half: increase the rate, then infect the bottom card with three cubes.
pub fn epidemic(rs: &Ruleset, state: &mut GameState, log: &mut Vec<GameEvent>) {
    let max_index = rs.rules().rate_table.len().saturating_sub(1);
    if usize::from(state.rate_index) < max_index {
        state.rate_index += 1;
    }
    log.push(GameEvent::InfectionRateIncreased {
        rate: infection_rate(rs, state),
    });

    let Some(pos) = bottom_city(state) else {
        warn!("No city card left to infect");
        effects::defeat(state, DefeatReason::InfectionDeckExhausted, log);
        return;
    };
    let card = state.infection_deck.remove(pos);
    let Some(city) = card.city() else {
        return;
    };
    let color = rs.board().color(city);
    info!(
        city = %rs.board().name(city),
        %color,
        "{}",
        state.variant.epidemic_word()
    );
    log.push(GameEvent::Epidemic { city, color });
    infect(rs, state, city, color, 3, log);
    state.infection_discard.push_back(card);
}

/// Epidemic, second half: shuffle the discard pile back on top of the deck.
pub fn intensify(state: &mut GameState, log: &mut Vec<GameEvent>) {
    let mut top = state.rng.shuffled(&state.infection_discard);
    let cards = top.len();
    state.infection_discard.clear();
    top.append(std::mem::take(&mut state.infection_deck));
    state.infection_deck = top;
    log.push(GameEvent::Intensified { cards });
}
