//! Cures (alliances in Rome).
//!
//! A cure discards city cards at a cure site. Roles bend the requirement
//! in different ways; each bend is a `CureMethod`:
//!
//! | Method            | Role                      | Requirement                                    |
//! |-------------------|---------------------------|------------------------------------------------|
//! | `Standard`        | any                       | N cards of the color at a site                 |
//! | `Reduced`         | Scientist                 | N-1 cards at a site                            |
//! | `SampleHybrid`    | Field Operative           | N-2 cards plus 2 samples at a site             |
//! | `ValueAccounting` | Virologist                | N points: own-color card 1, same-colored pair 1 |
//! | `RoleSpecial`     | Royal Academy Scientist   | any N city cards at that color's hospital      |
//! | `RoleSpecial`     | Regina Foederata          | N cards, no fort, tribe present in the city    |
//!
//! The Classic mutation (purple) has no cities, so `Standard` and `Reduced`
//! cure it with city cards of any color.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::effects;
use super::engine::Ruleset;
use crate::board::{CityId, Color, ColorMap, ALL_COLORS};
use crate::cards::{EventCard, PlayerCard};
use crate::core::{
    DiseaseStatus, GameEvent, GameState, Interrupt, Legality, Phase, Player, PlayerId, Rejection,
    Role, Variant,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CureMethod {
    Standard,
    Reduced,
    SampleHybrid,
    ValueAccounting,
    RoleSpecial,
}

/// A satisfiable way to cure one color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CureOffer {
    pub method: CureMethod,
    /// Cards (or points, for `ValueAccounting`) required.
    pub required: usize,
    /// City cards in hand that may be offered.
    pub eligible: Vec<PlayerCard>,
    /// A valid card choice.
    pub suggested: Vec<PlayerCard>,
}

/// Methods the role may attempt, `Standard` first.
fn methods_for(role: Role) -> &'static [CureMethod] {
    match role {
        Role::Scientist => &[CureMethod::Standard, CureMethod::Reduced],
        Role::FieldOperative => &[CureMethod::Standard, CureMethod::SampleHybrid],
        Role::Virologist => &[CureMethod::Standard, CureMethod::ValueAccounting],
        Role::RoyalAcademyScientist | Role::ReginaFoederata => {
            &[CureMethod::Standard, CureMethod::RoleSpecial]
        }
        _ => &[CureMethod::Standard],
    }
}

/// True if a cure may be performed in `city` under the site rule.
#[must_use]
pub fn is_cure_site(state: &GameState, city: CityId) -> bool {
    match state.variant {
        Variant::Classic | Variant::Rome => state.has_station(city),
        Variant::Iberia => state.hospitals.iter().any(|(_, h)| *h == Some(city)),
    }
}

/// True for the Classic mutation color, which is cured with any city cards.
#[must_use]
pub fn is_mutation(state: &GameState, color: Color) -> bool {
    color == Color::Purple && state.variant == Variant::Classic
}

/// Cards (or points) `method` requires.
#[must_use]
pub fn required_cards(rs: &Ruleset, method: CureMethod) -> usize {
    let n = usize::from(rs.config().cure_cards);
    match method {
        CureMethod::Standard | CureMethod::ValueAccounting | CureMethod::RoleSpecial => n,
        CureMethod::Reduced => n - 1,
        CureMethod::SampleHybrid => n - 2,
    }
}

fn city_colors(cards: &[PlayerCard]) -> Result<ColorMap<usize>, Rejection> {
    let mut counts = ColorMap::splat(0usize);
    for card in cards {
        let color = card
            .color()
            .ok_or(Rejection::InvalidSelection("only city cards cure"))?;
        counts[color] += 1;
    }
    Ok(counts)
}

fn exact(need: usize, have: usize) -> Legality {
    if need == have {
        Ok(())
    } else {
        Err(Rejection::NotEnoughCards { need, have })
    }
}

fn all_of(counts: &ColorMap<usize>, color: Color, len: usize) -> Legality {
    if counts[color] == len {
        Ok(())
    } else {
        Err(Rejection::InvalidSelection("cards must match the color"))
    }
}

fn site(state: &GameState, city: CityId) -> Legality {
    if is_cure_site(state, city) {
        Ok(())
    } else {
        Err(Rejection::NoStation)
    }
}

/// Virologist: own-color cards score 1, each same-colored pair of another color scores 1.
fn value_points(counts: &ColorMap<usize>, color: Color) -> Result<usize, Rejection> {
    if counts[color] == 0 {
        return Err(Rejection::InvalidSelection("needs at least one card of the color"));
    }
    let mut points = counts[color];
    for (other, &n) in counts.iter() {
        if other == color {
            continue;
        }
        if n % 2 != 0 {
            return Err(Rejection::InvalidSelection("other colors must come in pairs"));
        }
        points += n / 2;
    }
    Ok(points)
}

/// Check a cure attempt. Phase and turn checks are the caller's.
pub fn check_cure(
    rs: &Ruleset,
    state: &GameState,
    player: &Player,
    color: Color,
    method: CureMethod,
    cards: &[PlayerCard],
) -> Legality {
    if state.is_cured(color) {
        return Err(Rejection::AlreadyCured(color));
    }
    if !methods_for(player.role).contains(&method) {
        return Err(Rejection::WrongRole);
    }
    for (i, card) in cards.iter().enumerate() {
        if cards[..i].contains(card) {
            return Err(Rejection::InvalidSelection("card offered twice"));
        }
        if !player.holds(*card) {
            return Err(Rejection::MissingCard);
        }
    }

    let counts = city_colors(cards)?;
    let need = required_cards(rs, method);
    let here = player.location;
    let mutation = is_mutation(state, color);
    if mutation && !matches!(method, CureMethod::Standard | CureMethod::Reduced) {
        return Err(Rejection::InvalidSelection("the mutation is cured with plain city cards"));
    }

    match method {
        CureMethod::Standard | CureMethod::Reduced => {
            exact(need, cards.len())?;
            if !mutation {
                all_of(&counts, color, cards.len())?;
            }
            site(state, here)
        }
        CureMethod::SampleHybrid => {
            exact(need, cards.len())?;
            all_of(&counts, color, cards.len())?;
            if player.samples[color] < 2 {
                return Err(Rejection::InvalidSelection("needs two samples"));
            }
            site(state, here)
        }
        CureMethod::ValueAccounting => {
            let points = value_points(&counts, color)?;
            exact(need, points)?;
            site(state, here)
        }
        CureMethod::RoleSpecial => match player.role {
            Role::RoyalAcademyScientist => {
                exact(need, cards.len())?;
                if state.hospitals[color] == Some(here) {
                    Ok(())
                } else {
                    Err(Rejection::NoStation)
                }
            }
            Role::ReginaFoederata => {
                exact(need, cards.len())?;
                all_of(&counts, color, cards.len())?;
                if state.cube_count(here, color) > 0 {
                    Ok(())
                } else {
                    Err(Rejection::NoCubes(color))
                }
            }
            _ => Err(Rejection::WrongRole),
        },
    }
}

/// Pick a valid card set for `method`, if the hand allows one.
fn suggest(
    rs: &Ruleset,
    player: &Player,
    color: Color,
    method: CureMethod,
    mutation: bool,
) -> Option<(Vec<PlayerCard>, Vec<PlayerCard>)> {
    let need = required_cards(rs, method);
    let city_cards: Vec<PlayerCard> = player.hand.iter().copied().filter(|c| c.color().is_some()).collect();
    let of_color: Vec<PlayerCard> = city_cards
        .iter()
        .copied()
        .filter(|c| mutation || c.color() == Some(color))
        .collect();

    match (method, player.role) {
        (CureMethod::RoleSpecial, Role::RoyalAcademyScientist) => {
            let chosen: Vec<_> = city_cards.iter().copied().take(need).collect();
            (chosen.len() == need).then_some((city_cards, chosen))
        }
        (CureMethod::ValueAccounting, _) => {
            if of_color.is_empty() {
                return None;
            }
            let mut chosen: Vec<_> = of_color.iter().copied().take(need).collect();
            let mut points = chosen.len();
            for other in ALL_COLORS.into_iter().filter(|&c| c != color) {
                let pile: Vec<_> = city_cards
                    .iter()
                    .copied()
                    .filter(|c| c.color() == Some(other))
                    .collect();
                for pair in pile.chunks_exact(2) {
                    if points == need {
                        break;
                    }
                    chosen.extend_from_slice(pair);
                    points += 1;
                }
            }
            (points == need).then_some((city_cards, chosen))
        }
        _ => {
            let chosen: Vec<_> = of_color.iter().copied().take(need).collect();
            (chosen.len() == need).then_some((of_color, chosen))
        }
    }
}

/// Every method `player` could complete right now for `color`.
#[must_use]
pub fn offers(rs: &Ruleset, state: &GameState, player: PlayerId, color: Color) -> Vec<CureOffer> {
    let Some(p) = state.players.get(player) else {
        return Vec::new();
    };
    methods_for(p.role)
        .iter()
        .filter_map(|&method| {
            let mutation = is_mutation(state, color);
            let (eligible, suggested) = suggest(rs, p, color, method, mutation)?;
            check_cure(rs, state, p, color, method, &suggested).ok()?;
            Some(CureOffer {
                method,
                required: required_cards(rs, method),
                eligible,
                suggested,
            })
        })
        .collect()
}

/// Apply a checked cure.
pub fn resolve_cure(
    rs: &Ruleset,
    state: &mut GameState,
    player: PlayerId,
    color: Color,
    method: CureMethod,
    cards: &[PlayerCard],
    log: &mut Vec<GameEvent>,
) -> Result<(), Rejection> {
    for &card in cards {
        effects::discard(state, player, card, log)?;
    }
    if method == CureMethod::SampleHybrid {
        state.players[player].samples[color] -= 2;
        state.supply[color] += 2;
    }

    state.diseases[color] = DiseaseStatus::Cured;
    info!(%color, ?method, "{}", state.variant.cure_word());
    log.push(GameEvent::Cured { color });

    let medics: Vec<PlayerId> = state
        .players
        .values()
        .filter(|p| p.role == Role::Medic)
        .map(|p| p.id)
        .collect();
    for medic in medics {
        effects::medic_sweep(state, medic, log);
    }
    effects::update_eradication(state, color, log);
    effects::check_victory(rs, state, log);

    let vaccine = state
        .players
        .values()
        .any(|p| p.can_reach_event(EventCard::RapidVaccineDeployment));
    if !state.is_over() && vaccine {
        effects::interrupt(state, Phase::Resolving(Interrupt::PostCure(color)), log);
    }
    Ok(())
}
