//! Legion battles (Rome).
//!
//! A battle rolls one die per committed legion (at most three). Each face
//! costs legions, removes barbarians, or both. When the removals could
//! come from more than one tribe, the battle suspends in
//! `Resolving(BattleRemoval)` until the player chooses.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::effects;
use super::engine::Ruleset;
use crate::board::{CityId, Color, ALL_COLORS};
use crate::core::{
    GameEvent, GameState, Interrupt, Legality, Pending, Phase, PlayerId, Rejection, Role,
};

/// One face of a battle die.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DieFace {
    LoseLegion,
    RemoveBarbarian,
    RemoveOneLoseOne,
    RemoveTwoLoseOne,
    /// Removes a barbarian for the Magister Militum; blank otherwise.
    Special,
}

/// The six faces of a battle die.
pub const DIE_FACES: [DieFace; 6] = [
    DieFace::LoseLegion,
    DieFace::LoseLegion,
    DieFace::RemoveBarbarian,
    DieFace::RemoveOneLoseOne,
    DieFace::RemoveTwoLoseOne,
    DieFace::Special,
];

impl DieFace {
    #[must_use]
    pub const fn legions_lost(self) -> u8 {
        match self {
            DieFace::LoseLegion | DieFace::RemoveOneLoseOne | DieFace::RemoveTwoLoseOne => 1,
            DieFace::RemoveBarbarian | DieFace::Special => 0,
        }
    }

    #[must_use]
    pub fn barbarians_removed(self, role: Role) -> u8 {
        match self {
            DieFace::LoseLegion => 0,
            DieFace::RemoveBarbarian | DieFace::RemoveOneLoseOne => 1,
            DieFace::RemoveTwoLoseOne => 2,
            DieFace::Special => u8::from(role == Role::MagisterMilitum),
        }
    }
}

/// Aggregated result of one roll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub city: CityId,
    pub faces: Vec<DieFace>,
    pub legions_lost: u8,
    pub barbarians_to_remove: u8,
}

impl BattleOutcome {
    /// Sum the faces for a battle fought by `role`.
    #[must_use]
    pub fn aggregate(city: CityId, faces: Vec<DieFace>, role: Role) -> Self {
        let legions_lost = faces.iter().map(|f| f.legions_lost()).sum();
        let barbarians_to_remove = faces.iter().map(|f| f.barbarians_removed(role)).sum();
        Self {
            city,
            faces,
            legions_lost,
            barbarians_to_remove,
        }
    }
}

/// Roll `dice` dice, taking fixed faces from an Augury override first.
fn roll(state: &mut GameState, dice: u8) -> Vec<DieFace> {
    let fixed: Vec<DieFace> = state
        .turn
        .dice_override
        .as_ref()
        .map(|o| o.faces.clone())
        .unwrap_or_default();
    if state
        .turn
        .dice_override
        .as_ref()
        .is_some_and(|o| !o.persistent)
    {
        state.turn.dice_override = None;
    }

    (0..usize::from(dice))
        .map(|i| match fixed.get(i) {
            Some(&face) => face,
            None => DIE_FACES[state.rng.roll(DIE_FACES.len())],
        })
        .collect()
}

/// Fight a battle in `player`'s city. Legality is checked by the caller.
pub fn resolve_battle(
    rs: &Ruleset,
    state: &mut GameState,
    player: PlayerId,
    dice: u8,
    log: &mut Vec<GameEvent>,
) {
    let role = state.players[player].role;
    let city = state.players[player].location;
    let faces = roll(state, dice);
    let outcome = BattleOutcome::aggregate(city, faces, role);
    debug!(
        city = %rs.board().name(city),
        legions_lost = outcome.legions_lost,
        barbarians = outcome.barbarians_to_remove,
        "Battle rolled"
    );
    log.push(GameEvent::BattleRolled {
        city,
        faces: outcome.faces.clone(),
    });

    let lost = state.remove_legions(city, outcome.legions_lost);
    if lost > 0 {
        log.push(GameEvent::LegionsLost { city, count: lost });
    }

    let present = state.city_cubes(city);
    let tribes = present.iter().filter(|(_, n)| **n > 0).count();
    let total = present.total();
    if outcome.barbarians_to_remove == 0 {
        return;
    }

    if tribes <= 1 || u32::from(outcome.barbarians_to_remove) >= total {
        let mut budget = outcome.barbarians_to_remove;
        for color in ALL_COLORS {
            if budget == 0 {
                break;
            }
            budget -= effects::remove_cubes(state, city, color, budget, log);
        }
        return;
    }

    state.pending = Some(Pending::BattleRemoval(outcome));
    effects::interrupt(state, Phase::Resolving(Interrupt::BattleRemoval), log);
}

/// Check a removal choice against the suspended outcome.
pub fn check_removals(state: &GameState, removals: &[(Color, u8)]) -> Legality {
    let Some(Pending::BattleRemoval(outcome)) = &state.pending else {
        return Err(Rejection::WrongPhase);
    };
    let mut seen = Vec::with_capacity(removals.len());
    let mut total: u32 = 0;
    for &(color, count) in removals {
        if seen.contains(&color) {
            return Err(Rejection::InvalidSelection("tribe listed twice"));
        }
        seen.push(color);
        if count > state.cube_count(outcome.city, color) {
            return Err(Rejection::NoCubes(color));
        }
        total += u32::from(count);
    }
    if total > u32::from(outcome.barbarians_to_remove) {
        return Err(Rejection::InvalidSelection("more removals than the dice allow"));
    }
    Ok(())
}

/// Apply a checked removal choice and resume the interrupted phase.
pub fn apply_removals(state: &mut GameState, removals: &[(Color, u8)], log: &mut Vec<GameEvent>) {
    let Some(Pending::BattleRemoval(outcome)) = state.pending.take() else {
        return;
    };
    for &(color, count) in removals {
        effects::remove_cubes(state, outcome.city, color, count, log);
    }
    effects::resume(state, Phase::PlayerAction, log);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_sums_faces() {
        let faces = vec![
            DieFace::LoseLegion,
            DieFace::RemoveTwoLoseOne,
            DieFace::Special,
        ];
        let outcome = BattleOutcome::aggregate(CityId(0), faces.clone(), Role::Consul);
        assert_eq!(outcome.legions_lost, 2);
        assert_eq!(outcome.barbarians_to_remove, 2);

        let outcome = BattleOutcome::aggregate(CityId(0), faces, Role::MagisterMilitum);
        assert_eq!(outcome.barbarians_to_remove, 3);
    }

    #[test]
    fn test_die_has_six_faces() {
        let lose = DIE_FACES.iter().filter(|f| **f == DieFace::LoseLegion).count();
        assert_eq!(DIE_FACES.len(), 6);
        assert_eq!(lose, 2);
    }
}
