//! State changes shared by several resolvers.
//!
//! These helpers keep the bookkeeping that always travels together in one
//! place: a cube removal checks eradication, a pawn move triggers the
//! Medic's passive and Mobile Hospital, a phase change is logged.

use tracing::{debug, info};

use super::engine::Ruleset;
use crate::board::{CityId, Color, ALL_COLORS};
use crate::cards::PlayerCard;
use crate::core::{
    DefeatReason, DiseaseStatus, GameEvent, GameState, Phase, PlayerId, Rejection, Role,
};

/// Enter `next`, logging the change.
pub fn set_phase(state: &mut GameState, next: Phase, log: &mut Vec<GameEvent>) {
    if state.phase != next {
        log.push(GameEvent::PhaseChanged {
            from: state.phase,
            to: next,
        });
        state.phase = next;
    }
}

/// Push the current phase and enter `next`.
pub fn interrupt(state: &mut GameState, next: Phase, log: &mut Vec<GameEvent>) {
    log.push(GameEvent::PhaseChanged {
        from: state.phase,
        to: next,
    });
    state.interrupt(next);
}

/// Pop the interrupted phase (or `fallback`) back into place.
pub fn resume(state: &mut GameState, fallback: Phase, log: &mut Vec<GameEvent>) {
    let from = state.phase;
    state.resume(fallback);
    log.push(GameEvent::PhaseChanged {
        from,
        to: state.phase,
    });
}

/// End the game in defeat. Suspended resolutions are dropped.
pub fn defeat(state: &mut GameState, reason: DefeatReason, log: &mut Vec<GameEvent>) {
    if state.is_over() {
        return;
    }
    info!(%reason, turn = state.turn_number, "Game lost");
    state.pending = None;
    state.phase_stack.clear();
    set_phase(state, Phase::Defeat(reason), log);
    log.push(GameEvent::Defeat { reason });
}

/// Enter `Victory` if every required color is cured.
pub fn check_victory(rs: &Ruleset, state: &mut GameState, log: &mut Vec<GameEvent>) {
    if state.is_over() {
        return;
    }
    if rs.config().required_cures().iter().all(|&c| state.is_cured(c)) {
        info!(turn = state.turn_number, "Game won");
        state.pending = None;
        state.phase_stack.clear();
        set_phase(state, Phase::Victory, log);
        log.push(GameEvent::Victory);
    }
}

/// Mark `color` eradicated if it is cured and gone from the board.
pub fn update_eradication(state: &mut GameState, color: Color, log: &mut Vec<GameEvent>) {
    if state.diseases[color] == DiseaseStatus::Cured && state.cubes_on_board(color) == 0 {
        info!(%color, "Eradicated");
        state.diseases[color] = DiseaseStatus::Eradicated;
        log.push(GameEvent::Eradicated { color });
    }
}

/// Remove up to `n` cubes, log, and check eradication. Returns how many moved.
pub fn remove_cubes(
    state: &mut GameState,
    city: CityId,
    color: Color,
    n: u8,
    log: &mut Vec<GameEvent>,
) -> u8 {
    let removed = state.remove_cubes(city, color, n);
    if removed > 0 {
        log.push(GameEvent::CubesRemoved {
            city,
            color,
            count: removed,
        });
        update_eradication(state, color, log);
    }
    removed
}

/// Medic passive: clear every cured color from the Medic's city.
pub fn medic_sweep(state: &mut GameState, player: PlayerId, log: &mut Vec<GameEvent>) {
    let pawn = &state.players[player];
    if pawn.role != Role::Medic {
        return;
    }
    let city = pawn.location;
    for color in ALL_COLORS {
        if state.is_cured(color) {
            remove_cubes(state, city, color, u8::MAX, log);
        }
    }
}

/// Move a pawn and apply arrival effects.
pub fn move_pawn(
    rs: &Ruleset,
    state: &mut GameState,
    player: PlayerId,
    to: CityId,
    log: &mut Vec<GameEvent>,
) {
    let from = state.players[player].location;
    state.players[player].location = to;
    debug!(%player, from = %rs.board().name(from), to = %rs.board().name(to), "Pawn moved");
    log.push(GameEvent::PawnMoved { player, from, to });

    medic_sweep(state, player, log);

    if state.turn.mobile_hospital && player == state.current_player {
        let native = rs.board().color(to);
        let cubes = state.city_cubes(to);
        let target = if cubes[native] > 0 {
            Some(native)
        } else {
            ALL_COLORS.into_iter().find(|&c| cubes[c] > 0)
        };
        if let Some(color) = target {
            remove_cubes(state, to, color, 1, log);
        }
    }
}

/// Move a card from a hand to the player discard pile.
pub fn discard(
    state: &mut GameState,
    player: PlayerId,
    card: PlayerCard,
    log: &mut Vec<GameEvent>,
) -> Result<(), Rejection> {
    if !state.players[player].remove_card(card) {
        return Err(Rejection::MissingCard);
    }
    state.player_discard.push_back(card);
    log.push(GameEvent::CardDiscarded { player, card });
    Ok(())
}

/// Move a card between hands.
pub fn give(
    state: &mut GameState,
    from: PlayerId,
    to: PlayerId,
    card: PlayerCard,
    log: &mut Vec<GameEvent>,
) -> Result<(), Rejection> {
    if !state.players[from].remove_card(card) {
        return Err(Rejection::MissingCard);
    }
    state.players[to].hand.push_back(card);
    log.push(GameEvent::CardGiven { from, to, card });
    Ok(())
}

/// Take a card out of the player discard pile into a hand.
pub fn retrieve(
    state: &mut GameState,
    player: PlayerId,
    card: PlayerCard,
    log: &mut Vec<GameEvent>,
) -> Result<(), Rejection> {
    let pos = state
        .player_discard
        .index_of(&card)
        .ok_or(Rejection::MissingCard)?;
    state.player_discard.remove(pos);
    state.players[player].hand.push_back(card);
    log.push(GameEvent::CardRetrieved { player, card });
    Ok(())
}

/// Place a station (fort) from the supply.
pub fn build_station(state: &mut GameState, city: CityId, log: &mut Vec<GameEvent>) {
    if state.station_supply == 0 || state.has_station(city) {
        return;
    }
    state.station_supply -= 1;
    state.stations.insert(city);
    log.push(GameEvent::StationBuilt { city });
}

/// Return a station (fort) to the supply.
pub fn remove_station(state: &mut GameState, city: CityId, log: &mut Vec<GameEvent>) {
    if state.stations.remove(&city).is_some() {
        state.station_supply += 1;
        log.push(GameEvent::StationRemoved { city });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, Variant};

    fn setup() -> (Ruleset, GameState) {
        let config = GameConfig::new(Variant::Classic)
            .with_roles(vec![Role::Medic, Role::Scientist]);
        let rs = Ruleset::new(config).unwrap();
        let state = GameState::new(rs.config(), rs.board().start());
        (rs, state)
    }

    #[test]
    fn test_remove_last_cube_of_cured_color_eradicates() {
        let (_, mut state) = setup();
        let mut log = Vec::new();
        state.add_cube(CityId(4), Color::Blue);
        state.diseases[Color::Blue] = DiseaseStatus::Cured;

        assert_eq!(remove_cubes(&mut state, CityId(4), Color::Blue, 3, &mut log), 1);
        assert!(state.is_eradicated(Color::Blue));
        assert!(log.contains(&GameEvent::Eradicated { color: Color::Blue }));
    }

    #[test]
    fn test_medic_arrival_clears_cured_color() {
        let (rs, mut state) = setup();
        let mut log = Vec::new();
        let chicago = rs.board().id("Chicago").unwrap();
        state.add_cube(chicago, Color::Blue);
        state.add_cube(chicago, Color::Blue);
        state.add_cube(chicago, Color::Red);
        state.add_cube(CityId(9), Color::Blue);
        state.diseases[Color::Blue] = DiseaseStatus::Cured;

        move_pawn(&rs, &mut state, PlayerId(0), chicago, &mut log);

        assert_eq!(state.cube_count(chicago, Color::Blue), 0);
        assert_eq!(state.cube_count(chicago, Color::Red), 1);
        assert!(!state.is_eradicated(Color::Blue));
    }

    #[test]
    fn test_defeat_clears_suspension() {
        let (_, mut state) = setup();
        let mut log = Vec::new();
        state.phase = Phase::PlayerAction;
        state.interrupt(Phase::Discard);
        defeat(&mut state, DefeatReason::Outbreaks, &mut log);
        assert_eq!(state.phase, Phase::Defeat(DefeatReason::Outbreaks));
        assert!(state.phase_stack.is_empty());
    }
}
