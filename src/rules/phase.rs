//! Turn controller.
//!
//! Drives the phase machine between player commands:
//!
//! ```text
//! PlayerAction -> PreDrawPlayerCards -> DrawingPlayerCards
//!     -> (EpidemicAnnounceInfect -> PostEpidemicEventWindow)*
//!     -> InfectionStep -> next player's PlayerAction
//! ```
//!
//! `Discard` and `Resolving(_)` interrupt any of these and return to the
//! interrupted phase when they finish.

use tracing::{debug, info};

use super::effects;
use super::engine::Ruleset;
use super::infection;
use crate::board::CityId;
use crate::cards::{EventCard, EventTiming, PlayerCard};
use crate::core::{DefeatReason, GameEvent, GameState, Phase, PlayerId, TurnFlags};

/// Apply automatic transitions until the state waits on a player.
pub fn settle(state: &mut GameState, log: &mut Vec<GameEvent>) {
    loop {
        if state.is_over() {
            return;
        }
        match state.phase {
            Phase::Discard if state.over_limit_player().is_none() => {
                effects::resume(state, Phase::PlayerAction, log);
            }
            Phase::PlayerAction if state.actions_remaining == 0 && state.pending.is_none() => {
                effects::set_phase(state, Phase::PreDrawPlayerCards, log);
            }
            _ => {
                enforce_hand_limit(state, log);
                return;
            }
        }
    }
}

/// Interrupt into `Discard` if a hand is over its limit.
pub fn enforce_hand_limit(state: &mut GameState, log: &mut Vec<GameEvent>) {
    let settled = matches!(
        state.phase,
        Phase::PlayerAction | Phase::PreDrawPlayerCards | Phase::InfectionStep
    );
    if settled && state.pending.is_none() {
        if let Some(player) = state.over_limit_player() {
            debug!(%player, "Hand over limit");
            effects::interrupt(state, Phase::Discard, log);
        }
    }
}

/// Skip the remaining actions.
pub fn end_actions(state: &mut GameState, log: &mut Vec<GameEvent>) {
    state.actions_remaining = 0;
    effects::set_phase(state, Phase::PreDrawPlayerCards, log);
}

/// Start drawing two player cards. Fewer than two left loses the game.
pub fn begin_draw(rs: &Ruleset, state: &mut GameState, log: &mut Vec<GameEvent>) {
    if state.player_deck.len() < 2 {
        effects::defeat(state, DefeatReason::PlayerDeckExhausted, log);
        return;
    }
    state.draws_remaining = 2;
    effects::set_phase(state, Phase::DrawingPlayerCards, log);
    continue_drawing(rs, state, log);
}

/// Draw the outstanding cards, stopping at an epidemic's event window.
pub fn continue_drawing(rs: &Ruleset, state: &mut GameState, log: &mut Vec<GameEvent>) {
    let player = state.current_player;
    while state.draws_remaining > 0 {
        if state.is_over() {
            return;
        }
        let Some(card) = state.player_deck.pop_front() else {
            effects::defeat(state, DefeatReason::PlayerDeckExhausted, log);
            return;
        };
        state.draws_remaining -= 1;

        if card == PlayerCard::Epidemic {
            state.removed_cards.push_back(card);
            effects::set_phase(state, Phase::EpidemicAnnounceInfect, log);
            infection::epidemic(rs, state, log);
            if state.is_over() {
                return;
            }
            if event_window_open(state) {
                effects::set_phase(state, Phase::PostEpidemicEventWindow, log);
                return;
            }
            infection::intensify(state, log);
            effects::set_phase(state, Phase::DrawingPlayerCards, log);
            continue;
        }

        state.players[player].hand.push_back(card);
        log.push(GameEvent::CardDrawn { player, card });
    }
    effects::set_phase(state, Phase::InfectionStep, log);
}

/// True if any player holds an event playable in the post-epidemic window.
fn event_window_open(state: &GameState) -> bool {
    let playable = |e: EventCard| e.timing() == EventTiming::Anytime && e.in_variant(state.variant);
    state.players.values().any(|p| {
        p.stash.is_some_and(playable) || p.hand.iter().filter_map(|c| c.event()).any(playable)
    })
}

/// Close the post-epidemic window: intensify and keep drawing.
pub fn close_epidemic_window(rs: &Ruleset, state: &mut GameState, log: &mut Vec<GameEvent>) {
    infection::intensify(state, log);
    effects::set_phase(state, Phase::DrawingPlayerCards, log);
    continue_drawing(rs, state, log);
}

/// Resolve the infection step and pass the turn.
pub fn infect_and_end_turn(rs: &Ruleset, state: &mut GameState, log: &mut Vec<GameEvent>) {
    infection::infection_step(rs, state, log);
    if !state.is_over() {
        end_turn(rs, state, log);
    }
}

/// Pass the turn to the next seat.
pub fn end_turn(rs: &Ruleset, state: &mut GameState, log: &mut Vec<GameEvent>) {
    let next = state.current_player.next(state.player_count());
    start_turn(rs, state, next, log);
}

/// Hand the turn to `player` with a fresh action budget.
pub fn start_turn(rs: &Ruleset, state: &mut GameState, player: PlayerId, log: &mut Vec<GameEvent>) {
    if state.phase != Phase::Setup && state.phase != Phase::ChoosingStartingCity {
        state.turn_number += 1;
    }
    state.current_player = player;
    state.action_sequence = 0;
    state.turn = TurnFlags::default();
    state.actions_remaining = state.players[player]
        .role
        .actions_per_turn(rs.rules().actions_per_turn);
    if state.travel_ban == Some(player) {
        state.travel_ban = None;
    }

    info!(%player, turn = state.turn_number, "Turn started");
    effects::set_phase(state, Phase::PlayerAction, log);
    log.push(GameEvent::TurnStarted {
        player,
        turn: state.turn_number,
    });
}

/// Seat `player` in `city`; the last seat starts the first turn.
pub fn choose_starting_city(
    rs: &Ruleset,
    state: &mut GameState,
    player: PlayerId,
    city: CityId,
    log: &mut Vec<GameEvent>,
) {
    let from = state.players[player].location;
    state.players[player].location = city;
    log.push(GameEvent::PawnMoved {
        player,
        from,
        to: city,
    });

    let next = player.index() + 1;
    if next < state.player_count() {
        state.current_player = PlayerId::new(next as u8);
    } else {
        start_turn(rs, state, PlayerId(0), log);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CityCard;
    use crate::core::{GameConfig, Role, Variant};

    fn setup() -> (Ruleset, GameState) {
        let config = GameConfig::new(Variant::Classic)
            .with_roles(vec![Role::Medic, Role::Scientist]);
        let rs = Ruleset::new(config).unwrap();
        let mut state = GameState::new(rs.config(), rs.board().start());
        state.phase = Phase::PlayerAction;
        (rs, state)
    }

    fn city_card(rs: &Ruleset, i: u16) -> PlayerCard {
        let city = CityId(i);
        PlayerCard::City(CityCard::new(city, rs.board().color(city)))
    }

    #[test]
    fn test_actions_exhausted_moves_to_predraw() {
        let (_, mut state) = setup();
        let mut log = Vec::new();
        state.actions_remaining = 0;
        settle(&mut state, &mut log);
        assert_eq!(state.phase, Phase::PreDrawPlayerCards);
    }

    #[test]
    fn test_short_deck_loses() {
        let (rs, mut state) = setup();
        let mut log = Vec::new();
        state.phase = Phase::PreDrawPlayerCards;
        state.player_deck.push_back(city_card(&rs, 3));
        begin_draw(&rs, &mut state, &mut log);
        assert_eq!(
            state.phase,
            Phase::Defeat(DefeatReason::PlayerDeckExhausted)
        );
    }

    #[test]
    fn test_draw_two_then_infection_step() {
        let (rs, mut state) = setup();
        let mut log = Vec::new();
        state.phase = Phase::PreDrawPlayerCards;
        for i in 1..=4 {
            state.player_deck.push_back(city_card(&rs, i));
        }
        begin_draw(&rs, &mut state, &mut log);
        assert_eq!(state.phase, Phase::InfectionStep);
        assert_eq!(state.players[PlayerId(0)].hand.len(), 2);
        assert_eq!(state.player_deck.len(), 2);
    }

    #[test]
    fn test_epidemic_without_events_intensifies_immediately() {
        let (rs, mut state) = setup();
        let mut log = Vec::new();
        state.phase = Phase::PreDrawPlayerCards;
        let mut rng = crate::core::GameRng::new(3);
        state.infection_deck = crate::cards::infection_deck(rs.board(), &mut rng);
        state.player_deck.push_back(PlayerCard::Epidemic);
        state.player_deck.push_back(city_card(&rs, 1));
        state.player_deck.push_back(city_card(&rs, 2));

        begin_draw(&rs, &mut state, &mut log);

        assert_eq!(state.phase, Phase::InfectionStep);
        assert_eq!(state.rate_index, 1);
        assert_eq!(state.infection_discard.len(), 0);
        assert!(state.removed_cards.contains(&PlayerCard::Epidemic));
        let epidemic = log.iter().position(|e| matches!(e, GameEvent::Epidemic { .. }));
        let intensify = log.iter().position(|e| matches!(e, GameEvent::Intensified { .. }));
        assert!(epidemic < intensify);
    }

    #[test]
    fn test_epidemic_opens_window_when_event_held() {
        let (rs, mut state) = setup();
        let mut log = Vec::new();
        state.phase = Phase::PreDrawPlayerCards;
        let mut rng = crate::core::GameRng::new(3);
        state.infection_deck = crate::cards::infection_deck(rs.board(), &mut rng);
        state.players[PlayerId(1)]
            .hand
            .push_back(PlayerCard::Event(EventCard::Airlift));
        state.player_deck.push_back(PlayerCard::Epidemic);
        state.player_deck.push_back(city_card(&rs, 1));
        state.player_deck.push_back(city_card(&rs, 2));

        begin_draw(&rs, &mut state, &mut log);
        assert_eq!(state.phase, Phase::PostEpidemicEventWindow);
        assert_eq!(state.infection_discard.len(), 1);

        close_epidemic_window(&rs, &mut state, &mut log);
        assert_eq!(state.phase, Phase::InfectionStep);
        assert!(state.infection_discard.is_empty());
        assert_eq!(state.players[PlayerId(0)].hand.len(), 1);
    }

    #[test]
    fn test_restricted_events_keep_window_closed() {
        let (rs, mut state) = setup();
        let mut log = Vec::new();
        state.phase = Phase::PreDrawPlayerCards;
        let mut rng = crate::core::GameRng::new(3);
        state.infection_deck = crate::cards::infection_deck(rs.board(), &mut rng);
        state.players[PlayerId(0)]
            .hand
            .push_back(PlayerCard::Event(EventCard::BorrowedTime));
        state.players[PlayerId(1)]
            .hand
            .push_back(PlayerCard::Event(EventCard::RapidVaccineDeployment));
        state.players[PlayerId(1)].stash = Some(EventCard::PaxRomana);
        state.player_deck.push_back(PlayerCard::Epidemic);
        state.player_deck.push_back(city_card(&rs, 1));
        state.player_deck.push_back(city_card(&rs, 2));

        begin_draw(&rs, &mut state, &mut log);
        assert_eq!(state.phase, Phase::InfectionStep);
        assert!(log.iter().any(|e| matches!(e, GameEvent::Intensified { .. })));
        assert!(!log.iter().any(|e| matches!(
            e,
            GameEvent::PhaseChanged {
                to: Phase::PostEpidemicEventWindow,
                ..
            }
        )));
    }

    #[test]
    fn test_over_limit_interrupts_and_resumes() {
        let (rs, mut state) = setup();
        let mut log = Vec::new();
        for i in 1..=8 {
            state.players[PlayerId(1)].hand.push_back(city_card(&rs, i));
        }
        settle(&mut state, &mut log);
        assert_eq!(state.phase, Phase::Discard);

        state.players[PlayerId(1)].hand.pop_back();
        settle(&mut state, &mut log);
        assert_eq!(state.phase, Phase::PlayerAction);
    }

    #[test]
    fn test_end_turn_rotates_and_resets() {
        let (rs, mut state) = setup();
        let mut log = Vec::new();
        state.actions_remaining = 0;
        state.turn.sample_taken = true;
        state.travel_ban = Some(PlayerId(1));
        state.phase = Phase::InfectionStep;

        end_turn(&rs, &mut state, &mut log);

        assert_eq!(state.current_player, PlayerId(1));
        assert_eq!(state.actions_remaining, 4);
        assert_eq!(state.turn_number, 2);
        assert!(!state.turn.sample_taken);
        assert!(state.travel_ban.is_none());
        assert_eq!(state.phase, Phase::PlayerAction);
        assert!(log.contains(&GameEvent::TurnStarted {
            player: PlayerId(1),
            turn: 2
        }));
    }
}
