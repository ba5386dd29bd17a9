//! The event wizard protocol.
//!
//! Legality is checked by `rules::legality` before any of these run.

use tracing::{debug, info};

use super::{resolver, CardSource, EventMode, EventWizard, Selection};
use crate::cards::{EventCard, PlayerCard};
use crate::core::{GameEvent, GameState, Interrupt, Pending, Phase, PlayerId, Rejection};
use crate::rules::effects;
use crate::rules::engine::Ruleset;

/// Open a wizard for `card` and suspend the current phase.
pub fn play(state: &mut GameState, player: PlayerId, card: EventCard, log: &mut Vec<GameEvent>) {
    let source = if state.players[player].holds(PlayerCard::Event(card)) {
        CardSource::Hand
    } else {
        CardSource::Stash
    };
    debug!(%player, %card, ?source, "Event wizard opened");
    state.pending = Some(Pending::Event(EventWizard::new(card, player, source)));
    effects::interrupt(state, Phase::Resolving(Interrupt::Event(card)), log);
}

fn open_wizard(state: &mut GameState) -> Result<&mut EventWizard, Rejection> {
    match &mut state.pending {
        Some(Pending::Event(w)) => Ok(w),
        _ => Err(Rejection::NoWizard),
    }
}

/// Record a checked selection.
pub fn submit(state: &mut GameState, selection: Selection) -> Result<(), Rejection> {
    open_wizard(state)?.selections.push(selection);
    Ok(())
}

/// Drop the last selection.
pub fn back(state: &mut GameState) -> Result<(), Rejection> {
    open_wizard(state)?
        .selections
        .pop()
        .map(|_| ())
        .ok_or(Rejection::InvalidSelection("nothing to go back to"))
}

/// Spend the card, resume the suspended phase, and apply the effect.
pub fn confirm(rs: &Ruleset, state: &mut GameState, log: &mut Vec<GameEvent>) -> Result<(), Rejection> {
    let Some(Pending::Event(wizard)) = state.pending.take() else {
        return Err(Rejection::NoWizard);
    };
    let (card, player) = (wizard.card, wizard.player);

    match wizard.source {
        CardSource::Hand => effects::discard(state, player, PlayerCard::Event(card), log)?,
        CardSource::Stash => {
            state.players[player].stash = None;
            state.removed_cards.push_back(PlayerCard::Event(card));
        }
    }
    effects::resume(state, Phase::PlayerAction, log);

    let mode = wizard.mode().unwrap_or(EventMode::Normal);
    info!(%player, %card, ?mode, "Event played");
    log.push(GameEvent::EventPlayed {
        player,
        card,
        mode: card.is_dual_mode().then_some(mode),
    });
    resolver::resolve(rs, state, &wizard, log)?;

    if mode == EventMode::Corrupt {
        state.decline = state.decline.saturating_add(1);
        log.push(GameEvent::DeclineIncreased {
            level: state.decline,
        });
    }

    if card == EventCard::RapidVaccineDeployment
        && matches!(state.phase, Phase::Resolving(Interrupt::PostCure(_)))
    {
        effects::resume(state, Phase::PlayerAction, log);
    }
    Ok(())
}

/// Close the wizard without effect.
pub fn cancel(state: &mut GameState, log: &mut Vec<GameEvent>) {
    let Some(Pending::Event(wizard)) = state.pending.take() else {
        return;
    };
    debug!(card = %wizard.card, "Event cancelled");
    effects::resume(state, Phase::PlayerAction, log);
    log.push(GameEvent::EventCancelled { card: wizard.card });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, Role, Variant};

    fn setup() -> (Ruleset, GameState) {
        let config = GameConfig::new(Variant::Classic)
            .with_roles(vec![Role::ContingencyPlanner, Role::Scientist]);
        let rs = Ruleset::new(config).unwrap();
        let mut state = GameState::new(rs.config(), rs.board().start());
        state.phase = Phase::PlayerAction;
        (rs, state)
    }

    #[test]
    fn test_play_suspends_and_cancel_restores() {
        let (_, mut state) = setup();
        let mut log = Vec::new();
        let card = PlayerCard::Event(EventCard::OneQuietNight);
        state.players[PlayerId(1)].hand.push_back(card);
        let before = state.clone();

        play(&mut state, PlayerId(1), EventCard::OneQuietNight, &mut log);
        assert_eq!(
            state.phase,
            Phase::Resolving(Interrupt::Event(EventCard::OneQuietNight))
        );
        cancel(&mut state, &mut log);
        assert_eq!(state, before);
    }

    #[test]
    fn test_back_at_first_step_fails() {
        let (_, mut state) = setup();
        let mut log = Vec::new();
        state.players[PlayerId(0)]
            .hand
            .push_back(PlayerCard::Event(EventCard::Airlift));
        play(&mut state, PlayerId(0), EventCard::Airlift, &mut log);
        assert!(back(&mut state).is_err());
        submit(&mut state, Selection::Player(PlayerId(1))).unwrap();
        assert!(back(&mut state).is_ok());
    }

    #[test]
    fn test_confirm_from_stash_removes_card() {
        let (rs, mut state) = setup();
        let mut log = Vec::new();
        state.players[PlayerId(0)].stash = Some(EventCard::OneQuietNight);
        play(&mut state, PlayerId(0), EventCard::OneQuietNight, &mut log);
        confirm(&rs, &mut state, &mut log).unwrap();

        assert_eq!(state.players[PlayerId(0)].stash, None);
        assert!(state
            .removed_cards
            .contains(&PlayerCard::Event(EventCard::OneQuietNight)));
        assert!(state.player_discard.is_empty());
        assert_eq!(state.quiet_nights, 1);
        assert_eq!(state.phase, Phase::PlayerAction);
    }
}
