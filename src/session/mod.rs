//! A running game: the reducer plus the undo ledger.
//!
//! `Ruleset::apply_action` is pure and knows nothing about undo. `Game`
//! owns the current state, records undoable commands in an `UndoLedger`
//! and keeps the state an open event wizard started from, so cancelling
//! always lands exactly where the player began.

mod builder;

pub use builder::GameBuilder;

use thiserror::Error;
use tracing::debug;

use crate::board::{CityId, Color, ALL_COLORS};
use crate::cards::EventCard;
use crate::core::{
    Action, ConfigError, GameConfig, GameEvent, GameState, Pending, Phase, PlayerId, Rejection,
};
use crate::events::targeting;
use crate::events::{ParamKind, Selection};
use crate::history::UndoLedger;
use crate::rules::{cure, legality, CureOffer, GameResult, Ruleset, RulesEngine};

/// Failures outside the rules: bad configuration or a corrupt checkpoint.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("checkpoint could not be decoded: {0}")]
    Checkpoint(#[from] bincode::Error),
}

/// Everything the presentation layer needs to enable its controls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Affordances {
    pub phase: Phase,
    pub is_current: bool,
    pub actions_remaining: u8,
    /// Every legal command, `Undo` included.
    pub legal: Vec<Action>,
    pub move_targets: Vec<CityId>,
    pub treatable: Vec<Color>,
    pub cure_offers: Vec<(Color, CureOffer)>,
    pub playable_events: Vec<EventCard>,
    pub can_undo: bool,
    /// The parameter the open wizard is asking for, if any.
    pub wizard_param: Option<ParamKind>,
    pub wizard_options: Vec<Selection>,
}

impl Affordances {
    #[must_use]
    pub fn allows(&self, action: &Action) -> bool {
        self.legal.contains(action)
    }
}

#[derive(Clone, Debug)]
pub struct Game {
    ruleset: Ruleset,
    state: GameState,
    ledger: UndoLedger,
    /// State before the open wizard's `PlayEvent`.
    wizard_origin: Option<GameState>,
}

impl Game {
    fn from_parts(ruleset: Ruleset, state: GameState) -> Self {
        Self {
            ruleset,
            state,
            ledger: UndoLedger::new(),
            wizard_origin: None,
        }
    }

    /// Adopt an existing state, with an empty ledger.
    pub fn resume(config: GameConfig, state: GameState) -> Result<Self, SessionError> {
        Ok(Self::from_parts(Ruleset::new(config)?, state))
    }

    /// Resume from bytes produced by `GameState::checkpoint`.
    pub fn from_checkpoint(config: GameConfig, bytes: &[u8]) -> Result<Self, SessionError> {
        let state = GameState::restore(bytes)?;
        Self::resume(config, state)
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    #[must_use]
    pub fn ledger(&self) -> &UndoLedger {
        &self.ledger
    }

    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.ruleset.is_terminal(&self.state)
    }

    fn can_undo(&self, player: PlayerId) -> bool {
        player == self.state.current_player
            && !self.ledger.is_empty()
            && legality::check_undo(&self.state).is_ok()
    }

    /// Legal commands for `player`, including `Undo` when the ledger allows it.
    #[must_use]
    pub fn legal_actions(&self, player: PlayerId) -> Vec<Action> {
        let mut legal = self.ruleset.legal_actions(&self.state, player);
        if self.can_undo(player) {
            legal.push(Action::Undo);
        }
        legal
    }

    /// Apply one command. On rejection the game is unchanged.
    pub fn apply(&mut self, player: PlayerId, action: Action) -> Result<Vec<GameEvent>, Rejection> {
        if action == Action::Undo {
            return self.undo(player);
        }

        let before = &self.state;
        let mut transition = self.ruleset.apply_action(before, player, &action)?;
        let record = transition.state.history.last().cloned();
        let undoable = before.phase.allows_undo() && before.pending.is_none();

        match &action {
            Action::PlayEvent { .. } => {
                self.wizard_origin = Some(before.clone());
            }
            Action::CancelEvent => {
                if let Some(origin) = self.wizard_origin.take() {
                    transition.state = origin;
                }
            }
            Action::ConfirmEvent => {
                if let (Some(origin), Some(record)) = (self.wizard_origin.take(), record) {
                    if origin.phase.allows_undo() && origin.pending.is_none() {
                        self.ledger.push(record, origin);
                    }
                }
            }
            Action::DrawPlayerCards => self.ledger.clear(),
            _ if undoable && !action.is_wizard_step() => {
                if let Some(record) = record {
                    self.ledger.push(record, before.clone());
                }
            }
            _ => {}
        }

        let next = transition.state;
        if next.current_player != self.state.current_player
            || next.turn_number != self.state.turn_number
        {
            self.ledger.clear();
        }
        if next.pending.is_none() {
            self.wizard_origin = None;
        }
        self.state = next;
        Ok(transition.events)
    }

    fn undo(&mut self, player: PlayerId) -> Result<Vec<GameEvent>, Rejection> {
        self.state.player(player)?;
        legality::check_undo(&self.state)?;
        if player != self.state.current_player {
            return Err(Rejection::NotYourTurn);
        }
        let entry = self.ledger.pop().ok_or(Rejection::NothingToUndo)?;
        debug!(
            player = %entry.record.player,
            action = entry.record.action.name(),
            remaining = self.ledger.len(),
            "Undid command"
        );
        self.state = entry.snapshot;
        self.wizard_origin = None;
        Ok(Vec::new())
    }

    /// Pre-evaluated legality for building a UI.
    #[must_use]
    pub fn affordances(&self, player: PlayerId) -> Affordances {
        let state = &self.state;
        let legal = self.legal_actions(player);

        let mut move_targets = Vec::new();
        let mut treatable = Vec::new();
        let mut playable_events = Vec::new();
        for action in &legal {
            match action {
                Action::Drive { to, .. }
                | Action::DirectFlight { to }
                | Action::CharterFlight { to }
                | Action::ShuttleFlight { to }
                | Action::OperationsFlight { to, .. }
                | Action::RailMove { to }
                | Action::Sail { to, .. } => {
                    if !move_targets.contains(to) {
                        move_targets.push(*to);
                    }
                }
                Action::Treat { color, .. } => {
                    if !treatable.contains(color) {
                        treatable.push(*color);
                    }
                }
                Action::PlayEvent { card } => {
                    if !playable_events.contains(card) {
                        playable_events.push(*card);
                    }
                }
                _ => {}
            }
        }
        move_targets.sort_unstable();

        let mut cure_offers = Vec::new();
        if legal.iter().any(|a| matches!(a, Action::Cure { .. })) {
            for color in ALL_COLORS {
                for offer in cure::offers(&self.ruleset, state, player, color) {
                    cure_offers.push((color, offer));
                }
            }
        }

        let (wizard_param, wizard_options) = match &state.pending {
            Some(Pending::Event(wizard)) if wizard.player == player => (
                targeting::next_param(&self.ruleset, state, wizard),
                targeting::options(&self.ruleset, state, wizard),
            ),
            _ => (None, Vec::new()),
        };

        Affordances {
            phase: state.phase,
            is_current: player == state.current_player,
            actions_remaining: state.actions_remaining,
            can_undo: legal.contains(&Action::Undo),
            legal,
            move_targets,
            treatable,
            cure_offers,
            playable_events,
            wizard_param,
            wizard_options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::PlayerCard;
    use crate::core::{Role, Variant};

    fn classic() -> Game {
        GameBuilder::new(Variant::Classic)
            .roles(vec![Role::Medic, Role::Scientist])
            .seed(3)
            .build()
            .unwrap()
    }

    fn first_drive(game: &Game) -> Action {
        game.legal_actions(PlayerId(0))
            .into_iter()
            .find(|a| matches!(a, Action::Drive { .. }))
            .unwrap()
    }

    #[test]
    fn test_undo_restores_previous_state() {
        let mut game = classic();
        let before = game.state().clone();
        let drive = first_drive(&game);

        game.apply(PlayerId(0), drive).unwrap();
        assert_eq!(game.ledger().len(), 1);
        assert!(game.legal_actions(PlayerId(0)).contains(&Action::Undo));

        game.apply(PlayerId(0), Action::Undo).unwrap();
        assert_eq!(game.state(), &before);
        assert!(game.ledger().is_empty());
    }

    #[test]
    fn test_undo_with_empty_ledger() {
        let mut game = classic();
        assert_eq!(
            game.apply(PlayerId(0), Action::Undo),
            Err(Rejection::NothingToUndo)
        );
    }

    #[test]
    fn test_drawing_clears_ledger() {
        let mut game = classic();
        let drive = first_drive(&game);
        game.apply(PlayerId(0), drive).unwrap();
        game.apply(PlayerId(0), Action::EndActions).unwrap();
        assert_eq!(game.ledger().len(), 2);
        assert_eq!(game.state().phase, Phase::PreDrawPlayerCards);

        game.apply(PlayerId(0), Action::DrawPlayerCards).unwrap();
        assert!(game.ledger().is_empty());
        assert!(!game.legal_actions(PlayerId(0)).contains(&Action::Undo));
    }

    #[test]
    fn test_rejection_leaves_game_unchanged() {
        let mut game = classic();
        let before = game.state().clone();
        assert!(game.apply(PlayerId(1), Action::EndActions).is_err());
        assert_eq!(game.state(), &before);
        assert!(game.ledger().is_empty());
    }

    fn with_quiet_night() -> Game {
        let game = classic();
        let mut state = game.state().clone();
        state.players[PlayerId(0)]
            .hand
            .push_back(PlayerCard::Event(EventCard::OneQuietNight));
        Game::resume(game.ruleset().config().clone(), state).unwrap()
    }

    #[test]
    fn test_cancel_restores_wizard_origin() {
        let mut game = with_quiet_night();
        let before = game.state().clone();

        game.apply(PlayerId(0), Action::PlayEvent { card: EventCard::OneQuietNight })
            .unwrap();
        assert!(game.state().pending.is_some());
        game.apply(PlayerId(0), Action::CancelEvent).unwrap();
        assert_eq!(game.state(), &before);
        assert!(game.ledger().is_empty());
    }

    #[test]
    fn test_confirmed_event_is_undoable() {
        let mut game = with_quiet_night();
        let before = game.state().clone();

        game.apply(PlayerId(0), Action::PlayEvent { card: EventCard::OneQuietNight })
            .unwrap();
        game.apply(PlayerId(0), Action::ConfirmEvent).unwrap();
        assert_eq!(game.state().quiet_nights, 1);
        assert_eq!(game.ledger().len(), 1);
        assert!(matches!(
            game.ledger().peek().map(|e| &e.record.action),
            Some(Action::PlayEvent { card: EventCard::OneQuietNight })
        ));

        game.apply(PlayerId(0), Action::Undo).unwrap();
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_affordances_match_legal_actions() {
        let game = classic();
        let aff = game.affordances(PlayerId(0));
        assert!(aff.is_current);
        assert_eq!(aff.phase, Phase::PlayerAction);
        assert!(!aff.move_targets.is_empty());
        assert!(!aff.can_undo);
        assert!(aff.legal.iter().all(|a| aff.allows(a)));

        let other = game.affordances(PlayerId(1));
        assert!(!other.is_current);
        assert!(other.move_targets.is_empty());
    }

    #[test]
    fn test_checkpoint_round_trip() {
        let game = classic();
        let bytes = game.state().checkpoint().unwrap();
        let resumed = Game::from_checkpoint(game.ruleset().config().clone(), &bytes).unwrap();
        assert_eq!(resumed.state(), game.state());
    }
}
