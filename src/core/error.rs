//! Error types.
//!
//! - `Rejection`: a command was illegal. Expected and user-facing; the
//!   state is left untouched.
//! - `InvariantViolation`: a resolver produced a state that breaks a rule
//!   the engine guarantees. An engine defect; the mutation is discarded.
//! - `ConfigError`: a `GameConfig` that cannot start a game.

use thiserror::Error;

use super::config::Variant;
use super::role::Role;
use crate::board::{CityId, Color};

/// Why a command was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("the game is over")]
    GameOver,
    #[error("not allowed in the current phase")]
    WrongPhase,
    #[error("it is not this player's turn")]
    NotYourTurn,
    #[error("no actions remaining this turn")]
    NoActionsLeft,
    #[error("not part of this variant")]
    NotInVariant,
    #[error("this player's role cannot do that")]
    WrongRole,
    #[error("unknown player")]
    UnknownPlayer,
    #[error("unknown city {0}")]
    UnknownCity(CityId),
    #[error("destination is not connected")]
    NotConnected,
    #[error("destination is the current city")]
    SameCity,
    #[error("the required card is not in hand")]
    MissingCard,
    #[error("players are not in the same city")]
    NotTogether,
    #[error("no research station or fort here")]
    NoStation,
    #[error("a station already stands here")]
    StationExists,
    #[error("no {0} cubes here")]
    NoCubes(Color),
    #[error("{0} is already cured")]
    AlreadyCured(Color),
    #[error("{0} is not cured")]
    NotCured(Color),
    #[error("needs {need} cards, has {have}")]
    NotEnoughCards { need: usize, have: usize },
    #[error("the supply is empty")]
    SupplyExhausted,
    #[error("already used this turn")]
    AlreadyUsed,
    #[error("not a port")]
    NotAPort,
    #[error("no legions here")]
    NoLegions,
    #[error("no barbarians here")]
    NoBarbarians,
    #[error("too many dice: at most {0}")]
    TooManyDice(u8),
    #[error("invalid selection: {0}")]
    InvalidSelection(&'static str),
    #[error("an event is already being resolved")]
    WizardBusy,
    #[error("no event is being resolved")]
    NoWizard,
    #[error("the event still needs selections")]
    WizardIncomplete,
    #[error("no hand is over its limit")]
    NotOverLimit,
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("engine defect: {0}")]
    Internal(#[from] InvariantViolation),
}

/// A broken engine guarantee.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("{color} cubes: {on_board} on board + {in_supply} in supply != {total}")]
    CubeConservation {
        color: Color,
        on_board: u32,
        in_supply: u32,
        total: u32,
    },
    #[error("city {city} holds {count} {color} cubes")]
    CityOverCap { city: CityId, color: Color, count: u8 },
    #[error("outbreak counter went from {before} to {after}")]
    OutbreaksRegressed { before: u8, after: u8 },
    #[error("outbreak counter at maximum without defeat")]
    MaxOutbreaksWithoutDefeat,
    #[error("{0} marked eradicated while not cured or still on board")]
    FalseEradication(Color),
    #[error("a hand is over its limit outside the discard phase")]
    HandLimitUnresolved,
}

/// A configuration that cannot start a game.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("player count {0} outside 2..=5")]
    PlayerCount(usize),
    #[error("epidemic count {0} outside 4..=7")]
    EpidemicCount(u8),
    #[error("cure card count {0} outside 3..=7")]
    CureCards(u8),
    #[error("{0} is not available in {1:?}")]
    RoleNotInVariant(Role, Variant),
    #[error("{0} dealt twice")]
    DuplicateRole(Role),
    #[error("mutation challenge is not available in {0:?}")]
    MutationNotInVariant(Variant),
    #[error("board has no cities")]
    EmptyBoard,
    #[error("unknown city {0:?} in board data")]
    UnknownCityName(String),
}

/// Result of a legality predicate: `Ok(())` when allowed.
pub type Legality = Result<(), Rejection>;
