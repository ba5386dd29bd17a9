//! Core engine types: players, state, actions, RNG, configuration, errors.
//!
//! Everything here is plain data. Rules live in `crate::rules`; this module
//! only defines what a game *is*, not how it moves.

pub mod action;
pub mod config;
pub mod error;
pub mod log;
pub mod phase;
pub mod player;
pub mod rng;
pub mod role;
pub mod state;

pub use action::{Action, ActionRecord, CureCards, Removals};
pub use config::{GameConfig, Variant, VariantRules};
pub use error::{ConfigError, InvariantViolation, Legality, Rejection};
pub use log::GameEvent;
pub use phase::{DefeatReason, Interrupt, Phase};
pub use player::{Player, PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use role::Role;
pub use state::{DiceOverride, DiseaseStatus, GameState, Pending, TurnFlags};
