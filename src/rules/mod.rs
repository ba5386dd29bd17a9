//! Game rules.
//!
//! - `engine`: the `RulesEngine` trait and the `Ruleset` reducer
//! - `legality`: one pure predicate per command
//! - `phase`: the turn controller
//! - `infection`, `cure`, `battle`: the larger resolvers
//! - `effects`: bookkeeping shared by every resolver
//!
//! Resolvers take `&mut GameState` on a clone the reducer owns; callers
//! only ever see whole transitions.

pub mod battle;
pub mod cure;
pub mod effects;
pub mod engine;
pub mod infection;
pub mod legality;
pub mod phase;

pub use battle::{BattleOutcome, DieFace};
pub use cure::{CureMethod, CureOffer};
pub use engine::{GameResult, Ruleset, RulesEngine, Transition};
