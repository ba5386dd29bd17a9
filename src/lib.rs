//! # outbreak
//!
//! Rules engine for cooperative outbreak board games: the Classic game and
//! the Rome and Iberia variants.
//!
//! ## Design Principles
//!
//! 1. **Pure Reducer**: `Ruleset::apply_action(state, player, action)` either
//!    rejects the command or returns a new state plus the events it caused.
//!    The input state is never touched.
//!
//! 2. **Variant Data, Shared Rules**: Boards, supplies, rate tables and
//!    roles are data in `VariantRules` and `Board`. One rule set reads them.
//!
//! 3. **Explicit Suspension**: Discards, event wizards and post-cure windows
//!    are phases on a stack, not callbacks. Every suspended state is a
//!    plain value that can be cloned, serialized or undone.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) cloning via `im-rs`, so undo
//!   snapshots and speculative transitions cost a few pointer copies.
//!
//! - **Deterministic RNG**: ChaCha8 seeded per game and stored in the state.
//!   The same seed and commands always replay the same game.
//!
//! ## Modules
//!
//! - `board`: Colors, cities, adjacency and the three maps
//! - `cards`: Player, infection and event cards; deck setup
//! - `core`: Players, roles, state, actions, phases, events, configuration
//! - `rules`: Legality, the phase controller and the resolvers
//! - `events`: Event cards as multi-step wizards
//! - `history`: The undo ledger
//! - `session`: `Game` and `GameBuilder`
//! - `narrative`: Pluggable flavor text for headline events

pub mod board;
pub mod cards;
pub mod core;
pub mod events;
pub mod history;
pub mod narrative;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use crate::board::{Board, CityId, Color, ColorMap, Route};

pub use crate::cards::{CityCard, EventCard, InfectionCard, PlayerCard};

pub use crate::core::{
    Action, ActionRecord, ConfigError, DefeatReason, GameConfig, GameEvent, GameState, Phase,
    PlayerId, PlayerMap, Rejection, Role, Variant,
};

pub use crate::events::{EventMode, EventWizard, ParamKind, Selection};

pub use crate::rules::{GameResult, Ruleset, RulesEngine, Transition};

pub use crate::session::{Affordances, Game, GameBuilder, SessionError};
