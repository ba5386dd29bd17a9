//! Event cards.
//!
//! Playing an event opens a wizard: the engine suspends the current phase
//! in `Resolving(Event(card))` and the player supplies one `Selection` at a
//! time. The next expected parameter is computed from the state and the
//! selections so far, so a UI only ever asks "what next?":
//!
//! - `targeting`: which parameter comes next and which values are valid
//! - `wizard`: the play / submit / back / confirm / cancel protocol
//! - `resolver`: applying a completed wizard to the state
//!
//! Nothing touches the board until the wizard is confirmed. Cancelling
//! returns the exact pre-play state.

pub mod resolver;
pub mod targeting;
pub mod wizard;

use serde::{Deserialize, Serialize};

use crate::board::{CityId, Color, Route};
use crate::cards::{EventCard, InfectionCard, PlayerCard};
use crate::core::{PlayerId, Role};
use crate::rules::battle::DieFace;

/// How a dual-mode card resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventMode {
    Normal,
    /// Stronger effect, paid for with a decline token.
    Corrupt,
}

/// One wizard parameter value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    Mode(EventMode),
    Player(PlayerId),
    City(CityId),
    Color(Color),
    Quantity(u8),
    InfectionCard(InfectionCard),
    PlayerCard(PlayerCard),
    /// A new order for the top of the infection deck, top first.
    Permutation(Vec<InfectionCard>),
    /// `(city, color, count)` cube removals.
    CubePicks(Vec<(CityId, Color, u8)>),
    Dice(Vec<DieFace>),
    Role(Role),
    Route(Route),
}

/// What the wizard asks for next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamKind {
    Mode,
    Player,
    City,
    Color,
    Quantity { min: u8, max: u8 },
    InfectionCard,
    PlayerCard,
    Permutation { len: usize },
    CubePicks { max: u8 },
    Dice { max: u8 },
    Role,
    Route,
}

impl Selection {
    /// True if this value answers a `kind` question.
    #[must_use]
    pub fn fits(&self, kind: ParamKind) -> bool {
        matches!(
            (self, kind),
            (Selection::Mode(_), ParamKind::Mode)
                | (Selection::Player(_), ParamKind::Player)
                | (Selection::City(_), ParamKind::City)
                | (Selection::Color(_), ParamKind::Color)
                | (Selection::Quantity(_), ParamKind::Quantity { .. })
                | (Selection::InfectionCard(_), ParamKind::InfectionCard)
                | (Selection::PlayerCard(_), ParamKind::PlayerCard)
                | (Selection::Permutation(_), ParamKind::Permutation { .. })
                | (Selection::CubePicks(_), ParamKind::CubePicks { .. })
                | (Selection::Dice(_), ParamKind::Dice { .. })
                | (Selection::Role(_), ParamKind::Role)
                | (Selection::Route(_), ParamKind::Route)
        )
    }
}

/// Where the played card came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardSource {
    Hand,
    /// The Contingency Planner's stored event. Removed from the game after use.
    Stash,
}

/// An event being resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWizard {
    pub card: EventCard,
    pub player: PlayerId,
    pub source: CardSource,
    /// Selections so far. Dual-mode cards take the mode first.
    pub selections: Vec<Selection>,
}

impl EventWizard {
    #[must_use]
    pub fn new(card: EventCard, player: PlayerId, source: CardSource) -> Self {
        Self {
            card,
            player,
            source,
            selections: Vec::new(),
        }
    }

    /// The chosen mode. `Normal` for single-mode cards; `None` until chosen.
    #[must_use]
    pub fn mode(&self) -> Option<EventMode> {
        if !self.card.is_dual_mode() {
            return Some(EventMode::Normal);
        }
        match self.selections.first() {
            Some(Selection::Mode(mode)) => Some(*mode),
            _ => None,
        }
    }

    /// Selections after the mode.
    #[must_use]
    pub fn params(&self) -> &[Selection] {
        if self.card.is_dual_mode() && !self.selections.is_empty() {
            &self.selections[1..]
        } else {
            &self.selections
        }
    }
}
