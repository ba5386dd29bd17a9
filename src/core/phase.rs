//! Turn phases.
//!
//! `Phase` is the controller's position in the turn, not a flag. Phases
//! that interrupt another (`Discard`, `Resolving(_)`) push the interrupted
//! phase onto `GameState::phase_stack` and pop it when they finish.

use serde::{Deserialize, Serialize};

use crate::board::Color;
use crate::cards::EventCard;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The game is being built.
    Setup,
    /// Players pick their starting cities in seat order.
    ChoosingStartingCity,
    /// The current player spends actions.
    PlayerAction,
    /// Actions are spent; events and undo are still possible.
    PreDrawPlayerCards,
    /// Player cards are being drawn.
    DrawingPlayerCards,
    /// Some hand is over its limit.
    Discard,
    /// An epidemic is increasing the rate and infecting.
    EpidemicAnnounceInfect,
    /// After an epidemic's infect step, before intensify.
    PostEpidemicEventWindow,
    /// Waiting for the infection step to be resolved.
    InfectionStep,
    /// An interrupting ability or event is collecting parameters.
    Resolving(Interrupt),
    Victory,
    Defeat(DefeatReason),
}

impl Phase {
    /// True for `Victory` and `Defeat`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Phase::Victory | Phase::Defeat(_))
    }

    /// True while the undo ledger may be popped.
    #[must_use]
    pub const fn allows_undo(self) -> bool {
        matches!(self, Phase::PlayerAction | Phase::PreDrawPlayerCards)
    }
}

/// What a `Resolving` phase is waiting on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interrupt {
    /// An event wizard is collecting selections.
    Event(EventCard),
    /// A cure just landed; Rapid Vaccine Deployment may be played.
    PostCure(Color),
    /// A battle hit several tribes; the player picks which to remove.
    BattleRemoval,
}

/// Why the players lost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefeatReason {
    /// The outbreak counter reached its maximum.
    Outbreaks,
    /// A color's cube supply ran out.
    CubesExhausted(Color),
    /// Fewer player cards than required were left to draw.
    PlayerDeckExhausted,
    /// An infection step or epidemic found no infection card to draw.
    InfectionDeckExhausted,
    /// The capital was sacked.
    CapitalSacked,
}

impl std::fmt::Display for DefeatReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefeatReason::Outbreaks => f.write_str("too many outbreaks"),
            DefeatReason::CubesExhausted(c) => write!(f, "no {c} cubes left"),
            DefeatReason::PlayerDeckExhausted => f.write_str("the player deck ran out"),
            DefeatReason::InfectionDeckExhausted => f.write_str("the infection deck ran out"),
            DefeatReason::CapitalSacked => f.write_str("the capital was sacked"),
        }
    }
}
