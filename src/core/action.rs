//! Commands a player can issue.
//!
//! One variant per action, ability, wizard step, or turn-flow command. The
//! reducer matches on this enum exhaustively, so adding a command is a
//! compile-time change everywhere it matters.
//!
//! Actions are plain data (`serde`), so a UI can send them as JSON:
//!
//! ```
//! use outbreak::board::CityId;
//! use outbreak::core::Action;
//!
//! let drive = Action::Drive { to: CityId(1), legions: 0 };
//! let json = serde_json::to_string(&drive).unwrap();
//! assert_eq!(serde_json::from_str::<Action>(&json).unwrap(), drive);
//! assert!(drive.spends_action());
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::PlayerId;
use crate::board::{CityId, Color};
use crate::cards::{CityCard, EventCard, PlayerCard};
use crate::events::Selection;
use crate::rules::cure::CureMethod;

/// Cards offered for a cure. Five fit inline.
pub type CureCards = SmallVec<[PlayerCard; 5]>;

/// Barbarians to remove after a battle, per tribe.
pub type Removals = SmallVec<[(Color, u8); 4]>;

/// A complete command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    // === Setup ===
    ChooseStartingCity { city: CityId },

    // === Movement ===
    /// Move to an adjacent city, optionally marching legions along.
    Drive { to: CityId, legions: u8 },
    DirectFlight { to: CityId },
    CharterFlight { to: CityId },
    ShuttleFlight { to: CityId },
    OperationsFlight { to: CityId, discard: CityCard },
    /// Dispatcher: move `pawn` to an adjacent city or a city holding another pawn.
    DispatchToPawn { pawn: PlayerId, to: CityId },
    /// Travel any distance along connected railroads.
    RailMove { to: CityId },
    /// Port to port. `card` is the fare unless the role sails free.
    Sail {
        to: CityId,
        card: Option<CityCard>,
        legions: u8,
    },

    // === Board Actions ===
    Treat { color: Color, keep_sample: bool },
    Cure {
        color: Color,
        method: CureMethod,
        cards: CureCards,
    },
    /// Build a research station (fort in Rome), moving `remove` if the supply is empty.
    BuildStation { remove: Option<CityId> },
    ShareKnowledge {
        other: PlayerId,
        card: CityCard,
        give: bool,
    },
    /// Lay track to an adjacent city; the Railwayman may `extend` one further.
    BuildRailroad { to: CityId, extend: Option<CityId> },
    BuildHospital,
    Purify { discard: CityCard },
    PlacePreventionToken { city: CityId },
    Recruit { count: u8 },
    Battle { dice: u8 },
    Enlist { color: Color },

    // === Role Abilities ===
    ContingencyTake { card: EventCard },
    EpidemiologistTake { from: PlayerId, card: CityCard },
    ArchivistRetrieve,

    // === Events and Interrupts ===
    PlayEvent { card: EventCard },
    SubmitSelection { selection: Selection },
    WizardBack,
    ConfirmEvent,
    CancelEvent,
    ChooseBattleRemovals { removals: Removals },

    // === Turn Flow ===
    EndActions,
    DrawPlayerCards,
    /// Close an optional window (post-epidemic, post-cure).
    Continue,
    Discard { card: PlayerCard },
    InfectCities,
    Undo,
}

impl Action {
    /// Stable command name, used in logs and narration.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Action::ChooseStartingCity { .. } => "choose_starting_city",
            Action::Drive { .. } => "drive",
            Action::DirectFlight { .. } => "direct_flight",
            Action::CharterFlight { .. } => "charter_flight",
            Action::ShuttleFlight { .. } => "shuttle_flight",
            Action::OperationsFlight { .. } => "operations_flight",
            Action::DispatchToPawn { .. } => "dispatch",
            Action::RailMove { .. } => "rail_move",
            Action::Sail { .. } => "sail",
            Action::Treat { .. } => "treat",
            Action::Cure { .. } => "cure",
            Action::BuildStation { .. } => "build_station",
            Action::ShareKnowledge { .. } => "share_knowledge",
            Action::BuildRailroad { .. } => "build_railroad",
            Action::BuildHospital => "build_hospital",
            Action::Purify { .. } => "purify",
            Action::PlacePreventionToken { .. } => "place_prevention_token",
            Action::Recruit { .. } => "recruit",
            Action::Battle { .. } => "battle",
            Action::Enlist { .. } => "enlist",
            Action::ContingencyTake { .. } => "contingency_take",
            Action::EpidemiologistTake { .. } => "epidemiologist_take",
            Action::ArchivistRetrieve => "archivist_retrieve",
            Action::PlayEvent { .. } => "play_event",
            Action::SubmitSelection { .. } => "submit_selection",
            Action::WizardBack => "wizard_back",
            Action::ConfirmEvent => "confirm_event",
            Action::CancelEvent => "cancel_event",
            Action::ChooseBattleRemovals { .. } => "choose_battle_removals",
            Action::EndActions => "end_actions",
            Action::DrawPlayerCards => "draw_player_cards",
            Action::Continue => "continue",
            Action::Discard { .. } => "discard",
            Action::InfectCities => "infect_cities",
            Action::Undo => "undo",
        }
    }

    /// True if the command costs one of the current player's actions.
    #[must_use]
    pub const fn spends_action(&self) -> bool {
        matches!(
            self,
            Action::Drive { .. }
                | Action::DirectFlight { .. }
                | Action::CharterFlight { .. }
                | Action::ShuttleFlight { .. }
                | Action::OperationsFlight { .. }
                | Action::DispatchToPawn { .. }
                | Action::RailMove { .. }
                | Action::Sail { .. }
                | Action::Treat { .. }
                | Action::Cure { .. }
                | Action::BuildStation { .. }
                | Action::ShareKnowledge { .. }
                | Action::BuildRailroad { .. }
                | Action::BuildHospital
                | Action::Purify { .. }
                | Action::PlacePreventionToken { .. }
                | Action::Recruit { .. }
                | Action::Battle { .. }
                | Action::Enlist { .. }
                | Action::ContingencyTake { .. }
                | Action::ArchivistRetrieve
        )
    }

    /// True for the steps of an event wizard, which never reach history.
    #[must_use]
    pub const fn is_wizard_step(&self) -> bool {
        matches!(
            self,
            Action::PlayEvent { .. }
                | Action::SubmitSelection { .. }
                | Action::WizardBack
                | Action::CancelEvent
        )
    }
}

/// A recorded command with metadata for history tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who issued the command.
    pub player: PlayerId,

    /// The command.
    pub action: Action,

    /// Turn number when the command was accepted.
    pub turn: u32,

    /// Sequence number within the turn (for ordering).
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            turn,
            sequence,
        }
    }
}
