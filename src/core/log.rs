//! Game events emitted by the reducer.
//!
//! Every accepted command yields the events it caused, in order. The
//! narrative layer and UIs consume them; the engine never reads them back.

use serde::{Deserialize, Serialize};

use super::phase::{DefeatReason, Phase};
use super::player::PlayerId;
use super::role::Role;
use crate::board::{CityId, Color};
use crate::cards::{EventCard, InfectionCard, PlayerCard};
use crate::events::EventMode;
use crate::rules::battle::DieFace;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    // === Turn Flow ===
    PhaseChanged { from: Phase, to: Phase },
    TurnStarted { player: PlayerId, turn: u32 },
    ActionsGranted { player: PlayerId, count: u8 },

    // === Pawns and Cards ===
    PawnMoved { player: PlayerId, from: CityId, to: CityId },
    CardDrawn { player: PlayerId, card: PlayerCard },
    CardDiscarded { player: PlayerId, card: PlayerCard },
    CardGiven { from: PlayerId, to: PlayerId, card: PlayerCard },
    CardRetrieved { player: PlayerId, card: PlayerCard },
    RoleChanged { player: PlayerId, from: Role, to: Role },

    // === Cubes ===
    CubesPlaced { city: CityId, color: Color, count: u8 },
    CubesRemoved { city: CityId, color: Color, count: u8 },
    InfectionPrevented { city: CityId, color: Color },
    Outbreak { city: CityId, color: Color, total: u8 },
    InfectionCardDrawn { card: InfectionCard },
    InfectionStepSkipped,
    Epidemic { city: CityId, color: Color },
    Intensified { cards: usize },
    InfectionRateIncreased { rate: u8 },

    // === Progress ===
    Cured { color: Color },
    Eradicated { color: Color },
    StationBuilt { city: CityId },
    StationRemoved { city: CityId },
    HospitalBuilt { city: CityId, color: Color },
    RailroadBuilt { from: CityId, to: CityId },
    PurificationPlaced { city: CityId, count: u8 },
    PreventionTokenPlaced { city: CityId },

    // === Rome ===
    LegionsRecruited { city: CityId, count: u8 },
    LegionsLost { city: CityId, count: u8 },
    BattleRolled { city: CityId, faces: Vec<DieFace> },
    Enlisted { city: CityId, color: Color },
    DeclineIncreased { level: u8 },

    // === Events ===
    EventPlayed { player: PlayerId, card: EventCard, mode: Option<EventMode> },
    EventCancelled { card: EventCard },
    InfectionDeckReordered { count: usize },

    // === End ===
    Victory,
    Defeat { reason: DefeatReason },
}
