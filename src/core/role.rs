//! Player roles. Each role bends one or more rules; the bends themselves
//! live in `rules::legality` and the resolvers, keyed on these variants.

use serde::{Deserialize, Serialize};

use super::config::Variant;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    // Classic
    Medic,
    Scientist,
    Researcher,
    OperationsExpert,
    Dispatcher,
    QuarantineSpecialist,
    ContingencyPlanner,
    FieldOperative,
    Virologist,
    Generalist,
    Epidemiologist,
    Archivist,
    // Iberia
    Railwayman,
    Sailor,
    Nurse,
    RoyalAcademyScientist,
    Agronomist,
    Politician,
    // Rome
    Consul,
    MagisterMilitum,
    PraefectusClassis,
    Mercator,
    ReginaFoederata,
}

impl Role {
    pub const ALL: [Role; 23] = [
        Role::Medic,
        Role::Scientist,
        Role::Researcher,
        Role::OperationsExpert,
        Role::Dispatcher,
        Role::QuarantineSpecialist,
        Role::ContingencyPlanner,
        Role::FieldOperative,
        Role::Virologist,
        Role::Generalist,
        Role::Epidemiologist,
        Role::Archivist,
        Role::Railwayman,
        Role::Sailor,
        Role::Nurse,
        Role::RoyalAcademyScientist,
        Role::Agronomist,
        Role::Politician,
        Role::Consul,
        Role::MagisterMilitum,
        Role::PraefectusClassis,
        Role::Mercator,
        Role::ReginaFoederata,
    ];

    /// The variant whose role deck holds this role.
    #[must_use]
    pub const fn variant(self) -> Variant {
        match self {
            Role::Medic
            | Role::Scientist
            | Role::Researcher
            | Role::OperationsExpert
            | Role::Dispatcher
            | Role::QuarantineSpecialist
            | Role::ContingencyPlanner
            | Role::FieldOperative
            | Role::Virologist
            | Role::Generalist
            | Role::Epidemiologist
            | Role::Archivist => Variant::Classic,
            Role::Railwayman
            | Role::Sailor
            | Role::Nurse
            | Role::RoyalAcademyScientist
            | Role::Agronomist
            | Role::Politician => Variant::Iberia,
            Role::Consul
            | Role::MagisterMilitum
            | Role::PraefectusClassis
            | Role::Mercator
            | Role::ReginaFoederata => Variant::Rome,
        }
    }

    /// True if the role may be dealt in `variant`.
    ///
    /// Iberia also uses the Medic and the Quarantine Specialist.
    #[must_use]
    pub fn in_variant(self, variant: Variant) -> bool {
        self.variant() == variant
            || (variant == Variant::Iberia
                && matches!(self, Role::Medic | Role::QuarantineSpecialist))
    }

    /// Cards this role may hold before being forced to discard.
    #[must_use]
    pub const fn hand_limit(self) -> usize {
        match self {
            Role::Archivist => 8,
            _ => 7,
        }
    }

    /// Actions per turn for this role.
    #[must_use]
    pub const fn actions_per_turn(self, base: u8) -> u8 {
        match self {
            Role::Generalist => base + 1,
            _ => base,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
