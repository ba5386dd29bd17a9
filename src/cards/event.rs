//! Event card identities.
//!
//! A closed enum: adding a card is a compile-time change, and the
//! resolver in `crate::events` matches on it exhaustively.

use serde::{Deserialize, Serialize};

use crate::core::Variant;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventCard {
    // Classic
    Airlift,
    GovernmentGrant,
    OneQuietNight,
    ResilientPopulation,
    Forecast,
    BorrowedTime,
    CommercialTravelBan,
    MobileHospital,
    RapidVaccineDeployment,
    ReExaminedResearch,
    RemoteTreatment,
    NewAssignment,
    // Iberia
    RailwayExpansion,
    HolyWater,
    Telegraph,
    ShipRequisition,
    FieldHospital,
    // Rome (all dual-mode)
    Augury,
    Conscription,
    Tribute,
    ImperialSummons,
    SibyllineBooks,
    PanemEtCircenses,
    PaxRomana,
    HadriansWall,
    Praetorians,
}

/// When an event may be played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTiming {
    /// Any time outside the middle of another resolution.
    Anytime,
    /// Only by the current player during their action phase.
    OwnActions,
    /// Only in the window right after a cure.
    AfterCure,
}

impl EventCard {
    pub const ALL: [EventCard; 26] = [
        EventCard::Airlift,
        EventCard::GovernmentGrant,
        EventCard::OneQuietNight,
        EventCard::ResilientPopulation,
        EventCard::Forecast,
        EventCard::BorrowedTime,
        EventCard::CommercialTravelBan,
        EventCard::MobileHospital,
        EventCard::RapidVaccineDeployment,
        EventCard::ReExaminedResearch,
        EventCard::RemoteTreatment,
        EventCard::NewAssignment,
        EventCard::RailwayExpansion,
        EventCard::HolyWater,
        EventCard::Telegraph,
        EventCard::ShipRequisition,
        EventCard::FieldHospital,
        EventCard::Augury,
        EventCard::Conscription,
        EventCard::Tribute,
        EventCard::ImperialSummons,
        EventCard::SibyllineBooks,
        EventCard::PanemEtCircenses,
        EventCard::PaxRomana,
        EventCard::HadriansWall,
        EventCard::Praetorians,
    ];

    /// Printed name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EventCard::Airlift => "Airlift",
            EventCard::GovernmentGrant => "Government Grant",
            EventCard::OneQuietNight => "One Quiet Night",
            EventCard::ResilientPopulation => "Resilient Population",
            EventCard::Forecast => "Forecast",
            EventCard::BorrowedTime => "Borrowed Time",
            EventCard::CommercialTravelBan => "Commercial Travel Ban",
            EventCard::MobileHospital => "Mobile Hospital",
            EventCard::RapidVaccineDeployment => "Rapid Vaccine Deployment",
            EventCard::ReExaminedResearch => "Re-examined Research",
            EventCard::RemoteTreatment => "Remote Treatment",
            EventCard::NewAssignment => "New Assignment",
            EventCard::RailwayExpansion => "Railway Expansion",
            EventCard::HolyWater => "Holy Water",
            EventCard::Telegraph => "Telegraph",
            EventCard::ShipRequisition => "Ship Requisition",
            EventCard::FieldHospital => "Field Hospital",
            EventCard::Augury => "Augury",
            EventCard::Conscription => "Conscription",
            EventCard::Tribute => "Tribute",
            EventCard::ImperialSummons => "Imperial Summons",
            EventCard::SibyllineBooks => "Sibylline Books",
            EventCard::PanemEtCircenses => "Panem et Circenses",
            EventCard::PaxRomana => "Pax Romana",
            EventCard::HadriansWall => "Hadrian's Wall",
            EventCard::Praetorians => "Praetorians",
        }
    }

    /// True if the card is shuffled into `variant`'s player deck.
    #[must_use]
    pub const fn in_variant(self, variant: Variant) -> bool {
        use EventCard::*;
        match variant {
            Variant::Classic => matches!(
                self,
                Airlift
                    | GovernmentGrant
                    | OneQuietNight
                    | ResilientPopulation
                    | Forecast
                    | BorrowedTime
                    | CommercialTravelBan
                    | MobileHospital
                    | RapidVaccineDeployment
                    | ReExaminedResearch
                    | RemoteTreatment
                    | NewAssignment
            ),
            Variant::Iberia => matches!(
                self,
                Airlift
                    | OneQuietNight
                    | ResilientPopulation
                    | Forecast
                    | RemoteTreatment
                    | RailwayExpansion
                    | HolyWater
                    | Telegraph
                    | ShipRequisition
                    | FieldHospital
            ),
            Variant::Rome => self.is_dual_mode(),
        }
    }

    /// True if the card offers a normal and a corrupt resolution.
    #[must_use]
    pub const fn is_dual_mode(self) -> bool {
        matches!(
            self,
            EventCard::Augury
                | EventCard::Conscription
                | EventCard::Tribute
                | EventCard::ImperialSummons
                | EventCard::SibyllineBooks
                | EventCard::PanemEtCircenses
                | EventCard::PaxRomana
                | EventCard::HadriansWall
                | EventCard::Praetorians
        )
    }

    #[must_use]
    pub const fn timing(self) -> EventTiming {
        match self {
            EventCard::BorrowedTime => EventTiming::OwnActions,
            EventCard::RapidVaccineDeployment => EventTiming::AfterCure,
            _ => EventTiming::Anytime,
        }
    }

    /// Cards in `variant`'s deck.
    pub fn for_variant(variant: Variant) -> impl Iterator<Item = EventCard> {
        EventCard::ALL.into_iter().filter(move |e| e.in_variant(variant))
    }
}

impl std::fmt::Display for EventCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_decks() {
        assert_eq!(EventCard::for_variant(Variant::Classic).count(), 12);
        assert_eq!(EventCard::for_variant(Variant::Iberia).count(), 10);
        assert_eq!(EventCard::for_variant(Variant::Rome).count(), 9);
    }

    #[test]
    fn test_every_card_belongs_somewhere() {
        for card in EventCard::ALL {
            let homes = [Variant::Classic, Variant::Rome, Variant::Iberia]
                .into_iter()
                .filter(|v| card.in_variant(*v))
                .count();
            assert!(homes >= 1, "{card:?} is in no deck");
        }
    }

    #[test]
    fn test_dual_mode_only_in_rome() {
        for card in EventCard::ALL.into_iter().filter(|c| c.is_dual_mode()) {
            assert!(card.in_variant(Variant::Rome));
            assert!(!card.in_variant(Variant::Classic));
        }
    }

    #[test]
    fn test_timing() {
        assert_eq!(EventCard::BorrowedTime.timing(), EventTiming::OwnActions);
        assert_eq!(EventCard::RapidVaccineDeployment.timing(), EventTiming::AfterCure);
        assert_eq!(EventCard::Forecast.timing(), EventTiming::Anytime);
        assert_eq!(EventCard::PaxRomana.to_string(), "Pax Romana");
    }
}
