//! Player cards and infection cards.

use serde::{Deserialize, Serialize};

use super::event::EventCard;
use crate::board::{CityId, Color};

/// A card naming a city, colored by that city's native color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CityCard {
    pub city: CityId,
    pub color: Color,
}

impl CityCard {
    #[must_use]
    pub const fn new(city: CityId, color: Color) -> Self {
        Self { city, color }
    }
}

/// A card in the player deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerCard {
    City(CityCard),
    Event(EventCard),
    /// Epidemic (revolt in Rome). Never held in hand.
    Epidemic,
}

impl PlayerCard {
    /// The city on a city card.
    #[must_use]
    pub const fn city(self) -> Option<CityId> {
        match self {
            PlayerCard::City(c) => Some(c.city),
            _ => None,
        }
    }

    /// The color of a city card.
    #[must_use]
    pub const fn color(self) -> Option<Color> {
        match self {
            PlayerCard::City(c) => Some(c.color),
            _ => None,
        }
    }

    /// The event on an event card.
    #[must_use]
    pub const fn event(self) -> Option<EventCard> {
        match self {
            PlayerCard::Event(e) => Some(e),
            _ => None,
        }
    }

    /// True for the city card naming `city`.
    #[must_use]
    pub fn is_city(self, city: CityId) -> bool {
        self.city() == Some(city)
    }
}

/// A card in the infection (invasion) deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InfectionCard {
    City(CityCard),
    /// Mutation challenge: one purple cube lands where the bottom card points.
    Mutation,
}

impl InfectionCard {
    /// The city on a city infection card.
    #[must_use]
    pub const fn city(self) -> Option<CityId> {
        match self {
            InfectionCard::City(c) => Some(c.city),
            InfectionCard::Mutation => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_card_accessors() {
        let card = PlayerCard::City(CityCard::new(CityId(3), Color::Red));
        assert_eq!(card.city(), Some(CityId(3)));
        assert_eq!(card.color(), Some(Color::Red));
        assert!(card.is_city(CityId(3)));
        assert!(card.event().is_none());

        let event = PlayerCard::Event(EventCard::Airlift);
        assert_eq!(event.event(), Some(EventCard::Airlift));
        assert_eq!(event.city(), None);
        assert_eq!(PlayerCard::Epidemic.color(), None);
    }

    #[test]
    fn test_infection_card_city() {
        let card = InfectionCard::City(CityCard::new(CityId(7), Color::Blue));
        assert_eq!(card.city(), Some(CityId(7)));
        assert_eq!(InfectionCard::Mutation.city(), None);
    }
}
