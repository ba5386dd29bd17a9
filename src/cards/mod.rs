//! Cards: player cards, infection cards, event identities, deck setup.

pub mod card;
pub mod deck;
pub mod event;

pub use card::{CityCard, InfectionCard, PlayerCard};
pub use deck::{deal, infection_deck, opening_hand_size, seed_epidemics, Deal};
pub use event::{EventCard, EventTiming};
