//! Player identification, per-player storage, and the player record.
//!
//! ## PlayerId
//!
//! Seat index, 0-based.
//!
//! ## PlayerMap
//!
//! Per-player storage backed by `Vec` for O(1) access by `PlayerId`.
//!
//! ## Player
//!
//! Role, pawn location, hand, and role-specific resources.

use im::Vector;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::role::Role;
use crate::board::{CityId, Color, ColorMap};
use crate::cards::{EventCard, PlayerCard};

/// Seat identifier. The first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all seats for a game with `player_count` players.
    ///
    /// ```
    /// use outbreak::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(players, vec![PlayerId(0), PlayerId(1), PlayerId(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }

    /// The seat after this one.
    #[must_use]
    pub fn next(self, player_count: usize) -> PlayerId {
        PlayerId(((self.index() + 1) % player_count) as u8)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8).map(|i| factory(PlayerId(i))).collect();
        Self { data }
    }

    /// Get the number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Get a player's data, or `None` for an unknown seat.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.data.get(player.index())
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over values.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Iterate over mutable values.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.data.iter_mut()
    }

    /// Iterate over all player IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.data.len() as u8).map(PlayerId)
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}

/// One seat at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub role: Role,
    pub location: CityId,
    pub hand: Vector<PlayerCard>,
    /// Field Operative: cubes kept as samples.
    pub samples: ColorMap<u8>,
    /// Contingency Planner: the stored event, if any.
    pub stash: Option<EventCard>,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, role: Role, location: CityId) -> Self {
        Self {
            id,
            role,
            location,
            hand: Vector::new(),
            samples: ColorMap::splat(0),
            stash: None,
        }
    }

    /// True if `card` is in hand.
    #[must_use]
    pub fn holds(&self, card: PlayerCard) -> bool {
        self.hand.contains(&card)
    }

    /// True if the city card for `city` is in hand.
    #[must_use]
    pub fn holds_city(&self, city: CityId) -> bool {
        self.hand.iter().any(|c| c.is_city(city))
    }

    /// City cards of `color` in hand.
    #[must_use]
    pub fn count_color(&self, color: Color) -> usize {
        self.hand.iter().filter(|c| c.color() == Some(color)).count()
    }

    /// True if the event is in hand or, for the Contingency Planner, stashed.
    #[must_use]
    pub fn can_reach_event(&self, event: EventCard) -> bool {
        self.holds(PlayerCard::Event(event)) || self.stash == Some(event)
    }

    /// Remove one copy of `card` from hand. Returns false if absent.
    pub fn remove_card(&mut self, card: PlayerCard) -> bool {
        match self.hand.index_of(&card) {
            Some(pos) => {
                self.hand.remove(pos);
                true
            }
            None => false,
        }
    }

    /// True if the hand exceeds the role's limit.
    #[must_use]
    pub fn over_limit(&self) -> bool {
        self.hand.len() > self.role.hand_limit()
    }
}
