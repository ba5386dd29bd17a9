//! Deck construction: infection deck, opening hands, epidemic seeding.
//!
//! Decks are `im::Vector`s with the top card at index 0.

use im::Vector;

use super::card::{CityCard, InfectionCard, PlayerCard};
use super::event::EventCard;
use crate::board::Board;
use crate::core::{GameRng, Variant};

/// Opening hands plus the finished player deck.
#[derive(Clone, Debug)]
pub struct Deal {
    pub hands: Vec<Vec<PlayerCard>>,
    pub deck: Vector<PlayerCard>,
}

/// Cards dealt to each player before epidemics are seeded.
#[must_use]
pub const fn opening_hand_size(player_count: usize) -> usize {
    match player_count {
        0..=2 => 4,
        3 => 3,
        _ => 2,
    }
}

/// One city card per city.
pub fn city_cards(board: &Board) -> impl Iterator<Item = CityCard> + '_ {
    board.cities().map(|c| CityCard::new(c, board.color(c)))
}

/// Shuffled infection deck holding one card per city.
#[must_use]
pub fn infection_deck(board: &Board, rng: &mut GameRng) -> Vector<InfectionCard> {
    let mut cards: Vec<InfectionCard> = city_cards(board).map(InfectionCard::City).collect();
    rng.shuffle(&mut cards);
    cards.into_iter().collect()
}

/// Deal opening hands and build the player deck.
///
/// The undealt cards are split into `epidemics` piles as evenly as
/// possible (larger piles on top), one epidemic is shuffled into each
/// pile, and the piles are stacked.
#[must_use]
pub fn deal(
    board: &Board,
    variant: Variant,
    player_count: usize,
    epidemics: usize,
    rng: &mut GameRng,
) -> Deal {
    let mut cards: Vec<PlayerCard> = city_cards(board)
        .map(PlayerCard::City)
        .chain(EventCard::for_variant(variant).map(PlayerCard::Event))
        .collect();
    rng.shuffle(&mut cards);

    let per_hand = opening_hand_size(player_count);
    let hands: Vec<Vec<PlayerCard>> = (0..player_count)
        .map(|_| cards.split_off(cards.len() - per_hand))
        .collect();

    Deal {
        hands,
        deck: seed_epidemics(cards, epidemics, rng),
    }
}

/// Split `cards` into piles, add one epidemic per pile, and stack them.
#[must_use]
pub fn seed_epidemics(
    cards: Vec<PlayerCard>,
    epidemics: usize,
    rng: &mut GameRng,
) -> Vector<PlayerCard> {
    if epidemics == 0 {
        return cards.into_iter().collect();
    }

    let base = cards.len() / epidemics;
    let extra = cards.len() % epidemics;
    let mut remaining = cards.into_iter();
    let mut deck = Vector::new();

    for pile_index in 0..epidemics {
        let size = base + usize::from(pile_index < extra);
        let mut pile: Vec<PlayerCard> = remaining.by_ref().take(size).collect();
        pile.push(PlayerCard::Epidemic);
        rng.shuffle(&mut pile);
        deck.extend(pile);
    }

    deck
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_hand_sizes() {
        assert_eq!(opening_hand_size(2), 4);
        assert_eq!(opening_hand_size(3), 3);
        assert_eq!(opening_hand_size(4), 2);
        assert_eq!(opening_hand_size(5), 2);
    }

    #[test]
    fn test_deal_accounts_for_every_card() {
        let board = Board::classic().unwrap();
        let mut rng = GameRng::new(1);
        let deal = deal(&board, Variant::Classic, 4, 5, &mut rng);

        let dealt: usize = deal.hands.iter().map(Vec::len).sum();
        assert_eq!(dealt, 8);
        assert_eq!(deal.deck.len(), 48 + 12 - 8 + 5);
        let epidemics = deal.deck.iter().filter(|c| **c == PlayerCard::Epidemic).count();
        assert_eq!(epidemics, 5);
        assert!(deal.hands.iter().flatten().all(|c| *c != PlayerCard::Epidemic));
    }

    #[test]
    fn test_one_epidemic_per_pile() {
        let cards: Vec<PlayerCard> = (0..10)
            .map(|_| PlayerCard::Event(EventCard::Airlift))
            .collect();
        let mut rng = GameRng::new(5);
        let deck = seed_epidemics(cards, 4, &mut rng);

        // Piles of 3, 3, 2, 2 plus one epidemic each.
        let bounds = [(0, 4), (4, 8), (8, 11), (11, 14)];
        for (start, end) in bounds {
            let in_pile = (start..end)
                .filter(|&i| deck[i] == PlayerCard::Epidemic)
                .count();
            assert_eq!(in_pile, 1, "pile {start}..{end}");
        }
    }

    #[test]
    fn test_infection_deck_has_every_city() {
        let board = Board::rome().unwrap();
        let mut rng = GameRng::new(2);
        let deck = infection_deck(&board, &mut rng);
        assert_eq!(deck.len(), board.city_count());
        let mut cities: Vec<_> = deck.iter().filter_map(|c| c.city()).collect();
        cities.sort();
        cities.dedup();
        assert_eq!(cities.len(), board.city_count());
    }
}
