//! Game setup.

use tracing::info;

use super::{Game, SessionError};
use crate::board::BoardBuilder;
use crate::cards::{deal, infection_deck, InfectionCard};
use crate::core::{GameConfig, GameEvent, GameState, Phase, PlayerId, Role, Variant};
use crate::rules::{effects, phase, Ruleset};

/// Cubes placed by the nine setup infection cards, in draw order.
const SETUP_INFECTIONS: [u8; 9] = [3, 3, 3, 2, 2, 2, 1, 1, 1];

/// Legions garrisoned in the capital at the start of a Rome game.
const CAPITAL_GARRISON: u8 = 3;

/// Builder for a new `Game`.
///
/// ```
/// use outbreak::core::{Role, Variant};
/// use outbreak::session::GameBuilder;
///
/// let game = GameBuilder::new(Variant::Classic)
///     .roles(vec![Role::Medic, Role::Scientist])
///     .seed(7)
///     .build()
///     .unwrap();
/// assert_eq!(game.state().player_count(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct GameBuilder {
    config: GameConfig,
    board: Option<BoardBuilder>,
}

impl GameBuilder {
    pub fn new(variant: Variant) -> Self {
        Self::from_config(GameConfig::new(variant))
    }

    pub fn from_config(config: GameConfig) -> Self {
        Self {
            config,
            board: None,
        }
    }

    pub fn roles(mut self, roles: Vec<Role>) -> Self {
        self.config = self.config.with_roles(roles);
        self
    }

    pub fn epidemics(mut self, epidemics: u8) -> Self {
        self.config = self.config.with_epidemics(epidemics);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config = self.config.with_seed(seed);
        self
    }

    /// Enable the purple mutation challenge.
    pub fn mutation(mut self) -> Self {
        self.config = self.config.with_mutation();
        self
    }

    /// Play on a custom map instead of the variant's own.
    ///
    /// The map is built when the game is; bad board data fails `build`.
    pub fn board(mut self, board: BoardBuilder) -> Self {
        self.board = Some(board);
        self
    }

    /// Validate the configuration, deal, infect, and start the first turn.
    pub fn build(self) -> Result<Game, SessionError> {
        let ruleset = match self.board {
            Some(board) => Ruleset::with_board(self.config, board)?,
            None => Ruleset::new(self.config)?,
        };
        let mut log = Vec::new();
        let state = setup(&ruleset, &mut log);
        info!(
            variant = ?ruleset.config().variant,
            players = state.player_count(),
            seed = ruleset.config().seed,
            "Game created"
        );
        Ok(Game::from_parts(ruleset, state))
    }
}

fn setup(rs: &Ruleset, log: &mut Vec<GameEvent>) -> GameState {
    let config = rs.config();
    let board = rs.board();
    let start = board.start();
    let mut state = GameState::new(config, start);

    state.infection_deck = infection_deck(board, &mut state.rng);
    for cubes in SETUP_INFECTIONS {
        let Some(card) = state.infection_deck.pop_front() else {
            break;
        };
        if let Some(city) = card.city() {
            let color = board.color(city);
            let placed = (0..cubes).filter(|_| state.add_cube(city, color)).count() as u8;
            log.push(GameEvent::CubesPlaced {
                city,
                color,
                count: placed,
            });
        }
        state.infection_discard.push_back(card);
    }
    if config.mutation {
        state.infection_deck.push_back(InfectionCard::Mutation);
        state.infection_deck.push_back(InfectionCard::Mutation);
        state.infection_deck = state.rng.shuffled(&state.infection_deck);
    }

    let dealt = deal(
        board,
        config.variant,
        config.player_count(),
        usize::from(config.epidemics),
        &mut state.rng,
    );
    for (seat, hand) in dealt.hands.into_iter().enumerate() {
        state.players[PlayerId::new(seat as u8)].hand = hand.into_iter().collect();
    }
    state.player_deck = dealt.deck;

    match config.variant {
        Variant::Classic => effects::build_station(&mut state, start, log),
        Variant::Rome => {
            let capital = board.capital().unwrap_or(start);
            effects::build_station(&mut state, capital, log);
            let count = state.add_legions(capital, CAPITAL_GARRISON);
            log.push(GameEvent::LegionsRecruited {
                city: capital,
                count,
            });
        }
        Variant::Iberia => {}
    }

    if config.variant == Variant::Iberia {
        effects::set_phase(&mut state, Phase::ChoosingStartingCity, log);
    } else {
        phase::start_turn(rs, &mut state, PlayerId(0), log);
    }
    state
}
