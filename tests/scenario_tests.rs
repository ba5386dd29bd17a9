//! End-to-end rule scenarios for the Classic game.
//!
//! These tests set up a specific board position, drive it through the
//! command interface, and check the resulting state and event log.

use outbreak::board::{CityId, Color};
use outbreak::cards::{CityCard, EventCard, InfectionCard, PlayerCard};
use outbreak::core::{
    Action, CureCards, DefeatReason, GameConfig, GameEvent, GameState, Phase, PlayerId, Rejection,
    Role, Variant,
};
use outbreak::rules::infection;
use outbreak::rules::{CureMethod, GameResult, Ruleset, RulesEngine};
use outbreak::session::GameBuilder;

fn setup(roles: Vec<Role>) -> (Ruleset, GameState) {
    let rs = Ruleset::new(GameConfig::new(Variant::Classic).with_roles(roles)).unwrap();
    let mut state = GameState::new(rs.config(), rs.board().start());
    state.phase = Phase::PlayerAction;
    (rs, state)
}

fn city(rs: &Ruleset, name: &str) -> CityId {
    rs.board().id(name).unwrap()
}

fn city_card(rs: &Ruleset, name: &str) -> CityCard {
    let id = city(rs, name);
    CityCard::new(id, rs.board().color(id))
}

fn infection_card(rs: &Ruleset, name: &str) -> InfectionCard {
    InfectionCard::City(city_card(rs, name))
}

fn fill(state: &mut GameState, city: CityId, color: Color, n: u8) {
    for _ in 0..n {
        assert!(state.add_cube(city, color));
    }
}

fn blue_cards(rs: &Ruleset, n: usize) -> CureCards {
    rs.board()
        .cities_of_color(Color::Blue)
        .take(n)
        .map(|c| PlayerCard::City(CityCard::new(c, Color::Blue)))
        .collect()
}

fn position<F: Fn(&GameEvent) -> bool>(events: &[GameEvent], f: F) -> usize {
    events.iter().position(f).expect("event missing")
}

// ============================================================================
// Turn Flow
// ============================================================================

/// Test that one full turn hands play to the next seat.
#[test]
fn test_full_turn_passes_to_next_player() {
    let mut game = GameBuilder::new(Variant::Classic)
        .roles(vec![Role::Medic, Role::Scientist, Role::Researcher])
        .seed(5)
        .build()
        .unwrap();
    let p0 = PlayerId(0);

    game.apply(p0, Action::EndActions).unwrap();
    game.apply(p0, Action::DrawPlayerCards).unwrap();
    for _ in 0..10 {
        let state = game.state().clone();
        match state.phase {
            Phase::PostEpidemicEventWindow => {
                game.apply(p0, Action::Continue).unwrap();
            }
            Phase::Discard => {
                let who = state.over_limit_player().unwrap();
                let card = state.players[who].hand[0];
                game.apply(who, Action::Discard { card }).unwrap();
            }
            Phase::InfectionStep => {
                game.apply(p0, Action::InfectCities).unwrap();
            }
            _ => break,
        }
    }

    let state = game.state();
    if !state.is_over() {
        assert_eq!(state.phase, Phase::PlayerAction);
        assert_eq!(state.current_player, PlayerId(1));
        assert_eq!(state.turn_number, 2);
        assert_eq!(state.actions_remaining, 4);
        assert!(state.players[p0].hand.len() <= 5);
    }
}

/// Test that the Generalist gets five actions.
#[test]
fn test_generalist_has_five_actions() {
    let game = GameBuilder::new(Variant::Classic)
        .roles(vec![Role::Generalist, Role::Medic])
        .build()
        .unwrap();
    assert_eq!(game.state().actions_remaining, 5);
}

/// Test that commands for the wrong phase or seat are refused with a reason.
#[test]
fn test_out_of_turn_commands_rejected() {
    let (rs, state) = setup(vec![Role::Medic, Role::Scientist]);
    let chicago = city(&rs, "Chicago");

    assert_eq!(
        rs.apply_action(&state, PlayerId(1), &Action::Drive { to: chicago, legions: 0 }),
        Err(Rejection::NotYourTurn)
    );
    assert_eq!(
        rs.apply_action(&state, PlayerId(0), &Action::InfectCities),
        Err(Rejection::WrongPhase)
    );
    assert_eq!(
        rs.apply_action(&state, PlayerId(7), &Action::EndActions),
        Err(Rejection::UnknownPlayer)
    );
    assert_eq!(
        rs.apply_action(&state, PlayerId(0), &Action::Recruit { count: 1 }),
        Err(Rejection::NotInVariant)
    );
}

/// Test that a hand over the limit interrupts the turn until discarded.
#[test]
fn test_hand_limit_forces_discard() {
    let (rs, mut state) = setup(vec![Role::Medic, Role::Scientist]);
    let hand: Vec<PlayerCard> = rs
        .board()
        .cities()
        .take(7)
        .map(|c| PlayerCard::City(CityCard::new(c, rs.board().color(c))))
        .collect();
    state.players[PlayerId(0)].hand = hand.iter().copied().collect();
    state.player_deck = rs
        .board()
        .cities()
        .skip(7)
        .take(3)
        .map(|c| PlayerCard::City(CityCard::new(c, rs.board().color(c))))
        .collect();
    state.phase = Phase::PreDrawPlayerCards;

    let state = rs
        .apply_action(&state, PlayerId(0), &Action::DrawPlayerCards)
        .unwrap()
        .state;
    assert_eq!(state.phase, Phase::Discard);
    assert_eq!(state.players[PlayerId(0)].hand.len(), 9);
    assert_eq!(
        rs.apply_action(&state, PlayerId(0), &Action::InfectCities),
        Err(Rejection::WrongPhase)
    );
    assert_eq!(
        rs.apply_action(&state, PlayerId(1), &Action::Discard { card: hand[0] }),
        Err(Rejection::NotOverLimit)
    );

    let state = rs
        .apply_action(&state, PlayerId(0), &Action::Discard { card: hand[0] })
        .unwrap()
        .state;
    assert_eq!(state.phase, Phase::Discard);
    let state = rs
        .apply_action(&state, PlayerId(0), &Action::Discard { card: hand[1] })
        .unwrap()
        .state;
    assert_eq!(state.phase, Phase::InfectionStep);
    assert_eq!(state.player_discard.len(), 2);
}

/// Test that fewer than two player cards at the draw loses the game.
#[test]
fn test_player_deck_exhaustion_defeats() {
    let (rs, mut state) = setup(vec![Role::Medic, Role::Scientist]);
    state.player_deck.push_back(PlayerCard::City(city_card(&rs, "Paris")));
    state.phase = Phase::PreDrawPlayerCards;

    let t = rs
        .apply_action(&state, PlayerId(0), &Action::DrawPlayerCards)
        .unwrap();
    assert_eq!(
        rs.is_terminal(&t.state),
        Some(GameResult::Defeat(DefeatReason::PlayerDeckExhausted))
    );
    assert_eq!(
        rs.apply_action(&t.state, PlayerId(0), &Action::EndActions),
        Err(Rejection::GameOver)
    );
}

// ============================================================================
// Infection
// ============================================================================

/// Test that an outbreak chain visits each city once and counts each outbreak once.
#[test]
fn test_chain_outbreak_counts_each_city_once() {
    let (rs, mut state) = setup(vec![Role::Medic, Role::Scientist]);
    let atlanta = city(&rs, "Atlanta");
    let chicago = city(&rs, "Chicago");
    let washington = city(&rs, "Washington");
    let miami = city(&rs, "Miami");
    fill(&mut state, atlanta, Color::Blue, 3);
    fill(&mut state, chicago, Color::Blue, 3);

    let mut log = Vec::new();
    infection::infect(&rs, &mut state, atlanta, Color::Blue, 1, &mut log);

    assert_eq!(state.outbreaks, 2);
    assert_eq!(state.cube_count(atlanta, Color::Blue), 3);
    assert_eq!(state.cube_count(chicago, Color::Blue), 3);
    assert_eq!(state.cube_count(washington, Color::Blue), 1);
    assert_eq!(state.cube_count(miami, Color::Blue), 1);
    for &n in rs.board().neighbors(chicago) {
        if n != atlanta {
            assert_eq!(state.cube_count(n, Color::Blue), 1);
        }
    }
    let outbreaks = log
        .iter()
        .filter(|e| matches!(e, GameEvent::Outbreak { .. }))
        .count();
    assert_eq!(outbreaks, 2);
    assert!(state.check_invariants(rs.config(), None).is_ok());
}

/// Test that the eighth outbreak ends the game during the infection step.
#[test]
fn test_eighth_outbreak_defeats() {
    let (rs, mut state) = setup(vec![Role::Medic, Role::Scientist]);
    let tokyo = city(&rs, "Tokyo");
    fill(&mut state, tokyo, Color::Red, 3);
    state.outbreaks = 7;
    state.infection_deck = [infection_card(&rs, "Tokyo"), infection_card(&rs, "Lima")]
        .into_iter()
        .collect();
    state.phase = Phase::InfectionStep;

    let t = rs
        .apply_action(&state, PlayerId(0), &Action::InfectCities)
        .unwrap();
    assert_eq!(t.state.outbreaks, 8);
    assert_eq!(t.state.phase, Phase::Defeat(DefeatReason::Outbreaks));
    assert!(t.events.contains(&GameEvent::Defeat {
        reason: DefeatReason::Outbreaks
    }));
    // The game stopped at the first card.
    assert_eq!(t.state.infection_deck.len(), 1);
}

/// Test the defenses: Quarantine Specialist, Medic with a cure, eradication.
#[test]
fn test_infection_defenses() {
    let (rs, mut state) = setup(vec![Role::QuarantineSpecialist, Role::Medic]);
    let atlanta = city(&rs, "Atlanta");
    let chicago = city(&rs, "Chicago");
    let paris = city(&rs, "Paris");
    let mut log = Vec::new();

    // Quarantine Specialist in Atlanta protects the neighbor Chicago.
    infection::infect(&rs, &mut state, chicago, Color::Blue, 1, &mut log);
    assert_eq!(state.cube_count(chicago, Color::Blue), 0);

    // Medic in Paris with blue cured.
    state.players[PlayerId(0)].location = city(&rs, "Tokyo");
    state.players[PlayerId(1)].location = paris;
    state.diseases[Color::Blue] = outbreak::core::DiseaseStatus::Cured;
    infection::infect(&rs, &mut state, paris, Color::Blue, 1, &mut log);
    assert_eq!(state.cube_count(paris, Color::Blue), 0);

    // Eradicated colors never return.
    state.diseases[Color::Blue] = outbreak::core::DiseaseStatus::Eradicated;
    infection::infect(&rs, &mut state, atlanta, Color::Blue, 3, &mut log);
    assert_eq!(state.cubes_on_board(Color::Blue), 0);
}

/// Test that an epidemic increases, infects the bottom card, then intensifies, in that order.
#[test]
fn test_epidemic_order() {
    let (rs, mut state) = setup(vec![Role::Medic, Role::Scientist]);
    let lima = city(&rs, "Lima");
    state.infection_deck = [
        infection_card(&rs, "Paris"),
        infection_card(&rs, "Essen"),
        infection_card(&rs, "Lima"),
    ]
    .into_iter()
    .collect();
    state.infection_discard.push_back(infection_card(&rs, "Tokyo"));
    state.player_deck = [
        PlayerCard::Epidemic,
        PlayerCard::City(city_card(&rs, "Chicago")),
    ]
    .into_iter()
    .collect();
    state.phase = Phase::PreDrawPlayerCards;

    let t = rs
        .apply_action(&state, PlayerId(0), &Action::DrawPlayerCards)
        .unwrap();
    let s = &t.state;

    assert_eq!(s.rate_index, 1);
    assert_eq!(s.cube_count(lima, Color::Yellow), 3);
    assert_eq!(s.phase, Phase::InfectionStep);
    assert!(s.removed_cards.contains(&PlayerCard::Epidemic));
    assert_eq!(s.players[PlayerId(0)].hand.len(), 1);

    // Discard (Tokyo + Lima) went on top; the untouched cards stay below.
    assert_eq!(s.infection_deck.len(), 4);
    let top: Vec<_> = s.infection_deck.iter().take(2).copied().collect();
    assert!(top.contains(&infection_card(&rs, "Lima")));
    assert!(top.contains(&infection_card(&rs, "Tokyo")));
    assert_eq!(s.infection_deck[2], infection_card(&rs, "Paris"));
    assert_eq!(s.infection_deck[3], infection_card(&rs, "Essen"));
    assert!(s.infection_discard.is_empty());

    let increase = position(&t.events, |e| matches!(e, GameEvent::InfectionRateIncreased { .. }));
    let infect = position(&t.events, |e| matches!(e, GameEvent::Epidemic { .. }));
    let intensify = position(&t.events, |e| matches!(e, GameEvent::Intensified { .. }));
    assert!(increase < infect && infect < intensify);
}

/// Test that an epidemic pauses for events when someone holds one.
#[test]
fn test_epidemic_window_waits_for_continue() {
    let (rs, mut state) = setup(vec![Role::Medic, Role::Scientist]);
    state.players[PlayerId(1)]
        .hand
        .push_back(PlayerCard::Event(EventCard::OneQuietNight));
    state.infection_deck = [infection_card(&rs, "Paris"), infection_card(&rs, "Lima")]
        .into_iter()
        .collect();
    state.player_deck = [
        PlayerCard::Epidemic,
        PlayerCard::City(city_card(&rs, "Chicago")),
    ]
    .into_iter()
    .collect();
    state.phase = Phase::PreDrawPlayerCards;

    let t = rs
        .apply_action(&state, PlayerId(0), &Action::DrawPlayerCards)
        .unwrap();
    assert_eq!(t.state.phase, Phase::PostEpidemicEventWindow);
    assert!(!t
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::Intensified { .. })));

    // Any player may close the window.
    let t = rs
        .apply_action(&t.state, PlayerId(1), &Action::Continue)
        .unwrap();
    assert_eq!(t.state.phase, Phase::InfectionStep);
    assert!(t
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::Intensified { .. })));
    assert_eq!(t.state.players[PlayerId(0)].hand.len(), 1);
}

/// Test that One Quiet Night skips the next infection step.
#[test]
fn test_quiet_night_skips_infection() {
    let (rs, mut state) = setup(vec![Role::Medic, Role::Scientist]);
    state.quiet_nights = 1;
    state.infection_deck = [infection_card(&rs, "Paris"), infection_card(&rs, "Lima")]
        .into_iter()
        .collect();
    state.phase = Phase::InfectionStep;

    let t = rs
        .apply_action(&state, PlayerId(0), &Action::InfectCities)
        .unwrap();
    assert!(t.events.contains(&GameEvent::InfectionStepSkipped));
    assert_eq!(t.state.infection_deck.len(), 2);
    assert_eq!(t.state.quiet_nights, 0);
    assert_eq!(t.state.current_player, PlayerId(1));
}

// ============================================================================
// Cures
// ============================================================================

/// Test that the Scientist cures with four cards and others need five.
#[test]
fn test_scientist_cures_with_four_cards() {
    let (rs, mut state) = setup(vec![Role::Scientist, Role::Researcher]);
    let atlanta = rs.board().start();
    state.stations.insert(atlanta);
    let cards = blue_cards(&rs, 4);
    state.players[PlayerId(0)].hand.extend(cards.iter().copied());

    assert!(rs
        .check(
            &state,
            PlayerId(0),
            &Action::Cure {
                color: Color::Blue,
                method: CureMethod::Standard,
                cards: cards.clone(),
            }
        )
        .is_err());

    let t = rs
        .apply_action(
            &state,
            PlayerId(0),
            &Action::Cure {
                color: Color::Blue,
                method: CureMethod::Reduced,
                cards: cards.clone(),
            },
        )
        .unwrap();
    assert!(t.state.is_cured(Color::Blue));
    assert!(t.events.contains(&GameEvent::Cured { color: Color::Blue }));
    assert!(t.state.players[PlayerId(0)].hand.is_empty());
    assert_eq!(t.state.player_discard.len(), 4);
    // Nothing blue on the board, so it is eradicated at once.
    assert!(t.state.is_eradicated(Color::Blue));

    // The Researcher may not use the Scientist's discount.
    let (rs, mut state) = setup(vec![Role::Researcher, Role::Scientist]);
    state.stations.insert(rs.board().start());
    state.players[PlayerId(0)].hand.extend(cards.iter().copied());
    assert!(rs
        .check(
            &state,
            PlayerId(0),
            &Action::Cure {
                color: Color::Blue,
                method: CureMethod::Reduced,
                cards,
            }
        )
        .is_err());
}

/// Test that a cure away from a research station is refused.
#[test]
fn test_cure_needs_station() {
    let (rs, mut state) = setup(vec![Role::Medic, Role::Scientist]);
    let cards = blue_cards(&rs, 5);
    state.players[PlayerId(0)].hand.extend(cards.iter().copied());
    assert_eq!(
        rs.check(
            &state,
            PlayerId(0),
            &Action::Cure {
                color: Color::Blue,
                method: CureMethod::Standard,
                cards,
            }
        ),
        Err(Rejection::NoStation)
    );
}

/// Test that curing the last color wins.
#[test]
fn test_last_cure_wins() {
    let (rs, mut state) = setup(vec![Role::Medic, Role::Scientist]);
    state.stations.insert(rs.board().start());
    for color in [Color::Yellow, Color::Black, Color::Red] {
        state.diseases[color] = outbreak::core::DiseaseStatus::Cured;
    }
    let cards = blue_cards(&rs, 5);
    state.players[PlayerId(0)].hand.extend(cards.iter().copied());

    let t = rs
        .apply_action(
            &state,
            PlayerId(0),
            &Action::Cure {
                color: Color::Blue,
                method: CureMethod::Standard,
                cards,
            },
        )
        .unwrap();
    assert_eq!(t.state.phase, Phase::Victory);
    assert_eq!(rs.is_terminal(&t.state), Some(GameResult::Victory));
    assert!(t.events.contains(&GameEvent::Victory));
}

/// Test that the mutation must be cured too before the game is won.
#[test]
fn test_mutation_blocks_victory_until_cured() {
    let config = GameConfig::new(Variant::Classic)
        .with_roles(vec![Role::Medic, Role::Scientist])
        .with_mutation();
    let rs = Ruleset::new(config).unwrap();
    let mut state = GameState::new(rs.config(), rs.board().start());
    state.phase = Phase::PlayerAction;
    state.stations.insert(rs.board().start());
    fill(&mut state, city(&rs, "Paris"), Color::Purple, 1);
    for color in [Color::Yellow, Color::Black, Color::Red] {
        state.diseases[color] = outbreak::core::DiseaseStatus::Cured;
    }
    let blue = blue_cards(&rs, 5);
    state.players[PlayerId(0)].hand.extend(blue.iter().copied());

    let state = rs
        .apply_action(
            &state,
            PlayerId(0),
            &Action::Cure {
                color: Color::Blue,
                method: CureMethod::Standard,
                cards: blue,
            },
        )
        .unwrap()
        .state;
    assert_eq!(state.phase, Phase::PlayerAction);
    assert!(rs.is_terminal(&state).is_none());

    let mut state = state;
    let mixed: CureCards = rs
        .board()
        .cities_of_color(Color::Yellow)
        .take(3)
        .chain(rs.board().cities_of_color(Color::Black).take(2))
        .map(|c| PlayerCard::City(CityCard::new(c, rs.board().color(c))))
        .collect();
    state.players[PlayerId(0)].hand.extend(mixed.iter().copied());
    let t = rs
        .apply_action(
            &state,
            PlayerId(0),
            &Action::Cure {
                color: Color::Purple,
                method: CureMethod::Standard,
                cards: mixed,
            },
        )
        .unwrap();
    assert!(t.state.is_cured(Color::Purple));
    assert_eq!(t.state.phase, Phase::Victory);
}

/// Test that the Medic treats every cube and clears cured colors on arrival.
#[test]
fn test_medic_treat_and_passive() {
    let (rs, mut state) = setup(vec![Role::Medic, Role::Scientist]);
    let atlanta = rs.board().start();
    let chicago = city(&rs, "Chicago");
    fill(&mut state, atlanta, Color::Blue, 3);
    fill(&mut state, chicago, Color::Yellow, 2);

    let state = rs
        .apply_action(
            &state,
            PlayerId(0),
            &Action::Treat {
                color: Color::Blue,
                keep_sample: false,
            },
        )
        .unwrap()
        .state;
    assert_eq!(state.cube_count(atlanta, Color::Blue), 0);

    let mut state = state;
    state.diseases[Color::Yellow] = outbreak::core::DiseaseStatus::Cured;
    let state = rs
        .apply_action(&state, PlayerId(0), &Action::Drive { to: chicago, legions: 0 })
        .unwrap()
        .state;
    assert_eq!(state.cube_count(chicago, Color::Yellow), 0);
    assert!(state.is_eradicated(Color::Yellow));
    assert_eq!(state.actions_remaining, 2);
}

/// Test that sharing knowledge requires the card of the shared city.
#[test]
fn test_share_knowledge() {
    let (rs, mut state) = setup(vec![Role::Medic, Role::Scientist]);
    let atlanta = city_card(&rs, "Atlanta");
    let paris = city_card(&rs, "Paris");
    state.players[PlayerId(0)]
        .hand
        .extend([PlayerCard::City(atlanta), PlayerCard::City(paris)]);

    assert!(rs
        .check(
            &state,
            PlayerId(0),
            &Action::ShareKnowledge {
                other: PlayerId(1),
                card: paris,
                give: true
            }
        )
        .is_err());

    let t = rs
        .apply_action(
            &state,
            PlayerId(0),
            &Action::ShareKnowledge {
                other: PlayerId(1),
                card: atlanta,
                give: true,
            },
        )
        .unwrap();
    assert!(t.state.players[PlayerId(1)].holds(PlayerCard::City(atlanta)));
    assert!(!t.state.players[PlayerId(0)].holds(PlayerCard::City(atlanta)));
}
