use backgammon_core::ai::Ai;
use backgammon_core::config::{GameOptions, MatchConfig};
use backgammon_core::constants::CHECKERS_PER_PLAYER;
use backgammon_core::dice::Dice;
use backgammon_core::error::SessionError;
use backgammon_core::game_state::{GamePhase, GameState};
use backgammon_core::level::{AiSettings, Difficulty, Personality};
use backgammon_core::move_list::Slot;
use backgammon_core::player::Player;
use backgammon_core::session::Session;
use rand::SeedableRng;
use rand::rngs::StdRng;

const MAX_TURNS: usize = 2_000;

fn check_invariants(game: &GameState) {
    let pos = game.position();
    for player in Player::ALL {
        assert_eq!(pos.checkers(player), CHECKERS_PER_PLAYER as u32, "{pos}");
    }
    if pos.bar(game.turn()) > 0 {
        assert!(game.legal_moves().iter().all(|m| m.from == Slot::Bar), "{pos}");
    }
}

/// Plays one game to the end, applying every AI play move by move.
fn play_game(seed: u64, white: &Ai, black: &Ai, options: GameOptions) -> GameState {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = GameState::new(options);
    game.opening_roll(&mut rng).unwrap();

    for _ in 0..MAX_TURNS {
        check_invariants(&game);
        match game.phase() {
            GamePhase::Finished => return game,
            GamePhase::Rolling => {
                game.roll(&mut rng).unwrap();
            }
            GamePhase::NoMoves => game.switch_turn().unwrap(),
            GamePhase::Moving | GamePhase::ForcedMove => {
                let ai = match game.turn() {
                    Player::White => white,
                    Player::Black => black,
                };
                let plays = game.legal_plays();
                let play = ai
                    .select_play(game.position(), game.turn(), &plays, &mut rng)
                    .unwrap()
                    .clone();
                for &mv in &play.moves {
                    assert!(game.legal_moves().contains(&mv), "{mv} not offered");
                    game.apply_move(mv).unwrap();
                    check_invariants(&game);
                }
                assert_eq!(game.position(), &play.result);
                if !game.is_finished() {
                    assert!(game.is_turn_complete());
                    game.switch_turn().unwrap();
                }
            }
            GamePhase::Setup => panic!("game left in setup"),
        }
    }
    panic!("game did not finish in {MAX_TURNS} steps");
}

#[test]
fn test_random_games_keep_invariants() {
    let white = Ai::new(AiSettings::new(Difficulty::Beginner, Personality::Aggressive));
    let black = Ai::new(AiSettings::new(Difficulty::Medium, Personality::Defensive));
    for seed in 0..12 {
        let game = play_game(seed, &white, &black, GameOptions::default());
        let outcome = game.outcome().copied().unwrap();
        assert_eq!(game.position().off(outcome.winner), CHECKERS_PER_PLAYER);
        assert_eq!(outcome.points, outcome.kind.multiplier());
        assert!(game.history().len() > 5);
    }
}

#[test]
fn test_auto_options_drive_turns() {
    let ai = Ai::new(AiSettings::new(Difficulty::Easy, Personality::Tactical));
    let options = GameOptions {
        auto_play_forced: true,
        auto_switch_turn: true,
        ..GameOptions::default()
    };
    let mut rng = StdRng::seed_from_u64(99);
    let mut game = GameState::new(options);
    game.opening_roll(&mut rng).unwrap();

    for _ in 0..MAX_TURNS {
        check_invariants(&game);
        match game.phase() {
            GamePhase::Finished => return,
            GamePhase::Rolling => {
                game.roll(&mut rng).unwrap();
            }
            GamePhase::Moving => {
                let plays = game.legal_plays();
                let play = ai
                    .select_play(game.position(), game.turn(), &plays, &mut rng)
                    .unwrap()
                    .clone();
                game.apply_play(&play.moves).unwrap();
                assert!(matches!(
                    game.phase(),
                    GamePhase::Rolling | GamePhase::Finished
                ));
            }
            phase => panic!("unexpected phase {phase:?} with automatic turns"),
        }
    }
    panic!("game did not finish");
}

#[test]
fn test_ai_plays_are_always_legal() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut game = GameState::default();
    game.opening_roll(&mut rng).unwrap();
    let ais: Vec<Ai> = Difficulty::ALL
        .into_iter()
        .zip(Personality::ALL.into_iter().cycle())
        .map(|(d, p)| Ai::new(AiSettings::new(d, p)))
        .collect();

    for turn in 0..60 {
        match game.phase() {
            GamePhase::Finished => break,
            GamePhase::Rolling => {
                game.roll(&mut rng).unwrap();
            }
            GamePhase::NoMoves => game.switch_turn().unwrap(),
            _ => {
                let plays = game.legal_plays();
                for ai in &ais {
                    let play = ai
                        .select_play(game.position(), game.turn(), &plays, &mut rng)
                        .unwrap();
                    assert!(plays.contains(&play.moves));
                }
                let play = ais[turn % ais.len()]
                    .select_play(game.position(), game.turn(), &plays, &mut rng)
                    .unwrap()
                    .clone();
                game.apply_play(&play.moves).unwrap();
                if !game.is_finished() {
                    game.switch_turn().unwrap();
                }
            }
        }
    }
}

#[test]
fn test_session_match_with_cube() {
    let config = MatchConfig {
        target_points: 3,
        ..MatchConfig::default()
    };
    let mut session = Session::new(config).unwrap();
    let ai = Ai::new(AiSettings::new(Difficulty::Medium, Personality::Balanced));
    let mut rng = StdRng::seed_from_u64(7);
    let mut crawford_games = 0;

    for _ in 0..20 {
        if session.game().is_crawford() {
            crawford_games += 1;
        }
        let game = session.game_mut();
        game.opening_roll(&mut rng).unwrap();
        while !game.is_finished() {
            match game.phase() {
                GamePhase::Rolling => {
                    if game.offer_double().is_ok() {
                        game.accept_double().unwrap();
                    }
                    game.roll(&mut rng).unwrap();
                }
                GamePhase::NoMoves => game.switch_turn().unwrap(),
                _ => {
                    let plays = game.legal_plays();
                    let play = ai
                        .select_play(game.position(), game.turn(), &plays, &mut rng)
                        .unwrap()
                        .clone();
                    game.apply_play(&play.moves).unwrap();
                    if !game.is_finished() {
                        game.switch_turn().unwrap();
                    }
                }
            }
        }

        let json = session.to_json().unwrap();
        let restored = Session::from_json(&json).unwrap();
        assert_eq!(restored.match_state(), session.match_state());

        if session.finish_game().unwrap().is_some() {
            break;
        }
    }

    let state = session.match_state();
    assert!(state.is_over());
    let (white, black) = state.scores();
    assert!(white >= 3 || black >= 3);
    assert!(crawford_games <= 1);
}

#[test]
fn test_session_rejects_corrupt_blob() {
    let mut session = Session::new(MatchConfig::default()).unwrap();
    session.game_mut().start(Player::White).unwrap();
    let json = session.to_json().unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();

    // Sixteen white checkers on the 6-point.
    value["game"]["position"]["points"][5] = serde_json::json!(6);
    let corrupt = serde_json::to_string(&value).unwrap();
    assert!(matches!(
        Session::from_json(&corrupt),
        Err(SessionError::Position(_))
    ));

    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["game"]["dice"] = serde_json::json!({ "values": [7, 1], "remaining": [7, 1] });
    value["game"]["phase"] = serde_json::json!("moving");
    let corrupt = serde_json::to_string(&value).unwrap();
    assert!(matches!(
        Session::from_json(&corrupt),
        Err(SessionError::Dice(_))
    ));

    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["config"]["target_points"] = serde_json::json!(9);
    let corrupt = serde_json::to_string(&value).unwrap();
    assert!(matches!(
        Session::from_json(&corrupt),
        Err(SessionError::Inconsistent(_))
    ));

    // Both dice played but both still listed as remaining.
    let json = mid_turn_json(2);
    assert!(Session::from_json(&json).is_ok());
    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["game"]["dice"]["remaining"] = serde_json::json!([6, 5]);
    let corrupt = serde_json::to_string(&value).unwrap();
    assert!(matches!(
        Session::from_json(&corrupt),
        Err(SessionError::Inconsistent(_))
    ));
}

/// A saved session with White to play a 6-5 from the opening position,
/// `played` moves into the turn.
fn mid_turn_json(played: usize) -> String {
    let mut session = Session::new(MatchConfig::default()).unwrap();
    let game = session.game_mut();
    game.start(Player::White).unwrap();
    game.set_dice(Dice::new(6, 5).unwrap()).unwrap();
    for _ in 0..played {
        let mv = game.legal_moves()[0];
        game.apply_move(mv).unwrap();
    }
    session.to_json().unwrap()
}

fn assert_inconsistent(value: &serde_json::Value) {
    let corrupt = serde_json::to_string(value).unwrap();
    assert!(matches!(
        Session::from_json(&corrupt),
        Err(SessionError::Inconsistent(_))
    ));
}

#[test]
fn test_session_rejects_illegal_turn_moves() {
    let json = mid_turn_json(1);
    assert!(Session::from_json(&json).is_ok());

    // Origin off the board.
    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["game"]["turn_moves"][0]["from"] = serde_json::json!({ "point": 30 });
    assert_inconsistent(&value);

    // Entering from an empty bar.
    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["game"]["turn_moves"][0]["from"] = serde_json::json!("bar");
    assert_inconsistent(&value);

    // A die the roll does not have.
    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["game"]["turn_moves"][0]["die"] = serde_json::json!(3);
    assert_inconsistent(&value);
}

#[test]
fn test_session_rejects_phase_that_disagrees_with_the_roll() {
    let json = mid_turn_json(0);
    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["game"]["phase"], serde_json::json!("moving"));

    value["game"]["phase"] = serde_json::json!("forced_move");
    assert_inconsistent(&value);
    value["game"]["phase"] = serde_json::json!("no_moves");
    assert_inconsistent(&value);
}

#[test]
fn test_session_cube_limit_must_match_config() {
    let session = Session::new(MatchConfig::default()).unwrap();
    let json = session.to_json().unwrap();
    let top = 1u64 << 31;

    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["game"]["cube"]["value"] = serde_json::json!(top);
    value["game"]["cube"]["max_value"] = serde_json::json!(top);
    assert_inconsistent(&value);

    // A cube already at a configured maximum of 2^31 refuses to double.
    value["config"]["game"]["max_cube_value"] = serde_json::json!(top);
    value["game"]["options"]["max_cube_value"] = serde_json::json!(top);
    let json = serde_json::to_string(&value).unwrap();
    let mut session = Session::from_json(&json).unwrap();
    session.game_mut().start(Player::White).unwrap();
    assert!(session.game_mut().offer_double().is_err());
    assert_eq!(session.game().cube().value(), 1 << 31);
}
