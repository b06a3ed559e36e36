use kyubu_core::{
    format_sequence, inverse_sequence, parse_algorithm, scramble, seeded_rng, Face, Move,
    MoveParseError, Turn, ALL_MOVES,
};

#[test]
fn inverse_is_an_involution() {
    for mv in ALL_MOVES {
        assert_eq!(mv.inverse().inverse(), mv, "{mv}");
    }
}

#[test]
fn double_turns_are_self_inverse() {
    for mv in ALL_MOVES.iter().filter(|mv| mv.turn == Turn::Double) {
        assert_eq!(mv.inverse(), *mv);
    }
    let r = Move::new(Face::R, Turn::Clockwise);
    assert_eq!(r.inverse().to_string(), "R'");
    assert_eq!(r.inverse().inverse().to_string(), "R");
}

#[test]
fn all_moves_cover_every_face_and_modifier_once() {
    let tokens: Vec<String> = ALL_MOVES.iter().map(|mv| mv.to_string()).collect();
    assert_eq!(tokens.len(), 18);
    for face in "RLUDFB".chars() {
        for suffix in ["", "'", "2"] {
            let token = format!("{face}{suffix}");
            assert_eq!(tokens.iter().filter(|t| **t == token).count(), 1, "{token}");
        }
    }
}

#[test]
fn invalid_batch_is_rejected_whole() {
    let err = parse_algorithm("R U R' Q F").expect_err("Q is not a face");
    assert_eq!(err.index, 3);
    assert_eq!(err.source, MoveParseError::UnknownFace { found: 'Q' });
    assert!(err.to_string().contains("'Q'"));

    assert!(parse_algorithm("R U'2").is_err());
    assert!(parse_algorithm("R2 U' r").is_err());
}

#[test]
fn scramble_draws_twenty_legal_tokens() {
    let mut rng = seeded_rng(2024);
    let moves = scramble(&mut rng, 20);
    assert_eq!(moves.len(), 20);
    let text = format_sequence(&moves);
    assert_eq!(parse_algorithm(&text).expect("round trip"), moves);
    assert!(moves.iter().all(|mv| ALL_MOVES.contains(mv)));
}

#[test]
fn scramble_reaches_every_token_eventually() {
    let mut rng = seeded_rng(5);
    let moves = scramble(&mut rng, 2000);
    for mv in ALL_MOVES {
        assert!(moves.contains(&mv), "{mv} never drawn");
    }
}

#[test]
fn resolving_a_resolve_gives_back_the_input() {
    let moves = parse_algorithm("R U2 F' L D B2").expect("valid");
    assert_eq!(inverse_sequence(&inverse_sequence(&moves)), moves);
}
