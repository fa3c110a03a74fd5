use chess_rules::{Color, EndType, GameSession, GameState, Piece, PieceType, Position, Winner};

fn pos(row: i32, col: i32) -> Position {
    Position::new(row, col).unwrap()
}

#[test]
fn en_passant_is_recorded_with_the_behind_square() {
    let mut session = GameSession::default();
    assert!(session.play(pos(6, 4), pos(4, 4)));
    assert!(session.play(pos(1, 0), pos(2, 0)));
    assert!(session.play(pos(4, 4), pos(3, 4)));
    assert!(session.play(pos(1, 5), pos(3, 5)));
    assert!(session.play(pos(3, 4), pos(2, 5)));

    let record = session.move_record();
    assert_eq!(record[2].white, "E5->F6");
    assert_eq!(record[1].black, "F7->F5");
    assert!(session.state().pos_to_piece(pos(3, 5)).is_none());
    assert_eq!(session.state().player(Color::Black).pieces().len(), 15);
    assert_eq!(session.score_difference(Color::White), 1);
}

#[test]
fn scholars_mate() {
    let mut session = GameSession::default();
    let moves = [
        ((6, 4), (4, 4)),
        ((1, 4), (3, 4)),
        ((7, 5), (4, 2)),
        ((0, 1), (2, 2)),
        ((7, 3), (3, 7)),
        ((0, 6), (2, 5)),
        ((3, 7), (1, 5)),
    ];
    for ((fr, fc), (tr, tc)) in moves {
        assert!(session.play(pos(fr, fc), pos(tr, tc)), "{fr},{fc} -> {tr},{tc}");
    }
    assert!(session.game_over().is_over);
    assert_eq!(session.game_over().winner, Some(Winner::White));
    assert_eq!(session.game_over().end_type, Some(EndType::Checkmate));
}

#[test]
fn capturing_the_last_mating_piece_draws() {
    let mut state = GameState::empty();
    state.place_piece(Piece::from_name("wk", 7, 4).unwrap());
    state.place_piece(Piece::from_name("wh", 5, 2).unwrap());
    state.place_piece(Piece::from_name("bk", 0, 4).unwrap());
    state.place_piece(Piece::from_name("bb", 0, 2).unwrap());
    state.place_piece(Piece::from_name("bp", 4, 4).unwrap());
    assert!(!state.is_material_draw());

    let knight = state.piece_id_at(pos(5, 2)).unwrap();
    state.move_piece(knight, pos(4, 4));
    assert!(state.is_material_draw());
}

#[test]
fn castling_moves_the_rook_in_a_real_game() {
    let mut session = GameSession::default();
    let moves = [
        ((6, 4), (4, 4)),
        ((1, 4), (3, 4)),
        ((7, 6), (5, 5)),
        ((0, 1), (2, 2)),
        ((7, 5), (4, 2)),
        ((0, 6), (2, 5)),
        ((7, 4), (7, 6)),
    ];
    for ((fr, fc), (tr, tc)) in moves {
        assert!(session.play(pos(fr, fc), pos(tr, tc)), "{fr},{fc} -> {tr},{tc}");
    }
    let state = session.state();
    assert_eq!(state.pos_to_piece(pos(7, 6)).unwrap().piece_type, PieceType::King);
    assert_eq!(state.pos_to_piece(pos(7, 5)).unwrap().piece_type, PieceType::Rook);
    assert!(state.pos_to_piece(pos(7, 7)).is_none());
    assert_eq!(session.move_record()[3].white, "E1->G1");
}

#[test]
fn king_cannot_be_left_in_check() {
    let mut session = GameSession::default();
    assert!(session.play(pos(6, 5), pos(5, 5)));
    assert!(session.play(pos(1, 4), pos(2, 4)));
    assert!(session.play(pos(6, 0), pos(5, 0)));
    assert!(session.play(pos(0, 3), pos(4, 7)));
    // White is in check along h4-e1; a random pawn push does not help.
    assert!(session.is_in_check());
    assert!(session.pick_up(pos(5, 0)));
    assert!(!session.drop_at(pos(4, 0)));
    assert!(session.pick_up(pos(6, 6)));
    assert!(session.drop_at(pos(5, 6)));
    assert!(!session.is_in_check());
}
