use std::fmt;

use tracing::debug;

use crate::moves::{Move, MoveEffect};
use crate::piece::{Color, Piece, PieceId, PieceType, Position};
use crate::player::Player;

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

const ROOK_DIRS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];
const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1), (-1, 0), (-1, 1), (0, -1),
    (0, 1), (1, -1), (1, 0), (1, 1),
];

/// Column the king starts on.
const KING_COL: i32 = 4;

/// Whether move generation should drop moves that leave the mover's own king
/// capturable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveFilter {
    Pseudo,
    Legal,
}

/// Board plus everything needed to decide what may legally happen next.
///
/// Pieces live in an arena; board cells and player rosters hold [`PieceId`]s
/// into it. Cloning the state therefore copies every piece, which is what the
/// legality simulation relies on.
#[derive(Clone, Debug)]
pub struct GameState {
    pieces: Vec<Piece>,
    squares: [[Option<PieceId>; 8]; 8],
    white: Player,
    black: Player,
    current_turn: Color,
    last_moved: Option<PieceId>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Create an empty board with no pieces. Useful for setting up test positions.
    pub fn empty() -> Self {
        GameState {
            pieces: Vec::new(),
            squares: [[None; 8]; 8],
            white: Player::with_roster(Color::White, Vec::new()),
            black: Player::with_roster(Color::Black, Vec::new()),
            current_turn: Color::White,
            last_moved: None,
        }
    }

    pub fn new() -> Self {
        let mut state = Self::empty();
        for color in [Color::Black, Color::White] {
            let home = color.home_row();
            let pawns = (home as i32 + color.pawn_direction()) as u8;
            for (col, &piece_type) in BACK_RANK.iter().enumerate() {
                let col = col as u8;
                state.add(Piece::new(piece_type, color, Position::from_indices(home, col)));
                state.add(Piece::new(PieceType::Pawn, color, Position::from_indices(pawns, col)));
            }
        }
        state.refresh_players();
        state
    }

    fn add(&mut self, piece: Piece) -> PieceId {
        let id = PieceId(self.pieces.len());
        self.pieces.push(piece);
        self.set_cell(piece.position(), Some(id));
        id
    }

    fn cell(&self, pos: Position) -> Option<PieceId> {
        self.squares[pos.row() as usize][pos.col() as usize]
    }

    fn set_cell(&mut self, pos: Position, id: Option<PieceId>) {
        self.squares[pos.row() as usize][pos.col() as usize] = id;
    }

    fn is_empty(&self, pos: Position) -> bool {
        self.cell(pos).is_none()
    }

    fn color_at(&self, pos: Position) -> Option<Color> {
        self.pos_to_piece(pos).map(|p| p.color)
    }

    /// Put `piece` on its own square, replacing whatever stood there.
    pub fn place_piece(&mut self, piece: Piece) -> PieceId {
        let id = self.add(piece);
        self.refresh_players();
        id
    }

    /// Take the piece on `pos` off the board.
    pub fn remove_piece(&mut self, pos: Position) -> Option<PieceId> {
        let id = self.cell(pos);
        self.set_cell(pos, None);
        self.refresh_players();
        id
    }

    pub fn pos_to_piece(&self, pos: Position) -> Option<&Piece> {
        self.cell(pos).map(|id| &self.pieces[id.0])
    }

    pub fn piece_id_at(&self, pos: Position) -> Option<PieceId> {
        self.cell(pos)
    }

    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.0]
    }

    /// The whole arena, captured pieces included.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    /// Hand the move to `color`. Only meant for setting up positions.
    pub fn set_current_turn(&mut self, color: Color) {
        self.current_turn = color;
    }

    pub fn last_moved(&self) -> Option<PieceId> {
        self.last_moved
    }

    pub fn player(&self, color: Color) -> &Player {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    pub fn current_player(&self) -> &Player {
        self.player(self.current_turn)
    }

    pub fn current_opponent(&self) -> &Player {
        self.player(self.current_turn.opposite())
    }

    pub fn is_current_player_piece(&self, pos: Position) -> bool {
        self.cell(pos)
            .map(|id| self.current_player().owns(id))
            .unwrap_or(false)
    }

    pub fn find_all_pieces_of_color(&self, color: Color) -> Vec<PieceId> {
        Position::all()
            .filter_map(|pos| self.cell(pos))
            .filter(|id| self.pieces[id.0].color == color)
            .collect()
    }

    pub fn king_position(&self, color: Color) -> Option<Position> {
        Position::all().find(|&pos| {
            self.pos_to_piece(pos)
                .map(|p| p.piece_type == PieceType::King && p.color == color)
                .unwrap_or(false)
        })
    }

    /// King squares as `(white, black)`.
    pub fn find_kings(&self) -> (Option<Position>, Option<Position>) {
        (self.king_position(Color::White), self.king_position(Color::Black))
    }

    fn refresh_players(&mut self) {
        let white = self.find_all_pieces_of_color(Color::White);
        let black = self.find_all_pieces_of_color(Color::Black);
        self.white.refresh(white);
        self.black.refresh(black);
    }

    pub fn score(&self, color: Color) -> u32 {
        self.player(color).score(&self.pieces)
    }

    /// Material lead of `color` over the other side.
    pub fn score_difference(&self, color: Color) -> i32 {
        self.score(color) as i32 - self.score(color.opposite()) as i32
    }

    // -----------------------------------------------------------------
    // Applying moves
    // -----------------------------------------------------------------

    /// Move the piece `id` to `to`. If `to` is one of the piece's generated
    /// moves its side effect (en passant, castling) is applied too; any other
    /// destination is a plain relocation.
    pub fn move_piece(&mut self, id: PieceId, to: Position) {
        let piece = self.pieces[id.0];
        if self.cell(piece.position()) != Some(id) {
            // Captured pieces stay in the arena but can no longer move.
            return;
        }
        let mv = self
            .pseudo_legal_moves(&piece)
            .into_iter()
            .find(|m| m.to == to)
            .unwrap_or_else(|| Move::quiet(piece.position(), to));
        self.apply_move(&mv);
    }

    pub fn apply_move(&mut self, mv: &Move) {
        if let Some(id) = self.cell(mv.from) {
            debug!(piece = %self.pieces[id.0], mv = %mv.notation(), "applying move");
        }
        self.apply_move_no_log(mv);
    }

    fn apply_move_no_log(&mut self, mv: &Move) {
        let Some(id) = self.cell(mv.from) else {
            return;
        };

        self.set_cell(mv.from, None);
        self.set_cell(mv.to, Some(id));
        let piece = &mut self.pieces[id.0];
        piece.relocate(mv.to);
        if piece.piece_type == PieceType::Pawn && mv.to.row() == piece.color.promotion_row() {
            piece.promote(PieceType::Queen);
        }
        let mover = piece.color;

        match mv.effect {
            MoveEffect::Quiet => {}
            MoveEffect::EnPassant { captured } => self.set_cell(captured, None),
            MoveEffect::Castle { rook_from, rook_to } => {
                if let Some(rook) = self.cell(rook_from) {
                    self.set_cell(rook_from, None);
                    self.set_cell(rook_to, Some(rook));
                    self.pieces[rook.0].relocate(rook_to);
                }
            }
        }

        self.last_moved = Some(id);
        self.current_turn = mover.opposite();
        self.refresh_players();
    }

    // -----------------------------------------------------------------
    // Move generation
    // -----------------------------------------------------------------

    /// Moves `piece` could make from its square, ignoring whether they expose
    /// its own king. `piece` is read by value so callers may ask about a piece
    /// that is not the occupant of its square.
    pub fn pseudo_legal_moves(&self, piece: &Piece) -> Vec<Move> {
        let mut moves = Vec::new();
        match piece.piece_type {
            PieceType::Rook => self.generate_sliding_moves(piece, &ROOK_DIRS, &mut moves),
            PieceType::Bishop => self.generate_sliding_moves(piece, &BISHOP_DIRS, &mut moves),
            PieceType::Queen => {
                self.generate_sliding_moves(piece, &ROOK_DIRS, &mut moves);
                self.generate_sliding_moves(piece, &BISHOP_DIRS, &mut moves);
            }
            PieceType::Knight => self.generate_step_moves(piece, &KNIGHT_OFFSETS, &mut moves),
            PieceType::King => {
                self.generate_step_moves(piece, &KING_OFFSETS, &mut moves);
                self.generate_castling_moves(piece, &mut moves);
            }
            PieceType::Pawn => self.generate_pawn_moves(piece, &mut moves),
        }
        moves
    }

    pub fn moves_for(&self, piece: &Piece, filter: MoveFilter) -> Vec<Move> {
        let moves = self.pseudo_legal_moves(piece);
        match filter {
            MoveFilter::Pseudo => moves,
            MoveFilter::Legal => moves
                .into_iter()
                .filter(|mv| self.is_legal(piece.color, mv))
                .collect(),
        }
    }

    pub fn legal_moves(&self, piece: &Piece) -> Vec<Move> {
        self.moves_for(piece, MoveFilter::Legal)
    }

    /// Squares `piece` may legally move to.
    pub fn piece_valid_tiles(&self, piece: &Piece) -> Vec<Position> {
        self.legal_moves(piece).into_iter().map(|mv| mv.to).collect()
    }

    /// Would moving `piece` to `to` keep its own king safe?
    pub fn simulate_move_is_legal(&self, piece: &Piece, to: Position) -> bool {
        let mv = self
            .pseudo_legal_moves(piece)
            .into_iter()
            .find(|m| m.to == to)
            .unwrap_or_else(|| Move::quiet(piece.position(), to));
        self.is_legal(piece.color, &mv)
    }

    fn is_legal(&self, mover: Color, mv: &Move) -> bool {
        if let MoveEffect::Castle { rook_to, .. } = mv.effect {
            // No castling out of check or across an attacked square.
            if self.is_in_check(mover) {
                return false;
            }
            let transit = Move::quiet(mv.from, rook_to);
            if Simulation::after(self, &transit).king_capturable(mover) {
                return false;
            }
        }
        !Simulation::after(self, mv).king_capturable(mover)
    }

    fn generate_sliding_moves(
        &self,
        piece: &Piece,
        directions: &[(i32, i32)],
        moves: &mut Vec<Move>,
    ) {
        let from = piece.position();
        for &(dr, dc) in directions {
            for step in 1..8 {
                let Some(to) = from.offset(dr * step, dc * step) else {
                    break;
                };
                match self.color_at(to) {
                    None => moves.push(Move::quiet(from, to)),
                    Some(color) => {
                        if color != piece.color {
                            moves.push(Move::quiet(from, to));
                        }
                        break;
                    }
                }
            }
        }
    }

    fn generate_step_moves(
        &self,
        piece: &Piece,
        offsets: &[(i32, i32)],
        moves: &mut Vec<Move>,
    ) {
        let from = piece.position();
        for &(dr, dc) in offsets {
            let Some(to) = from.offset(dr, dc) else {
                continue;
            };
            if self.color_at(to) != Some(piece.color) {
                moves.push(Move::quiet(from, to));
            }
        }
    }

    fn generate_castling_moves(&self, king: &Piece, moves: &mut Vec<Move>) {
        let from = king.position();
        let row = king.color.home_row() as i32;
        if king.has_moved() || from != Position::from_indices(row as u8, KING_COL as u8) {
            return;
        }

        // (rook column, king destination column, rook destination column)
        let sides = [
            (7, KING_COL + 2, KING_COL + 1),
            (0, KING_COL - 2, KING_COL - 1),
        ];
        for (rook_col, king_to, rook_to) in sides {
            let (Ok(rook_from), Ok(to), Ok(rook_to)) = (
                Position::new(row, rook_col),
                Position::new(row, king_to),
                Position::new(row, rook_to),
            ) else {
                continue;
            };
            let rook_ready = self
                .pos_to_piece(rook_from)
                .map(|p| {
                    p.piece_type == PieceType::Rook && p.color == king.color && !p.has_moved()
                })
                .unwrap_or(false);
            if !rook_ready {
                continue;
            }
            let (lo, hi) = (KING_COL.min(rook_col) + 1, KING_COL.max(rook_col));
            let path_clear = (lo..hi).all(|col| {
                Position::new(row, col)
                    .map(|pos| self.is_empty(pos))
                    .unwrap_or(false)
            });
            if path_clear {
                moves.push(Move {
                    from,
                    to,
                    effect: MoveEffect::Castle { rook_from, rook_to },
                });
            }
        }
    }

    fn generate_pawn_moves(&self, pawn: &Piece, moves: &mut Vec<Move>) {
        let from = pawn.position();
        let dir = pawn.color.pawn_direction();

        // Single and double push
        if let Some(one) = from.offset(dir, 0) {
            if self.is_empty(one) {
                moves.push(Move::quiet(from, one));
                if !pawn.has_moved() {
                    if let Some(two) = from.offset(2 * dir, 0) {
                        if self.is_empty(two) {
                            moves.push(Move::quiet(from, two));
                        }
                    }
                }
            }
        }

        // Captures
        for dc in [-1, 1] {
            if let Some(to) = from.offset(dir, dc) {
                if self.color_at(to) == Some(pawn.color.opposite()) {
                    moves.push(Move::quiet(from, to));
                }
            }
        }

        // En passant: only against the pawn that double-stepped last move.
        let en_passant_row = match pawn.color {
            Color::White => 3,
            Color::Black => 4,
        };
        if from.row() != en_passant_row {
            return;
        }
        for dc in [-1, 1] {
            let (Some(side), Some(to)) = (from.offset(0, dc), from.offset(dir, dc)) else {
                continue;
            };
            let Some(victim) = self.cell(side) else {
                continue;
            };
            let target = &self.pieces[victim.0];
            if target.piece_type == PieceType::Pawn
                && target.color != pawn.color
                && target.move_count() == 1
                && self.last_moved == Some(victim)
                && self.is_empty(to)
            {
                moves.push(Move {
                    from,
                    to,
                    effect: MoveEffect::EnPassant { captured: side },
                });
            }
        }
    }

    // -----------------------------------------------------------------
    // Status queries
    // -----------------------------------------------------------------

    /// Can any pseudo-legal move of `attacker` land on `target`?
    fn is_capturable_by(&self, target: Position, attacker: Color) -> bool {
        self.player(attacker).pieces().iter().any(|id| {
            self.pseudo_legal_moves(&self.pieces[id.0])
                .iter()
                .any(|mv| mv.to == target)
        })
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        match self.king_position(color) {
            Some(king) => self.is_capturable_by(king, color.opposite()),
            None => false,
        }
    }

    pub fn check_if_player_in_check(&self) -> bool {
        self.is_in_check(self.current_turn)
    }

    pub fn check_if_opponent_in_check(&self) -> bool {
        self.is_in_check(self.current_turn.opposite())
    }

    /// Every legal move of `color`, piece by piece.
    pub fn find_all_moves(&self, color: Color) -> Vec<Move> {
        self.player(color)
            .pieces()
            .iter()
            .flat_map(|id| self.legal_moves(&self.pieces[id.0]))
            .collect()
    }

    pub fn find_all_player_moves(&self) -> Vec<Move> {
        self.find_all_moves(self.current_turn)
    }

    pub fn find_all_opponent_moves(&self) -> Vec<Move> {
        self.find_all_moves(self.current_turn.opposite())
    }

    pub fn has_legal_move(&self, color: Color) -> bool {
        self.player(color)
            .pieces()
            .iter()
            .any(|id| !self.legal_moves(&self.pieces[id.0]).is_empty())
    }

    pub fn is_checkmate(&self) -> bool {
        !self.has_legal_move(self.current_turn) && self.check_if_player_in_check()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.has_legal_move(self.current_turn) && !self.check_if_player_in_check()
    }

    /// A side can mate with a queen, a rook, a pawn or two minor pieces.
    pub fn can_mate(&self, color: Color) -> bool {
        let mut minors = 0;
        for id in self.player(color).pieces() {
            let piece_type = self.pieces[id.0].piece_type;
            match piece_type {
                PieceType::Queen | PieceType::Rook | PieceType::Pawn => return true,
                _ if piece_type.is_minor() => minors += 1,
                _ => {}
            }
        }
        minors >= 2
    }

    pub fn can_player_mate(&self) -> bool {
        self.can_mate(self.current_turn)
    }

    pub fn can_opponent_mate(&self) -> bool {
        self.can_mate(self.current_turn.opposite())
    }

    pub fn is_material_draw(&self) -> bool {
        !self.can_mate(Color::White) && !self.can_mate(Color::Black)
    }

    /// Canonical text form of the piece placement, used for repetition
    /// detection. Ranks are separated by `/`, empty squares are `--`.
    pub fn board_string(&self) -> String {
        (0..8)
            .map(|row| {
                self.squares[row]
                    .iter()
                    .map(|cell| match cell {
                        Some(id) => self.pieces[id.0].name(),
                        None => "--".to_string(),
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.squares {
            let line: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Some(id) => self.pieces[id.0].name(),
                    None => "--".to_string(),
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// A throwaway copy of a game state with one move applied. It only answers
/// pseudo-legal questions, so a simulation never starts another one.
struct Simulation(GameState);

impl Simulation {
    fn after(state: &GameState, mv: &Move) -> Self {
        let mut copy = state.clone();
        copy.apply_move_no_log(mv);
        Simulation(copy)
    }

    fn king_capturable(&self, color: Color) -> bool {
        self.0.is_in_check(color)
    }
}
