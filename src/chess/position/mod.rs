//! Contains the board representation and its mutators
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::str::FromStr;
use lazy_static::lazy_static;
use regex::Regex;
use super::*;
use Color::*;

mod en_passant;

/// Bit flags for the castling rights mask
pub mod castling {
    /// White may castle king-side
    pub const WHITE_KING_SIDE: u8 = 1;
    /// White may castle queen-side
    pub const WHITE_QUEEN_SIDE: u8 = 2;
    /// Black may castle king-side
    pub const BLACK_KING_SIDE: u8 = 4;
    /// Black may castle queen-side
    pub const BLACK_QUEEN_SIDE: u8 = 8;
    /// All castling rights
    pub const ALL: u8 = 15;
}

use castling::*;

// file of the king and the two rooks on their home squares
const KING_FILE: usize = 4;
const QUEEN_ROOK_FILE: usize = 0;
const KING_ROOK_FILE: usize = 7;

lazy_static! {
    static ref EN_PASSANT_LIST: Regex =
        Regex::new(r"^[a-h][1-8](?:,[a-h][1-8])*$").expect("INFALLIBLE");
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A dice chess position: the board, the side to move, castling rights and en-passant rights.
///
/// Unlike standard chess, several pawns may hold en-passant rights at once, since one turn can
/// advance more than one pawn two squares. Bit `f` of the en-passant mask means the pawn on file
/// `f` belonging to the side which just moved may be captured en passant.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    // indexed by [rank][file]
    board: [[Option<(Color, Piece)>; 8]; 8],
    turn: Color,
    castling: u8,
    en_passant: u8,
}

impl Position {
    /// Returns a position with no pieces, white to move, and no castling or en-passant rights.
    pub fn empty_board() -> Position {
        Position {
            board: [[None; 8]; 8],
            turn: White,
            castling: 0,
            en_passant: 0,
        }
    }

    /// Returns the standard starting position.
    pub fn new() -> Position {
        Position::from_fen_str("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect("INFALLIBLE")
    }

    /// Returns the piece on `sq`, if any
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.board[sq.rank()][sq.file()]
    }

    /// Returns the side to move
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Returns the castling rights as a mask of `castling` flags
    pub fn castling_rights(&self) -> u8 {
        self.castling
    }

    /// Returns the en-passant mask: bit `f` is set when the pawn on file `f` may be captured
    pub fn en_passant_files(&self) -> u8 {
        self.en_passant
    }

    /// Returns the square of the king of the given color.
    ///
    /// Panics if there is no such king. Every position reached from a legal one has both kings.
    pub fn king_location(&self, color: Color) -> Square {
        Square::all()
            .find(|&sq| self.piece_at(sq) == Some((color, Piece::King)))
            .expect("missing king")
    }

    /// Moves whatever is on `from` to `to`, replacing anything on `to`.
    pub fn move_piece(&mut self, from: Square, to: Square) {
        self.touch(from);
        self.touch(to);
        self.board[to.rank()][to.file()] = self.board[from.rank()][from.file()];
        self.board[from.rank()][from.file()] = None;
    }

    /// Removes whatever is on `sq`.
    pub fn clear_square(&mut self, sq: Square) {
        self.touch(sq);
        self.board[sq.rank()][sq.file()] = None;
    }

    /// Places a piece on `sq`, replacing anything there.
    pub fn put_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        self.touch(sq);
        self.board[sq.rank()][sq.file()] = Some((color, piece));
    }

    // Revokes rights which depend on the contents of `sq`: castling rights tied to a king or rook
    // home square, and the en-passant right of a pawn sitting on its double-step square.
    fn touch(&mut self, sq: Square) {
        self.castling &= !match (sq.file(), sq.rank()) {
            (KING_FILE, 0) => WHITE_KING_SIDE | WHITE_QUEEN_SIDE,
            (QUEEN_ROOK_FILE, 0) => WHITE_QUEEN_SIDE,
            (KING_ROOK_FILE, 0) => WHITE_KING_SIDE,
            (KING_FILE, 7) => BLACK_KING_SIDE | BLACK_QUEEN_SIDE,
            (QUEEN_ROOK_FILE, 7) => BLACK_QUEEN_SIDE,
            (KING_ROOK_FILE, 7) => BLACK_KING_SIDE,
            _ => 0,
        };
        if sq.rank() == (!self.turn).double_step_rank() {
            self.en_passant &= !(1 << sq.file());
        }
    }

    pub(crate) fn set_turn(&mut self, turn: Color) {
        self.turn = turn;
    }

    pub(crate) fn set_en_passant_files(&mut self, mask: u8) {
        self.en_passant = mask;
    }

    pub(crate) fn add_en_passant_file(&mut self, file: usize) {
        self.en_passant |= 1 << file;
    }

    /// Returns the castling rights belonging to `color`, as (king-side, queen-side) flags
    pub fn castling_flags(color: Color) -> (u8, u8) {
        match color {
            White => (WHITE_KING_SIDE, WHITE_QUEEN_SIDE),
            Black => (BLACK_KING_SIDE, BLACK_QUEEN_SIDE),
        }
    }

    /// Returns the position with colors swapped and the board mirrored top to bottom, so that
    /// the same moves are available to the other side.
    pub fn flip(&self) -> Position {
        let mut flipped = Position::empty_board();
        for rank in 0..8 {
            for file in 0..8 {
                flipped.board[7 - rank][file] =
                    self.board[rank][file].map(|(color, piece)| (!color, piece));
            }
        }
        flipped.turn = !self.turn;
        flipped.castling = (self.castling >> 2) | ((self.castling & 3) << 2);
        flipped.en_passant = self.en_passant;
        flipped
    }

    /// Returns the position mirrored left to right. A mirrored king is no longer on its home
    /// square, so castling rights are dropped.
    pub fn flip_horizontally(&self) -> Position {
        let mut flipped = *self;
        for rank in 0..8 {
            flipped.board[rank].reverse();
        }
        flipped.castling = 0;
        flipped.en_passant = self.en_passant.reverse_bits();
        flipped
    }

    /// Creates a position from a FEN string.
    ///
    /// En-passant squares may be given as a comma-separated list. They must lie on the rank
    /// behind a pawn which just advanced two squares: rank 6 with white to move, rank 3 with
    /// black to move. The half-move clock and move number are optional and ignored.
    pub fn from_fen_str(s: &str) -> Result<Position> {
        let mut pos = Position::empty_board();
        let fields: Vec<_> = s.split_whitespace().collect();

        // 1. four to six fields
        if fields.len() < 4 {
            return Err(Error::MissingFenField);
        } else if fields.len() > 6 {
            return Err(Error::ParseError);
        }

        // 2. the board, rank 8 first
        let ranks: Vec<_> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(Error::InvalidRankCount);
        }
        for (i, rank) in ranks.iter().enumerate() {
            let r = 7 - i;
            let mut f = 0;
            for c in rank.chars() {
                match c {
                    '0' ..= '9' => {
                        let n = c.to_digit(10).expect("INFALLIBLE") as usize;
                        if n == 0 {
                            return Err(Error::InvalidFileCount);
                        }
                        f += n;
                    }
                    _ => {
                        let (color, piece) = Piece::from_char(c)?;
                        if f >= 8 {
                            return Err(Error::InvalidFileCount);
                        }
                        pos.board[r][f] = Some((color, piece));
                        f += 1;
                    }
                }
                if f > 8 {
                    return Err(Error::InvalidFileCount);
                }
            }
            if f != 8 {
                return Err(Error::InvalidFileCount);
            }
        }

        // 3. the side to move
        pos.turn = fields[1].parse()?;

        // 4. castling rights
        if fields[2] != "-" {
            for c in fields[2].chars() {
                pos.castling |= match c {
                    'K' => WHITE_KING_SIDE,
                    'Q' => WHITE_QUEEN_SIDE,
                    'k' => BLACK_KING_SIDE,
                    'q' => BLACK_QUEEN_SIDE,
                    _ => return Err(Error::InvalidCastlingFlags),
                };
            }
        }

        // 5. en-passant squares
        if fields[3] != "-" {
            if !EN_PASSANT_LIST.is_match(fields[3]) {
                return Err(Error::InvalidEnPassantSquare);
            }
            let hop_rank = Position::hop_rank(pos.turn);
            for sq in fields[3].split(',') {
                let sq: Square = sq.parse()?;
                if sq.rank() != hop_rank {
                    return Err(Error::InvalidEnPassantSquare);
                }
                pos.en_passant |= 1 << sq.file();
            }
        }

        // 6. half-move clock and move number must at least be numbers
        for field in &fields[4..] {
            if field.parse::<u32>().is_err() {
                return Err(Error::ParseError);
            }
        }

        Ok(pos)
    }

    /// Returns the position as a FEN string, without the half-move clock and move number.
    pub fn to_fen_str(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.board[rank][file] {
                    None => empty += 1,
                    Some((color, piece)) => {
                        if empty > 0 {
                            fen += &empty.to_string();
                            empty = 0;
                        }
                        fen.push(piece.to_char(color));
                    }
                }
            }
            if empty > 0 {
                fen += &empty.to_string();
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen += &self.turn.to_string();

        fen.push(' ');
        if self.castling == 0 {
            fen.push('-');
        } else {
            for (flag, c) in [
                (WHITE_KING_SIDE, 'K'), (WHITE_QUEEN_SIDE, 'Q'),
                (BLACK_KING_SIDE, 'k'), (BLACK_QUEEN_SIDE, 'q'),
            ].iter() {
                if self.castling & flag != 0 {
                    fen.push(*c);
                }
            }
        }

        fen.push(' ');
        if self.en_passant == 0 {
            fen.push('-');
        } else {
            let hop_rank = Position::hop_rank(self.turn);
            let squares: Vec<_> = (0..8)
                .filter(|file| self.en_passant & (1 << file) != 0)
                .map(|file| Square::new(file, hop_rank).to_string())
                .collect();
            fen += &squares.join(",");
        }

        fen
    }

    /// Returns a text diagram of the board, rank 8 at the top, with `.` for empty squares.
    pub fn diagram(&self) -> String {
        let mut s = String::new();
        for rank in (0..8).rev() {
            s.push((b'1' + rank as u8) as char);
            for file in 0..8 {
                s.push(' ');
                s.push(self.board[rank][file].map_or('.', |(color, piece)| piece.to_char(color)));
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h\n");
        s
    }

    // the rank a pawn of the side not to move skipped over when it advanced two squares
    fn hop_rank(turn: Color) -> usize {
        ((!turn).pawn_rank() as i8 + (!turn).forward()) as usize
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_fen_str().fmt(f)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.to_fen_str())
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Position::from_fen_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        fen.parse().unwrap()
    }

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn new_returns_the_standard_starting_position() {
        assert_eq!(Position::new().to_fen_str(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -");
    }

    mod from_fen_str {
        use super::*;

        #[test]
        fn round_trips_through_to_fen_str() {
            for fen in &[
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -",
                "7k/8/8/8/Pp6/8/8/7K b - a3",
                "K6k/8/8/8/PpPpP3/8/8/8 b - a3,c3,e3",
                "4k3/8/8/3pP3/8/8/8/4K3 w Kq d6",
                "8/8/8/8/8/8/3PPP2/R3K2k w Q -",
            ] {
                assert_eq!(pos(fen).to_fen_str(), *fen);
            }
        }

        #[test]
        fn move_counters_are_optional() {
            assert_eq!(pos("k7/8/8/8/8/8/8/K7 w - -"), pos("k7/8/8/8/8/8/8/K7 w - - 0 1"));
            assert_eq!(pos("k7/8/8/8/8/8/8/K7 w - - 7"), pos("k7/8/8/8/8/8/8/K7 w - - 0 1"));
        }

        #[test]
        fn missing_fields_return_error() {
            assert_eq!(Position::from_fen_str(""), Err(Error::MissingFenField));
            assert_eq!(Position::from_fen_str("k7/8/8/8/8/8/8/K7 w -"),
                Err(Error::MissingFenField));
        }

        #[test]
        fn extra_fields_return_error() {
            assert_eq!(Position::from_fen_str("k7/8/8/8/8/8/8/K7 w - - 0 1 2"),
                Err(Error::ParseError));
            assert_eq!(Position::from_fen_str("k7/8/8/8/8/8/8/K7 w - - x 1"),
                Err(Error::ParseError));
        }

        #[test]
        fn wrong_rank_count_returns_error() {
            assert_eq!(Position::from_fen_str("k7/8/8/8/8/8/K7 w - -"),
                Err(Error::InvalidRankCount));
            assert_eq!(Position::from_fen_str("k7/8/8/8/8/8/8/8/K7 w - -"),
                Err(Error::InvalidRankCount));
        }

        #[test]
        fn wrong_file_count_returns_error() {
            assert_eq!(Position::from_fen_str("k6/8/8/8/8/8/8/K7 w - -"),
                Err(Error::InvalidFileCount));
            assert_eq!(Position::from_fen_str("k8/8/8/8/8/8/8/K7 w - -"),
                Err(Error::InvalidFileCount));
            assert_eq!(Position::from_fen_str("k7p/8/8/8/8/8/8/K7 w - -"),
                Err(Error::InvalidFileCount));
            assert_eq!(Position::from_fen_str("k7/9/8/8/8/8/8/K7 w - -"),
                Err(Error::InvalidFileCount));
        }

        #[test]
        fn unknown_piece_returns_error() {
            assert_eq!(Position::from_fen_str("x7/8/8/8/8/8/8/K7 w - -"),
                Err(Error::InvalidPiece));
        }

        #[test]
        fn bad_turn_returns_error() {
            assert_eq!(Position::from_fen_str("k7/8/8/8/8/8/8/K7 x - -"),
                Err(Error::InvalidTurn));
        }

        #[test]
        fn bad_castling_returns_error() {
            assert_eq!(Position::from_fen_str("k7/8/8/8/8/8/8/K7 w KX -"),
                Err(Error::InvalidCastlingFlags));
        }

        #[test]
        fn en_passant_on_wrong_rank_returns_error() {
            assert_eq!(Position::from_fen_str("7k/8/8/8/Pp6/8/8/7K w - a3"),
                Err(Error::InvalidEnPassantSquare));
            assert_eq!(Position::from_fen_str("7k/8/8/8/Pp6/8/8/7K b - a3,b4"),
                Err(Error::InvalidEnPassantSquare));
            assert_eq!(Position::from_fen_str("7k/8/8/8/Pp6/8/8/7K b - a3,"),
                Err(Error::InvalidEnPassantSquare));
        }

        #[test]
        fn en_passant_list_sets_mask() {
            assert_eq!(pos("K6k/8/8/8/PpPpP3/8/8/8 b - a3,c3,e3").en_passant_files(), 0b10101);
            assert_eq!(pos("4k3/8/8/3pP3/8/8/8/4K3 w - d6").en_passant_files(), 0b1000);
        }
    }

    mod mutators {
        use super::*;

        #[test]
        fn moving_king_revokes_both_rights() {
            let mut p = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq -");
            p.move_piece(sq("e1"), sq("f1"));
            assert_eq!(p.castling_rights(), BLACK_KING_SIDE | BLACK_QUEEN_SIDE);
            p.move_piece(sq("e8"), sq("d8"));
            assert_eq!(p.castling_rights(), 0);
        }

        #[test]
        fn moving_rook_revokes_one_right() {
            let mut p = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq -");
            p.move_piece(sq("a1"), sq("a2"));
            assert_eq!(p.castling_rights(), ALL & !WHITE_QUEEN_SIDE);
            p.move_piece(sq("h8"), sq("h7"));
            assert_eq!(p.castling_rights(), WHITE_KING_SIDE | BLACK_QUEEN_SIDE);
        }

        #[test]
        fn capturing_rook_at_home_revokes_right() {
            let mut p = pos("r3k2r/8/8/8/8/8/8/R3K2R b KQkq -");
            p.move_piece(sq("h8"), sq("h1"));
            assert_eq!(p.castling_rights(), WHITE_QUEEN_SIDE | BLACK_QUEEN_SIDE);
            p.clear_square(sq("a8"));
            assert_eq!(p.castling_rights(), WHITE_QUEEN_SIDE);
            p.put_piece(sq("a1"), Black, Piece::Queen);
            assert_eq!(p.castling_rights(), 0);
        }

        #[test]
        fn pieces_move() {
            let mut p = pos("k7/8/8/8/8/8/8/K7 w - -");
            p.move_piece(sq("a1"), sq("b2"));
            p.put_piece(sq("c3"), White, Piece::Knight);
            assert_eq!(p, pos("k7/8/8/8/8/2N5/1K6/8 w - -"));
            p.clear_square(sq("c3"));
            assert_eq!(p, pos("k7/8/8/8/8/8/1K6/8 w - -"));
        }

        #[test]
        fn leaving_double_step_square_revokes_en_passant() {
            let mut p = pos("K6k/8/8/8/PpPpP3/8/8/8 b - a3,c3,e3");
            p.move_piece(sq("c4"), sq("c5"));
            assert_eq!(p.en_passant_files(), 0b10001);
            p.clear_square(sq("a4"));
            assert_eq!(p.en_passant_files(), 0b10000);
        }

        #[test]
        fn king_location_finds_both_kings() {
            let p = pos("8/8/8/8/8/8/3PPP2/R3K2k w Q -");
            assert_eq!(p.king_location(White), sq("e1"));
            assert_eq!(p.king_location(Black), sq("h1"));
        }

        #[test]
        #[should_panic]
        fn king_location_panics_without_king() {
            pos("8/8/8/8/8/8/8/K7 w - -").king_location(Black);
        }
    }

    mod flips {
        use super::*;

        #[test]
        fn flip_swaps_colors() {
            assert_eq!(pos("r3k3/8/8/8/Pp6/8/8/4K2R b Kq a3").flip(),
                pos("4k2r/8/8/pP6/8/8/8/R3K3 w Qk a6"));
        }

        #[test]
        fn flip_twice_is_identity() {
            let p = pos("rnbqkbnr/pppp1ppp/8/8/4pP2/8/PPPPP1PP/RNBQKBNR b KQk f3");
            assert_eq!(p.flip().flip(), p);
        }

        #[test]
        fn flip_horizontally_mirrors_files() {
            assert_eq!(pos("7k/8/8/8/Pp6/8/8/7K b - a3").flip_horizontally(),
                pos("k7/8/8/8/6pP/8/8/K7 b - h3"));
            assert_eq!(pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq -").flip_horizontally(),
                pos("r2k3r/8/8/8/8/8/8/R2K3R w - -"));
        }
    }

    #[test]
    fn diagram_shows_rank_8_first() {
        let diagram = pos("k7/8/8/8/8/8/8/K6R w - -").diagram();
        let lines: Vec<_> = diagram.lines().collect();
        assert_eq!(lines[0], "8 k . . . . . . .");
        assert_eq!(lines[7], "1 K . . . . . . R");
        assert_eq!(lines[8], "  a b c d e f g h");
    }
}
