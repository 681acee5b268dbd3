//! Defines the error types needed by the chess module
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error type used by methods in the `chess` module
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// Cannot parse string
    ParseError,
    /// Failed to convert an integer to an another type
    TryFromIntError,
    /// A FEN string is missing one of its required fields
    MissingFenField,
    /// The board in a FEN string does not have exactly eight ranks
    InvalidRankCount,
    /// A rank in a FEN string does not have exactly eight files
    InvalidFileCount,
    /// Unknown piece letter
    InvalidPiece,
    /// Active color is neither `w` nor `b`
    InvalidTurn,
    /// Castling flags are not a combination of `KQkq` or `-`
    InvalidCastlingFlags,
    /// En-passant square on the wrong rank
    InvalidEnPassantSquare,
    /// Dice letter is not one of `PNBRQK`
    InvalidDiceRoll,
    /// More dice than can be drawn in a single turn
    TooManyDice,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Error::*;

        match self {
            ParseError => "cannot parse string",
            TryFromIntError => "integer out of range",
            MissingFenField => "missing field in FEN string",
            InvalidRankCount => "board must have exactly 8 ranks",
            InvalidFileCount => "rank must have exactly 8 files",
            InvalidPiece => "unknown piece letter",
            InvalidTurn => "active color must be `w` or `b`",
            InvalidCastlingFlags => "invalid castling flags",
            InvalidEnPassantSquare => "en-passant square on the wrong rank",
            InvalidDiceRoll => "dice letters must be one of PNBRQK",
            TooManyDice => "at most 3 dice may be drawn",
        }.fmt(f)
    }
}

impl std::error::Error for Error { }

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Result type used by methods in the `chess` module
pub type Result<T> = std::result::Result<T, Error>;
