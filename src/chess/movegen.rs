//! Generates every position reachable in one turn, for every roll of the dice
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::mem;
use log::{debug, trace};
use super::*;
use super::dice::{DICE_COUNT, FULL_ROLLS};

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];
const KING_STEPS: [(i8, i8); 8] = [
    (0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1),
];
const BISHOP_LINES: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
const ROOK_LINES: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The positions reachable in one turn, for every roll of zero to three dice.
///
/// A roll whose dice allow the mover to capture the opposing king has no moves: the game is won
/// on the spot. Any other roll has at least one resulting position, since dice which cannot be
/// used are skipped.
#[derive(Debug, Clone)]
pub struct MoveList {
    buckets: Vec<Vec<Position>>,
    captured: Vec<bool>,
}

impl MoveList {
    /// Returns the distinct positions that can result from the given roll, sorted.
    pub fn get_moves(&self, roll: DiceRoll) -> &[Position] {
        &self.buckets[roll.encode()]
    }

    /// Returns true if the roll lets the mover capture the opposing king
    pub fn is_king_captured(&self, roll: DiceRoll) -> bool {
        self.captured[roll.encode()]
    }

    /// Returns how many of the `dice::OMEGA` equally likely ordered rolls of three dice win the
    /// game immediately by capturing the king.
    pub fn count_winning_on_the_spot(&self) -> u32 {
        FULL_ROLLS.iter()
            .filter(|&&roll| self.is_king_captured(roll))
            .map(|roll| roll.combinations())
            .sum()
    }

    /// Iterates over every roll in index order together with its moves
    pub fn iter(&self) -> impl Iterator<Item = (DiceRoll, &[Position])> + '_ {
        DiceRoll::all().zip(self.buckets.iter().map(Vec::as_slice))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Generates the positions reachable from `pos` with each roll of the dice, with the side to
/// move in `pos` moving.
///
/// Resulting positions have the other side to move. En-passant rights in `pos` belong to the
/// side to move and remain usable for the whole turn.
pub fn generate_moves(pos: &Position) -> MoveList {
    let mover = pos.turn();
    let mut generator = Generator {
        mover,
        en_passant_captures: pos.en_passant_files(),
        double_step_files: pos.en_passant_reach(!mover),
        buckets: vec![Vec::new(); DiceRoll::COUNT],
        captured: vec![false; DiceRoll::COUNT],
    };

    let mut start = *pos;
    start.set_turn(!mover);
    start.set_en_passant_files(0);
    generator.buckets[0].push(start);

    generator.expand_all();
    generator.resolve_en_passant();
    let moves = generator.fill_from_subsets();

    debug!("{}: {} positions over {} dice rolls, king capture with {} of {} rolls",
        pos,
        moves.buckets.iter().map(Vec::len).sum::<usize>(),
        DiceRoll::COUNT,
        moves.count_winning_on_the_spot(),
        dice::OMEGA);
    moves
}

struct Generator {
    mover: Color,
    // files of the opponent's pawns the mover may capture en passant
    en_passant_captures: u8,
    // files on which the mover's double steps grant the opponent en-passant rights
    double_step_files: u8,
    buckets: Vec<Vec<Position>>,
    captured: Vec<bool>,
}

impl Generator {
    // Expands every roll with fewer than three dice, fewest dice first, so that each bucket is
    // complete before any of its positions are moved from.
    fn expand_all(&mut self) {
        for index in 0..DiceRoll::COUNT {
            let roll = DiceRoll::decode(index);
            if roll.total_rolls() == DICE_COUNT {
                break;
            }
            if self.captured[index] {
                continue;
            }

            let mut positions = mem::take(&mut self.buckets[index]);
            positions.sort_unstable();
            positions.dedup();
            for pos in &positions {
                self.expand(roll, pos);
                if roll.total_rolls() + 2 <= DICE_COUNT {
                    self.castle(roll, pos);
                }
            }
            self.buckets[index] = positions;
        }
    }

    fn expand(&mut self, roll: DiceRoll, pos: &Position) {
        for from in Square::all() {
            let piece = match pos.piece_at(from) {
                Some((color, piece)) if color == self.mover => piece,
                _ => continue,
            };
            let target = roll.append(piece).encode();
            if self.captured[target] {
                continue;
            }
            match piece {
                Piece::Pawn => self.pawn_moves(target, pos, from),
                Piece::Knight => self.step_moves(target, pos, from, &KNIGHT_STEPS),
                Piece::Bishop => self.line_moves(target, pos, from, &BISHOP_LINES),
                Piece::Rook => self.line_moves(target, pos, from, &ROOK_LINES),
                Piece::Queen => self.line_moves(target, pos, from, &KING_STEPS),
                Piece::King => self.step_moves(target, pos, from, &KING_STEPS),
            }
        }
    }

    fn push(&mut self, target: usize, pos: Position) {
        if !self.captured[target] {
            self.buckets[target].push(pos);
        }
    }

    // Moves the piece on `from` to `to` unless `to` holds a piece of the mover. Returns true if
    // `to` was empty.
    fn move_to(&mut self, target: usize, pos: &Position, from: Square, to: Square) -> bool {
        match pos.piece_at(to) {
            Some((color, _)) if color == self.mover => false,
            Some((_, Piece::King)) => {
                self.capture_king(target);
                false
            }
            occupant => {
                let mut next = *pos;
                next.move_piece(from, to);
                self.push(target, next);
                occupant.is_none()
            }
        }
    }

    fn step_moves(&mut self, target: usize, pos: &Position, from: Square, steps: &[(i8, i8)]) {
        for &(files, ranks) in steps {
            if let Some(to) = from.offset(files, ranks) {
                self.move_to(target, pos, from, to);
            }
        }
    }

    fn line_moves(&mut self, target: usize, pos: &Position, from: Square, lines: &[(i8, i8)]) {
        for &(files, ranks) in lines {
            let mut to = from;
            while let Some(next) = to.offset(files, ranks) {
                to = next;
                if !self.move_to(target, pos, from, to) {
                    break;
                }
            }
        }
    }

    fn pawn_moves(&mut self, target: usize, pos: &Position, from: Square) {
        let forward = self.mover.forward();

        if let Some(to) = from.offset(0, forward) {
            if pos.piece_at(to).is_none() {
                self.advance(target, pos, from, to);

                if from.rank() == self.mover.pawn_rank() {
                    let to = to.offset(0, forward).expect("INFALLIBLE");
                    if pos.piece_at(to).is_none() {
                        let mut next = *pos;
                        next.move_piece(from, to);
                        if self.double_step_files & (1 << from.file()) != 0 {
                            next.add_en_passant_file(from.file());
                        }
                        self.push(target, next);
                    }
                }
            }
        }

        for &files in &[-1, 1] {
            let to = match from.offset(files, forward) {
                Some(to) => to,
                None => continue,
            };
            match pos.piece_at(to) {
                Some((color, _)) if color == self.mover => {}
                Some((_, Piece::King)) => self.capture_king(target),
                Some(_) => self.advance(target, pos, from, to),
                None => self.en_passant(target, pos, from, to),
            }
        }
    }

    // moves a pawn, promoting it on the last rank
    fn advance(&mut self, target: usize, pos: &Position, from: Square, to: Square) {
        let mut next = *pos;
        next.move_piece(from, to);
        if to.rank() == self.mover.promotion_rank() {
            for &piece in &Piece::PROMOTIONS {
                let mut promoted = next;
                promoted.put_piece(to, self.mover, piece);
                self.push(target, promoted);
            }
        } else {
            self.push(target, next);
        }
    }

    fn en_passant(&mut self, target: usize, pos: &Position, from: Square, to: Square) {
        let victim = Square::new(to.file(), from.rank());
        if self.en_passant_captures & (1 << to.file()) != 0
            && from.rank() == (!self.mover).double_step_rank()
            && pos.piece_at(victim) == Some((!self.mover, Piece::Pawn))
        {
            let mut next = *pos;
            next.move_piece(from, to);
            next.clear_square(victim);
            self.push(target, next);
        }
    }

    // Castling uses a king die and a rook die together. Only the squares between the king and
    // the rook need to be empty; there is no check in dice chess.
    fn castle(&mut self, roll: DiceRoll, pos: &Position) {
        let target = roll.append(Piece::King).append(Piece::Rook).encode();
        if self.captured[target] {
            return;
        }
        let home = self.mover.home_rank();
        let (king_side, queen_side) = Position::castling_flags(self.mover);
        let king = Square::new(4, home);
        if pos.piece_at(king) != Some((self.mover, Piece::King)) {
            return;
        }

        // (right, rook file, files which must be empty, king destination, rook destination)
        let sides = [
            (king_side, 7, 5..7, 6, 5),
            (queen_side, 0, 1..4, 2, 3),
        ];
        for (right, rook_file, between, king_to, rook_to) in sides.iter().cloned() {
            let rook = Square::new(rook_file, home);
            if pos.castling_rights() & right == 0
                || pos.piece_at(rook) != Some((self.mover, Piece::Rook))
                || between.clone().any(|file| pos.piece_at(Square::new(file, home)).is_some())
            {
                continue;
            }
            let mut next = *pos;
            next.move_piece(king, Square::new(king_to, home));
            next.move_piece(rook, Square::new(rook_to, home));
            self.push(target, next);
        }
    }

    // Marks the roll as winning, along with every roll containing it, and discards their moves.
    fn capture_king(&mut self, target: usize) {
        if self.captured[target] {
            return;
        }
        trace!("king capture with {}", DiceRoll::decode(target));

        self.captured[target] = true;
        let mut pending = vec![target];
        while let Some(index) = pending.pop() {
            self.buckets[index].clear();
            let roll = DiceRoll::decode(index);
            if roll.total_rolls() < DICE_COUNT {
                for &piece in &Piece::ALL {
                    let next = roll.append(piece).encode();
                    if !self.captured[next] {
                        self.captured[next] = true;
                        pending.push(next);
                    }
                }
            }
        }
    }

    // Prunes en-passant rights in every bucket, then removes the duplicates this creates.
    fn resolve_en_passant(&mut self) {
        for bucket in &mut self.buckets {
            for pos in bucket.iter_mut() {
                pos.resolve_en_passant();
            }
            bucket.sort_unstable();
            bucket.dedup();
        }
    }

    // Gives each roll without moves the moves of its largest sub-rolls which have any, unless
    // the roll captures the king.
    fn fill_from_subsets(self) -> MoveList {
        let mut buckets = self.buckets.clone();

        for (index, bucket) in buckets.iter_mut().enumerate() {
            if !bucket.is_empty() || self.captured[index] {
                continue;
            }
            let subsets = DiceRoll::decode(index).strict_subsets();
            let total = subsets.iter()
                .find(|subset| !self.buckets[subset.encode()].is_empty())
                .map(|subset| subset.total_rolls());
            if let Some(total) = total {
                for subset in subsets.iter().filter(|subset| subset.total_rolls() == total) {
                    bucket.extend_from_slice(&self.buckets[subset.encode()]);
                }
                bucket.sort_unstable();
                bucket.dedup();
            }
        }

        MoveList {
            buckets,
            captured: self.captured,
        }
    }
}
