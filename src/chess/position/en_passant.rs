//! Decides which en-passant rights a pawn's double step can grant, and which of them survive to
//! the end of the turn
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use super::*;
use crate::chess::dice::DICE_COUNT;

impl Position {
    /// Returns a mask of the files on which a double step by `!holder` could possibly be
    /// captured en passant by `holder` within one turn.
    ///
    /// This is only a bound based on how far each of `holder`'s pawns is from the rank where en
    /// passant captures are made. Double steps outside the mask never grant the right.
    pub(crate) fn en_passant_reach(&self, holder: Color) -> u8 {
        let capture_rank = (!holder).double_step_rank() as i8;
        let mut mask = 0u8;

        for sq in Square::all() {
            if self.piece_at(sq) != Some((holder, Piece::Pawn)) {
                continue;
            }
            let mut distance = (capture_rank - sq.rank() as i8) * holder.forward();
            if distance < 0 {
                continue;
            }
            if sq.rank() == holder.pawn_rank() {
                distance -= 1;
            }
            if distance as usize >= DICE_COUNT {
                continue;
            }
            let low = (sq.file() as i8 - distance - 1).max(0);
            let high = (sq.file() as i8 + distance + 1).min(7);
            for file in low..=high {
                mask |= 1 << file;
            }
        }
        mask
    }

    /// Prunes the en-passant rights of a finished turn, keeping a right only where capturing
    /// en passant could do something that capturing the pawn normally could not.
    ///
    /// The side to move holds the rights. All rights are dropped when one of its pawns can
    /// capture the opposing king outright. A right is kept when a pawn of the side to move
    /// already stands beside the double-stepped pawn, or when a pawn can get there by capturing
    /// within the dice left over after accounting for the fastest pawn attack on the king.
    pub(crate) fn resolve_en_passant(&mut self) {
        if self.en_passant == 0 {
            return;
        }

        let holder = self.turn;
        let threat = self.pawn_attack_distance(holder);
        if threat <= 1 {
            self.en_passant = 0;
            return;
        }
        // moves a pawn may spend reaching a capture square, keeping the en-passant capture
        // itself ahead of the plain attack on the king
        let budget = (threat - 2).min(DICE_COUNT - 1);

        for file in 0..8 {
            if self.en_passant & (1 << file) == 0 {
                continue;
            }
            let landing = Square::new(file, (!holder).double_step_rank());
            let hopped = landing.offset(0, holder.forward()).expect("INFALLIBLE");
            let beside = [landing.offset(-1, 0), landing.offset(1, 0)];

            let keep = match self.piece_at(hopped) {
                // a blocker on the hopped square is assumed to clear in time for any adjacent
                // pawn, even when capturing the double-stepped pawn directly would do as well
                Some((color, piece)) if color != holder && piece != Piece::King => {
                    beside.iter()
                        .flatten()
                        .any(|&sq| self.piece_at(sq) == Some((holder, Piece::Pawn)))
                }
                _ => {
                    beside.iter()
                        .flatten()
                        .any(|&sq| self.pawn_reaches(holder, sq, budget, true))
                }
            };
            if !keep {
                self.en_passant &= !(1 << file);
            }
        }
    }

    // Returns true if a pawn of `holder` is on `target` or can get there within `budget` moves.
    // With `capture_only`, the last move must be a capture.
    fn pawn_reaches(&self, holder: Color, target: Square, budget: usize, capture_only: bool)
        -> bool
    {
        if self.piece_at(target) == Some((holder, Piece::Pawn)) {
            return true;
        }
        if budget == 0 {
            return false;
        }
        let back = -holder.forward();

        match self.piece_at(target) {
            Some((color, piece)) if color != holder && piece != Piece::King => {
                [target.offset(-1, back), target.offset(1, back)]
                    .iter()
                    .flatten()
                    .any(|&from| self.pawn_reaches(holder, from, budget - 1, false))
            }
            None if !capture_only => {
                let from = match target.offset(0, back) {
                    Some(from) => from,
                    None => return false,
                };
                if self.pawn_reaches(holder, from, budget - 1, false) {
                    return true;
                }
                // double step
                self.piece_at(from).is_none()
                    && from.rank() as i8 + back == holder.pawn_rank() as i8
                    && from.offset(0, back)
                        .map_or(false, |start| self.piece_at(start) == Some((holder, Piece::Pawn)))
            }
            _ => false,
        }
    }

    // Returns the number of moves a pawn of `attacker` needs to capture the opposing king,
    // advancing straight ahead and then capturing. Returns `DICE_COUNT + 1` if no pawn can do
    // it within one turn.
    fn pawn_attack_distance(&self, attacker: Color) -> usize {
        let king = self.king_location(!attacker);
        let forward = attacker.forward();
        let mut best = DICE_COUNT + 1;

        for sq in Square::all() {
            if self.piece_at(sq) != Some((attacker, Piece::Pawn)) {
                continue;
            }
            if (sq.file() as i8 - king.file() as i8).abs() != 1 {
                continue;
            }
            let ranks = (king.rank() as i8 - sq.rank() as i8) * forward;
            if ranks < 1 {
                continue;
            }
            // squares to advance through before the capture
            let path = ranks - 1;
            let clear = (1..=path).all(|step| {
                sq.offset(0, step * forward).map_or(false, |s| self.piece_at(s).is_none())
            });
            if !clear {
                continue;
            }
            let advances = if sq.rank() == attacker.pawn_rank() && path >= 2 {
                path - 1
            } else {
                path
            };
            best = best.min(advances as usize + 1);
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        fen.parse().unwrap()
    }

    fn resolved(fen: &str) -> u8 {
        let mut p = pos(fen);
        p.resolve_en_passant();
        p.en_passant_files()
    }

    mod en_passant_reach {
        use super::*;

        #[test]
        fn pawn_on_capture_rank_reaches_neighbors() {
            assert_eq!(pos("7k/8/8/8/1p6/8/8/7K w - -").en_passant_reach(Black), 0b111);
            assert_eq!(pos("7k/8/8/4P3/8/8/8/7K b - -").en_passant_reach(White), 0b111000);
        }

        #[test]
        fn distance_widens_reach() {
            assert_eq!(pos("7k/8/8/3p4/8/8/8/7K w - -").en_passant_reach(Black), 0b111110);
            assert_eq!(pos("7k/8/3p4/8/8/8/8/7K w - -").en_passant_reach(Black), 0b1111111);
        }

        #[test]
        fn start_rank_counts_double_step() {
            assert_eq!(pos("7k/3p4/8/8/8/8/8/7K w - -").en_passant_reach(Black), 0b1111111);
            assert_eq!(pos("7k/8/8/8/8/8/3P4/7K b - -").en_passant_reach(White), 0b1111111);
        }

        #[test]
        fn far_or_passed_pawns_reach_nothing() {
            assert_eq!(pos("7k/8/8/8/8/8/8/7K w - -").en_passant_reach(Black), 0);
            assert_eq!(pos("7k/8/8/8/8/1p6/8/7K w - -").en_passant_reach(Black), 0);
            assert_eq!(pos("7k/8/8/8/8/8/8/7K w - -").en_passant_reach(White), 0);
            assert_eq!(pos("7k/8/8/8/8/8/P7/7K b - -").en_passant_reach(White), 0b1111);
        }
    }

    mod resolve_en_passant {
        use super::*;

        #[test]
        fn adjacent_pawn_keeps_right() {
            assert_eq!(resolved("7k/8/8/8/Pp6/2N5/3K4/8 b - a3"), 0b1);
        }

        #[test]
        fn no_pawn_nearby_clears_right() {
            assert_eq!(resolved("k7/8/8/2p5/1P6/3N4/4K3/8 b - b3"), 0);
            assert_eq!(resolved("4k3/4p3/8/8/4P3/8/8/4K3 b - e3"), 0);
        }

        #[test]
        fn blocked_hop_square_needs_adjacent_pawn() {
            assert_eq!(resolved("7k/8/8/8/Pp6/N7/3K4/8 b - a3"), 0b1);
            assert_eq!(resolved("7k/8/8/p7/PB6/N7/3K4/8 b - a3"), 0);
            assert_eq!(resolved("k7/8/8/1p6/1PB5/1N6/4K3/8 b - b3"), 0);
        }

        #[test]
        fn pawn_can_capture_onto_capture_square() {
            assert_eq!(resolved("7k/8/8/p7/PB6/2N5/3K4/8 b - a3"), 0b1);
            assert_eq!(resolved("k7/8/8/1p6/1PB5/3N4/4K3/8 b - b3"), 0b10);
        }

        #[test]
        fn launch_square_reached_by_capture() {
            assert_eq!(resolved("7k/8/1p6/2N5/3NP3/8/8/4K3 b - e3"), 0b10000);
            assert_eq!(resolved("7k/8/3p4/2N5/4P3/8/8/4K3 b - e3"), 0);
        }

        #[test]
        fn launch_square_reached_by_push() {
            assert_eq!(resolved("3k4/8/3p4/8/2NP4/8/8/3K4 b - d3"), 0b1000);
            assert_eq!(resolved("3k4/3p4/8/8/2NP4/8/8/3K4 b - d3"), 0b1000);
            assert_eq!(resolved("8/3p4/3k4/8/2NP4/8/8/3K4 b - d3"), 0);
        }

        #[test]
        fn pawn_attacking_king_clears_everything() {
            assert_eq!(resolved("7k/8/8/8/Pp6/2K5/8/8 b - a3"), 0);
        }

        #[test]
        fn pawn_attack_in_two_moves_allows_only_adjacent_pawns() {
            // f4 needs two moves to take the king on e2
            assert_eq!(resolved("4k3/8/8/8/4Pp2/8/4K3/8 b - e3"), 0b10000);
            // g4 needs two moves to take the king on h2, leaving no time for c5xd4
            assert_eq!(resolved("4k3/8/8/2p5/3NP1p1/8/7K/8 b - e3"), 0);
        }

        #[test]
        fn pawn_attack_in_three_moves_allows_one_capture() {
            // f4 takes the king on e1 after two advances
            assert_eq!(resolved("4k3/8/4P3/8/4Pp2/8/8/4K3 b - e3"), 0b10000);
            // b4 needs three moves to take the king on a1
            assert_eq!(resolved("4k3/8/8/2p5/1p1NP3/8/8/K7 b - e3"), 0b10000);
            assert_eq!(resolved("4k3/8/1p6/2N5/1p1NP3/8/8/K7 b - e3"), 0);
        }

        #[test]
        fn without_rights_nothing_changes() {
            let p = pos("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq -");
            let mut q = p;
            q.resolve_en_passant();
            assert_eq!(p, q);
        }
    }

    #[test]
    fn pawn_attack_distance_counts_advances() {
        assert_eq!(pos("7k/8/8/8/1p6/2K5/8/8 w - -").pawn_attack_distance(Black), 1);
        assert_eq!(pos("4k3/8/8/8/5p2/8/4K3/8 w - -").pawn_attack_distance(Black), 2);
        assert_eq!(pos("4k3/8/8/8/5p2/8/8/4K3 w - -").pawn_attack_distance(Black), 3);
        assert_eq!(pos("4k3/8/8/8/5p2/5N2/8/4K3 w - -").pawn_attack_distance(Black), 4);
        assert_eq!(pos("4k3/5p2/8/8/8/8/8/4K3 w - -").pawn_attack_distance(Black), 4);
        assert_eq!(pos("3k4/8/8/8/8/8/4P3/8 b - -").pawn_attack_distance(White), 4);
        assert_eq!(pos("8/3k4/8/8/8/8/4P3/K7 b - -").pawn_attack_distance(White), 4);
        assert_eq!(pos("8/8/3k4/8/8/8/4P3/K7 b - -").pawn_attack_distance(White), 3);
    }
}
