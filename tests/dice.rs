//! Tests dice rolls through the public interface
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::collections::HashSet;
use std::convert::TryFrom;
use dicechess::chess::{DiceRoll, Error, Piece};
use dicechess::chess::dice::{FULL_AND_PARTIAL_ROLLS, FULL_ROLLS, OMEGA};

mod dice {
    use super::*;

    #[test]
    fn indexes_are_dense_and_distinct() {
        let rolls: Vec<_> = DiceRoll::all().collect();
        assert_eq!(rolls.len(), DiceRoll::COUNT);
        let distinct: HashSet<_> = rolls.iter().cloned().collect();
        assert_eq!(distinct.len(), DiceRoll::COUNT);
        for (index, roll) in rolls.into_iter().enumerate() {
            assert_eq!(usize::from(roll), index);
            assert_eq!(DiceRoll::try_from(index).unwrap(), roll);
        }
        assert_eq!(DiceRoll::try_from(DiceRoll::COUNT), Err(Error::TryFromIntError));
    }

    #[test]
    fn letter_order_does_not_matter() {
        let a: DiceRoll = "QPR".parse().unwrap();
        let b: DiceRoll = "RQP".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "PRQ");
        assert_eq!(a.count(Piece::Rook), 1);
        assert_eq!(a.count(Piece::King), 0);
    }

    #[test]
    fn empty_roll() {
        assert_eq!("-".parse::<DiceRoll>().unwrap(), DiceRoll::new());
        assert_eq!("".parse::<DiceRoll>().unwrap(), DiceRoll::new());
        assert_eq!(DiceRoll::new().to_string(), "-");
        assert_eq!(DiceRoll::new().encode(), 0);
    }

    #[test]
    fn bad_rolls_are_rejected() {
        assert_eq!("PPPP".parse::<DiceRoll>(), Err(Error::TooManyDice));
        assert_eq!("pnb".parse::<DiceRoll>(), Err(Error::InvalidDiceRoll));
        assert_eq!("PX".parse::<DiceRoll>(), Err(Error::InvalidDiceRoll));
    }

    #[test]
    fn full_rolls_cover_every_outcome() {
        assert_eq!(FULL_ROLLS.len(), 56);
        assert_eq!(FULL_ROLLS.iter().map(|roll| roll.combinations()).sum::<u32>(), OMEGA);
        // the pass roll comes first
        assert_eq!(FULL_AND_PARTIAL_ROLLS.len(), DiceRoll::COUNT);
        assert_eq!(FULL_AND_PARTIAL_ROLLS[0].to_string(), "-");
        assert_eq!(FULL_AND_PARTIAL_ROLLS.last().unwrap().total_rolls(), 3);
    }

    #[test]
    fn subsets_are_contained() {
        let roll: DiceRoll = "PPK".parse().unwrap();
        let subsets = roll.strict_subsets();
        assert_eq!(subsets.len(), 5);
        for subset in subsets {
            assert!(subset.is_subset_of(roll));
            assert_ne!(subset, roll);
        }
    }
}
