//! Dice rolls, represented as multisets of piece types, and their dense combinatorial index
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::str::FromStr;
use std::convert::TryFrom;
use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;
use super::*;

/// The number of dice drawn each turn
pub const DICE_COUNT: usize = 3;

/// The number of equally likely ordered outcomes of one turn's dice (`6^3`)
pub const OMEGA: u32 = 216;

// binomial coefficients are needed for n up to `Piece::COUNT + DICE_COUNT - 1`
const BINOMIAL_SIZE: usize = Piece::COUNT + DICE_COUNT;

lazy_static! {
    static ref BINOMIAL: [[usize; BINOMIAL_SIZE]; BINOMIAL_SIZE] = {
        let mut table = [[0; BINOMIAL_SIZE]; BINOMIAL_SIZE];
        for n in 0..BINOMIAL_SIZE {
            table[n][0] = 1;
            for k in 1..=n {
                table[n][k] = table[n - 1][k - 1] + table[n - 1][k];
            }
        }
        table
    };

    // OFFSETS[t] is the index of the first roll with `t` dice
    static ref OFFSETS: [usize; DICE_COUNT + 2] = {
        let mut offsets = [0; DICE_COUNT + 2];
        for t in 0..=DICE_COUNT {
            offsets[t + 1] = offsets[t] + multisets_with_total(t);
        }
        offsets
    };

    static ref DICE_REGEX: Regex = Regex::new(r"^(?:-|[PNBRQK]*)$").expect("INFALLIBLE");

    /// Every roll of all three dice, in index order
    pub static ref FULL_ROLLS: Vec<DiceRoll> = DiceRoll::with_total(DICE_COUNT, DICE_COUNT);

    /// Every roll of zero to three dice, in index order
    pub static ref FULL_AND_PARTIAL_ROLLS: Vec<DiceRoll> = DiceRoll::with_total(0, DICE_COUNT);
}

fn binomial(n: usize, k: usize) -> usize {
    if k > n { 0 } else { BINOMIAL[n][k] }
}

// multisets of size `total` drawn from the piece types
fn multisets_with_total(total: usize) -> usize {
    binomial(total + Piece::COUNT - 1, Piece::COUNT - 1)
}

fn factorial(n: usize) -> u32 {
    (1..=n as u32).product()
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The dice drawn so far in a turn: how many dice show each piece type.
///
/// A roll never holds more than `DICE_COUNT` dice. Rolls are ordered first by the number of dice
/// and then by a combinatorial number system, which maps every roll to a dense index in
/// `0..DiceRoll::COUNT`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct DiceRoll {
    counts: [u8; Piece::COUNT],
}

impl DiceRoll {
    /// The number of distinct rolls of zero to three dice
    pub const COUNT: usize = 84;

    /// Returns the roll with no dice
    pub fn new() -> DiceRoll {
        DiceRoll::default()
    }

    /// Returns how many dice show the given piece type
    pub fn count(self, piece: Piece) -> usize {
        self.counts[piece as usize] as usize
    }

    /// Returns the number of dice in the roll
    pub fn total_rolls(self) -> usize {
        self.counts.iter().map(|&n| n as usize).sum()
    }

    /// Returns the roll with one more die showing `piece`.
    ///
    /// Panics if the roll already holds `DICE_COUNT` dice.
    pub fn append(self, piece: Piece) -> DiceRoll {
        assert!(self.total_rolls() < DICE_COUNT, "too many dice in {}", self);
        let mut counts = self.counts;
        counts[piece as usize] += 1;
        DiceRoll { counts }
    }

    /// Returns true if every count in `self` is at most the corresponding count in `other`
    pub fn is_subset_of(self, other: DiceRoll) -> bool {
        self.counts.iter().zip(other.counts.iter()).all(|(a, b)| a <= b)
    }

    // the dice as piece indices in ascending order
    fn sorted_dice(self) -> Vec<usize> {
        let mut dice = Vec::with_capacity(DICE_COUNT);
        for (piece, &n) in self.counts.iter().enumerate() {
            for _ in 0..n {
                dice.push(piece);
            }
        }
        dice
    }

    /// Returns the dense index of this roll.
    ///
    /// With the dice sorted as `a[1] <= ... <= a[t]`, the rank within rolls of `t` dice is
    /// `sum(C(a[i] + i - 1, i))`, offset by the number of rolls with fewer dice.
    pub fn encode(self) -> usize {
        let dice = self.sorted_dice();
        let rank: usize = dice.iter()
            .enumerate()
            .map(|(i, &a)| binomial(a + i, i + 1))
            .sum();
        OFFSETS[dice.len()] + rank
    }

    /// Returns the roll with the given dense index.
    ///
    /// Panics if `index` is not less than `DiceRoll::COUNT`.
    pub fn decode(index: usize) -> DiceRoll {
        assert!(index < DiceRoll::COUNT, "dice index {} out of range", index);
        let total = (0..=DICE_COUNT)
            .rev()
            .find(|&t| OFFSETS[t] <= index)
            .expect("INFALLIBLE");

        let mut roll = DiceRoll::new();
        let mut rank = index - OFFSETS[total];
        for i in (1..=total).rev() {
            // largest b with C(b, i) <= rank
            let mut b = i - 1;
            while binomial(b + 1, i) <= rank {
                b += 1;
            }
            rank -= binomial(b, i);
            roll.counts[b + 1 - i] += 1;
        }
        roll
    }

    /// Returns every roll which can be made from this one by removing at least one die, the
    /// rolls with the most dice first.
    pub fn strict_subsets(self) -> Vec<DiceRoll> {
        let mut subsets = vec![DiceRoll::new()];
        for (piece, &n) in self.counts.iter().enumerate() {
            let mut extended = Vec::with_capacity(subsets.len() * (n as usize + 1));
            for subset in subsets {
                for k in 0..=n {
                    let mut counts = subset.counts;
                    counts[piece] = k;
                    extended.push(DiceRoll { counts });
                }
            }
            subsets = extended;
        }
        subsets.retain(|&subset| subset != self);
        subsets.sort_by(|a, b| b.cmp(a));
        subsets
    }

    /// Returns the number of ordered dice sequences which produce this roll
    pub fn combinations(self) -> u32 {
        let denominator: u32 = self.counts.iter().map(|&n| factorial(n as usize)).product();
        factorial(self.total_rolls()) / denominator
    }

    /// Rolls all three dice
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> DiceRoll {
        let mut roll = DiceRoll::new();
        for _ in 0..DICE_COUNT {
            roll = roll.append(Piece::ALL[rng.gen_range(0, Piece::COUNT)]);
        }
        roll
    }

    /// Iterates over every roll in index order
    pub fn all() -> impl Iterator<Item = DiceRoll> {
        (0..DiceRoll::COUNT).map(DiceRoll::decode)
    }

    /// Returns every roll with between `low` and `high` dice, in index order
    pub fn with_total(low: usize, high: usize) -> Vec<DiceRoll> {
        (OFFSETS[low.min(DICE_COUNT + 1)]..OFFSETS[(high + 1).min(DICE_COUNT + 1)])
            .map(DiceRoll::decode)
            .collect()
    }
}

impl PartialOrd for DiceRoll {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DiceRoll {
    /// Rolls are ordered by their index
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.encode().cmp(&other.encode())
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total_rolls() == 0 {
            return "-".fmt(f);
        }
        let letters: String = self.sorted_dice()
            .into_iter()
            .map(|piece| Piece::ALL[piece].to_char(Color::White))
            .collect();
        letters.fmt(f)
    }
}

impl FromStr for DiceRoll {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if !DICE_REGEX.is_match(s) {
            return Err(Error::InvalidDiceRoll);
        }
        if s.len() > DICE_COUNT {
            return Err(Error::TooManyDice);
        }
        let mut roll = DiceRoll::new();
        for c in s.chars().filter(|&c| c != '-') {
            roll = roll.append(Piece::from_char(c)?.1);
        }
        Ok(roll)
    }
}

impl TryFrom<usize> for DiceRoll {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        if value < DiceRoll::COUNT {
            Ok(DiceRoll::decode(value))
        } else {
            Err(Error::TryFromIntError)
        }
    }
}

impl From<DiceRoll> for usize {
    fn from(value: DiceRoll) -> Self {
        value.encode()
    }
}
