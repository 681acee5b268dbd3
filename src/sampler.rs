//! Estimates win probabilities by playing random games
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use log::{debug, info};
use rand::Rng;
use rand::seq::SliceRandom;
use crate::chess::{generate_moves, Color, DiceRoll, Position};
use crate::chess::dice::OMEGA;
use crate::config::SimulationConfig;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The outcome of one random game, as probabilities.
///
/// At every turn the side to move wins on the spot with the probability that its dice allow a
/// king capture. Rather than rolling for that, the probability is credited to that side and the
/// game continues along the rolls which do not win, so the three fields always sum to one.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GameResult {
    /// Probability that white won
    pub white_won: f64,
    /// Probability that black won
    pub black_won: f64,
    /// Probability that the game was still undecided when it stopped
    pub still_playing: f64,
}

/// Plays one random game from `start`.
///
/// Each turn, a roll is drawn among those with moves and one of the resulting positions is
/// chosen uniformly.
pub fn play_game<R>(start: &Position, config: &SimulationConfig, rng: &mut R) -> GameResult
    where R: Rng + ?Sized
{
    let mut result = GameResult { white_won: 0.0, black_won: 0.0, still_playing: 1.0 };
    let mut pos = *start;

    for turn in 0..config.max_turns {
        if result.still_playing <= config.min_still_playing {
            break;
        }

        let moves = generate_moves(&pos);
        let wins = moves.count_winning_on_the_spot();
        let p_win = f64::from(wins) / f64::from(OMEGA);
        match pos.turn() {
            Color::White => result.white_won += p_win * result.still_playing,
            Color::Black => result.black_won += p_win * result.still_playing,
        }
        result.still_playing *= 1.0 - p_win;
        if wins == OMEGA {
            debug!("turn {}: every roll wins for {} in {}", turn, pos.turn(), pos);
            break;
        }

        pos = loop {
            let roll = DiceRoll::roll(rng);
            if let Some(next) = moves.get_moves(roll).choose(rng) {
                break *next;
            }
        };
    }

    result
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Mean, standard deviation and standard error of a set of samples
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Summary {
    /// Sample mean
    pub mean: f64,
    /// Sample standard deviation
    pub std_dev: f64,
    /// Standard error of the mean
    pub error: f64,
}

impl Summary {
    /// Summarizes the samples, or returns `None` if there are none.
    pub fn from_samples(data: &[f64]) -> Option<Summary> {
        if data.is_empty() {
            return None;
        }
        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let std_dev = if data.len() > 1 {
            (data.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1.0)).sqrt()
        } else {
            0.0
        };
        Some(Summary { mean, std_dev, error: std_dev / n.sqrt() })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mean = {:.6}, std_dev = {:.6} (error ≈ {:.6})",
            self.mean, self.std_dev, self.error)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Results collected over many random games
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    white_won: Vec<f64>,
    black_won: Vec<f64>,
    still_playing: Vec<f64>,
}

impl Simulation {
    /// Returns an empty simulation
    pub fn new() -> Simulation {
        Simulation::default()
    }

    /// Adds the outcome of a game
    pub fn record(&mut self, result: &GameResult) {
        self.white_won.push(result.white_won);
        self.black_won.push(result.black_won);
        self.still_playing.push(result.still_playing);
    }

    /// Returns the number of games recorded
    pub fn games(&self) -> usize {
        self.white_won.len()
    }

    /// Summarizes the probability that white won
    pub fn white_won(&self) -> Option<Summary> {
        Summary::from_samples(&self.white_won)
    }

    /// Summarizes the probability that black won
    pub fn black_won(&self) -> Option<Summary> {
        Summary::from_samples(&self.black_won)
    }

    /// Summarizes the probability that the game was still undecided
    pub fn still_playing(&self) -> Option<Summary> {
        Summary::from_samples(&self.still_playing)
    }

    /// Plays `config.games` random games from `start`. `report` is called after the first game
    /// and then whenever the number of games grows by the factor `config.report_growth`, and
    /// always after the last game.
    pub fn run<R, F>(start: &Position, config: &SimulationConfig, rng: &mut R, mut report: F)
        -> Simulation
        where R: Rng + ?Sized, F: FnMut(&Simulation)
    {
        let mut sim = Simulation::new();
        let mut next_report = 1;

        for _ in 0..config.games {
            let result = play_game(start, config, rng);
            sim.record(&result);

            if sim.games() >= next_report || sim.games() == config.games {
                info!("{} games: white {:?}, black {:?}, still playing {:?}",
                    sim.games(), sim.white_won(), sim.black_won(), sim.still_playing());
                report(&sim);
                next_report = (sim.games() + 1)
                    .max((next_report as f64 * config.report_growth) as usize);
            }
        }
        sim
    }
}

impl fmt::Display for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "count = {}", self.games())?;
        let rows = [
            ("white won", self.white_won()),
            ("black won", self.black_won()),
            ("still playing", self.still_playing()),
        ];
        for (label, summary) in rows.iter() {
            match summary {
                Some(summary) => writeln!(f, "{}: {}", label, summary)?,
                None => writeln!(f, "{}: no games", label)?,
            }
        }
        Ok(())
    }
}
