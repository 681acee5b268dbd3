//! Command-line front end for the dice chess move generator.
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
#![warn(missing_docs, missing_debug_implementations, unused_extern_crates)]
#![warn(clippy::unimplemented, clippy::todo)]
#![warn(clippy::option_unwrap_used, clippy::result_unwrap_used)]

use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use clap::{App, Arg, ArgMatches, SubCommand, crate_version};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use simplelog::{WriteLogger, LevelFilter, Config};
use dicechess::chess::{generate_moves, DiceRoll, Position};
use dicechess::chess::dice::FULL_AND_PARTIAL_ROLLS;
use dicechess::config::SimulationConfig;
use dicechess::sampler::Simulation;

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn main() -> Result<(), Error> {
    let fen_arg = Arg::with_name("fen")
        .value_name("FEN_STRING")
        .default_value(START_FEN)
        .hide_default_value(true)
        .multiple(true)
        .help("Position in Forsyth-Edwards Notation (FEN); en-passant squares may be a \
               comma-separated list. Defaults to the standard starting position.");

    let matches =
        App::new("dicechess")
            .version(crate_version!())
            .author("Mike Leany")
            .about("Move generation and win-probability sampling for dice chess")
            .arg(Arg::with_name("log")
                .long("log")
                .short("l")
                .global(true)
                .help("Turns on logging"))
            .arg(Arg::with_name("log-file")
                .long("log-file")
                .global(true)
                .value_name("LOG_FILE")
                .takes_value(true)
                .default_value("dicechess.log")
                .help("Sets the log file if logging is turned on"))
            .arg(Arg::with_name("log-level")
                .long("log-level")
                .global(true)
                .value_name("LEVEL")
                .takes_value(true)
                .default_value("info")
                .help("Sets the log level if logging is turned on"))
            .subcommand(SubCommand::with_name("moves")
                .about("Lists the positions reachable with each roll of the dice")
                .arg(Arg::with_name("dice")
                    .long("dice")
                    .short("d")
                    .value_name("DICE")
                    .takes_value(true)
                    .help("Only list the moves for this roll, such as PRQ"))
                .arg(fen_arg.clone()))
            .subcommand(SubCommand::with_name("simulate")
                .about("Estimates win probabilities by playing random games")
                .arg(Arg::with_name("games")
                    .long("games")
                    .short("g")
                    .value_name("GAMES")
                    .takes_value(true)
                    .help("Number of games to play"))
                .arg(Arg::with_name("seed")
                    .long("seed")
                    .short("s")
                    .value_name("SEED")
                    .takes_value(true)
                    .help("Seed for the random number generator"))
                .arg(Arg::with_name("max-turns")
                    .long("max-turns")
                    .value_name("TURNS")
                    .takes_value(true)
                    .help("Maximum number of turns per game"))
                .arg(Arg::with_name("config")
                    .long("config")
                    .short("c")
                    .value_name("CONFIG_FILE")
                    .takes_value(true)
                    .help("Reads settings from this YAML file instead of ~/.dicechess/simulate.yaml"))
                .arg(Arg::with_name("save-config")
                    .long("save-config")
                    .help("Writes the settings back to the configuration file"))
                .arg(fen_arg))
            .get_matches();

    let log_file = PathBuf::from(matches.value_of_os("log-file").expect("INFALLIBLE"));
    let log_level = match matches.value_of("log-level") {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("info") => LevelFilter::Info,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        Some(level) => return Err(Error(format!("{}: invalid log level", level))),
        None => unreachable!(),
    };

    let _logger = if matches.is_present("log") {
        WriteLogger::init(
            log_level,
            Config::default(),
            File::create(&log_file).map_err(|err| {
                Error(format!("{}: {}", log_file.display(), err))
            })?)
    } else {
        WriteLogger::init(LevelFilter::Off, Config::default(), std::io::sink())
    };

    match matches.subcommand() {
        ("moves", Some(matches)) => list_moves(matches),
        ("simulate", Some(matches)) => simulate(matches),
        _ => {
            eprintln!("{}", matches.usage());
            Ok(())
        }
    }
}

fn parse_position(matches: &ArgMatches) -> Result<Position, Error> {
    let fen = matches.values_of("fen").expect("INFALLIBLE").collect::<Vec<_>>().join(" ");
    fen.parse().map_err(|err| Error(format!("{}: {}", fen, err)))
}

fn parse_number<T: std::str::FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>, Error> {
    match matches.value_of(name) {
        Some(s) => s.parse()
            .map(Some)
            .map_err(|_| Error(format!("{} must be numeric", name))),
        None => Ok(None),
    }
}

fn list_moves(matches: &ArgMatches) -> Result<(), Error> {
    let pos = parse_position(matches)?;
    let only: Option<DiceRoll> = match matches.value_of("dice") {
        Some(dice) => Some(dice.parse().map_err(|err| Error(format!("{}: {}", dice, err)))?),
        None => None,
    };

    info!("listing moves for {}", pos);
    let moves = generate_moves(&pos);
    print!("{}", pos.diagram());
    println!("{}\n", pos);

    let mut captures = Vec::new();
    let mut total = 0;
    let mut distinct = BTreeSet::new();
    for &roll in FULL_AND_PARTIAL_ROLLS.iter() {
        let positions = moves.get_moves(roll);
        if moves.is_king_captured(roll) {
            captures.push(roll.to_string());
            continue;
        }
        total += positions.len();
        distinct.extend(positions.iter().cloned());
        if only.map_or(true, |only| only == roll) {
            println!("{} (total of {} possibilities):", roll, positions.len());
            for p in positions {
                println!("  {}", p);
            }
            println!("{}", "-".repeat(40));
        }
    }

    if !captures.is_empty() {
        println!("King capture found from: {}", captures.join(", "));
    }
    println!("Total of {} different moves, reaching {} different positions", total, distinct.len());
    Ok(())
}

fn simulate(matches: &ArgMatches) -> Result<(), Error> {
    let pos = parse_position(matches)?;
    let config_path = matches.value_of_os("config").map(PathBuf::from);
    let mut config = SimulationConfig::load(config_path.as_deref())?;

    if let Some(games) = parse_number(matches, "games")? {
        config.games = games;
    }
    if let Some(seed) = parse_number(matches, "seed")? {
        config.seed = seed;
    }
    if let Some(max_turns) = parse_number(matches, "max-turns")? {
        config.max_turns = max_turns;
    }
    if matches.is_present("save-config") {
        let path = config_path.unwrap_or_else(SimulationConfig::default_path);
        save_config(&config, &path)?;
    }

    info!("simulating {} games from {} with {:?}", config.games, pos, config);
    print!("{}", pos.diagram());
    let mut rng = StdRng::seed_from_u64(config.seed);
    Simulation::run(&pos, &config, &mut rng, |sim| eprint!("{}", sim));
    Ok(())
}

fn save_config(config: &SimulationConfig, path: &Path) -> Result<(), Error> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    config.write(path)?;
    info!("settings written to {}", path.display());
    Ok(())
}

struct Error(String);

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        self.0.fmt(f)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Error { }

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error(err.to_string())
    }
}

impl From<dicechess::config::ConfigError> for Error {
    fn from(err: dicechess::config::ConfigError) -> Self {
        Error(err.to_string())
    }
}
