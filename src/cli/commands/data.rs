//! Read-only domain subcommands: matches, predictions, standings and odds.

use crate::features::odds::BetType;
use clap::{Arg, Command, builder::ValueParser};

pub const CMD_MATCHES: &str = "matches";
pub const CMD_TODAY: &str = "today";
pub const CMD_MATCH: &str = "match";
pub const CMD_PREDICTION: &str = "prediction";
pub const CMD_REPORT: &str = "report";
pub const CMD_STANDINGS: &str = "standings";
pub const CMD_COMPETITIONS: &str = "competitions";
pub const CMD_ODDS: &str = "odds";
pub const CMD_VALUE_BET: &str = "value-bet";
pub const CMD_HEALTH: &str = "health";

pub const ARG_MATCH_ID: &str = "match-id";
pub const ARG_COMPETITION: &str = "competition";
pub const ARG_LIMIT: &str = "limit";
pub const ARG_REFRESH: &str = "refresh";
pub const ARG_BET: &str = "bet";

fn match_id_arg() -> Arg {
    Arg::new(ARG_MATCH_ID)
        .help("Match id")
        .required(true)
        .value_parser(clap::value_parser!(i64))
}

#[must_use]
pub fn validator_bet_type() -> ValueParser {
    ValueParser::from(move |bet: &str| -> std::result::Result<BetType, String> { bet.parse() })
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_MATCHES)
                .about("Upcoming matches, today included")
                .arg(
                    Arg::new(ARG_COMPETITION)
                        .short('c')
                        .long(ARG_COMPETITION)
                        .help("Only keep one competition code, e.g. PL, FL1, CL"),
                )
                .arg(
                    Arg::new(ARG_LIMIT)
                        .short('l')
                        .long(ARG_LIMIT)
                        .help("Maximum number of matches requested")
                        .default_value("20")
                        .value_parser(clap::value_parser!(u32).range(1..)),
                ),
        )
        .subcommand(Command::new(CMD_TODAY).about("Today's matches"))
        .subcommand(
            Command::new(CMD_MATCH)
                .about("One match with its prediction summary")
                .arg(match_id_arg()),
        )
        .subcommand(
            Command::new(CMD_PREDICTION)
                .about("Combined prediction: Papa, Grand Frère and Ma Logique")
                .arg(match_id_arg()),
        )
        .subcommand(
            Command::new(CMD_REPORT)
                .about("Detailed APEX-30 module report")
                .arg(match_id_arg()),
        )
        .subcommand(
            Command::new(CMD_STANDINGS)
                .about("League table for a competition")
                .arg(
                    Arg::new(ARG_COMPETITION)
                        .help("Competition code, e.g. PL")
                        .required(true),
                ),
        )
        .subcommand(Command::new(CMD_COMPETITIONS).about("Available competitions"))
        .subcommand(
            Command::new(CMD_ODDS)
                .about("Bookmaker odds for a match")
                .arg(match_id_arg())
                .arg(
                    Arg::new(ARG_REFRESH)
                        .long(ARG_REFRESH)
                        .help("Fetch fresh odds from the provider (spends a provider credit)")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new(CMD_VALUE_BET)
                .about("Value-bet analysis for one outcome")
                .arg(match_id_arg())
                .arg(
                    Arg::new(ARG_BET)
                        .short('b')
                        .long(ARG_BET)
                        .help("Outcome to evaluate: home, draw or away")
                        .required(true)
                        .value_parser(validator_bet_type()),
                ),
        )
        .subcommand(Command::new(CMD_HEALTH).about("API and database health"))
}
