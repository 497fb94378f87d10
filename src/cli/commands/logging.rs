use clap::{Arg, ArgAction, Command, builder::ValueParser};

pub const ARG_VERBOSITY: &str = "verbosity";

/// Level names indexed by the verbosity count they stand for.
const LEVEL_NAMES: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Verbosity from `PRONOSCORE_LOG_LEVEL`: a level name or its count (`info` or `2`).
fn parse_verbosity(value: &str) -> Result<u8, String> {
    let value = value.trim();
    let index = match value.parse::<usize>() {
        Ok(count) => Some(count).filter(|count| *count < LEVEL_NAMES.len()),
        Err(_) => LEVEL_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(value)),
    };

    index
        .and_then(|index| u8::try_from(index).ok())
        .ok_or_else(|| format!("invalid log level {value:?}, expected one of {LEVEL_NAMES:?}"))
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Increase log verbosity: -v warn, -vv info, -vvv debug, -vvvv trace (default: error)")
            .env("PRONOSCORE_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(ValueParser::from(parse_verbosity)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_counts_are_accepted() {
        assert_eq!(parse_verbosity("error"), Ok(0));
        assert_eq!(parse_verbosity(" DEBUG "), Ok(3));
        assert_eq!(parse_verbosity("4"), Ok(4));
    }

    #[test]
    fn out_of_range_and_unknown_levels_are_rejected() {
        assert!(parse_verbosity("5").is_err());
        assert!(parse_verbosity("verbose").is_err());
        assert!(parse_verbosity("").is_err());
    }
}
