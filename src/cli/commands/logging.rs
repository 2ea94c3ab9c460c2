use clap::{Arg, Command, builder::ValueParser};

pub const ARG_VERBOSITY: &str = "verbosity";

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

        match level.parse::<u8>() {
            Ok(parsed) if usize::from(parsed) < LEVELS.len() => Ok(parsed),
            Ok(parsed) => Err(format!("log level {parsed} is out of range 0-4")),
            Err(_) => LEVELS
                .iter()
                .position(|name| name.eq_ignore_ascii_case(level.trim()))
                .and_then(|index| u8::try_from(index).ok())
                .ok_or_else(|| format!("unknown log level: {level}")),
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Raise log verbosity; repeat for more (-v warn, -vv info, -vvv debug)")
            .long_help(
                "Raise log verbosity. FOLIO_LOG_LEVEL accepts a level name (error, warn, info, debug, trace) or its number 0-4; RUST_LOG directives still apply on top.",
            )
            .env("FOLIO_LOG_LEVEL")
            .global(true)
            .action(clap::ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verbosity_from_env(level: &str) -> Result<Option<u8>, clap::Error> {
        temp_env::with_var("FOLIO_LOG_LEVEL", Some(level), || {
            with_args(Command::new("folio"))
                .try_get_matches_from(["folio"])
                .map(|matches| matches.get_one::<u8>(ARG_VERBOSITY).copied())
        })
    }

    #[test]
    fn accepts_names_and_numbers() {
        assert_eq!(verbosity_from_env("WARN").ok().flatten(), Some(1));
        assert_eq!(verbosity_from_env("debug").ok().flatten(), Some(3));
        assert_eq!(verbosity_from_env("4").ok().flatten(), Some(4));
    }

    #[test]
    fn rejects_unknown_levels() {
        assert!(verbosity_from_env("5").is_err());
        assert!(verbosity_from_env("verbose").is_err());
    }
}
