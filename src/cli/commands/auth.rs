use anyhow::{Context, Result, anyhow};
use clap::{Arg, ArgMatches, Command, builder::PossibleValuesParser};
use secrecy::{ExposeSecret, SecretString};

pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_ENVIRONMENT: &str = "environment";
pub const ARG_ACCESS_TOKEN_TTL: &str = "access-token-ttl";
pub const ARG_REFRESH_TOKEN_TTL: &str = "refresh-token-ttl";
pub const ARG_REFRESH_COOKIE_MAX_AGE: &str = "refresh-cookie-max-age";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long(ARG_JWT_SECRET)
                .help("Secret used to sign access and refresh tokens")
                .env("FOLIO_JWT_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_ENVIRONMENT)
                .long(ARG_ENVIRONMENT)
                .help("Deployment environment; production marks the refresh cookie Secure")
                .env("FOLIO_ENVIRONMENT")
                .default_value("development")
                .value_parser(PossibleValuesParser::new(["development", "production"])),
        )
        .arg(
            Arg::new(ARG_ACCESS_TOKEN_TTL)
                .long(ARG_ACCESS_TOKEN_TTL)
                .help("Access token lifetime in seconds")
                .env("FOLIO_ACCESS_TOKEN_TTL")
                .default_value("3600")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_REFRESH_TOKEN_TTL)
                .long(ARG_REFRESH_TOKEN_TTL)
                .help("Refresh token lifetime in seconds")
                .env("FOLIO_REFRESH_TOKEN_TTL")
                .default_value("86400")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_REFRESH_COOKIE_MAX_AGE)
                .long(ARG_REFRESH_COOKIE_MAX_AGE)
                .help("Max-Age of the refresh token cookie in seconds")
                .env("FOLIO_REFRESH_COOKIE_MAX_AGE")
                .default_value("31536000")
                .value_parser(clap::value_parser!(i64).range(0..)),
        )
}

#[derive(Debug)]
pub struct Options {
    pub jwt_secret: SecretString,
    pub production: bool,
    pub access_token_ttl_seconds: u64,
    pub refresh_token_ttl_seconds: u64,
    pub refresh_cookie_max_age_seconds: i64,
}

impl Options {
    /// # Errors
    /// Returns an error if the signing secret is missing or blank.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let jwt_secret = matches
            .get_one::<String>(ARG_JWT_SECRET)
            .cloned()
            .map(SecretString::from)
            .context("missing required argument: --jwt-secret")?;
        if jwt_secret.expose_secret().trim().is_empty() {
            return Err(anyhow!("--jwt-secret must not be empty"));
        }

        Ok(Self {
            jwt_secret,
            production: matches
                .get_one::<String>(ARG_ENVIRONMENT)
                .is_some_and(|env| env == "production"),
            access_token_ttl_seconds: matches
                .get_one::<u64>(ARG_ACCESS_TOKEN_TTL)
                .copied()
                .unwrap_or(3600),
            refresh_token_ttl_seconds: matches
                .get_one::<u64>(ARG_REFRESH_TOKEN_TTL)
                .copied()
                .unwrap_or(86_400),
            refresh_cookie_max_age_seconds: matches
                .get_one::<i64>(ARG_REFRESH_COOKIE_MAX_AGE)
                .copied()
                .unwrap_or(31_536_000),
        })
    }
}
