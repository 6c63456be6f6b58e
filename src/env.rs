//! Environment variable access via `(key, default)` tuple constants.

use log::LevelFilter;
use std::str::FromStr;

pub const DATABASE_URL: (&str, &str) = ("DATABASE_URL", "data/app.db");
pub const PORT: (&str, u16) = ("PORT", 8080);
pub const GIN_MODE: (&str, &str) = ("GIN_MODE", "release");

/// Not consumed by this crate directly — recognized so configuration
/// validation doesn't reject it; signing/verifying bearer tokens is an
/// external collaborator.
pub const JWT_SECRET: (&str, &str) = ("JWT_SECRET", "");

/// Passed through to the external place-autocomplete proxy; unused here.
pub const GOOGLE_PLACES_API_KEY: (&str, &str) = ("GOOGLE_PLACES_API_KEY", "");

pub fn str_env(pair: (&str, &str)) -> String {
    std::env::var(pair.0).unwrap_or_else(|_| pair.1.to_string())
}

pub fn u16_env(pair: (&str, u16)) -> u16 {
    std::env::var(pair.0).map_or(pair.1, |value| value.parse::<u16>().unwrap_or(pair.1))
}

pub fn logging_level() -> LevelFilter {
    const DEFAULT: LevelFilter = LevelFilter::Info;
    match str_env(GIN_MODE).as_str() {
        "debug" => LevelFilter::Debug,
        _ => std::env::var("LOG_LEVEL").map_or(DEFAULT, |value| {
            LevelFilter::from_str(&value).unwrap_or(DEFAULT)
        }),
    }
}
