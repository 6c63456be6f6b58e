//! Structured logging setup, gated on the `GIN_MODE` environment variable.
//! Console appender only — this service has no recognized log-directory
//! configuration, so there's nothing to roll a file against.

use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    init_config, Config,
};

/// Verbose pattern used when `GIN_MODE=debug` (see `env::logging_level`).
const DEBUG_PATTERN: &str = "[{d(%Y-%m-%d %H:%M:%S)} {h({l})} {M}] {m}{n}";
/// Compact pattern used for the default "release" mode.
const RELEASE_PATTERN: &str = "{h({l})}: {m}{n}";

pub fn setup(level: LevelFilter) {
    let pattern = if level >= LevelFilter::Debug {
        DEBUG_PATTERN
    } else {
        RELEASE_PATTERN
    };

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .expect("failed to build logging config");

    init_config(config).expect("failed to initialize logger");
}
