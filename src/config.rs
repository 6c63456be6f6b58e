//! Runtime configuration, loaded from environment variables.

use crate::env;
use log::LevelFilter;
use std::net::{IpAddr, Ipv4Addr};

pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database_url: String,
    pub logging: LevelFilter,
}

pub fn load_config() -> Config {
    Config {
        host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        port: env::u16_env(env::PORT),
        database_url: env::str_env(env::DATABASE_URL),
        logging: env::logging_level(),
    }
}
