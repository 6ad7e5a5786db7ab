use std::{env, str::FromStr};

use anyhow::{anyhow, Result};
use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        file::FileAppender,
    },
    config::{Appender, Config, Root},
    encode::{json::JsonEncoder, pattern::PatternEncoder},
};
use once_cell::sync::OnceCell;

use crate::config::LoggingConfig;

pub struct Logger;

pub static LOGGER_ENABLED: OnceCell<bool> = OnceCell::new();

#[macro_export]
macro_rules! logger {
    ($level:ident, $($arg:tt)+) => {
        if let Some(true) = $crate::logging::LOGGER_ENABLED.get() {
            ::log::$level!($($arg)+);
        }
    };
}

const APPENDER: &str = "ingress2gateway";

const PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%S%.3f)} {h({l:<5})} {t} - {m}{n}";

impl Logger {
    pub fn init(config: &LoggingConfig) -> Result<()> {
        let level_filter =
            LevelFilter::from_str(&env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))?;

        let appender = if let Some(path) = &config.path {
            let logfile = FileAppender::builder()
                .append(false)
                .encoder(Box::new(JsonEncoder::new()))
                .build(path)?;

            Appender::builder().build(APPENDER, Box::new(logfile))
        } else {
            let stderr = ConsoleAppender::builder()
                .target(Target::Stderr)
                .encoder(Box::new(PatternEncoder::new(PATTERN)))
                .build();

            Appender::builder().build(APPENDER, Box::new(stderr))
        };

        let config = Config::builder()
            .appender(appender)
            .build(Root::builder().appender(APPENDER).build(level_filter))?;

        log4rs::init_config(config)?;

        LOGGER_ENABLED
            .set(true)
            .map_err(|_| anyhow!("logger already initialized"))?;

        Ok(())
    }
}
