// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Logging setup and an event subscriber that logs executions

use log::{debug, warn};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::events::{EventSubscriber, FailureDecision, FailureEvent, PostRunEvent, PreRunEvent};

/// Log level options
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,
    /// Warnings and errors
    Warn,
    /// Info, warnings, and errors
    Info,
    /// Debug messages and above (verbose)
    Debug,
    /// All messages including trace (very verbose)
    Trace,
    /// Disable all logging
    Off,
}

impl LogLevel {
    /// Convert to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            "off" => Ok(LogLevel::Off),
            _ => Err(format!(
                "Unknown log level: {}. Valid options: error, warn, info, debug, trace, off",
                s
            )),
        }
    }
}

static LOGGER: OnceCell<()> = OnceCell::new();

/// Initialise env_logger once per process.
///
/// `RUST_LOG` is honoured; an explicit `level` overrides it. Later calls are
/// no-ops, as is the call when another logger is already installed.
pub fn init_logging(level: Option<LogLevel>) {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_default_env();
        if let Some(level) = level {
            builder.filter_level(level.to_level_filter());
        }
        let _ = builder.try_init();
    });
}

/// Logs every execution event; never votes on failures
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSubscriber;

impl EventSubscriber for LoggingSubscriber {
    fn on_pre_run(&self, event: &PreRunEvent) {
        for statement in event.statements() {
            debug!("[{}] pre_run: {}", event.execution_id(), statement);
        }
    }

    fn on_post_run(&self, event: &PostRunEvent) {
        debug!(
            "[{}] post_run: {} result(s)",
            event.execution_id(),
            event.results().len()
        );
    }

    fn on_failure(&self, event: &FailureEvent) -> Option<FailureDecision> {
        warn!("[{}] on_failure: {}", event.execution_id(), event.error());
        None
    }
}
