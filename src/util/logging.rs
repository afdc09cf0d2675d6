use std::{collections::HashMap, sync::RwLock};

use once_cell::sync::Lazy;

static LOGGER_CONFIG: Lazy<RwLock<LoggingConfig>> =
    Lazy::new(|| RwLock::new(LoggingConfig::default()));

#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub enum LogLevel {
    INFO,
    VERBOSE,
}

#[macro_export]
macro_rules! logln {
    ($fmt:literal) => {
        if $crate::util::logging::is_enabled(Self::CC) {
            println!("[{}:{}] {}", Self::CC, line!(), $fmt);
        }
    };
    ($fmt:literal, $($arg:tt)*) => {
        if $crate::util::logging::is_enabled(Self::CC) {
            print!("[{}:{}] ", Self::CC, line!());
            println!($fmt, $($arg)*);
        }
    };
}

#[macro_export]
macro_rules! logvbln {
    ($fmt:literal) => {
        if $crate::util::logging::is_enabled(Self::CC)
            && $crate::util::logging::is_at_level(Self::CC, $crate::util::logging::LogLevel::VERBOSE)
        {
            println!("[{}:{}] {}", Self::CC, line!(), $fmt);
        }
    };
    ($fmt:literal, $($arg:tt)*) => {
        if $crate::util::logging::is_enabled(Self::CC)
            && $crate::util::logging::is_at_level(Self::CC, $crate::util::logging::LogLevel::VERBOSE)
        {
            print!("[{}:{}] ", Self::CC, line!());
            println!($fmt, $($arg)*);
        }
    };
}

pub fn is_enabled(cc: &'static str) -> bool {
    LOGGER_CONFIG
        .read()
        .map(|config| config.cc_enabled(cc))
        .unwrap_or(false)
}

pub fn is_at_level(cc: &'static str, level: LogLevel) -> bool {
    LOGGER_CONFIG
        .read()
        .map(|config| config.cc_at_level(cc, level))
        .unwrap_or(false)
}

fn update(apply: impl FnOnce(&mut LoggingConfig)) {
    if let Ok(mut config) = LOGGER_CONFIG.write() {
        apply(&mut config);
    }
}

pub fn disable_cc(cc: &'static str) {
    update(|config| config.disable_cc(cc));
}

pub fn enable_cc(cc: &'static str, level: LogLevel) {
    update(|config| config.enable_cc(cc, level));
}

pub fn set_global_logging(enabled: bool) {
    update(|config| {
        if enabled {
            config.enable_global_tracing()
        } else {
            config.disable_global_tracing()
        }
    });
}

pub fn set_global_level(level: LogLevel) {
    update(|config| config.set_global_level(level));
}

pub struct LoggingConfig {
    global_tracing_enabled: bool,
    global_level: LogLevel,
    flags: HashMap<&'static str, (bool, LogLevel)>, // <component, (tracing enabled, trace level)>
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            global_tracing_enabled: true,
            global_level: LogLevel::INFO,
            flags: Default::default(),
        }
    }
}

impl LoggingConfig {
    pub fn cc_enabled(&self, cc: &str) -> bool {
        if !self.global_tracing_enabled {
            return false;
        }

        self.flags.get(cc).map_or(true, |flag| flag.0)
    }

    pub fn cc_at_level(&self, cc: &str, level: LogLevel) -> bool {
        if self.global_level >= level {
            return true;
        }

        self.flags.get(cc).map_or(LogLevel::INFO, |flag| flag.1) >= level
    }

    pub fn enable_cc(&mut self, cc: &'static str, level: LogLevel) {
        self.flags.insert(cc, (true, level));
    }

    pub fn disable_cc(&mut self, cc: &'static str) {
        self.flags.insert(cc, (false, LogLevel::INFO));
    }

    pub fn enable_global_tracing(&mut self) {
        self.global_tracing_enabled = true;
    }

    pub fn disable_global_tracing(&mut self) {
        self.global_tracing_enabled = false;
    }

    pub fn set_global_level(&mut self, level: LogLevel) {
        self.global_level = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_follow_global_switch() {
        let mut config = LoggingConfig::default();
        assert!(config.cc_enabled("Matcher"));

        config.disable_global_tracing();
        assert!(!config.cc_enabled("Matcher"));
    }

    #[test]
    fn component_override_raises_level() {
        let mut config = LoggingConfig::default();
        assert!(!config.cc_at_level("Orchestrator", LogLevel::VERBOSE));

        config.enable_cc("Orchestrator", LogLevel::VERBOSE);
        assert!(config.cc_at_level("Orchestrator", LogLevel::VERBOSE));
        assert!(!config.cc_at_level("Matcher", LogLevel::VERBOSE));

        config.disable_cc("Matcher");
        assert!(!config.cc_enabled("Matcher"));
    }
}
