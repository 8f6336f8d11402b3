use assertnotifier_core::startup::StartupConfig;
use assertnotifier_core::{NotifierError, NotifierResult};
use env_logger::{Builder, WriteStyle};
use log::LevelFilter;

use std::io::Write;

#[derive(Debug, Clone)]
pub struct ConsoleLoggerConfig {
    pub level: LevelFilter,
    pub colors: bool,
    pub include_module: bool,
}

impl ConsoleLoggerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = lookup("ASSERTNOTIFIER_LOG")
            .and_then(|v| v.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info);
        let colors = lookup("ASSERTNOTIFIER_LOG_COLORS")
            .map(|v| v != "0")
            .unwrap_or(true);
        let include_module = lookup("ASSERTNOTIFIER_LOG_MODULE")
            .map(|v| v != "0")
            .unwrap_or(true);

        Self {
            level,
            colors,
            include_module,
        }
    }

    /// Env settings with the level taken from the startup config.
    ///
    /// An unparsable level keeps whatever the env provided.
    pub fn from_startup(startup: &StartupConfig) -> Self {
        let mut cfg = Self::from_env();
        if let Ok(level) = startup.log_level.parse::<LevelFilter>() {
            cfg.level = level;
        }
        cfg
    }
}

impl Default for ConsoleLoggerConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

pub struct ConsoleLogger {
    config: ConsoleLoggerConfig,
    initialized: bool,
}

impl ConsoleLogger {
    #[inline]
    pub fn new(config: ConsoleLoggerConfig) -> Self {
        Self {
            config,
            initialized: false,
        }
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Installs the process logger. Calling it again on the same value is a no-op;
    /// installing a second logger in the process fails.
    pub fn init(&mut self) -> NotifierResult<()> {
        if self.initialized {
            return Ok(());
        }

        let mut builder = Builder::new();
        builder.filter_level(self.config.level);
        builder.write_style(if self.config.colors {
            WriteStyle::Auto
        } else {
            WriteStyle::Never
        });

        let include_module = self.config.include_module;
        builder.format(move |buf, record| {
            let style = buf.default_level_style(record.level());

            if include_module {
                writeln!(
                    buf,
                    "[{style}{:<5}{style:#}] {:<25} {}",
                    record.level(),
                    record.target(),
                    record.args()
                )
            } else {
                writeln!(buf, "[{style}{:<5}{style:#}] {}", record.level(), record.args())
            }
        });

        builder
            .try_init()
            .map_err(|e| NotifierError::Other(format!("logger init failed: {e}")))?;

        self.initialized = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_defaults() {
        let cfg = ConsoleLoggerConfig::from_lookup(|_| None);

        assert_eq!(cfg.level, LevelFilter::Info);
        assert!(cfg.colors);
        assert!(cfg.include_module);
    }

    #[test]
    fn lookup_reads_switches() {
        let cfg = ConsoleLoggerConfig::from_lookup(|key| match key {
            "ASSERTNOTIFIER_LOG" => Some("debug".to_owned()),
            "ASSERTNOTIFIER_LOG_COLORS" => Some("0".to_owned()),
            "ASSERTNOTIFIER_LOG_MODULE" => Some("0".to_owned()),
            _ => None,
        });

        assert_eq!(cfg.level, LevelFilter::Debug);
        assert!(!cfg.colors);
        assert!(!cfg.include_module);
    }

    #[test]
    fn bad_level_falls_back_to_info() {
        let cfg = ConsoleLoggerConfig::from_lookup(|key| {
            (key == "ASSERTNOTIFIER_LOG").then(|| "loud".to_owned())
        });

        assert_eq!(cfg.level, LevelFilter::Info);
    }

    #[test]
    fn startup_level_wins_when_valid() {
        let mut startup = StartupConfig::default();
        startup.log_level = "trace".to_owned();
        assert_eq!(ConsoleLoggerConfig::from_startup(&startup).level, LevelFilter::Trace);
    }
}
