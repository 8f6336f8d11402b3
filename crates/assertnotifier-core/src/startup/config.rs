use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::notifier::DEFAULT_DELAY;

pub const DEFAULT_STARTUP_FILE: &str = "assertnotifier.json";

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub startup: PathBuf,
    pub root_dir: Option<PathBuf>,
}

impl Default for ConfigPaths {
    #[inline]
    fn default() -> Self {
        Self {
            startup: PathBuf::from(DEFAULT_STARTUP_FILE),
            root_dir: None,
        }
    }
}

impl ConfigPaths {
    #[inline]
    pub fn new<P>(startup: P, root_dir: Option<PathBuf>) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            startup: startup.into(),
            root_dir,
        }
    }

    #[inline]
    pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(root_dir.into());
        self
    }

    #[inline]
    pub fn startup_path(&self) -> &Path {
        &self.startup
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StartupConfigSource {
    #[default]
    Defaults,
    File {
        path: PathBuf,
    },
    Mixed,
}

/// Normalized startup configuration.
/// All fields have concrete defaults (no Option).
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub source: StartupConfigSource,

    pub log_level: String,

    pub notification_title: String,
    pub notification_identifier: String,
    pub notifications_authorized: bool,

    /// Delay suggested to call sites that do not pick their own.
    pub default_delay: Duration,
}

impl Default for StartupConfig {
    #[inline]
    fn default() -> Self {
        Self {
            source: StartupConfigSource::Defaults,

            log_level: "info".to_owned(),

            notification_title: "Assertion Failure".to_uppercase(),
            notification_identifier: "assertionFailureHit".to_owned(),
            notifications_authorized: true,

            default_delay: DEFAULT_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupOverrideSource {
    File,
    Env,
    Programmatic,
}

#[derive(Debug, Clone)]
pub struct StartupOverride {
    pub key: &'static str,
    pub source: StartupOverrideSource,
    pub from: String,
    pub to: String,
}

/// Individual values layered over the file. `None` leaves the slot alone.
#[derive(Debug, Clone, Default)]
pub struct StartupOverrides {
    pub log_level: Option<String>,
    pub notification_title: Option<String>,
    pub notification_identifier: Option<String>,
    pub notifications_authorized: Option<bool>,
    pub default_delay_ms: Option<u64>,
}

impl StartupOverrides {
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            log_level: non_empty("ASSERTNOTIFIER_LOG"),
            notification_title: non_empty("ASSERTNOTIFIER_NOTIFY_TITLE"),
            notification_identifier: non_empty("ASSERTNOTIFIER_NOTIFY_ID"),
            notifications_authorized: non_empty("ASSERTNOTIFIER_NOTIFY_AUTHORIZED")
                .map(|v| v.trim() != "0"),
            default_delay_ms: non_empty("ASSERTNOTIFIER_DELAY_MS")
                .and_then(|v| v.trim().parse::<u64>().ok()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum StartupResolvedFrom {
    /// Path was absolute and existed.
    Absolute,
    /// Found as `cwd/<file>`.
    Cwd,
    /// Found as `exe_dir/<file>`.
    ExeDir,
    /// Found as `root_dir/<file>`.
    RootDir,
    /// No file was found.
    #[default]
    NotProvided,
}

#[derive(Debug, Clone, Default)]
pub struct StartupLoadReport {
    pub source: StartupConfigSource,
    /// The actual file used (absolute when found).
    pub file: Option<PathBuf>,
    pub resolved_from: StartupResolvedFrom,
    pub overrides: Vec<StartupOverride>,
}

impl StartupLoadReport {
    #[inline]
    pub fn has_overrides(&self) -> bool {
        !self.overrides.is_empty()
    }

    #[inline]
    pub fn is_defaults(&self) -> bool {
        matches!(self.source, StartupConfigSource::Defaults)
    }

    #[inline]
    pub fn used_file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Logs one line per override at debug level, plus a summary at info.
    pub fn log(&self) {
        log::info!(
            "startup config: source={:?} file={:?} overrides={}",
            self.source,
            self.file,
            self.overrides.len()
        );
        for o in &self.overrides {
            log::debug!("startup override [{:?}] {}: {} -> {}", o.source, o.key, o.from, o.to);
        }
    }
}
