mod config;
mod loader;

pub use config::{
    ConfigPaths,
    StartupConfig,
    StartupConfigSource,
    StartupLoadReport,
    StartupOverride,
    StartupOverrideSource,
    StartupOverrides,
    StartupResolvedFrom,
    DEFAULT_STARTUP_FILE,
};

pub use loader::StartupLoader;
