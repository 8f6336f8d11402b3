use crate::error::{NotifierError, NotifierResult};
use crate::startup::{
    ConfigPaths, StartupConfig, StartupConfigSource, StartupLoadReport, StartupOverride,
    StartupOverrideSource, StartupOverrides, StartupResolvedFrom,
};

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub struct StartupLoader;

impl StartupLoader {
    /// Loads startup config with layering:
    /// defaults -> file -> env.
    pub fn load_json(paths: &ConfigPaths) -> NotifierResult<(StartupConfig, StartupLoadReport)> {
        Self::load_json_with_overrides(paths, &StartupOverrides::empty())
    }

    /// Loads startup config with layering:
    /// defaults -> file -> env -> programmatic.
    pub fn load_json_with_overrides(
        paths: &ConfigPaths,
        programmatic: &StartupOverrides,
    ) -> NotifierResult<(StartupConfig, StartupLoadReport)> {
        Self::load_layers(paths, &StartupOverrides::from_env(), programmatic)
    }

    /// Same as [`load_json_with_overrides`](Self::load_json_with_overrides) with an explicit env layer.
    pub fn load_layers(
        paths: &ConfigPaths,
        env: &StartupOverrides,
        programmatic: &StartupOverrides,
    ) -> NotifierResult<(StartupConfig, StartupLoadReport)> {
        let mut cfg = StartupConfig::default();
        let mut report = StartupLoadReport::default();

        // File layer (optional)
        let mut file_used = false;
        if let Some((resolved, from)) = resolve_startup_file_optional(paths, paths.startup_path()) {
            let data = fs::read_to_string(&resolved).map_err(|e| NotifierError::ConfigRead {
                path: resolved.clone(),
                source: e,
            })?;

            let parsed: RootJson =
                serde_json::from_str(&data).map_err(|e| NotifierError::ConfigParse {
                    path: resolved.clone(),
                    source: e,
                })?;

            apply_root(&mut cfg, &mut report, parsed);

            cfg.source = StartupConfigSource::File {
                path: resolved.clone(),
            };
            report.file = Some(resolved);
            report.resolved_from = from;
            file_used = true;
        }

        apply_overrides(&mut cfg, &mut report, StartupOverrideSource::Env, env);
        apply_overrides(
            &mut cfg,
            &mut report,
            StartupOverrideSource::Programmatic,
            programmatic,
        );

        let mixed = report.overrides.iter().any(|o| {
            o.source == StartupOverrideSource::Env || o.source == StartupOverrideSource::Programmatic
        });

        if mixed {
            cfg.source = StartupConfigSource::Mixed;
        } else if !file_used {
            cfg.source = StartupConfigSource::Defaults;
        }
        report.source = cfg.source.clone();

        Ok((cfg, report))
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RootJson {
    logging: Option<LoggingJson>,
    notifications: Option<NotificationsJson>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingJson {
    level: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NotificationsJson {
    title: Option<String>,
    identifier: Option<String>,
    authorized: Option<bool>,
    delay_ms: Option<u64>,
}

fn apply_root(cfg: &mut StartupConfig, report: &mut StartupLoadReport, src: RootJson) {
    let source = StartupOverrideSource::File;

    if let Some(level) = src.logging.and_then(|l| l.level) {
        apply_string(report, source, "log_level", &mut cfg.log_level, level);
    }

    if let Some(n) = src.notifications {
        if let Some(v) = n.title {
            apply_string(report, source, "notification_title", &mut cfg.notification_title, v);
        }
        if let Some(v) = n.identifier {
            apply_string(
                report,
                source,
                "notification_identifier",
                &mut cfg.notification_identifier,
                v,
            );
        }
        if let Some(v) = n.authorized {
            apply_bool(
                report,
                source,
                "notifications_authorized",
                &mut cfg.notifications_authorized,
                v,
            );
        }
        if let Some(ms) = n.delay_ms {
            apply_delay(report, source, "default_delay", &mut cfg.default_delay, ms);
        }
    }
}

fn apply_overrides(
    cfg: &mut StartupConfig,
    report: &mut StartupLoadReport,
    source: StartupOverrideSource,
    ov: &StartupOverrides,
) {
    if let Some(v) = ov.log_level.clone() {
        apply_string(report, source, "log_level", &mut cfg.log_level, v);
    }

    if let Some(v) = ov.notification_title.clone() {
        apply_string(report, source, "notification_title", &mut cfg.notification_title, v);
    }

    if let Some(v) = ov.notification_identifier.clone() {
        apply_string(
            report,
            source,
            "notification_identifier",
            &mut cfg.notification_identifier,
            v,
        );
    }

    if let Some(v) = ov.notifications_authorized {
        apply_bool(
            report,
            source,
            "notifications_authorized",
            &mut cfg.notifications_authorized,
            v,
        );
    }

    if let Some(ms) = ov.default_delay_ms {
        apply_delay(report, source, "default_delay", &mut cfg.default_delay, ms);
    }
}

fn apply_string(
    report: &mut StartupLoadReport,
    source: StartupOverrideSource,
    key: &'static str,
    slot: &mut String,
    to: String,
) {
    let from = slot.clone();
    if from == to {
        return;
    }
    *slot = to.clone();
    report.overrides.push(StartupOverride {
        key,
        source,
        from,
        to,
    });
}

fn apply_bool(
    report: &mut StartupLoadReport,
    source: StartupOverrideSource,
    key: &'static str,
    slot: &mut bool,
    to: bool,
) {
    let from = slot.to_string();
    if *slot == to {
        return;
    }
    *slot = to;
    report.overrides.push(StartupOverride {
        key,
        source,
        from,
        to: to.to_string(),
    });
}

fn apply_delay(
    report: &mut StartupLoadReport,
    source: StartupOverrideSource,
    key: &'static str,
    slot: &mut Duration,
    to_ms: u64,
) {
    let to = Duration::from_millis(to_ms);
    if *slot == to {
        return;
    }
    let from = format_delay(*slot);
    *slot = to;
    report.overrides.push(StartupOverride {
        key,
        source,
        from,
        to: format_delay(to),
    });
}

fn format_delay(d: Duration) -> String {
    format!("{}ms", d.as_millis())
}

fn resolve_startup_file_optional(
    paths: &ConfigPaths,
    raw: &Path,
) -> Option<(PathBuf, StartupResolvedFrom)> {
    if raw.is_absolute() {
        return raw
            .is_file()
            .then(|| (raw.to_path_buf(), StartupResolvedFrom::Absolute));
    }

    if let Ok(cwd) = std::env::current_dir() {
        let p = cwd.join(raw);
        if p.is_file() {
            return Some((p, StartupResolvedFrom::Cwd));
        }
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let p = dir.join(raw);
            if p.is_file() {
                return Some((p, StartupResolvedFrom::ExeDir));
            }
        }
    }

    if let Some(root) = paths.root_dir.as_deref() {
        let p = root.join(raw);
        if p.is_file() {
            return Some((p, StartupResolvedFrom::RootDir));
        }
    }

    None
}
