use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::bridge::DEFAULT_SHUTDOWN_COMMAND;
use crate::rpc::DEFAULT_RPC_URL;

pub const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    pianoteq: PianoteqConfig,
    #[serde(default)]
    midi: MidiConfig,
    #[serde(default)]
    system: SystemConfig,
    #[serde(default)]
    startup: StartupConfig,
}

#[derive(Deserialize, Default)]
struct PianoteqConfig {
    dir: Option<String>,
    bin: Option<String>,
    headless: Option<bool>,
    launch: Option<bool>,
    rpc_url: Option<String>,
}

#[derive(Deserialize, Default)]
struct MidiConfig {
    mapping_name: Option<String>,
}

#[derive(Deserialize, Default)]
struct SystemConfig {
    shutdown_command: Option<String>,
    client: Option<String>,
}

#[derive(Deserialize, Default)]
struct StartupConfig {
    api_attempts: Option<u32>,
    api_interval_ms: Option<u64>,
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Environment,
    UserConfig,
    BundledDefault,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Environment => "environment",
            Self::UserConfig => "user_config",
            Self::BundledDefault => "bundled_default",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Setting<T> {
    pub value: T,
    pub source: ConfigSource,
}

/// Resolved configuration. Priority: environment > user config > bundled default.
#[derive(Debug, Clone)]
pub struct Config {
    pianoteq_dir: Setting<String>,
    pianoteq_bin: Setting<String>,
    headless: Setting<bool>,
    launch: Setting<bool>,
    rpc_url: Setting<String>,
    midi_mapping_name: Setting<String>,
    shutdown_command: Setting<String>,
    client: Setting<String>,
    api_attempts: u32,
    api_interval_ms: u64,
}

impl Config {
    /// Load from the user config path and the process environment.
    pub fn load() -> Self {
        Self::load_from(user_config_path().as_deref(), |key| std::env::var(key).ok())
    }

    /// Load with an explicit user file and environment lookup.
    pub fn load_from(user_path: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> Self {
        let base: ConfigFile = match toml::from_str(DEFAULT_CONFIG) {
            Ok(base) => base,
            Err(e) => {
                log::error!(target: "config", "embedded config.toml is invalid: {}", e);
                ConfigFile::default()
            }
        };
        let user = user_path.and_then(read_user_config).unwrap_or_default();

        let string = |key: &str, user: Option<String>, base: Option<String>, fallback: &str| {
            resolve(env(key), user, base, fallback.to_string(), |s| Some(s.to_string()))
        };
        let flag = |key: &str, user: Option<bool>, base: Option<bool>, fallback: bool| {
            resolve(env(key), user, base, fallback, parse_bool)
        };

        Config {
            pianoteq_dir: string("PIANOTEQ_DIR", user.pianoteq.dir, base.pianoteq.dir, "~/"),
            pianoteq_bin: string(
                "PIANOTEQ_BIN",
                user.pianoteq.bin,
                base.pianoteq.bin,
                "Pianoteq 8 STAGE",
            ),
            headless: flag(
                "PIANOTEQ_HEADLESS",
                user.pianoteq.headless,
                base.pianoteq.headless,
                true,
            ),
            launch: flag("PIANOTEQ_LAUNCH", user.pianoteq.launch, base.pianoteq.launch, true),
            rpc_url: string(
                "PIANOTEQ_RPC_URL",
                user.pianoteq.rpc_url,
                base.pianoteq.rpc_url,
                DEFAULT_RPC_URL,
            ),
            midi_mapping_name: string(
                "MIDI_MAPPING_NAME",
                user.midi.mapping_name,
                base.midi.mapping_name,
                "Pi-PTQ-Mapping",
            ),
            shutdown_command: string(
                "SHUTDOWN_COMMAND",
                user.system.shutdown_command,
                base.system.shutdown_command,
                DEFAULT_SHUTDOWN_COMMAND,
            ),
            client: string(
                "PI_PIANOTEQ_CLIENT",
                user.system.client,
                base.system.client,
                "gfxhat",
            ),
            api_attempts: user
                .startup
                .api_attempts
                .or(base.startup.api_attempts)
                .unwrap_or(8)
                .max(1),
            api_interval_ms: user
                .startup
                .api_interval_ms
                .or(base.startup.api_interval_ms)
                .unwrap_or(500),
        }
    }

    /// Pianoteq install directory with `~` expanded.
    pub fn pianoteq_dir(&self) -> PathBuf {
        expand_home(&self.pianoteq_dir.value)
    }

    pub fn pianoteq_bin(&self) -> &str {
        &self.pianoteq_bin.value
    }

    pub fn pianoteq_executable(&self) -> PathBuf {
        self.pianoteq_dir().join(self.pianoteq_bin())
    }

    pub fn headless(&self) -> bool {
        self.headless.value
    }

    /// Whether pi-pianoteq starts (and later stops) Pianoteq itself.
    pub fn launch(&self) -> bool {
        self.launch.value
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url.value
    }

    pub fn midi_mapping_name(&self) -> &str {
        &self.midi_mapping_name.value
    }

    pub fn shutdown_command(&self) -> &str {
        &self.shutdown_command.value
    }

    pub fn client(&self) -> &str {
        &self.client.value
    }

    pub fn api_attempts(&self) -> u32 {
        self.api_attempts
    }

    pub fn api_interval(&self) -> Duration {
        Duration::from_millis(self.api_interval_ms)
    }

    /// Every overridable value with its source, for `--show-config`.
    pub fn entries(&self) -> Vec<(&'static str, String, ConfigSource)> {
        vec![
            entry("PIANOTEQ_DIR", &self.pianoteq_dir),
            entry("PIANOTEQ_BIN", &self.pianoteq_bin),
            entry("PIANOTEQ_HEADLESS", &self.headless),
            entry("PIANOTEQ_LAUNCH", &self.launch),
            entry("PIANOTEQ_RPC_URL", &self.rpc_url),
            entry("MIDI_MAPPING_NAME", &self.midi_mapping_name),
            entry("SHUTDOWN_COMMAND", &self.shutdown_command),
            entry("CLIENT", &self.client),
        ]
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::load_from(None, |_| None)
    }
}

fn entry<T: ToString>(key: &'static str, setting: &Setting<T>) -> (&'static str, String, ConfigSource) {
    (key, setting.value.to_string(), setting.source)
}

fn resolve<T>(
    env: Option<String>,
    user: Option<T>,
    base: Option<T>,
    fallback: T,
    parse: impl Fn(&str) -> Option<T>,
) -> Setting<T> {
    if let Some(raw) = env {
        match parse(&raw) {
            Some(value) => {
                return Setting {
                    value,
                    source: ConfigSource::Environment,
                }
            }
            None => log::warn!(target: "config", "ignoring unparseable environment value '{}'", raw),
        }
    }
    if let Some(value) = user {
        return Setting {
            value,
            source: ConfigSource::UserConfig,
        };
    }
    Setting {
        value: base.unwrap_or(fallback),
        source: ConfigSource::BundledDefault,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn read_user_config(path: &Path) -> Option<ConfigFile> {
    if !path.exists() {
        return None;
    }
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
            Ok(user) => Some(user),
            Err(e) => {
                log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e);
                None
            }
        },
        Err(e) => {
            log::warn!(target: "config", "could not read config {}: {}", path.display(), e);
            None
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~") {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest.trim_start_matches('/')),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pi_pianoteq"))
}

pub fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Write the bundled config to `path` unless a file is already there.
pub fn init_user_config(path: &Path) -> Result<String, String> {
    if path.exists() {
        return Err(format!("Config already exists at {}", path.display()));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
    }
    std::fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
    Ok(format!("Created config at {}", path.display()))
}
